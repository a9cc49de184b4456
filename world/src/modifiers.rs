//! Deadlines of the timed modifiers unlocked by power-ups.

use std::{collections::BTreeMap, time::Duration};

use cat_bin_core::{Modifier, ModifierSet};

/// Map from modifier to the simulation time at which it lapses.
///
/// Each modifier owns an independent deadline. Activating a modifier that is
/// already running replaces its deadline rather than extending it.
#[derive(Clone, Debug, Default)]
pub(crate) struct ModifierTimers {
    deadlines: BTreeMap<Modifier, Duration>,
}

impl ModifierTimers {
    /// Starts or restarts a modifier so it lapses at `deadline`.
    pub(crate) fn activate(&mut self, modifier: Modifier, deadline: Duration) {
        let _ = self.deadlines.insert(modifier, deadline);
    }

    /// Removes every modifier whose deadline is at or before `now`.
    pub(crate) fn expire_due(&mut self, now: Duration) -> Vec<Modifier> {
        let due: Vec<Modifier> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(modifier, _)| *modifier)
            .collect();
        for modifier in &due {
            let _ = self.deadlines.remove(modifier);
        }
        due
    }

    /// Reports whether the modifier is running.
    pub(crate) fn is_active(&self, modifier: Modifier) -> bool {
        self.deadlines.contains_key(&modifier)
    }

    /// Deadline of a running modifier.
    pub(crate) fn deadline(&self, modifier: Modifier) -> Option<Duration> {
        self.deadlines.get(&modifier).copied()
    }

    /// Set of running modifiers.
    pub(crate) fn active(&self) -> ModifierSet {
        self.deadlines.keys().copied().collect()
    }

    /// Cancels every running modifier.
    pub(crate) fn clear(&mut self) {
        self.deadlines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reactivation_restarts_instead_of_stacking() {
        let mut timers = ModifierTimers::default();
        timers.activate(Modifier::Frenzy, Duration::from_secs(6));
        timers.activate(Modifier::Frenzy, Duration::from_secs(7));

        assert_eq!(timers.deadline(Modifier::Frenzy), Some(Duration::from_secs(7)));
        assert!(timers.expire_due(Duration::from_secs(6)).is_empty());
        assert_eq!(
            timers.expire_due(Duration::from_secs(7)),
            vec![Modifier::Frenzy]
        );
        assert!(!timers.is_active(Modifier::Frenzy));
    }

    #[test]
    fn modifiers_expire_independently() {
        let mut timers = ModifierTimers::default();
        timers.activate(Modifier::SlowMotion, Duration::from_secs(8));
        timers.activate(Modifier::Repelled, Duration::from_secs(4));

        assert_eq!(
            timers.expire_due(Duration::from_secs(5)),
            vec![Modifier::Repelled]
        );
        let active = timers.active();
        assert!(active.contains(Modifier::SlowMotion));
        assert!(!active.contains(Modifier::Repelled));

        timers.clear();
        assert!(timers.active().is_empty());
    }
}
