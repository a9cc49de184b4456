#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Expiry system that sweeps the slot grid for overdue occupants.

use std::time::Duration;

use cat_bin_core::{
    expiry_window, CloseReason, Command, Event, GameStatus, LevelPlan, Modifier, ModifierSet,
    SlotView,
};

/// Configuration parameters required to construct the expiry system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    sweep_interval: Duration,
    slow_expiry_factor: f64,
}

impl Config {
    /// Creates a new configuration using the sweep cadence and slow-motion factor.
    #[must_use]
    pub const fn new(sweep_interval: Duration, slow_expiry_factor: f64) -> Self {
        Self {
            sweep_interval,
            slow_expiry_factor,
        }
    }
}

/// Pure system that closes occupants whose expiry window has elapsed.
#[derive(Debug)]
pub struct Expiry {
    sweep_interval: Duration,
    slow_expiry_factor: f64,
    accumulator: Duration,
}

impl Expiry {
    /// Creates a new expiry system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            sweep_interval: config.sweep_interval,
            slow_expiry_factor: config.slow_expiry_factor,
            accumulator: Duration::ZERO,
        }
    }

    /// Consumes events and immutable views to emit close commands.
    ///
    /// `now` is the simulation clock after the events were produced. Several
    /// sweeps falling due in one call collapse into a single sweep at `now`.
    pub fn handle(
        &mut self,
        events: &[Event],
        status: GameStatus,
        plan: LevelPlan,
        modifiers: ModifierSet,
        slots: &SlotView,
        now: Duration,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::LevelStarted { .. } => self.accumulator = Duration::ZERO,
                Event::TimeAdvanced { dt } if status.is_playing() => {
                    self.accumulator = self.accumulator.saturating_add(*dt);
                }
                _ => {}
            }
        }

        if self.sweep_interval.is_zero() || self.accumulator < self.sweep_interval {
            return;
        }
        while self.accumulator >= self.sweep_interval {
            self.accumulator -= self.sweep_interval;
        }

        self.sweep(plan, modifiers, slots, now, out);
    }

    fn sweep(
        &self,
        plan: LevelPlan,
        modifiers: ModifierSet,
        slots: &SlotView,
        now: Duration,
        out: &mut Vec<Command>,
    ) {
        let repelled = modifiers.contains(Modifier::Repelled);
        let slow_motion = modifiers.contains(Modifier::SlowMotion);

        for snapshot in slots.iter() {
            let Some(occupant) = snapshot.occupant else {
                continue;
            };

            let reason = if repelled {
                CloseReason::Repelled
            } else {
                let window = expiry_window(
                    occupant.kind,
                    plan.base_spawn_interval(),
                    slow_motion,
                    self.slow_expiry_factor,
                );
                if now.saturating_sub(occupant.spawned_at) <= window {
                    continue;
                }
                CloseReason::Expired
            };

            out.push(Command::CloseSlot {
                slot: snapshot.id,
                reason,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cat_bin_core::{OccupantKind, OccupantSnapshot, SlotId, SlotSnapshot, Tuning};

    fn view(kind: OccupantKind, spawned_at: Duration) -> SlotView {
        SlotView::from_snapshots(vec![
            SlotSnapshot {
                id: SlotId::new(0),
                occupant: Some(OccupantSnapshot {
                    kind,
                    spawned_at,
                    hits_remaining: kind.initial_hits(),
                }),
            },
            SlotSnapshot {
                id: SlotId::new(1),
                occupant: None,
            },
        ])
    }

    fn expiry() -> Expiry {
        Expiry::new(Config::new(Duration::from_millis(200), 3.0))
    }

    #[test]
    fn occupant_at_window_boundary_is_not_overdue() {
        let plan = Tuning::default().level_plan(1);
        let slots = view(OccupantKind::Normal, Duration::ZERO);
        let mut out = Vec::new();

        expiry().sweep(
            plan,
            ModifierSet::empty(),
            &slots,
            Duration::from_millis(2250),
            &mut out,
        );
        assert!(out.is_empty());

        expiry().sweep(
            plan,
            ModifierSet::empty(),
            &slots,
            Duration::from_millis(2251),
            &mut out,
        );
        assert_eq!(
            out,
            vec![Command::CloseSlot {
                slot: SlotId::new(0),
                reason: CloseReason::Expired,
            }]
        );
    }

    #[test]
    fn slow_motion_triples_window() {
        let plan = Tuning::default().level_plan(1);
        let slots = view(OccupantKind::Speedy, Duration::ZERO);
        let mut out = Vec::new();

        expiry().sweep(
            plan,
            ModifierSet::empty().with(Modifier::SlowMotion),
            &slots,
            Duration::from_millis(1800),
            &mut out,
        );
        assert!(out.is_empty());

        expiry().sweep(
            plan,
            ModifierSet::empty(),
            &slots,
            Duration::from_millis(1800),
            &mut out,
        );
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn repelled_sweep_ignores_age() {
        let plan = Tuning::default().level_plan(1);
        let slots = view(OccupantKind::Sleepy, Duration::from_millis(500));
        let mut out = Vec::new();

        expiry().sweep(
            plan,
            ModifierSet::empty().with(Modifier::Repelled),
            &slots,
            Duration::from_millis(500),
            &mut out,
        );
        assert_eq!(
            out,
            vec![Command::CloseSlot {
                slot: SlotId::new(0),
                reason: CloseReason::Repelled,
            }]
        );
    }
}
