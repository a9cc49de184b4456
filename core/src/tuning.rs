//! Design constants and the per-level sizing policy derived from them.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Modifier, PowerUpKind};

/// Every tunable design constant of the game.
///
/// Values deserialize from TOML; missing keys fall back to [`Tuning::default`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    /// Length of a level in whole seconds.
    pub level_duration_secs: u32,
    /// Lives granted by a full restart.
    pub starting_lives: u32,
    /// Slots in the level-one grid.
    pub initial_slots: u32,
    /// Levels between each additional slot.
    pub slot_growth_levels: u32,
    /// Upper bound on the grid size.
    pub max_slots: u32,
    /// Spawn cadence of level one, in milliseconds.
    pub base_spawn_interval_ms: u64,
    /// Cadence reduction per level, in milliseconds.
    pub spawn_interval_step_ms: u64,
    /// Fastest permitted spawn cadence, in milliseconds.
    pub min_spawn_interval_ms: u64,
    /// Levels between each additional slot opened per spawn tick.
    pub spawn_batch_growth_levels: u32,
    /// Upper bound on slots opened per spawn tick.
    pub max_spawn_batch: u32,
    /// Cadence of the expiry sweep, in milliseconds.
    pub expiry_sweep_interval_ms: u64,
    /// Spawn interval factor while slow motion is active.
    pub slow_spawn_factor: f64,
    /// Expiry window factor while slow motion is active.
    pub slow_expiry_factor: f64,
    /// Score multiplier while frenzy is active.
    pub frenzy_multiplier: u32,
    /// Flat points granted by a broom.
    pub broom_bonus: u32,
    /// Seconds added by a clock.
    pub clock_bonus_secs: u32,
    /// Ceiling applied to the countdown after a clock bonus.
    pub max_time_remaining_secs: u32,
    /// Slow-motion duration, in milliseconds.
    pub slow_duration_ms: u64,
    /// Frenzy duration, in milliseconds.
    pub frenzy_duration_ms: u64,
    /// Freeze duration, in milliseconds.
    pub freeze_duration_ms: u64,
    /// Repellent duration, in milliseconds.
    pub repellent_duration_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            level_duration_secs: 30,
            starting_lives: 5,
            initial_slots: 4,
            slot_growth_levels: 3,
            max_slots: 12,
            base_spawn_interval_ms: 1500,
            spawn_interval_step_ms: 50,
            min_spawn_interval_ms: 400,
            spawn_batch_growth_levels: 3,
            max_spawn_batch: 3,
            expiry_sweep_interval_ms: 200,
            slow_spawn_factor: 2.2,
            slow_expiry_factor: 3.0,
            frenzy_multiplier: 2,
            broom_bonus: 50,
            clock_bonus_secs: 10,
            max_time_remaining_secs: 60,
            slow_duration_ms: 8_000,
            frenzy_duration_ms: 6_000,
            freeze_duration_ms: 5_000,
            repellent_duration_ms: 4_000,
        }
    }
}

/// Errors raised while loading or validating a [`Tuning`].
#[derive(Debug, Error)]
pub enum TuningError {
    /// The TOML document could not be parsed.
    #[error("could not parse tuning: {0}")]
    Parse(#[from] toml::de::Error),
    /// A field holds a value the simulation cannot run with.
    #[error("tuning field `{field}` {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// Description of the violated constraint.
        reason: &'static str,
    },
}

impl Tuning {
    /// Parses and validates a tuning from a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, TuningError> {
        let tuning: Self = toml::from_str(contents)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Rejects values that would stall or break the simulation.
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive: [(&'static str, u64); 9] = [
            ("level_duration_secs", u64::from(self.level_duration_secs)),
            ("starting_lives", u64::from(self.starting_lives)),
            ("initial_slots", u64::from(self.initial_slots)),
            ("slot_growth_levels", u64::from(self.slot_growth_levels)),
            ("spawn_batch_growth_levels", u64::from(self.spawn_batch_growth_levels)),
            ("max_spawn_batch", u64::from(self.max_spawn_batch)),
            ("min_spawn_interval_ms", self.min_spawn_interval_ms),
            ("expiry_sweep_interval_ms", self.expiry_sweep_interval_ms),
            ("frenzy_multiplier", u64::from(self.frenzy_multiplier)),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be greater than zero",
                });
            }
        }

        if self.max_slots < self.initial_slots {
            return Err(TuningError::Invalid {
                field: "max_slots",
                reason: "must not be smaller than initial_slots",
            });
        }
        if self.base_spawn_interval_ms < self.min_spawn_interval_ms {
            return Err(TuningError::Invalid {
                field: "base_spawn_interval_ms",
                reason: "must not be smaller than min_spawn_interval_ms",
            });
        }
        if self.max_time_remaining_secs < self.level_duration_secs {
            return Err(TuningError::Invalid {
                field: "max_time_remaining_secs",
                reason: "must not be smaller than level_duration_secs",
            });
        }

        let factors = [
            ("slow_spawn_factor", self.slow_spawn_factor),
            ("slow_expiry_factor", self.slow_expiry_factor),
        ];
        for (field, factor) in factors {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be a positive finite number",
                });
            }
        }

        Ok(())
    }

    /// Derives the sizing of the provided level.
    #[must_use]
    pub fn level_plan(&self, level: u32) -> LevelPlan {
        let level = level.max(1);
        let steps = level - 1;

        let growth = steps / self.slot_growth_levels.max(1);
        let total_slots = self
            .initial_slots
            .saturating_add(growth)
            .min(self.max_slots);

        let reduction = self.spawn_interval_step_ms.saturating_mul(u64::from(steps));
        let interval_ms = self
            .base_spawn_interval_ms
            .saturating_sub(reduction)
            .max(self.min_spawn_interval_ms);

        let spawn_batch = (level / self.spawn_batch_growth_levels.max(1))
            .saturating_add(1)
            .min(self.max_spawn_batch);

        LevelPlan {
            level,
            total_slots,
            base_spawn_interval: Duration::from_millis(interval_ms),
            spawn_batch,
        }
    }

    /// Cadence of the expiry sweep.
    #[must_use]
    pub fn expiry_sweep_interval(&self) -> Duration {
        Duration::from_millis(self.expiry_sweep_interval_ms)
    }

    /// Duration of the provided timed modifier.
    #[must_use]
    pub fn modifier_duration(&self, modifier: Modifier) -> Duration {
        let millis = match modifier {
            Modifier::SlowMotion => self.slow_duration_ms,
            Modifier::Frenzy => self.frenzy_duration_ms,
            Modifier::Frozen => self.freeze_duration_ms,
            Modifier::Repelled => self.repellent_duration_ms,
        };
        Duration::from_millis(millis)
    }

    /// Points granted for catching the provided power-up, before frenzy.
    #[must_use]
    pub fn power_up_points(&self, kind: PowerUpKind) -> u32 {
        match kind {
            PowerUpKind::Broom => self.broom_bonus,
            _ => 0,
        }
    }
}

/// Sizing of a single level derived from [`Tuning::level_plan`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelPlan {
    level: u32,
    total_slots: u32,
    base_spawn_interval: Duration,
    spawn_batch: u32,
}

impl LevelPlan {
    /// Level the plan describes.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Number of slots in the level's grid.
    #[must_use]
    pub const fn total_slots(&self) -> u32 {
        self.total_slots
    }

    /// Spawn cadence before modifiers.
    #[must_use]
    pub const fn base_spawn_interval(&self) -> Duration {
        self.base_spawn_interval
    }

    /// Maximum number of slots opened by one spawn tick.
    #[must_use]
    pub const fn spawn_batch(&self) -> u32 {
        self.spawn_batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_one_uses_base_values() {
        let plan = Tuning::default().level_plan(1);
        assert_eq!(plan.total_slots(), 4);
        assert_eq!(plan.base_spawn_interval(), Duration::from_millis(1500));
        assert_eq!(plan.spawn_batch(), 1);
    }

    #[test]
    fn slots_grow_every_three_levels_up_to_cap() {
        let tuning = Tuning::default();
        assert_eq!(tuning.level_plan(3).total_slots(), 4);
        assert_eq!(tuning.level_plan(4).total_slots(), 5);
        assert_eq!(tuning.level_plan(7).total_slots(), 6);
        assert_eq!(tuning.level_plan(100).total_slots(), 12);
    }

    #[test]
    fn spawn_interval_shrinks_monotonically_to_floor() {
        let tuning = Tuning::default();
        let mut previous = Duration::MAX;
        for level in 1..=60 {
            let interval = tuning.level_plan(level).base_spawn_interval();
            assert!(interval <= previous);
            assert!(interval >= Duration::from_millis(400));
            previous = interval;
        }
        assert_eq!(
            tuning.level_plan(60).base_spawn_interval(),
            Duration::from_millis(400)
        );
    }

    #[test]
    fn spawn_batch_grows_with_level_and_caps_at_three() {
        let tuning = Tuning::default();
        assert_eq!(tuning.level_plan(2).spawn_batch(), 1);
        assert_eq!(tuning.level_plan(3).spawn_batch(), 2);
        assert_eq!(tuning.level_plan(6).spawn_batch(), 3);
        assert_eq!(tuning.level_plan(40).spawn_batch(), 3);
    }

    #[test]
    fn level_zero_is_treated_as_level_one() {
        let tuning = Tuning::default();
        assert_eq!(tuning.level_plan(0), tuning.level_plan(1));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let tuning = Tuning::from_toml_str("frenzy_multiplier = 3\nbroom_bonus = 100\n")
            .expect("tuning parses");
        assert_eq!(tuning.frenzy_multiplier, 3);
        assert_eq!(tuning.broom_bonus, 100);
        assert_eq!(tuning.level_duration_secs, 30);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = Tuning::from_toml_str("frenzy_multipler = 3\n").unwrap_err();
        assert!(matches!(error, TuningError::Parse(_)));
    }

    #[test]
    fn zero_sweep_interval_is_invalid() {
        let error = Tuning::from_toml_str("expiry_sweep_interval_ms = 0\n").unwrap_err();
        assert!(matches!(
            error,
            TuningError::Invalid {
                field: "expiry_sweep_interval_ms",
                ..
            }
        ));
    }

    #[test]
    fn modifier_durations_follow_tuning() {
        let tuning = Tuning::default();
        assert_eq!(
            tuning.modifier_duration(Modifier::Repelled),
            Duration::from_secs(4)
        );
        assert_eq!(tuning.power_up_points(PowerUpKind::Broom), 50);
        assert_eq!(tuning.power_up_points(PowerUpKind::Clock), 0);
    }
}
