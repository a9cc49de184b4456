#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawning system responsible for revealing occupants in closed slots.

use std::time::Duration;

use cat_bin_core::{
    pick_occupant_kind, scale_duration, Command, Event, GameStatus, LevelPlan, Modifier,
    ModifierSet, SlotId, SlotView,
};
use rand::{seq::SliceRandom, Rng};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    slow_spawn_factor: f64,
}

impl Config {
    /// Creates a new configuration using the slow-motion cadence factor.
    #[must_use]
    pub const fn new(slow_spawn_factor: f64) -> Self {
        Self { slow_spawn_factor }
    }
}

/// Pure system that emits spawn commands on the level's cadence.
///
/// Time only accrues from [`Event::TimeAdvanced`], so the cadence is suspended
/// together with the world. A fresh level restarts the cadence from zero.
#[derive(Debug)]
pub struct Spawning<R> {
    slow_spawn_factor: f64,
    accumulator: Duration,
    rng: R,
}

impl<R: Rng> Spawning<R> {
    /// Creates a new spawning system drawing from the supplied random source.
    #[must_use]
    pub fn new(config: Config, rng: R) -> Self {
        Self {
            slow_spawn_factor: config.slow_spawn_factor,
            accumulator: Duration::ZERO,
            rng,
        }
    }

    /// Consumes events and immutable views to emit spawn commands.
    ///
    /// Several ticks falling due in one call, including ticks banked under a
    /// longer interval that has since shortened, collapse into a single batch.
    pub fn handle(
        &mut self,
        events: &[Event],
        status: GameStatus,
        plan: LevelPlan,
        modifiers: ModifierSet,
        slots: &SlotView,
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

        let interval = self.spawn_interval(plan, modifiers);
        if interval.is_zero() || self.accumulator < interval {
            return;
        }
        while self.accumulator >= interval {
            self.accumulator -= interval;
        }
        if modifiers.suspends_spawning() {
            return;
        }
        self.spawn_tick(plan, slots.closed_slots(), out);
    }

    /// Interval between spawn ticks under the active modifiers.
    #[must_use]
    pub fn spawn_interval(&self, plan: LevelPlan, modifiers: ModifierSet) -> Duration {
        let base = plan.base_spawn_interval();
        if modifiers.contains(Modifier::SlowMotion) {
            scale_duration(base, self.slow_spawn_factor)
        } else {
            base
        }
    }

    fn spawn_tick(&mut self, plan: LevelPlan, mut closed: Vec<SlotId>, out: &mut Vec<Command>) {
        let batch = usize::try_from(plan.spawn_batch()).unwrap_or(usize::MAX);
        let (chosen, _) = closed.partial_shuffle(&mut self.rng, batch);

        for slot in chosen.iter().copied() {
            let kind = pick_occupant_kind(plan.level(), self.rng.gen::<f64>());
            out.push(Command::OpenSlot { slot, kind });
        }
    }
}
