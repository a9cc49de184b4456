#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Cat Bin.
//!
//! The world owns the slot grid, the score/level/life state machine and the
//! deadlines of timed modifiers. Every mutation goes through [`apply`], which
//! processes one command as an atomic unit and reports the outcome as events.
//! Simulation time only advances while the game is playing, so pausing
//! suspends the countdown, modifier deadlines and every system cadence driven
//! by [`Event::TimeAdvanced`].

mod clicks;
mod modifiers;
mod power_ups;
mod slots;

use std::time::Duration;

use cat_bin_core::{
    CloseReason, Command, Event, GameStatus, LevelPlan, SlotId, Tuning, WELCOME_BANNER,
};
use tracing::{debug, info};

use self::{modifiers::ModifierTimers, slots::SlotGrid};

const COUNTDOWN_STEP: Duration = Duration::from_secs(1);

/// Represents the authoritative Cat Bin world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    tuning: Tuning,
    status: GameStatus,
    plan: LevelPlan,
    score: u64,
    lives: u32,
    time_remaining: u32,
    muted: bool,
    slots: SlotGrid,
    modifiers: ModifierTimers,
    clock: Duration,
    countdown: Duration,
}

impl World {
    /// Creates a new world in the menu using the default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tuning(Tuning::default())
    }

    /// Creates a new world in the menu using the provided tuning.
    #[must_use]
    pub fn with_tuning(tuning: Tuning) -> Self {
        let plan = tuning.level_plan(1);
        Self {
            banner: WELCOME_BANNER,
            status: GameStatus::Menu,
            score: 0,
            lives: tuning.starting_lives,
            time_remaining: tuning.level_duration_secs,
            muted: false,
            slots: SlotGrid::new(plan.total_slots()),
            modifiers: ModifierTimers::default(),
            clock: Duration::ZERO,
            countdown: Duration::ZERO,
            plan,
            tuning,
        }
    }

    fn transition(&mut self, to: GameStatus, out_events: &mut Vec<Event>) {
        let from = self.status;
        self.status = to;
        info!(?from, ?to, level = self.plan.level(), score = self.score, "status_changed");
        out_events.push(Event::StatusChanged { from, to });
    }

    fn begin_level(&mut self, level: u32, out_events: &mut Vec<Event>) {
        self.plan = self.tuning.level_plan(level);
        self.slots = SlotGrid::new(self.plan.total_slots());
        self.modifiers.clear();
        self.time_remaining = self.tuning.level_duration_secs;
        self.countdown = Duration::ZERO;

        info!(
            level = self.plan.level(),
            slots = self.plan.total_slots(),
            spawn_interval = ?self.plan.base_spawn_interval(),
            lives = self.lives,
            "level_started"
        );
        out_events.push(Event::LevelStarted {
            level: self.plan.level(),
            total_slots: self.plan.total_slots(),
            base_spawn_interval: self.plan.base_spawn_interval(),
        });
        out_events.push(Event::TimeRemainingChanged {
            seconds: self.time_remaining,
        });
        self.transition(GameStatus::Playing, out_events);
    }

    fn advance_clock(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.clock = self.clock.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        for modifier in self.modifiers.expire_due(self.clock) {
            out_events.push(Event::ModifierExpired { modifier });
        }

        self.countdown = self.countdown.saturating_add(dt);
        while self.countdown >= COUNTDOWN_STEP && self.status.is_playing() {
            self.countdown -= COUNTDOWN_STEP;
            self.time_remaining = self.time_remaining.saturating_sub(1);
            out_events.push(Event::TimeRemainingChanged {
                seconds: self.time_remaining,
            });
            if self.time_remaining == 0 {
                out_events.push(Event::LevelWon {
                    level: self.plan.level(),
                    score: self.score,
                });
                self.transition(GameStatus::LevelWon, out_events);
            }
        }
    }

    fn close_slot(&mut self, slot: SlotId, reason: CloseReason, out_events: &mut Vec<Event>) {
        let Some(occupant) = self.slots.close(slot) else {
            return;
        };
        out_events.push(Event::SlotClosed {
            slot,
            kind: occupant.kind,
            reason,
        });

        if reason == CloseReason::Expired && !occupant.kind.is_power_up() {
            self.lose_life(out_events);
        }
    }

    fn lose_life(&mut self, out_events: &mut Vec<Event>) {
        self.lives = self.lives.saturating_sub(1);
        out_events.push(Event::LifeLost { lives: self.lives });

        if self.lives == 0 {
            info!(level = self.plan.level(), score = self.score, "game_over");
            out_events.push(Event::GameOver {
                level: self.plan.level(),
                score: self.score,
            });
            self.transition(GameStatus::GameOver, out_events);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state atomically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartGame => match world.status {
            GameStatus::Menu | GameStatus::Paused | GameStatus::GameOver => {
                world.score = 0;
                world.lives = world.tuning.starting_lives;
                world.begin_level(1, out_events);
            }
            status => reject(&command, status),
        },
        Command::NextLevel => match world.status {
            GameStatus::LevelWon => {
                let next = world.plan.level().saturating_add(1);
                world.begin_level(next, out_events);
            }
            status => reject(&command, status),
        },
        Command::Pause => match world.status {
            GameStatus::Playing => world.transition(GameStatus::Paused, out_events),
            status => reject(&command, status),
        },
        Command::Resume => match world.status {
            GameStatus::Paused => world.transition(GameStatus::Playing, out_events),
            status => reject(&command, status),
        },
        Command::QuitToMenu => match world.status {
            GameStatus::Paused | GameStatus::LevelWon | GameStatus::GameOver => {
                world.modifiers.clear();
                world.transition(GameStatus::Menu, out_events);
            }
            status => reject(&command, status),
        },
        Command::SetMuted { muted } => {
            if world.muted != muted {
                world.muted = muted;
                out_events.push(Event::MuteChanged { muted });
            }
        }
        Command::Tick { dt } => {
            if world.status.is_playing() && !dt.is_zero() {
                world.advance_clock(dt, out_events);
            }
        }
        Command::OpenSlot { slot, kind } => {
            if !world.status.is_playing() {
                return reject(&command, world.status);
            }
            if world.modifiers.active().suspends_spawning() {
                debug!(slot = slot.get(), "spawn_suppressed");
                return;
            }
            if world.slots.open(slot, kind, world.clock) {
                out_events.push(Event::OccupantSpawned { slot, kind });
            } else {
                debug!(slot = slot.get(), "spawn_rejected");
            }
        }
        Command::CloseSlot { slot, reason } => {
            if world.status.is_playing() {
                world.close_slot(slot, reason, out_events);
            } else {
                reject(&command, world.status);
            }
        }
        Command::ClickSlot { slot } => clicks::resolve(world, slot, out_events),
    }
}

fn reject(command: &Command, status: GameStatus) {
    debug!(?command, ?status, "command_ignored");
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use cat_bin_core::{GameStatus, LevelPlan, Modifier, ModifierSet, SlotView, Tuning};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(world: &World) -> GameStatus {
        world.status
    }

    /// Tuning the world was created with.
    #[must_use]
    pub fn tuning(world: &World) -> &Tuning {
        &world.tuning
    }

    /// Sizing of the current level.
    #[must_use]
    pub fn level_plan(world: &World) -> LevelPlan {
        world.plan
    }

    /// Current level number.
    #[must_use]
    pub fn level(world: &World) -> u32 {
        world.plan.level()
    }

    /// Current score.
    #[must_use]
    pub fn score(world: &World) -> u64 {
        world.score
    }

    /// Lives left.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.lives
    }

    /// Whole seconds left in the level.
    #[must_use]
    pub fn time_remaining(world: &World) -> u32 {
        world.time_remaining
    }

    /// Whether presentation audio is silenced.
    #[must_use]
    pub fn muted(world: &World) -> bool {
        world.muted
    }

    /// Simulation clock; it only advances while playing.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Captures a read-only view of the slot grid.
    #[must_use]
    pub fn slot_view(world: &World) -> SlotView {
        SlotView::from_snapshots(world.slots.snapshots())
    }

    /// Set of running modifiers.
    #[must_use]
    pub fn active_modifiers(world: &World) -> ModifierSet {
        world.modifiers.active()
    }

    /// Time left before a running modifier lapses.
    #[must_use]
    pub fn modifier_remaining(world: &World, modifier: Modifier) -> Option<Duration> {
        world
            .modifiers
            .deadline(modifier)
            .map(|deadline| deadline.saturating_sub(world.clock))
    }
}
