#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Single-threaded driver that runs a Cat Bin game against a clock.
//!
//! A [`Session`] owns the world, the spawning and expiry systems, the flavor
//! text provider and the high-score store. Each call to [`Session::pump`]
//! reads the clock, slices the elapsed time into bounded ticks and, for every
//! tick, applies it to the world, runs spawning, then runs expiry against the
//! updated grid. Player actions first bring the simulation up to date and are
//! then applied as a single command. Time that elapses while the game is not
//! playing is discarded, so nothing bursts on resume.

mod clock;

use std::time::Duration;

use cat_bin_core::{Command, Event, GameStatus, HighScore, HighScoreBoard, SlotId, Tuning};
use cat_bin_storage::HighScoreStore;
use cat_bin_system_encouragement::{Encouragement, EncouragementSource};
use cat_bin_system_expiry::{self as expiry, Expiry};
use cat_bin_system_spawning::{self as spawning, Spawning};
use cat_bin_world::{self as world, query, World};
use rand::Rng;
use tracing::{debug, info, warn};

pub use clock::{Clock, ManualClock, MonotonicClock};

/// Longest slice of time simulated by a single tick.
pub const MAX_TICK: Duration = Duration::from_millis(50);

/// Game session wired to a clock, a random source and external services.
pub struct Session<C, R> {
    world: World,
    clock: C,
    last_reading: Duration,
    spawning: Spawning<R>,
    expiry: Expiry,
    encouragement: Encouragement<Box<dyn EncouragementSource>>,
    store: Box<dyn HighScoreStore>,
    high_scores: HighScoreBoard,
    flavor_text: Option<String>,
    pending: Vec<Event>,
}

impl<C: Clock, R: Rng> Session<C, R> {
    /// Creates a session in the menu and loads the stored leaderboard.
    pub fn new(
        tuning: Tuning,
        clock: C,
        rng: R,
        mut store: Box<dyn HighScoreStore>,
        encouragement: Box<dyn EncouragementSource>,
        locale: impl Into<String>,
    ) -> Self {
        let high_scores = store.load().unwrap_or_else(|error| {
            warn!(%error, "high_scores_load_failed");
            HighScoreBoard::new()
        });
        let spawning = Spawning::new(spawning::Config::new(tuning.slow_spawn_factor), rng);
        let expiry = Expiry::new(expiry::Config::new(
            tuning.expiry_sweep_interval(),
            tuning.slow_expiry_factor,
        ));
        let encouragement = Encouragement::new(encouragement, locale);
        let last_reading = clock.now();

        info!(
            locale = encouragement.locale(),
            high_scores = high_scores.len(),
            "session_created"
        );

        Self {
            world: World::with_tuning(tuning),
            clock,
            last_reading,
            spawning,
            expiry,
            encouragement,
            store,
            high_scores,
            flavor_text: None,
            pending: Vec::new(),
        }
    }

    /// Read-only access to the world for queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        query::status(&self.world)
    }

    /// Leaderboard loaded at start and updated by submissions.
    #[must_use]
    pub fn high_scores(&self) -> &HighScoreBoard {
        &self.high_scores
    }

    /// Flavor line produced for the most recently completed level.
    #[must_use]
    pub fn flavor_text(&self) -> Option<&str> {
        self.flavor_text.as_deref()
    }

    /// Takes every event produced since the previous call.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.pending)
    }

    /// Starts a fresh game, also valid from pause and game over.
    pub fn start_game(&mut self) {
        self.flavor_text = None;
        self.submit(Command::StartGame);
    }

    /// Advances from a won level into the next one.
    pub fn next_level(&mut self) {
        self.flavor_text = None;
        self.submit(Command::NextLevel);
    }

    /// Suspends the running level.
    pub fn pause(&mut self) {
        self.submit(Command::Pause);
    }

    /// Resumes a paused level.
    pub fn resume(&mut self) {
        self.submit(Command::Resume);
    }

    /// Abandons the current game.
    pub fn quit_to_menu(&mut self) {
        self.submit(Command::QuitToMenu);
    }

    /// Updates the mute preference.
    pub fn set_muted(&mut self, muted: bool) {
        self.submit(Command::SetMuted { muted });
    }

    /// Registers a player click on `slot`.
    pub fn click(&mut self, slot: SlotId) {
        self.submit(Command::ClickSlot { slot });
    }

    /// Records the final score under `name` and returns to the menu.
    ///
    /// Only valid after game over. Returns the rank earned on the board, if
    /// any. Scores that cannot place leave the store untouched. A failed write
    /// is logged and the in-memory board is kept.
    pub fn submit_high_score(&mut self, name: &str, date: impl Into<String>) -> Option<usize> {
        if self.status() != GameStatus::GameOver {
            return None;
        }

        let score = query::score(&self.world);
        let rank = if self.high_scores.qualifies(score) {
            let entry = HighScore::new(name, score, date);
            info!(name = %entry.name, score, "high_score_submitted");
            let rank = self.high_scores.record(entry);
            if let Err(error) = self.store.save(&self.high_scores) {
                warn!(%error, "high_scores_save_failed");
            }
            rank
        } else {
            debug!(score, "high_score_not_qualified");
            None
        };

        self.submit(Command::QuitToMenu);
        rank
    }

    /// Brings the simulation up to the current clock reading.
    pub fn pump(&mut self) {
        let now = self.clock.now();
        let mut remaining = now.saturating_sub(self.last_reading);
        self.last_reading = now;

        while !remaining.is_zero() && self.status().is_playing() {
            let dt = remaining.min(MAX_TICK);
            remaining -= dt;

            let mut events = Vec::new();
            world::apply(&mut self.world, Command::Tick { dt }, &mut events);
            self.react(events);
        }
    }

    fn submit(&mut self, command: Command) {
        self.pump();
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.react(events);
    }

    /// Runs spawning then expiry over a batch of world events.
    fn react(&mut self, events: Vec<Event>) {
        if events.is_empty() {
            return;
        }

        let mut produced = Vec::new();
        let mut commands = Vec::new();
        self.spawning.handle(
            &events,
            query::status(&self.world),
            query::level_plan(&self.world),
            query::active_modifiers(&self.world),
            &query::slot_view(&self.world),
            &mut commands,
        );
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, &mut produced);
        }

        self.expiry.handle(
            &events,
            query::status(&self.world),
            query::level_plan(&self.world),
            query::active_modifiers(&self.world),
            &query::slot_view(&self.world),
            query::clock(&self.world),
            &mut commands,
        );
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, &mut produced);
        }

        let mut published = events;
        published.extend(produced);
        if let Some(line) = self.encouragement.handle(&published) {
            self.flavor_text = Some(line);
        }
        self.pending.extend(published);
    }
}
