#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Cat Bin engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to. Systems consume event streams, query immutable snapshots such as
//! [`SlotView`], and respond exclusively with new command batches.

mod occupant;
mod scores;
mod tuning;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use occupant::{
    expiry_window, pick_occupant_kind, scale_duration, OccupantKind, PowerUpKind,
};
pub use scores::{
    HighScore, HighScoreBoard, DEFAULT_PLAYER_NAME, MAX_HIGH_SCORES, MAX_NAME_CHARS,
};
pub use tuning::{LevelPlan, Tuning, TuningError};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Cat Bin.";

/// Lifecycle status of a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Initial state shown before a game starts.
    Menu,
    /// Active gameplay where every tick process runs.
    Playing,
    /// Gameplay suspended by the player; all timers are frozen.
    Paused,
    /// The countdown reached zero and the level was completed.
    LevelWon,
    /// The player ran out of lives.
    GameOver,
}

impl GameStatus {
    /// Reports whether gameplay ticks should be processed in this status.
    #[must_use]
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Starts a fresh game at level one, discarding score and lives.
    StartGame,
    /// Advances from a won level into the next one.
    NextLevel,
    /// Suspends an active level.
    Pause,
    /// Resumes a paused level.
    Resume,
    /// Abandons the current game and returns to the menu.
    QuitToMenu,
    /// Updates the player's mute preference.
    SetMuted {
        /// Whether presentation audio should be silenced.
        muted: bool,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Reveals an occupant inside a closed slot.
    OpenSlot {
        /// Slot that should reveal the occupant.
        slot: SlotId,
        /// Occupant placed into the slot.
        kind: OccupantKind,
    },
    /// Removes the occupant from an open slot without awarding points.
    CloseSlot {
        /// Slot that should close.
        slot: SlotId,
        /// Why the slot is being closed.
        reason: CloseReason,
    },
    /// Registers a player click against a slot.
    ClickSlot {
        /// Slot the player clicked.
        slot: SlotId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that the game transitioned between two statuses.
    StatusChanged {
        /// Status that was active before the transition.
        from: GameStatus,
        /// Status that became active.
        to: GameStatus,
    },
    /// Announces that a level was initialised with a fresh slot grid.
    LevelStarted {
        /// Level number that started.
        level: u32,
        /// Number of slots in the new grid.
        total_slots: u32,
        /// Spawn cadence associated with the level.
        base_spawn_interval: Duration,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Reports the countdown after it changed.
    TimeRemainingChanged {
        /// Whole seconds left in the level.
        seconds: u32,
    },
    /// Confirms that an occupant appeared in a slot.
    OccupantSpawned {
        /// Slot that opened.
        slot: SlotId,
        /// Occupant revealed by the slot.
        kind: OccupantKind,
    },
    /// Reports a click received during play, whether or not it hit anything.
    Clicked {
        /// Slot the player clicked.
        slot: SlotId,
    },
    /// Confirms that a click landed on an open slot.
    SlotHit {
        /// Slot that was clicked.
        slot: SlotId,
        /// Hits still required before the occupant is caught.
        hits_remaining: u8,
    },
    /// Confirms that the player caught an occupant with a final hit.
    OccupantCaught {
        /// Slot the occupant was caught in.
        slot: SlotId,
        /// Occupant that was caught.
        kind: OccupantKind,
        /// Points awarded for the catch after modifiers.
        points: u64,
    },
    /// Confirms that a slot closed and its occupant left the grid.
    SlotClosed {
        /// Slot that closed.
        slot: SlotId,
        /// Occupant that was removed.
        kind: OccupantKind,
        /// Why the slot closed.
        reason: CloseReason,
    },
    /// Reports that the player lost a life.
    LifeLost {
        /// Lives left after the loss.
        lives: u32,
    },
    /// Reports that the score increased.
    ScoreChanged {
        /// Score after the increase.
        score: u64,
        /// Points added by the triggering action.
        delta: u64,
    },
    /// Announces that a power-up took effect.
    PowerUpActivated {
        /// Power-up that was activated.
        kind: PowerUpKind,
    },
    /// Announces that a timed modifier became active or had its deadline restarted.
    ModifierActivated {
        /// Modifier that is active.
        modifier: Modifier,
        /// Simulation time at which the modifier lapses.
        expires_at: Duration,
    },
    /// Announces that a timed modifier lapsed.
    ModifierExpired {
        /// Modifier that is no longer active.
        modifier: Modifier,
    },
    /// Announces that the countdown completed the level.
    LevelWon {
        /// Level that was completed.
        level: u32,
        /// Score at completion.
        score: u64,
    },
    /// Announces that the final life was lost.
    GameOver {
        /// Level reached.
        level: u32,
        /// Final score.
        score: u64,
    },
    /// Reports that the mute preference changed.
    MuteChanged {
        /// Whether presentation audio is silenced.
        muted: bool,
    },
}

/// Reason attached to a slot closing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CloseReason {
    /// The player caught the occupant.
    Caught,
    /// The occupant stayed visible for longer than its expiry window.
    Expired,
    /// A repellent forced the occupant out.
    Repelled,
    /// A broom cleared the grid.
    Swept,
}

/// Game-wide timed effect unlocked by power-ups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Modifier {
    /// Spawns slow down and occupants stay visible longer.
    SlowMotion,
    /// Score gains are multiplied.
    Frenzy,
    /// Spawning is suspended.
    Frozen,
    /// Spawning is suspended and open slots are force-closed.
    Repelled,
}

impl Modifier {
    /// Every modifier in a stable order.
    pub const ALL: [Modifier; 4] = [
        Modifier::SlowMotion,
        Modifier::Frenzy,
        Modifier::Frozen,
        Modifier::Repelled,
    ];

    const fn bit(self) -> u8 {
        match self {
            Self::SlowMotion => 0b0001,
            Self::Frenzy => 0b0010,
            Self::Frozen => 0b0100,
            Self::Repelled => 0b1000,
        }
    }
}

/// Compact read-only set of currently active modifiers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ModifierSet {
    bits: u8,
}

impl ModifierSet {
    /// Creates an empty modifier set.
    #[must_use]
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Returns a copy of the set with the provided modifier included.
    #[must_use]
    pub const fn with(self, modifier: Modifier) -> Self {
        Self {
            bits: self.bits | modifier.bit(),
        }
    }

    /// Reports whether the modifier is active.
    #[must_use]
    pub const fn contains(&self, modifier: Modifier) -> bool {
        self.bits & modifier.bit() != 0
    }

    /// Reports whether no modifier is active.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Reports whether spawn ticks should be skipped.
    #[must_use]
    pub const fn suspends_spawning(&self) -> bool {
        self.contains(Modifier::Frozen) || self.contains(Modifier::Repelled)
    }

    /// Iterates over the active modifiers in stable order.
    pub fn iter(&self) -> impl Iterator<Item = Modifier> + '_ {
        Modifier::ALL
            .into_iter()
            .filter(|modifier| self.contains(*modifier))
    }
}

impl FromIterator<Modifier> for ModifierSet {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |set, modifier| set.with(modifier))
    }
}

/// Stable identifier of a slot within the current level's grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(u32);

impl SlotId {
    /// Creates a new slot identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Immutable representation of an occupant visible in a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OccupantSnapshot {
    /// Kind of occupant revealed.
    pub kind: OccupantKind,
    /// Simulation time at which the occupant appeared.
    pub spawned_at: Duration,
    /// Clicks still required to catch the occupant.
    pub hits_remaining: u8,
}

/// Immutable representation of a single slot used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotSnapshot {
    /// Identifier of the slot.
    pub id: SlotId,
    /// Occupant currently visible, if the slot is open.
    pub occupant: Option<OccupantSnapshot>,
}

impl SlotSnapshot {
    /// Reports whether the slot currently shows an occupant.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.occupant.is_some()
    }

    /// Clicks required to catch the occupant; closed slots report one.
    #[must_use]
    pub fn hits_remaining(&self) -> u8 {
        self.occupant.map_or(1, |occupant| occupant.hits_remaining)
    }
}

/// Read-only snapshot describing every slot in the grid.
#[derive(Clone, Debug, Default)]
pub struct SlotView {
    snapshots: Vec<SlotSnapshot>,
}

impl SlotView {
    /// Creates a new slot view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<SlotSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured slot snapshots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &SlotSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot for a slot.
    #[must_use]
    pub fn get(&self, slot: SlotId) -> Option<&SlotSnapshot> {
        self.snapshots
            .binary_search_by_key(&slot, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Identifiers of every slot without an occupant, in slot order.
    #[must_use]
    pub fn closed_slots(&self) -> Vec<SlotId> {
        self.snapshots
            .iter()
            .filter(|snapshot| !snapshot.is_open())
            .map(|snapshot| snapshot.id)
            .collect()
    }

    /// Number of slots currently showing an occupant.
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.snapshots
            .iter()
            .filter(|snapshot| snapshot.is_open())
            .count()
    }

    /// Total number of slots in the grid.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the grid has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<SlotSnapshot> {
        self.snapshots
    }
}
