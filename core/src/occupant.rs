//! Occupant kinds and the pure lookup tables keyed by them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Modifier;

/// Transient occupants that trigger an effect when caught.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Clears every open slot and grants a flat bonus.
    Broom,
    /// Adds seconds to the countdown.
    Clock,
    /// Activates slow motion.
    Slow,
    /// Activates the score multiplier.
    Frenzy,
    /// Suspends spawning.
    Freeze,
    /// Clears every open slot and keeps occupants away.
    Repellent,
}

impl PowerUpKind {
    /// Every power-up in table order.
    pub const ALL: [PowerUpKind; 6] = [
        PowerUpKind::Broom,
        PowerUpKind::Clock,
        PowerUpKind::Slow,
        PowerUpKind::Frenzy,
        PowerUpKind::Freeze,
        PowerUpKind::Repellent,
    ];

    /// Timed modifier started by the power-up, if it has one.
    #[must_use]
    pub const fn modifier(self) -> Option<Modifier> {
        match self {
            Self::Broom | Self::Clock => None,
            Self::Slow => Some(Modifier::SlowMotion),
            Self::Frenzy => Some(Modifier::Frenzy),
            Self::Freeze => Some(Modifier::Frozen),
            Self::Repellent => Some(Modifier::Repelled),
        }
    }
}

/// Everything that can appear inside an open slot.
///
/// Cat variants double as scoring tiers; power-ups carry their effect kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OccupantKind {
    /// Ordinary cat.
    Normal,
    /// Quick cat that hides early.
    Ninja,
    /// Rare, valuable cat.
    Golden,
    /// Short-tempered cat.
    Grumpy,
    /// Lingering, low-value cat.
    Sleepy,
    /// Medium-value cat.
    Playful,
    /// Very quick, high-value cat.
    Speedy,
    /// Cat that needs two clicks.
    Sticky,
    /// Power-up occupant.
    PowerUp(PowerUpKind),
}

impl OccupantKind {
    /// Reports whether the occupant is a power-up.
    #[must_use]
    pub const fn is_power_up(self) -> bool {
        matches!(self, Self::PowerUp(_))
    }

    /// Power-up carried by the occupant, if any.
    #[must_use]
    pub const fn power_up(self) -> Option<PowerUpKind> {
        match self {
            Self::PowerUp(kind) => Some(kind),
            _ => None,
        }
    }

    /// Points awarded for catching the occupant before modifiers.
    ///
    /// Power-ups report zero here; their score delta comes from the tuning.
    #[must_use]
    pub const fn base_points(self) -> u32 {
        match self {
            Self::Normal => 10,
            Self::Ninja => 40,
            Self::Speedy => 50,
            Self::Golden => 150,
            Self::Sticky => 30,
            Self::Grumpy => 30,
            Self::Playful => 20,
            Self::Sleepy => 5,
            Self::PowerUp(_) => 0,
        }
    }

    /// Factor applied to the spawn interval to obtain the expiry window.
    #[must_use]
    pub const fn expiry_multiplier(self) -> f64 {
        match self {
            Self::Ninja => 0.6,
            Self::Speedy => 0.4,
            Self::Grumpy => 0.8,
            Self::Sleepy => 3.5,
            Self::Playful => 1.2,
            Self::Golden => 0.9,
            Self::Sticky => 2.5,
            Self::Normal | Self::PowerUp(_) => 1.5,
        }
    }

    /// Clicks required to catch a freshly spawned occupant.
    #[must_use]
    pub const fn initial_hits(self) -> u8 {
        match self {
            Self::Sticky => 2,
            _ => 1,
        }
    }
}

/// Computes how long an occupant may stay visible before it expires.
///
/// `slow_expiry_factor` stretches the base interval while slow motion is active.
#[must_use]
pub fn expiry_window(
    kind: OccupantKind,
    base_interval: Duration,
    slow_motion: bool,
    slow_expiry_factor: f64,
) -> Duration {
    let effective_base = if slow_motion {
        scale_duration(base_interval, slow_expiry_factor)
    } else {
        base_interval
    };
    scale_duration(effective_base, kind.expiry_multiplier())
}

/// Multiplies a duration by a factor, rounding to the nearest nanosecond.
///
/// Negative or NaN factors collapse to zero.
#[must_use]
pub fn scale_duration(duration: Duration, factor: f64) -> Duration {
    if factor.is_nan() || factor <= 0.0 {
        return Duration::ZERO;
    }
    let nanos = (duration.as_nanos() as f64 * factor).round();
    if nanos >= u64::MAX as f64 {
        Duration::from_nanos(u64::MAX)
    } else {
        Duration::from_nanos(nanos as u64)
    }
}

#[derive(Clone, Copy, Debug)]
struct OddsEntry {
    upper: f64,
    kind: OccupantKind,
    min_level: u32,
}

impl OddsEntry {
    const fn open(upper: f64, kind: OccupantKind) -> Self {
        Self {
            upper,
            kind,
            min_level: 1,
        }
    }

    const fn gated(upper: f64, kind: OccupantKind, min_level: u32) -> Self {
        Self {
            upper,
            kind,
            min_level,
        }
    }
}

const OCCUPANT_ODDS: [OddsEntry; 14] = [
    OddsEntry::open(0.03, OccupantKind::PowerUp(PowerUpKind::Broom)),
    OddsEntry::open(0.06, OccupantKind::PowerUp(PowerUpKind::Clock)),
    OddsEntry::open(0.09, OccupantKind::PowerUp(PowerUpKind::Slow)),
    OddsEntry::open(0.12, OccupantKind::PowerUp(PowerUpKind::Frenzy)),
    OddsEntry::open(0.15, OccupantKind::PowerUp(PowerUpKind::Freeze)),
    OddsEntry::open(0.18, OccupantKind::PowerUp(PowerUpKind::Repellent)),
    OddsEntry::gated(0.23, OccupantKind::Golden, 3),
    OddsEntry::gated(0.31, OccupantKind::Ninja, 2),
    OddsEntry::open(0.38, OccupantKind::Speedy),
    OddsEntry::open(0.45, OccupantKind::Sticky),
    OddsEntry::open(0.55, OccupantKind::Grumpy),
    OddsEntry::open(0.65, OccupantKind::Sleepy),
    OddsEntry::open(0.80, OccupantKind::Playful),
    OddsEntry::open(1.00, OccupantKind::Normal),
];

/// Maps a level and a uniform draw in `[0, 1)` to an occupant kind.
///
/// Entries are scanned in table order and the first one whose cut point lies
/// above `draw` wins. Level-gated entries that are locked fall through to the
/// next entry. Draws outside the unit interval (including NaN) still resolve:
/// negative draws hit the first entry and everything else ends at
/// [`OccupantKind::Normal`].
#[must_use]
pub fn pick_occupant_kind(level: u32, draw: f64) -> OccupantKind {
    OCCUPANT_ODDS
        .iter()
        .find(|entry| draw < entry.upper && level >= entry.min_level)
        .map_or(OccupantKind::Normal, |entry| entry.kind)
}
