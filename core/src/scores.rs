//! High-score records and the capped leaderboard that orders them.

use serde::{Deserialize, Serialize};

/// Number of entries kept on the leaderboard.
pub const MAX_HIGH_SCORES: usize = 5;

/// Longest player name stored, measured in characters.
pub const MAX_NAME_CHARS: usize = 15;

/// Name recorded when the player submits a blank name.
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// Single leaderboard entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    /// Player name, at most [`MAX_NAME_CHARS`] characters.
    pub name: String,
    /// Final score.
    pub score: u64,
    /// Human-readable date the score was recorded.
    pub date: String,
}

impl HighScore {
    /// Creates an entry, trimming and truncating the name.
    #[must_use]
    pub fn new(name: &str, score: u64, date: impl Into<String>) -> Self {
        Self {
            name: sanitize_name(name),
            score,
            date: date.into(),
        }
    }
}

/// Leaderboard ordered by descending score and capped at [`MAX_HIGH_SCORES`].
///
/// Serialized as a plain array of entries. Deserialization goes through
/// [`HighScoreBoard::from_entries`], so decoded boards are always normalised.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<HighScore>", into = "Vec<HighScore>")]
pub struct HighScoreBoard {
    entries: Vec<HighScore>,
}

impl From<Vec<HighScore>> for HighScoreBoard {
    fn from(entries: Vec<HighScore>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<HighScoreBoard> for Vec<HighScore> {
    fn from(board: HighScoreBoard) -> Self {
        board.entries
    }
}

impl HighScoreBoard {
    /// Creates an empty leaderboard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a leaderboard from arbitrary entries, restoring its invariants.
    ///
    /// Ties keep their original relative order.
    #[must_use]
    pub fn from_entries(mut entries: Vec<HighScore>) -> Self {
        for entry in &mut entries {
            entry.name = sanitize_name(&entry.name);
        }
        entries.sort_by(|left, right| right.score.cmp(&left.score));
        entries.truncate(MAX_HIGH_SCORES);
        Self { entries }
    }

    /// Entries from best to worst.
    #[must_use]
    pub fn entries(&self) -> &[HighScore] {
        &self.entries
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no score has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reports whether the score would earn a place on the board.
    #[must_use]
    pub fn qualifies(&self, score: u64) -> bool {
        self.entries.len() < MAX_HIGH_SCORES
            || self.entries.iter().any(|entry| entry.score < score)
    }

    /// Records an entry and returns its zero-based rank if it stayed on the board.
    ///
    /// A new entry ranks below existing entries with the same score.
    pub fn record(&mut self, entry: HighScore) -> Option<usize> {
        let rank = self
            .entries
            .iter()
            .position(|existing| existing.score < entry.score)
            .unwrap_or(self.entries.len());
        if rank >= MAX_HIGH_SCORES {
            return None;
        }
        self.entries.insert(rank, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }
}

fn sanitize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return DEFAULT_PLAYER_NAME.to_owned();
    }
    trimmed.chars().take(MAX_NAME_CHARS).collect()
}
