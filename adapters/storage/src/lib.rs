#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! High-score persistence adapters.
//!
//! Boards are stored as a JSON array of `{name, score, date}` records. Data
//! that cannot be decoded is discarded with a warning so a damaged file never
//! prevents the game from starting.

mod atomic_io;
mod json_file;

use std::collections::HashMap;

use cat_bin_core::HighScoreBoard;
use thiserror::Error;
use tracing::warn;

pub use json_file::JsonFileStore;

/// Key under which [`MemoryStore`] keeps the board.
pub const HIGH_SCORES_KEY: &str = "catbin_highscores";

/// Errors raised while reading or writing a high-score board.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing medium could not be accessed.
    #[error("high-score storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    /// The board could not be encoded.
    #[error("could not encode high scores: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Persistent home of the leaderboard.
pub trait HighScoreStore {
    /// Loads the stored board; missing or corrupt data yields an empty board.
    fn load(&mut self) -> Result<HighScoreBoard, StorageError>;

    /// Replaces the stored board.
    fn save(&mut self, board: &HighScoreBoard) -> Result<(), StorageError>;
}

impl<S: HighScoreStore + ?Sized> HighScoreStore for Box<S> {
    fn load(&mut self) -> Result<HighScoreBoard, StorageError> {
        (**self).load()
    }

    fn save(&mut self, board: &HighScoreBoard) -> Result<(), StorageError> {
        (**self).save(board)
    }
}

/// In-memory key-value store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value stored under `key`.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Overwrites the raw value stored under `key`.
    pub fn set_raw(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let _ = self.values.insert(key.into(), value.into());
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&mut self) -> Result<HighScoreBoard, StorageError> {
        Ok(self
            .raw(HIGH_SCORES_KEY)
            .map_or_else(HighScoreBoard::new, |raw| decode_board(raw, HIGH_SCORES_KEY)))
    }

    fn save(&mut self, board: &HighScoreBoard) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(board)?;
        self.set_raw(HIGH_SCORES_KEY, encoded);
        Ok(())
    }
}

pub(crate) fn decode_board(raw: &str, source: &str) -> HighScoreBoard {
    match serde_json::from_str::<HighScoreBoard>(raw) {
        Ok(board) => board,
        Err(error) => {
            warn!(source, %error, "high_scores_corrupt");
            HighScoreBoard::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cat_bin_core::HighScore;

    #[test]
    fn empty_store_loads_empty_board() {
        let mut store = MemoryStore::new();
        assert!(store.load().expect("load").is_empty());
    }

    #[test]
    fn corrupt_value_loads_empty_board() {
        let mut store = MemoryStore::new();
        store.set_raw(HIGH_SCORES_KEY, "{not json");
        assert!(store.load().expect("load").is_empty());
    }

    #[test]
    fn saved_board_is_a_plain_json_array() {
        let mut store = MemoryStore::new();
        let mut board = HighScoreBoard::new();
        let _ = board.record(HighScore::new("Mia", 120, "2024-05-01"));
        store.save(&board).expect("save");

        let raw = store.raw(HIGH_SCORES_KEY).expect("stored");
        assert_eq!(raw, r#"[{"name":"Mia","score":120,"date":"2024-05-01"}]"#);
        assert_eq!(store.load().expect("load"), board);
    }

    #[test]
    fn oversized_stored_lists_are_normalised() {
        let mut store = MemoryStore::new();
        let entries: Vec<String> = (0..8)
            .map(|score| format!(r#"{{"name":"p{score}","score":{score},"date":"d"}}"#))
            .collect();
        store.set_raw(HIGH_SCORES_KEY, format!("[{}]", entries.join(",")));

        let board = store.load().expect("load");
        let scores: Vec<u64> = board.entries().iter().map(|entry| entry.score).collect();
        assert_eq!(scores, vec![7, 6, 5, 4, 3]);
    }
}
