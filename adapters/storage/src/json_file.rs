//! Leaderboard stored in a JSON file on disk.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use cat_bin_core::HighScoreBoard;
use tracing::debug;

use crate::{atomic_io::write_text_atomic, decode_board, HighScoreStore, StorageError};

/// Store that keeps the board in a single JSON file.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by the file at `path`; the file need not exist.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&mut self) -> Result<HighScoreBoard, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "high_scores_missing");
                return Ok(HighScoreBoard::new());
            }
            Err(error) => return Err(error.into()),
        };
        Ok(decode_board(&raw, &self.path.display().to_string()))
    }

    fn save(&mut self, board: &HighScoreBoard) -> Result<(), StorageError> {
        let encoded = serde_json::to_string_pretty(board)?;
        write_text_atomic(&self.path, &encoded)?;
        debug!(path = %self.path.display(), entries = board.len(), "high_scores_saved");
        Ok(())
    }
}
