#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Flavor-text system that reacts to completed levels.
//!
//! Text comes from a pluggable [`EncouragementSource`]. A failing or silent
//! source never blocks the level transition: the system substitutes the
//! locale's default line instead.

mod table;

use cat_bin_core::Event;
use thiserror::Error;
use tracing::warn;

pub use table::StaticEncouragement;

/// Locale used when the requested one is unknown.
pub const DEFAULT_LOCALE: &str = "en";

/// Context handed to an encouragement source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncouragementRequest {
    /// Locale tag such as `en` or `he`.
    pub locale: String,
    /// Level that was completed.
    pub level: u32,
    /// Score at completion.
    pub score: u64,
}

/// Errors raised by encouragement sources.
#[derive(Debug, Error)]
pub enum EncouragementError {
    /// The source has no text for the requested locale.
    #[error("no encouragement available for locale `{0}`")]
    UnsupportedLocale(String),
    /// The source could not produce text.
    #[error("encouragement source unavailable: {0}")]
    Unavailable(String),
}

/// Provider of short flavor lines shown after a level.
pub trait EncouragementSource {
    /// Produces one line for the provided context.
    fn encouragement(&mut self, request: &EncouragementRequest)
        -> Result<String, EncouragementError>;
}

impl<S: EncouragementSource + ?Sized> EncouragementSource for Box<S> {
    fn encouragement(
        &mut self,
        request: &EncouragementRequest,
    ) -> Result<String, EncouragementError> {
        (**self).encouragement(request)
    }
}

/// Line used when a source fails for the given locale.
#[must_use]
pub fn fallback_line(locale: &str) -> &'static str {
    match locale {
        "he" => "מיאו! כל הכבוד!",
        _ => "Meow! Well done!",
    }
}

/// System that turns [`Event::LevelWon`] into flavor text.
#[derive(Debug)]
pub struct Encouragement<S> {
    source: S,
    locale: String,
}

impl<S: EncouragementSource> Encouragement<S> {
    /// Creates a new system drawing lines from `source` in `locale`.
    #[must_use]
    pub fn new(source: S, locale: impl Into<String>) -> Self {
        Self {
            source,
            locale: locale.into(),
        }
    }

    /// Locale lines are requested in.
    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Consumes events and returns a line for the last completed level, if any.
    pub fn handle(&mut self, events: &[Event]) -> Option<String> {
        let (level, score) = events.iter().rev().find_map(|event| match event {
            Event::LevelWon { level, score } => Some((*level, *score)),
            _ => None,
        })?;
        Some(self.line_for(level, score))
    }

    /// Requests a line, substituting the fallback on failure or empty output.
    pub fn line_for(&mut self, level: u32, score: u64) -> String {
        let request = EncouragementRequest {
            locale: self.locale.clone(),
            level,
            score,
        };
        match self.source.encouragement(&request) {
            Ok(line) if !line.trim().is_empty() => line,
            Ok(_) => {
                warn!(locale = %self.locale, level, "encouragement_empty");
                fallback_line(&self.locale).to_string()
            }
            Err(error) => {
                warn!(locale = %self.locale, level, %error, "encouragement_fallback");
                fallback_line(&self.locale).to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl EncouragementSource for Failing {
        fn encouragement(
            &mut self,
            _request: &EncouragementRequest,
        ) -> Result<String, EncouragementError> {
            Err(EncouragementError::Unavailable("offline".to_string()))
        }
    }

    struct Silent;

    impl EncouragementSource for Silent {
        fn encouragement(
            &mut self,
            _request: &EncouragementRequest,
        ) -> Result<String, EncouragementError> {
            Ok("   ".to_string())
        }
    }

    #[test]
    fn failure_falls_back_to_locale_default() {
        let mut system = Encouragement::new(Failing, "he");
        assert_eq!(system.line_for(2, 100), fallback_line("he"));
    }

    #[test]
    fn blank_line_falls_back() {
        let mut system = Encouragement::new(Silent, "fr");
        assert_eq!(system.line_for(1, 0), fallback_line(DEFAULT_LOCALE));
    }

    #[test]
    fn ignores_batches_without_level_won() {
        let mut system = Encouragement::new(Failing, "en");
        assert!(system
            .handle(&[Event::LifeLost { lives: 2 }, Event::MuteChanged { muted: true }])
            .is_none());
    }
}
