//! Built-in per-locale encouragement lines.

use crate::{EncouragementError, EncouragementRequest, EncouragementSource};

const ENGLISH: &[&str] = &[
    "Meow! You closed my bin, but I'll be back.",
    "Purr-fect reflexes, human.",
    "Fine. Take the points. I'm napping anyway.",
    "Not bad for someone without whiskers.",
    "My bin, my rules... you broke all of them.",
];

const HEBREW: &[&str] = &[
    "מיאו! סגרת לי את הפח!",
    "רפלקסים של חתול, כל הכבוד.",
    "טוב, קח את הנקודות. אני הולך לישון.",
    "לא רע בשביל מישהו בלי שפם.",
    "הפח שלי, החוקים שלי... ושברת את כולם.",
];

/// Deterministic source backed by a small static table per locale.
///
/// The line is picked from level and score, so the same result always
/// produces the same text.
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticEncouragement;

impl StaticEncouragement {
    fn lines(locale: &str) -> Option<&'static [&'static str]> {
        match locale {
            "en" => Some(ENGLISH),
            "he" => Some(HEBREW),
            _ => None,
        }
    }
}

impl EncouragementSource for StaticEncouragement {
    fn encouragement(
        &mut self,
        request: &EncouragementRequest,
    ) -> Result<String, EncouragementError> {
        let lines = Self::lines(&request.locale)
            .ok_or_else(|| EncouragementError::UnsupportedLocale(request.locale.clone()))?;
        let seed = u64::from(request.level).wrapping_add(request.score / 10);
        let index = usize::try_from(seed % lines.len() as u64).unwrap_or(0);
        lines
            .get(index)
            .map(|line| (*line).to_string())
            .ok_or_else(|| EncouragementError::Unavailable("empty table".to_string()))
    }
}
