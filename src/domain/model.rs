use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::error::{AocError, Result};

pub const FIRST_EVENT_YEAR: u16 = 2015;

/// Puzzles unlock at midnight US Eastern (UTC-5).
const UNLOCK_OFFSET_WEST_SECS: i32 = 5 * 3600;

/// Number of puzzles published in a given event year.
pub fn days_in_event(year: u16) -> u8 {
    if year >= 2025 {
        12
    } else {
        25
    }
}

/// The most recent year whose event has started at `now`.
pub fn latest_event_year(now: DateTime<Utc>) -> u16 {
    let local = now.with_timezone(&unlock_zone());
    let year = local.year() as u16;
    if local.month() == 12 {
        year
    } else {
        year - 1
    }
}

fn unlock_zone() -> FixedOffset {
    FixedOffset::west_opt(UNLOCK_OFFSET_WEST_SECS).expect("UTC-5 is a valid offset")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PuzzleId {
    pub year: u16,
    pub day: u8,
}

impl PuzzleId {
    pub fn new(year: u16, day: u8) -> Self {
        Self { year, day }
    }

    pub fn unlocks_at(&self) -> Option<DateTime<Utc>> {
        unlock_zone()
            .with_ymd_and_hms(self.year as i32, 12, self.day as u32, 0, 0, 0)
            .single()
            .map(|t| t.with_timezone(&Utc))
    }

    pub fn is_unlocked(&self, now: DateTime<Utc>) -> bool {
        self.unlocks_at().is_some_and(|t| now >= t)
    }

    /// `<year>/<day:02>`, the day directory below the source dir.
    pub fn dir_name(&self) -> String {
        format!("{}/{:02}", self.year, self.day)
    }
}

impl fmt::Display for PuzzleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} day {}", self.year, self.day)
    }
}

/// Opaque session cookie value. Never printed in full.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn parse(raw: &str) -> Result<Self> {
        let token = raw.trim();
        if token.is_empty() {
            return Err(AocError::InvalidConfigValueError {
                field: "token".to_string(),
                value: String::new(),
                reason: "Session token cannot be empty".to_string(),
            });
        }
        if token.chars().any(|c| c.is_whitespace() || c.is_control() || c == ';') {
            return Err(AocError::InvalidConfigValueError {
                field: "token".to_string(),
                value: Self(token.to_string()).redacted(),
                reason: "Session token contains whitespace, control characters or ';'".to_string(),
            });
        }
        Ok(Self(token.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn redacted(&self) -> String {
        let prefix: String = self.0.chars().take(8).collect();
        format!("{}…({} chars)", prefix, self.0.chars().count())
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionToken").field(&self.redacted()).finish()
    }
}

#[derive(Debug, Clone)]
pub struct DiscoveredToken {
    pub token: SessionToken,
    pub origin: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub input_data: String,
    pub answer_a: Option<String>,
    pub answer_b: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzlePage {
    pub title: Option<String>,
    pub examples: Vec<Example>,
    /// Answers already accepted for this account, part one then part two.
    pub submitted_answers: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PuzzleData {
    pub input: String,
    pub examples: Vec<Example>,
}
