//! Clock-time arithmetic for the daily board
//!
//! Entries carry wall-clock times only (`HH:MM`); the board models a single
//! business day, so additions wrap at midnight with no calendar carry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minutes in a day
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Wall-clock time as minutes since midnight, rendered `HH:MM`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

impl ClockTime {
    /// Build from hour/minute; both are taken modulo their range
    pub fn new(hour: u16, minute: u16) -> Self {
        Self((hour % 24) * 60 + minute % 60)
    }

    /// Build from raw minutes since midnight, wrapping at 24h
    pub fn from_minutes(minutes: u32) -> Self {
        Self((minutes % u32::from(MINUTES_PER_DAY)) as u16)
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Add a duration, wrapping at midnight (no calendar-date carry)
    pub fn add_minutes(self, minutes: u32) -> Self {
        Self::from_minutes(u32::from(self.0) + minutes)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Parse failure for `HH:MM` strings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid clock time {0:?}, expected HH:MM")]
pub struct ParseClockTimeError(pub String);

impl FromStr for ClockTime {
    type Err = ParseClockTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, m) = s
            .split_once(':')
            .ok_or_else(|| ParseClockTimeError(s.to_string()))?;
        let hour: u16 = h.parse().map_err(|_| ParseClockTimeError(s.to_string()))?;
        let minute: u16 = m.parse().map_err(|_| ParseClockTimeError(s.to_string()))?;
        if hour >= 24 || minute >= 60 {
            return Err(ParseClockTimeError(s.to_string()));
        }
        Ok(Self(hour * 60 + minute))
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ParseClockTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}
