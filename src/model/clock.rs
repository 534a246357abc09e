//! Wall-clock times within a single day.
//!
//! Schedule fields arrive as `HH:MM` strings from the order forms. All
//! temporal comparison and arithmetic happens on minutes since midnight,
//! so parsing lives here and the rest of the crate never touches the
//! string form again.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A time of day in minutes since midnight.
///
/// Ordering follows the clock: `08:30 < 13:00`. Always within a single
/// day; there is no wrap-around arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TimeOfDay(u16);

/// A time string that could not be parsed as `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed time {0:?}: expected HH:MM (24h)")]
pub struct MalformedTime(pub String);

impl TimeOfDay {
    /// Midnight, the first minute of the day.
    pub const MIDNIGHT: Self = Self(0);

    /// Build from hours and minutes. Returns `None` when out of range.
    pub fn new(hour: u16, minute: u16) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self(hour * 60 + minute))
        } else {
            None
        }
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u16 {
        self.0
    }

    /// Shift later by `minutes`, saturating at the end of the day (23:59).
    pub fn plus(self, minutes: i64) -> Self {
        let shifted = i64::from(self.0) + minutes;
        Self(shifted.clamp(0, 23 * 60 + 59) as u16)
    }

    /// Shift earlier by `minutes`, saturating at midnight.
    pub fn minus(self, minutes: i64) -> Self {
        self.plus(-minutes)
    }

    /// Whole minutes from `self` to `later`; negative when `later` is earlier.
    pub fn until(self, later: Self) -> i64 {
        i64::from(later.0) - i64::from(self.0)
    }
}

impl FromStr for TimeOfDay {
    type Err = MalformedTime;

    /// Parse `HH:MM` on a 24-hour clock.
    ///
    /// A single-digit hour is accepted (`8:30`); a trailing `:SS` seconds
    /// field is accepted and discarded. Anything else is malformed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || MalformedTime(s.to_string());

        let mut parts = s.split(':');
        let hour = parts.next().ok_or_else(malformed)?;
        let minute = parts.next().ok_or_else(malformed)?;
        if let Some(seconds) = parts.next() {
            if parts.next().is_some() || seconds.len() != 2 {
                return Err(malformed());
            }
            seconds.parse::<u8>().map_err(|_| malformed())?;
        }

        if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
            return Err(malformed());
        }

        let hour: u16 = hour.parse().map_err(|_| malformed())?;
        let minute: u16 = minute.parse().map_err(|_| malformed())?;
        Self::new(hour, minute).ok_or_else(malformed)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl From<TimeOfDay> for String {
    fn from(t: TimeOfDay) -> Self {
        t.to_string()
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = MalformedTime;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
