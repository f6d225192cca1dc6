//! GTFS time-of-day values.

use std::fmt;
use std::str::FromStr;

/// Seconds since midnight of the service day. GTFS allows hours past 23 for
/// trips that run after midnight, so this is not a clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    pub const fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Self {
        TimeOfDay(hours * 3600 + minutes * 60 + seconds)
    }

    pub fn seconds(self) -> u32 {
        self.0
    }
}

/// Largest hour field accepted.
const MAX_HOURS: u32 = 999;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time of day {0:?}, expected H:MM:SS")]
pub struct ParseTimeError(String);

impl FromStr for TimeOfDay {
    type Err = ParseTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseTimeError(s.to_string());
        let mut parts = s.trim().split(':');

        let mut next = |max: u32| -> Result<u32, ParseTimeError> {
            let part = parts.next().ok_or_else(err)?;
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(err());
            }
            let value: u32 = part.parse().map_err(|_| err())?;
            if value > max {
                return Err(err());
            }
            Ok(value)
        };

        let hours = next(MAX_HOURS)?;
        let minutes = next(59)?;
        let seconds = next(59)?;
        if parts.next().is_some() {
            return Err(err());
        }

        Ok(TimeOfDay::from_hms(hours, minutes, seconds))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.0 / 3600,
            (self.0 % 3600) / 60,
            self.0 % 60
        )
    }
}

/// Inclusive range of times of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl TimeWindow {
    pub fn contains(&self, time: TimeOfDay) -> bool {
        self.start <= time && time <= self.end
    }
}

impl Default for TimeWindow {
    /// 07:00:00 to 22:00:00.
    fn default() -> Self {
        TimeWindow {
            start: TimeOfDay::from_hms(7, 0, 0),
            end: TimeOfDay::from_hms(22, 0, 0),
        }
    }
}
