//! Duration value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::DurationParseError;

/// Default preparation window (20 seconds)
pub const DEFAULT_PREPARATION_SECS: u64 = 20;

/// Default answer recording window (30 seconds)
pub const DEFAULT_RECORDING_SECS: u64 = 30;

/// Value object representing a whole-second phase length.
/// Immutable and validated on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration {
    seconds: u64,
}

impl Duration {
    /// Create a Duration from seconds
    pub const fn from_secs(secs: u64) -> Self {
        Self { seconds: secs }
    }

    /// Default preparation window
    pub const fn default_preparation() -> Self {
        Self::from_secs(DEFAULT_PREPARATION_SECS)
    }

    /// Default recording window
    pub const fn default_recording() -> Self {
        Self::from_secs(DEFAULT_RECORDING_SECS)
    }

    /// Get duration in seconds
    pub const fn as_secs(&self) -> u64 {
        self.seconds
    }

    /// Countdown rendering of this duration (`MM:SS`)
    pub fn clock(&self) -> String {
        format_clock(self.seconds)
    }
}

/// Format a second count as zero-padded `MM:SS`.
///
/// Minutes are not wrapped into hours, so 3600 renders as `60:00`.
pub fn format_clock(total_secs: u64) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

impl FromStr for Duration {
    type Err = DurationParseError;

    /// Parse a duration string into a Duration value object.
    /// Supported formats: "30s", "1m", "1m30s", "90s"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();

        let mut minutes: u64 = 0;
        let mut seconds: u64 = 0;
        let mut current_num = String::new();
        let mut found_any = false;

        for ch in input.chars() {
            if ch.is_ascii_digit() {
                current_num.push(ch);
            } else if ch == 'm' && !current_num.is_empty() {
                minutes = current_num
                    .parse()
                    .map_err(|_| DurationParseError { input: s.to_string() })?;
                current_num.clear();
                found_any = true;
            } else if ch == 's' && !current_num.is_empty() {
                seconds = current_num
                    .parse()
                    .map_err(|_| DurationParseError { input: s.to_string() })?;
                current_num.clear();
                found_any = true;
            } else {
                return Err(DurationParseError { input: s.to_string() });
            }
        }

        if !current_num.is_empty() || !found_any {
            return Err(DurationParseError { input: s.to_string() });
        }

        let total = minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(seconds))
            .ok_or_else(|| DurationParseError { input: s.to_string() })?;

        if total == 0 {
            return Err(DurationParseError { input: s.to_string() });
        }

        Ok(Self { seconds: total })
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.seconds / 60;
        let seconds = self.seconds % 60;

        if minutes == 0 {
            write!(f, "{}s", seconds)
        } else if seconds == 0 {
            write!(f, "{}m", minutes)
        } else {
            write!(f, "{}m{}s", minutes, seconds)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_seconds_only() {
        let d: Duration = "30s".parse().unwrap();
        assert_eq!(d.as_secs(), 30);
    }

    #[test]
    fn parse_minutes_and_seconds() {
        let d: Duration = "1m30s".parse().unwrap();
        assert_eq!(d.as_secs(), 90);
    }

    #[test]
    fn parse_case_insensitive_with_whitespace() {
        let d: Duration = "  1M5S ".parse().unwrap();
        assert_eq!(d.as_secs(), 65);
    }

    #[test]
    fn parse_rejects_zero_and_garbage() {
        assert!("".parse::<Duration>().is_err());
        assert!("0s".parse::<Duration>().is_err());
        assert!("20".parse::<Duration>().is_err());
        assert!("twenty".parse::<Duration>().is_err());
    }

    #[test]
    fn clock_is_zero_padded() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(9), "00:09");
        assert_eq!(format_clock(20), "00:20");
        assert_eq!(format_clock(75), "01:15");
        assert_eq!(Duration::from_secs(600).clock(), "10:00");
    }

    #[test]
    fn display_round_trips_through_parse() {
        for d in [Duration::from_secs(20), Duration::from_secs(60), Duration::from_secs(95)] {
            let parsed: Duration = d.to_string().parse().unwrap();
            assert_eq!(parsed, d);
        }
    }

    #[test]
    fn default_values() {
        assert_eq!(Duration::default_preparation().as_secs(), 20);
        assert_eq!(Duration::default_recording().as_secs(), 30);
    }
}
