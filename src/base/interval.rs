//! Poll interval parsing.
//!
//! Intervals are written as a sequence of decimal numbers, each with an optional
//! fraction and a unit suffix, e.g. `30s`, `1m30s`, `1.5h` or `250ms`. Valid
//! units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. The bare string `0`
//! is also accepted.

use std::{fmt, ops::Deref, str::FromStr, time::Duration};

use anyhow::anyhow;

use super::types::Err;

/// Default interval between two poll cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// A parsed poll interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollInterval(
    /// The interval length.
    pub Duration,
);

impl Default for PollInterval {
    fn default() -> Self {
        Self(DEFAULT_POLL_INTERVAL)
    }
}

impl Deref for PollInterval {
    type Target = Duration;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Duration> for PollInterval {
    fn from(value: Duration) -> Self {
        Self(value)
    }
}

impl fmt::Display for PollInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl FromStr for PollInterval {
    type Err = Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();

        if input.is_empty() {
            return Err(anyhow!("Invalid duration: empty string."));
        }

        if input == "0" {
            return Ok(Self(Duration::ZERO));
        }

        let mut total_nanos: u128 = 0;
        let mut rest = input;

        while !rest.is_empty() {
            // Leading number, with an optional fraction.

            let number_len = rest.find(|c: char| !(c.is_ascii_digit() || c == '.')).unwrap_or(rest.len());
            let number = &rest[..number_len];
            let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));

            if (whole.is_empty() && fraction.is_empty()) || fraction.contains('.') {
                return Err(anyhow!("Invalid duration `{s}`: bad number `{number}`."));
            }

            rest = &rest[number_len..];

            // Unit suffix.

            let unit_len = rest.find(|c: char| c.is_ascii_digit() || c == '.').unwrap_or(rest.len());
            let unit = &rest[..unit_len];

            let scale: u64 = match unit {
                "ns" => 1,
                "us" | "µs" => 1_000,
                "ms" => 1_000_000,
                "s" => 1_000_000_000,
                "m" => 60 * 1_000_000_000,
                "h" => 3600 * 1_000_000_000,
                "" => return Err(anyhow!("Invalid duration `{s}`: missing unit.")),
                other => return Err(anyhow!("Invalid duration `{s}`: unknown unit `{other}`.")),
            };

            rest = &rest[unit_len..];

            // Whole part in integer nanoseconds; only the fraction goes through a float.

            let whole: u128 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| anyhow!("Invalid duration `{s}`: out of range."))? };
            let mut nanos = whole.checked_mul(u128::from(scale)).ok_or_else(|| anyhow!("Invalid duration `{s}`: out of range."))?;

            if !fraction.is_empty() {
                let fraction: f64 = format!("0.{fraction}").parse().map_err(|_| anyhow!("Invalid duration `{s}`: bad number `{number}`."))?;
                nanos += (fraction * scale as f64).round() as u128;
            }

            total_nanos = total_nanos.checked_add(nanos).ok_or_else(|| anyhow!("Invalid duration `{s}`: out of range."))?;
        }

        let total_nanos = u64::try_from(total_nanos).map_err(|_| anyhow!("Invalid duration `{s}`: out of range."))?;

        Ok(Self(Duration::from_nanos(total_nanos)))
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Duration {
        s.parse::<PollInterval>().unwrap().0
    }

    #[test]
    fn test_parses_single_units() {
        assert_eq!(parse("30s"), Duration::from_secs(30));
        assert_eq!(parse("250ms"), Duration::from_millis(250));
        assert_eq!(parse("2m"), Duration::from_secs(120));
        assert_eq!(parse("1h"), Duration::from_secs(3600));
        assert_eq!(parse("15us"), Duration::from_micros(15));
        assert_eq!(parse("7ns"), Duration::from_nanos(7));
    }

    #[test]
    fn test_parses_compound_and_fractional() {
        assert_eq!(parse("1m30s"), Duration::from_secs(90));
        assert_eq!(parse("1h2m3s"), Duration::from_secs(3723));
        assert_eq!(parse("1.5h"), Duration::from_secs(5400));
        assert_eq!(parse(".5s"), Duration::from_millis(500));
    }

    #[test]
    fn test_whole_numbers_keep_nanosecond_precision() {
        assert_eq!(parse("9007199254740993ns"), Duration::from_nanos(9_007_199_254_740_993));
        assert_eq!(parse("18446744073709551615ns"), Duration::from_nanos(u64::MAX));
        assert_eq!(parse("5000h1ns"), Duration::from_nanos(5_000 * 3_600_000_000_000 + 1));
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!("18446744073709551616ns".parse::<PollInterval>().is_err());
        assert!("99999999999999999999999999999999999999999h".parse::<PollInterval>().is_err());
    }

    #[test]
    fn test_parses_zero() {
        assert_eq!(parse("0"), Duration::ZERO);
        assert_eq!(parse("0s"), Duration::ZERO);
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in ["", "30", "s", "10x", "-5s", "1.2.3s", "abc"] {
            assert!(bad.parse::<PollInterval>().is_err(), "`{bad}` should not parse");
        }
    }

    #[test]
    fn test_default_is_thirty_seconds() {
        assert_eq!(*PollInterval::default(), Duration::from_secs(30));
    }
}
