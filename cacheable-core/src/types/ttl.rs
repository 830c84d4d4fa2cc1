//! Time-to-live durations.
//!
//! A [`Ttl`] is a signed millisecond count parsed from humanized strings such
//! as `"3h"`, `"1.5 days"` or `"250ms"`. A bare number is read as milliseconds.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_TTL_MILLIS, MAX_TTL_INPUT_LEN, MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND,
    MS_PER_WEEK, MS_PER_YEAR,
};
use crate::error::{CacheableError, Result};

/// Expiry window of a store, in milliseconds.
///
/// Negative values are accepted. They are nonsensical as a window but the
/// tracker performs no validation on them.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ttl {
    millis: i64,
}

impl Ttl {
    /// Creates a TTL from milliseconds.
    pub const fn from_millis(millis: i64) -> Self {
        Self { millis }
    }

    /// Creates a TTL from whole seconds.
    pub const fn from_secs(secs: i64) -> Self {
        Self {
            millis: secs.saturating_mul(MS_PER_SECOND),
        }
    }

    /// Returns the TTL in milliseconds.
    pub const fn as_millis(&self) -> i64 {
        self.millis
    }

    /// Returns the TTL as a `std::time::Duration`, clamping negatives to zero.
    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.millis.max(0) as u64)
    }

    /// Milliseconds into the window at which staleness begins.
    ///
    /// Computed as `floor(ttl * offset)`. For an offset in [0, 1] the result is
    /// clamped between zero and the TTL, since the float product can round
    /// past the TTL once it exceeds 2^53.
    pub fn stale_after(&self, offset: f64) -> i64 {
        let stale = (self.millis as f64 * offset).floor() as i64;
        if (0.0..=1.0).contains(&offset) {
            stale.clamp(self.millis.min(0), self.millis.max(0))
        } else {
            stale
        }
    }
}

impl Default for Ttl {
    fn default() -> Self {
        Self::from_millis(DEFAULT_TTL_MILLIS)
    }
}

impl From<Duration> for Ttl {
    fn from(duration: Duration) -> Self {
        Self::from_millis(i64::try_from(duration.as_millis()).unwrap_or(i64::MAX))
    }
}

impl fmt::Debug for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ttl({self})")
    }
}

/// Renders in the largest unit that divides the value exactly, so the output
/// always parses back to the same TTL.
impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const UNITS: [(i64, &str); 4] = [
            (MS_PER_DAY, "d"),
            (MS_PER_HOUR, "h"),
            (MS_PER_MINUTE, "m"),
            (MS_PER_SECOND, "s"),
        ];

        if self.millis != 0 {
            for (size, suffix) in UNITS {
                if self.millis % size == 0 {
                    return write!(f, "{}{}", self.millis / size, suffix);
                }
            }
        }
        write!(f, "{}ms", self.millis)
    }
}

impl FromStr for Ttl {
    type Err = CacheableError;

    fn from_str(input: &str) -> Result<Self> {
        let invalid = |reason: &str| CacheableError::InvalidTtl {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        if input.is_empty() {
            return Err(invalid("empty string"));
        }
        if input.len() > MAX_TTL_INPUT_LEN {
            return Err(invalid("input too long"));
        }

        let split = input
            .char_indices()
            .find(|(i, c)| !(c.is_ascii_digit() || *c == '.' || (*i == 0 && *c == '-')))
            .map_or(input.len(), |(i, _)| i);
        let (number, rest) = input.split_at(split);

        if number.matches('.').count() > 1 || number.ends_with('.') {
            return Err(invalid("malformed number"));
        }
        let value: f64 = number.parse().map_err(|_| invalid("missing number"))?;

        let unit = rest.trim_start_matches(' ').to_ascii_lowercase();
        let scale = unit_millis(&unit)
            .ok_or_else(|| invalid(&format!("unknown unit '{unit}'")))?;

        Ok(Self::from_millis((value * scale).round() as i64))
    }
}

/// Milliseconds per unit for every accepted spelling. An empty unit means ms.
fn unit_millis(unit: &str) -> Option<f64> {
    let ms = match unit {
        "" | "ms" | "msec" | "msecs" | "millisecond" | "milliseconds" => 1,
        "s" | "sec" | "secs" | "second" | "seconds" => MS_PER_SECOND,
        "m" | "min" | "mins" | "minute" | "minutes" => MS_PER_MINUTE,
        "h" | "hr" | "hrs" | "hour" | "hours" => MS_PER_HOUR,
        "d" | "day" | "days" => MS_PER_DAY,
        "w" | "week" | "weeks" => MS_PER_WEEK,
        "y" | "yr" | "yrs" | "year" | "years" => MS_PER_YEAR,
        _ => return None,
    };
    Some(ms as f64)
}

impl Serialize for Ttl {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

// Accepts either a humanized string or a raw millisecond count. Fractional
// counts round to the nearest millisecond, as the string form does.
impl<'de> Deserialize<'de> for Ttl {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Millis(i64),
            Fractional(f64),
            Text(String),
        }

        let raw = Raw::deserialize(deserializer).map_err(|_| {
            <D::Error as serde::de::Error>::custom(
                "ttl must be a millisecond count or a duration string like \"3h\"",
            )
        })?;

        match raw {
            Raw::Millis(millis) => Ok(Self::from_millis(millis)),
            Raw::Fractional(millis) if millis.is_finite() => {
                Ok(Self::from_millis(millis.round() as i64))
            }
            Raw::Fractional(millis) => Err(serde::de::Error::custom(format!(
                "ttl millisecond count {millis} is not finite"
            ))),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("3h", 10_800_000 ; "hours short")]
    #[test_case("1s", 1_000 ; "seconds short")]
    #[test_case("250ms", 250 ; "millis short")]
    #[test_case("500", 500 ; "bare number is millis")]
    #[test_case("1.5h", 5_400_000 ; "fractional hours")]
    #[test_case(".5s", 500 ; "leading dot")]
    #[test_case("2 days", 172_800_000 ; "long unit with space")]
    #[test_case("1 Week", 604_800_000 ; "case insensitive")]
    #[test_case("10 mins", 600_000 ; "plural minutes")]
    #[test_case("1y", 31_557_600_000 ; "julian year")]
    #[test_case("-1h", -3_600_000 ; "negative")]
    fn test_parse_ttl(input: &str, millis: i64) {
        assert_eq!(input.parse::<Ttl>().unwrap().as_millis(), millis);
    }

    #[test_case("" ; "empty")]
    #[test_case("h" ; "unit only")]
    #[test_case("3 fortnights" ; "unknown unit")]
    #[test_case("1.2.3s" ; "two dots")]
    #[test_case("5.s" ; "trailing dot")]
    #[test_case("1-s" ; "inner minus")]
    fn test_parse_ttl_rejects(input: &str) {
        let err = input.parse::<Ttl>().unwrap_err();
        assert!(matches!(err, CacheableError::InvalidTtl { .. }));
    }

    #[test]
    fn test_parse_rejects_oversized_input() {
        let long = "1".repeat(MAX_TTL_INPUT_LEN + 1);
        assert!(long.parse::<Ttl>().is_err());
    }

    #[test]
    fn test_display_picks_exact_unit() {
        assert_eq!(Ttl::from_millis(10_800_000).to_string(), "3h");
        assert_eq!(Ttl::from_millis(5_400_000).to_string(), "90m");
        assert_eq!(Ttl::from_millis(1_500).to_string(), "1500ms");
        assert_eq!(Ttl::from_millis(0).to_string(), "0ms");
        assert_eq!(Ttl::from_secs(-30).to_string(), "-30s");
    }

    #[test]
    fn test_stale_after_never_passes_expiry() {
        let ttl = Ttl::from_secs(1);
        assert_eq!(ttl.stale_after(0.65), 650);
        assert_eq!(ttl.stale_after(1.0), 1_000);
        assert_eq!(ttl.stale_after(0.0), 0);
        assert_eq!(Ttl::from_millis(7).stale_after(0.5), 3);
    }

    #[test]
    fn test_stale_after_clamped_for_huge_ttl() {
        let millis = (1i64 << 53) + 3;
        assert_eq!(Ttl::from_millis(millis).stale_after(1.0), millis);
        assert_eq!(Ttl::from_millis(i64::MAX).stale_after(1.0), i64::MAX);
        assert_eq!(Ttl::from_millis(-millis).stale_after(1.0), -millis);
        assert_eq!(Ttl::from_millis(1_000).stale_after(-2.0), -2_000);
    }

    #[test]
    fn test_duration_conversions() {
        assert_eq!(Ttl::from(Duration::from_secs(2)).as_millis(), 2_000);
        assert_eq!(Ttl::from_millis(-5).as_duration(), Duration::ZERO);
        assert_eq!(Ttl::default().as_duration(), Duration::from_secs(3 * 3600));
    }

    #[test]
    fn test_serde_string_and_number() {
        let ttl: Ttl = serde_json::from_str("\"1s\"").unwrap();
        assert_eq!(ttl, Ttl::from_secs(1));

        let ttl: Ttl = serde_json::from_str("1500").unwrap();
        assert_eq!(ttl.as_millis(), 1_500);

        assert_eq!(serde_json::to_string(&Ttl::from_secs(60)).unwrap(), "\"1m\"");
        assert!(serde_json::from_str::<Ttl>("\"soon\"").is_err());
    }

    #[test]
    fn test_serde_fractional_millis() {
        let ttl: Ttl = serde_json::from_str("1500.5").unwrap();
        assert_eq!(ttl.as_millis(), 1_501);
        assert_eq!(serde_json::from_str::<Ttl>("1499.2").unwrap().as_millis(), 1_499);
    }

    #[test]
    fn test_serde_rejects_other_shapes_clearly() {
        let err = serde_json::from_str::<Ttl>("true").unwrap_err();
        assert!(err.to_string().contains("duration string"), "{err}");
    }
}
