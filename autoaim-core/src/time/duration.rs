use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// A signed microsecond duration, domain-free.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration {
    micros: i64,
}

impl Duration {
    pub const ZERO: Duration = Duration { micros: 0 };

    pub const fn from_micros(micros: i64) -> Self {
        Duration { micros }
    }

    pub const fn from_millis(millis: i64) -> Self {
        Duration::from_micros(millis * 1_000)
    }

    pub fn from_secs_f64(secs: f64) -> Self {
        Duration::from_micros((secs * 1_000_000.0).round() as i64)
    }

    pub fn micros(&self) -> i64 {
        self.micros
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.micros as f64 / 1_000_000.0
    }

    /// `0 Hz` for a zero duration, per the "zero maps to infinity" convention.
    pub fn as_hz(&self) -> f64 {
        if self.micros == 0 {
            f64::INFINITY
        } else {
            1.0 / self.as_secs_f64()
        }
    }

    pub fn abs(&self) -> Duration {
        Duration::from_micros(self.micros.abs())
    }

    pub fn scale(&self, factor: f64) -> Duration {
        Duration::from_secs_f64(self.as_secs_f64() * factor)
    }
}

impl std::ops::Add for Duration {
    type Output = Duration;
    fn add(self, rhs: Duration) -> Duration {
        Duration::from_micros(self.micros + rhs.micros)
    }
}

impl std::ops::Sub for Duration {
    type Output = Duration;
    fn sub(self, rhs: Duration) -> Duration {
        Duration::from_micros(self.micros - rhs.micros)
    }
}

impl std::ops::Neg for Duration {
    type Output = Duration;
    fn neg(self) -> Duration {
        Duration::from_micros(-self.micros)
    }
}

impl FromStr for Duration {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (number, suffix) = trimmed
            .find(|c: char| c.is_alphabetic())
            .map(|idx| trimmed.split_at(idx))
            .ok_or_else(|| CoreError::InvalidDurationString(s.to_string()))?;
        let number = number.trim();
        let suffix = suffix.trim();

        if suffix == "us" {
            let micros: i64 = number
                .parse()
                .map_err(|_| CoreError::InvalidDurationString(s.to_string()))?;
            return Ok(Duration::from_micros(micros));
        }

        let number: f64 = number
            .parse()
            .map_err(|_| CoreError::InvalidDurationString(s.to_string()))?;
        let micros = match suffix {
            "ms" => number * 1_000.0,
            "s" => number * 1_000_000.0,
            "m" => number * 60.0 * 1_000_000.0,
            _ => return Err(CoreError::InvalidDurationString(s.to_string())),
        };
        Ok(Duration::from_micros(micros.trunc() as i64))
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} us", self.micros)
    }
}

impl Serialize for Duration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DurationVisitor;

        impl<'de> Visitor<'de> for DurationVisitor {
            type Value = Duration;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a duration string such as \"1500 us\", \"1.5 ms\" or \"2 s\"")
            }

            fn visit_str<E>(self, v: &str) -> Result<Duration, E>
            where
                E: de::Error,
            {
                v.parse().map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(DurationVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_suffixes() {
        assert_eq!("1000us".parse::<Duration>().unwrap().micros(), 1_000);
        assert_eq!("1 ms".parse::<Duration>().unwrap().micros(), 1_000);
        assert_eq!("1s".parse::<Duration>().unwrap().micros(), 1_000_000);
        assert_eq!("1m".parse::<Duration>().unwrap().micros(), 60_000_000);
    }

    #[test]
    fn rejects_unknown_suffix() {
        assert!("1 fortnight".parse::<Duration>().is_err());
    }

    #[test]
    fn rejects_fractional_microseconds() {
        assert!("1.5us".parse::<Duration>().is_err());
    }

    #[test]
    fn truncates_rather_than_rounds_other_units() {
        assert_eq!("1.9999ms".parse::<Duration>().unwrap().micros(), 1_999);
    }

    #[test]
    fn zero_duration_is_infinite_hz() {
        assert_eq!(Duration::ZERO.as_hz(), f64::INFINITY);
    }

    #[test]
    fn canonical_round_trip() {
        let d = Duration::from_micros(1_000);
        assert_eq!(d.to_string(), "1000 us");
    }
}
