//! Byte-size parsing for human-entered limits ("512MB", "2g", plain bytes)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("empty size string")]
    Empty,

    #[error("invalid number in '{0}'")]
    InvalidNumber(String),

    #[error("unknown unit '{0}'")]
    UnknownUnit(String),

    #[error("size overflows u64: {0}")]
    Overflow(String),
}

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const GIB: u64 = 1024 * MIB;
const TIB: u64 = 1024 * GIB;

/// Unit suffixes accepted by the parser, lowercased.
const UNITS: &[(&str, u64)] = &[
    ("b", 1),
    ("k", KIB),
    ("kb", KIB),
    ("kib", KIB),
    ("m", MIB),
    ("mb", MIB),
    ("mib", MIB),
    ("g", GIB),
    ("gb", GIB),
    ("gib", GIB),
    ("t", TIB),
    ("tb", TIB),
    ("tib", TIB),
];

/// Byte count with human-readable parsing and formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ByteSize(pub u64);

impl ByteSize {
    pub const fn from_mib(n: u64) -> Self {
        Self(n * MIB)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl FromStr for ByteSize {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseError::Empty);
        }

        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(s.len());
        let (digits, suffix) = s.split_at(split);

        let value: u64 = digits
            .parse()
            .map_err(|_| ParseError::InvalidNumber(s.to_string()))?;

        let suffix = suffix.trim().to_ascii_lowercase();
        if suffix.is_empty() {
            return Ok(ByteSize(value));
        }

        let multiplier = UNITS
            .iter()
            .find(|(unit, _)| *unit == suffix)
            .map(|(_, mult)| *mult)
            .ok_or_else(|| ParseError::UnknownUnit(suffix.clone()))?;

        value
            .checked_mul(multiplier)
            .map(ByteSize)
            .ok_or_else(|| ParseError::Overflow(s.to_string()))
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LABELS: &[(&str, u64)] =
            &[("TB", TIB), ("GB", GIB), ("MB", MIB), ("KB", KIB)];

        for &(label, divisor) in LABELS {
            if self.0 >= divisor {
                if self.0 % divisor == 0 {
                    return write!(f, "{}{}", self.0 / divisor, label);
                }
                return write!(f, "{:.1}{}", self.0 as f64 / divisor as f64, label);
            }
        }
        write!(f, "{}B", self.0)
    }
}

impl<'de> Deserialize<'de> for ByteSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Accepts either a plain integer byte count or a suffixed string.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Count(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Count(n) => Ok(ByteSize(n)),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_bytes() {
        assert_eq!("4096".parse::<ByteSize>().unwrap().as_u64(), 4096);
        assert_eq!("0".parse::<ByteSize>().unwrap().as_u64(), 0);
    }

    #[test]
    fn test_parse_suffixed() {
        assert_eq!("1KB".parse::<ByteSize>().unwrap().as_u64(), KIB);
        assert_eq!("512MB".parse::<ByteSize>().unwrap().as_u64(), 512 * MIB);
        assert_eq!("2g".parse::<ByteSize>().unwrap().as_u64(), 2 * GIB);
        assert_eq!("1 TiB".parse::<ByteSize>().unwrap().as_u64(), TIB);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!("".parse::<ByteSize>(), Err(ParseError::Empty)));
        assert!(matches!(
            "12XB".parse::<ByteSize>(),
            Err(ParseError::UnknownUnit(_))
        ));
        assert!(matches!(
            "MB".parse::<ByteSize>(),
            Err(ParseError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_parse_overflow() {
        assert!(matches!(
            "99999999999TB".parse::<ByteSize>(),
            Err(ParseError::Overflow(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(ByteSize(512).to_string(), "512B");
        assert_eq!(ByteSize(KIB).to_string(), "1KB");
        assert_eq!(ByteSize::from_mib(512).to_string(), "512MB");
        assert_eq!(ByteSize(3 * MIB / 2).to_string(), "1.5MB");
    }

    #[test]
    fn test_deserialize_both_shapes() {
        #[derive(Deserialize)]
        struct Limits {
            max: ByteSize,
        }

        let from_string: Limits = serde_json::from_str(r#"{"max": "10MB"}"#).unwrap();
        assert_eq!(from_string.max.as_u64(), 10 * MIB);

        let from_int: Limits = serde_json::from_str(r#"{"max": 2048}"#).unwrap();
        assert_eq!(from_int.max.as_u64(), 2048);
    }
}
