//! Short reference codes handed out for search results.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Smallest code handed out.
pub const CODE_MIN: u32 = 10_000;
/// Largest code handed out.
pub const CODE_MAX: u32 = 99_999;

/// Five-digit code a user types after `/get` to pick a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceCode(u32);

impl ReferenceCode {
    /// Returns `None` outside `CODE_MIN..=CODE_MAX`.
    pub fn new(value: u32) -> Option<Self> {
        (CODE_MIN..=CODE_MAX)
            .contains(&value)
            .then_some(ReferenceCode(value))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ReferenceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid reference code: {0:?}")]
pub struct InvalidCode(pub String);

impl FromStr for ReferenceCode {
    type Err = InvalidCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 5 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidCode(s.to_string()));
        }
        s.parse::<u32>()
            .ok()
            .and_then(ReferenceCode::new)
            .ok_or_else(|| InvalidCode(s.to_string()))
    }
}

/// Source of candidate codes. Uniqueness is checked by the caller.
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> ReferenceCode;
}

/// Uniform random codes over `CODE_MIN..=CODE_MAX`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCodes;

impl CodeGenerator for RandomCodes {
    fn generate(&self) -> ReferenceCode {
        ReferenceCode(rand::rng().random_range(CODE_MIN..=CODE_MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_range() {
        assert!(ReferenceCode::new(9_999).is_none());
        assert!(ReferenceCode::new(100_000).is_none());
        assert_eq!(ReferenceCode::new(10_000).unwrap().value(), 10_000);
        assert_eq!(ReferenceCode::new(99_999).unwrap().value(), 99_999);
    }

    #[test]
    fn test_parse() {
        assert_eq!("12345".parse::<ReferenceCode>().unwrap().value(), 12345);
        assert_eq!(" 54321 ".parse::<ReferenceCode>().unwrap().value(), 54321);
        assert!("1234".parse::<ReferenceCode>().is_err());
        assert!("123456".parse::<ReferenceCode>().is_err());
        assert!("01234".parse::<ReferenceCode>().is_err());
        assert!("+1234".parse::<ReferenceCode>().is_err());
        assert!("12a45".parse::<ReferenceCode>().is_err());
        assert!("".parse::<ReferenceCode>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        let code = ReferenceCode::new(48213).unwrap();
        assert_eq!(code.to_string(), "48213");
        assert_eq!(code.to_string().parse::<ReferenceCode>().unwrap(), code);
    }

    #[test]
    fn test_random_codes_stay_in_range() {
        let generator = RandomCodes;
        for _ in 0..1000 {
            let code = generator.generate().value();
            assert!((CODE_MIN..=CODE_MAX).contains(&code));
        }
    }
}
