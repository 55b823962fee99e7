//! Foundation types for the review workbench.
//!
//! Record identifiers as supplied by the data provider, plus the
//! validation error raised when an identifier fails to parse.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PatternId
// ---------------------------------------------------------------------------

/// A record identifier.
///
/// Identifiers are positive integers assigned by the data provider and
/// unique within one fetched set. They are opaque to the workbench — no
/// ordering or continuity is assumed beyond equality.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PatternId(u32);

impl PatternId {
    /// Create an identifier from its raw integer value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Return the raw integer value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for PatternId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u32>().map(Self).map_err(|e| ValidationError {
            value: s.to_owned(),
            reason: format!("expected a positive integer record id: {e}"),
        })
    }
}

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// A value failed identifier validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    /// The offending input.
    pub value: String,
    /// Why the input was rejected.
    pub reason: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid record id '{}': {}", self.value, self.reason)
    }
}

impl std::error::Error for ValidationError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn id_display() {
        assert_eq!(PatternId::new(42).to_string(), "42");
    }

    #[test]
    fn id_from_str() {
        let id: PatternId = "7".parse().expect("should parse");
        assert_eq!(id, PatternId::new(7));
    }

    #[test]
    fn id_from_str_rejects_garbage() {
        let err = "seven".parse::<PatternId>().unwrap_err();
        assert_eq!(err.value, "seven");
        assert!(err.reason.contains("positive integer"));
    }

    #[test]
    fn id_from_str_rejects_negative() {
        assert!("-1".parse::<PatternId>().is_err());
    }

    #[test]
    fn id_serde_is_transparent() {
        let json = serde_json::to_string(&PatternId::new(3)).expect("serialize");
        assert_eq!(json, "3");
        let id: PatternId = serde_json::from_str("3").expect("deserialize");
        assert_eq!(id, PatternId::new(3));
    }

    #[test]
    fn validation_error_display() {
        let err = ValidationError {
            value: "x".to_owned(),
            reason: "not a number".to_owned(),
        };
        let msg = format!("{err}");
        assert!(msg.contains('x'));
        assert!(msg.contains("not a number"));
    }
}
