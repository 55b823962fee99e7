//! Error types for the review workbench.
//!
//! Defines [`ReviewError`], the unified error type for store, session, and
//! configuration failures. Messages are designed to be self-contained:
//! what went wrong, and what the user can do about it.
//!
//! Recoverability matters here: a data-provider failure aborts workbench
//! bootstrap entirely, while selection mistakes inside a merge session are
//! local no-ops surfaced as transient notifications.

use std::fmt;
use std::path::PathBuf;

use crate::model::types::PatternId;

// ---------------------------------------------------------------------------
// ReviewError
// ---------------------------------------------------------------------------

/// Unified error type for review-workbench operations.
#[derive(Debug)]
pub enum ReviewError {
    /// The record provider failed, or was asked for an unknown data kind.
    ///
    /// Non-recoverable within a session: no dependent UI may be built.
    DataUnavailable {
        /// The data kind that was requested.
        kind: String,
        /// Human-readable description of the failure.
        detail: String,
    },

    /// An operation referenced a record outside the current working set.
    UnknownRecord {
        /// The identifier that was not found.
        id: PatternId,
    },

    /// The master record cannot be excluded from the working set.
    MasterExcluded {
        /// The master's identifier.
        id: PatternId,
    },

    /// The master record cannot also be the comparison target.
    MasterAsTarget {
        /// The master's identifier.
        id: PatternId,
    },

    /// No comparison target is active for a target-dependent operation.
    NoComparison,

    /// A review was initiated with zero rows selected.
    NoSelection,

    /// A configuration file could not be loaded or parsed.
    Config {
        /// Path to the configuration file.
        path: PathBuf,
        /// Human-readable description of the problem.
        detail: String,
    },
}

impl ReviewError {
    /// Whether the session can continue after this error.
    ///
    /// Recoverable errors leave all session state unchanged; the attempted
    /// operation is simply a no-op with a visible notification.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::DataUnavailable { .. } | Self::Config { .. })
    }

    /// The first line of the display message — short enough for a toast.
    #[must_use]
    pub fn summary(&self) -> String {
        self.to_string()
            .lines()
            .next()
            .unwrap_or_default()
            .to_owned()
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for ReviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataUnavailable { kind, detail } => {
                write!(
                    f,
                    "failed to load '{kind}' data: {detail}\n  The workbench cannot start without records. Fix the data source and relaunch."
                )
            }
            Self::UnknownRecord { id } => {
                write!(
                    f,
                    "record {id} is not part of the current working set.\n  Pick one of the listed candidates instead."
                )
            }
            Self::MasterExcluded { id } => {
                write!(
                    f,
                    "record {id} is the current master and cannot be excluded.\n  Swap another record in as master first, then exclude this one."
                )
            }
            Self::MasterAsTarget { id } => {
                write!(
                    f,
                    "record {id} is the current master and cannot be compared against itself.\n  Pick a different comparison target."
                )
            }
            Self::NoComparison => {
                write!(
                    f,
                    "no comparison target is active.\n  Select a candidate from the list to compare against the master."
                )
            }
            Self::NoSelection => {
                write!(
                    f,
                    "no rows are selected.\n  Check at least one row, then open the review again."
                )
            }
            Self::Config { path, detail } => {
                write!(
                    f,
                    "configuration error in '{}': {}\n  Edit the config file and correct the issue.",
                    path.display(),
                    detail
                )
            }
        }
    }
}

impl std::error::Error for ReviewError {}

// ---------------------------------------------------------------------------
// From impls
// ---------------------------------------------------------------------------

impl From<crate::config::ConfigError> for ReviewError {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::Config {
            path: err.path.unwrap_or_default(),
            detail: err.message,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_data_unavailable() {
        let err = ReviewError::DataUnavailable {
            kind: "patterns".to_owned(),
            detail: "file not found".to_owned(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("patterns"));
        assert!(msg.contains("file not found"));
        assert!(msg.contains("relaunch"));
    }

    #[test]
    fn display_unknown_record() {
        let err = ReviewError::UnknownRecord {
            id: PatternId::new(99),
        };
        let msg = format!("{err}");
        assert!(msg.contains("99"));
        assert!(msg.contains("working set"));
    }

    #[test]
    fn display_master_excluded() {
        let err = ReviewError::MasterExcluded {
            id: PatternId::new(1),
        };
        let msg = format!("{err}");
        assert!(msg.contains("cannot be excluded"));
        assert!(msg.contains("Swap another record"));
    }

    #[test]
    fn display_master_as_target() {
        let err = ReviewError::MasterAsTarget {
            id: PatternId::new(1),
        };
        assert!(format!("{err}").contains("compared against itself"));
    }

    #[test]
    fn display_no_selection() {
        let msg = format!("{}", ReviewError::NoSelection);
        assert!(msg.contains("no rows are selected"));
    }

    #[test]
    fn display_config() {
        let err = ReviewError::Config {
            path: PathBuf::from("patrev.toml"),
            detail: "unknown field 'foo'".to_owned(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("patrev.toml"));
        assert!(msg.contains("unknown field 'foo'"));
    }

    #[test]
    fn recoverability_split() {
        assert!(
            !ReviewError::DataUnavailable {
                kind: "patterns".to_owned(),
                detail: String::new(),
            }
            .is_recoverable()
        );
        assert!(
            !ReviewError::Config {
                path: PathBuf::new(),
                detail: String::new(),
            }
            .is_recoverable()
        );
        assert!(
            ReviewError::UnknownRecord {
                id: PatternId::new(1),
            }
            .is_recoverable()
        );
        assert!(ReviewError::NoSelection.is_recoverable());
        assert!(ReviewError::NoComparison.is_recoverable());
        assert!(
            ReviewError::MasterExcluded {
                id: PatternId::new(1),
            }
            .is_recoverable()
        );
    }

    #[test]
    fn summary_is_single_line() {
        let err = ReviewError::NoSelection;
        assert_eq!(err.summary(), "no rows are selected.");
        assert!(!err.summary().contains('\n'));
    }

    #[test]
    fn from_config_error() {
        let cfg_err = crate::config::ConfigError {
            path: Some(PathBuf::from("patrev.toml")),
            message: "bad syntax".to_owned(),
        };
        let err: ReviewError = cfg_err.into();
        match err {
            ReviewError::Config { path, detail } => {
                assert_eq!(path, PathBuf::from("patrev.toml"));
                assert_eq!(detail, "bad syntax");
            }
            other => panic!("expected Config, got {other:?}"),
        }
    }
}
