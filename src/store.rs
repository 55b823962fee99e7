//! Record provider and enumeration providers.
//!
//! The provider contract is deliberately narrow: a single recognized data
//! kind, an ordered record list, and a hard failure. There are no retries
//! — when a fetch fails the caller surfaces the error and must not build
//! any UI that depends on records.
//!
//! Records come from the built-in sample set (embedded JSON) or from a
//! JSON file configured in `patrev.toml`.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::error::ReviewError;
use crate::model::pattern::Pattern;

/// The single data kind this provider recognizes.
pub const PATTERNS_KIND: &str = "patterns";

/// Sentinel meaning "no value chosen". Selectable on detail panels but
/// excluded from the enumeration providers.
pub const UNSPECIFIED: &str = "Unspecified";

static SAMPLE_PATTERNS: &str = include_str!("../data/patterns.json");

// ---------------------------------------------------------------------------
// PatternStore
// ---------------------------------------------------------------------------

/// Supplies the candidate record set. Pure container — no merge logic.
#[derive(Clone, Debug, Default)]
pub struct PatternStore {
    /// Optional JSON file overriding the built-in sample set.
    source: Option<PathBuf>,
}

impl PatternStore {
    /// A store backed by the embedded sample set.
    #[must_use]
    pub const fn builtin() -> Self {
        Self { source: None }
    }

    /// A store backed by a JSON file on disk.
    #[must_use]
    pub const fn from_file(path: PathBuf) -> Self {
        Self { source: Some(path) }
    }

    /// Fetch the ordered record list for `kind`.
    ///
    /// # Errors
    /// [`ReviewError::DataUnavailable`] for an unrecognized kind, an
    /// unreadable source file, or malformed JSON.
    pub fn fetch(&self, kind: &str) -> Result<Vec<Pattern>, ReviewError> {
        if kind != PATTERNS_KIND {
            return Err(ReviewError::DataUnavailable {
                kind: kind.to_owned(),
                detail: format!("unknown data kind (expected '{PATTERNS_KIND}')"),
            });
        }

        let text = match &self.source {
            Some(path) => fs::read_to_string(path).map_err(|e| ReviewError::DataUnavailable {
                kind: kind.to_owned(),
                detail: format!("read {}: {e}", path.display()),
            })?,
            None => SAMPLE_PATTERNS.to_owned(),
        };

        let records: Vec<Pattern> =
            serde_json::from_str(&text).map_err(|e| ReviewError::DataUnavailable {
                kind: kind.to_owned(),
                detail: format!("malformed pattern JSON: {e}"),
            })?;

        info!(count = records.len(), "loaded pattern records");
        Ok(records)
    }
}

// ---------------------------------------------------------------------------
// Enumeration providers
// ---------------------------------------------------------------------------

/// Known software types, sorted and de-duplicated. Empty input yields an
/// empty list.
#[must_use]
pub fn sw_types(records: &[Pattern]) -> Vec<String> {
    distinct(records, |p| &p.sw_type)
}

/// Known scan-classification types, sorted and de-duplicated.
#[must_use]
pub fn scan_sw_types(records: &[Pattern]) -> Vec<String> {
    distinct(records, |p| &p.scan_sw_type)
}

/// Known software groups, sorted and de-duplicated.
#[must_use]
pub fn sw_groups(records: &[Pattern]) -> Vec<String> {
    distinct(records, |p| &p.sw_group)
}

fn distinct(records: &[Pattern], attr: impl Fn(&Pattern) -> &str) -> Vec<String> {
    let set: BTreeSet<&str> = records
        .iter()
        .map(|p| attr(p))
        .filter(|v| !v.is_empty() && *v != UNSPECIFIED)
        .collect();
    set.into_iter().map(str::to_owned).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::types::PatternId;

    #[test]
    fn builtin_fetch_returns_ordered_records() {
        let records = PatternStore::builtin().fetch(PATTERNS_KIND).unwrap();
        assert_eq!(records.len(), 7);
        let ids: Vec<u32> = records.iter().map(|p| p.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(records[0].product_name, "Navisworks Freedom 2025");
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = PatternStore::builtin().fetch("widgets").unwrap_err();
        match err {
            ReviewError::DataUnavailable { kind, detail } => {
                assert_eq!(kind, "widgets");
                assert!(detail.contains("unknown data kind"));
            }
            other => panic!("expected DataUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn sw_types_are_sorted_and_deduplicated() {
        let records = PatternStore::builtin().fetch(PATTERNS_KIND).unwrap();
        let types = sw_types(&records);
        assert_eq!(types, vec!["General application", "Utility"]);
    }

    #[test]
    fn scan_sw_types_exclude_nothing_but_sentinel() {
        let records = PatternStore::builtin().fetch(PATTERNS_KIND).unwrap();
        let types = scan_sw_types(&records);
        assert_eq!(
            types,
            vec![
                "Backup and recovery",
                "CAD software",
                "Network management",
                "Viewer"
            ]
        );
    }

    #[test]
    fn sw_groups_exclude_unspecified_sentinel() {
        let records = PatternStore::builtin().fetch(PATTERNS_KIND).unwrap();
        let groups = sw_groups(&records);
        assert_eq!(groups, vec!["Autodesk Products"]);
    }

    #[test]
    fn enumerations_tolerate_empty_record_set() {
        assert!(sw_types(&[]).is_empty());
        assert!(scan_sw_types(&[]).is_empty());
        assert!(sw_groups(&[]).is_empty());
    }

    #[test]
    fn enumerations_skip_empty_values() {
        let records = vec![
            Pattern {
                id: PatternId::new(1),
                sw_type: String::new(),
                ..Pattern::default()
            },
            Pattern {
                id: PatternId::new(2),
                sw_type: "Utility".to_owned(),
                ..Pattern::default()
            },
        ];
        assert_eq!(sw_types(&records), vec!["Utility"]);
    }
}
