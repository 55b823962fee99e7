//! Integration tests for the record provider, the enumeration providers,
//! and configuration loading.
//!
//! All file-backed cases run in temp directories — no side effects on the
//! working tree.

#![allow(clippy::unwrap_used)]

mod common;

use std::fs;

use patrev::config::WorkbenchConfig;
use patrev::error::ReviewError;
use patrev::store::{self, PATTERNS_KIND, PatternStore};

// ==========================================================================
// Record provider
// ==========================================================================

#[test]
fn builtin_store_supplies_ordered_records() {
    let records = PatternStore::builtin().fetch(PATTERNS_KIND).unwrap();
    assert_eq!(records.len(), 7);
    let ids: Vec<u32> = records.iter().map(|p| p.id.get()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn unknown_kind_aborts_with_data_unavailable() {
    let err = PatternStore::builtin().fetch("licenses").unwrap_err();
    assert!(matches!(err, ReviewError::DataUnavailable { .. }));
    assert!(!err.is_recoverable());
}

#[test]
fn file_override_supplies_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.json");
    fs::write(
        &path,
        r#"[
            {"id": 10, "controlPanelName": "Tool A", "productName": "Tool A", "swType": "Utility"},
            {"id": 11, "controlPanelName": "Tool B", "productName": "Tool B", "swType": "Unspecified"}
        ]"#,
    )
    .unwrap();

    let records = PatternStore::from_file(path).fetch(PATTERNS_KIND).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].control_panel_name, "Tool A");
    assert_eq!(records[1].id.get(), 11);
}

#[test]
fn missing_file_is_data_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let store = PatternStore::from_file(dir.path().join("absent.json"));
    let err = store.fetch(PATTERNS_KIND).unwrap_err();
    match err {
        ReviewError::DataUnavailable { kind, detail } => {
            assert_eq!(kind, PATTERNS_KIND);
            assert!(detail.contains("absent.json"));
        }
        other => panic!("expected DataUnavailable, got {other:?}"),
    }
}

#[test]
fn malformed_json_is_data_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    let err = PatternStore::from_file(path).fetch(PATTERNS_KIND).unwrap_err();
    match err {
        ReviewError::DataUnavailable { detail, .. } => {
            assert!(detail.contains("malformed"));
        }
        other => panic!("expected DataUnavailable, got {other:?}"),
    }
}

// ==========================================================================
// Enumeration providers
// ==========================================================================

#[test]
fn enumerations_are_sorted_deduplicated_and_sentinel_free() {
    let records = PatternStore::builtin().fetch(PATTERNS_KIND).unwrap();

    let types = store::sw_types(&records);
    assert_eq!(types, vec!["General application", "Utility"]);

    let scans = store::scan_sw_types(&records);
    let mut sorted = scans.clone();
    sorted.sort();
    assert_eq!(scans, sorted);
    assert!(!scans.iter().any(|v| v == store::UNSPECIFIED));

    let groups = store::sw_groups(&records);
    assert_eq!(groups, vec!["Autodesk Products"]);
}

#[test]
fn enumerations_tolerate_an_empty_record_set() {
    assert!(store::sw_types(&[]).is_empty());
    assert!(store::scan_sw_types(&[]).is_empty());
    assert!(store::sw_groups(&[]).is_empty());
}

#[test]
fn enumerations_work_for_file_backed_records() {
    let records = vec![
        common::pat(1, "A", "Corp"),
        common::pat(2, "B", "Corp"),
    ];
    // Both helpers use the same software type.
    assert_eq!(store::sw_types(&records), vec!["Utility"]);
}

// ==========================================================================
// Configuration
// ==========================================================================

#[test]
fn missing_config_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = WorkbenchConfig::load(dir.path()).unwrap();
    assert!(config.data.path.is_none());
    assert_eq!(config.ui.toast_secs, 3);
}

#[test]
fn config_data_path_feeds_the_store() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("records.json"),
        r#"[{"id": 1, "controlPanelName": "Configured"}]"#,
    )
    .unwrap();
    fs::write(
        dir.path().join(WorkbenchConfig::FILE_NAME),
        "[data]\npath = \"records.json\"\n",
    )
    .unwrap();

    let config = WorkbenchConfig::load(dir.path()).unwrap();
    let path = dir.path().join(config.data.path.unwrap());
    let records = PatternStore::from_file(path).fetch(PATTERNS_KIND).unwrap();
    assert_eq!(records[0].control_panel_name, "Configured");
}

#[test]
fn config_rejects_unknown_keys() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(WorkbenchConfig::FILE_NAME),
        "[data]\nurl = \"https://example.com\"\n",
    )
    .unwrap();

    let err = WorkbenchConfig::load(dir.path()).unwrap_err();
    let review: ReviewError = err.into();
    assert!(!review.is_recoverable());
}
