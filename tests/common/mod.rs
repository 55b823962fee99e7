//! Shared test helpers for patrev integration tests.
//!
//! Sessions are built either from hand-rolled records (`pat`) or from the
//! built-in sample set, always through the public `open_review` entry.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]

use patrev::model::pattern::Pattern;
use patrev::model::types::PatternId;
use patrev::session::{MergeSession, ReviewScope, open_review};

/// A minimal record with the given product name and copyright holder.
pub fn pat(id: u32, product: &str, copyright: &str) -> Pattern {
    Pattern {
        id: PatternId::new(id),
        control_panel_name: format!("{product} (panel)"),
        product_name: product.to_owned(),
        product_copyright_name: copyright.to_owned(),
        license_type: "Free".to_owned(),
        sw_type: "Utility".to_owned(),
        scan_sw_type: "Viewer".to_owned(),
        sw_group: "Unspecified".to_owned(),
        summary: format!("{product} summary"),
        ..Pattern::default()
    }
}

/// Wrap raw integers as record ids.
pub fn ids(raw: &[u32]) -> Vec<PatternId> {
    raw.iter().copied().map(PatternId::new).collect()
}

/// Open a review over `records`, expecting a comparing session.
pub fn comparing(records: &[Pattern], selected: &[u32]) -> MergeSession {
    match open_review(records, &ids(selected)).expect("review should open") {
        ReviewScope::Comparing(session) => session,
        ReviewScope::Single(_) => panic!("expected a comparing session"),
    }
}
