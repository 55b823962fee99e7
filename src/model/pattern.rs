//! The classification record under review.
//!
//! A [`Pattern`] is immutable for the lifetime of a session: records are
//! supplied once by the provider and never written back. All in-session
//! edits happen on a projected working copy (see
//! [`fields::FieldValues`](super::fields::FieldValues)).

use serde::{Deserialize, Serialize};

use super::types::PatternId;

/// A single software-classification entry.
///
/// The first group of attributes feeds the candidate table; the
/// registration group below it is what the compare/merge flow projects
/// onto the canonical comparison fields. Every attribute except `id` is
/// optional in the provider's JSON and defaults to the empty string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Pattern {
    pub id: PatternId,
    pub customer: String,
    pub major_copyright: String,
    pub pattern_score: String,
    pub os: String,
    pub inspection_date: String,
    pub control_panel_name: String,
    pub copyright_name: String,
    pub ai_product_name: String,
    pub ai_copyright_name: String,
    pub ai_class_type: String,
    pub accuracy: String,
    pub pattern_review: String,
    pub reason: String,
    pub file_name: String,

    // Registration detail — source of the comparison-field projection.
    pub product_name: String,
    pub product_copyright_name: String,
    pub license_type: String,
    pub sw_type: String,
    pub scan_sw_type: String,
    pub sw_group: String,
    pub summary: String,
    pub license_memo: String,
    pub product_url: String,
    pub license_evidence_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_fills_missing_attributes_with_empty() {
        let p: Pattern =
            serde_json::from_str(r#"{"id": 9, "productName": "Thing"}"#).expect("parse");
        assert_eq!(p.id, PatternId::new(9));
        assert_eq!(p.product_name, "Thing");
        assert_eq!(p.copyright_name, "");
        assert_eq!(p.license_evidence_url, "");
    }

    #[test]
    fn serde_roundtrip() {
        let p = Pattern {
            id: PatternId::new(1),
            control_panel_name: "Fiddler Everywhere 6.5.0".to_owned(),
            product_name: "Fiddler Everywhere 6".to_owned(),
            license_type: "Commercial".to_owned(),
            ..Pattern::default()
        };
        let json = serde_json::to_string(&p).expect("serialize");
        let decoded: Pattern = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(decoded, p);
    }

    #[test]
    fn camel_case_keys() {
        let p = Pattern::default();
        let json = serde_json::to_string(&p).expect("serialize");
        assert!(json.contains("controlPanelName"));
        assert!(json.contains("scanSwType"));
        assert!(!json.contains("control_panel_name"));
    }
}
