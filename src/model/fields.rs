//! The canonical comparison schema.
//!
//! Every record is projected onto a fixed set of comparison fields split
//! into two groups: *base* fields participate in mismatch detection,
//! *extra* fields are shown alongside but never counted as mismatches.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::pattern::Pattern;

// ---------------------------------------------------------------------------
// FieldKey
// ---------------------------------------------------------------------------

/// A canonical comparison field.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum FieldKey {
    ProductName,
    CopyrightName,
    LicenseType,
    SwType,
    ScanSwType,
    SwGroup,
    Summary,
    LicenseMemo,
    ProductUrl,
    LicenseEvidenceUrl,
}

impl FieldKey {
    /// Base fields — these participate in mismatch detection.
    pub const BASE: [Self; 6] = [
        Self::ProductName,
        Self::CopyrightName,
        Self::LicenseType,
        Self::SwType,
        Self::ScanSwType,
        Self::SwGroup,
    ];

    /// Extra fields — shown on the panels but excluded from mismatch
    /// detection regardless of equality.
    pub const EXTRA: [Self; 4] = [
        Self::Summary,
        Self::LicenseMemo,
        Self::ProductUrl,
        Self::LicenseEvidenceUrl,
    ];

    /// All canonical fields, base group first.
    pub const ALL: [Self; 10] = [
        Self::ProductName,
        Self::CopyrightName,
        Self::LicenseType,
        Self::SwType,
        Self::ScanSwType,
        Self::SwGroup,
        Self::Summary,
        Self::LicenseMemo,
        Self::ProductUrl,
        Self::LicenseEvidenceUrl,
    ];

    /// Whether this field participates in mismatch detection.
    #[must_use]
    pub const fn is_base(self) -> bool {
        matches!(
            self,
            Self::ProductName
                | Self::CopyrightName
                | Self::LicenseType
                | Self::SwType
                | Self::ScanSwType
                | Self::SwGroup
        )
    }

    /// Human-readable label used on panels and in mismatch summaries.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ProductName => "Product name",
            Self::CopyrightName => "Copyright holder",
            Self::LicenseType => "License type",
            Self::SwType => "Software type",
            Self::ScanSwType => "Scan classification",
            Self::SwGroup => "Software group",
            Self::Summary => "Summary",
            Self::LicenseMemo => "License memo",
            Self::ProductUrl => "Product URL",
            Self::LicenseEvidenceUrl => "License evidence URL",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// FieldValues
// ---------------------------------------------------------------------------

/// The projected, editable values of one record.
///
/// Total over [`FieldKey::ALL`]: a source attribute that is absent (or was
/// never set) projects to the empty string, so lookups never fail.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldValues(BTreeMap<FieldKey, String>);

impl FieldValues {
    /// Project a record onto the canonical comparison schema.
    #[must_use]
    pub fn project(p: &Pattern) -> Self {
        let mut values = BTreeMap::new();
        values.insert(FieldKey::ProductName, p.product_name.clone());
        values.insert(FieldKey::CopyrightName, p.product_copyright_name.clone());
        values.insert(FieldKey::LicenseType, p.license_type.clone());
        values.insert(FieldKey::SwType, p.sw_type.clone());
        values.insert(FieldKey::ScanSwType, p.scan_sw_type.clone());
        values.insert(FieldKey::SwGroup, p.sw_group.clone());
        values.insert(FieldKey::Summary, p.summary.clone());
        values.insert(FieldKey::LicenseMemo, p.license_memo.clone());
        values.insert(FieldKey::ProductUrl, p.product_url.clone());
        values.insert(FieldKey::LicenseEvidenceUrl, p.license_evidence_url.clone());
        Self(values)
    }

    /// Look up a field value. Missing keys read as the empty string.
    #[must_use]
    pub fn get(&self, key: FieldKey) -> &str {
        self.0.get(&key).map_or("", String::as_str)
    }

    /// Overwrite a field value.
    pub fn set(&mut self, key: FieldKey, value: impl Into<String>) {
        self.0.insert(key, value.into());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
