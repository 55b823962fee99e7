//! The compare/merge session state machine.
//!
//! A session owns master selection, comparison-target selection,
//! per-record review tracking, mismatch computation against the live
//! master values, and edit tracking against a snapshot taken when the
//! master was chosen. It is constructed once per review invocation and
//! dropped when the view closes — nothing persists across sessions.
//!
//! # Lifecycle
//!
//! ```text
//! open_review(selection) ─┬→ Single     (one row — detail sheet)
//!                         └→ Comparing  (two or more rows — MergeSession)
//! ```
//!
//! Within `Comparing`, every operation executes synchronously and either
//! mutates the session or returns a recoverable error leaving all state
//! unchanged.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::ReviewError;
use crate::model::fields::{FieldKey, FieldValues};
use crate::model::pattern::Pattern;
use crate::model::types::PatternId;

// ---------------------------------------------------------------------------
// ReviewScope
// ---------------------------------------------------------------------------

/// How a checked selection is routed.
#[derive(Clone, Debug)]
pub enum ReviewScope {
    /// Exactly one row — the read-only single-record detail sheet.
    Single(Pattern),
    /// Two or more rows — the full compare/merge session.
    Comparing(MergeSession),
}

/// Route a selection into a review scope.
///
/// `selected` carries the user's checking order, which becomes the working
/// set order for the whole session. Identifiers not present in `records`
/// are skipped.
///
/// # Errors
/// Returns [`ReviewError::NoSelection`] when no selected id matches a
/// record.
pub fn open_review(
    records: &[Pattern],
    selected: &[PatternId],
) -> Result<ReviewScope, ReviewError> {
    let mut working: Vec<Pattern> = Vec::with_capacity(selected.len());
    for &id in selected {
        match records.iter().find(|p| p.id == id) {
            Some(p) if working.iter().all(|w| w.id != id) => working.push(p.clone()),
            Some(_) => {}
            None => debug!(%id, "selected id not in record set, skipping"),
        }
    }

    match working.len() {
        0 => Err(ReviewError::NoSelection),
        1 => Ok(ReviewScope::Single(working.remove(0))),
        _ => Ok(ReviewScope::Comparing(MergeSession::new(working))),
    }
}

// ---------------------------------------------------------------------------
// MergeSession
// ---------------------------------------------------------------------------

/// The mutable state of one compare/merge session.
///
/// Invariants, upheld by every operation:
/// - the master is always a member of the working set, and the working set
///   is never empty;
/// - the comparison target, when set, is a member of the working set and
///   never equals the master;
/// - the reviewed set is a subset of the working set and always contains
///   the master.
#[derive(Clone, Debug)]
pub struct MergeSession {
    /// Working set in selection order. Never reordered.
    working: Vec<Pattern>,
    master_id: PatternId,
    compare_id: Option<PatternId>,
    reviewed: BTreeSet<PatternId>,
    /// Snapshot of the master's projected values at the moment it became
    /// master. Immutable until the next master swap.
    original_master: FieldValues,
    /// Live, editable values shown on the master panel.
    master_fields: FieldValues,
}

impl MergeSession {
    /// Start a session over a working set of at least one record.
    ///
    /// The first record becomes master; the second (if any) becomes the
    /// initial comparison target.
    fn new(working: Vec<Pattern>) -> Self {
        debug_assert!(!working.is_empty(), "working set must not be empty");
        let master_id = working[0].id;
        let snapshot = FieldValues::project(&working[0]);
        let second = working.get(1).map(|p| p.id);

        let mut session = Self {
            working,
            master_id,
            compare_id: None,
            reviewed: BTreeSet::from([master_id]),
            master_fields: snapshot.clone(),
            original_master: snapshot,
        };
        if let Some(id) = second {
            // Cannot fail: the second record is a non-master member.
            let _ = session.select_comparison_target(id);
        }
        session
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The working set, in selection order.
    #[must_use]
    pub fn records(&self) -> &[Pattern] {
        &self.working
    }

    /// Number of records in the working set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.working.len()
    }

    /// Whether the working set is empty. Always `false` for a live
    /// session; provided for API completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.working.is_empty()
    }

    /// Identifier of the current master.
    #[must_use]
    pub const fn master_id(&self) -> PatternId {
        self.master_id
    }

    /// Identifier of the current comparison target, if any.
    #[must_use]
    pub const fn compare_id(&self) -> Option<PatternId> {
        self.compare_id
    }

    /// The master record.
    #[must_use]
    pub fn master(&self) -> &Pattern {
        self.record(self.master_id)
            .expect("master is always a member of the working set")
    }

    /// The comparison-target record, if one is active.
    #[must_use]
    pub fn compare_record(&self) -> Option<&Pattern> {
        self.compare_id.and_then(|id| self.record(id))
    }

    /// The live, editable master panel values.
    #[must_use]
    pub const fn master_fields(&self) -> &FieldValues {
        &self.master_fields
    }

    /// The snapshot taken when the current master was chosen.
    #[must_use]
    pub const fn original_master_values(&self) -> &FieldValues {
        &self.original_master
    }

    /// Whether a record has been reviewed in this session.
    #[must_use]
    pub fn is_reviewed(&self, id: PatternId) -> bool {
        self.reviewed.contains(&id)
    }

    fn record(&self, id: PatternId) -> Option<&Pattern> {
        self.working.iter().find(|p| p.id == id)
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Show `id` in the comparison slot and mark it reviewed.
    ///
    /// Re-selecting the current target is allowed; it (re)marks the record
    /// reviewed, which is how a target displaced by a master swap gets
    /// reviewed again.
    ///
    /// # Errors
    /// [`ReviewError::UnknownRecord`] if `id` is not in the working set;
    /// [`ReviewError::MasterAsTarget`] if `id` is the master.
    pub fn select_comparison_target(&mut self, id: PatternId) -> Result<(), ReviewError> {
        if self.record(id).is_none() {
            return Err(ReviewError::UnknownRecord { id });
        }
        if id == self.master_id {
            return Err(ReviewError::MasterAsTarget { id });
        }
        self.compare_id = Some(id);
        self.reviewed.insert(id);
        Ok(())
    }

    /// Make `id` the master.
    ///
    /// All review state is discarded and re-seeded with the new master,
    /// and the master snapshot is retaken — any in-session edits to the
    /// previous master are gone. If the new master was the comparison
    /// target, the displaced master takes its place in the comparison
    /// slot (without being marked reviewed).
    ///
    /// # Errors
    /// [`ReviewError::UnknownRecord`] if `id` is not in the working set.
    pub fn swap_master(&mut self, id: PatternId) -> Result<(), ReviewError> {
        let Some(new_master) = self.record(id) else {
            return Err(ReviewError::UnknownRecord { id });
        };
        let snapshot = FieldValues::project(new_master);
        let old_master = self.master_id;
        let displaced_target = self.compare_id == Some(id);

        self.reviewed.clear();
        self.master_id = id;
        self.reviewed.insert(id);
        self.original_master = snapshot.clone();
        self.master_fields = snapshot;

        if displaced_target {
            self.compare_id = Some(old_master);
        }
        debug!(master = %id, displaced = displaced_target, "master swapped");
        Ok(())
    }

    /// Remove a non-master record from the working set.
    ///
    /// If the excluded record was the comparison target, the first
    /// remaining non-master member takes its place (and is marked
    /// reviewed); with none left, the comparison slot is cleared.
    ///
    /// # Errors
    /// [`ReviewError::MasterExcluded`] if `id` is the master;
    /// [`ReviewError::UnknownRecord`] if `id` is not in the working set.
    pub fn exclude(&mut self, id: PatternId) -> Result<(), ReviewError> {
        if id == self.master_id {
            return Err(ReviewError::MasterExcluded { id });
        }
        if self.record(id).is_none() {
            return Err(ReviewError::UnknownRecord { id });
        }

        self.working.retain(|p| p.id != id);
        self.reviewed.remove(&id);

        if self.compare_id == Some(id) {
            let next = self
                .working
                .iter()
                .map(|p| p.id)
                .find(|&pid| pid != self.master_id);
            match next {
                // Cannot fail: `next` is a non-master member.
                Some(pid) => self.select_comparison_target(pid)?,
                None => self.compare_id = None,
            }
        }
        debug!(%id, remaining = self.working.len(), "record excluded");
        Ok(())
    }

    /// Overwrite one live master field. The snapshot is untouched, so the
    /// change shows up in [`edited_fields`](Self::edited_fields).
    pub fn edit_master_field(&mut self, key: FieldKey, value: impl Into<String>) {
        self.master_fields.set(key, value);
    }

    /// Restore one master field to its snapshot value.
    pub fn rollback_field(&mut self, key: FieldKey) {
        let original = self.original_master.get(key).to_owned();
        self.master_fields.set(key, original);
    }

    /// Copy the comparison target's projected value for `key` into the
    /// live master values. Counts as an edit.
    ///
    /// # Errors
    /// [`ReviewError::NoComparison`] if no comparison target is active.
    pub fn apply_to_master(&mut self, key: FieldKey) -> Result<(), ReviewError> {
        let target = self.compare_record().ok_or(ReviewError::NoComparison)?;
        let value = FieldValues::project(target).get(key).to_owned();
        self.master_fields.set(key, value);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Derived state
    // ------------------------------------------------------------------

    /// Base fields where the live master values and the current
    /// comparison target disagree (trimmed comparison). Empty when no
    /// target is active. Extra fields are never reported.
    #[must_use]
    pub fn mismatches(&self) -> BTreeSet<FieldKey> {
        self.compare_record()
            .map(|target| base_mismatches(&self.master_fields, &FieldValues::project(target)))
            .unwrap_or_default()
    }

    /// Base-field mismatch set between the live master values and an
    /// arbitrary working-set member — the sidebar's per-row summary.
    /// Reflects in-session master edits immediately.
    ///
    /// # Errors
    /// [`ReviewError::UnknownRecord`] if `id` is not in the working set.
    pub fn mismatches_with(&self, id: PatternId) -> Result<BTreeSet<FieldKey>, ReviewError> {
        let record = self.record(id).ok_or(ReviewError::UnknownRecord { id })?;
        Ok(base_mismatches(
            &self.master_fields,
            &FieldValues::project(record),
        ))
    }

    /// Fields whose live master value differs from the snapshot (trimmed
    /// comparison). Drives edit highlighting and rollback visibility.
    #[must_use]
    pub fn edited_fields(&self) -> BTreeSet<FieldKey> {
        FieldKey::ALL
            .into_iter()
            .filter(|&key| {
                self.master_fields.get(key).trim() != self.original_master.get(key).trim()
            })
            .collect()
    }

    /// Whether every working-set member has been reviewed.
    #[must_use]
    pub fn is_fully_reviewed(&self) -> bool {
        self.working.iter().all(|p| self.reviewed.contains(&p.id))
    }

    /// Number of working-set members not yet reviewed. When non-zero, the
    /// caller must ask for confirmation before committing.
    #[must_use]
    pub fn unreviewed_count(&self) -> usize {
        self.working
            .iter()
            .filter(|p| !self.reviewed.contains(&p.id))
            .count()
    }

    /// Commit the session and discard it. Registration is a demonstration
    /// no-op — the returned count only feeds the confirmation toast.
    #[must_use]
    pub fn finalize(self) -> usize {
        debug!(count = self.working.len(), "session finalized");
        self.working.len()
    }
}

/// Keys in the base group where `master` and `other` disagree after
/// trimming surrounding whitespace.
fn base_mismatches(master: &FieldValues, other: &FieldValues) -> BTreeSet<FieldKey> {
    FieldKey::BASE
        .into_iter()
        .filter(|&key| master.get(key).trim() != other.get(key).trim())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
