//! Row review: selection, import scoping, and the row-edit form
//!
//! Selection genuinely scopes the import: "Import Selected" sends the
//! checked row ids to the backend, while "Import All Matched" imports every
//! matched row in the session regardless of the current page or filter.

use crate::models::{MappedFields, PartSummary, RowUpdate, TargetField, UploadSessionRow};
use std::collections::HashSet;
use uuid::Uuid;

/// Fields a row must carry to become a listing
pub const REQUIRED_FIELDS: [TargetField; 3] =
    [TargetField::PartNumber, TargetField::Title, TargetField::Price];

/// Below this match confidence the edit modal offers a part search
pub const LOW_CONFIDENCE: f64 = 0.5;

/// Checkbox state over the review grid
#[derive(Debug, Clone, Default)]
pub struct RowSelection {
    ids: HashSet<Uuid>,
}

impl RowSelection {
    pub fn select(&mut self, id: Uuid) {
        self.ids.insert(id);
    }

    pub fn deselect(&mut self, id: Uuid) {
        self.ids.remove(&id);
    }

    pub fn toggle(&mut self, id: Uuid) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// Select-all over the rows currently in view
    pub fn select_all<'a>(&mut self, rows: impl IntoIterator<Item = &'a UploadSessionRow>) {
        self.ids.extend(rows.into_iter().map(|r| r.id));
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn ids(&self) -> Vec<Uuid> {
        self.ids.iter().copied().collect()
    }
}

/// Which rows an import call covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportScope {
    /// Every matched row in the session
    AllMatched,
    /// Only these rows
    Selected(Vec<Uuid>),
}

impl ImportScope {
    /// Scope for the current selection; empty selection means all matched
    pub fn from_selection(selection: &RowSelection) -> Self {
        if selection.is_empty() {
            ImportScope::AllMatched
        } else {
            ImportScope::Selected(selection.ids())
        }
    }

    /// Wire form: None = all matched
    pub fn row_ids(&self) -> Option<&[Uuid]> {
        match self {
            ImportScope::AllMatched => None,
            ImportScope::Selected(ids) => Some(ids),
        }
    }
}

/// In-memory edit state for one row (the edit modal)
///
/// Nothing here is persisted until the edit is saved via `update_row`.
#[derive(Debug, Clone)]
pub struct RowEditForm {
    pub row_id: Uuid,
    pub fields: MappedFields,
    pub match_confidence: Option<f64>,
    pub matched_part_id: Option<Uuid>,
}

impl RowEditForm {
    pub fn from_row(row: &UploadSessionRow) -> Self {
        Self {
            row_id: row.id,
            fields: row.mapped_values.clone().unwrap_or_default(),
            match_confidence: row.match_confidence,
            matched_part_id: row.matched_part_id,
        }
    }

    /// Required fields currently missing a value
    pub fn missing_required(&self) -> Vec<TargetField> {
        self.fields.missing_from(&REQUIRED_FIELDS)
    }

    /// Offer the part-number search when the match is weak or required
    /// data is missing
    pub fn needs_part_search(&self) -> bool {
        self.match_confidence.map(|c| c < LOW_CONFIDENCE).unwrap_or(true)
            || !self.missing_required().is_empty()
    }

    /// Attach a corrected part match (in-memory only)
    pub fn attach_part(&mut self, part: &PartSummary) {
        self.matched_part_id = Some(part.id);
        self.fields.set(TargetField::PartNumber, part.part_number.clone());
    }

    /// Full edited field set for persistence
    pub fn into_update(self) -> RowUpdate {
        RowUpdate {
            fields: self.fields,
            matched_part_id: self.matched_part_id,
        }
    }
}
