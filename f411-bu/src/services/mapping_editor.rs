//! Column-mapping edit rules
//!
//! Owns the list of `ColumnMapping` entries while the user is on the
//! mapping step and enforces its invariants:
//!
//! - no two columns may claim the same target field
//! - clearing a mapping keeps the entry (the column reappears as
//!   unmapped) and frees its former target for reassignment
//! - manual assignment sets effective confidence to 1.0 and flags the
//!   entry as user-overridden, keeping the AI's score for audit
//! - the set is complete only once some column maps to the part number

use crate::error::{UploadError, UploadResult};
use crate::models::{ColumnMapping, TargetField};

/// Editable mapping set for one session's source columns
#[derive(Debug, Clone, Default)]
pub struct MappingEditor {
    mappings: Vec<ColumnMapping>,
}

impl MappingEditor {
    /// Build from AI suggestions, adding an unmapped entry for every
    /// header the suggestions did not cover.
    pub fn from_suggestions(headers: &[String], suggestions: Vec<ColumnMapping>) -> Self {
        let mut mappings = suggestions;
        for header in headers {
            if !mappings.iter().any(|m| &m.source_column == header) {
                mappings.push(ColumnMapping::unmapped(header.clone()));
            }
        }
        Self { mappings }
    }

    /// Wrap an existing mapping list (e.g. one loaded from the server)
    pub fn from_entries(mappings: Vec<ColumnMapping>) -> Self {
        Self { mappings }
    }

    pub fn mappings(&self) -> &[ColumnMapping] {
        &self.mappings
    }

    /// Manually assign `target` to `source`. Fails when another column
    /// already claims the target.
    pub fn assign(&mut self, source: &str, target: TargetField) -> UploadResult<()> {
        if let Some(holder) = self
            .mappings
            .iter()
            .find(|m| m.target_field == Some(target) && m.source_column != source)
        {
            return Err(UploadError::Validation(format!(
                "{} is already mapped from column \"{}\"",
                target.label(),
                holder.source_column
            )));
        }

        let entry = self
            .mappings
            .iter_mut()
            .find(|m| m.source_column == source)
            .ok_or_else(|| {
                UploadError::Validation(format!("Unknown source column \"{}\"", source))
            })?;

        entry.target_field = Some(target);
        entry.confidence = 1.0;
        entry.user_overridden = true;
        Ok(())
    }

    /// Remove a column's assignment. The entry stays, unmapped, with its
    /// confidence zeroed.
    pub fn clear(&mut self, source: &str) {
        if let Some(entry) = self.mappings.iter_mut().find(|m| m.source_column == source) {
            entry.target_field = None;
            entry.confidence = 0.0;
            entry.user_overridden = true;
        }
    }

    /// Target fields still selectable for `source`: everything unclaimed,
    /// plus the column's own current target.
    pub fn available_targets(&self, source: &str) -> Vec<TargetField> {
        let own = self
            .mappings
            .iter()
            .find(|m| m.source_column == source)
            .and_then(|m| m.target_field);

        TargetField::ALL
            .iter()
            .copied()
            .filter(|&field| {
                Some(field) == own
                    || !self
                        .mappings
                        .iter()
                        .any(|m| m.target_field == Some(field))
            })
            .collect()
    }

    /// Columns with no assignment (the "Unmapped Columns" section)
    pub fn unmapped_columns(&self) -> Vec<&str> {
        self.mappings
            .iter()
            .filter(|m| !m.is_mapped())
            .map(|m| m.source_column.as_str())
            .collect()
    }

    /// "Confirm Mapping" gate: some non-empty column maps to PartNumber
    pub fn is_complete(&self) -> bool {
        self.mappings.iter().any(|m| {
            m.target_field == Some(TargetField::PartNumber) && !m.source_column.trim().is_empty()
        })
    }

    /// Check the uniqueness invariant across all mapped entries
    pub fn validate(&self) -> UploadResult<()> {
        let mut seen: Vec<TargetField> = Vec::new();
        let mut duplicates: Vec<&'static str> = Vec::new();
        for m in &self.mappings {
            if let Some(target) = m.target_field {
                if seen.contains(&target) {
                    if !duplicates.contains(&target.label()) {
                        duplicates.push(target.label());
                    }
                } else {
                    seen.push(target);
                }
            }
        }
        if duplicates.is_empty() {
            Ok(())
        } else {
            Err(UploadError::Validation(format!(
                "Duplicate target fields: {}",
                duplicates.join(", ")
            )))
        }
    }

    /// Entries to persist: mapped columns only (unmapped are dropped at
    /// save time, matching the backend contract)
    pub fn mapped_entries(&self) -> Vec<ColumnMapping> {
        self.mappings.iter().filter(|m| m.is_mapped()).cloned().collect()
    }
}
