//! Per-row processing results
//!
//! `MappedFields` replaces the original free-form string map with a typed
//! struct: one optional slot per known target field plus an `extras` bag
//! for values whose source column mapped to nothing we recognize. The wire
//! representation stays a single flat JSON object either way.

use super::mapping::TargetField;
use f411_common::api::Pagination;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Match outcome for one source row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    /// Confidently matched to a part-master record
    Matched,
    /// Matched but with low confidence or missing fields
    Partial,
    /// No part-master candidate found
    Unmatched,
    /// Row failed validation; see `errors`
    Error,
}

impl RowStatus {
    /// Wire name, used for the `status` query filter
    pub fn as_str(&self) -> &'static str {
        match self {
            RowStatus::Matched => "matched",
            RowStatus::Partial => "partial",
            RowStatus::Unmatched => "unmatched",
            RowStatus::Error => "error",
        }
    }
}

/// Normalized listing fields for one row after mapping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappedFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Values carried along from columns outside the known field set
    #[serde(flatten)]
    pub extras: HashMap<String, String>,
}

impl MappedFields {
    /// Read one known field
    pub fn get(&self, field: TargetField) -> Option<&str> {
        let slot = match field {
            TargetField::PartNumber => &self.part_number,
            TargetField::Title => &self.title,
            TargetField::Description => &self.description,
            TargetField::Category => &self.category,
            TargetField::Condition => &self.condition,
            TargetField::Price => &self.price,
            TargetField::Quantity => &self.quantity,
            TargetField::Location => &self.location,
            TargetField::Manufacturer => &self.manufacturer,
            TargetField::Model => &self.model,
            TargetField::SerialNumber => &self.serial_number,
            TargetField::Notes => &self.notes,
        };
        slot.as_deref()
    }

    /// Write one known field. Empty strings clear the slot.
    pub fn set(&mut self, field: TargetField, value: impl Into<String>) {
        let value = value.into();
        let value = if value.trim().is_empty() { None } else { Some(value) };
        let slot = match field {
            TargetField::PartNumber => &mut self.part_number,
            TargetField::Title => &mut self.title,
            TargetField::Description => &mut self.description,
            TargetField::Category => &mut self.category,
            TargetField::Condition => &mut self.condition,
            TargetField::Price => &mut self.price,
            TargetField::Quantity => &mut self.quantity,
            TargetField::Location => &mut self.location,
            TargetField::Manufacturer => &mut self.manufacturer,
            TargetField::Model => &mut self.model,
            TargetField::SerialNumber => &mut self.serial_number,
            TargetField::Notes => &mut self.notes,
        };
        *slot = value;
    }

    /// Known fields that currently hold a value, in display order
    pub fn present(&self) -> Vec<(TargetField, &str)> {
        TargetField::ALL
            .iter()
            .filter_map(|&f| self.get(f).map(|v| (f, v)))
            .collect()
    }

    /// Required fields (from `required`) with no value
    pub fn missing_from(&self, required: &[TargetField]) -> Vec<TargetField> {
        required
            .iter()
            .copied()
            .filter(|&f| self.get(f).map(|v| v.trim().is_empty()).unwrap_or(true))
            .collect()
    }
}

/// One source-file row's processing result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSessionRow {
    pub id: Uuid,
    pub session_id: Uuid,

    /// 1-based, matches the source file
    pub row_number: u64,

    /// Original header → original cell text
    #[serde(default)]
    pub raw_values: HashMap<String, String>,

    /// Present only after mapping has run
    #[serde(default)]
    pub mapped_values: Option<MappedFields>,

    pub status: RowStatus,

    /// 0–1; None until matching runs
    pub match_confidence: Option<f64>,

    /// Part-master record this row matched, if any
    pub matched_part_id: Option<Uuid>,

    /// Validation/matching problems; rendered inline, never thrown
    #[serde(default)]
    pub errors: Vec<String>,

    /// Listing created from this row once imported
    pub listing_id: Option<Uuid>,
}

impl UploadSessionRow {
    /// Model invariants: a part reference only accompanies a (partial)
    /// match, and errors only accompany error status.
    pub fn is_consistent(&self) -> bool {
        if self.matched_part_id.is_some()
            && !matches!(self.status, RowStatus::Matched | RowStatus::Partial)
        {
            return false;
        }
        if !self.errors.is_empty() && self.status != RowStatus::Error {
            return false;
        }
        true
    }
}

/// Payload for persisting a row edit: the full edited field set, plus an
/// optional corrected part match. Flattens to one JSON object on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowUpdate {
    #[serde(flatten)]
    pub fields: MappedFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_part_id: Option<Uuid>,
}

/// One page of rows plus pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowPage {
    pub rows: Vec<UploadSessionRow>,
    pub pagination: Pagination,
}

/// Part-master search hit (row-edit remediation flow)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartSummary {
    pub id: Uuid,
    pub part_number: String,
    pub title: String,
    #[serde(default)]
    pub manufacturer: Option<String>,
}
