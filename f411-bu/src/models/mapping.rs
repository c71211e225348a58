//! Column-mapping types
//!
//! A mapping assigns one source spreadsheet column to one of a fixed set of
//! target listing fields. AI suggestions carry a confidence score; manual
//! assignments are fully confident but keep the original suggestion around
//! (`suggested_confidence` + `user_overridden`) for audit.

use serde::{Deserialize, Serialize};

/// Fixed set of listing fields a source column may map to
///
/// `PartNumber` is mandatory: a mapping set is incomplete until some column
/// claims it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetField {
    PartNumber,
    Title,
    Description,
    Category,
    Condition,
    Price,
    Quantity,
    Location,
    Manufacturer,
    Model,
    SerialNumber,
    Notes,
}

impl TargetField {
    /// All target fields, in display order
    pub const ALL: [TargetField; 12] = [
        TargetField::PartNumber,
        TargetField::Title,
        TargetField::Description,
        TargetField::Category,
        TargetField::Condition,
        TargetField::Price,
        TargetField::Quantity,
        TargetField::Location,
        TargetField::Manufacturer,
        TargetField::Model,
        TargetField::SerialNumber,
        TargetField::Notes,
    ];

    /// Wire name (camelCase, matching the backend)
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetField::PartNumber => "partNumber",
            TargetField::Title => "title",
            TargetField::Description => "description",
            TargetField::Category => "category",
            TargetField::Condition => "condition",
            TargetField::Price => "price",
            TargetField::Quantity => "quantity",
            TargetField::Location => "location",
            TargetField::Manufacturer => "manufacturer",
            TargetField::Model => "model",
            TargetField::SerialNumber => "serialNumber",
            TargetField::Notes => "notes",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            TargetField::PartNumber => "Part Number",
            TargetField::Title => "Title",
            TargetField::Description => "Description",
            TargetField::Category => "Category",
            TargetField::Condition => "Condition",
            TargetField::Price => "Price",
            TargetField::Quantity => "Quantity",
            TargetField::Location => "Location",
            TargetField::Manufacturer => "Manufacturer",
            TargetField::Model => "Model",
            TargetField::SerialNumber => "Serial Number",
            TargetField::Notes => "Notes",
        }
    }

    /// Parse a wire name
    pub fn parse(s: &str) -> Option<TargetField> {
        TargetField::ALL.iter().copied().find(|f| f.as_str() == s)
    }
}

/// One source column → target field assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMapping {
    /// Header text of the source column
    pub source_column: String,

    /// Assigned target field (None = unmapped)
    pub target_field: Option<TargetField>,

    /// Effective confidence: the AI score, or 1.0 once the user assigns
    pub confidence: f64,

    /// Original AI-suggested confidence, retained across manual overrides
    #[serde(default)]
    pub suggested_confidence: Option<f64>,

    /// True once the user assigned or changed the target by hand
    #[serde(default)]
    pub user_overridden: bool,
}

impl ColumnMapping {
    /// An unmapped entry for a source column
    pub fn unmapped(source_column: impl Into<String>) -> Self {
        Self {
            source_column: source_column.into(),
            target_field: None,
            confidence: 0.0,
            suggested_confidence: None,
            user_overridden: false,
        }
    }

    /// An AI suggestion
    pub fn suggested(
        source_column: impl Into<String>,
        target_field: TargetField,
        confidence: f64,
    ) -> Self {
        Self {
            source_column: source_column.into(),
            target_field: Some(target_field),
            confidence,
            suggested_confidence: Some(confidence),
            user_overridden: false,
        }
    }

    pub fn is_mapped(&self) -> bool {
        self.target_field.is_some()
    }

    /// Confidence badge tier for this mapping (meaningful only when mapped)
    pub fn tier(&self) -> ConfidenceTier {
        ConfidenceTier::from_score(self.confidence)
    }
}

/// Confidence badge shown next to a mapped column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    /// High ≥ 0.8, Medium ≥ 0.5, else Low
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            ConfidenceTier::High
        } else if score >= 0.5 {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_thresholds() {
        assert_eq!(ConfidenceTier::from_score(0.8), ConfidenceTier::High);
        assert_eq!(ConfidenceTier::from_score(0.95), ConfidenceTier::High);
        assert_eq!(ConfidenceTier::from_score(0.79), ConfidenceTier::Medium);
        assert_eq!(ConfidenceTier::from_score(0.5), ConfidenceTier::Medium);
        assert_eq!(ConfidenceTier::from_score(0.49), ConfidenceTier::Low);
        assert_eq!(ConfidenceTier::from_score(0.0), ConfidenceTier::Low);
    }

    #[test]
    fn target_field_wire_names_round_trip() {
        for field in TargetField::ALL {
            assert_eq!(TargetField::parse(field.as_str()), Some(field));
        }
        assert_eq!(TargetField::parse("wingspan"), None);
    }

    #[test]
    fn serde_uses_camel_case() {
        let json = serde_json::to_string(&TargetField::PartNumber).unwrap();
        assert_eq!(json, "\"partNumber\"");
        let json = serde_json::to_string(&TargetField::SerialNumber).unwrap();
        assert_eq!(json, "\"serialNumber\"");
    }

    #[test]
    fn suggestion_retains_original_confidence() {
        let m = ColumnMapping::suggested("PN", TargetField::PartNumber, 0.72);
        assert_eq!(m.suggested_confidence, Some(0.72));
        assert!(!m.user_overridden);
        assert_eq!(m.tier(), ConfidenceTier::Medium);
    }
}
