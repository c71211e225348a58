//! Upload session lifecycle
//!
//! One `UploadSession` tracks a single uploaded file through the pipeline:
//! created → parsed → mapped → matched → imported, with a failure variant
//! per remote stage.

use super::mapping::ColumnMapping;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pipeline status of an upload session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// File received, nothing processed yet
    Created,
    /// Headers and sample rows extracted
    Parsed,
    /// Column mapping persisted
    Mapped,
    /// Rows matched against the part master
    Matched,
    /// Matched rows converted to listings
    Imported,
    /// Server-side parse failed
    ParseFailed,
    /// Server-side matching failed
    MatchFailed,
    /// Import failed
    ImportFailed,
}

impl SessionStatus {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            SessionStatus::ParseFailed | SessionStatus::MatchFailed | SessionStatus::ImportFailed
        )
    }

    /// Matching has run (row counts are meaningful from here on)
    pub fn has_matched(&self) -> bool {
        matches!(self, SessionStatus::Matched | SessionStatus::Imported)
    }
}

/// Server-tracked lifecycle record for one bulk-import file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSession {
    pub id: Uuid,
    pub user_id: Uuid,

    /// Original filename as uploaded
    pub filename: String,
    pub mime_type: String,
    pub file_size: u64,

    pub status: SessionStatus,

    /// Row counters. `total_rows` is set by parsing; the other two are
    /// updated by matching and again by import.
    pub total_rows: u64,
    pub processed_rows: u64,
    pub error_rows: u64,

    /// Persisted column mapping (empty until the user confirms one)
    #[serde(default)]
    pub column_mapping: Vec<ColumnMapping>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UploadSession {
    /// `processed_rows + error_rows <= total_rows` once matching has run.
    /// Before matching the counters are not yet meaningful and the check
    /// passes vacuously.
    pub fn counts_consistent(&self) -> bool {
        if !self.status.has_matched() {
            return true;
        }
        self.processed_rows + self.error_rows <= self.total_rows
    }
}
