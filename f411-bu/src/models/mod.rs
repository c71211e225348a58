//! Data model for the bulk-upload pipeline

pub mod mapping;
pub mod row;
pub mod session;

pub use mapping::{ColumnMapping, ConfidenceTier, TargetField};
pub use row::{MappedFields, PartSummary, RowPage, RowStatus, RowUpdate, UploadSessionRow};
pub use session::{SessionStatus, UploadSession};
