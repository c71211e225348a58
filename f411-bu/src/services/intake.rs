//! File intake validation
//!
//! Checks a local file before any bytes go over the wire: accepted
//! extension, non-empty, under the size cap. MIME is sniffed from content
//! with an extension-table fallback for formats `infer` cannot identify
//! (plain-text CSV in particular).

use crate::error::{UploadError, UploadResult};
use std::path::Path;

/// Client-side upload cap
pub const MAX_FILE_SIZE: u64 = 25 * 1024 * 1024;

/// Spreadsheet/document formats accepted from the file picker
const DOCUMENT_EXTENSIONS: [&str; 5] = ["csv", "xlsx", "xls", "pdf", "pages"];

/// Image formats accepted from camera capture
const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// A validated file ready for upload
#[derive(Debug, Clone)]
pub struct IntakeFile {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Where the file came from; camera captures widen the accepted types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeSource {
    FilePicker,
    Camera,
}

impl IntakeFile {
    /// Read and validate a file from disk
    pub fn open(path: &Path, source: IntakeSource) -> UploadResult<Self> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| UploadError::Validation("File has no usable name".to_string()))?
            .to_string();

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        if !extension_accepted(&extension, source) {
            return Err(UploadError::Validation(format!(
                "Unsupported file type \".{}\". Accepted: {}",
                extension,
                accepted_list(source)
            )));
        }

        let bytes = std::fs::read(path)?;
        if bytes.is_empty() {
            return Err(UploadError::Validation(format!("{} is empty", filename)));
        }
        if bytes.len() as u64 > MAX_FILE_SIZE {
            return Err(UploadError::Validation(format!(
                "{} is {:.1} MB; the limit is {} MB",
                filename,
                bytes.len() as f64 / (1024.0 * 1024.0),
                MAX_FILE_SIZE / (1024 * 1024)
            )));
        }

        let mime_type = sniff_mime(&bytes, &extension);
        Ok(Self {
            filename,
            mime_type,
            bytes,
        })
    }
}

fn extension_accepted(extension: &str, source: IntakeSource) -> bool {
    if DOCUMENT_EXTENSIONS.contains(&extension) {
        return true;
    }
    source == IntakeSource::Camera && IMAGE_EXTENSIONS.contains(&extension)
}

fn accepted_list(source: IntakeSource) -> String {
    let mut list: Vec<&str> = DOCUMENT_EXTENSIONS.to_vec();
    if source == IntakeSource::Camera {
        list.extend(IMAGE_EXTENSIONS);
    }
    list.join(", ")
}

/// Content sniffing first, extension table second
fn sniff_mime(bytes: &[u8], extension: &str) -> String {
    if let Some(kind) = infer::get(bytes) {
        return kind.mime_type().to_string();
    }
    match extension {
        "csv" => "text/csv",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xls" => "application/vnd.ms-excel",
        "pdf" => "application/pdf",
        "pages" => "application/vnd.apple.pages",
        _ => "application/octet-stream",
    }
    .to_string()
}
