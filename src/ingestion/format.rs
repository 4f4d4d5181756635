//! Upload format detection.

use std::path::Path;

use crate::error::{ImportError, ImportResult};

/// Maximum accepted upload size (10 MiB). Checked against file metadata
/// before any content is read.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Comma-separated values (delimiter detected at parse time).
    Csv,
    /// Excel workbooks (`.xlsx`, `.xls`).
    Excel,
    /// JSON array-of-objects or NDJSON.
    Json,
    /// Apache Parquet.
    Parquet,
    /// Feather (Arrow IPC file format).
    Feather,
}

impl TableFormat {
    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" => Some(Self::Excel),
            "json" | "ndjson" => Some(Self::Json),
            "parquet" | "pq" => Some(Self::Parquet),
            "feather" => Some(Self::Feather),
            _ => None,
        }
    }

    /// Detect the format of `path` from its extension.
    ///
    /// Unknown or missing extensions are an [`ImportError::InvalidInput`],
    /// raised before the file is opened.
    pub fn detect(path: &Path) -> ImportResult<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                ImportError::invalid(format!(
                    "cannot detect format: path has no extension ({})",
                    path.display()
                ))
            })?;

        Self::from_extension(ext).ok_or_else(|| {
            ImportError::invalid(format!(
                "unsupported file format '{ext}' ({})",
                path.display()
            ))
        })
    }
}

/// Reject uploads over [`MAX_UPLOAD_BYTES`] using file metadata only.
pub fn check_upload_size(path: &Path) -> ImportResult<()> {
    let len = std::fs::metadata(path)?.len();
    if len > MAX_UPLOAD_BYTES {
        return Err(ImportError::invalid(format!(
            "file too large: {len} bytes (maximum {MAX_UPLOAD_BYTES})"
        )));
    }
    Ok(())
}
