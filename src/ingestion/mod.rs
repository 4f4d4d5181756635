//! Loading entrypoints and format implementations.
//!
//! Most callers should use [`load_table_from_path`] (from [`unified`]) which:
//!
//! - detects format by file extension (or you can override via
//!   [`LoadOptions`])
//! - enforces the upload size ceiling before reading file contents
//! - loads the file into an in-memory [`crate::types::DataSet`] with an
//!   inferred schema
//! - optionally reports success/failure/alerts to an [`ImportObserver`]
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`json`]
//! - [`parquet`]
//! - [`feather`]

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod feather;
pub mod format;
pub mod infer;
pub mod json;
pub mod observability;
pub mod parquet;
pub mod unified;

pub use format::{check_upload_size, TableFormat, MAX_UPLOAD_BYTES};
pub use observability::{
    CompositeObserver, FileObserver, ImportContext, ImportObserver, ImportSeverity, ImportStats,
    StdErrObserver,
};
pub use unified::{load_table_from_path, LoadOptions};
