//! `tabular-import` turns user-supplied tabular files into real SQL tables.
//!
//! The pipeline: detect the upload format from the file extension, load the
//! file into an in-memory [`types::DataSet`] with a schema inferred from its
//! contents, optionally hold it in a [`staging::PendingImports`] area for
//! preview, then materialize it as a SQLite table tracked by a metadata
//! catalog ([`store::TableStore`]).
//!
//! ## What you can load
//!
//! **File formats (detected by extension):**
//!
//! - **CSV**: `.csv` (encoding sniffed from the bytes, delimiter detected)
//! - **Excel** (Cargo feature `excel`, on by default): `.xlsx`, `.xls`
//! - **JSON**: `.json` (array-of-objects) and `.ndjson`
//! - **Parquet**: `.parquet`, `.pq`
//! - **Feather**: `.feather` (Arrow IPC file format)
//!
//! Unknown extensions are rejected before the file is opened, and files over
//! 10 MiB are rejected from metadata alone.
//!
//! **Inferred column types** ([`types::DataType`]): `Int64`, `Float64`,
//! `Bool`, `Timestamp`, `Utf8`, materialized as INTEGER, FLOAT, BOOLEAN,
//! TIMESTAMP, and TEXT columns. Empty cells and JSON `null` map to
//! [`types::Value::Null`].
//!
//! ## Quick example: file to table
//!
//! ```no_run
//! use tabular_import::ingestion::{load_table_from_path, LoadOptions};
//! use tabular_import::store::TableStore;
//!
//! # fn main() -> Result<(), tabular_import::ImportError> {
//! let store = TableStore::open("imports.db")?;
//!
//! let ds = load_table_from_path("people.csv", &LoadOptions::default())?;
//! let record = store.materialize("people", &ds)?;
//! println!("created '{}' with {} rows", record.table_name, record.row_count);
//!
//! let page = store.read_page("people", 1)?;
//! println!("{} rows of {}", page.rows.len(), page.total_rows);
//! # Ok(())
//! # }
//! ```
//!
//! ## Staged imports
//!
//! A staged upload is held server-side under an expiring token and committed
//! (or discarded) later:
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use tabular_import::ingestion::{load_table_from_path, LoadOptions};
//! use tabular_import::staging::PendingImports;
//! use tabular_import::store::TableStore;
//!
//! # fn main() -> Result<(), tabular_import::ImportError> {
//! let store = TableStore::open("imports.db")?;
//! let staging = PendingImports::new(Duration::from_secs(30 * 60));
//!
//! let ds = load_table_from_path("report.xlsx", &LoadOptions::default())?;
//! let token = staging.stage(ds, "report");
//!
//! let preview = staging.preview(&token)?;
//! println!("{} rows, suggested name '{}'", preview.row_count, preview.suggested_name);
//!
//! let record = store.materialize(&preview.suggested_name, &staging.take(&token)?)?;
//! println!("row_count={}", record.row_count);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: format detection and per-format loaders
//! - [`types`]: inferred schema + in-memory dataset types
//! - [`sanitize`]: SQL identifier sanitization
//! - [`staging`]: pending imports with expiring tokens
//! - [`store`]: materialization, metadata catalog, paginated reads, and the
//!   Person/Project record tables
//! - [`error`]: the error type shared across the pipeline

pub mod error;
pub mod ingestion;
pub mod sanitize;
pub mod staging;
pub mod store;
pub mod types;

pub use error::{ImportError, ImportResult};
pub use sanitize::sanitize_name;
