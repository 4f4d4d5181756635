//! Unified loading entrypoint.
//!
//! Most callers should use [`load_table_from_path`], which detects the upload
//! format from the file extension, enforces the upload size ceiling, and
//! loads the file into an in-memory [`crate::types::DataSet`] with an
//! inferred schema.
//!
//! - If [`LoadOptions::format`] is `None`, the format is detected from the
//!   file extension; unknown extensions are rejected before the file is
//!   opened.
//! - Files over [`super::format::MAX_UPLOAD_BYTES`] are rejected from
//!   metadata alone, without reading their contents.
//! - If an [`super::observability::ImportObserver`] is provided,
//!   success/failure/alerts are reported to it.

use std::error::Error as StdError;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{ImportError, ImportResult};
use crate::types::DataSet;

use super::format::{check_upload_size, TableFormat};
use super::observability::{ImportContext, ImportObserver, ImportSeverity, ImportStats};
use super::{csv, feather, json, parquet};

/// Options controlling unified loading behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone, Default)]
pub struct LoadOptions {
    /// If `None`, detect format from the file extension.
    pub format: Option<TableFormat>,
    /// CSV delimiter override; `None` runs delimiter detection.
    pub delimiter: Option<u8>,
    /// Excel sheet to read; `None` reads the first sheet.
    pub sheet: Option<String>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn ImportObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: Option<ImportSeverity>,
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("format", &self.format)
            .field("delimiter", &self.delimiter)
            .field("sheet", &self.sheet)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

/// Load an uploaded file into a typed [`DataSet`].
///
/// # Examples
///
/// ```no_run
/// use tabular_import::ingestion::{load_table_from_path, LoadOptions};
///
/// # fn main() -> Result<(), tabular_import::ImportError> {
/// // Format is detected from the extension; the schema is inferred.
/// let ds = load_table_from_path("people.csv", &LoadOptions::default())?;
/// println!("rows={}", ds.row_count());
/// # Ok(())
/// # }
/// ```
pub fn load_table_from_path(
    path: impl AsRef<Path>,
    options: &LoadOptions,
) -> ImportResult<DataSet> {
    let path = path.as_ref();
    let fmt = match options.format {
        Some(f) => f,
        None => TableFormat::detect(path)?,
    };

    let ctx = ImportContext {
        path: path.to_path_buf(),
        format: fmt,
    };

    let result = check_upload_size(path).and_then(|()| match fmt {
        TableFormat::Csv => csv::load_csv_from_path(path, options.delimiter),
        TableFormat::Json => json::load_json_from_path(path),
        TableFormat::Parquet => parquet::load_parquet_from_path(path),
        TableFormat::Feather => feather::load_feather_from_path(path),
        TableFormat::Excel => load_excel_dispatch(path, options.sheet.as_deref()),
    });

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(ds) => obs.on_success(
                &ctx,
                ImportStats {
                    rows: ds.row_count(),
                    columns: ds.schema.fields.len(),
                },
            ),
            Err(e) => {
                let sev = severity_for_error(e);
                obs.on_failure(&ctx, sev, e);
                let threshold = options.alert_at_or_above.unwrap_or(ImportSeverity::Critical);
                if sev >= threshold {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

fn load_excel_dispatch(path: &Path, sheet: Option<&str>) -> ImportResult<DataSet> {
    // Avoid unused warnings when the feature is off.
    let _ = (path, sheet);

    #[cfg(feature = "excel")]
    {
        super::excel::load_excel_from_path(path, sheet)
    }

    #[cfg(not(feature = "excel"))]
    {
        Err(ImportError::invalid(
            "excel loading not enabled (enable cargo feature 'excel')",
        ))
    }
}

fn severity_for_error(e: &ImportError) -> ImportSeverity {
    match e {
        ImportError::Io(_) => ImportSeverity::Critical,
        ImportError::Parquet(err) => {
            // Best-effort: parquet errors often wrap IO, but not always in a
            // structured way.
            if error_chain_contains_io(err) {
                ImportSeverity::Critical
            } else {
                ImportSeverity::Error
            }
        }
        ImportError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => ImportSeverity::Critical,
            _ => ImportSeverity::Error,
        },
        ImportError::InvalidInput { .. } => ImportSeverity::Warning,
        _ => ImportSeverity::Error,
    }
}

fn error_chain_contains_io(e: &(dyn StdError + 'static)) -> bool {
    let mut cur: Option<&(dyn StdError + 'static)> = Some(e);
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}
