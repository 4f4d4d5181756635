//! Metadata catalog for materialized tables.
//!
//! One [`ImportRecord`] per materialized table. Records are created inside
//! the materialization transaction (see [`super::materialize`]) and
//! `columns_info` is immutable after creation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::trace;

use crate::error::{ImportError, ImportResult};
use crate::sanitize::sanitize_name;

use super::TableStore;

/// Catalog entry describing one materialized table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    /// Sanitized, unique table name.
    pub table_name: String,
    /// Server-assigned creation time.
    pub created_at: DateTime<Utc>,
    /// Column name → type label (`int64`, `float64`, `bool`, `datetime`,
    /// `text`).
    pub columns_info: BTreeMap<String, String>,
    /// Number of rows inserted at materialization time.
    pub row_count: u64,
}

impl TableStore {
    /// Look up the catalog record for `name`.
    pub fn get_record(&self, name: &str) -> ImportResult<ImportRecord> {
        let table = sanitize_name(name);
        trace!(table = %table, "catalog lookup");
        self.block_on(async {
            let row = sqlx::query(
                "SELECT table_name, created_at, columns_info, row_count
                 FROM import_catalog WHERE table_name = ?",
            )
            .bind(&table)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| ImportError::NotFound { name: table.clone() })?;

            decode_record(&row)
        })
    }

    /// All catalog records, most recently created first.
    pub fn list_records(&self) -> ImportResult<Vec<ImportRecord>> {
        self.block_on(async {
            let rows = sqlx::query(
                "SELECT table_name, created_at, columns_info, row_count
                 FROM import_catalog ORDER BY created_at DESC, id DESC",
            )
            .fetch_all(self.pool())
            .await?;

            rows.iter().map(decode_record).collect()
        })
    }
}

pub(crate) fn decode_record(row: &SqliteRow) -> ImportResult<ImportRecord> {
    let table_name: String = row.try_get("table_name")?;
    let created_at: String = row.try_get("created_at")?;
    let columns_info: String = row.try_get("columns_info")?;
    let row_count: i64 = row.try_get("row_count")?;

    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| ImportError::invalid(format!("bad created_at in catalog: {e}")))?
        .with_timezone(&Utc);
    let columns_info: BTreeMap<String, String> = serde_json::from_str(&columns_info)?;

    Ok(ImportRecord {
        table_name,
        created_at,
        columns_info,
        row_count: row_count.max(0) as u64,
    })
}
