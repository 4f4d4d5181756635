//! Paginated reads over materialized tables.

use chrono::NaiveDateTime;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row};
use tracing::trace;

use crate::error::{ImportError, ImportResult};
use crate::sanitize::quote_ident;
use crate::types::{DataType, Value};

use super::TableStore;

/// Fixed page size for table reads.
pub const PAGE_SIZE: u64 = 50;

/// One page of a materialized table.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Table the page was read from.
    pub table_name: String,
    /// Column names in table order (including the surrogate `id`).
    pub columns: Vec<String>,
    /// Rows in insertion order.
    pub rows: Vec<Vec<Value>>,
    /// 1-based page number.
    pub page: u64,
    /// Page size used.
    pub per_page: u64,
    /// Total rows in the table.
    pub total_rows: u64,
    /// Total pages (ceiling division, at least 1).
    pub total_pages: u64,
}

impl TableStore {
    /// Read page `page` (1-based) of the materialized table `name`.
    ///
    /// Rows come back in insertion order; pages past the end are empty, not
    /// an error. Unknown tables are [`ImportError::NotFound`].
    pub fn read_page(&self, name: &str, page: u64) -> ImportResult<Page> {
        if page == 0 {
            return Err(ImportError::invalid("page numbers are 1-based"));
        }

        // Also validates the name: only cataloged tables are readable.
        let record = self.get_record(name)?;
        let table = record.table_name;
        trace!(table = %table, page, "paginated read");

        let offset = (page - 1) * PAGE_SIZE;

        self.block_on(async {
            let total_rows: i64 =
                sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", quote_ident(&table)))
                    .fetch_one(self.pool())
                    .await?;
            let total_rows = total_rows.max(0) as u64;

            let rows = sqlx::query(&format!(
                "SELECT * FROM {} ORDER BY rowid LIMIT ? OFFSET ?",
                quote_ident(&table)
            ))
            .bind(PAGE_SIZE as i64)
            .bind(offset as i64)
            .fetch_all(self.pool())
            .await?;

            let columns: Vec<String> = rows
                .first()
                .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
                .unwrap_or_else(|| {
                    // Empty page: fall back to catalog order plus the
                    // surrogate key.
                    let mut cols = Vec::with_capacity(record.columns_info.len() + 1);
                    if !record.columns_info.contains_key("id") {
                        cols.push("id".to_string());
                    }
                    cols.extend(record.columns_info.keys().cloned());
                    cols
                });

            let mut out_rows = Vec::with_capacity(rows.len());
            for row in &rows {
                out_rows.push(decode_row(row, &columns, &record.columns_info)?);
            }

            Ok(Page {
                table_name: table.clone(),
                columns,
                rows: out_rows,
                page,
                per_page: PAGE_SIZE,
                total_rows,
                total_pages: total_rows.div_ceil(PAGE_SIZE).max(1),
            })
        })
    }
}

fn decode_row(
    row: &SqliteRow,
    columns: &[String],
    columns_info: &std::collections::BTreeMap<String, String>,
) -> ImportResult<Vec<Value>> {
    let mut out = Vec::with_capacity(columns.len());
    for (idx, name) in columns.iter().enumerate() {
        let data_type = columns_info
            .get(name)
            .and_then(|label| DataType::from_label(label))
            // The synthesized surrogate key is not in columns_info.
            .unwrap_or(if name == "id" { DataType::Int64 } else { DataType::Utf8 });

        let value = match data_type {
            DataType::Int64 => row
                .try_get::<Option<i64>, _>(idx)?
                .map(Value::Int64)
                .unwrap_or(Value::Null),
            DataType::Float64 => row
                .try_get::<Option<f64>, _>(idx)?
                .map(Value::Float64)
                .unwrap_or(Value::Null),
            DataType::Bool => row
                .try_get::<Option<bool>, _>(idx)?
                .map(Value::Bool)
                .unwrap_or(Value::Null),
            DataType::Timestamp => row
                .try_get::<Option<NaiveDateTime>, _>(idx)?
                .map(Value::Timestamp)
                .unwrap_or(Value::Null),
            DataType::Utf8 => row
                .try_get::<Option<String>, _>(idx)?
                .map(Value::Utf8)
                .unwrap_or(Value::Null),
        };
        out.push(value);
    }
    Ok(out)
}
