//! Table materialization.
//!
//! Turns a loaded [`DataSet`] into a real SQLite table plus a catalog
//! record. Catalog insert, CREATE TABLE, and row inserts all run in one
//! transaction; SQLite DDL is transactional, so a failure at any step rolls
//! back both the table and its metadata.

use std::collections::BTreeMap;

use chrono::Utc;
use sqlx::sqlite::SqliteQueryResult;
use sqlx::{Sqlite, Transaction};
use tracing::debug;

use crate::error::{ImportError, ImportResult};
use crate::sanitize::{quote_ident, sanitize_name};
use crate::types::{DataSet, DataType, Value};

use super::catalog::ImportRecord;
use super::{TableStore, RESERVED_TABLES};

/// A source column that survived sanitization.
struct OutColumn {
    name: String,
    data_type: DataType,
    /// Index into the source dataset's rows.
    source_idx: usize,
}

impl TableStore {
    /// Materialize `dataset` as a new table called `name`.
    ///
    /// `name` and every column name are sanitized; columns whose names
    /// sanitize to empty are dropped, and duplicate sanitized column names
    /// are rejected. A surrogate `id INTEGER PRIMARY KEY AUTOINCREMENT` is
    /// synthesized unless a source column already sanitizes to `id`. If a
    /// record with this name already exists the call fails with
    /// [`ImportError::DuplicateName`] and performs no mutation.
    pub fn materialize(&self, name: &str, dataset: &DataSet) -> ImportResult<ImportRecord> {
        let table = sanitize_name(name);
        if table.is_empty() {
            return Err(ImportError::invalid("table name is empty after sanitization"));
        }
        if RESERVED_TABLES.contains(&table.as_str()) || table.starts_with("sqlite_") {
            return Err(ImportError::invalid(format!("table name '{table}' is reserved")));
        }

        let columns = plan_columns(dataset)?;
        let columns_info: BTreeMap<String, String> = columns
            .iter()
            .map(|c| (c.name.clone(), c.data_type.label().to_string()))
            .collect();

        let record = ImportRecord {
            table_name: table.clone(),
            created_at: Utc::now(),
            columns_info,
            row_count: dataset.row_count() as u64,
        };

        self.block_on(async {
            let mut tx = self.pool().begin().await?;

            let exists: Option<i64> =
                sqlx::query_scalar("SELECT 1 FROM import_catalog WHERE table_name = ?")
                    .bind(&table)
                    .fetch_optional(&mut *tx)
                    .await?;
            if exists.is_some() {
                return Err(ImportError::DuplicateName { name: table.clone() });
            }

            // The UNIQUE constraint is the backstop for writers that pass the
            // existence check concurrently.
            sqlx::query(
                "INSERT INTO import_catalog (table_name, created_at, columns_info, row_count)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(&record.table_name)
            .bind(record.created_at.to_rfc3339())
            .bind(serde_json::to_string(&record.columns_info)?)
            .bind(record.row_count as i64)
            .execute(&mut *tx)
            .await
            .map_err(|e| ImportError::from_sqlx(e, &table))?;

            sqlx::query(&create_table_sql(&table, &columns))
                .execute(&mut *tx)
                .await
                .map_err(|e| ImportError::from_sqlx(e, &table))?;

            insert_rows(&mut tx, &table, &columns, dataset).await?;

            tx.commit().await?;
            Ok::<_, ImportError>(())
        })?;

        debug!(table = %table, rows = record.row_count, "materialized table");
        Ok(record)
    }

    /// Load an uploaded file and materialize it in one step.
    ///
    /// Format detection and the upload size ceiling apply before any
    /// parsing; see [`crate::ingestion::load_table_from_path`].
    pub fn import_file(
        &self,
        path: impl AsRef<std::path::Path>,
        name: &str,
        options: &crate::ingestion::LoadOptions,
    ) -> ImportResult<ImportRecord> {
        let dataset = crate::ingestion::load_table_from_path(path, options)?;
        self.materialize(name, &dataset)
    }

    /// Drop the materialized table `name` and its catalog record.
    ///
    /// Returns whether a catalog record existed. Dropping an unknown name is
    /// not an error; the table drop and the record delete happen in one
    /// transaction either way.
    pub fn drop_table(&self, name: &str) -> ImportResult<bool> {
        let table = sanitize_name(name);
        if table.is_empty() {
            return Ok(false);
        }
        if RESERVED_TABLES.contains(&table.as_str()) || table.starts_with("sqlite_") {
            return Err(ImportError::invalid(format!("table name '{table}' is reserved")));
        }

        let existed = self.block_on(async {
            let mut tx = self.pool().begin().await?;

            sqlx::query(&format!("DROP TABLE IF EXISTS {}", quote_ident(&table)))
                .execute(&mut *tx)
                .await?;
            let deleted: SqliteQueryResult =
                sqlx::query("DELETE FROM import_catalog WHERE table_name = ?")
                    .bind(&table)
                    .execute(&mut *tx)
                    .await?;

            tx.commit().await?;
            Ok::<_, ImportError>(deleted.rows_affected() > 0)
        })?;

        debug!(table = %table, existed, "dropped table");
        Ok(existed)
    }
}

/// Sanitize column names and pair them with their inferred types.
fn plan_columns(dataset: &DataSet) -> ImportResult<Vec<OutColumn>> {
    let mut columns: Vec<OutColumn> = Vec::with_capacity(dataset.schema.fields.len());
    for (idx, field) in dataset.schema.fields.iter().enumerate() {
        let name = sanitize_name(&field.name);
        if name.is_empty() {
            continue;
        }
        if columns.iter().any(|c| c.name == name) {
            return Err(ImportError::invalid(format!(
                "duplicate column name '{name}' after sanitization"
            )));
        }
        columns.push(OutColumn {
            name,
            data_type: field.data_type,
            source_idx: idx,
        });
    }

    if columns.is_empty() {
        return Err(ImportError::invalid("no usable columns after sanitization"));
    }
    Ok(columns)
}

fn create_table_sql(table: &str, columns: &[OutColumn]) -> String {
    let mut defs: Vec<String> = Vec::with_capacity(columns.len() + 1);
    if !columns.iter().any(|c| c.name == "id") {
        defs.push("\"id\" INTEGER PRIMARY KEY AUTOINCREMENT".to_string());
    }
    for c in columns {
        defs.push(format!("{} {}", quote_ident(&c.name), c.data_type.sql_type()));
    }
    format!("CREATE TABLE {} ({})", quote_ident(table), defs.join(", "))
}

async fn insert_rows(
    tx: &mut Transaction<'_, Sqlite>,
    table: &str,
    columns: &[OutColumn],
    dataset: &DataSet,
) -> ImportResult<()> {
    let column_list = columns
        .iter()
        .map(|c| quote_ident(&c.name))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = vec!["?"; columns.len()].join(", ");
    let sql = format!(
        "INSERT INTO {} ({column_list}) VALUES ({placeholders})",
        quote_ident(table)
    );

    for row in &dataset.rows {
        let mut query = sqlx::query(&sql);
        for c in columns {
            let value = row.get(c.source_idx).unwrap_or(&Value::Null);
            query = match value {
                Value::Null => query.bind(None::<String>),
                Value::Int64(v) => query.bind(*v),
                Value::Float64(v) => query.bind(*v),
                Value::Bool(v) => query.bind(*v),
                Value::Timestamp(v) => query.bind(*v),
                Value::Utf8(v) => query.bind(v.clone()),
            };
        }
        query.execute(&mut **tx).await?;
    }
    Ok(())
}
