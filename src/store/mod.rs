//! SQLite-backed table store.
//!
//! [`TableStore`] owns a sqlx SQLite pool plus a current-thread tokio
//! runtime, and exposes a synchronous API by blocking on each query. The
//! store carries three fixed tables (the import catalog and the
//! persons/projects record tables) alongside whatever materialized tables
//! imports create.

pub mod catalog;
pub mod materialize;
pub mod read;
pub mod records;

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use crate::error::{ImportError, ImportResult};

pub use catalog::ImportRecord;
pub use read::{Page, PAGE_SIZE};
pub use records::{NewPerson, NewProject, Person, Project};

/// Name of the metadata catalog table.
pub(crate) const CATALOG_TABLE: &str = "import_catalog";

/// Table names reserved for the store itself; imports may not shadow them.
pub(crate) const RESERVED_TABLES: [&str; 3] = [CATALOG_TABLE, "persons", "projects"];

const BOOTSTRAP_SQL: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS import_catalog (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        table_name TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL,
        columns_info TEXT NOT NULL,
        row_count INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS persons (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        job_title TEXT NOT NULL UNIQUE,
        birthday TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS projects (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        address TEXT NOT NULL UNIQUE,
        contractor TEXT NOT NULL UNIQUE,
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL
    )",
];

/// Synchronous facade over a SQLite database.
pub struct TableStore {
    runtime: Arc<Runtime>,
    pool: SqlitePool,
}

impl TableStore {
    /// Open (creating if missing) the database file at `path` and run
    /// bootstrap DDL.
    pub fn open(path: impl AsRef<Path>) -> ImportResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);
        Self::connect_with(options)
    }

    /// Open an in-memory database. Mostly useful for tests.
    pub fn open_in_memory() -> ImportResult<Self> {
        Self::connect_with(SqliteConnectOptions::new().in_memory(true))
    }

    fn connect_with(options: SqliteConnectOptions) -> ImportResult<Self> {
        let runtime = Arc::new(build_runtime()?);
        // A single connection serializes writers; concurrent materializations
        // then race on the catalog's UNIQUE constraint instead of on
        // SQLITE_BUSY.
        let pool = runtime.block_on(
            SqlitePoolOptions::new()
                .max_connections(1)
                .connect_with(options),
        )?;

        let store = Self { runtime, pool };
        store.bootstrap()?;
        Ok(store)
    }

    fn bootstrap(&self) -> ImportResult<()> {
        self.block_on(async {
            for ddl in BOOTSTRAP_SQL {
                sqlx::query(ddl).execute(&self.pool).await?;
            }
            Ok::<_, ImportError>(())
        })?;
        debug!("table store bootstrapped");
        Ok(())
    }

    pub(crate) fn block_on<F, R>(&self, fut: F) -> R
    where
        F: Future<Output = R>,
    {
        self.runtime.block_on(fut)
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn build_runtime() -> ImportResult<Runtime> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(ImportError::Io)
}
