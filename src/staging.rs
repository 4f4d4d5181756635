//! Pending-import staging.
//!
//! Between upload and commit, the loaded dataset is held server-side in a
//! [`PendingImports`] area and referred to by an opaque expiring token; the
//! dataset itself is never handed back to the caller until commit. Tokens
//! expire after a TTL and expired entries are dropped lazily on access (or
//! eagerly via [`PendingImports::purge_expired`]).

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::error::{ImportError, ImportResult};
use crate::sanitize::sanitize_name;
use crate::types::{DataSet, Value};

/// Number of rows shown in a preview.
pub const PREVIEW_ROWS: usize = 5;

/// Opaque handle to a staged dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PendingToken(String);

impl PendingToken {
    /// The token as a string (e.g. for embedding in a form).
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PendingToken {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Preview of a staged dataset, shown before commit.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportPreview {
    /// Column names in source order.
    pub columns: Vec<String>,
    /// First [`PREVIEW_ROWS`] rows.
    pub rows: Vec<Vec<Value>>,
    /// Total row count of the staged dataset.
    pub row_count: usize,
    /// Sanitized table name derived from the source file stem.
    pub suggested_name: String,
}

struct StagedEntry {
    dataset: DataSet,
    source_stem: String,
    staged_at: Instant,
}

/// Staging area for pending imports.
pub struct PendingImports {
    ttl: Duration,
    entries: Mutex<HashMap<String, StagedEntry>>,
}

impl PendingImports {
    /// Create a staging area whose entries expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Stage a loaded dataset, returning its token.
    ///
    /// `source_stem` is the uploaded file's stem; its sanitized form becomes
    /// the suggested table name in previews.
    pub fn stage(&self, dataset: DataSet, source_stem: &str) -> PendingToken {
        let token = Uuid::new_v4().to_string();
        let mut entries = self.entries.lock().expect("staging lock poisoned");
        entries.insert(
            token.clone(),
            StagedEntry {
                dataset,
                source_stem: source_stem.to_string(),
                staged_at: Instant::now(),
            },
        );
        PendingToken(token)
    }

    /// Preview a staged dataset without consuming it.
    ///
    /// Returns `NotFound` when the token is unknown or expired.
    pub fn preview(&self, token: &PendingToken) -> ImportResult<ImportPreview> {
        let mut entries = self.entries.lock().expect("staging lock poisoned");
        match live_entry(&mut entries, token, self.ttl) {
            Some(entry) => Ok(ImportPreview {
                columns: entry.dataset.schema.field_names().map(str::to_owned).collect(),
                rows: entry.dataset.head(PREVIEW_ROWS),
                row_count: entry.dataset.row_count(),
                suggested_name: sanitize_name(&entry.source_stem),
            }),
            None => Err(not_found(token)),
        }
    }

    /// Consume a staged dataset for commit.
    ///
    /// Returns `NotFound` when the token is unknown or expired; a token can
    /// be taken at most once.
    pub fn take(&self, token: &PendingToken) -> ImportResult<DataSet> {
        let mut entries = self.entries.lock().expect("staging lock poisoned");
        match live_entry(&mut entries, token, self.ttl) {
            Some(_) => Ok(entries
                .remove(&token.0)
                .map(|e| e.dataset)
                .expect("entry checked above")),
            None => Err(not_found(token)),
        }
    }

    /// Drop a staged dataset without committing it. Missing tokens are fine.
    pub fn discard(&self, token: &PendingToken) {
        let mut entries = self.entries.lock().expect("staging lock poisoned");
        entries.remove(&token.0);
    }

    /// Drop all expired entries, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries.lock().expect("staging lock poisoned");
        let before = entries.len();
        let ttl = self.ttl;
        entries.retain(|_, e| e.staged_at.elapsed() <= ttl);
        before - entries.len()
    }

    /// Number of live staged entries.
    pub fn len(&self) -> usize {
        let entries = self.entries.lock().expect("staging lock poisoned");
        entries.len()
    }

    /// Whether the staging area is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Look up a token, dropping it first if it has expired.
fn live_entry<'a>(
    entries: &'a mut HashMap<String, StagedEntry>,
    token: &PendingToken,
    ttl: Duration,
) -> Option<&'a StagedEntry> {
    let expired = entries
        .get(&token.0)
        .map(|e| e.staged_at.elapsed() > ttl)
        .unwrap_or(false);
    if expired {
        entries.remove(&token.0);
    }
    entries.get(&token.0)
}

fn not_found(token: &PendingToken) -> ImportError {
    ImportError::NotFound {
        name: format!("pending import {}", token.0),
    }
}
