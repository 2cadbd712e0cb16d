// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed persistent queue store.
//!
//! The [`MutationStore`] owns the durable FIFO of pending mutations and is
//! the single source of truth for pending work: no mutation exists only in
//! memory once `enqueue` has returned. Every mutation commits before the
//! call returns, so the queue (including attempt counters and order)
//! survives process restarts.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::clock::{ClockSource, SystemClock};
use crate::error::{Error, Result};
use crate::id;
use crate::record::{MutationRecord, OperationKind, RecordId};

/// SQL schema for the pending-mutation queue.
///
/// `seq` is the FIFO ordering: assigned once at enqueue time and never
/// updated, so replay order is exactly enqueue order.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS pending (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    kind TEXT NOT NULL,
    payload TEXT NOT NULL,
    enqueued_at TEXT NOT NULL,
    attempt_count INTEGER NOT NULL DEFAULT 0
);
"#;

/// Durable, ordered store of pending mutation records.
pub struct MutationStore {
    conn: Connection,
    clock: Arc<dyn ClockSource>,
}

impl MutationStore {
    /// Opens or creates a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_clock(path, Arc::new(SystemClock))
    }

    /// Opens or creates a store with an injected clock (for testing).
    pub fn open_with_clock(path: impl AsRef<Path>, clock: Arc<dyn ClockSource>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = FULL;
             PRAGMA busy_timeout = 5000;",
        )?;
        conn.execute_batch(SCHEMA)?;

        Ok(MutationStore { conn, clock })
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self> {
        Self::open_in_memory_with_clock(Arc::new(SystemClock))
    }

    /// Opens an in-memory store with an injected clock (for testing).
    pub fn open_in_memory_with_clock(clock: Arc<dyn ClockSource>) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(MutationStore { conn, clock })
    }

    /// Default on-disk location for an application's queue database.
    pub fn default_path(app_name: &str) -> Option<PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join(app_name).join("queue.db"))
    }

    /// Appends a new record at the tail of the queue.
    ///
    /// The record is committed before this returns. On error the mutation
    /// was not enqueued.
    pub fn enqueue(&mut self, kind: OperationKind, payload: serde_json::Value) -> Result<RecordId> {
        let enqueued_at = self.clock.now();

        let conn = &self.conn;
        let id = id::generate_unique_id(&kind, &payload, &enqueued_at, |candidate| {
            record_exists(conn, candidate).unwrap_or(false)
        });

        let kind_json = serde_json::to_string(&kind)?;
        let payload_json = serde_json::to_string(&payload)?;

        self.conn.execute(
            "INSERT INTO pending (id, kind, payload, enqueued_at) VALUES (?1, ?2, ?3, ?4)",
            params![id, kind_json, payload_json, enqueued_at.to_rfc3339()],
        )?;

        Ok(RecordId::new(id))
    }

    /// Returns all pending records, oldest first.
    ///
    /// The result is a snapshot, not a live view.
    pub fn list_pending(&self) -> Result<Vec<MutationRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, kind, payload, enqueued_at, attempt_count
             FROM pending ORDER BY seq ASC",
        )?;

        let rows = stmt.query_map([], map_record)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }

        Ok(records)
    }

    /// Deletes the record with the given id.
    ///
    /// A no-op (not an error) if the record is already absent, so cleanup
    /// after concurrent flush attempts stays idempotent.
    pub fn remove(&mut self, id: &RecordId) -> Result<()> {
        self.conn
            .execute("DELETE FROM pending WHERE id = ?1", params![id.as_str()])?;
        Ok(())
    }

    /// Records that a replay attempt occurred for the given record.
    ///
    /// Does not affect ordering. A no-op if the record is absent.
    pub fn increment_attempt(&mut self, id: &RecordId) -> Result<()> {
        self.conn.execute(
            "UPDATE pending SET attempt_count = attempt_count + 1 WHERE id = ?1",
            params![id.as_str()],
        )?;
        Ok(())
    }

    /// Returns the number of pending records.
    pub fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM pending", [], |row| row.get(0))?;
        // CORRECTNESS: COUNT(*) is never negative
        #[allow(clippy::cast_sign_loss)]
        Ok(count as usize)
    }

    /// Returns true if no records are pending.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// Check whether a record id is already present.
fn record_exists(conn: &Connection, id: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM pending WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Map one `pending` row to a [`MutationRecord`].
fn map_record(row: &rusqlite::Row<'_>) -> std::result::Result<MutationRecord, rusqlite::Error> {
    let id: String = row.get(0)?;
    let kind_json: String = row.get(1)?;
    let payload_json: String = row.get(2)?;
    let enqueued_at: String = row.get(3)?;
    let attempt_count: u32 = row.get(4)?;

    Ok(MutationRecord {
        id: RecordId::new(id),
        kind: parse_json_column(&kind_json, "kind")?,
        payload: parse_json_column(&payload_json, "payload")?,
        enqueued_at: parse_timestamp(&enqueued_at, "enqueued_at")?,
        attempt_count,
    })
}

/// Parse a JSON column, surfacing corrupt rows as a conversion failure.
fn parse_json_column<T: serde::de::DeserializeOwned>(
    value: &str,
    column: &str,
) -> std::result::Result<T, rusqlite::Error> {
    serde_json::from_str(value).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(Error::CorruptedRecord(format!(
                "invalid value '{value}' in column '{column}'"
            ))),
        )
    })
}

/// Parse an RFC3339 timestamp from the database.
fn parse_timestamp(
    value: &str,
    column: &str,
) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(Error::CorruptedRecord(format!(
                    "invalid timestamp '{value}' in column '{column}'"
                ))),
            )
        })
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
