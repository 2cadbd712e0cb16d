// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Mutation records for the offline queue.
//!
//! A [`MutationRecord`] describes one deferred write against the backend:
//! which operation to replay, the operation-specific payload, and the
//! bookkeeping the flush engine needs. Records are designed to be:
//!
//! - Serializable: stored in the queue and transmitted to the backend
//! - Immutable: kind and payload never change after enqueue
//! - Ordered: the store assigns a FIFO sequence at enqueue time

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque unique identifier for a queued mutation.
///
/// Assigned at enqueue time and stable for the record's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wraps an already-generated id string.
    pub fn new(id: impl Into<String>) -> Self {
        RecordId(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tag identifying which backend operation a record replays.
///
/// The queue core never interprets the kind; the backend collaborator maps
/// it to a network call against the named resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OperationKind {
    /// Create a row in the named resource.
    Create { resource: String },

    /// Update a row in the named resource.
    Update { resource: String },

    /// Delete a row from the named resource.
    Delete { resource: String },
}

impl OperationKind {
    /// Creates a Create kind.
    pub fn create(resource: impl Into<String>) -> Self {
        OperationKind::Create {
            resource: resource.into(),
        }
    }

    /// Creates an Update kind.
    pub fn update(resource: impl Into<String>) -> Self {
        OperationKind::Update {
            resource: resource.into(),
        }
    }

    /// Creates a Delete kind.
    pub fn delete(resource: impl Into<String>) -> Self {
        OperationKind::Delete {
            resource: resource.into(),
        }
    }

    /// Returns the resource this operation targets.
    pub fn resource(&self) -> &str {
        match self {
            OperationKind::Create { resource }
            | OperationKind::Update { resource }
            | OperationKind::Delete { resource } => resource,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            OperationKind::Create { .. } => "create",
            OperationKind::Update { .. } => "update",
            OperationKind::Delete { .. } => "delete",
        };
        write!(f, "{}:{}", verb, self.resource())
    }
}

/// A single pending mutation awaiting replay against the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MutationRecord {
    /// Unique identifier, assigned at enqueue time.
    pub id: RecordId,
    /// The backend operation to replay.
    pub kind: OperationKind,
    /// Operation-specific data, immutable once enqueued.
    pub payload: serde_json::Value,
    /// When the record was enqueued. Ordering and diagnostics only.
    pub enqueued_at: DateTime<Utc>,
    /// Number of prior flush attempts for this record.
    pub attempt_count: u32,
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
