// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for ob-core operations.

use thiserror::Error;

/// All possible errors that can occur against the persistent queue store.
///
/// Every variant is a storage failure: it is local to the queue operation
/// that raised it, and an enqueue that returns an error means the mutation
/// was not enqueued.
#[derive(Debug, Error)]
pub enum Error {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted record: {0}")]
    CorruptedRecord(String),
}

/// A specialized Result type for ob-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
