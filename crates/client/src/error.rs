// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the outbox client.

use thiserror::Error;

/// Error type for flush operations.
///
/// Backend failures never appear here: they are classified inside the flush
/// pass (retryable halts, permanent reports) and consumed by the engine.
/// What escapes a pass is a failure of the queue store itself.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The persistent queue store failed.
    #[error("queue error: {0}")]
    Queue(#[from] ob_core::Error),
}

/// Result type for flush operations.
pub type SyncResult<T> = std::result::Result<T, SyncError>;
