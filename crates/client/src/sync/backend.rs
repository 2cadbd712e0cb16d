// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Backend collaborator for replaying queued mutations.
//!
//! The trait abstracts over the actual network layer, allowing for easy
//! testing with mock implementations. The surrounding application supplies
//! the mapping from each operation kind to a real backend call.

use std::future::Future;
use std::pin::Pin;

use ob_core::MutationRecord;

/// Classified failure from a replay attempt.
///
/// Classification decides what the flush engine does with the record:
/// retryable failures halt the pass and keep the record queued; permanent
/// failures drop the record after reporting it.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Transient failure (network unreachable, timeout). Never surfaced to
    /// the user; the record stays queued for a later pass.
    #[error("retryable backend failure: {0}")]
    Retryable(String),

    /// The backend rejected the operation irrecoverably (validation,
    /// conflict). Retrying can never succeed.
    #[error("permanent backend failure: {0}")]
    Permanent(String),
}

impl BackendError {
    /// Returns true if the failure warrants a later retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BackendError::Retryable(_))
    }
}

/// Result type for replay attempts.
pub type ReplayResult = std::result::Result<(), BackendError>;

/// Maps queued mutations to backend network calls.
pub trait Backend: Send + Sync {
    /// Replay one record against the backend.
    ///
    /// Returns `Ok(())` only when the backend confirmed the mutation was
    /// applied; the record is removed from the queue on that confirmation
    /// alone.
    fn replay<'a>(
        &'a mut self,
        record: &'a MutationRecord,
    ) -> Pin<Box<dyn Future<Output = ReplayResult> + Send + 'a>>;
}
