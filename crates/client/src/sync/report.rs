// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error-reporting collaborator for permanently failed mutations.

use ob_core::MutationRecord;

/// A mutation dropped from the queue after a permanent backend rejection.
#[derive(Debug, Clone)]
pub struct DroppedMutation {
    /// The record as it stood at removal time.
    pub record: MutationRecord,
    /// Backend diagnostic describing the rejection.
    pub reason: String,
}

/// Sink receiving permanently failed mutations.
///
/// The flush engine guarantees each dropped record is reported exactly once,
/// at removal time. Presentation (notification, crash reporter, log) is up
/// to the implementation.
pub trait FailureSink: Send + Sync {
    /// Receive one dropped mutation.
    fn report(&self, dropped: DroppedMutation);
}

/// Default sink that reports drops through `tracing`.
pub struct LogSink;

impl FailureSink for LogSink {
    fn report(&self, dropped: DroppedMutation) {
        tracing::warn!(
            "dropping permanently rejected mutation {} ({}): {}",
            dropped.record.id,
            dropped.record.kind,
            dropped.reason
        );
    }
}
