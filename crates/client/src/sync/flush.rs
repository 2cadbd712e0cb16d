// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Flush engine: drains the pending queue against the backend.
//!
//! One pass at a time, strictly FIFO. A retryable failure halts the pass so
//! a later mutation never runs ahead of an earlier one it may depend on
//! (update-after-create against the same entity). A permanent rejection
//! drops the record, reports it, and continues with the rest of the
//! snapshot.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ob_core::MutationStore;
use tokio::sync::Mutex as AsyncMutex;

use super::backend::{Backend, BackendError};
use super::report::{DroppedMutation, FailureSink};
use crate::connectivity::ConnectivityMonitor;
use crate::error::SyncResult;

/// Outcome of one flush pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// The monitor reported offline; no backend call was attempted.
    Offline,
    /// Another pass was already in progress; this invocation was dropped.
    AlreadyRunning,
    /// The snapshot was exhausted.
    Drained {
        /// Records confirmed applied and removed.
        applied: usize,
        /// Records permanently rejected, reported, and removed.
        dropped: usize,
    },
    /// A retryable failure halted the pass early.
    Halted {
        /// Records confirmed applied before the halt.
        applied: usize,
        /// Records permanently rejected before the halt.
        dropped: usize,
        /// Records left queued, including the one that halted the pass.
        remaining: usize,
    },
}

/// Drains the persistent queue against the backend, one record at a time.
///
/// The engine borrows records transiently during a pass and never holds
/// them beyond it; the store stays the single source of truth for pending
/// work.
pub struct FlushEngine<B: Backend> {
    store: Arc<Mutex<MutationStore>>,
    backend: AsyncMutex<B>,
    monitor: ConnectivityMonitor,
    sink: Arc<dyn FailureSink>,
    /// At-most-one-pass guard. A trigger arriving mid-pass is dropped, not
    /// queued; the next transition or mount re-attempts whatever remains.
    in_flight: AtomicBool,
    /// Passes that ran to an outcome (observable completion for callers).
    passes_completed: AtomicU64,
}

impl<B: Backend> FlushEngine<B> {
    /// Creates an engine over the shared store and the given collaborators.
    pub fn new(
        store: Arc<Mutex<MutationStore>>,
        backend: B,
        monitor: ConnectivityMonitor,
        sink: Arc<dyn FailureSink>,
    ) -> Self {
        FlushEngine {
            store,
            backend: AsyncMutex::new(backend),
            monitor,
            sink,
            in_flight: AtomicBool::new(false),
            passes_completed: AtomicU64::new(0),
        }
    }

    /// Number of flush passes that have run to an outcome.
    ///
    /// `Offline` and `AlreadyRunning` invocations do not count.
    pub fn passes_completed(&self) -> u64 {
        self.passes_completed.load(Ordering::Acquire)
    }

    /// Runs one flush pass.
    ///
    /// Safe to invoke at any time: offline invocations and reentrant
    /// triggers are no-ops. Storage failures propagate after the in-flight
    /// guard is released; records already confirmed stay removed and
    /// everything else stays queued.
    pub async fn flush(&self) -> SyncResult<FlushOutcome> {
        if !self.monitor.is_online() {
            return Ok(FlushOutcome::Offline);
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(FlushOutcome::AlreadyRunning);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let result = self.run_pass().await;
        self.passes_completed.fetch_add(1, Ordering::AcqRel);
        result
    }

    /// The pass proper: snapshot, then sequential replay.
    async fn run_pass(&self) -> SyncResult<FlushOutcome> {
        let snapshot = self.lock_store().list_pending()?;
        let total = snapshot.len();
        let mut applied = 0;
        let mut dropped = 0;

        for record in &snapshot {
            // Classification completes before any queue mutation, so a
            // crash mid-replay leaves the record queued.
            let outcome = {
                let mut backend = self.backend.lock().await;
                backend.replay(record).await
            };

            match outcome {
                Ok(()) => {
                    self.lock_store().remove(&record.id)?;
                    applied += 1;
                }
                Err(BackendError::Retryable(reason)) => {
                    self.lock_store().increment_attempt(&record.id)?;
                    tracing::debug!(
                        "halting flush pass on retryable failure for {}: {}",
                        record.id,
                        reason
                    );
                    return Ok(FlushOutcome::Halted {
                        applied,
                        dropped,
                        remaining: total - applied - dropped,
                    });
                }
                Err(BackendError::Permanent(reason)) => {
                    self.lock_store().remove(&record.id)?;
                    self.sink.report(DroppedMutation {
                        record: record.clone(),
                        reason,
                    });
                    dropped += 1;
                }
            }
        }

        if applied > 0 {
            tracing::info!("Flushed {} queued mutations", applied);
        }

        Ok(FlushOutcome::Drained { applied, dropped })
    }

    /// Lock the store for one short operation. Never held across an await.
    fn lock_store(&self) -> MutexGuard<'_, MutationStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases the in-flight flag on every exit path.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
