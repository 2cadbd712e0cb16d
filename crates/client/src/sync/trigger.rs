// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reconnect trigger: binds flush passes to two edges.
//!
//! The trigger invokes the flush engine at exactly two moments: once when
//! started (covers a process restart while online with a non-empty queue)
//! and once per offline-to-online transition. The monitor only reports
//! transitions, so online-to-online and offline-to-offline signals never
//! reach the trigger at all.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::backend::Backend;
use super::flush::FlushEngine;
use crate::connectivity::{ConnectivityMonitor, Subscription};

/// Drives the flush engine from the mount edge and reconnect edges.
///
/// Dropping the trigger cancels the driver task and deregisters the monitor
/// subscription.
pub struct ReconnectTrigger {
    cancel: CancellationToken,
    _subscription: Subscription,
}

impl ReconnectTrigger {
    /// Starts the trigger: one immediate pass, then one per reconnect edge.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<B: Backend + 'static>(
        engine: Arc<FlushEngine<B>>,
        monitor: &ConnectivityMonitor,
    ) -> Self {
        // Capacity 1: a full channel means an edge is already pending, and
        // collapsing consecutive edges is fine - the pending pass will see
        // the queue as it stands when it runs.
        let (edge_tx, edge_rx) = mpsc::channel::<()>(1);

        let subscription = monitor.subscribe(move |online| {
            if online {
                let _ = edge_tx.try_send(());
            }
        });

        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            run_trigger(engine, edge_rx, task_cancel).await;
        });

        ReconnectTrigger {
            cancel,
            _subscription: subscription,
        }
    }
}

impl Drop for ReconnectTrigger {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Driver task: mount pass, then a pass per reconnect edge until torn down.
async fn run_trigger<B: Backend>(
    engine: Arc<FlushEngine<B>>,
    mut edges: mpsc::Receiver<()>,
    cancel: CancellationToken,
) {
    flush_logged(&engine).await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            edge = edges.recv() => match edge {
                Some(()) => flush_logged(&engine).await,
                // Sender dropped with the subscription: nothing more to do
                None => break,
            },
        }
    }
}

/// Run one pass, logging instead of propagating failures.
async fn flush_logged<B: Backend>(engine: &FlushEngine<B>) {
    if let Err(e) = engine.flush().await {
        tracing::warn!("flush pass failed: {}", e);
    }
}
