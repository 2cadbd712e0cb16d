// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use ob_core::{MutationStore, OperationKind, RecordId};

use super::report::{DroppedMutation, FailureSink};

/// Create an in-memory store behind the shared handle the engine expects.
pub fn make_store() -> Arc<Mutex<MutationStore>> {
    Arc::new(Mutex::new(MutationStore::open_in_memory().unwrap()))
}

/// Enqueue a test mutation and return its id.
pub fn enqueue(store: &Arc<Mutex<MutationStore>>, kind: OperationKind, n: u32) -> RecordId {
    store
        .lock()
        .unwrap()
        .enqueue(kind, serde_json::json!({ "n": n }))
        .unwrap()
}

/// Ids currently pending, oldest first.
pub fn pending_ids(store: &Arc<Mutex<MutationStore>>) -> Vec<RecordId> {
    store
        .lock()
        .unwrap()
        .list_pending()
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect()
}

/// Sink that collects reports for assertions.
pub struct CollectingSink {
    reports: Mutex<Vec<DroppedMutation>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        CollectingSink {
            reports: Mutex::new(Vec::new()),
        }
    }

    /// All reports received so far.
    pub fn reports(&self) -> Vec<DroppedMutation> {
        self.reports.lock().unwrap().clone()
    }
}

impl FailureSink for CollectingSink {
    fn report(&self, dropped: DroppedMutation) {
        self.reports.lock().unwrap().push(dropped);
    }
}

/// Poll a condition until it holds, failing the test after two seconds.
pub async fn wait_until(mut cond: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not met in time");
}
