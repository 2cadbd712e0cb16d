// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::record::OperationKind;

/// Generate a record id from kind, payload, and enqueue timestamp.
/// Format: m-{hash} where hash is first 8 hex chars of SHA256(kind + payload + timestamp)
pub fn generate_id(
    kind: &OperationKind,
    payload: &serde_json::Value,
    enqueued_at: &DateTime<Utc>,
) -> String {
    let input = format!("{}{}{}", kind, payload, enqueued_at.to_rfc3339());
    let hash = Sha256::digest(input.as_bytes());
    let short_hash = hex::encode(&hash[..4]); // First 8 hex chars (4 bytes)
    format!("m-{}", short_hash)
}

/// Generate a unique ID, handling collisions by appending incrementing suffix.
pub fn generate_unique_id<F>(
    kind: &OperationKind,
    payload: &serde_json::Value,
    enqueued_at: &DateTime<Utc>,
    exists: F,
) -> String
where
    F: Fn(&str) -> bool,
{
    let base_id = generate_id(kind, payload, enqueued_at);

    if !exists(&base_id) {
        return base_id;
    }

    // Handle collision with incrementing suffix
    let mut suffix = 2;
    loop {
        let id = format!("{}-{}", base_id, suffix);
        if !exists(&id) {
            return id;
        }
        suffix += 1;
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
