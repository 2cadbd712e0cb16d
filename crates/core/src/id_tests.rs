// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for record id generation.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use crate::record::OperationKind;
use chrono::TimeZone;

fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 30, 0).unwrap()
}

#[test]
fn test_generate_id_deterministic() {
    let kind = OperationKind::create("packages");
    let payload = serde_json::json!({ "barcode": "X1" });
    let at = fixed_time();

    let a = generate_id(&kind, &payload, &at);
    let b = generate_id(&kind, &payload, &at);
    assert_eq!(a, b);
    assert!(a.starts_with("m-"));
    assert_eq!(a.len(), 10); // "m-" + 8 hex chars
}

#[test]
fn test_generate_id_varies_with_input() {
    let payload = serde_json::json!({ "barcode": "X1" });
    let at = fixed_time();

    let create = generate_id(&OperationKind::create("packages"), &payload, &at);
    let delete = generate_id(&OperationKind::delete("packages"), &payload, &at);
    assert_ne!(create, delete);
}

#[test]
fn test_generate_unique_id_no_collision() {
    let kind = OperationKind::create("packages");
    let payload = serde_json::json!({});
    let id = generate_unique_id(&kind, &payload, &fixed_time(), |_| false);
    assert_eq!(id, generate_id(&kind, &payload, &fixed_time()));
}

#[test]
fn test_generate_unique_id_with_collisions() {
    let kind = OperationKind::create("packages");
    let payload = serde_json::json!({});
    let at = fixed_time();
    let base = generate_id(&kind, &payload, &at);

    // First two candidates exist; third is free
    let taken = [base.clone(), format!("{}-2", base)];
    let id = generate_unique_id(&kind, &payload, &at, |candidate| {
        taken.contains(&candidate.to_string())
    });
    assert_eq!(id, format!("{}-3", base));
}
