// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the connectivity monitor.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;

/// Collects transition callbacks for assertions.
fn recorder() -> (Arc<Mutex<Vec<bool>>>, impl Fn(bool) + Send + Sync) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    (seen, move |online| sink.lock().unwrap().push(online))
}

#[test]
fn test_initial_state() {
    assert!(ConnectivityMonitor::new(true).is_online());
    assert!(!ConnectivityMonitor::new(false).is_online());
}

#[test]
fn test_notifies_on_transition() {
    let monitor = ConnectivityMonitor::new(true);
    let (seen, listener) = recorder();
    let _sub = monitor.subscribe(listener);

    monitor.set_platform_online(false);
    monitor.set_platform_online(true);

    assert_eq!(*seen.lock().unwrap(), vec![false, true]);
}

#[test]
fn test_no_notification_on_identical_state() {
    let monitor = ConnectivityMonitor::new(true);
    let (seen, listener) = recorder();
    let _sub = monitor.subscribe(listener);

    monitor.set_platform_online(true);
    monitor.set_platform_online(true);

    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn test_override_takes_precedence() {
    let monitor = ConnectivityMonitor::new(true);

    monitor.set_override(false);
    assert!(!monitor.is_online());

    // Platform signal is masked while the override is set
    monitor.set_platform_online(false);
    monitor.set_platform_online(true);
    assert!(!monitor.is_online());

    monitor.set_override(true);
    assert!(monitor.is_online());
}

#[test]
fn test_clear_override_reverts_to_platform() {
    let monitor = ConnectivityMonitor::new(true);
    let (seen, listener) = recorder();
    let _sub = monitor.subscribe(listener);

    monitor.set_override(false);
    monitor.clear_override();

    // Platform was online the whole time: offline then back online
    assert!(monitor.is_online());
    assert_eq!(*seen.lock().unwrap(), vec![false, true]);
}

#[test]
fn test_clear_override_without_transition_is_silent() {
    let monitor = ConnectivityMonitor::new(true);
    let (seen, listener) = recorder();
    let _sub = monitor.subscribe(listener);

    // Override matches the platform signal, so clearing it changes nothing
    monitor.set_override(true);
    monitor.clear_override();

    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn test_unsubscribe_on_drop() {
    let monitor = ConnectivityMonitor::new(true);
    let (seen, listener) = recorder();

    let sub = monitor.subscribe(listener);
    monitor.set_platform_online(false);
    drop(sub);
    monitor.set_platform_online(true);

    assert_eq!(*seen.lock().unwrap(), vec![false]);
}

#[test]
fn test_multiple_subscribers() {
    let monitor = ConnectivityMonitor::new(true);
    let (seen_a, listener_a) = recorder();
    let (seen_b, listener_b) = recorder();
    let _sub_a = monitor.subscribe(listener_a);
    let _sub_b = monitor.subscribe(listener_b);

    monitor.set_platform_online(false);

    assert_eq!(*seen_a.lock().unwrap(), vec![false]);
    assert_eq!(*seen_b.lock().unwrap(), vec![false]);
}

#[test]
fn test_reentrant_subscribe_does_not_deadlock() {
    let monitor = ConnectivityMonitor::new(true);
    let reentrant = monitor.clone();
    let extra: Arc<Mutex<Vec<Subscription>>> = Arc::new(Mutex::new(Vec::new()));
    let extra_in_cb = Arc::clone(&extra);

    let _sub = monitor.subscribe(move |_| {
        let sub = reentrant.subscribe(|_| {});
        extra_in_cb.lock().unwrap().push(sub);
    });

    monitor.set_platform_online(false);
    assert_eq!(extra.lock().unwrap().len(), 1);
}

#[test]
fn test_clones_share_state() {
    let monitor = ConnectivityMonitor::new(true);
    let clone = monitor.clone();

    clone.set_override(false);
    assert!(!monitor.is_online());
}
