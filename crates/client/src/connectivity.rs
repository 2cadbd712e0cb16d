// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity monitoring with merged signal sources.
//!
//! The monitor folds two inputs into one effective boolean: the platform's
//! reported network availability and an explicit manual override used by
//! tests and simulations. The override, once set, takes precedence until
//! cleared. Subscribers are notified on effective-state transitions only,
//! never on repeated identical states.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// Listener callback invoked with the new effective state on each transition.
type Listener = Arc<dyn Fn(bool) + Send + Sync>;

/// The two signal sources the monitor merges.
#[derive(Debug, Clone, Copy)]
struct SignalSources {
    /// Platform-reported network availability.
    platform: bool,
    /// Manual override; wins over the platform signal while set.
    manual: Option<bool>,
}

impl SignalSources {
    fn effective(&self) -> bool {
        self.manual.unwrap_or(self.platform)
    }
}

struct MonitorInner {
    /// Cached effective state (atomic for lock-free reads).
    online: AtomicBool,
    /// Signal sources; mutations recompute the effective state under this lock.
    sources: Mutex<SignalSources>,
    /// Registered transition listeners.
    listeners: Mutex<Vec<(u64, Listener)>>,
    /// Next listener registration id.
    next_listener_id: AtomicU64,
}

/// Shared connectivity state with subscribe/unsubscribe support.
///
/// Handles are cheap to clone; all clones observe the same state. The
/// monitor is the only mutator of the effective state.
#[derive(Clone)]
pub struct ConnectivityMonitor {
    inner: Arc<MonitorInner>,
}

impl ConnectivityMonitor {
    /// Creates a monitor seeded from the platform's current network status.
    pub fn new(initial_online: bool) -> Self {
        ConnectivityMonitor {
            inner: Arc::new(MonitorInner {
                online: AtomicBool::new(initial_online),
                sources: Mutex::new(SignalSources {
                    platform: initial_online,
                    manual: None,
                }),
                listeners: Mutex::new(Vec::new()),
                next_listener_id: AtomicU64::new(0),
            }),
        }
    }

    /// Point-in-time read of the effective connectivity state.
    ///
    /// No side effects; lock-free.
    pub fn is_online(&self) -> bool {
        self.inner.online.load(Ordering::Acquire)
    }

    /// Registers a listener invoked on every effective-state transition.
    ///
    /// The listener is not invoked for repeated identical states. The
    /// returned [`Subscription`] deregisters the listener when dropped.
    pub fn subscribe(&self, listener: impl Fn(bool) + Send + Sync + 'static) -> Subscription {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.inner.listeners).push((id, Arc::new(listener)));

        Subscription {
            monitor: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Reports a change in platform network availability.
    pub fn set_platform_online(&self, online: bool) {
        self.update(|sources| sources.platform = online);
    }

    /// Forces the effective state, overriding the platform signal.
    pub fn set_override(&self, online: bool) {
        self.update(|sources| sources.manual = Some(online));
    }

    /// Clears the manual override, reverting to the platform signal.
    pub fn clear_override(&self) {
        self.update(|sources| sources.manual = None);
    }

    /// Apply a source change, then notify listeners iff the effective state
    /// transitioned.
    fn update(&self, apply: impl FnOnce(&mut SignalSources)) {
        let transition = {
            let mut sources = lock(&self.inner.sources);
            let before = sources.effective();
            apply(&mut sources);
            let after = sources.effective();
            if before == after {
                None
            } else {
                self.inner.online.store(after, Ordering::Release);
                Some(after)
            }
        };

        if let Some(online) = transition {
            self.notify(online);
        }
    }

    /// Invoke listeners outside the registry lock so a callback may
    /// subscribe or unsubscribe reentrantly.
    fn notify(&self, online: bool) {
        let snapshot: Vec<Listener> = lock(&self.inner.listeners)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in snapshot {
            listener(online);
        }
    }
}

/// RAII deregistration handle for a monitor listener.
///
/// Dropping the subscription removes the listener, guaranteeing cleanup on
/// consumer teardown.
pub struct Subscription {
    monitor: Weak<MonitorInner>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.monitor.upgrade() {
            lock(&inner.listeners).retain(|(id, _)| *id != self.id);
        }
    }
}

/// Lock a mutex, recovering from poisoning.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod tests;
