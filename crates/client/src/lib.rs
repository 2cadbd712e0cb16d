// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! outbox: Offline mutation queue with reconnect-triggered flush
//!
//! A thin client-side layer that lets write operations performed while the
//! backend is unreachable be durably queued and replayed, in order, once
//! connectivity is restored.
//!
//! The pieces:
//!
//! - [`ConnectivityMonitor`]: merged online/offline state from platform
//!   events and a manual override, with transition subscriptions
//! - [`FlushEngine`]: drains the persistent queue against the backend, one
//!   record at a time, with at-most-one pass in flight
//! - [`ReconnectTrigger`]: invokes the engine on activation and on every
//!   offline-to-online transition
//!
//! Durable storage lives in the `ob-core` crate ([`ob_core::MutationStore`]).

pub mod connectivity;
pub mod error;
pub mod sync;

pub use connectivity::{ConnectivityMonitor, Subscription};
pub use error::{SyncError, SyncResult};
pub use sync::{
    Backend, BackendError, DroppedMutation, FailureSink, FlushEngine, FlushOutcome, LogSink,
    ReconnectTrigger,
};
