//! Calendar reconciliation against a remote source of truth.
//!
//! # Responsibility
//! - Define the remote provider seam and its simulated implementation.
//! - Merge local calendar state with remote truth and track freshness.
//!
//! # Invariants
//! - A failed pass leaves the local collection exactly as it was.
//! - Sync outcomes are reported as values; no error crosses the
//!   reconciler boundary.

pub mod reconciler;
pub mod remote;

pub use reconciler::{SyncFailure, SyncOutcome, SyncReconciler, SyncReport, SyncState};
pub use remote::{RemoteCalendar, RemoteError, RemoteResult, SimulatedRemoteCalendar};
