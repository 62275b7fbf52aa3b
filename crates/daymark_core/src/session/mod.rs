//! Session lifecycle and partition resolution.
//!
//! # Responsibility
//! - Own login / guest login / logout over the persisted session pointer.
//! - Expose the active partition every store keys on.
//!
//! # Invariants
//! - Logout clears only the session pointer; partitioned collections
//!   survive and are reachable again on the next login.

pub mod context;

pub use context::SessionContext;
