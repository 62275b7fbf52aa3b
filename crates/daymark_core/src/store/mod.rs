//! Persistence layer over the flat key-value medium.
//!
//! # Responsibility
//! - Define the medium contract and its SQLite implementation.
//! - Provide the typed keyed store and the per-entity stores built on it.
//!
//! # Invariants
//! - `KeyedStore` is the sole mutator of the medium; higher stores never
//!   address keys directly.
//! - Missing keys resolve to declared empty defaults, never errors.

pub mod events;
pub mod focus;
pub mod journal;
pub mod keyed;
pub mod medium;
pub mod stats;
pub mod tasks;
