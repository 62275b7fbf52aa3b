//! Domain model for user-scoped productivity data.
//!
//! # Responsibility
//! - Define the serializable records owned by each partition.
//! - Define the identity/partition types every store keys on.
//!
//! # Invariants
//! - Persisted field names stay `camelCase` so stored values remain readable
//!   by earlier revisions of the medium.
//! - Every record except `Session` is owned by exactly one partition.

pub mod identity;
pub mod records;
