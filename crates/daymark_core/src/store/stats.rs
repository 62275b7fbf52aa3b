//! Lifetime stats ledger.
//!
//! # Responsibility
//! - Read the per-partition counters with a zeroed default.
//! - Apply shallow-merge updates and return the persisted result.
//!
//! # Invariants
//! - Counter updates are additive by convention at the call site: callers
//!   pass `current + delta`, never an absolute overwrite of a counter they
//!   did not read first. The ledger does not enforce monotonicity.
//! - Read-modify-write races between two logical actors in the same tick
//!   are accepted; last write wins.

use crate::model::identity::PartitionKey;
use crate::model::records::Stats;
use crate::store::keyed::{EntityKind, KeyedStore};
use crate::store::medium::{KvMedium, StoreResult};

/// Partial update applied over the current stats; `None` fields are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsUpdate {
    pub focus_minutes: Option<u64>,
    pub tasks_completed: Option<u64>,
    pub events_created: Option<u64>,
}

/// Accumulates the three per-partition counters.
pub struct StatsLedger<'s, M: KvMedium> {
    store: &'s KeyedStore<M>,
}

impl<'s, M: KvMedium> StatsLedger<'s, M> {
    pub fn new(store: &'s KeyedStore<M>) -> Self {
        Self { store }
    }

    /// Returns the partition's stats, zeroed when nothing was written yet.
    pub fn stats(&self, partition: &PartitionKey) -> StoreResult<Stats> {
        self.store
            .read_record_or(EntityKind::Stats, partition, Stats::default())
    }

    /// Shallow-merges `update` over the current stats, persists and returns
    /// the result.
    pub fn update(&self, update: StatsUpdate, partition: &PartitionKey) -> StoreResult<Stats> {
        let current = self.stats(partition)?;
        let merged = Stats {
            focus_minutes: update.focus_minutes.unwrap_or(current.focus_minutes),
            tasks_completed: update.tasks_completed.unwrap_or(current.tasks_completed),
            events_created: update.events_created.unwrap_or(current.events_created),
        };
        self.store.write(EntityKind::Stats, partition, &merged)?;
        Ok(merged)
    }
}
