//! Calendar event collection store.
//!
//! # Responsibility
//! - Provide list/replace access to one partition's ordered event list.
//!
//! # Invariants
//! - `save_all` fully replaces the collection in one durable write, which
//!   makes it atomic and blind to intervening writers.
//! - `remote_id` values pass through untouched; only the reconciler
//!   assigns them.

use crate::model::identity::PartitionKey;
use crate::model::records::CalendarEvent;
use crate::store::keyed::{EntityKind, KeyedStore};
use crate::store::medium::{KvMedium, StoreResult};

pub struct EventStore<'s, M: KvMedium> {
    store: &'s KeyedStore<M>,
}

impl<'s, M: KvMedium> EventStore<'s, M> {
    pub fn new(store: &'s KeyedStore<M>) -> Self {
        Self { store }
    }

    /// Returns the partition's events in insertion order; empty when none
    /// were ever saved.
    pub fn list(&self, partition: &PartitionKey) -> StoreResult<Vec<CalendarEvent>> {
        self.store
            .read_collection(EntityKind::CalendarEvents, partition)
    }

    /// Replaces the partition's event collection in one durable write.
    pub fn save_all(&self, events: &[CalendarEvent], partition: &PartitionKey) -> StoreResult<()> {
        self.store
            .write(EntityKind::CalendarEvents, partition, &events)
    }
}
