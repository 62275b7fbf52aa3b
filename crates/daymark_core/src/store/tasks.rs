//! Task collection store.
//!
//! # Responsibility
//! - Provide list/replace access to one partition's ordered task list.
//!
//! # Invariants
//! - `save_all` fully replaces the collection; callers construct the next
//!   full collection (append, filter-out, toggle) themselves. The store
//!   performs no diffing.
//! - The collection carries no ordering beyond insertion order.

use crate::model::identity::PartitionKey;
use crate::model::records::Task;
use crate::store::keyed::{EntityKind, KeyedStore};
use crate::store::medium::{KvMedium, StoreResult};

pub struct TaskStore<'s, M: KvMedium> {
    store: &'s KeyedStore<M>,
}

impl<'s, M: KvMedium> TaskStore<'s, M> {
    pub fn new(store: &'s KeyedStore<M>) -> Self {
        Self { store }
    }

    /// Returns the partition's tasks in insertion order; empty when none
    /// were ever saved.
    pub fn list(&self, partition: &PartitionKey) -> StoreResult<Vec<Task>> {
        self.store.read_collection(EntityKind::Tasks, partition)
    }

    /// Replaces the partition's task collection in one durable write.
    pub fn save_all(&self, tasks: &[Task], partition: &PartitionKey) -> StoreResult<()> {
        self.store.write(EntityKind::Tasks, partition, &tasks)
    }
}
