//! Focus session collection store.
//!
//! Same list/replace contract as the task store; callers append a finished
//! session and pair it with a `focusMinutes` ledger update. The two writes
//! are not transactional (single-key replace is the only atomicity unit).

use crate::model::identity::PartitionKey;
use crate::model::records::FocusSession;
use crate::store::keyed::{EntityKind, KeyedStore};
use crate::store::medium::{KvMedium, StoreResult};

pub struct FocusSessionStore<'s, M: KvMedium> {
    store: &'s KeyedStore<M>,
}

impl<'s, M: KvMedium> FocusSessionStore<'s, M> {
    pub fn new(store: &'s KeyedStore<M>) -> Self {
        Self { store }
    }

    /// Returns the partition's sessions in completion order; empty when
    /// none were ever saved.
    pub fn list(&self, partition: &PartitionKey) -> StoreResult<Vec<FocusSession>> {
        self.store
            .read_collection(EntityKind::FocusSessions, partition)
    }

    /// Replaces the partition's session collection in one durable write.
    pub fn save_all(
        &self,
        sessions: &[FocusSession],
        partition: &PartitionKey,
    ) -> StoreResult<()> {
        self.store
            .write(EntityKind::FocusSessions, partition, &sessions)
    }
}
