//! Typed namespaced get/set primitive over the medium.
//!
//! # Responsibility
//! - Own the persisted key namespace and its partition addressing.
//! - Serialize/deserialize whole values as JSON documents.
//!
//! # Invariants
//! - Key derivation is `"{kind}"` for the anonymous partition and
//!   `"{kind}_{partition}"` otherwise; the literal kind keys never change.
//! - A missing key resolves to the caller's declared default, never an
//!   error. Unparseable persisted content propagates as `MalformedRecord`.

use crate::model::identity::PartitionKey;
use crate::store::medium::{KvMedium, StoreError, StoreResult};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Entity kinds with their persisted key names.
///
/// The literal values are a compatibility surface shared with earlier
/// revisions of the medium and must be preserved bit-exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Stats,
    Tasks,
    CalendarEvents,
    JournalEntries,
    FocusSessions,
    /// Session pointer; always addressed unpartitioned.
    Session,
}

impl EntityKind {
    /// Bare persisted key for this kind.
    pub fn base_key(self) -> &'static str {
        match self {
            Self::Stats => "user_stats",
            Self::Tasks => "tasks",
            Self::CalendarEvents => "calendar_events",
            Self::JournalEntries => "journal_entries",
            Self::FocusSessions => "focus_sessions",
            Self::Session => "user",
        }
    }
}

/// Derives the storage key for one (kind, partition) pair.
pub fn storage_key(kind: EntityKind, partition: &PartitionKey) -> String {
    match partition.key_suffix() {
        None => kind.base_key().to_string(),
        Some(suffix) => format!("{}_{}", kind.base_key(), suffix),
    }
}

/// Typed get/set layer over the flat medium.
///
/// Sole mutator of the underlying medium: every higher store reads and
/// writes through here.
pub struct KeyedStore<M: KvMedium> {
    medium: M,
}

impl<M: KvMedium> KeyedStore<M> {
    pub fn new(medium: M) -> Self {
        Self { medium }
    }

    /// Reads one record, or `None` when the key is absent.
    pub fn read_record<T: DeserializeOwned>(
        &self,
        kind: EntityKind,
        partition: &PartitionKey,
    ) -> StoreResult<Option<T>> {
        let key = storage_key(kind, partition);
        match self.medium.read(&key)? {
            None => Ok(None),
            Some(raw) => {
                let value = serde_json::from_str(&raw)
                    .map_err(|source| StoreError::MalformedRecord { key, source })?;
                Ok(Some(value))
            }
        }
    }

    /// Reads one record, falling back to `default` when the key is absent.
    pub fn read_record_or<T: DeserializeOwned>(
        &self,
        kind: EntityKind,
        partition: &PartitionKey,
        default: T,
    ) -> StoreResult<T> {
        Ok(self.read_record(kind, partition)?.unwrap_or(default))
    }

    /// Reads a full collection, or the empty collection when absent.
    pub fn read_collection<T: DeserializeOwned>(
        &self,
        kind: EntityKind,
        partition: &PartitionKey,
    ) -> StoreResult<Vec<T>> {
        Ok(self.read_record(kind, partition)?.unwrap_or_default())
    }

    /// Durably replaces the value at (kind, partition) with `value`.
    pub fn write<T: Serialize>(
        &self,
        kind: EntityKind,
        partition: &PartitionKey,
        value: &T,
    ) -> StoreResult<()> {
        let key = storage_key(kind, partition);
        let raw = serde_json::to_string(value)
            .map_err(|source| StoreError::Serialization {
                key: key.clone(),
                source,
            })?;
        debug!(
            "event=kv_write module=store status=ok key={} bytes={}",
            key,
            raw.len()
        );
        self.medium.write(&key, &raw)
    }

    /// Removes the value at (kind, partition) if present.
    pub fn remove(&self, kind: EntityKind, partition: &PartitionKey) -> StoreResult<()> {
        let key = storage_key(kind, partition);
        debug!("event=kv_remove module=store status=ok key={key}");
        self.medium.remove(&key)
    }
}
