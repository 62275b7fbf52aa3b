//! Date-keyed journal store and archive projection.
//!
//! # Responsibility
//! - Provide upsert-by-date access to one partition's journal entries.
//! - Derive the monthly archive grouping on demand.
//!
//! # Invariants
//! - At most one entry exists per (partition, date); `upsert_entry`
//!   replaces in place and preserves the original `createdAt`.
//! - The archive projection is pure and fully recomputed: identical input
//!   collections produce identical output regardless of call order.
//! - Entries with malformed dates are skipped by the archive projection
//!   (skip-and-continue policy), never surfaced as errors.

use crate::model::identity::PartitionKey;
use crate::model::records::JournalEntry;
use crate::store::keyed::{EntityKind, KeyedStore};
use crate::store::medium::{KvMedium, StoreResult};
use chrono::{Datelike, Local, NaiveDate, Utc};
use log::warn;
use std::collections::BTreeMap;

/// Archive buckets keyed by zero-padded `"YYYY-MM"`.
pub type ArchiveBuckets = BTreeMap<String, Vec<JournalEntry>>;

pub struct JournalStore<'s, M: KvMedium> {
    store: &'s KeyedStore<M>,
}

impl<'s, M: KvMedium> JournalStore<'s, M> {
    pub fn new(store: &'s KeyedStore<M>) -> Self {
        Self { store }
    }

    /// Returns the partition's entries in insertion order; empty when none
    /// were ever saved.
    pub fn entries(&self, partition: &PartitionKey) -> StoreResult<Vec<JournalEntry>> {
        self.store
            .read_collection(EntityKind::JournalEntries, partition)
    }

    /// Returns the entry for `date`, if one exists.
    pub fn entry_for_date(
        &self,
        date: NaiveDate,
        partition: &PartitionKey,
    ) -> StoreResult<Option<JournalEntry>> {
        let date_text = date.format("%Y-%m-%d").to_string();
        let entries = self.entries(partition)?;
        Ok(entries.into_iter().find(|entry| entry.date == date_text))
    }

    /// Creates or replaces the entry for `date` and returns the persisted
    /// record.
    ///
    /// Uniqueness is keyed on `date`: an existing entry keeps its derived
    /// `id` and `createdAt`, takes the new content, and gets a fresh
    /// `updatedAt`. The full collection is persisted in one write.
    pub fn upsert_entry(
        &self,
        date: NaiveDate,
        content: impl Into<String>,
        partition: &PartitionKey,
    ) -> StoreResult<JournalEntry> {
        let date_text = date.format("%Y-%m-%d").to_string();
        let mut entries = self.entries(partition)?;

        let entry = match entries.iter().position(|entry| entry.date == date_text) {
            Some(index) => {
                let existing = &mut entries[index];
                existing.content = content.into();
                existing.updated_at = Utc::now();
                existing.clone()
            }
            None => {
                let created = JournalEntry::new(partition, date, content);
                entries.push(created.clone());
                created
            }
        };

        self.store
            .write(EntityKind::JournalEntries, partition, &entries)?;
        Ok(entry)
    }

    /// Groups all entries outside the current calendar month into
    /// `"YYYY-MM"` buckets.
    pub fn archived_entries(&self, partition: &PartitionKey) -> StoreResult<ArchiveBuckets> {
        self.archived_entries_as_of(partition, Local::now().date_naive())
    }

    /// Archive grouping relative to an explicit `today`; pure projection
    /// over the stored collection.
    pub fn archived_entries_as_of(
        &self,
        partition: &PartitionKey,
        today: NaiveDate,
    ) -> StoreResult<ArchiveBuckets> {
        Ok(group_archived(self.entries(partition)?, today))
    }
}

/// Buckets `entries` by calendar month, excluding `today`'s month.
///
/// Malformed dates are skipped and logged; the grouping itself never fails.
fn group_archived(entries: Vec<JournalEntry>, today: NaiveDate) -> ArchiveBuckets {
    let current = (today.year(), today.month());
    let mut buckets = ArchiveBuckets::new();

    for entry in entries {
        let Some(month) = entry_month(&entry.date) else {
            warn!(
                "event=journal_archive module=store status=skip reason=malformed_date id={}",
                entry.id
            );
            continue;
        };
        if month == current {
            continue;
        }
        let key = format!("{:04}-{:02}", month.0, month.1);
        buckets.entry(key).or_default().push(entry);
    }

    buckets
}

fn entry_month(date_text: &str) -> Option<(i32, u32)> {
    let parsed = NaiveDate::parse_from_str(date_text, "%Y-%m-%d").ok()?;
    Some((parsed.year(), parsed.month()))
}
