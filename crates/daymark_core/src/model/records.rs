//! Partition-owned data records.
//!
//! # Responsibility
//! - Define the serializable shapes for stats, tasks, calendar events and
//!   journal entries.
//! - Provide constructors that stamp creation-time identifiers.
//!
//! # Invariants
//! - `CalendarEvent::synced == true` implies `remote_id` is present; only a
//!   successful reconciliation pass assigns `remote_id`.
//! - `JournalEntry::id` is derived as `journal_<partition>_<date>` and at
//!   most one entry exists per (partition, date).

use crate::model::identity::PartitionKey;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Lifetime counters for one partition.
///
/// All fields are non-negative and, by caller convention, monotonically
/// non-decreasing: callers always pass `current + delta`, and no decrement
/// operation exists. The ledger does not enforce this structurally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub focus_minutes: u64,
    pub tasks_completed: u64,
    pub events_created: u64,
}

/// A to-do item owned by one partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Creation timestamp in epoch milliseconds. Two records created within
    /// the same millisecond can collide; accepted, not defended against.
    pub id: u64,
    pub title: String,
    pub completed: bool,
}

impl Task {
    /// Creates an open task stamped with the current-millisecond id.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: epoch_ms_now(),
            title: title.into(),
            completed: false,
        }
    }
}

/// A calendar event owned by one partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// Creation timestamp in epoch milliseconds; same collision caveat as
    /// `Task::id`.
    pub id: u64,
    pub title: String,
    /// ISO calendar date (`YYYY-MM-DD`).
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Freshness marker set by the reconciler; cleared only by replacing the
    /// record, never toggled directly by callers.
    #[serde(default)]
    pub synced: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,
}

impl CalendarEvent {
    /// Creates an unsynced event stamped with the current-millisecond id.
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        Self::with_id(epoch_ms_now(), title, date)
    }

    /// Creates an unsynced event with a caller-provided id.
    ///
    /// Used by reconciliation paths that need deterministic identifiers.
    pub fn with_id(id: u64, title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id,
            title: title.into(),
            date: date.format("%Y-%m-%d").to_string(),
            time: None,
            description: None,
            synced: false,
            remote_id: None,
        }
    }

    /// Marks this event as reconciled against the remote source.
    pub fn mark_synced(&mut self, remote_id: impl Into<String>) {
        self.synced = true;
        self.remote_id = Some(remote_id.into());
    }
}

/// One completed focus-timer session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusSession {
    /// Completion timestamp in epoch milliseconds; same collision caveat
    /// as `Task::id`.
    pub id: u64,
    /// Minutes of focus accumulated by this session.
    pub minutes: u64,
    /// ISO calendar date (`YYYY-MM-DD`) the session finished on.
    pub date: String,
}

impl FocusSession {
    /// Records a session that just finished with `minutes` on the clock.
    pub fn new(minutes: u64, date: NaiveDate) -> Self {
        Self {
            id: epoch_ms_now(),
            minutes,
            date: date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// One journal entry, unique per (partition, date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    /// Derived id, kept for stored-data compatibility. Uniqueness is
    /// enforced on `date`.
    pub id: String,
    /// ISO calendar date (`YYYY-MM-DD`). Kept as text because persisted
    /// collections may carry malformed values from earlier revisions.
    pub date: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Creates an entry for `date` with both timestamps set to now.
    pub fn new(partition: &PartitionKey, date: NaiveDate, content: impl Into<String>) -> Self {
        let date_text = date.format("%Y-%m-%d").to_string();
        let now = Utc::now();
        Self {
            id: derive_journal_id(partition, &date_text),
            date: date_text,
            content: content.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Derives the stable journal entry id for one (partition, date).
pub fn derive_journal_id(partition: &PartitionKey, date: &str) -> String {
    format!("journal_{}_{}", partition.slug(), date)
}

fn epoch_ms_now() -> u64 {
    // timestamp_millis is non-negative for any realistic wall clock
    Utc::now().timestamp_millis() as u64
}
