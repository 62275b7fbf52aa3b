//! Local/remote calendar reconciliation.
//!
//! # Responsibility
//! - Drive the `NotSynced -> Syncing -> Synced` freshness state machine.
//! - Tag reconciled events with remote identifiers and report deltas to
//!   the stats ledger.
//! - Funnel local event mutations so freshness tracking stays accurate.
//!
//! # Invariants
//! - Entry condition for a pass is an authenticated, non-guest session.
//! - A failed pass (remote error, timeout, storage error) falls back to
//!   `NotSynced` and leaves the stored collection untouched.
//! - `synced = true` implies a `remote_id`; both are assigned in the same
//!   pass.
//! - Any local mutation while `Synced` drops the state to `NotSynced`;
//!   freshness is never persisted on the collection itself.

use crate::model::identity::{PartitionKey, Session};
use crate::model::records::CalendarEvent;
use crate::store::events::EventStore;
use crate::store::keyed::KeyedStore;
use crate::store::medium::{KvMedium, StoreResult};
use crate::store::stats::{StatsLedger, StatsUpdate};
use crate::sync::remote::{RemoteCalendar, RemoteError};
use chrono::{Duration as ChronoDuration, Local, Utc};
use log::{info, warn};
use std::time::Duration;

/// Minimum event count a reconciled calendar reports. Collections below
/// this are padded with remote-originated events, matching the stored-data
/// shape of earlier revisions.
pub const MIN_REMOTE_EVENTS: usize = 5;

const DEFAULT_EXCHANGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Titles used for padded remote-originated events.
const REMOTE_EVENT_TITLES: [&str; 5] = [
    "Team standup",
    "Product planning",
    "Design review",
    "1:1 check-in",
    "Sprint retro",
];

/// Freshness of the local collection relative to the remote source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    NotSynced,
    Syncing,
    Synced,
}

/// Why a pass did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncFailure {
    NoActiveSession,
    GuestSession,
    Remote(RemoteError),
    Storage(String),
}

/// Deltas produced by a completed pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    /// Event count after reconciliation.
    pub total_events: usize,
    /// Remote-originated events appended by this pass.
    pub newly_added: usize,
}

/// Value-level outcome of one pass; errors never cross this boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Completed(SyncReport),
    Failed(SyncFailure),
}

impl SyncOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Reconciles one partition's calendar against a remote provider.
pub struct SyncReconciler<'s, M: KvMedium, R: RemoteCalendar> {
    events: EventStore<'s, M>,
    stats: StatsLedger<'s, M>,
    remote: R,
    state: SyncState,
    exchange_timeout: Duration,
}

impl<'s, M: KvMedium, R: RemoteCalendar> SyncReconciler<'s, M, R> {
    pub fn new(store: &'s KeyedStore<M>, remote: R) -> Self {
        Self {
            events: EventStore::new(store),
            stats: StatsLedger::new(store),
            remote,
            state: SyncState::NotSynced,
            exchange_timeout: DEFAULT_EXCHANGE_TIMEOUT,
        }
    }

    /// Overrides the exchange deadline; a slower remote fails the pass.
    pub fn with_exchange_timeout(mut self, timeout: Duration) -> Self {
        self.exchange_timeout = timeout;
        self
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Runs one reconciliation pass for the session's partition.
    ///
    /// On success every local event is tagged `synced` with a
    /// `remote_<id>` identifier, collections below [`MIN_REMOTE_EVENTS`]
    /// are padded with future-dated remote events, the whole collection is
    /// written back in one replace, and `eventsCreated` grows by the
    /// padded count.
    pub fn sync(&mut self, session: Option<&Session>) -> SyncOutcome {
        let Some(session) = session else {
            warn!("event=sync module=sync status=refused reason=no_session");
            return SyncOutcome::Failed(SyncFailure::NoActiveSession);
        };
        if session.is_guest {
            warn!("event=sync module=sync status=refused reason=guest_session");
            return SyncOutcome::Failed(SyncFailure::GuestSession);
        }

        let partition = session.partition_key();
        self.state = SyncState::Syncing;
        info!(
            "event=sync module=sync status=start partition={}",
            session.partition
        );

        match self.reconcile(session) {
            Ok(report) => {
                self.state = SyncState::Synced;
                info!(
                    "event=sync module=sync status=ok partition={} total={} added={}",
                    session.partition, report.total_events, report.newly_added
                );
                SyncOutcome::Completed(report)
            }
            Err(failure) => {
                self.state = SyncState::NotSynced;
                warn!(
                    "event=sync module=sync status=error partition={} error={:?}",
                    partition.slug(),
                    failure
                );
                SyncOutcome::Failed(failure)
            }
        }
    }

    /// Appends one event and invalidates freshness.
    pub fn add_event(
        &mut self,
        event: CalendarEvent,
        session: Option<&Session>,
    ) -> StoreResult<()> {
        self.mutate(session, |events| events.push(event))
    }

    /// Removes the event with `id`, if present, and invalidates freshness.
    pub fn remove_event(&mut self, id: u64, session: Option<&Session>) -> StoreResult<()> {
        self.mutate(session, |events| events.retain(|event| event.id != id))
    }

    /// Clears the partition's events and invalidates freshness.
    pub fn clear_events(&mut self, session: Option<&Session>) -> StoreResult<()> {
        self.mutate(session, |events| events.clear())
    }

    fn mutate(
        &mut self,
        session: Option<&Session>,
        apply: impl FnOnce(&mut Vec<CalendarEvent>),
    ) -> StoreResult<()> {
        let partition = session
            .map(|session| session.partition_key())
            .unwrap_or(PartitionKey::Anonymous);
        let mut events = self.events.list(&partition)?;
        apply(&mut events);
        self.events.save_all(&events, &partition)?;
        if self.state == SyncState::Synced {
            self.state = SyncState::NotSynced;
        }
        Ok(())
    }

    fn reconcile(&self, session: &Session) -> Result<SyncReport, SyncFailure> {
        let partition = session.partition_key();
        let local = self
            .events
            .list(&partition)
            .map_err(|err| SyncFailure::Storage(err.to_string()))?;

        self.remote
            .exchange(&local, self.exchange_timeout)
            .map_err(SyncFailure::Remote)?;

        let mut merged: Vec<CalendarEvent> = local
            .into_iter()
            .map(|mut event| {
                event.mark_synced(format!("remote_{}", event.id));
                event
            })
            .collect();

        let before = merged.len();
        if before < MIN_REMOTE_EVENTS {
            merged.extend(fabricate_remote_events(MIN_REMOTE_EVENTS - before));
        }
        let newly_added = merged.len() - before;

        self.events
            .save_all(&merged, &partition)
            .map_err(|err| SyncFailure::Storage(err.to_string()))?;

        if newly_added > 0 {
            let current = self
                .stats
                .stats(&partition)
                .map_err(|err| SyncFailure::Storage(err.to_string()))?;
            self.stats
                .update(
                    StatsUpdate {
                        events_created: Some(current.events_created + newly_added as u64),
                        ..StatsUpdate::default()
                    },
                    &partition,
                )
                .map_err(|err| SyncFailure::Storage(err.to_string()))?;
        }

        Ok(SyncReport {
            total_events: merged.len(),
            newly_added,
        })
    }
}

/// Builds `count` future-dated events in the shape a richer remote
/// calendar would return, already tagged as synced.
fn fabricate_remote_events(count: usize) -> Vec<CalendarEvent> {
    let today = Local::now().date_naive();
    let id_base = Utc::now().timestamp_millis() as u64;

    (0..count)
        .map(|index| {
            let date = today + ChronoDuration::days(index as i64 + 1);
            let title = REMOTE_EVENT_TITLES[index % REMOTE_EVENT_TITLES.len()];
            let mut event = CalendarEvent::with_id(id_base + index as u64, title, date);
            event.time = Some(format!("{:02}:00", 9 + (index % 8)));
            event.description = Some("Imported from connected calendar".to_string());
            event.mark_synced(format!("remote_{}", event.id));
            event
        })
        .collect()
}
