//! User-scoped persistence and synchronization core for Daymark.
//! This crate is the single source of truth for partition, aggregation and
//! reconciliation invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod session;
pub mod store;
pub mod sync;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::identity::{ExternalIdentity, PartitionKey, Session};
pub use model::records::{CalendarEvent, FocusSession, JournalEntry, Stats, Task};
pub use session::SessionContext;
pub use store::events::EventStore;
pub use store::focus::FocusSessionStore;
pub use store::journal::{ArchiveBuckets, JournalStore};
pub use store::keyed::{storage_key, EntityKind, KeyedStore};
pub use store::medium::{KvMedium, SqliteKvMedium, StoreError, StoreResult};
pub use store::stats::{StatsLedger, StatsUpdate};
pub use store::tasks::TaskStore;
pub use sync::{
    RemoteCalendar, RemoteError, SimulatedRemoteCalendar, SyncFailure, SyncOutcome,
    SyncReconciler, SyncReport, SyncState,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
