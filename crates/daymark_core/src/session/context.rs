//! Current-session resolution over the keyed store.
//!
//! # Responsibility
//! - Read and mutate the unpartitioned session pointer.
//! - Guarantee the Stats partition exists as a side effect of login.
//!
//! # Invariants
//! - Partition keys are derived from the identity's stable unique
//!   identifier (email), never from mutable display fields.
//! - Exactly one session is active at a time; `login` replaces any
//!   previous pointer.

use crate::model::identity::{ExternalIdentity, PartitionKey, Session};
use crate::model::records::Stats;
use crate::store::keyed::{EntityKind, KeyedStore};
use crate::store::medium::{KvMedium, StoreResult};
use log::info;

/// Resolves the current user and owns the session lifecycle.
///
/// Store operations stay pure functions of `(partition, args)`: callers
/// obtain the partition here and pass it explicitly instead of reading
/// ambient global state.
pub struct SessionContext<'s, M: KvMedium> {
    store: &'s KeyedStore<M>,
}

impl<'s, M: KvMedium> SessionContext<'s, M> {
    pub fn new(store: &'s KeyedStore<M>) -> Self {
        Self { store }
    }

    /// Returns the active session, or `None` when nobody is logged in.
    ///
    /// A corrupt persisted pointer propagates as `MalformedRecord`; callers
    /// at the top level decide whether to surface or reset it.
    pub fn current(&self) -> StoreResult<Option<Session>> {
        self.store
            .read_record(EntityKind::Session, &PartitionKey::Anonymous)
    }

    /// Partition of the active session, or the anonymous partition when no
    /// session exists.
    pub fn active_partition(&self) -> StoreResult<PartitionKey> {
        Ok(self
            .current()?
            .map(|session| session.partition_key())
            .unwrap_or(PartitionKey::Anonymous))
    }

    /// Logs in with a provider identity and returns the stored session.
    ///
    /// Side effect: writes the zeroed Stats default for the partition if
    /// absent, so no downstream reader needs a first-login special case.
    pub fn login(&self, identity: &ExternalIdentity) -> StoreResult<Session> {
        let session = Session::from_identity(identity);
        self.persist_session(session)
    }

    /// Logs in as a synthetic guest identity.
    pub fn login_as_guest(&self) -> StoreResult<Session> {
        self.persist_session(Session::guest())
    }

    /// Clears the session pointer. All partitioned collections survive.
    pub fn logout(&self) -> StoreResult<()> {
        self.store
            .remove(EntityKind::Session, &PartitionKey::Anonymous)?;
        info!("event=session_logout module=session status=ok");
        Ok(())
    }

    fn persist_session(&self, session: Session) -> StoreResult<Session> {
        let partition = session.partition_key();
        self.ensure_stats_partition(&partition)?;
        self.store
            .write(EntityKind::Session, &PartitionKey::Anonymous, &session)?;
        info!(
            "event=session_login module=session status=ok partition={} guest={}",
            session.partition, session.is_guest
        );
        Ok(session)
    }

    fn ensure_stats_partition(&self, partition: &PartitionKey) -> StoreResult<()> {
        let existing: Option<Stats> = self.store.read_record(EntityKind::Stats, partition)?;
        if existing.is_none() {
            self.store
                .write(EntityKind::Stats, partition, &Stats::default())?;
        }
        Ok(())
    }
}
