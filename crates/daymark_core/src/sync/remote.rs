//! Remote calendar provider seam.
//!
//! # Responsibility
//! - Define the exchange contract the reconciler drives.
//! - Provide the simulated provider used in place of a real wire protocol.
//!
//! # Invariants
//! - Providers never mutate local state; they only confirm or refuse an
//!   exchange.

use crate::model::records::CalendarEvent;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Failure reported by a remote exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The remote side refused or errored out.
    Unavailable(String),
    /// The exchange did not complete within the caller's deadline.
    TimedOut { deadline_ms: u64 },
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "remote calendar unavailable: {reason}"),
            Self::TimedOut { deadline_ms } => {
                write!(f, "remote exchange timed out after {deadline_ms}ms")
            }
        }
    }
}

impl Error for RemoteError {}

/// Exchange contract between the reconciler and a calendar provider.
pub trait RemoteCalendar {
    /// Pushes the local snapshot to the remote side and waits for a
    /// confirmation, observing `deadline`.
    fn exchange(&self, events: &[CalendarEvent], deadline: Duration) -> RemoteResult<()>;
}

/// Stand-in for a real provider.
///
/// Models outcome and latency without blocking: the configured latency is
/// compared against the caller's deadline instead of being slept through,
/// keeping exchanges deterministic under test.
pub struct SimulatedRemoteCalendar {
    latency: Duration,
    failure: Option<String>,
}

impl SimulatedRemoteCalendar {
    /// A provider that confirms immediately.
    pub fn new() -> Self {
        Self {
            latency: Duration::ZERO,
            failure: None,
        }
    }

    /// A provider that takes `latency` to answer.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            failure: None,
        }
    }

    /// A provider that refuses every exchange with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            latency: Duration::ZERO,
            failure: Some(reason.into()),
        }
    }
}

impl Default for SimulatedRemoteCalendar {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteCalendar for SimulatedRemoteCalendar {
    fn exchange(&self, _events: &[CalendarEvent], deadline: Duration) -> RemoteResult<()> {
        if self.latency > deadline {
            return Err(RemoteError::TimedOut {
                deadline_ms: deadline.as_millis() as u64,
            });
        }
        if let Some(reason) = &self.failure {
            return Err(RemoteError::Unavailable(reason.clone()));
        }
        Ok(())
    }
}
