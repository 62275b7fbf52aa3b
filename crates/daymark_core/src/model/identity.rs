//! Identity and partition-key types.
//!
//! # Responsibility
//! - Model the active session record and the external identity it is built
//!   from.
//! - Derive the stable partition key under which all of a user's data is
//!   namespaced.
//!
//! # Invariants
//! - A partition slug is derived only from the identity's stable unique
//!   identifier (email), never from mutable display fields.
//! - `PartitionKey::Anonymous` addresses the bare legacy keys; it never
//!   carries a suffix.

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

static NON_SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

/// Slug used wherever the anonymous partition needs a printable name
/// (journal entry ids, log lines). Key addressing for the anonymous
/// partition uses the bare kind key instead.
pub const ANONYMOUS_SLUG: &str = "anonymous";

/// Partition under which all of a user's entities are namespaced.
///
/// Partitioning is mandatory in every store API; the "no session" case is
/// the explicit `Anonymous` variant rather than an optional key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartitionKey {
    /// Well-known default partition used when no session is active.
    /// Addresses the bare `kind` keys for compatibility with data written
    /// before partitioning existed.
    Anonymous,
    /// Partition owned by an authenticated (or guest) identity.
    User(String),
}

impl PartitionKey {
    /// Derives the stable partition for an authenticated identity.
    ///
    /// The slug is the lowercased email with every non-`[a-z0-9]` run
    /// collapsed to `_`. Two logins with the same email always resolve to
    /// the same partition.
    pub fn from_email(email: &str) -> Self {
        let lowered = email.trim().to_lowercase();
        let slug = NON_SLUG_RE.replace_all(&lowered, "_");
        Self::User(slug.trim_matches('_').to_string())
    }

    /// Creates a fresh guest partition keyed by the current timestamp.
    pub fn guest() -> Self {
        Self::User(format!("guest_{}", Utc::now().timestamp_millis()))
    }

    /// Printable partition name for derived ids and log lines.
    pub fn slug(&self) -> &str {
        match self {
            Self::Anonymous => ANONYMOUS_SLUG,
            Self::User(slug) => slug,
        }
    }

    /// Key suffix appended to an entity kind, or `None` for the bare key.
    pub fn key_suffix(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::User(slug) => Some(slug),
        }
    }
}

/// Identity payload supplied by the out-of-scope identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIdentity {
    pub name: String,
    pub email: String,
    pub picture_url: Option<String>,
    pub external_token: Option<String>,
}

/// The active session record, stored unpartitioned under the `user` key.
///
/// Exactly one session is active at a time; absence of the record means all
/// partitioned state is inaccessible but not deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub display_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_ref: Option<String>,
    pub is_guest: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_token: Option<String>,
    /// Partition slug derived at login; stored so re-login resolution never
    /// re-derives from mutable display fields.
    pub partition: String,
}

impl Session {
    /// Builds an authenticated session from a provider identity.
    pub fn from_identity(identity: &ExternalIdentity) -> Self {
        let partition = PartitionKey::from_email(&identity.email);
        Self {
            id: format!("user_{}", Uuid::new_v4().simple()),
            display_name: identity.name.clone(),
            email: identity.email.clone(),
            avatar_ref: identity.picture_url.clone(),
            is_guest: false,
            external_token: identity.external_token.clone(),
            partition: partition.slug().to_string(),
        }
    }

    /// Builds a synthetic guest session with a timestamp-derived identifier
    /// and no external token.
    pub fn guest() -> Self {
        let partition = PartitionKey::guest();
        Self {
            id: partition.slug().to_string(),
            display_name: "Guest".to_string(),
            email: String::new(),
            avatar_ref: None,
            is_guest: true,
            external_token: None,
            partition: partition.slug().to_string(),
        }
    }

    /// Partition this session's collections are keyed under.
    pub fn partition_key(&self) -> PartitionKey {
        PartitionKey::User(self.partition.clone())
    }
}
