//! Session persistence
//!
//! A [`SessionStore`] keeps exactly one record (the session) under a
//! fixed key, on top of a pluggable [`StorageBackend`]. A durable
//! backend may fail or be unavailable; an in-memory fallback is always
//! present so that `save` never fails from the caller's perspective.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use volhub_core::profile::UserProfile;

use crate::error::ClientError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, ClientError>;

/// String key/value storage capability
pub trait StorageBackend: Send + Sync {
    fn set_item(&self, key: &str, value: &str) -> StoreResult<()>;

    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;

    fn remove_item(&self, key: &str) -> StoreResult<()>;
}

/// Fixed storage key for the session record
pub const SESSION_KEY: &str = "volunteer_auth_data";

/// Version tag written into the persisted envelope
pub const ENVELOPE_VERSION: &str = "1.0";

/// Default session time-to-live
pub const DEFAULT_TTL_HOURS: i64 = 24;

/// A locally cached, time-bounded record of a verified (or guest) user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: UserProfile,
    /// Persisted as epoch milliseconds under the `timestamp` key
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub issued_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user: UserProfile) -> Self {
        Self {
            user,
            issued_at: Utc::now(),
        }
    }
}

/// On-disk layout: `{ value: { user, timestamp }, version }`
#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    value: Session,
    version: String,
}

/// Owner of the persisted session record
pub struct SessionStore {
    backend: Box<dyn StorageBackend>,
    fallback: MemoryBackend,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self {
            backend,
            fallback: MemoryBackend::new(),
            ttl: Duration::hours(DEFAULT_TTL_HOURS),
        }
    }

    /// Memory-only store, for hosts without durable storage
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryBackend::new()))
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Persist the session. Never fails: a primary-backend error is
    /// downgraded to a warning and the write is repeated against the
    /// in-memory fallback.
    pub fn save(&self, session: &Session) {
        let record = StoredRecord {
            value: session.clone(),
            version: ENVELOPE_VERSION.to_string(),
        };
        let serialized = match serde_json::to_string(&record) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize session");
                return;
            }
        };

        if let Err(e) = self.backend.set_item(SESSION_KEY, &serialized) {
            tracing::warn!(error = %e, "Session store write failed, falling back to memory");
            // Memory writes cannot fail
            let _ = self.fallback.set_item(SESSION_KEY, &serialized);
        }
    }

    /// Load the stored session. Absent, malformed or expired entries
    /// yield `None`; malformed and expired entries are removed as a
    /// side effect, so repeated calls are idempotent.
    pub fn load(&self) -> Option<Session> {
        let raw = match self.backend.get_item(SESSION_KEY) {
            Ok(Some(value)) => Some(value),
            Ok(None) => self.fallback.get_item(SESSION_KEY).ok().flatten(),
            Err(e) => {
                tracing::warn!(error = %e, "Session store read failed, trying memory fallback");
                self.fallback.get_item(SESSION_KEY).ok().flatten()
            }
        }?;

        let record: StoredRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed stored session, removing");
                self.clear();
                return None;
            }
        };

        if record.version != ENVELOPE_VERSION {
            tracing::warn!(version = %record.version, "Unknown session envelope version, removing");
            self.clear();
            return None;
        }

        if Utc::now() - record.value.issued_at > self.ttl {
            tracing::debug!("Stored session expired, removing");
            self.clear();
            return None;
        }

        Some(record.value)
    }

    /// Remove the stored session from both backends unconditionally
    pub fn clear(&self) {
        if let Err(e) = self.backend.remove_item(SESSION_KEY) {
            tracing::warn!(error = %e, "Session store remove failed");
        }
        let _ = self.fallback.remove_item(SESSION_KEY);
    }
}
