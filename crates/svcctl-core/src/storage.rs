//! The durable session record and an in-memory store for it.

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::traits::SessionStorage;

/// The persisted copy of a session.
///
/// Mirrors the three durable entries: `token`, `refresh_token` and `user`
/// (the JSON-serialized identity). The identity is kept as a string so a
/// damaged entry can be detected when the session is rehydrated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl StoredSession {
    /// True when no entry is present.
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.refresh_token.is_none() && self.user.is_none()
    }
}

/// Volatile [`SessionStorage`], for tests and one-shot processes.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    record: Mutex<StoredSession>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing record, e.g. to simulate a previous run.
    pub fn with_record(record: StoredSession) -> Self {
        Self {
            record: Mutex::new(record),
        }
    }

    /// Snapshot of what is currently stored.
    pub fn snapshot(&self) -> StoredSession {
        self.record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<StoredSession> {
        Ok(self.snapshot())
    }

    fn save(&self, record: &StoredSession) -> Result<()> {
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) = record.clone();
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) = StoredSession::default();
        Ok(())
    }
}
