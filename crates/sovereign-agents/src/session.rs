//! Session Management
//!
//! A desk session owns the dataset uploaded during one interaction. Sessions
//! live in memory only and disappear with the process.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dataset::TabularDataset;
use crate::error::{DeskError, Result};

/// Unique session identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One interaction's state
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeskSession {
    pub id: SessionId,

    /// Uploaded data; empty until a file arrives
    pub dataset: TabularDataset,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DeskSession {
    pub fn new() -> Self {
        Self::with_id(SessionId::new())
    }

    pub fn with_id(id: SessionId) -> Self {
        let now = Utc::now();
        Self {
            id,
            dataset: TabularDataset::empty(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Replace the session's dataset
    pub fn attach(&mut self, dataset: TabularDataset) {
        self.dataset = dataset;
        self.touch();
    }
}

impl Default for DeskSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Session store trait
pub trait SessionStore: Send + Sync {
    fn save(&self, session: &DeskSession) -> Result<()>;

    fn load(&self, id: &SessionId) -> Result<Option<DeskSession>>;

    fn delete(&self, id: &SessionId) -> Result<()>;

    /// Dataset of a session, empty when the session is unknown
    fn dataset(&self, id: &SessionId) -> Result<TabularDataset> {
        Ok(self
            .load(id)?
            .map(|s| s.dataset)
            .unwrap_or_default())
    }
}

/// Idle seconds after which a session is dropped from the memory store
pub const SESSION_IDLE_SECS: i64 = 24 * 60 * 60;

/// In-memory session store. Saving evicts sessions idle past the limit.
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionId, DeskSession>>,
    idle_limit: TimeDelta,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::with_idle_limit(TimeDelta::seconds(SESSION_IDLE_SECS))
    }

    pub fn with_idle_limit(idle_limit: TimeDelta) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_limit,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.read().map_or(0, |s| s.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> DeskError {
    DeskError::Session("session store lock poisoned".into())
}

impl SessionStore for MemorySessionStore {
    fn save(&self, session: &DeskSession) -> Result<()> {
        let cutoff = Utc::now() - self.idle_limit;
        let mut sessions = self.sessions.write().map_err(poisoned)?;

        let before = sessions.len();
        sessions.retain(|_, s| s.updated_at >= cutoff);
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::debug!(evicted, "Evicted idle sessions");
        }

        sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }

    fn load(&self, id: &SessionId) -> Result<Option<DeskSession>> {
        let sessions = self.sessions.read().map_err(poisoned)?;
        Ok(sessions.get(id).cloned())
    }

    fn delete(&self, id: &SessionId) -> Result<()> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        sessions.remove(id);
        Ok(())
    }
}
