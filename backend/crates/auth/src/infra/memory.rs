//! In-Memory Session Store
//!
//! Single-process session storage. Sessions are lost on restart.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::entity::auth_session::AuthSession;
use crate::domain::repository::SessionStore;
use crate::error::AuthResult;

/// `DashMap`-backed session store
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<DashMap<Uuid, AuthSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, expired ones included
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    async fn create(&self, session: &AuthSession) -> AuthResult<()> {
        self.sessions.insert(session.session_id, session.clone());
        Ok(())
    }

    async fn get(&self, session_id: Uuid) -> AuthResult<Option<AuthSession>> {
        Ok(self
            .sessions
            .get(&session_id)
            .map(|entry| entry.value().clone()))
    }

    async fn destroy(&self, session_id: Uuid) -> AuthResult<bool> {
        Ok(self.sessions.remove(&session_id).is_some())
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now_ms = Utc::now().timestamp_millis();
        let before = self.sessions.len();

        self.sessions.retain(|_, session| !session.is_expired_at(now_ms));

        let deleted = before.saturating_sub(self.sessions.len()) as u64;
        tracing::info!(sessions_deleted = deleted, "Cleaned up expired in-memory sessions");

        Ok(deleted)
    }
}
