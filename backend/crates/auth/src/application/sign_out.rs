//! Sign Out Use Case
//!
//! Invalidates a user session.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::repository::SessionStore;
use crate::error::AuthResult;

/// Sign out use case
pub struct SignOutUseCase<S>
where
    S: SessionStore,
{
    session_store: Arc<S>,
}

impl<S> SignOutUseCase<S>
where
    S: SessionStore,
{
    pub fn new(session_store: Arc<S>) -> Self {
        Self { session_store }
    }

    /// Destroy the current session
    pub async fn execute(&self, session_id: Uuid) -> AuthResult<()> {
        let existed = self.session_store.destroy(session_id).await?;

        tracing::info!(session_id = %session_id, existed, "User signed out");
        Ok(())
    }
}
