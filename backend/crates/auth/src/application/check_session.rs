//! Check Session Use Case
//!
//! Resolves a session cookie to a live server-side session.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_token;
use crate::domain::entity::auth_session::AuthSession;
use crate::domain::repository::SessionStore;
use crate::error::AuthResult;

/// Check session use case
pub struct CheckSessionUseCase<S>
where
    S: SessionStore,
{
    session_store: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> CheckSessionUseCase<S>
where
    S: SessionStore,
{
    pub fn new(session_store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_store,
            config,
        }
    }

    /// Resolve a cookie value to its session
    ///
    /// Returns `Ok(None)` for tampered tokens, unknown sessions and expired
    /// sessions. An expired session is deleted on the way out.
    pub async fn execute(&self, session_token: &str) -> AuthResult<Option<AuthSession>> {
        let Some(session_id) = session_token::verify(session_token, &self.config.session_secret)
        else {
            tracing::debug!("Session token failed verification");
            return Ok(None);
        };

        let Some(session) = self.session_store.get(session_id).await? else {
            return Ok(None);
        };

        if session.is_expired() {
            self.session_store.destroy(session_id).await?;
            tracing::debug!(session_id = %session_id, "Expired session purged");
            return Ok(None);
        }

        Ok(Some(session))
    }
}
