//! Sign In Use Case
//!
//! Authenticates a user by email and password and creates a session.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_token;
use crate::domain::entity::{auth_session::AuthSession, user::User};
use crate::domain::repository::{SessionStore, UserRepository};
use crate::domain::value_object::user_password::{RawPassword, UserPassword};
use crate::error::{AuthError, AuthResult};

/// Sign in input
#[derive(Default)]
pub struct SignInInput {
    pub email: Option<String>,
    pub password: Option<String>,
    /// Session cookie already carried by the client, if any
    pub previous_token: Option<String>,
}

/// Sign in output
pub struct SignInOutput {
    /// Signed session token for cookie
    pub session_token: String,
    pub user: User,
}

/// Sign in use case
pub struct SignInUseCase<U, S>
where
    U: UserRepository,
    S: SessionStore,
{
    user_repo: Arc<U>,
    session_store: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, S> SignInUseCase<U, S>
where
    U: UserRepository,
    S: SessionStore,
{
    pub fn new(user_repo: Arc<U>, session_store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            session_store,
            config,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let (Some(email), Some(password)) = (
            input.email.filter(|e| !e.is_empty()),
            input.password.filter(|p| !p.is_empty()),
        ) else {
            return Err(AuthError::MissingLoginFields);
        };

        // Unknown email and wrong password must look the same to the caller
        let credentials = self
            .user_repo
            .find_credentials_by_email(email.trim())
            .await?;

        let raw_password =
            RawPassword::new(password).map_err(|_| AuthError::InvalidCredentials)?;

        let Some(credentials) = credentials else {
            UserPassword::decoy()?
                .verify(raw_password, self.config.pepper())
                .await?;
            return Err(AuthError::InvalidCredentials);
        };

        let password_valid = credentials
            .password_hash
            .verify(raw_password, self.config.pepper())
            .await?;

        if !password_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let user = credentials.user;

        if let Err(e) = self.user_repo.record_login(user.user_id).await {
            tracing::warn!(user_id = %user.user_id, error = %e, "Failed to record last login");
        }

        // A session cookie that survives into a new login is discarded
        if let Some(previous_id) = input
            .previous_token
            .as_deref()
            .and_then(|token| session_token::verify(token, &self.config.session_secret))
        {
            if let Err(e) = self.session_store.destroy(previous_id).await {
                tracing::warn!(session_id = %previous_id, error = %e, "Failed to discard previous session");
            }
        }

        let session = AuthSession::new(user.user_id, user.user_role, self.config.session_ttl);
        self.session_store.create(&session).await?;

        let session_token = session_token::sign(session.session_id, &self.config.session_secret);

        tracing::info!(
            user_id = %user.user_id,
            session_id = %session.session_id,
            user_role = %user.user_role,
            "User signed in"
        );

        Ok(SignInOutput {
            session_token,
            user,
        })
    }
}
