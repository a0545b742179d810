//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::UserId;
use uuid::Uuid;

use crate::domain::entity::{
    auth_session::AuthSession,
    profile_patch::ProfileChange,
    user::{NewUser, User, UserCredentials},
};
use crate::error::AuthResult;

/// User (credential store) repository trait
///
/// `username` and `email` are unique across all users. Implementations
/// report a uniqueness violation on insert as [`AuthError::UserExists`] and
/// on profile update as [`AuthError::IdentityTaken`].
///
/// [`AuthError::UserExists`]: crate::error::AuthError::UserExists
/// [`AuthError::IdentityTaken`]: crate::error::AuthError::IdentityTaken
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user and return the assigned id
    async fn create(&self, user: &NewUser) -> AuthResult<UserId>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>>;

    /// Find user and stored hash by exact email
    async fn find_credentials_by_email(&self, email: &str) -> AuthResult<Option<UserCredentials>>;

    /// Whether another user already holds `email` or `user_name`
    ///
    /// `None` arguments are not matched. `exclude` skips the caller's own row.
    async fn exists_by_email_or_user_name(
        &self,
        email: Option<&str>,
        user_name: Option<&str>,
        exclude: Option<UserId>,
    ) -> AuthResult<bool>;

    /// Apply column assignments to one user. `changes` is never empty.
    async fn apply_profile_changes(
        &self,
        user_id: UserId,
        changes: &[ProfileChange],
    ) -> AuthResult<()>;

    /// Stamp last login time
    async fn record_login(&self, user_id: UserId) -> AuthResult<()>;
}

/// Session store trait
#[trait_variant::make(SessionStore: Send)]
pub trait LocalSessionStore {
    /// Persist a new session
    async fn create(&self, session: &AuthSession) -> AuthResult<()>;

    /// Find session by ID (expired sessions may still be returned)
    async fn get(&self, session_id: Uuid) -> AuthResult<Option<AuthSession>>;

    /// Delete a session. Returns whether it existed.
    async fn destroy(&self, session_id: Uuid) -> AuthResult<bool>;

    /// Delete every expired session
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}
