//! Profile Use Cases
//!
//! Read and sparse self-update of the signed-in user's profile.

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entity::{profile_patch::ProfilePatch, user::User};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

/// Get profile use case
pub struct GetProfileUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> GetProfileUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, user_id: UserId) -> AuthResult<User> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

/// Update profile use case
pub struct UpdateProfileUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> UpdateProfileUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, user_id: UserId, patch: ProfilePatch) -> AuthResult<User> {
        let new_user_name = patch.new_user_name()?;
        let new_email = patch.new_email()?;

        if new_user_name.is_some() || new_email.is_some() {
            let taken = self
                .user_repo
                .exists_by_email_or_user_name(
                    new_email.as_ref().map(|e| e.as_str()),
                    new_user_name.as_ref().map(|n| n.as_str()),
                    Some(user_id),
                )
                .await?;
            if taken {
                return Err(AuthError::IdentityTaken);
            }
        }

        let changes = patch.changes()?;
        if changes.is_empty() {
            return Err(AuthError::NoProfileChanges);
        }

        self.user_repo
            .apply_profile_changes(user_id, &changes)
            .await?;

        tracing::info!(
            user_id = %user_id,
            fields = ?changes.iter().map(|c| c.field.column()).collect::<Vec<_>>(),
            "Profile updated"
        );

        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}
