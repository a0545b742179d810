//! Sign Up Use Case
//!
//! Creates a new user account with role USER.

use std::sync::Arc;

use kernel::id::UserId;
use platform::password::PasswordPolicyError;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::{ContactDetails, NewUser};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Sign up input
///
/// `None` and `Some("")` both count as absent.
#[derive(Default)]
pub struct SignUpInput {
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Sign up output
pub struct SignUpOutput {
    pub user_id: UserId,
}

/// Sign up use case
pub struct SignUpUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> SignUpUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        let (Some(user_name), Some(email), Some(password)) = (
            present(input.user_name),
            present(input.email),
            present(input.password),
        ) else {
            return Err(AuthError::MissingRegistrationFields);
        };

        let user_name = UserName::new(&user_name)?;
        let email = Email::new(&email)?;
        let raw_password = RawPassword::new(password).map_err(|e| match e {
            PasswordPolicyError::Empty => AuthError::MissingRegistrationFields,
            other => AuthError::Validation(other.to_string()),
        })?;

        // Single lookup on either identifier; the unique constraints in the
        // store catch anything that races past this check.
        let taken = self
            .user_repo
            .exists_by_email_or_user_name(Some(email.as_str()), Some(user_name.as_str()), None)
            .await?;
        if taken {
            return Err(AuthError::UserExists);
        }

        let password_hash = UserPassword::hash(raw_password, self.config.pepper()).await?;

        let contact = ContactDetails {
            first_name: present(input.first_name),
            last_name: present(input.last_name),
            phone: present(input.phone),
            address: present(input.address),
        };
        let new_user = NewUser::register(user_name, email, password_hash, contact);

        let user_id = self.user_repo.create(&new_user).await?;

        tracing::info!(
            user_id = %user_id,
            user_name = %new_user.user_name,
            "User signed up"
        );

        Ok(SignUpOutput { user_id })
    }
}

/// Empty strings count as absent
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
