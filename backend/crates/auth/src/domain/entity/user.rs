//! User Entity
//!
//! Profile data only. The password hash travels separately in
//! [`UserCredentials`] and never reaches a response.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{
    email::Email, user_name::UserName, user_password::UserPassword, user_role::UserRole,
};

/// Optional contact details shared by registration and the stored profile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDetails {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Unique public handle
    pub user_name: UserName,
    /// Unique login identifier
    pub email: Email,
    pub user_role: UserRole,
    pub contact: ContactDetails,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// A user about to be inserted. The store assigns the id.
#[derive(Debug)]
pub struct NewUser {
    pub user_name: UserName,
    pub email: Email,
    pub password_hash: UserPassword,
    pub user_role: UserRole,
    pub contact: ContactDetails,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    /// Self-registered users always start as [`UserRole::User`]
    pub fn register(
        user_name: UserName,
        email: Email,
        password_hash: UserPassword,
        contact: ContactDetails,
    ) -> Self {
        Self {
            user_name,
            email,
            password_hash,
            user_role: UserRole::User,
            contact,
            created_at: Utc::now(),
        }
    }
}

/// User together with the stored hash, used only by login
#[derive(Debug)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: UserPassword,
}
