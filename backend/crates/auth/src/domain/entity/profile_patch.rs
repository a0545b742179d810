//! Profile Patch
//!
//! Sparse self-update of a user's profile, reduced by a pure function to
//! the list of column assignments the store has to apply.
//!
//! Presence rules:
//! - `user_name` / `email`: applied only when non-blank
//! - contact fields: applied whenever present, including explicit `null`
//!   and `""`

use crate::domain::value_object::{email::Email, user_name::UserName};
use crate::error::AuthResult;

/// Updatable profile column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    UserName,
    Email,
    FirstName,
    LastName,
    Phone,
    Address,
}

impl ProfileField {
    /// Column name in `users`
    pub const fn column(&self) -> &'static str {
        match self {
            ProfileField::UserName => "username",
            ProfileField::Email => "email",
            ProfileField::FirstName => "first_name",
            ProfileField::LastName => "last_name",
            ProfileField::Phone => "phone",
            ProfileField::Address => "address",
        }
    }
}

/// One column assignment; `None` writes SQL NULL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileChange {
    pub field: ProfileField,
    pub value: Option<String>,
}

impl ProfileChange {
    fn new(field: ProfileField, value: Option<String>) -> Self {
        Self { field, value }
    }
}

/// Requested profile update
///
/// Outer `Option` is presence in the payload, inner `Option` is the value
/// (`None` for an explicit `null`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<Option<String>>,
    pub last_name: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub address: Option<Option<String>>,
}

impl ProfilePatch {
    /// Requested new user name, if a non-blank one was supplied
    pub fn new_user_name(&self) -> AuthResult<Option<UserName>> {
        non_blank(&self.user_name).map(UserName::new).transpose()
    }

    /// Requested new email, if a non-blank one was supplied
    pub fn new_email(&self) -> AuthResult<Option<Email>> {
        non_blank(&self.email).map(Email::new).transpose()
    }

    /// Reduce the patch to column assignments, in a stable order
    ///
    /// An empty result means nothing recognizable was requested.
    pub fn changes(&self) -> AuthResult<Vec<ProfileChange>> {
        let mut changes = Vec::new();

        if let Some(user_name) = self.new_user_name()? {
            changes.push(ProfileChange::new(
                ProfileField::UserName,
                Some(user_name.into_inner()),
            ));
        }
        if let Some(email) = self.new_email()? {
            changes.push(ProfileChange::new(
                ProfileField::Email,
                Some(email.into_inner()),
            ));
        }

        let contact = [
            (ProfileField::FirstName, &self.first_name),
            (ProfileField::LastName, &self.last_name),
            (ProfileField::Phone, &self.phone),
            (ProfileField::Address, &self.address),
        ];
        for (field, value) in contact {
            if let Some(value) = value {
                changes.push(ProfileChange::new(field, value.clone()));
            }
        }

        Ok(changes)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
