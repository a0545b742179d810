//! API DTOs (Data Transfer Objects)
//!
//! Request bodies and the login response are camelCase; `/me` and
//! `/profile` answer with the snake_case column names.

use kernel::id::UserId;
use serde::{Deserialize, Deserializer, Serialize};

use crate::application::{SignInInput, SignUpInput};
use crate::domain::entity::{profile_patch::ProfilePatch, user::User};
use crate::domain::value_object::user_role::UserRole;

// ============================================================================
// Register
// ============================================================================

/// Register request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl From<RegisterRequest> for SignUpInput {
    fn from(req: RegisterRequest) -> Self {
        Self {
            user_name: req.username,
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
            phone: req.phone,
            address: req.address,
        }
    }
}

/// Register response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user_id: UserId,
}

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn into_input(self, previous_token: Option<String>) -> SignInInput {
        SignInInput {
            email: self.email,
            password: self.password,
            previous_token,
        }
    }
}

/// Login response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl From<User> for LoginResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.user_name.into_inner(),
            email: user.email.into_inner(),
            role: user.user_role,
            first_name: user.contact.first_name,
            last_name: user.contact.last_name,
            phone: user.contact.phone,
            address: user.contact.address,
        }
    }
}

// ============================================================================
// Profile
// ============================================================================

/// Public profile (`GET /me`, `PUT /profile`)
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.user_name.into_inner(),
            email: user.email.into_inner(),
            role: user.user_role,
            first_name: user.contact.first_name,
            last_name: user.contact.last_name,
            phone: user.contact.phone,
            address: user.contact.address,
        }
    }
}

/// Profile update request
///
/// Contact fields distinguish "absent" (`None`) from explicit `null`
/// (`Some(None)`).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub first_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub address: Option<Option<String>>,
}

impl From<ProfileUpdateRequest> for ProfilePatch {
    fn from(req: ProfileUpdateRequest) -> Self {
        Self {
            user_name: req.username,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            phone: req.phone,
            address: req.address,
        }
    }
}

/// A key that appears in the payload is `Some`, whatever its value
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// ============================================================================
// Common
// ============================================================================

/// Plain acknowledgment
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
