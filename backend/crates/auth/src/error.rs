//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, conversions::classify_sqlx_error, kind::ErrorKind};
use platform::password::PasswordHashError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Username, email and password are required")]
    MissingRegistrationFields,

    #[error("Email and password are required")]
    MissingLoginFields,

    /// Field present but malformed
    #[error("{0}")]
    Validation(String),

    #[error("No fields to update")]
    NoProfileChanges,

    /// Unknown email or wrong password. Deliberately indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No valid session on a route that needs one
    #[error("Authentication required")]
    Unauthenticated,

    /// No valid session, or session role is not ADMIN
    #[error("Admin privileges required")]
    AdminRequired,

    #[error("User not found")]
    UserNotFound,

    /// Registration collided with an existing email or username
    #[error("User already exists")]
    UserExists,

    /// Profile update collided with another user's email or username
    #[error("Email or username already taken")]
    IdentityTaken,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing error: {0}")]
    Hashing(#[from] PasswordHashError),

    #[error("Internal error: {0}")]
    Internal(String),

    /// Server-side failure reported under the operation that hit it
    #[error("{operation}")]
    Failed {
        operation: &'static str,
        #[source]
        source: Box<AuthError>,
    },
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::MissingRegistrationFields
            | AuthError::MissingLoginFields
            | AuthError::Validation(_)
            | AuthError::NoProfileChanges => ErrorKind::BadRequest,
            AuthError::InvalidCredentials | AuthError::Unauthenticated => ErrorKind::Unauthorized,
            AuthError::AdminRequired => ErrorKind::Forbidden,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::UserExists | AuthError::IdentityTaken => ErrorKind::Conflict,
            AuthError::Database(e) => classify_sqlx_error(e).0,
            AuthError::Hashing(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
            AuthError::Failed { source, .. } => source.kind(),
        }
    }

    /// Message safe to show to the client
    ///
    /// Server-side details stay in the logs.
    fn client_message(&self) -> String {
        match self {
            AuthError::Database(e) => classify_sqlx_error(e).1.to_string(),
            AuthError::Hashing(_) | AuthError::Internal(_) => self.kind().as_str().to_string(),
            _ => self.to_string(),
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.client_message())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Failed { operation, source } => {
                tracing::error!(operation = %operation, error = %source, "Auth operation failed");
            }
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Hashing(e) => {
                tracing::error!(error = %e, "Auth password hashing error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::AdminRequired => {
                tracing::warn!("Admin route refused");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

/// Attach the failing operation to server-side errors
pub trait AuthResultExt<T> {
    /// Server-side errors become [`AuthError::Failed`] reported as
    /// `operation`. Client errors pass through unchanged.
    fn failed_as(self, operation: &'static str) -> AuthResult<T>;
}

impl<T> AuthResultExt<T> for AuthResult<T> {
    fn failed_as(self, operation: &'static str) -> AuthResult<T> {
        self.map_err(|err| match err {
            AuthError::Failed { .. } => err,
            err if err.kind().is_server_error() => AuthError::Failed {
                operation,
                source: Box::new(err),
            },
            err => err,
        })
    }
}
