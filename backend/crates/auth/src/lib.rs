//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases, configuration, session tokens
//! - `infra/` - PostgreSQL and in-memory implementations
//! - `presentation/` - HTTP handlers, DTOs, middleware, router
//!
//! ## Features
//! - Registration and login by email + password
//! - Server-side sessions referenced by an HMAC-signed cookie
//! - Two authorization tiers: authenticated, ADMIN
//! - Sparse self-service profile update
//!
//! ## Security Model
//! - Passwords hashed with Argon2id on the blocking pool
//! - Unknown email and wrong password are indistinguishable
//! - Role is snapshotted into the session at login
//! - A pre-existing session is discarded on login

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::repository::{SessionStore, UserRepository};
pub use error::{AuthError, AuthResult, AuthResultExt};
pub use infra::{memory::MemorySessionStore, postgres::PgAuthRepository};
pub use presentation::{
    AuthAppState, AuthGuard, CurrentSession, auth_router, require_admin, require_auth,
};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
