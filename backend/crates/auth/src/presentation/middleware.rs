//! Auth Middleware
//!
//! Session guards for protected routes:
//! - [`require_auth`]: 401 unless a live session is attached
//! - [`require_admin`]: 403 unless a live ADMIN session is attached
//!
//! Both publish [`CurrentSession`] into request extensions. Mount them with
//! `axum::middleware::from_fn_with_state(guard, require_auth::<S>)`.

use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use kernel::id::UserId;
use uuid::Uuid;

use crate::application::CheckSessionUseCase;
use crate::application::config::AuthConfig;
use crate::domain::repository::SessionStore;
use crate::domain::value_object::user_role::UserRole;
use crate::error::{AuthError, AuthResult, AuthResultExt};

/// Middleware state
pub struct AuthGuard<S> {
    pub sessions: Arc<S>,
    pub config: Arc<AuthConfig>,
}

impl<S> AuthGuard<S> {
    pub fn new(sessions: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self { sessions, config }
    }
}

impl<S> Clone for AuthGuard<S> {
    fn clone(&self) -> Self {
        Self {
            sessions: self.sessions.clone(),
            config: self.config.clone(),
        }
    }
}

/// Session attached to an authenticated request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentSession {
    pub session_id: Uuid,
    pub user_id: UserId,
    pub user_role: UserRole,
}

impl<St> FromRequestParts<St> for CurrentSession
where
    St: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &St) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentSession>()
            .copied()
            .ok_or(AuthError::Unauthenticated)
    }
}

/// Session already attached by an outer guard, else the session cookie
fn session_source(req: &Request, cookie_name: &str) -> (Option<CurrentSession>, Option<String>) {
    let attached = req.extensions().get::<CurrentSession>().copied();
    let token = match attached {
        Some(_) => None,
        None => platform::cookie::extract_cookie(req.headers(), cookie_name),
    };
    (attached, token)
}

/// Resolve the request's session
///
/// Takes owned parts so the future does not borrow the request body.
async fn resolve_session<S>(
    guard: &AuthGuard<S>,
    attached: Option<CurrentSession>,
    token: Option<String>,
) -> AuthResult<Option<CurrentSession>>
where
    S: SessionStore + Send + Sync + 'static,
{
    if attached.is_some() {
        return Ok(attached);
    }

    let Some(token) = token else {
        return Ok(None);
    };

    let session = CheckSessionUseCase::new(guard.sessions.clone(), guard.config.clone())
        .execute(&token)
        .await
        .failed_as("Failed to check session")?;

    Ok(session.map(|s| CurrentSession {
        session_id: s.session_id,
        user_id: s.user_id,
        user_role: s.user_role,
    }))
}

/// Middleware that requires a valid auth session
pub async fn require_auth<S>(
    State(guard): State<AuthGuard<S>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    S: SessionStore + Send + Sync + 'static,
{
    let (attached, token) = session_source(&req, &guard.config.session_cookie_name);
    let current = resolve_session(&guard, attached, token)
        .await?
        .ok_or(AuthError::Unauthenticated)?;

    req.extensions_mut().insert(current);
    Ok(next.run(req).await)
}

/// Middleware that requires a valid ADMIN session
///
/// Re-checks the session itself, so it does not depend on
/// [`require_auth`] running first.
pub async fn require_admin<S>(
    State(guard): State<AuthGuard<S>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    S: SessionStore + Send + Sync + 'static,
{
    let (attached, token) = session_source(&req, &guard.config.session_cookie_name);
    let current = resolve_session(&guard, attached, token)
        .await?
        .filter(|s| s.user_role.is_admin())
        .ok_or(AuthError::AdminRequired)?;

    req.extensions_mut().insert(current);
    Ok(next.run(req).await)
}
