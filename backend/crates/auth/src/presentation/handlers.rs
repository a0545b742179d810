//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use kernel::extract::ApiJson;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    GetProfileUseCase, SignInUseCase, SignOutUseCase, SignUpUseCase, UpdateProfileUseCase,
};
use crate::domain::repository::{SessionStore, UserRepository};
use crate::error::{AuthResult, AuthResultExt};
use crate::presentation::dto::{
    LoginRequest, LoginResponse, MessageResponse, ProfileResponse, ProfileUpdateRequest,
    RegisterRequest, RegisterResponse,
};
use crate::presentation::middleware::{AuthGuard, CurrentSession};

/// Shared state for auth handlers
pub struct AuthAppState<U, S> {
    pub users: Arc<U>,
    pub sessions: Arc<S>,
    pub config: Arc<AuthConfig>,
}

impl<U, S> AuthAppState<U, S> {
    pub fn new(users: Arc<U>, sessions: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            users,
            sessions,
            config,
        }
    }

    /// Guard state for session middleware
    pub fn guard(&self) -> AuthGuard<S> {
        AuthGuard::new(self.sessions.clone(), self.config.clone())
    }
}

impl<U, S> Clone for AuthAppState<U, S> {
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            sessions: self.sessions.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<U, S>(
    State(state): State<AuthAppState<U, S>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> AuthResult<impl IntoResponse>
where
    U: UserRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.users.clone(), state.config.clone());

    let output = use_case
        .execute(req.into())
        .await
        .failed_as("Failed to create user")?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully",
            user_id: output.user_id,
        }),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<U, S>(
    State(state): State<AuthAppState<U, S>>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<LoginRequest>,
) -> AuthResult<impl IntoResponse>
where
    U: UserRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let previous_token =
        platform::cookie::extract_cookie(&headers, &state.config.session_cookie_name);

    let use_case = SignInUseCase::new(
        state.users.clone(),
        state.sessions.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(req.into_input(previous_token))
        .await
        .failed_as("Login failed")?;

    let cookie = state
        .config
        .session_cookie()
        .build_set_cookie(&output.session_token);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse::from(output.user)),
    ))
}

// ============================================================================
// Current user
// ============================================================================

/// GET /api/auth/me
pub async fn me<U, S>(
    State(state): State<AuthAppState<U, S>>,
    current: CurrentSession,
) -> AuthResult<Json<ProfileResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let user = GetProfileUseCase::new(state.users.clone())
        .execute(current.user_id)
        .await
        .failed_as("Failed to get user")?;

    Ok(Json(user.into()))
}

/// PUT /api/auth/profile
pub async fn update_profile<U, S>(
    State(state): State<AuthAppState<U, S>>,
    current: CurrentSession,
    ApiJson(req): ApiJson<ProfileUpdateRequest>,
) -> AuthResult<Json<ProfileResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let user = UpdateProfileUseCase::new(state.users.clone())
        .execute(current.user_id, req.into())
        .await
        .failed_as("Failed to update profile")?;

    Ok(Json(user.into()))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /api/auth/logout
pub async fn logout<U, S>(
    State(state): State<AuthAppState<U, S>>,
    current: CurrentSession,
) -> AuthResult<impl IntoResponse>
where
    U: UserRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    SignOutUseCase::new(state.sessions.clone())
        .execute(current.session_id)
        .await
        .failed_as("Logout failed")?;

    let cookie = state.config.session_cookie().build_delete_cookie();

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse {
            message: "Logged out successfully",
        }),
    ))
}
