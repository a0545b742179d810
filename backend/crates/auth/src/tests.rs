//! Router-level tests for the auth crate
//!
//! Runs the real router over an in-memory user repository and
//! [`MemorySessionStore`].

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::routing::get;
use chrono::Utc;
use kernel::id::UserId;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use crate::application::session_token;
use crate::domain::entity::{
    auth_session::AuthSession,
    profile_patch::{ProfileChange, ProfileField},
    user::{NewUser, User, UserCredentials},
};
use crate::domain::repository::{SessionStore, UserRepository};
use crate::domain::value_object::{
    email::Email, user_name::UserName, user_password::UserPassword, user_role::UserRole,
};
use crate::presentation::handlers::AuthAppState;
use crate::presentation::middleware::require_admin;
use crate::{AuthConfig, AuthError, AuthResult, MemorySessionStore, auth_router};

// ============================================================================
// In-memory user repository
// ============================================================================

struct StoredUser {
    user: User,
    password_hash: String,
}

#[derive(Default)]
struct InMemoryUsers {
    rows: Mutex<Vec<StoredUser>>,
}

impl InMemoryUsers {
    fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

impl UserRepository for InMemoryUsers {
    async fn create(&self, user: &NewUser) -> AuthResult<UserId> {
        let mut rows = self.rows.lock().unwrap();
        let user_id = UserId::from_raw(rows.len() as i64 + 1);
        rows.push(StoredUser {
            user: User {
                user_id,
                user_name: user.user_name.clone(),
                email: user.email.clone(),
                user_role: user.user_role,
                contact: user.contact.clone(),
                created_at: user.created_at,
                last_login_at: None,
            },
            password_hash: user.password_hash.as_phc_string().to_string(),
        });
        Ok(user_id)
    }

    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|r| r.user.user_id == user_id)
            .map(|r| r.user.clone()))
    }

    async fn find_credentials_by_email(&self, email: &str) -> AuthResult<Option<UserCredentials>> {
        let rows = self.rows.lock().unwrap();
        match rows.iter().find(|r| r.user.email.as_str() == email) {
            Some(row) => Ok(Some(UserCredentials {
                user: row.user.clone(),
                password_hash: UserPassword::from_db(row.password_hash.clone())?,
            })),
            None => Ok(None),
        }
    }

    async fn exists_by_email_or_user_name(
        &self,
        email: Option<&str>,
        user_name: Option<&str>,
        exclude: Option<UserId>,
    ) -> AuthResult<bool> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().any(|r| {
            Some(r.user.user_id) != exclude
                && (email == Some(r.user.email.as_str())
                    || user_name == Some(r.user.user_name.as_str()))
        }))
    }

    async fn apply_profile_changes(
        &self,
        user_id: UserId,
        changes: &[ProfileChange],
    ) -> AuthResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|r| r.user.user_id == user_id) else {
            return Err(AuthError::UserNotFound);
        };

        for change in changes {
            let value = change.value.clone();
            match change.field {
                ProfileField::UserName => {
                    row.user.user_name = UserName::from_db(value.unwrap_or_default())
                }
                ProfileField::Email => row.user.email = Email::from_db(value.unwrap_or_default()),
                ProfileField::FirstName => row.user.contact.first_name = value,
                ProfileField::LastName => row.user.contact.last_name = value,
                ProfileField::Phone => row.user.contact.phone = value,
                ProfileField::Address => row.user.contact.address = value,
            }
        }
        Ok(())
    }

    async fn record_login(&self, user_id: UserId) -> AuthResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|r| r.user.user_id == user_id) {
            row.user.last_login_at = Some(Utc::now());
        }
        Ok(())
    }
}

/// Session store whose `destroy` always fails
#[derive(Default)]
struct BrokenDestroy {
    inner: MemorySessionStore,
}

impl SessionStore for BrokenDestroy {
    async fn create(&self, session: &AuthSession) -> AuthResult<()> {
        self.inner.create(session).await
    }

    async fn get(&self, session_id: Uuid) -> AuthResult<Option<AuthSession>> {
        self.inner.get(session_id).await
    }

    async fn destroy(&self, _session_id: Uuid) -> AuthResult<bool> {
        Err(AuthError::Internal("session store offline".to_string()))
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        self.inner.cleanup_expired().await
    }
}

// ============================================================================
// Harness
// ============================================================================

struct Harness {
    app: Router,
    users: Arc<InMemoryUsers>,
    sessions: Arc<MemorySessionStore>,
    config: Arc<AuthConfig>,
}

fn harness() -> Harness {
    let users = Arc::new(InMemoryUsers::default());
    let sessions = Arc::new(MemorySessionStore::new());
    let config = Arc::new(AuthConfig::development());
    let state = AuthAppState::new(users.clone(), sessions.clone(), config.clone());

    Harness {
        app: auth_router(state),
        users,
        sessions,
        config,
    }
}

struct TestResponse {
    status: StatusCode,
    set_cookie: Option<String>,
    body: Value,
}

impl TestResponse {
    /// `name=value` part of the Set-Cookie header
    fn cookie_pair(&self) -> String {
        self.set_cookie
            .as_deref()
            .and_then(|c| c.split(';').next())
            .expect("Set-Cookie header")
            .to_string()
    }
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse {
        status,
        set_cookie,
        body,
    }
}

async fn register_alice(app: &Router) -> TestResponse {
    send(
        app,
        "POST",
        "/register",
        None,
        Some(json!({
            "username": "alice",
            "email": "a@x.io",
            "password": "pw1",
            "firstName": "Alice"
        })),
    )
    .await
}

async fn login(app: &Router, email: &str, password: &str) -> TestResponse {
    send(
        app,
        "POST",
        "/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_register_creates_user() {
    let h = harness();

    let res = register_alice(&h.app).await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["message"], "User created successfully");
    assert_eq!(res.body["userId"], 1);

    let stored = h.users.find_by_id(UserId::from_raw(1)).await.unwrap().unwrap();
    assert_eq!(stored.user_role, UserRole::User);
    assert_eq!(stored.contact.first_name.as_deref(), Some("Alice"));
    assert_eq!(stored.contact.last_name, None);
}

#[tokio::test]
async fn test_register_duplicate_is_conflict() {
    let h = harness();
    register_alice(&h.app).await;

    let res = send(
        &h.app,
        "POST",
        "/register",
        None,
        Some(json!({ "username": "alice2", "email": "a@x.io", "password": "pw" })),
    )
    .await;

    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.body["error"], "User already exists");
    assert_eq!(h.users.count(), 1);
}

#[tokio::test]
async fn test_register_duplicate_username_is_conflict() {
    let h = harness();
    register_alice(&h.app).await;

    let res = send(
        &h.app,
        "POST",
        "/register",
        None,
        Some(json!({ "username": "alice", "email": "other@x.io", "password": "pw" })),
    )
    .await;

    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.body["error"], "User already exists");
    assert_eq!(h.users.count(), 1);
}

#[tokio::test]
async fn test_register_missing_fields() {
    let h = harness();

    let res = send(
        &h.app,
        "POST",
        "/register",
        None,
        Some(json!({ "username": "bob", "email": "b@x.io", "password": "" })),
    )
    .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "Username, email and password are required");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let h = harness();

    let request = Request::builder()
        .method("POST")
        .uri("/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = h.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let h = harness();
    register_alice(&h.app).await;

    let wrong_password = login(&h.app, "a@x.io", "nope").await;
    let unknown_email = login(&h.app, "ghost@x.io", "pw1").await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_email.body);
    assert_eq!(wrong_password.body["error"], "Invalid credentials");
    assert!(h.sessions.is_empty());
}

#[tokio::test]
async fn test_login_missing_fields() {
    let h = harness();

    let res = send(&h.app, "POST", "/login", None, Some(json!({ "email": "a@x.io" }))).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "Email and password are required");
}

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let h = harness();
    register_alice(&h.app).await;

    let res = login(&h.app, "a@x.io", "pw1").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["userId"], 1);
    assert_eq!(res.body["username"], "alice");
    assert_eq!(res.body["role"], "USER");
    assert_eq!(res.body["firstName"], "Alice");
    assert!(res.body.get("passwordHash").is_none());

    let set_cookie = res.set_cookie.clone().unwrap();
    assert!(set_cookie.starts_with("library_session="));
    assert!(set_cookie.contains("HttpOnly"));
    assert_eq!(h.sessions.len(), 1);

    let stored = h.users.find_by_id(UserId::from_raw(1)).await.unwrap().unwrap();
    assert!(stored.last_login_at.is_some());
}

#[tokio::test]
async fn test_relogin_discards_previous_session() {
    let h = harness();
    register_alice(&h.app).await;

    let first = login(&h.app, "a@x.io", "pw1").await;
    let first_cookie = first.cookie_pair();

    let second = send(
        &h.app,
        "POST",
        "/login",
        Some(&first_cookie),
        Some(json!({ "email": "a@x.io", "password": "pw1" })),
    )
    .await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(h.sessions.len(), 1);

    let stale = send(&h.app, "GET", "/me", Some(&first_cookie), None).await;
    assert_eq!(stale.status, StatusCode::UNAUTHORIZED);

    let fresh = send(&h.app, "GET", "/me", Some(&second.cookie_pair()), None).await;
    assert_eq!(fresh.status, StatusCode::OK);
}

// ============================================================================
// Session guard
// ============================================================================

#[tokio::test]
async fn test_me_requires_session() {
    let h = harness();

    let res = send(&h.app, "GET", "/me", None, None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["error"], "Authentication required");

    let forged = send(&h.app, "GET", "/me", Some("library_session=garbage.token"), None).await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_returns_profile_without_hash() {
    let h = harness();
    register_alice(&h.app).await;
    let cookie = login(&h.app, "a@x.io", "pw1").await.cookie_pair();

    let res = send(&h.app, "GET", "/me", Some(&cookie), None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["user_id"], 1);
    assert_eq!(res.body["email"], "a@x.io");
    assert_eq!(res.body["first_name"], "Alice");
    assert!(res.body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_expired_session_is_rejected_and_removed() {
    let h = harness();
    let session = AuthSession::new(UserId::from_raw(1), UserRole::User, Duration::ZERO);
    h.sessions.create(&session).await.unwrap();
    let token = session_token::sign(session.session_id, &h.config.session_secret);

    let res = send(
        &h.app,
        "GET",
        "/me",
        Some(&format!("library_session={token}")),
        None,
    )
    .await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert!(h.sessions.is_empty());
}

// ============================================================================
// Profile
// ============================================================================

#[tokio::test]
async fn test_profile_update_is_sparse() {
    let h = harness();
    register_alice(&h.app).await;
    let cookie = login(&h.app, "a@x.io", "pw1").await.cookie_pair();

    let res = send(
        &h.app,
        "PUT",
        "/profile",
        Some(&cookie),
        Some(json!({ "lastName": "Smith" })),
    )
    .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["last_name"], "Smith");
    assert_eq!(res.body["first_name"], "Alice");
    assert_eq!(res.body["username"], "alice");
    assert_eq!(res.body["email"], "a@x.io");
}

#[tokio::test]
async fn test_profile_update_clears_with_empty_string() {
    let h = harness();
    register_alice(&h.app).await;
    let cookie = login(&h.app, "a@x.io", "pw1").await.cookie_pair();

    send(
        &h.app,
        "PUT",
        "/profile",
        Some(&cookie),
        Some(json!({ "phone": "555-0100" })),
    )
    .await;
    let res = send(
        &h.app,
        "PUT",
        "/profile",
        Some(&cookie),
        Some(json!({ "phone": "", "firstName": null })),
    )
    .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["phone"], "");
    assert_eq!(res.body["first_name"], Value::Null);
}

#[tokio::test]
async fn test_profile_update_without_fields() {
    let h = harness();
    register_alice(&h.app).await;
    let cookie = login(&h.app, "a@x.io", "pw1").await.cookie_pair();

    let res = send(&h.app, "PUT", "/profile", Some(&cookie), Some(json!({}))).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "No fields to update");

    // A blank username is ignored, not applied
    let res = send(
        &h.app,
        "PUT",
        "/profile",
        Some(&cookie),
        Some(json!({ "username": "" })),
    )
    .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_profile_update_taken_identity() {
    let h = harness();
    register_alice(&h.app).await;
    send(
        &h.app,
        "POST",
        "/register",
        None,
        Some(json!({ "username": "bob", "email": "b@x.io", "password": "pw2" })),
    )
    .await;
    let cookie = login(&h.app, "a@x.io", "pw1").await.cookie_pair();

    let res = send(
        &h.app,
        "PUT",
        "/profile",
        Some(&cookie),
        Some(json!({ "email": "b@x.io" })),
    )
    .await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.body["error"], "Email or username already taken");

    // Re-submitting one's own email is not a conflict
    let res = send(
        &h.app,
        "PUT",
        "/profile",
        Some(&cookie),
        Some(json!({ "email": "a@x.io" })),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
}

// ============================================================================
// Logout
// ============================================================================

#[tokio::test]
async fn test_logout_ends_session() {
    let h = harness();
    register_alice(&h.app).await;
    let cookie = login(&h.app, "a@x.io", "pw1").await.cookie_pair();

    let res = send(&h.app, "POST", "/logout", Some(&cookie), None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Logged out successfully");
    assert!(res.set_cookie.unwrap().contains("Max-Age=0"));
    assert!(h.sessions.is_empty());

    let res = send(&h.app, "GET", "/me", Some(&cookie), None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_store_failure_is_reported() {
    let users = Arc::new(InMemoryUsers::default());
    let sessions = Arc::new(BrokenDestroy::default());
    let config = Arc::new(AuthConfig::development());
    let app = auth_router(AuthAppState::new(users, sessions.clone(), config));

    register_alice(&app).await;
    let cookie = login(&app, "a@x.io", "pw1").await.cookie_pair();

    let res = send(&app, "POST", "/logout", Some(&cookie), None).await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body, json!({ "error": "Logout failed" }));
    assert!(res.set_cookie.is_none());
    assert_eq!(sessions.inner.len(), 1);
}

// ============================================================================
// Admin guard
// ============================================================================

fn admin_app(h: &Harness) -> Router {
    let state = AuthAppState::new(h.users.clone(), h.sessions.clone(), h.config.clone());
    Router::new()
        .route("/admin", get(|| async { "ok" }))
        .route_layer(axum::middleware::from_fn_with_state(
            state.guard(),
            require_admin::<MemorySessionStore>,
        ))
}

async fn session_cookie(h: &Harness, role: UserRole) -> String {
    let session = AuthSession::new(UserId::from_raw(1), role, Duration::from_secs(60));
    h.sessions.create(&session).await.unwrap();
    let token = session_token::sign(session.session_id, &h.config.session_secret);
    format!("library_session={token}")
}

#[tokio::test]
async fn test_require_admin() {
    let h = harness();
    let app = admin_app(&h);

    let anonymous = send(&app, "GET", "/admin", None, None).await;
    assert_eq!(anonymous.status, StatusCode::FORBIDDEN);
    assert_eq!(anonymous.body["error"], "Admin privileges required");

    let user_cookie = session_cookie(&h, UserRole::User).await;
    let user = send(&app, "GET", "/admin", Some(&user_cookie), None).await;
    assert_eq!(user.status, StatusCode::FORBIDDEN);

    let admin_cookie = session_cookie(&h, UserRole::Admin).await;
    let request = Request::builder()
        .uri("/admin")
        .header(header::COOKIE, admin_cookie)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
