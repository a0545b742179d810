//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::domain::repository::{SessionStore, UserRepository};
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_auth;

/// Create the Auth router, to be nested under `/api/auth`
///
/// `/register` and `/login` are public; everything else sits behind
/// [`require_auth`].
pub fn auth_router<U, S>(state: AuthAppState<U, S>) -> Router
where
    U: UserRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let protected = Router::new()
        .route("/me", get(handlers::me::<U, S>))
        .route("/profile", put(handlers::update_profile::<U, S>))
        .route("/logout", post(handlers::logout::<U, S>))
        .route_layer(middleware::from_fn_with_state(
            state.guard(),
            require_auth::<S>,
        ));

    Router::new()
        .route("/register", post(handlers::register::<U, S>))
        .route("/login", post(handlers::login::<U, S>))
        .merge(protected)
        .with_state(state)
}
