//! Catalog Router

use auth::domain::repository::SessionStore;
use auth::presentation::middleware::{AuthGuard, require_admin};
use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::domain::repository::CatalogRepository;
use crate::presentation::handlers::{self, CatalogAppState};

/// Create the catalog router, to be nested under `/api`
///
/// Reads are public. Mutations and `/users` sit behind [`require_admin`].
pub fn catalog_router<R, S>(state: CatalogAppState<R>, guard: AuthGuard<S>) -> Router
where
    R: CatalogRepository,
    S: SessionStore + Send + Sync + 'static,
{
    let public = Router::new()
        .route("/books", get(handlers::list_books::<R>))
        .route("/books/{id}", get(handlers::get_book::<R>))
        .route("/authors", get(handlers::list_authors::<R>))
        .route("/publishers", get(handlers::list_publishers::<R>))
        .route("/genres", get(handlers::list_genres::<R>))
        .route("/book-genres", get(handlers::list_book_genres::<R>))
        .route("/reviews", get(handlers::list_reviews::<R>));

    let admin = Router::new()
        .route("/books", post(handlers::create_book::<R>))
        .route(
            "/books/{id}",
            put(handlers::update_book::<R>).delete(handlers::delete_book::<R>),
        )
        .route("/authors", post(handlers::create_author::<R>))
        .route(
            "/authors/{id}",
            put(handlers::update_author::<R>).delete(handlers::delete_author::<R>),
        )
        .route(
            "/publishers",
            post(handlers::create_publisher::<R>),
        )
        .route(
            "/publishers/{id}",
            put(handlers::update_publisher::<R>).delete(handlers::delete_publisher::<R>),
        )
        .route("/users", get(handlers::list_users::<R>))
        .route_layer(middleware::from_fn_with_state(guard, require_admin::<S>));

    public.merge(admin).with_state(state)
}
