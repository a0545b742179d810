//! Catalog Backend Module
//!
//! Resource routers over the library schema: books, authors, publishers,
//! genres, book-genre links, reviews and the admin user listing.
//!
//! - `domain/` - Records, write drafts, repository traits
//! - `infra/` - PostgreSQL implementation
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! Reads are public; every mutation requires an ADMIN session through
//! `auth::presentation::middleware::require_admin`.

pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

pub use domain::repository::CatalogRepository;
pub use error::{CatalogError, CatalogResult};
pub use infra::postgres::PgCatalogRepository;
pub use presentation::{CatalogAppState, catalog_router};
