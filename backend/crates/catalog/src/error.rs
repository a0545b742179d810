//! Catalog Error Types
//!
//! Integrates with the unified `kernel::error::AppError` system the same
//! way the auth crate does.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, conversions::classify_sqlx_error, kind::ErrorKind};
use thiserror::Error;

/// Catalog-specific result type alias
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog-specific error variants
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Field present but unusable
    #[error("{0}")]
    Validation(String),

    /// Update or delete matched no row
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Server-side failure reported under the operation that hit it
    #[error("{operation}")]
    Failed {
        operation: &'static str,
        #[source]
        source: Box<CatalogError>,
    },
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Validation(_) => ErrorKind::BadRequest,
            CatalogError::NotFound(_) => ErrorKind::NotFound,
            CatalogError::Database(e) => classify_sqlx_error(e).0,
            CatalogError::Failed { source, .. } => source.kind(),
        }
    }

    /// Message safe to show to the client
    fn client_message(&self) -> String {
        match self {
            // Constraint violations and bad values keep a generic description
            CatalogError::Database(e) => classify_sqlx_error(e).1.to_string(),
            _ => self.to_string(),
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.client_message())
    }

    fn log(&self) {
        match self {
            CatalogError::Failed { operation, source } => {
                tracing::error!(operation = %operation, error = %source, "Catalog operation failed");
            }
            CatalogError::Database(e) if self.kind().is_server_error() => {
                tracing::error!(error = %e, "Catalog database error");
            }
            _ => {
                tracing::debug!(error = %self, "Catalog request rejected");
            }
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

/// Attach the failing operation to server-side errors
pub trait CatalogResultExt<T> {
    fn failed_as(self, operation: &'static str) -> CatalogResult<T>;
}

impl<T> CatalogResultExt<T> for CatalogResult<T> {
    fn failed_as(self, operation: &'static str) -> CatalogResult<T> {
        self.map_err(|err| match err {
            CatalogError::Failed { .. } => err,
            err if err.kind().is_server_error() => CatalogError::Failed {
                operation,
                source: Box::new(err),
            },
            err => err,
        })
    }
}
