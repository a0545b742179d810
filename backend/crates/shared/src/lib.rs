//! Shared Kernel - Domain-crossing minimal core
//!
//! Vocabulary shared by the auth gate and the catalog:
//! - Common error types and result aliases
//! - Typed numeric identifiers for catalog and user records
//! - Request extractors whose rejections speak the common error format
//!
//! Only things with one meaning across every crate belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
#[cfg(feature = "axum")]
pub mod extract;
pub mod id;
