//! Entities

pub mod auth_session;
pub mod profile_patch;
pub mod user;
