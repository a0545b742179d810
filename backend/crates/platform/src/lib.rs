//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random bytes, Base64url, HMAC-SHA256)
//! - Password hashing (Argon2id with optional pepper)
//! - Cookie parsing and Set-Cookie construction

pub mod cookie;
pub mod crypto;
pub mod password;
