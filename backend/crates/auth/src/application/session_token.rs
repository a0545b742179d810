//! Session Token
//!
//! Cookie value format: `<session uuid>.<base64url(HMAC-SHA256(secret, uuid))>`.
//! Anything that does not verify is treated as "no session".

use platform::crypto::{from_base64url, hmac_sha256, to_base64url, verify_hmac_sha256};
use uuid::Uuid;

/// Sign a session id into a cookie value
pub fn sign(session_id: Uuid, secret: &[u8]) -> String {
    let id = session_id.to_string();
    let signature = hmac_sha256(secret, id.as_bytes());
    format!("{}.{}", id, to_base64url(&signature))
}

/// Verify a cookie value and return the session id it references
pub fn verify(token: &str, secret: &[u8]) -> Option<Uuid> {
    let (id, signature_b64) = token.split_once('.')?;
    let signature = from_base64url(signature_b64).ok()?;

    if !verify_hmac_sha256(secret, id.as_bytes(), &signature) {
        return None;
    }

    id.parse().ok()
}
