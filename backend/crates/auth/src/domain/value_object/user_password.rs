//! User Password Value Object
//!
//! Delegates to `platform::password` for the cryptographic work and moves
//! it onto tokio's blocking pool so request tasks never run Argon2 inline.

use platform::password::{ClearTextPassword, HashedPassword, PasswordPolicyError};
use std::fmt;

use crate::error::{AuthError, AuthResult};

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input. Zeroized when dropped.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Any non-empty password is accepted
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        ClearTextPassword::new(raw).map(Self)
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawPassword([REDACTED])")
    }
}

// ============================================================================
// User Password (Hashed)
// ============================================================================

/// Argon2id PHC string at the default cost with an all-zero digest.
/// Unknown-email logins verify against it so they cost the same as real ones.
const DECOY_PHC: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Stored password hash (PHC string)
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash a raw password on the blocking pool
    pub async fn hash(raw: RawPassword, pepper: Option<Vec<u8>>) -> AuthResult<Self> {
        let hashed = tokio::task::spawn_blocking(move || raw.0.hash(pepper.as_deref()))
            .await
            .map_err(|e| AuthError::Internal(format!("Password hashing task failed: {e}")))??;

        Ok(Self(hashed))
    }

    /// Verify a raw password on the blocking pool
    pub async fn verify(&self, raw: RawPassword, pepper: Option<Vec<u8>>) -> AuthResult<bool> {
        let hashed = self.0.clone();

        tokio::task::spawn_blocking(move || hashed.verify(&raw.0, pepper.as_deref()))
            .await
            .map_err(|e| AuthError::Internal(format!("Password verification task failed: {e}")))
    }

    /// Restore from the stored PHC string
    pub fn from_db(phc: impl Into<String>) -> AuthResult<Self> {
        Ok(Self(HashedPassword::from_phc_string(phc)?))
    }

    /// Hash that never verifies, for requests with no matching user
    pub fn decoy() -> AuthResult<Self> {
        Self::from_db(DECOY_PHC)
    }

    /// PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UserPassword([HASH])")
    }
}
