//! Auth Session Entity
//!
//! Server-side session record. The cookie only carries a signed reference
//! to `session_id`.

use chrono::Utc;
use kernel::id::UserId;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::value_object::user_role::UserRole;

/// Auth session entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// Session ID (UUID v4)
    pub session_id: Uuid,
    pub user_id: UserId,
    /// Role at login time. Not re-read per request.
    pub user_role: UserRole,
    /// Created timestamp (Unix ms)
    pub created_at_ms: i64,
    /// Expiration (Unix ms)
    pub expires_at_ms: i64,
}

impl AuthSession {
    /// Create a new auth session expiring `ttl` from now
    pub fn new(user_id: UserId, user_role: UserRole, ttl: Duration) -> Self {
        let now_ms = Utc::now().timestamp_millis();
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);

        Self {
            session_id: Uuid::new_v4(),
            user_id,
            user_role,
            created_at_ms: now_ms,
            expires_at_ms: now_ms.saturating_add(ttl_ms),
        }
    }

    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms >= self.expires_at_ms
    }

    /// Check if session has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp_millis())
    }
}
