//! Expired session cleanup

use std::sync::Arc;
use std::time::Duration;

use auth::SessionStore;

/// Purge once, logging instead of failing
pub async fn purge_expired<S>(sessions: &S)
where
    S: SessionStore + Send + Sync,
{
    match sessions.cleanup_expired().await {
        Ok(deleted) => {
            tracing::info!(sessions_deleted = deleted, "Auth session cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Auth session cleanup failed, continuing anyway");
        }
    }
}

/// Background loop. The first tick fires immediately, which doubles as the
/// startup cleanup.
pub async fn run_cleanup_loop<S>(sessions: Arc<S>, interval: Duration)
where
    S: SessionStore + Send + Sync,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        purge_expired(sessions.as_ref()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth::MemorySessionStore;
    use auth::domain::AuthSession;
    use auth::domain::value_object::user_role::UserRole;
    use kernel::id::UserId;

    #[tokio::test]
    async fn test_purge_expired_keeps_live_sessions() {
        let store = MemorySessionStore::new();
        let live = AuthSession::new(UserId::from_raw(1), UserRole::User, Duration::from_secs(60));
        let dead = AuthSession::new(UserId::from_raw(2), UserRole::User, Duration::ZERO);
        store.create(&live).await.unwrap();
        store.create(&dead).await.unwrap();

        purge_expired(&store).await;

        assert_eq!(store.len(), 1);
        assert!(store.get(live.session_id).await.unwrap().is_some());
    }
}
