//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::error::conversions::is_unique_violation;
use kernel::id::UserId;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::entity::{
    auth_session::AuthSession,
    profile_patch::ProfileChange,
    user::{ContactDetails, NewUser, User, UserCredentials},
};
use crate::domain::repository::{SessionStore, UserRepository};
use crate::domain::value_object::{
    email::Email, user_name::UserName, user_password::UserPassword, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &NewUser) -> AuthResult<UserId> {
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (
                username,
                email,
                password_hash,
                role,
                first_name,
                last_name,
                phone,
                address,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING user_id
            "#,
        )
        .bind(user.user_name.as_str())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(user.user_role.code())
        .bind(user.contact.first_name.as_deref())
        .bind(user.contact.last_name.as_deref())
        .bind(user.contact.phone.as_deref())
        .bind(user.contact.address.as_deref())
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(id) => Ok(UserId::from_raw(id)),
            Err(e) if is_unique_violation(&e) => Err(AuthError::UserExists),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                username,
                email,
                role,
                first_name,
                last_name,
                phone,
                address,
                created_at,
                last_login
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.get())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_credentials_by_email(&self, email: &str) -> AuthResult<Option<UserCredentials>> {
        let row = sqlx::query_as::<_, CredentialsRow>(
            r#"
            SELECT
                user_id,
                username,
                email,
                role,
                first_name,
                last_name,
                phone,
                address,
                created_at,
                last_login,
                password_hash
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CredentialsRow::into_credentials).transpose()
    }

    async fn exists_by_email_or_user_name(
        &self,
        email: Option<&str>,
        user_name: Option<&str>,
        exclude: Option<UserId>,
    ) -> AuthResult<bool> {
        // A NULL argument never matches, so absent identifiers are skipped
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE (email = $1 OR username = $2)
                  AND ($3::BIGINT IS NULL OR user_id <> $3)
            )
            "#,
        )
        .bind(email)
        .bind(user_name)
        .bind(exclude.map(|id| id.get()))
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn apply_profile_changes(
        &self,
        user_id: UserId,
        changes: &[ProfileChange],
    ) -> AuthResult<()> {
        if changes.is_empty() {
            return Err(AuthError::NoProfileChanges);
        }

        let mut builder = QueryBuilder::<Postgres>::new("UPDATE users SET ");
        let mut assignments = builder.separated(", ");
        for change in changes {
            // Column names come from a closed enum, values are always bound
            assignments.push(change.field.column());
            assignments.push_unseparated(" = ");
            assignments.push_bind_unseparated(change.value.clone());
        }
        builder.push(" WHERE user_id = ");
        builder.push_bind(user_id.get());

        let result = builder.build().execute(&self.pool).await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Err(AuthError::UserNotFound),
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(AuthError::IdentityTaken),
            Err(e) => Err(e.into()),
        }
    }

    async fn record_login(&self, user_id: UserId) -> AuthResult<()> {
        sqlx::query("UPDATE users SET last_login = NOW() WHERE user_id = $1")
            .bind(user_id.get())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Session Store Implementation
// ============================================================================

impl SessionStore for PgAuthRepository {
    async fn create(&self, session: &AuthSession) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO auth_sessions (
                session_id,
                user_id,
                user_role,
                created_at_ms,
                expires_at_ms
            ) VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(session.session_id)
        .bind(session.user_id.get())
        .bind(session.user_role.code())
        .bind(session.created_at_ms)
        .bind(session.expires_at_ms)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, session_id: Uuid) -> AuthResult<Option<AuthSession>> {
        let row = sqlx::query_as::<_, AuthSessionRow>(
            r#"
            SELECT
                session_id,
                user_id,
                user_role,
                created_at_ms,
                expires_at_ms
            FROM auth_sessions
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AuthSessionRow::into_session).transpose()
    }

    async fn destroy(&self, session_id: Uuid) -> AuthResult<bool> {
        let deleted = sqlx::query("DELETE FROM auth_sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = sqlx::query("DELETE FROM auth_sessions WHERE expires_at_ms <= $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired auth sessions");

        Ok(deleted)
    }
}

// ============================================================================
// Row types
// ============================================================================

fn parse_role(code: &str) -> AuthResult<UserRole> {
    UserRole::from_code(code).ok_or_else(|| AuthError::Internal(format!("Unknown role: {code}")))
}

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: i64,
    username: String,
    email: String,
    role: String,
    first_name: Option<String>,
    last_name: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    created_at: DateTime<Utc>,
    last_login: Option<DateTime<Utc>>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        Ok(User {
            user_id: UserId::from_raw(self.user_id),
            user_name: UserName::from_db(self.username),
            email: Email::from_db(self.email),
            user_role: parse_role(&self.role)?,
            contact: ContactDetails {
                first_name: self.first_name,
                last_name: self.last_name,
                phone: self.phone,
                address: self.address,
            },
            created_at: self.created_at,
            last_login_at: self.last_login,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CredentialsRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

impl CredentialsRow {
    fn into_credentials(self) -> AuthResult<UserCredentials> {
        Ok(UserCredentials {
            password_hash: UserPassword::from_db(self.password_hash)?,
            user: self.user.into_user()?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AuthSessionRow {
    session_id: Uuid,
    user_id: i64,
    user_role: String,
    created_at_ms: i64,
    expires_at_ms: i64,
}

impl AuthSessionRow {
    fn into_session(self) -> AuthResult<AuthSession> {
        Ok(AuthSession {
            session_id: self.session_id,
            user_id: UserId::from_raw(self.user_id),
            user_role: parse_role(&self.user_role)?,
            created_at_ms: self.created_at_ms,
            expires_at_ms: self.expires_at_ms,
        })
    }
}
