//! Server Configuration
//!
//! Read once at startup from the environment (after `.env` is loaded).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use auth::AuthConfig;
use base64::Engine;
use base64::engine::general_purpose;
use thiserror::Error;

const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_SESSION_TTL_HOURS: u64 = 24;
const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },

    /// The secret itself is never echoed
    #[error("SESSION_SECRET must be base64 of exactly 32 bytes")]
    InvalidSessionSecret,
}

/// Where login sessions live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    /// Process memory; lost on restart
    Memory,
    /// `auth_sessions` table
    Postgres,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<String>,
    /// Built SPA to serve, if any
    pub frontend_dir: Option<PathBuf>,
    pub session_backend: SessionBackend,
    pub session_cleanup_interval: Duration,
    pub auth: AuthConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let max_connections = parse_or(
            "DATABASE_MAX_CONNECTIONS",
            get("DATABASE_MAX_CONNECTIONS"),
            DEFAULT_MAX_CONNECTIONS,
        )?;

        let bind_addr = parse_or(
            "BIND_ADDR",
            get("BIND_ADDR"),
            SocketAddr::from(([0, 0, 0, 0], 3000)),
        )?;

        let frontend_origins = get("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let frontend_dir = get("FRONTEND_DIR").map(PathBuf::from);

        let session_backend = match get("SESSION_STORE").as_deref() {
            None | Some("postgres") => SessionBackend::Postgres,
            Some("memory") => SessionBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "SESSION_STORE",
                    value: other.to_string(),
                });
            }
        };

        let cleanup_secs = parse_or(
            "SESSION_CLEANUP_INTERVAL_SECS",
            get("SESSION_CLEANUP_INTERVAL_SECS"),
            DEFAULT_CLEANUP_INTERVAL_SECS,
        )?;
        let session_cleanup_interval =
            Duration::from_secs(non_zero("SESSION_CLEANUP_INTERVAL_SECS", cleanup_secs)?);

        let auth = auth_config(&get)?;

        Ok(Self {
            database_url,
            max_connections,
            bind_addr,
            frontend_origins,
            frontend_dir,
            session_backend,
            session_cleanup_interval,
            auth,
        })
    }
}

fn auth_config<G>(get: &G) -> Result<AuthConfig, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    // Debug builds fall back to a random secret: sessions die with the process
    let base = match get("SESSION_SECRET") {
        Some(secret_b64) => AuthConfig {
            session_secret: decode_secret(&secret_b64)?,
            ..AuthConfig::default()
        },
        None if cfg!(debug_assertions) => AuthConfig::development(),
        None => return Err(ConfigError::Missing("SESSION_SECRET")),
    };

    let ttl_hours = non_zero(
        "SESSION_TTL_HOURS",
        parse_or(
            "SESSION_TTL_HOURS",
            get("SESSION_TTL_HOURS"),
            DEFAULT_SESSION_TTL_HOURS,
        )?,
    )?;
    let ttl_secs = ttl_hours
        .checked_mul(3600)
        .ok_or_else(|| ConfigError::Invalid {
            key: "SESSION_TTL_HOURS",
            value: ttl_hours.to_string(),
        })?;

    let cookie_secure = parse_or("COOKIE_SECURE", get("COOKIE_SECURE"), !cfg!(debug_assertions))?;

    Ok(AuthConfig {
        session_ttl: Duration::from_secs(ttl_secs),
        cookie_secure,
        password_pepper: get("PASSWORD_PEPPER").map(String::into_bytes),
        ..base
    })
}

fn decode_secret(secret_b64: &str) -> Result<[u8; 32], ConfigError> {
    let bytes = general_purpose::STANDARD
        .decode(secret_b64.trim())
        .map_err(|_| ConfigError::InvalidSessionSecret)?;

    bytes
        .try_into()
        .map_err(|_| ConfigError::InvalidSessionSecret)
}

fn non_zero(key: &'static str, value: u64) -> Result<u64, ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid {
            key,
            value: "0".to_string(),
        });
    }
    Ok(value)
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
