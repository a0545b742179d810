//! User Name Value Object
//!
//! ユーザー名はログイン以外の場面でユーザーを識別する公開ハンドル。
//!
//! ## 不変条件
//! - 前後の空白は除去される
//! - 空文字は不可
//! - 長さ: 1〜50文字（`users.username` の列幅）
//! - 制御文字は不可

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AuthError, AuthResult};

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 50;

/// User name value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    pub fn new(raw: &str) -> AuthResult<Self> {
        let name = raw.trim();

        if name.is_empty() {
            return Err(AuthError::Validation("Username cannot be empty".into()));
        }

        if name.chars().count() > USER_NAME_MAX_LENGTH {
            return Err(AuthError::Validation(format!(
                "Username must be at most {USER_NAME_MAX_LENGTH} characters"
            )));
        }

        if name.chars().any(char::is_control) {
            return Err(AuthError::Validation(
                "Username contains invalid characters".into(),
            ));
        }

        Ok(Self(name.to_string()))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
