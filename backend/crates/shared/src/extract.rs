//! Request extractors
//!
//! axum の標準抽出器をラップし、拒否時に [`AppError`] を返すようにします。
//! これにより JSON の構文エラーやパスパラメータの型不一致も
//! `{"error": message}` 形式の 400 になります。

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::app_error::AppError;

/// JSON ボディ抽出器
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// パスパラメータ抽出器
#[derive(Debug, Clone, Copy, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

impl<T> axum::response::IntoResponse for ApiJson<T>
where
    axum::Json<T>: axum::response::IntoResponse,
{
    fn into_response(self) -> axum::response::Response {
        axum::Json(self.0).into_response()
    }
}
