//! 请求体与路径参数提取器
//!
//! 包装 axum 的 `Json` / `Path`，解析失败时返回统一的 [`AppError`]
//! JSON 响应 (400) 而不是 axum 默认的纯文本拒绝。

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::utils::AppError;

/// JSON 请求体
#[derive(Debug)]
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

/// 路径参数
#[derive(Debug)]
pub struct AppPath<T>(pub T);

impl<S, T> FromRequestParts<S> for AppPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(path_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    let kind = match &rejection {
        JsonRejection::JsonDataError(_) => "invalid_field",
        JsonRejection::JsonSyntaxError(_) => "malformed_json",
        JsonRejection::MissingJsonContentType(_) => "missing_content_type",
        _ => "unreadable_body",
    };
    tracing::debug!(kind, error = %rejection.body_text(), "Rejected request body");
    AppError::validation(rejection.body_text()).with_detail("reason", kind)
}

fn path_rejection(rejection: PathRejection) -> AppError {
    tracing::debug!(error = %rejection.body_text(), "Rejected path parameter");
    AppError::validation(rejection.body_text()).with_detail("reason", "invalid_path")
}
