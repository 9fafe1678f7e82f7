//! 认证中间件
//!
//! 为 JWT 认证提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::HeaderMap;

use crate::AppError;
use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;

/// 无需认证的 API 路由
const PUBLIC_API_ROUTES: &[&str] = &["/api/auth/login", "/api/auth/signup"];

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT。
/// 验证成功后将 [`CurrentUser`] 注入请求扩展。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径 (例如 `/health`)
/// - `/api/auth/login`, `/api/auth/signup`
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 NotAuthenticated |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 | 401 TokenInvalid |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if PUBLIC_API_ROUTES.contains(&path) {
        return Ok(next.run(req).await);
    }

    let uri = req.uri().to_string();
    let user = authenticate_headers(&state.jwt_service, req.headers(), &uri)?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// 校验请求头中的 Bearer 令牌并解析出 [`CurrentUser`]
pub(crate) fn authenticate_headers(
    jwt_service: &JwtService,
    headers: &HeaderMap,
    uri: &str,
) -> Result<CurrentUser, AppError> {
    let auth_header = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = uri);
            return Err(AppError::not_authenticated());
        }
    };

    let claims = jwt_service.validate_token(token).map_err(|e| {
        security_log!("WARN", "auth_failed", error = e.to_string(), uri = uri);
        match e {
            JwtError::ExpiredToken => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid token"),
        }
    })?;

    CurrentUser::try_from(claims).map_err(|e| {
        security_log!("WARN", "auth_malformed_claims", error = e.to_string(), uri = uri);
        AppError::invalid_token("Malformed token claims")
    })
}
