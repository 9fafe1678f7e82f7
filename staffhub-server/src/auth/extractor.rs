//! JWT Extractor
//!
//! `CurrentUser` as a handler argument. Reuses the user injected by
//! [`require_auth`](super::require_auth) and falls back to validating the
//! header itself when the middleware did not run.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::AppError;
use crate::auth::CurrentUser;
use crate::auth::middleware::authenticate_headers;
use crate::core::ServerState;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let uri = parts.uri.to_string();
        let user = authenticate_headers(&state.jwt_service, &parts.headers, &uri)?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
