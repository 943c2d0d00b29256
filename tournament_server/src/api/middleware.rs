//! Authentication middleware for mutating endpoints.
//!
//! Extracts the bearer token from the `Authorization` header, verifies it and
//! injects the caller [`Identity`] into request extensions. Handlers read it
//! with `Extension<Identity>`.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tournament_oracle::ids::Identity;

use super::{AppState, error::ApiError};
use crate::logging::log_security_event;

/// Authentication middleware that validates bearer tokens and injects the caller identity.
///
/// # Behavior
///
/// - **Success**: Token valid → Injects `Identity` into request extensions → Calls next handler
/// - **Missing or malformed header**: Returns `401 Unauthorized` with kind `unauthenticated`
/// - **Invalid/expired token**: Returns `401 Unauthorized` with kind `unauthenticated`
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthenticated("Missing bearer token"))?;

    match state.auth.verify(token) {
        Ok(caller) => {
            request.extensions_mut().insert::<Identity>(caller);
            Ok(next.run(request).await)
        }
        Err(e) => {
            log_security_event("invalid_token", None, request.uri().path(), &e.to_string());
            Err(ApiError::Unauthenticated("Invalid or expired token"))
        }
    }
}
