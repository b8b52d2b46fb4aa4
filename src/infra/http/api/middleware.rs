use std::str::FromStr;

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::domain::types::OwnerId;
use crate::infra::http::middleware::OwnerContext;

use super::error::ApiError;
use super::state::ApiState;

pub const OWNER_HEADER: &str = "x-owner-id";
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Parse the forwarded owner id once and expose it as an [`OwnerContext`] extension.
pub async fn resolve_owner(mut request: Request<Body>, next: Next) -> Response {
    let raw = match request.headers().get(OWNER_HEADER) {
        Some(value) => value.to_str().ok(),
        None => return ApiError::unauthorized(None).into_response(),
    };

    let owner = match raw.map(OwnerId::from_str) {
        Some(Ok(owner)) => owner,
        Some(Err(err)) => return ApiError::unauthorized(Some(err.to_string())).into_response(),
        None => {
            return ApiError::unauthorized(Some("owner header is not valid text".to_string()))
                .into_response();
        }
    };

    let ctx = OwnerContext { owner };
    request.extensions_mut().insert(ctx);

    let mut response = next.run(request).await;
    response.extensions_mut().insert(ctx);
    response
}

pub async fn require_admin(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(expected) = state.admin_token.as_deref() else {
        warn!(
            target = "eventdesk::api::admin",
            "admin route requested but no admin token is configured"
        );
        return ApiError::forbidden("Admin access is not configured").into_response();
    };

    let presented = request
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    if !bool::from(presented.as_bytes().ct_eq(expected.as_bytes())) {
        return ApiError::forbidden("Admin token rejected").into_response();
    }

    next.run(request).await
}
