//! Bearer token authentication middleware.
//!
//! Extracts `Authorization: Bearer <token>`, resolves it to actor claims
//! through the session store, and injects the `Actor` into request
//! extensions for downstream handlers. The token's claims, never the
//! request body, determine what a caller may do.

use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use vetclinic_core::auth;
use vetclinic_core::Actor;

use crate::error::ApiError;
use crate::types::ApiContext;

/// Require a valid bearer token.
///
/// Accesses `ApiContext` from request extensions (injected by the
/// Extension layer). On success: injects `Actor`.
pub async fn require_auth(req: Request<axum::body::Body>, next: Next) -> Response {
    match require_auth_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn require_auth_inner(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    let token = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?
        .to_string();

    let actor: Actor = {
        let db = ctx
            .db
            .lock()
            .map_err(|_| ApiError::Internal("db lock poisoned".into()))?;
        auth::verify_session(&db, &token)
            .map_err(ApiError::from)?
            .ok_or(ApiError::Unauthorized)?
    }; // MutexGuard dropped before the await below

    req.extensions_mut().insert(actor);
    Ok(next.run(req).await)
}
