//! Session endpoints.
//!
//! `POST /sessions` is the bridge from the identity tier: it takes actor
//! claims that tier has already verified and mints a bearer token. It is
//! the only unauthenticated mutating route.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

use vetclinic_core::auth;
use vetclinic_core::Actor;

use crate::endpoints::lock_db;
use crate::error::ApiError;
use crate::types::ApiContext;

#[derive(Serialize)]
pub struct SessionResponse {
    pub token: String,
}

/// `POST /sessions` — issue a bearer token for a verified actor.
pub async fn issue(
    State(ctx): State<ApiContext>,
    Json(actor): Json<Actor>,
) -> Result<Json<SessionResponse>, ApiError> {
    let db = lock_db(&ctx)?;
    let token = auth::issue_session(&db, &actor)?;
    Ok(Json(SessionResponse { token }))
}

/// `DELETE /sessions` — revoke the presented token.
pub async fn revoke(
    State(ctx): State<ApiContext>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let token = headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?;

    let db = lock_db(&ctx)?;
    auth::revoke_session(&db, token)?;
    Ok(Json(serde_json::json!({})))
}
