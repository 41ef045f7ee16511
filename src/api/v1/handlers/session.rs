/*
 * Responsibility
 * - POST /login: password grant delegated to Supabase Auth, token pair relayed
 * - POST /logout: tokens are stateless, the client discards them
 * - GET /me: the verified claims of the caller
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    api::v1::{
        dto::session::{LoginRequest, LoginResponse, MeResponse},
        extractors::AuthCtxExtractor,
        handlers::json_body,
    },
    error::AppError,
    state::AppState,
};

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let req = json_body(payload)?;
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::bad_request(
            "INVALID_CREDENTIALS_PAYLOAD",
            "email and password are required",
        ));
    }

    let session = state
        .supabase
        .sign_in_with_password(req.email.trim(), &req.password)
        .await?;

    Ok(Json(session.into()))
}

pub async fn logout() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({"message": "Logged out successfully"})),
    )
}

pub async fn me(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<MeResponse> {
    Json(MeResponse {
        subject: ctx.subject,
        role: ctx.role,
        email: ctx.email,
        expires_at: ctx.expires_at,
        issued_at: ctx.issued_at,
    })
}
