/*
 * Responsibility
 * - Application-wide AppError
 * - IntoResponse (HTTP status + JSON error body)
 * - Uniform conversion of Supabase / auth failures into caller-safe messages
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::supabase::SupabaseError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("forbidden")]
    Forbidden,
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("upstream service error")]
    Upstream,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    /// Every rejected credential surfaces with this one message.
    pub const INVALID_TOKEN: &'static str = "missing or invalid token";

    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn invalid_token() -> Self {
        Self::Unauthorized(Self::INVALID_TOKEN)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            AppError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message.into())
            }
            AppError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN", "forbidden".into()),
            AppError::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{resource} not found."),
            ),
            AppError::Upstream => (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "upstream service error".into(),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<SupabaseError> for AppError {
    fn from(e: SupabaseError) -> Self {
        match e {
            SupabaseError::NotFound { resource } => AppError::not_found(resource),
            SupabaseError::InvalidCredentials => AppError::Unauthorized("invalid credentials"),
            SupabaseError::ServiceRoleMissing | SupabaseError::Url(_) => {
                tracing::error!(error = %e, "supabase client misconfigured");
                AppError::Internal
            }
            SupabaseError::Transport(_)
            | SupabaseError::Status { .. }
            | SupabaseError::Decode(_)
            | SupabaseError::EmptyResponse => {
                tracing::error!(error = %e, "supabase request failed");
                AppError::Upstream
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::Value;

    use super::*;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn unauthorized_uses_generic_message() {
        let (status, body) = render(AppError::invalid_token()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
        assert_eq!(body["error"]["message"], "missing or invalid token");
    }

    #[tokio::test]
    async fn supabase_not_found_maps_to_404() {
        let err = AppError::from(SupabaseError::NotFound { resource: "game" });
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "game not found.");
    }

    #[tokio::test]
    async fn upstream_status_does_not_leak_body() {
        let err = AppError::from(SupabaseError::Status {
            status: 500,
            body: "relation \"games\" does not exist".into(),
        });
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(!body.to_string().contains("relation"));
    }

    #[tokio::test]
    async fn missing_service_role_is_internal() {
        let (status, _) = render(AppError::from(SupabaseError::ServiceRoleMissing)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
