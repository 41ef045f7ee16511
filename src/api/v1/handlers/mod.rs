pub mod games;
pub mod health;
pub mod session;
pub mod users;

use axum::{Json, extract::rejection::JsonRejection};
use serde::de::DeserializeOwned;

use crate::error::AppError;

// Json extractor rejections are plain text by default; keep error bodies uniform.
pub(crate) fn json_body<T: DeserializeOwned>(
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    payload.map(|Json(v)| v).map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected request body");
        AppError::bad_request("INVALID_BODY", "invalid request payload")
    })
}
