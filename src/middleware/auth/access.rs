//! access token（HMAC JWT）検証 → AuthCtx を extensions に入れる
//!
//! - secured route では `Authorization: Bearer <jwt>` が必須。
//! - 失敗時は 401 + 汎用ボディで打ち切る。理由はログにだけ出す。
//! - 成功時は検証済み `AuthCtx` を 1 回だけ入れ、内側の service も 1 回だけ呼ぶ。

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Puts access-token verification in front of every route of `router`.
///
/// ```ignore
/// let secured = middleware::auth::access::apply(secured_routes(), state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // route_layer にすることで、未定義パスは 401 ではなく 404 のまま
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = bearer_token(req.headers()) else {
        tracing::warn!(
            method = %req.method(),
            path = %req.uri().path(),
            "missing or malformed authorization header"
        );
        return Err(AppError::invalid_token());
    };

    let auth_ctx = match state.auth.verify(token) {
        Ok(ctx) => ctx,
        Err(err) => {
            tracing::warn!(
                error = %err,
                method = %req.method(),
                path = %req.uri().path(),
                "access token verification failed"
            );
            return Err(AppError::invalid_token());
        }
    };

    tracing::debug!(subject = %auth_ctx.subject, role = %auth_ctx.role, "access token accepted");

    // middleware → extractor
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}

/// Returns the token of an `Authorization: Bearer <token>` header, if well-formed.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix(BEARER_PREFIX)?;

    if token.trim().is_empty() {
        return None;
    }

    Some(token)
}
