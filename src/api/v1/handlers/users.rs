/*
 * Responsibility
 * - POST /users (public sign-up through Supabase Auth)
 * - /users/{user_id} read/update/delete (secured; owner or elevated role only)
 * - only elevated roles may change a user's role
 * - users are addressed by their Supabase auth UUID
 */
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection, rejection::PathRejection},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    api::v1::{
        dto::users::{CreateUserRequest, CreatedUserResponse, UpdateUserRequest},
        extractors::{AuthCtx, AuthCtxExtractor},
        handlers::json_body,
    },
    error::AppError,
    services::supabase::types::User,
    state::AppState,
};

pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedUserResponse>), AppError> {
    let req = json_body(payload)?;
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_USER", msg))?;

    let user = state
        .supabase
        .sign_up(req.email.trim(), &req.password)
        .await?;
    tracing::info!(user_id = %user.id, "user signed up");

    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn get_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<User>, AppError> {
    let user_id = authorized_user_id(&ctx, path)?;
    Ok(Json(state.supabase.get_user(&user_id).await?))
}

pub async fn update_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<User>, AppError> {
    let user_id = authorized_user_id(&ctx, path)?;
    let req = json_body(payload)?;
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_USER", msg))?;

    let fields = req.into_fields();
    if fields.role.is_some() && !ctx.is_elevated() {
        tracing::warn!(subject = %ctx.subject, user_id = %user_id, "role change denied");
        return Err(AppError::Forbidden);
    }
    if fields.email.is_some() {
        state.supabase.require_admin()?;
    }

    let user = state.supabase.update_user(&user_id, &fields).await?;

    // public.users and auth.users must agree on the login email
    if let Some(email) = &fields.email {
        state
            .supabase
            .admin_update_user_email(&user_id, email)
            .await?;
    }
    tracing::info!(subject = %ctx.subject, user_id = %user_id, "user updated");

    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let user_id = authorized_user_id(&ctx, path)?;
    state.supabase.require_admin()?;

    state.supabase.delete_user_row(&user_id).await?;
    state.supabase.admin_delete_user(&user_id).await?;
    tracing::info!(subject = %ctx.subject, user_id = %user_id, "user deleted");

    Ok(StatusCode::NO_CONTENT)
}

fn authorized_user_id(
    ctx: &AuthCtx,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<String, AppError> {
    let Path(user_id) =
        path.map_err(|_| AppError::bad_request("INVALID_USER_ID", "user id must be a UUID"))?;
    let user_id = user_id.to_string();

    if !ctx.can_act_on(&user_id) {
        tracing::warn!(subject = %ctx.subject, user_id = %user_id, "user access denied");
        return Err(AppError::Forbidden);
    }

    Ok(user_id)
}
