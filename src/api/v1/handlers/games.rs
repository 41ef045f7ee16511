/*
 * Responsibility
 * - /games CRUD handlers (all behind the access middleware)
 * - Json body → DTO validation → Supabase REST call → relay the row(s)
 */
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    api::v1::{dto::games::GameRequest, extractors::AuthCtxExtractor, handlers::json_body},
    error::AppError,
    services::supabase::types::Game,
    state::AppState,
};

pub async fn list_games(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<Vec<Game>>, AppError> {
    let games = state.supabase.list_games().await?;
    tracing::debug!(subject = %ctx.subject, count = games.len(), "listed games");
    Ok(Json(games))
}

pub async fn create_game(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    payload: Result<Json<GameRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Game>), AppError> {
    let req = json_body(payload)?;
    req.validate_create()
        .map_err(|msg| AppError::bad_request("INVALID_GAME", msg))?;

    let game = state.supabase.create_game(&req.into_fields()).await?;
    tracing::info!(subject = %ctx.subject, game_id = %game.id, "game created");

    Ok((StatusCode::CREATED, Json(game)))
}

pub async fn get_game(
    State(state): State<AppState>,
    AuthCtxExtractor(_ctx): AuthCtxExtractor,
    Path(game_id): Path<String>,
) -> Result<Json<Game>, AppError> {
    Ok(Json(state.supabase.get_game(&game_id).await?))
}

pub async fn update_game(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(game_id): Path<String>,
    payload: Result<Json<GameRequest>, JsonRejection>,
) -> Result<Json<Game>, AppError> {
    let req = json_body(payload)?;
    req.validate_update()
        .map_err(|msg| AppError::bad_request("INVALID_GAME", msg))?;

    let game = state
        .supabase
        .update_game(&game_id, &req.into_fields())
        .await?;
    tracing::info!(subject = %ctx.subject, game_id = %game.id, "game updated");

    Ok(Json(game))
}

pub async fn delete_game(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(game_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.supabase.delete_game(&game_id).await?;
    tracing::info!(subject = %ctx.subject, game_id = %game_id, "game deleted");

    Ok(StatusCode::NO_CONTENT)
}
