/*
 * Responsibility
 * - v1 URL layout
 * - public: /health, POST /users, /login, /logout
 * - secured (access middleware via route_layer): /me, /games, /users/{user_id}
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::auth::access;
use crate::state::AppState;

use crate::api::v1::handlers::{
    games::{create_game, delete_game, get_game, list_games, update_game},
    health::health,
    session::{login, logout, me},
    users::{create_user, delete_user, get_user, update_user},
};

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/health", get(health))
        .route("/users", post(create_user))
        .route("/login", post(login))
        .route("/logout", post(logout));

    let secured = Router::new()
        .route("/me", get(me))
        .route("/games", get(list_games).post(create_game))
        .route(
            "/games/{game_id}",
            get(get_game)
                .put(update_game)
                .patch(update_game)
                .delete(delete_game),
        )
        .route(
            "/users/{user_id}",
            get(get_user).patch(update_user).delete(delete_user),
        );

    public.merge(access::apply(secured, state))
}
