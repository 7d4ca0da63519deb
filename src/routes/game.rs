use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::game::{GameResponse, SaveResponse, UndoResponse},
    error::{AppError, ErrorBody},
    services::game_service,
    state::SharedState,
};

/// Routes operating on the game as a whole.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/game", get(get_game))
        .route("/game/reset", post(reset_game))
        .route("/game/save", post(save_game))
        .route("/game/load", post(load_game))
        .route("/undo", post(undo))
}

/// Return the current game.
#[utoipa::path(
    get,
    path = "/api/game",
    tag = "game",
    params(("x-game-id" = String, Header, description = "Game access code")),
    responses(
        (status = 200, description = "Current game", body = GameResponse),
        (status = 401, description = "Missing or wrong access code", body = ErrorBody)
    )
)]
pub async fn get_game(State(state): State<SharedState>) -> Json<GameResponse> {
    Json(GameResponse::new(game_service::current_game(&state).await))
}

/// Discard everything and start a fresh game.
#[utoipa::path(
    post,
    path = "/api/game/reset",
    tag = "game",
    params(("x-game-id" = String, Header, description = "Game access code")),
    responses((status = 200, description = "Fresh game", body = GameResponse))
)]
pub async fn reset_game(State(state): State<SharedState>) -> Result<Json<GameResponse>, AppError> {
    let game = game_service::reset_game(&state).await?;
    Ok(Json(GameResponse::new(game)))
}

/// Restore the state before the last accepted operation.
#[utoipa::path(
    post,
    path = "/api/undo",
    tag = "game",
    params(("x-game-id" = String, Header, description = "Game access code")),
    responses((status = 200, description = "`ok` is false when there was nothing to undo", body = UndoResponse))
)]
pub async fn undo(State(state): State<SharedState>) -> Result<Json<UndoResponse>, AppError> {
    let (ok, game) = game_service::undo(&state).await?;
    Ok(Json(UndoResponse { ok, game }))
}

/// Write the current game to disk now.
#[utoipa::path(
    post,
    path = "/api/game/save",
    tag = "game",
    params(("x-game-id" = String, Header, description = "Game access code")),
    responses(
        (status = 200, description = "Snapshot written", body = SaveResponse),
        (status = 503, description = "Snapshot storage failed", body = ErrorBody)
    )
)]
pub async fn save_game(State(state): State<SharedState>) -> Result<Json<SaveResponse>, AppError> {
    let saved_at = game_service::save_game(&state).await?;
    Ok(Json(SaveResponse {
        ok: true,
        location: state.snapshot_store().location(),
        saved_at: Some(saved_at),
    }))
}

/// Replace the current game with the stored snapshot.
#[utoipa::path(
    post,
    path = "/api/game/load",
    tag = "game",
    params(("x-game-id" = String, Header, description = "Game access code")),
    responses(
        (status = 200, description = "Snapshot loaded", body = GameResponse),
        (status = 404, description = "No snapshot stored", body = ErrorBody),
        (status = 400, description = "Stored snapshot is malformed", body = ErrorBody)
    )
)]
pub async fn load_game(State(state): State<SharedState>) -> Result<Json<GameResponse>, AppError> {
    let game = game_service::load_game(&state).await?;
    Ok(Json(GameResponse::new(game)))
}
