use axum::{Json, Router, extract::State, routing::post};
use validator::Validate;

use crate::{
    dto::{
        controller::{ImportCsvRequest, TeamsRequest},
        game::{GameResponse, ImportResponse},
    },
    error::{AppError, ErrorBody},
    services::{game_service, import_service},
    state::SharedState,
};

/// Roster management routes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/teams/replace", post(replace_teams))
        .route("/teams/add", post(add_teams))
        .route("/teams/import-csv", post(import_csv))
}

/// Replace the whole roster. Assignments, bets and receipts are cleared.
#[utoipa::path(
    post,
    path = "/api/teams/replace",
    tag = "teams",
    params(("x-game-id" = String, Header, description = "Game access code")),
    request_body = TeamsRequest,
    responses(
        (status = 200, description = "Roster replaced", body = GameResponse),
        (status = 400, description = "Too many teams or invalid names", body = ErrorBody)
    )
)]
pub async fn replace_teams(
    State(state): State<SharedState>,
    Json(payload): Json<TeamsRequest>,
) -> Result<Json<GameResponse>, AppError> {
    payload.validate()?;
    let game = game_service::replace_teams(&state, payload.teams).await?;
    Ok(Json(GameResponse::new(game)))
}

/// Append teams to the roster.
#[utoipa::path(
    post,
    path = "/api/teams/add",
    tag = "teams",
    params(("x-game-id" = String, Header, description = "Game access code")),
    request_body = TeamsRequest,
    responses(
        (status = 200, description = "Teams added", body = GameResponse),
        (status = 400, description = "Too many teams or invalid names", body = ErrorBody)
    )
)]
pub async fn add_teams(
    State(state): State<SharedState>,
    Json(payload): Json<TeamsRequest>,
) -> Result<Json<GameResponse>, AppError> {
    payload.validate()?;
    let game = game_service::add_teams(&state, payload.teams).await?;
    Ok(Json(GameResponse::new(game)))
}

/// Import team names from pasted CSV text.
#[utoipa::path(
    post,
    path = "/api/teams/import-csv",
    tag = "teams",
    params(("x-game-id" = String, Header, description = "Game access code")),
    request_body = ImportCsvRequest,
    responses(
        (status = 200, description = "Teams imported", body = ImportResponse),
        (status = 400, description = "No names found or too many teams", body = ErrorBody)
    )
)]
pub async fn import_csv(
    State(state): State<SharedState>,
    Json(payload): Json<ImportCsvRequest>,
) -> Result<Json<ImportResponse>, AppError> {
    payload.validate()?;
    let (imported, game) = import_service::import_csv(&state, payload).await?;
    Ok(Json(ImportResponse {
        ok: true,
        imported,
        game,
    }))
}
