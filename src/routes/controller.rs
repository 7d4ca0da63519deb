use axum::{Json, Router, extract::State, routing::post};
use validator::Validate;

use crate::{
    dto::{
        controller::{AssignRequest, ResolveRequest, StateUpdateRequest, TieBreakerOpenRequest},
        game::{FinalizeResponse, GameResponse},
    },
    error::{AppError, ErrorBody},
    services::game_service,
    state::SharedState,
};

/// Game Master controls: round state, assignments and the tie-breaker.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/state", post(update_state))
        .route("/proctors/assign", post(assign_teams))
        .route("/proctors/auto-assign", post(auto_assign))
        .route("/tiebreaker/new-clue", post(new_tie_breaker_clue))
        .route("/tiebreaker/open", post(open_tie_breaker))
        .route("/tiebreaker/finalize", post(finalize_tie_breaker))
        .route("/tiebreaker/resolve", post(resolve_tie_breaker))
}

/// Update phase, label, clue and gates in one atomic step.
#[utoipa::path(
    post,
    path = "/api/state",
    tag = "controller",
    params(("x-game-id" = String, Header, description = "Game access code")),
    request_body = StateUpdateRequest,
    responses(
        (status = 200, description = "State updated", body = GameResponse),
        (status = 400, description = "Invalid phase, clue number or clue value", body = ErrorBody),
        (status = 409, description = "Update not allowed right now", body = ErrorBody)
    )
)]
pub async fn update_state(
    State(state): State<SharedState>,
    Json(payload): Json<StateUpdateRequest>,
) -> Result<Json<GameResponse>, AppError> {
    payload.validate()?;
    let game = game_service::update_state(&state, payload).await?;
    Ok(Json(GameResponse::new(game)))
}

/// Set the exact list of teams handled by one proctor.
#[utoipa::path(
    post,
    path = "/api/proctors/assign",
    tag = "controller",
    params(("x-game-id" = String, Header, description = "Game access code")),
    request_body = AssignRequest,
    responses(
        (status = 200, description = "Assignment stored", body = GameResponse),
        (status = 404, description = "Unknown proctor or team", body = ErrorBody),
        (status = 409, description = "Team owned by another proctor", body = ErrorBody)
    )
)]
pub async fn assign_teams(
    State(state): State<SharedState>,
    Json(payload): Json<AssignRequest>,
) -> Result<Json<GameResponse>, AppError> {
    payload.validate()?;
    let game = game_service::assign_teams(&state, payload).await?;
    Ok(Json(GameResponse::new(game)))
}

/// Split the roster across proctors in seat order.
#[utoipa::path(
    post,
    path = "/api/proctors/auto-assign",
    tag = "controller",
    params(("x-game-id" = String, Header, description = "Game access code")),
    responses(
        (status = 200, description = "Teams distributed", body = GameResponse),
        (status = 400, description = "Roster too large for the proctors", body = ErrorBody)
    )
)]
pub async fn auto_assign(State(state): State<SharedState>) -> Result<Json<GameResponse>, AppError> {
    let game = game_service::auto_assign(&state).await?;
    Ok(Json(GameResponse::new(game)))
}

/// Start a clincher clue between the tied teams.
#[utoipa::path(
    post,
    path = "/api/tiebreaker/new-clue",
    tag = "tiebreaker",
    params(("x-game-id" = String, Header, description = "Game access code")),
    responses(
        (status = 200, description = "Clue started", body = GameResponse),
        (status = 409, description = "Not in TIE_BREAKER, final pending or no tie", body = ErrorBody)
    )
)]
pub async fn new_tie_breaker_clue(
    State(state): State<SharedState>,
) -> Result<Json<GameResponse>, AppError> {
    let game = game_service::start_tie_breaker_clue(&state).await?;
    Ok(Json(GameResponse::new(game)))
}

/// Open or pause tie-break submissions.
#[utoipa::path(
    post,
    path = "/api/tiebreaker/open",
    tag = "tiebreaker",
    params(("x-game-id" = String, Header, description = "Game access code")),
    request_body = TieBreakerOpenRequest,
    responses((status = 200, description = "Gate updated", body = GameResponse))
)]
pub async fn open_tie_breaker(
    State(state): State<SharedState>,
    Json(payload): Json<TieBreakerOpenRequest>,
) -> Result<Json<GameResponse>, AppError> {
    let game = game_service::open_tie_breaker(&state, payload.scoring_open).await?;
    Ok(Json(GameResponse::new(game)))
}

/// Close the clincher clue, awarding the point when a single team answered.
#[utoipa::path(
    post,
    path = "/api/tiebreaker/finalize",
    tag = "tiebreaker",
    params(("x-game-id" = String, Header, description = "Game access code")),
    responses(
        (status = 200, description = "Clue finalized", body = FinalizeResponse),
        (status = 409, description = "Nothing to finalize", body = ErrorBody)
    )
)]
pub async fn finalize_tie_breaker(
    State(state): State<SharedState>,
) -> Result<Json<FinalizeResponse>, AppError> {
    let (result, game) = game_service::finalize_tie_breaker(&state).await?;
    Ok(Json(FinalizeResponse {
        ok: true,
        result,
        game,
    }))
}

/// Pick the winner after several teams answered.
#[utoipa::path(
    post,
    path = "/api/tiebreaker/resolve",
    tag = "tiebreaker",
    params(("x-game-id" = String, Header, description = "Game access code")),
    request_body = ResolveRequest,
    responses(
        (status = 200, description = "Winner recorded", body = GameResponse),
        (status = 409, description = "No conflict or winner already set", body = ErrorBody)
    )
)]
pub async fn resolve_tie_breaker(
    State(state): State<SharedState>,
    Json(payload): Json<ResolveRequest>,
) -> Result<Json<GameResponse>, AppError> {
    payload.validate()?;
    let game = game_service::resolve_tie_breaker(&state, payload.team_id).await?;
    Ok(Json(GameResponse::new(game)))
}
