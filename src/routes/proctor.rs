use axum::{Json, Router, extract::State, routing::post};
use validator::Validate;

use crate::{
    dto::{
        game::{AckResponse, GameResponse, SubmissionResponse},
        proctor::{BetRequest, ProctorTeamRequest, ScoreRequest},
    },
    error::{AppError, ErrorBody},
    services::proctor_service,
    state::SharedState,
};

/// Routes called from proctor devices.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/score", post(score))
        .route("/bets/set", post(set_bet))
        .route("/tiebreaker/correct", post(tie_breaker_correct))
        .route("/flag", post(raise_flag))
}

/// Report a team's result on the current clue.
#[utoipa::path(
    post,
    path = "/api/score",
    tag = "proctor",
    params(("x-game-id" = String, Header, description = "Game access code")),
    request_body = ScoreRequest,
    responses(
        (status = 200, description = "Score recorded", body = GameResponse),
        (status = 403, description = "Team not assigned to this proctor", body = ErrorBody),
        (status = 409, description = "Scoring closed, team eliminated or already scored", body = ErrorBody)
    )
)]
pub async fn score(
    State(state): State<SharedState>,
    Json(payload): Json<ScoreRequest>,
) -> Result<Json<GameResponse>, AppError> {
    payload.validate()?;
    let game = proctor_service::score(&state, payload).await?;
    Ok(Json(GameResponse::new(game)))
}

/// Record a DIFFICULT wager.
#[utoipa::path(
    post,
    path = "/api/bets/set",
    tag = "proctor",
    params(("x-game-id" = String, Header, description = "Game access code")),
    request_body = BetRequest,
    responses(
        (status = 200, description = "Bet recorded", body = GameResponse),
        (status = 400, description = "Bet out of range", body = ErrorBody),
        (status = 409, description = "Betting not open", body = ErrorBody)
    )
)]
pub async fn set_bet(
    State(state): State<SharedState>,
    Json(payload): Json<BetRequest>,
) -> Result<Json<GameResponse>, AppError> {
    payload.validate()?;
    let game = proctor_service::set_bet(&state, payload).await?;
    Ok(Json(GameResponse::new(game)))
}

/// Report a correct answer on the clincher clue.
#[utoipa::path(
    post,
    path = "/api/tiebreaker/correct",
    tag = "tiebreaker",
    params(("x-game-id" = String, Header, description = "Game access code")),
    request_body = ProctorTeamRequest,
    responses(
        (status = 200, description = "Answer recorded; `recorded` is false for a repeat", body = SubmissionResponse),
        (status = 400, description = "Team is not a candidate", body = ErrorBody),
        (status = 409, description = "Tie-breaker closed or finalized", body = ErrorBody)
    )
)]
pub async fn tie_breaker_correct(
    State(state): State<SharedState>,
    Json(payload): Json<ProctorTeamRequest>,
) -> Result<Json<SubmissionResponse>, AppError> {
    payload.validate()?;
    let (recorded, game) = proctor_service::tie_breaker_correct(&state, payload).await?;
    Ok(Json(SubmissionResponse {
        ok: true,
        recorded,
        game,
    }))
}

/// Draw the Game Master's attention to a team.
#[utoipa::path(
    post,
    path = "/api/flag",
    tag = "proctor",
    params(("x-game-id" = String, Header, description = "Game access code")),
    request_body = ProctorTeamRequest,
    responses(
        (status = 200, description = "Flag broadcast", body = AckResponse),
        (status = 403, description = "Team not assigned to this proctor", body = ErrorBody)
    )
)]
pub async fn raise_flag(
    State(state): State<SharedState>,
    Json(payload): Json<ProctorTeamRequest>,
) -> Result<Json<AckResponse>, AppError> {
    payload.validate()?;
    proctor_service::raise_flag(&state, payload).await?;
    Ok(Json(AckResponse { ok: true }))
}
