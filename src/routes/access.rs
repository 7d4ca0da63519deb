use axum::{
    body::Body,
    extract::{Query, Request, State},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;

use crate::{error::AppError, state::SharedState};

/// Header carrying the game access code.
pub const GAME_ID_HEADER: &str = "x-game-id";

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AccessQuery {
    #[serde(rename = "gameId")]
    game_id: Option<String>,
}

/// Reject requests that do not present the configured access code, either in
/// the `x-game-id` header or, for event streams, the `gameId` query parameter.
pub(crate) async fn require_game_id(
    State(state): State<SharedState>,
    Query(query): Query<AccessQuery>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let provided = req
        .headers()
        .get(GAME_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_owned())
        .or(query.game_id)
        .ok_or_else(|| AppError::Unauthorized("missing game id header `x-game-id`".into()))?;

    if provided.trim() != state.config().game_id() {
        return Err(AppError::Unauthorized("invalid game id".into()));
    }
    Ok(next.run(req).await)
}
