//! Game Master operations: roster, round controls, assignments, tie-breaker and history.

use tracing::{debug, info};

use crate::{
    dto::controller::{AssignRequest, StateUpdateRequest},
    error::ServiceError,
    services::{persistence, sse_events::broadcast_game_update},
    state::{
        SharedState, engine::StateUpdate, game::Game, tie_breaker::TieBreakerOutcome,
        transitions::run_with_broadcast,
    },
};

/// Current game.
pub async fn current_game(state: &SharedState) -> Game {
    state.game_snapshot().await
}

/// Start over with a fresh game and empty history.
pub async fn reset_game(state: &SharedState) -> Result<Game, ServiceError> {
    let (_, game) = run_with_broadcast(state, "reset_game", |engine| {
        engine.reset_game();
        Ok(())
    })
    .await?;
    Ok(game)
}

/// Undo the last accepted operation. The flag is `false` when history was empty.
///
/// Nothing is broadcast or saved when there was nothing to undo.
pub async fn undo(state: &SharedState) -> Result<(bool, Game), ServiceError> {
    let (undone, game) = state
        .with_engine_mut(|engine| {
            let undone = engine.undo();
            (undone, engine.game().clone())
        })
        .await;

    if undone {
        info!(action = "undo", phase = %game.state.phase, clue = game.state.clue_number, "game updated");
        broadcast_game_update(state, &game);
        state.request_save().await;
    } else {
        debug!("undo requested with empty history");
    }
    Ok((undone, game))
}

/// Write the current game to the snapshot store now.
pub async fn save_game(state: &SharedState) -> Result<String, ServiceError> {
    let saved_at = persistence::save_now(state).await?;
    info!(location = %state.snapshot_store().location(), "snapshot saved on request");
    Ok(saved_at)
}

/// Replace the current game with the stored snapshot.
pub async fn load_game(state: &SharedState) -> Result<Game, ServiceError> {
    persistence::load_into_engine(state).await
}

/// Replace the roster with `names`.
pub async fn replace_teams(state: &SharedState, names: Vec<String>) -> Result<Game, ServiceError> {
    let (_, game) =
        run_with_broadcast(state, "replace_teams", |engine| engine.replace_teams(&names)).await?;
    Ok(game)
}

/// Append `names` to the roster.
pub async fn add_teams(state: &SharedState, names: Vec<String>) -> Result<Game, ServiceError> {
    let (_, game) = run_with_broadcast(state, "add_teams", |engine| engine.add_teams(&names)).await?;
    Ok(game)
}

/// Apply a partial update of the round controls.
pub async fn update_state(
    state: &SharedState,
    request: StateUpdateRequest,
) -> Result<Game, ServiceError> {
    let update = StateUpdate::try_from(request)?;
    let (_, game) =
        run_with_broadcast(state, "update_state", |engine| engine.update_state(update)).await?;
    Ok(game)
}

/// Give one proctor an explicit list of teams.
pub async fn assign_teams(state: &SharedState, request: AssignRequest) -> Result<Game, ServiceError> {
    let AssignRequest {
        proctor_id,
        team_ids,
    } = request;
    let (_, game) = run_with_broadcast(state, "assign_teams", |engine| {
        engine.assign_teams_to_proctor(&proctor_id, team_ids)
    })
    .await?;
    Ok(game)
}

/// Split the roster across proctors in seat order.
pub async fn auto_assign(state: &SharedState) -> Result<Game, ServiceError> {
    let (_, game) = run_with_broadcast(state, "auto_assign", |engine| {
        engine.auto_assign_by_seat_order()
    })
    .await?;
    Ok(game)
}

/// Start a new clincher clue.
pub async fn start_tie_breaker_clue(state: &SharedState) -> Result<Game, ServiceError> {
    let (_, game) = run_with_broadcast(state, "tie_breaker_new_clue", |engine| {
        engine.start_tie_breaker_clue()
    })
    .await?;
    Ok(game)
}

/// Open or pause tie-break submissions.
pub async fn open_tie_breaker(state: &SharedState, open: bool) -> Result<Game, ServiceError> {
    let (_, game) = run_with_broadcast(state, "tie_breaker_open", |engine| {
        engine.open_tie_breaker_scoring(open)
    })
    .await?;
    Ok(game)
}

/// Close the clincher clue.
pub async fn finalize_tie_breaker(
    state: &SharedState,
) -> Result<(TieBreakerOutcome, Game), ServiceError> {
    run_with_broadcast(state, "tie_breaker_finalize", |engine| {
        engine.finalize_tie_breaker()
    })
    .await
}

/// Pick the winner of a finalized conflict.
pub async fn resolve_tie_breaker(state: &SharedState, team_id: String) -> Result<Game, ServiceError> {
    let (_, game) = run_with_broadcast(state, "tie_breaker_resolve", |engine| {
        engine.resolve_tie_breaker_winner(&team_id)
    })
    .await?;
    info!(team_id = %team_id, "tie-breaker resolved manually");
    Ok(game)
}
