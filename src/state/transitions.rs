use tracing::{info, warn};

use crate::{
    error::ServiceError,
    services::sse_events::broadcast_game_update,
    state::{SharedState, engine::GameEngine, error::EngineError, game::Game},
};

/// Run an engine operation, then broadcast the new game and schedule a snapshot.
///
/// Rejected operations are logged and returned without any broadcast.
pub async fn run_with_broadcast<T, F>(
    state: &SharedState,
    action: &'static str,
    op: F,
) -> Result<(T, Game), ServiceError>
where
    F: FnOnce(&mut GameEngine) -> Result<T, EngineError>,
{
    let outcome = state
        .with_engine_mut(|engine| {
            let value = op(engine)?;
            Ok::<_, EngineError>((value, engine.game().clone()))
        })
        .await;

    match outcome {
        Ok((value, game)) => {
            info!(action, phase = %game.state.phase, clue = game.state.clue_number, "game updated");
            broadcast_game_update(state, &game);
            state.request_save().await;
            Ok((value, game))
        }
        Err(err) => {
            warn!(action, code = err.code(), error = %err, "game operation rejected");
            Err(err.into())
        }
    }
}
