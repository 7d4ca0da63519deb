use tracing::{debug, warn};

use crate::{
    dto::sse::{FLAG_EVENT, FlagEvent, GAME_UPDATE_EVENT, ServerEvent},
    state::{SharedState, game::Game},
};

/// Build the `game:update` event for a game, logging serialization failures.
pub fn game_update_event(game: &Game) -> Option<ServerEvent> {
    match ServerEvent::json(GAME_UPDATE_EVENT.to_string(), game) {
        Ok(event) => Some(event),
        Err(err) => {
            warn!(error = %err, "failed to serialize game update");
            None
        }
    }
}

/// Push the full game to every connected client.
pub fn broadcast_game_update(state: &SharedState, game: &Game) {
    if let Some(event) = game_update_event(game) {
        let receivers = state.sse().broadcast(event);
        debug!(receivers, "game update broadcast");
    }
}

/// Push a proctor flag to every connected client.
pub fn broadcast_flag(state: &SharedState, flag: &FlagEvent) {
    match ServerEvent::json(FLAG_EVENT.to_string(), flag) {
        Ok(event) => {
            state.sse().broadcast(event);
        }
        Err(err) => warn!(error = %err, "failed to serialize flag event"),
    }
}
