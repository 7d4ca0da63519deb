use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    dao::snapshot_store::SnapshotLoad,
    error::ServiceError,
    services::sse_events::broadcast_game_update,
    state::{
        SharedState,
        game::{Game, rfc3339_now},
    },
};

/// Write requested snapshots, coalescing bursts of mutations into one write.
///
/// Each wake-up waits for the configured quiet period so that the snapshot
/// taken afterwards includes every mutation made meanwhile.
pub async fn run(state: SharedState) {
    let debounce = state.config().save_debounce();
    loop {
        state.save_requested().await;
        sleep(debounce).await;
        if let Err(err) = save_now(&state).await {
            warn!(error = %err, "debounced snapshot write failed");
        }
    }
}

/// Write the current game immediately. Returns the RFC 3339 write time.
pub async fn save_now(state: &SharedState) -> Result<String, ServiceError> {
    // The game is read under the lock too, so the last writer always holds the newest game.
    let _writer = state.save_lock().lock().await;
    let game = state.game_snapshot().await;
    let store = state.snapshot_store().clone();
    match store.save(game).await {
        Ok(()) => {
            let saved_at = rfc3339_now();
            state.record_save(Ok(saved_at.clone())).await;
            Ok(saved_at)
        }
        Err(err) => {
            state.record_save(Err(err.to_string())).await;
            Err(err.into())
        }
    }
}

/// Read the stored snapshot and install it as the current game.
pub async fn load_into_engine(state: &SharedState) -> Result<Game, ServiceError> {
    let store = state.snapshot_store().clone();
    match store.load().await? {
        SnapshotLoad::Loaded(game) => {
            let game = state
                .with_engine_mut(|engine| {
                    engine.load_game(*game)?;
                    Ok::<_, ServiceError>(engine.game().clone())
                })
                .await?;
            info!(location = %store.location(), teams = game.teams.len(), "snapshot loaded");
            broadcast_game_update(state, &game);
            Ok(game)
        }
        SnapshotLoad::Missing => Err(ServiceError::NotFound(format!(
            "no snapshot at {}",
            store.location()
        ))),
        SnapshotLoad::Invalid(reason) => Err(ServiceError::InvalidInput(format!(
            "snapshot at {} refused: {reason}",
            store.location()
        ))),
    }
}

/// Install the stored snapshot at startup when there is a valid one.
pub async fn restore_on_startup(state: &SharedState) {
    match load_into_engine(state).await {
        Ok(_) => {}
        Err(ServiceError::NotFound(message)) => info!(%message, "starting with a fresh game"),
        Err(err) => warn!(error = %err, "ignoring stored snapshot; starting with a fresh game"),
    }
}
