use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report liveness along with the outcome of the last snapshot write.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let status = state.persist_status().await;
    if let Some(error) = &status.last_error {
        warn!(%error, location = %state.snapshot_store().location(), "last snapshot write failed");
    }
    HealthResponse::from_status(status)
}
