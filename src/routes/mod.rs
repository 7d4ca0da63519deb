use axum::{Router, middleware};

use crate::state::SharedState;

pub mod access;
pub mod controller;
pub mod docs;
pub mod game;
pub mod health;
pub mod proctor;
pub mod sse;
pub mod teams;

/// Compose all route trees, wiring in shared state and documentation routes.
///
/// Everything under `/api` except the health check requires the game access code.
pub fn router(state: SharedState) -> Router<()> {
    let gated = game::router()
        .merge(teams::router())
        .merge(controller::router())
        .merge(proctor::router())
        .merge(sse::router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            access::require_game_id,
        ));

    let api_router = health::router().merge(gated);
    let docs_router = docs::router(state.clone());

    Router::new()
        .nest("/api", api_router)
        .merge(docs_router)
        .with_state(state)
}
