use std::convert::Infallible;

use axum::{Router, extract::State, response::sse::Sse, routing::get};
use futures::Stream;
use tracing::info;

use crate::{services::sse_service, state::SharedState};

#[utoipa::path(
    get,
    path = "/api/events",
    tag = "sse",
    params(("gameId" = String, Query, description = "Game access code")),
    responses((status = 200, description = "`game:update` and `flag` events; the current game is sent first", content_type = "text/event-stream", body = String))
)]
/// Stream game updates and proctor flags to connected clients.
pub async fn events(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    let (initial, receiver) = sse_service::subscribe(&state).await;
    info!(subscribers = state.sse().subscriber_count(), "New SSE connection");
    sse_service::to_sse_stream(initial, receiver)
}

/// Configure the SSE endpoint.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/events", get(events))
}
