/// OpenAPI documentation generation.
pub mod documentation;
/// Game Master operations on the shared game.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// CSV roster import.
pub mod import_service;
/// Debounced snapshot saving and startup restore.
pub mod persistence;
/// Operations issued from proctor devices.
pub mod proctor_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
