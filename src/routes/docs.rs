use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{services::documentation::ApiDoc, state::SharedState};

/// Path of the Swagger UI.
pub const DOCS_PATH: &str = "/docs";
/// Path of the raw OpenAPI document.
pub const OPENAPI_PATH: &str = "/api-doc/openapi.json";

/// Swagger UI for the scoresheet API. Open like the health check.
pub fn router(state: SharedState) -> Router<SharedState> {
    let mut doc = ApiDoc::openapi();
    doc.info.title = "Jeopardy scoresheet".into();
    doc.info.version = env!("CARGO_PKG_VERSION").into();

    let ui: Router<SharedState> = SwaggerUi::new(DOCS_PATH).url(OPENAPI_PATH, doc).into();
    ui.with_state(state)
}
