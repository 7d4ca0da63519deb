use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI document for the scoresheet backend.
#[openapi(
    paths(
        crate::routes::health::health,
        crate::routes::sse::events,
        crate::routes::game::get_game,
        crate::routes::game::reset_game,
        crate::routes::game::undo,
        crate::routes::game::save_game,
        crate::routes::game::load_game,
        crate::routes::teams::replace_teams,
        crate::routes::teams::add_teams,
        crate::routes::teams::import_csv,
        crate::routes::controller::update_state,
        crate::routes::controller::assign_teams,
        crate::routes::controller::auto_assign,
        crate::routes::controller::new_tie_breaker_clue,
        crate::routes::controller::open_tie_breaker,
        crate::routes::controller::finalize_tie_breaker,
        crate::routes::controller::resolve_tie_breaker,
        crate::routes::proctor::score,
        crate::routes::proctor::set_bet,
        crate::routes::proctor::tie_breaker_correct,
        crate::routes::proctor::raise_flag,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::game::GameResponse,
            crate::dto::game::UndoResponse,
            crate::dto::game::ImportResponse,
            crate::dto::game::FinalizeResponse,
            crate::dto::game::SubmissionResponse,
            crate::dto::game::SaveResponse,
            crate::dto::game::AckResponse,
            crate::dto::controller::StateUpdateRequest,
            crate::dto::controller::TeamsRequest,
            crate::dto::controller::ImportCsvRequest,
            crate::dto::controller::ImportMode,
            crate::dto::controller::AssignRequest,
            crate::dto::controller::TieBreakerOpenRequest,
            crate::dto::controller::ResolveRequest,
            crate::dto::proctor::ScoreRequest,
            crate::dto::proctor::BetRequest,
            crate::dto::proctor::ProctorTeamRequest,
            crate::dto::sse::FlagEvent,
            crate::error::ErrorBody,
            crate::state::game::Game,
            crate::state::game::Phase,
            crate::state::game::RoundState,
            crate::state::game::Team,
            crate::state::game::Proctor,
            crate::state::game::TieBreaker,
            crate::state::game::TieBreakerSubmission,
            crate::state::game::LeaderboardEntry,
            crate::state::game::Clincher,
            crate::state::game::ScoringTracker,
            crate::state::game::BetTracker,
            crate::state::tie_breaker::TieBreakerStage,
            crate::state::tie_breaker::TieBreakerOutcome,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events stream"),
        (name = "game", description = "Whole-game operations: read, reset, undo, save and load"),
        (name = "teams", description = "Roster management"),
        (name = "controller", description = "Game Master round controls"),
        (name = "tiebreaker", description = "Clincher clue protocol"),
        (name = "proctor", description = "Proctor scoring, bets and flags"),
    )
)]
pub struct ApiDoc;
