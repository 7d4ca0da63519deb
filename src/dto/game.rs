//! Response envelopes shared by the game endpoints.

use serde::Serialize;
use serde_with::skip_serializing_none;
use utoipa::ToSchema;

use crate::state::{game::Game, tie_breaker::TieBreakerOutcome};

/// `{ok, game}` envelope returned by every successful mutation.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameResponse {
    /// Always `true`.
    pub ok: bool,
    /// Game after the operation.
    pub game: Game,
}

impl GameResponse {
    /// Wrap a game in a successful envelope.
    pub fn new(game: Game) -> Self {
        Self { ok: true, game }
    }
}

/// Result of `POST /undo`; `ok` is `false` when nothing could be undone.
#[derive(Debug, Serialize, ToSchema)]
pub struct UndoResponse {
    /// Whether a snapshot was restored.
    pub ok: bool,
    /// Current game.
    pub game: Game,
}

/// Result of a CSV import.
#[derive(Debug, Serialize, ToSchema)]
pub struct ImportResponse {
    /// Always `true`.
    pub ok: bool,
    /// Number of team names taken from the text.
    pub imported: usize,
    /// Game after the import.
    pub game: Game,
}

/// Result of finalizing a tie-break clue.
#[derive(Debug, Serialize, ToSchema)]
pub struct FinalizeResponse {
    /// Always `true`.
    pub ok: bool,
    /// Whether the point was awarded or a manual resolve is needed.
    pub result: TieBreakerOutcome,
    /// Game after finalizing.
    pub game: Game,
}

/// Result of a tie-break correct report.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmissionResponse {
    /// Always `true`.
    pub ok: bool,
    /// `false` when the team had already been reported.
    pub recorded: bool,
    /// Game after the report.
    pub game: Game,
}

/// Result of a manual save.
#[skip_serializing_none]
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    /// Always `true`.
    pub ok: bool,
    /// Where the snapshot was written.
    pub location: String,
    /// RFC 3339 time of the write.
    pub saved_at: Option<String>,
}

/// Generic acknowledgement.
#[derive(Debug, Serialize, ToSchema)]
pub struct AckResponse {
    /// Always `true`.
    pub ok: bool,
}
