use thiserror::Error;

use crate::state::game::{Phase, ProctorId, TeamId};

/// Rule violations raised by the engine. A rejected operation leaves the game untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Unknown phase name.
    #[error("invalid phase `{0}`")]
    InvalidPhase(String),
    /// Clue value outside the phase's allowed set.
    #[error("clue value {value} is not allowed in {phase} (allowed: {allowed:?})")]
    InvalidClueValue {
        /// Phase the value was checked against.
        phase: Phase,
        /// Rejected value.
        value: i64,
        /// Values accepted by the phase.
        allowed: Vec<i64>,
    },
    /// Clue numbers start at 1 and fit in 32 bits.
    #[error("clue number must be between 1 and {max}, got {0}", max = u32::MAX)]
    InvalidClueNumber(i64),
    /// Bets can only be opened or placed in DIFFICULT.
    #[error("bets are only allowed in DIFFICULT, current phase is {phase}")]
    BetsNotAllowed {
        /// Phase the request was made in.
        phase: Phase,
    },
    /// The betting window is closed.
    #[error("bets are closed")]
    BetsClosed,
    /// Roster would exceed the team limit.
    #[error("too many teams: {requested} requested, max {max}")]
    TooManyTeams {
        /// Resulting roster size.
        requested: usize,
        /// Roster limit.
        max: usize,
    },
    /// No proctor with this id.
    #[error("proctor `{0}` not found")]
    ProctorNotFound(ProctorId),
    /// Assignment list longer than a proctor can handle.
    #[error("a proctor can handle at most {max} teams, {requested} requested")]
    TooManyTeamsForProctor {
        /// Length of the submitted list.
        requested: usize,
        /// Per-proctor limit.
        max: usize,
    },
    /// No team with this id.
    #[error("unknown team `{0}`")]
    UnknownTeam(TeamId),
    /// Team listed twice in one assignment.
    #[error("team `{0}` listed more than once")]
    DuplicateTeam(TeamId),
    /// Team already belongs to another proctor.
    #[error("team `{team_id}` is already assigned to proctor `{proctor_id}`")]
    TeamAlreadyAssigned {
        /// Contested team.
        team_id: TeamId,
        /// Current owner.
        proctor_id: ProctorId,
    },
    /// The scoring gate is closed.
    #[error("scoring is closed")]
    ScoringClosed,
    /// Strict close policy refused to close the window early.
    #[error("scoring cannot close, {} team(s) not scored yet", missing.len())]
    ScoringIncomplete {
        /// Eligible teams still waiting for a result.
        missing: Vec<TeamId>,
    },
    /// Proctor tried to act on a team outside their assignment.
    #[error("proctor `{proctor_id}` is not assigned to team `{team_id}`")]
    ProctorNotAuthorized {
        /// Acting proctor.
        proctor_id: ProctorId,
        /// Target team.
        team_id: TeamId,
    },
    /// Eliminated teams can no longer be scored or bet for.
    #[error("team `{0}` is eliminated")]
    TeamEliminated(TeamId),
    /// Unknown score result.
    #[error("invalid result `{0}`, expected correct, wrong or no_answer")]
    InvalidResult(String),
    /// The team already has a result for this clue.
    #[error("team `{team_id}` already scored for {key}")]
    AlreadyScored {
        /// Scored team.
        team_id: TeamId,
        /// `PHASE:clue` receipt key.
        key: String,
    },
    /// Wager rejected.
    #[error("invalid bet: {0}")]
    InvalidBet(String),
    /// Tie-breaker action outside TIE_BREAKER.
    #[error("not in TIE_BREAKER phase")]
    NotInTieBreaker,
    /// Tie-breaker gate is closed.
    #[error("tie-breaker scoring is closed")]
    TieBreakerClosed,
    /// The current tie-breaker clue was already finalized.
    #[error("tie-breaker clue already finalized")]
    AlreadyFinalized,
    /// Tie-breaks can only start after the final round.
    #[error("the final round is not over yet")]
    FinalRoundPending,
    /// Nothing to break.
    #[error("no clincher is needed")]
    NoClincher,
    /// Team is not eligible for this tie-break step.
    #[error("team `{0}` is not a tie-breaker candidate")]
    NotACandidate(TeamId),
    /// Finalize called before any proctor reported a correct answer.
    #[error("no tie-breaker submissions to finalize")]
    NoSubmissions,
    /// Resolve called without a finalized conflict.
    #[error("there is no tie-breaker conflict to resolve")]
    NoConflictToResolve,
    /// The clue already has a winner.
    #[error("tie-breaker winner already set")]
    WinnerAlreadySet,
    /// No team id is left in the `t<n>` sequence.
    #[error("team id sequence exhausted")]
    TeamSequenceExhausted,
    /// Seat-order auto-assign would overload proctors.
    #[error("auto-assign needs {chunk_size} teams per proctor, max {max}")]
    CapacityExceeded {
        /// Teams per proctor the split would require.
        chunk_size: usize,
        /// Per-proctor limit.
        max: usize,
    },
}

impl EngineError {
    /// Stable machine-readable code sent to clients alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::InvalidPhase(_) => "INVALID_PHASE",
            EngineError::InvalidClueValue { .. } => "INVALID_CLUE_VALUE",
            EngineError::InvalidClueNumber(_) => "INVALID_CLUE_NUMBER",
            EngineError::BetsNotAllowed { .. } => "BETS_NOT_ALLOWED",
            EngineError::BetsClosed => "BETS_CLOSED",
            EngineError::TooManyTeams { .. } => "TOO_MANY_TEAMS",
            EngineError::ProctorNotFound(_) => "PROCTOR_NOT_FOUND",
            EngineError::TooManyTeamsForProctor { .. } => "TOO_MANY_TEAMS_FOR_PROCTOR",
            EngineError::UnknownTeam(_) => "UNKNOWN_TEAM",
            EngineError::DuplicateTeam(_) => "DUPLICATE_TEAM",
            EngineError::TeamAlreadyAssigned { .. } => "TEAM_ALREADY_ASSIGNED",
            EngineError::ScoringClosed => "SCORING_CLOSED",
            EngineError::ScoringIncomplete { .. } => "SCORING_INCOMPLETE",
            EngineError::ProctorNotAuthorized { .. } => "PROCTOR_NOT_AUTHORIZED",
            EngineError::TeamEliminated(_) => "TEAM_ELIMINATED",
            EngineError::InvalidResult(_) => "INVALID_RESULT",
            EngineError::AlreadyScored { .. } => "ALREADY_SCORED",
            EngineError::InvalidBet(_) => "INVALID_BET",
            EngineError::NotInTieBreaker => "NOT_IN_TIE_BREAKER",
            EngineError::TieBreakerClosed => "TIE_BREAKER_CLOSED",
            EngineError::AlreadyFinalized => "ALREADY_FINALIZED",
            EngineError::FinalRoundPending => "FINAL_ROUND_PENDING",
            EngineError::NoClincher => "NO_CLINCHER",
            EngineError::NotACandidate(_) => "NOT_A_CANDIDATE",
            EngineError::NoSubmissions => "NO_SUBMISSIONS",
            EngineError::NoConflictToResolve => "NO_CONFLICT_TO_RESOLVE",
            EngineError::WinnerAlreadySet => "WINNER_ALREADY_SET",
            EngineError::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            EngineError::TeamSequenceExhausted => "TEAM_SEQUENCE_EXHAUSTED",
        }
    }

    /// Broad class of the violation, used to pick a transport status.
    pub fn kind(&self) -> RuleKind {
        match self {
            EngineError::ProctorNotAuthorized { .. } => RuleKind::Forbidden,
            EngineError::ProctorNotFound(_) | EngineError::UnknownTeam(_) => RuleKind::Missing,
            EngineError::BetsNotAllowed { .. }
            | EngineError::BetsClosed
            | EngineError::TeamAlreadyAssigned { .. }
            | EngineError::ScoringClosed
            | EngineError::ScoringIncomplete { .. }
            | EngineError::TeamEliminated(_)
            | EngineError::AlreadyScored { .. }
            | EngineError::NotInTieBreaker
            | EngineError::TieBreakerClosed
            | EngineError::AlreadyFinalized
            | EngineError::FinalRoundPending
            | EngineError::NoClincher
            | EngineError::NoSubmissions
            | EngineError::NoConflictToResolve
            | EngineError::WinnerAlreadySet => RuleKind::Conflict,
            _ => RuleKind::Invalid,
        }
    }
}

/// Classification of [`EngineError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Malformed or out-of-range input.
    Invalid,
    /// Referenced proctor or team does not exist.
    Missing,
    /// Actor is not allowed to touch the target.
    Forbidden,
    /// Request is well formed but the game is not in a state that accepts it.
    Conflict,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_screaming_snake_case() {
        let samples = [
            EngineError::ScoringClosed,
            EngineError::InvalidBet("negative".into()),
            EngineError::TooManyTeamsForProctor {
                requested: 6,
                max: 5,
            },
        ];
        for error in samples {
            let code = error.code();
            assert!(code.chars().all(|c| c.is_ascii_uppercase() || c == '_'), "{code}");
        }
    }

    #[test]
    fn authorization_and_lookup_errors_are_classified() {
        let forbidden = EngineError::ProctorNotAuthorized {
            proctor_id: "p1".into(),
            team_id: "t3".into(),
        };
        assert_eq!(forbidden.kind(), RuleKind::Forbidden);
        assert_eq!(EngineError::UnknownTeam("t9".into()).kind(), RuleKind::Missing);
        assert_eq!(EngineError::AlreadyFinalized.kind(), RuleKind::Conflict);
        assert_eq!(EngineError::InvalidClueNumber(0).kind(), RuleKind::Invalid);
    }

    #[test]
    fn incomplete_message_counts_missing_teams() {
        let error = EngineError::ScoringIncomplete {
            missing: vec!["t1".into(), "t2".into()],
        };
        assert_eq!(error.to_string(), "scoring cannot close, 2 team(s) not scored yet");
    }
}
