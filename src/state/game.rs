use std::str::FromStr;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use utoipa::ToSchema;

use crate::state::{error::EngineError, tie_breaker::TieBreakerStage};

/// Identifier of a team (`t1`, `t2`, ...).
pub type TeamId = String;
/// Identifier of a proctor (`p1` .. `p8`).
pub type ProctorId = String;

/// Maximum number of teams on the roster.
pub const MAX_TEAMS: usize = 40;
/// Maximum number of teams a single proctor may be responsible for.
pub const MAX_TEAMS_PER_PROCTOR: usize = 5;
/// Number of proctors created for every game.
pub const PROCTOR_COUNT: usize = 8;
/// Identifier of the single game hosted by the process.
pub const GAME_ID: &str = "local-game";
/// Category label shown before the Game Master sets one.
const DEFAULT_ROUND_LABEL: &str = "VIDEO GAMES";

/// Round type driving the scoring rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Correct answers earn the clue value.
    Easy,
    /// Correct answers earn the clue value, wrong answers lose it.
    Average,
    /// Teams wager part of their score; a score at or below zero eliminates.
    Difficult,
    /// Custom round, scored outside of the proctor path.
    Jackpot,
    /// Clincher round settled through the tie-breaker protocol.
    TieBreaker,
}

/// Static settings applied whenever a phase is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhasePreset {
    /// Countdown seed displayed to clients.
    pub seconds: u32,
    /// Clue values accepted in this phase; empty means unconstrained.
    pub allowed_values: &'static [i64],
    /// Clue value installed when the phase is entered.
    pub default_clue_value: Option<i64>,
}

impl Phase {
    /// Every phase in presentation order.
    pub const ALL: [Phase; 5] = [
        Phase::Easy,
        Phase::Average,
        Phase::Difficult,
        Phase::Jackpot,
        Phase::TieBreaker,
    ];

    /// Wire name of the phase.
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Easy => "EASY",
            Phase::Average => "AVERAGE",
            Phase::Difficult => "DIFFICULT",
            Phase::Jackpot => "JACKPOT",
            Phase::TieBreaker => "TIE_BREAKER",
        }
    }

    /// Preset table entry for the phase.
    pub fn preset(self) -> PhasePreset {
        match self {
            Phase::Easy => PhasePreset {
                seconds: 10,
                allowed_values: &[10, 20, 30, 40],
                default_clue_value: Some(10),
            },
            Phase::Average => PhasePreset {
                seconds: 15,
                allowed_values: &[20, 40, 60, 80],
                default_clue_value: Some(20),
            },
            Phase::Difficult | Phase::Jackpot | Phase::TieBreaker => PhasePreset {
                seconds: 30,
                allowed_values: &[],
                default_clue_value: None,
            },
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Phase::ALL
            .into_iter()
            .find(|phase| phase.as_str() == value)
            .ok_or_else(|| EngineError::InvalidPhase(value.to_string()))
    }
}

/// Outcome reported by a proctor for one team on one clue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreResult {
    /// The team answered correctly.
    Correct,
    /// The team answered incorrectly.
    Wrong,
    /// The team did not answer.
    NoAnswer,
}

impl FromStr for ScoreResult {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "correct" => Ok(ScoreResult::Correct),
            "wrong" => Ok(ScoreResult::Wrong),
            "no_answer" => Ok(ScoreResult::NoAnswer),
            other => Err(EngineError::InvalidResult(other.to_string())),
        }
    }
}

/// Round controls owned by the Game Master.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoundState {
    pub phase: Phase,
    /// Category label; display only.
    pub round_label: String,
    pub clue_number: u32,
    pub clue_value: i64,
    /// Gate for proctor scoring.
    pub scoring_open: bool,
    /// Gate for DIFFICULT wagers.
    pub bets_open: bool,
    /// Countdown seed from the phase preset; display only.
    pub seconds: u32,
    /// Set once the DIFFICULT round is over; required to start a tie-break.
    #[serde(default)]
    pub post_final: bool,
}

impl Default for RoundState {
    fn default() -> Self {
        let preset = Phase::Easy.preset();
        Self {
            phase: Phase::Easy,
            round_label: DEFAULT_ROUND_LABEL.to_string(),
            clue_number: 1,
            clue_value: preset.default_clue_value.unwrap_or_default(),
            scoring_open: true,
            bets_open: false,
            seconds: preset.seconds,
            post_final: false,
        }
    }
}

/// A competing team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub score: i64,
    /// One-way flag; never cleared once set.
    pub eliminated: bool,
}

/// A human scorer responsible for a handful of teams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Proctor {
    pub id: ProctorId,
    pub name: String,
    /// Assigned teams in seat order, disjoint from every other proctor.
    pub team_ids: Vec<TeamId>,
}

/// A "correct" report for one team during a tie-break clue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TieBreakerSubmission {
    pub team_id: TeamId,
    pub proctor_id: ProctorId,
    /// RFC 3339 timestamp of when the server recorded the report.
    pub ts: String,
}

/// Tie-breaker bookkeeping for the current clincher clue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TieBreaker {
    pub clue_id: u32,
    pub scoring_open: bool,
    pub submissions: Vec<TieBreakerSubmission>,
    pub winner_team_id: Option<TeamId>,
    pub conflict: bool,
    pub finalized: bool,
    /// Teams allowed to submit, frozen when the clue was started.
    pub candidate_team_ids: Vec<TeamId>,
}

/// Leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardEntry {
    pub id: TeamId,
    pub name: String,
    pub score: i64,
    pub eliminated: bool,
}

/// Whether a tie-break is needed and between which teams.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Clincher {
    pub needed: bool,
    pub tied_team_ids: Vec<TeamId>,
}

/// Progress of the current scoring window, for the Game Master view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoringTracker {
    /// `PHASE:clue:unix_millis`, or `None` when no window is tracked.
    pub key: Option<String>,
    pub eligible_team_ids: Vec<TeamId>,
    pub received_team_ids: Vec<TeamId>,
}

impl ScoringTracker {
    /// Eligible teams that have not been scored yet in this window.
    pub fn missing(&self) -> Vec<TeamId> {
        self.eligible_team_ids
            .iter()
            .filter(|id| !self.received_team_ids.contains(id))
            .cloned()
            .collect()
    }
}

/// Progress of the current DIFFICULT betting window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BetTracker {
    pub key: Option<String>,
    pub eligible_team_ids: Vec<TeamId>,
    pub submitted_team_ids: Vec<TeamId>,
}

/// The single authoritative game object, broadcast and persisted as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    pub state: RoundState,
    pub tie_breaker: TieBreaker,
    pub teams: Vec<Team>,
    pub proctors: Vec<Proctor>,
    /// DIFFICULT wagers keyed by team id.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub bets: IndexMap<TeamId, i64>,
    /// Teams already scored, keyed by `PHASE:clue`.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub score_receipts: IndexMap<String, IndexSet<TeamId>>,
    /// Next number used to mint a team id.
    #[serde(default)]
    pub next_team_number: u32,
    #[serde(default)]
    pub leaderboard: Vec<LeaderboardEntry>,
    #[serde(default)]
    pub clincher: Clincher,
    #[serde(default)]
    pub scoring_tracker: ScoringTracker,
    #[serde(default)]
    pub bet_tracker: BetTracker,
    #[serde(default)]
    pub tie_breaker_stage: TieBreakerStage,
}

impl Game {
    /// Fresh game: EASY phase, no teams, one empty proctor per name.
    pub fn new(proctor_names: &[String]) -> Self {
        let proctors = proctor_names
            .iter()
            .enumerate()
            .map(|(index, name)| Proctor {
                id: format!("p{}", index + 1),
                name: name.clone(),
                team_ids: Vec::new(),
            })
            .collect();

        Self {
            id: GAME_ID.to_string(),
            state: RoundState::default(),
            tie_breaker: TieBreaker::default(),
            teams: Vec::new(),
            proctors,
            bets: IndexMap::new(),
            score_receipts: IndexMap::new(),
            next_team_number: 1,
            leaderboard: Vec::new(),
            clincher: Clincher::default(),
            scoring_tracker: ScoringTracker::default(),
            bet_tracker: BetTracker::default(),
            tie_breaker_stage: TieBreakerStage::Idle,
        }
    }

    /// Look up a team by id.
    pub fn team(&self, team_id: &str) -> Option<&Team> {
        self.teams.iter().find(|team| team.id == team_id)
    }

    pub(crate) fn team_mut(&mut self, team_id: &str) -> Option<&mut Team> {
        self.teams.iter_mut().find(|team| team.id == team_id)
    }

    /// Look up a proctor by id.
    pub fn proctor(&self, proctor_id: &str) -> Option<&Proctor> {
        self.proctors.iter().find(|proctor| proctor.id == proctor_id)
    }

    /// Check that the proctor exists and is assigned to the team.
    pub fn authorize(&self, proctor_id: &str, team_id: &str) -> Result<(), EngineError> {
        let proctor = self
            .proctor(proctor_id)
            .ok_or_else(|| EngineError::ProctorNotFound(proctor_id.to_string()))?;
        if !proctor.team_ids.iter().any(|id| id == team_id) {
            return Err(EngineError::ProctorNotAuthorized {
                proctor_id: proctor_id.to_string(),
                team_id: team_id.to_string(),
            });
        }
        Ok(())
    }

    /// Receipt key for the clue currently on the board.
    pub fn phase_clue_key(&self) -> String {
        format!("{}:{}", self.state.phase, self.state.clue_number)
    }

    pub(crate) fn has_scored(&self, team_id: &str) -> bool {
        self.score_receipts
            .get(&self.phase_clue_key())
            .is_some_and(|teams| teams.contains(team_id))
    }

    pub(crate) fn mark_scored(&mut self, team_id: &str) {
        let key = self.phase_clue_key();
        self.score_receipts
            .entry(key)
            .or_default()
            .insert(team_id.to_string());
    }

    pub(crate) fn mint_team(&mut self, name: String) -> Result<Team, EngineError> {
        let number = self.next_team_number;
        self.next_team_number = number
            .checked_add(1)
            .ok_or(EngineError::TeamSequenceExhausted)?;
        Ok(Team {
            id: format!("t{number}"),
            name,
            score: 0,
            eliminated: false,
        })
    }

    /// Raise `next_team_number` above every numeric id already in use, so a
    /// game loaded from an older snapshot never mints a duplicate.
    pub(crate) fn repair_team_sequence(&mut self) -> Result<(), EngineError> {
        let highest = self
            .teams
            .iter()
            .filter_map(|team| team.id.strip_prefix('t')?.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        let next = highest
            .checked_add(1)
            .ok_or(EngineError::TeamSequenceExhausted)?;
        self.next_team_number = self.next_team_number.max(next);
        Ok(())
    }

    pub(crate) fn reset_trackers(&mut self) {
        self.scoring_tracker = ScoringTracker::default();
        self.bet_tracker = BetTracker::default();
    }

    pub(crate) fn start_scoring_tracker(&mut self) {
        let phase = self.state.phase;
        let eligible_team_ids = self
            .teams
            .iter()
            .filter(|team| eligible_for_scoring(team, phase))
            .map(|team| team.id.clone())
            .collect();
        self.scoring_tracker = ScoringTracker {
            key: Some(self.window_key()),
            eligible_team_ids,
            received_team_ids: Vec::new(),
        };
    }

    pub(crate) fn start_bet_tracker(&mut self) {
        if self.state.phase != Phase::Difficult {
            return;
        }
        let eligible_team_ids = self
            .teams
            .iter()
            .filter(|team| eligible_for_bet(team))
            .map(|team| team.id.clone())
            .collect();
        self.bet_tracker = BetTracker {
            key: Some(self.window_key()),
            eligible_team_ids,
            submitted_team_ids: Vec::new(),
        };
    }

    fn window_key(&self) -> String {
        format!("{}:{}", self.phase_clue_key(), unix_millis())
    }
}

/// Whether a team is expected to be scored in the current window.
pub fn eligible_for_scoring(team: &Team, phase: Phase) -> bool {
    if team.eliminated {
        return false;
    }
    // DIFFICULT disqualifies teams that could not wager.
    !(phase == Phase::Difficult && team.score <= 0)
}

/// Whether a team may place a DIFFICULT wager.
pub fn eligible_for_bet(team: &Team) -> bool {
    !team.eliminated && team.score > 0
}

pub(crate) fn unix_millis() -> i128 {
    OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000
}

pub(crate) fn rfc3339_now() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
