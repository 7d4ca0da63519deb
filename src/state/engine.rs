use serde::Deserialize;
use tracing::debug;

use crate::state::{
    derived,
    error::EngineError,
    game::{Game, MAX_TEAMS, Phase, Team, TeamId},
    history::UndoHistory,
    scoring::{BetSubmission, ScoreChange, ScoreSubmission},
    tie_breaker::{TieBreakerClaim, TieBreakerOutcome},
};

/// Proctor roster used when no configuration overrides it.
pub const DEFAULT_PROCTOR_NAMES: [&str; 8] = [
    "Jorge", "Chloe", "Dal", "Jere", "Julian", "Duane", "Aze", "Denmark",
];

/// What happens when the Game Master closes scoring before every team was scored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringClosePolicy {
    /// Close anyway; the tracker keeps showing who was missed.
    #[default]
    Soft,
    /// Refuse with `ScoringIncomplete` until every eligible team is scored.
    RequireAll,
}

/// Knobs fixed for the lifetime of the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Names given to proctors `p1..` on every reset.
    pub proctor_names: Vec<String>,
    /// Behaviour of an early scoring close.
    pub close_policy: ScoringClosePolicy,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            proctor_names: DEFAULT_PROCTOR_NAMES.iter().map(|n| n.to_string()).collect(),
            close_policy: ScoringClosePolicy::default(),
        }
    }
}

/// Partial update of the round controls; absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateUpdate {
    /// New phase, applied with its preset.
    pub phase: Option<Phase>,
    /// Category label.
    pub round_label: Option<String>,
    /// Clue number, at least 1.
    pub clue_number: Option<u32>,
    /// Clue value, checked against the resulting phase.
    pub clue_value: Option<i64>,
    /// Scoring gate.
    pub scoring_open: Option<bool>,
    /// Betting gate, DIFFICULT only.
    pub bets_open: Option<bool>,
    /// Final round finished marker.
    pub post_final: Option<bool>,
}

/// Owner of the game object and its undo history.
///
/// Every mutating operation runs through [`GameEngine::mutate`]: it either
/// applies completely, refreshes derived values and records an undo snapshot,
/// or fails and leaves the game exactly as it was.
#[derive(Debug, Clone)]
pub struct GameEngine {
    game: Game,
    history: UndoHistory,
    settings: EngineSettings,
}

impl GameEngine {
    /// Engine holding a fresh game.
    pub fn new(settings: EngineSettings) -> Self {
        let mut game = Game::new(&settings.proctor_names);
        derived::recompute(&mut game);
        Self {
            game,
            history: UndoHistory::default(),
            settings,
        }
    }

    /// Current game.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Snapshots available to undo.
    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    fn mutate<T>(
        &mut self,
        op: impl FnOnce(&mut Game, &EngineSettings) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let before = self.game.clone();
        match op(&mut self.game, &self.settings) {
            Ok(value) => {
                derived::recompute(&mut self.game);
                self.history.push(before);
                Ok(value)
            }
            Err(err) => {
                self.game = before;
                Err(err)
            }
        }
    }

    /// Switch phase and apply its preset.
    pub fn set_phase(&mut self, phase: Phase) -> Result<(), EngineError> {
        self.mutate(|game, _| {
            game.enter_phase(phase);
            Ok(())
        })
    }

    /// Apply a partial update of the round controls, all or nothing.
    pub fn update_state(&mut self, update: StateUpdate) -> Result<(), EngineError> {
        self.mutate(|game, settings| game.apply_update(update, settings.close_policy))
    }

    /// Replace the roster. Clears assignments, bets, receipts and trackers.
    pub fn replace_teams(&mut self, names: &[String]) -> Result<(), EngineError> {
        self.mutate(|game, _| {
            let names = clean_names(names);
            if names.len() > MAX_TEAMS {
                return Err(EngineError::TooManyTeams {
                    requested: names.len(),
                    max: MAX_TEAMS,
                });
            }
            let teams = names
                .into_iter()
                .map(|name| game.mint_team(name))
                .collect::<Result<Vec<Team>, _>>()?;
            game.teams = teams;
            for proctor in &mut game.proctors {
                proctor.team_ids.clear();
            }
            game.bets.clear();
            game.score_receipts.clear();
            game.reset_trackers();
            Ok(())
        })
    }

    /// Append teams to the roster.
    pub fn add_teams(&mut self, names: &[String]) -> Result<(), EngineError> {
        self.mutate(|game, _| {
            let names = clean_names(names);
            let requested = game.teams.len() + names.len();
            if requested > MAX_TEAMS {
                return Err(EngineError::TooManyTeams {
                    requested,
                    max: MAX_TEAMS,
                });
            }
            for name in names {
                let team = game.mint_team(name)?;
                game.teams.push(team);
            }
            Ok(())
        })
    }

    /// Set a proctor's assignment list.
    pub fn assign_teams_to_proctor(
        &mut self,
        proctor_id: &str,
        team_ids: Vec<TeamId>,
    ) -> Result<(), EngineError> {
        self.mutate(|game, _| game.assign_teams(proctor_id, team_ids))
    }

    /// Split the roster across proctors in seat order.
    pub fn auto_assign_by_seat_order(&mut self) -> Result<(), EngineError> {
        self.mutate(|game, _| game.auto_assign())
    }

    /// Record a proctor's result for the current clue.
    pub fn score_by_proctor(
        &mut self,
        submission: &ScoreSubmission,
    ) -> Result<ScoreChange, EngineError> {
        self.mutate(|game, _| game.apply_score(submission))
    }

    /// Record a proctor's DIFFICULT wager.
    pub fn set_bet_by_proctor(&mut self, submission: &BetSubmission) -> Result<(), EngineError> {
        self.mutate(|game, _| game.apply_bet(submission))
    }

    /// Begin a new clincher clue between the currently tied teams.
    pub fn start_tie_breaker_clue(&mut self) -> Result<(), EngineError> {
        self.mutate(|game, _| game.start_tie_breaker_clue())
    }

    /// Open or pause the tie-breaker gate.
    pub fn open_tie_breaker_scoring(&mut self, open: bool) -> Result<(), EngineError> {
        self.mutate(|game, _| game.open_tie_breaker_scoring(open))
    }

    /// Record a correct tie-break answer. `Ok(false)` means it was already recorded.
    pub fn submit_tie_breaker_correct(&mut self, claim: &TieBreakerClaim) -> Result<bool, EngineError> {
        self.mutate(|game, _| game.submit_tie_breaker_correct(claim))
    }

    /// Close the tie-break clue and award the point when unambiguous.
    pub fn finalize_tie_breaker(&mut self) -> Result<TieBreakerOutcome, EngineError> {
        self.mutate(|game, _| game.finalize_tie_breaker())
    }

    /// Pick the winner of a finalized conflict.
    pub fn resolve_tie_breaker_winner(&mut self, team_id: &str) -> Result<(), EngineError> {
        self.mutate(|game, _| game.resolve_tie_breaker_winner(team_id))
    }

    /// Replace the game with a stored snapshot. Undoable.
    pub fn load_game(&mut self, loaded: Game) -> Result<(), EngineError> {
        self.mutate(|game, _| {
            *game = loaded;
            game.repair_team_sequence()
        })
    }

    /// Restore the most recent snapshot. Returns `false` when there is none.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.game = previous;
                derived::recompute(&mut self.game);
                debug!(remaining = self.history.len(), "undo applied");
                true
            }
            None => false,
        }
    }

    /// Start over with an empty game and no history.
    pub fn reset_game(&mut self) {
        self.game = Game::new(&self.settings.proctor_names);
        derived::recompute(&mut self.game);
        self.history.clear();
    }
}

fn clean_names(names: &[String]) -> Vec<String> {
    names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

impl Game {
    pub(crate) fn enter_phase(&mut self, phase: Phase) {
        let preset = phase.preset();
        self.state.phase = phase;
        self.state.seconds = preset.seconds;
        if let Some(value) = preset.default_clue_value {
            self.state.clue_value = value;
        }
        // Wagers never outlive a DIFFICULT visit.
        self.bets.clear();
        self.state.bets_open = false;
        if phase == Phase::Difficult {
            self.state.scoring_open = false;
        }
        self.reset_trackers();
    }

    fn apply_update(
        &mut self,
        update: StateUpdate,
        policy: ScoringClosePolicy,
    ) -> Result<(), EngineError> {
        let previous = self.state.clone();
        let phase = update.phase.unwrap_or(previous.phase);

        if let Some(number) = update.clue_number
            && number < 1
        {
            return Err(EngineError::InvalidClueNumber(number.into()));
        }
        if let Some(value) = update.clue_value {
            let allowed = phase.preset().allowed_values;
            if !allowed.is_empty() && !allowed.contains(&value) {
                return Err(EngineError::InvalidClueValue {
                    phase,
                    value,
                    allowed: allowed.to_vec(),
                });
            }
        }
        if update.bets_open == Some(true) && phase != Phase::Difficult {
            return Err(EngineError::BetsNotAllowed { phase });
        }

        let same_window = phase == previous.phase
            && update.clue_number.is_none_or(|n| n == previous.clue_number);
        if policy == ScoringClosePolicy::RequireAll
            && same_window
            && previous.scoring_open
            && update.scoring_open == Some(false)
        {
            let missing = self.scoring_tracker.missing();
            if !missing.is_empty() {
                return Err(EngineError::ScoringIncomplete { missing });
            }
        }

        if phase != previous.phase {
            self.enter_phase(phase);
        }
        if let Some(label) = update.round_label {
            self.state.round_label = label;
        }
        if let Some(number) = update.clue_number {
            self.state.clue_number = number;
        }
        if let Some(open) = update.scoring_open {
            self.state.scoring_open = open;
        }
        if let Some(value) = update.clue_value {
            self.state.clue_value = value;
        }
        if let Some(open) = update.bets_open {
            self.state.bets_open = open;
        }
        if let Some(post_final) = update.post_final {
            self.state.post_final = post_final;
        }

        let window_changed =
            self.state.phase != previous.phase || self.state.clue_number != previous.clue_number;
        if window_changed {
            self.reset_trackers();
        }
        if self.state.scoring_open && (window_changed || !previous.scoring_open) {
            self.start_scoring_tracker();
        }
        if self.state.bets_open && (window_changed || !previous.bets_open) {
            self.start_bet_tracker();
        }
        Ok(())
    }
}
