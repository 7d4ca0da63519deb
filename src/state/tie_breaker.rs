use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::{
    derived,
    error::EngineError,
    game::{Game, Phase, TeamId, TieBreaker, TieBreakerSubmission, rfc3339_now},
};

/// Where the current clincher clue stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TieBreakerStage {
    /// Game is not in TIE_BREAKER.
    #[default]
    Idle,
    /// In TIE_BREAKER, no clue started yet.
    Armed,
    /// A clue is running and proctors may report correct answers.
    Open,
    /// Finalized with no conflict and no winner recorded.
    ///
    /// Finalizing a single submission awards the point at once, so the engine
    /// itself passes straight to [`TieBreakerStage::Resolved`]; this stage
    /// only shows for a game loaded in that shape.
    ClosedSingle,
    /// Finalized with several submissions; the Game Master must pick.
    ClosedConflict,
    /// A winner was awarded the clincher point.
    Resolved,
}

impl TieBreakerStage {
    /// Derive the stage from the game.
    pub fn of(game: &Game) -> Self {
        let tb = &game.tie_breaker;
        if game.state.phase != Phase::TieBreaker {
            return TieBreakerStage::Idle;
        }
        if tb.finalized {
            if tb.winner_team_id.is_some() {
                return TieBreakerStage::Resolved;
            }
            if tb.conflict {
                return TieBreakerStage::ClosedConflict;
            }
            return TieBreakerStage::ClosedSingle;
        }
        if tb.clue_id == 0 {
            return TieBreakerStage::Armed;
        }
        TieBreakerStage::Open
    }
}

/// A proctor's claim that a team answered the tie-break clue correctly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TieBreakerClaim {
    /// Reporting proctor.
    pub proctor_id: String,
    /// Claimed team.
    pub team_id: TeamId,
}

/// Result of finalizing a tie-break clue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TieBreakerOutcome {
    /// Exactly one team answered and received the point.
    #[serde(rename_all = "camelCase")]
    WinnerSet {
        /// Winning team.
        winner_team_id: TeamId,
    },
    /// Several teams answered; a manual resolve is required.
    #[serde(rename_all = "camelCase")]
    NeedsResolve {
        /// Teams that submitted, in arrival order.
        team_ids: Vec<TeamId>,
    },
}

impl Game {
    fn ensure_tie_breaker_phase(&self) -> Result<(), EngineError> {
        if self.state.phase != Phase::TieBreaker {
            return Err(EngineError::NotInTieBreaker);
        }
        Ok(())
    }

    pub(crate) fn start_tie_breaker_clue(&mut self) -> Result<(), EngineError> {
        self.ensure_tie_breaker_phase()?;
        if !self.state.post_final {
            return Err(EngineError::FinalRoundPending);
        }
        let clincher = derived::clincher(&self.teams);
        if !clincher.needed {
            return Err(EngineError::NoClincher);
        }

        self.tie_breaker = TieBreaker {
            clue_id: self.tie_breaker.clue_id.saturating_add(1),
            scoring_open: true,
            candidate_team_ids: clincher.tied_team_ids,
            ..TieBreaker::default()
        };
        Ok(())
    }

    pub(crate) fn open_tie_breaker_scoring(&mut self, open: bool) -> Result<(), EngineError> {
        self.ensure_tie_breaker_phase()?;
        if self.tie_breaker.finalized {
            return Err(EngineError::AlreadyFinalized);
        }
        self.tie_breaker.scoring_open = open;
        Ok(())
    }

    /// Returns `false` when the team had already been reported for this clue.
    pub(crate) fn submit_tie_breaker_correct(
        &mut self,
        claim: &TieBreakerClaim,
    ) -> Result<bool, EngineError> {
        self.ensure_tie_breaker_phase()?;
        if self.tie_breaker.finalized {
            return Err(EngineError::AlreadyFinalized);
        }
        if !self.tie_breaker.scoring_open {
            return Err(EngineError::TieBreakerClosed);
        }
        self.authorize(&claim.proctor_id, &claim.team_id)?;
        let team = self
            .team(&claim.team_id)
            .ok_or_else(|| EngineError::UnknownTeam(claim.team_id.clone()))?;
        if team.eliminated {
            return Err(EngineError::TeamEliminated(team.id.clone()));
        }
        if !self.tie_breaker.candidate_team_ids.contains(&claim.team_id) {
            return Err(EngineError::NotACandidate(claim.team_id.clone()));
        }

        let tb = &mut self.tie_breaker;
        if tb.submissions.iter().any(|s| s.team_id == claim.team_id) {
            return Ok(false);
        }
        tb.submissions.push(TieBreakerSubmission {
            team_id: claim.team_id.clone(),
            proctor_id: claim.proctor_id.clone(),
            ts: rfc3339_now(),
        });
        tb.conflict = tb.submissions.len() > 1;
        Ok(true)
    }

    pub(crate) fn finalize_tie_breaker(&mut self) -> Result<TieBreakerOutcome, EngineError> {
        self.ensure_tie_breaker_phase()?;
        if self.tie_breaker.finalized {
            return Err(EngineError::AlreadyFinalized);
        }
        if !self.tie_breaker.scoring_open {
            return Err(EngineError::TieBreakerClosed);
        }
        if self.tie_breaker.submissions.is_empty() {
            return Err(EngineError::NoSubmissions);
        }

        let tb = &mut self.tie_breaker;
        tb.scoring_open = false;
        tb.finalized = true;
        if let [single] = tb.submissions.as_slice() {
            let team_id = single.team_id.clone();
            tb.conflict = false;
            tb.winner_team_id = Some(team_id.clone());
            self.award_clincher_point(&team_id);
            return Ok(TieBreakerOutcome::WinnerSet {
                winner_team_id: team_id,
            });
        }

        tb.conflict = true;
        tb.winner_team_id = None;
        Ok(TieBreakerOutcome::NeedsResolve {
            team_ids: tb.submissions.iter().map(|s| s.team_id.clone()).collect(),
        })
    }

    pub(crate) fn resolve_tie_breaker_winner(&mut self, team_id: &str) -> Result<(), EngineError> {
        self.ensure_tie_breaker_phase()?;
        let tb = &self.tie_breaker;
        if tb.winner_team_id.is_some() {
            return Err(EngineError::WinnerAlreadySet);
        }
        if !tb.finalized || !tb.conflict {
            return Err(EngineError::NoConflictToResolve);
        }
        if !tb.submissions.iter().any(|s| s.team_id == team_id) {
            return Err(EngineError::NotACandidate(team_id.to_string()));
        }

        self.tie_breaker.winner_team_id = Some(team_id.to_string());
        self.tie_breaker.conflict = false;
        self.award_clincher_point(team_id);
        Ok(())
    }

    fn award_clincher_point(&mut self, team_id: &str) {
        if let Some(team) = self.team_mut(team_id) {
            team.score = team.score.saturating_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::engine::{EngineSettings, GameEngine, StateUpdate};

    /// Engine in TIE_BREAKER after the final, one team per proctor, given scores.
    fn engine_with_scores(scores: &[i64]) -> GameEngine {
        let mut engine = GameEngine::new(EngineSettings::default());
        let names: Vec<String> = (1..=scores.len()).map(|i| format!("Team {i}")).collect();
        engine.replace_teams(&names).unwrap();
        engine.auto_assign_by_seat_order().unwrap();

        let mut game = engine.game().clone();
        for (team, score) in game.teams.iter_mut().zip(scores) {
            team.score = *score;
        }
        game.state.phase = Phase::TieBreaker;
        game.state.post_final = true;
        game.state.scoring_open = false;
        engine.load_game(game).unwrap();
        engine
    }

    fn claim(proctor: &str, team: &str) -> TieBreakerClaim {
        TieBreakerClaim {
            proctor_id: proctor.into(),
            team_id: team.into(),
        }
    }

    #[test]
    fn start_requires_tie_breaker_phase_and_final() {
        let mut engine = engine_with_scores(&[10, 10]);
        engine.set_phase(Phase::Average).unwrap();
        assert_eq!(engine.start_tie_breaker_clue(), Err(EngineError::NotInTieBreaker));

        engine.set_phase(Phase::TieBreaker).unwrap();
        engine
            .update_state(StateUpdate {
                post_final: Some(false),
                ..StateUpdate::default()
            })
            .unwrap();
        assert_eq!(engine.start_tie_breaker_clue(), Err(EngineError::FinalRoundPending));
    }

    #[test]
    fn start_without_tie_is_rejected() {
        let mut engine = engine_with_scores(&[30, 20, 10]);
        assert_eq!(engine.start_tie_breaker_clue(), Err(EngineError::NoClincher));
        assert_eq!(engine.game().tie_breaker_stage, TieBreakerStage::Armed);
    }

    #[test]
    fn single_submission_wins_the_point() {
        let mut engine = engine_with_scores(&[20, 20, 5]);
        engine.start_tie_breaker_clue().unwrap();
        assert_eq!(engine.game().tie_breaker_stage, TieBreakerStage::Open);
        assert_eq!(engine.game().tie_breaker.candidate_team_ids, ["t1", "t2"]);

        assert!(engine.submit_tie_breaker_correct(&claim("p2", "t2")).unwrap());
        let outcome = engine.finalize_tie_breaker().unwrap();
        assert_eq!(outcome, TieBreakerOutcome::WinnerSet {
                winner_team_id: "t2".into()
            });

        let game = engine.game();
        assert_eq!(game.team("t2").unwrap().score, 21);
        assert_eq!(game.tie_breaker_stage, TieBreakerStage::Resolved);
        assert!(!game.clincher.needed);
        assert_eq!(
            engine.resolve_tie_breaker_winner("t1"),
            Err(EngineError::WinnerAlreadySet)
        );
    }

    #[test]
    fn conflict_requires_manual_resolution() {
        let mut engine = engine_with_scores(&[20, 20]);
        engine.start_tie_breaker_clue().unwrap();
        engine.submit_tie_breaker_correct(&claim("p1", "t1")).unwrap();
        engine.submit_tie_breaker_correct(&claim("p2", "t2")).unwrap();
        assert!(engine.game().tie_breaker.conflict);

        let outcome = engine.finalize_tie_breaker().unwrap();
        assert_eq!(
            outcome,
            TieBreakerOutcome::NeedsResolve {
                team_ids: vec!["t1".into(), "t2".into()]
            }
        );
        assert_eq!(engine.game().tie_breaker_stage, TieBreakerStage::ClosedConflict);
        assert_eq!(engine.finalize_tie_breaker(), Err(EngineError::AlreadyFinalized));

        engine.resolve_tie_breaker_winner("t1").unwrap();
        let game = engine.game();
        assert_eq!(game.tie_breaker.winner_team_id.as_deref(), Some("t1"));
        assert!(!game.tie_breaker.conflict);
        assert_eq!(game.team("t1").unwrap().score, 21);
        assert_eq!(game.team("t2").unwrap().score, 20);
        assert_eq!(game.tie_breaker_stage, TieBreakerStage::Resolved);

        for team in ["t2", "t1"] {
            assert_eq!(
                engine.resolve_tie_breaker_winner(team),
                Err(EngineError::WinnerAlreadySet)
            );
        }
        assert_eq!(engine.game().team("t2").unwrap().score, 20);
    }

    #[test]
    fn repeated_submission_is_a_no_op() {
        let mut engine = engine_with_scores(&[20, 20]);
        engine.start_tie_breaker_clue().unwrap();
        assert!(engine.submit_tie_breaker_correct(&claim("p1", "t1")).unwrap());
        assert!(!engine.submit_tie_breaker_correct(&claim("p1", "t1")).unwrap());
        assert_eq!(engine.game().tie_breaker.submissions.len(), 1);
        assert!(!engine.game().tie_breaker.conflict);
    }

    #[test]
    fn closed_gate_rejects_submissions_and_finalize() {
        let mut engine = engine_with_scores(&[20, 20]);
        engine.start_tie_breaker_clue().unwrap();
        engine.open_tie_breaker_scoring(false).unwrap();
        assert_eq!(
            engine.submit_tie_breaker_correct(&claim("p1", "t1")),
            Err(EngineError::TieBreakerClosed)
        );
        assert_eq!(engine.finalize_tie_breaker(), Err(EngineError::TieBreakerClosed));

        engine.open_tie_breaker_scoring(true).unwrap();
        assert_eq!(engine.finalize_tie_breaker(), Err(EngineError::NoSubmissions));
    }

    #[test]
    fn candidates_stay_frozen_when_scores_move() {
        let mut engine = engine_with_scores(&[20, 20, 5]);
        engine.start_tie_breaker_clue().unwrap();

        let mut game = engine.game().clone();
        game.teams[1].score = 4;
        game.teams[2].score = 20;
        engine.load_game(game).unwrap();
        assert_eq!(engine.game().clincher.tied_team_ids, ["t1", "t3"]);

        assert_eq!(
            engine.submit_tie_breaker_correct(&claim("p3", "t3")),
            Err(EngineError::NotACandidate("t3".into()))
        );
        assert!(engine.submit_tie_breaker_correct(&claim("p2", "t2")).unwrap());
    }

    #[test]
    fn undo_keeps_candidates_frozen() {
        let mut engine = engine_with_scores(&[20, 20, 5]);
        engine.start_tie_breaker_clue().unwrap();

        let mut game = engine.game().clone();
        game.teams[1].score = 4;
        game.teams[2].score = 20;
        engine.load_game(game).unwrap();
        engine.submit_tie_breaker_correct(&claim("p1", "t1")).unwrap();

        // Back to the adjusted scores, with the clue still running.
        assert!(engine.undo());
        let game = engine.game();
        assert!(game.tie_breaker.submissions.is_empty());
        assert_eq!(game.clincher.tied_team_ids, ["t1", "t3"]);
        assert_eq!(game.tie_breaker.candidate_team_ids, ["t1", "t2"]);

        assert_eq!(
            engine.submit_tie_breaker_correct(&claim("p3", "t3")),
            Err(EngineError::NotACandidate("t3".into()))
        );
        assert!(engine.submit_tie_breaker_correct(&claim("p2", "t2")).unwrap());
    }

    #[test]
    fn finalized_game_without_winner_or_conflict_is_closed_single() {
        let mut engine = engine_with_scores(&[20, 20]);
        engine.start_tie_breaker_clue().unwrap();
        engine.submit_tie_breaker_correct(&claim("p1", "t1")).unwrap();

        let mut game = engine.game().clone();
        game.tie_breaker.finalized = true;
        engine.load_game(game).unwrap();
        assert_eq!(engine.game().tie_breaker_stage, TieBreakerStage::ClosedSingle);
        assert_eq!(
            engine.resolve_tie_breaker_winner("t1"),
            Err(EngineError::NoConflictToResolve)
        );

        assert_eq!(engine.finalize_tie_breaker(), Err(EngineError::AlreadyFinalized));
        engine.start_tie_breaker_clue().unwrap();
        assert_eq!(engine.game().tie_breaker_stage, TieBreakerStage::Open);
    }

    #[test]
    fn proctor_must_own_the_team() {
        let mut engine = engine_with_scores(&[20, 20]);
        engine.start_tie_breaker_clue().unwrap();
        assert!(matches!(
            engine.submit_tie_breaker_correct(&claim("p1", "t2")),
            Err(EngineError::ProctorNotAuthorized { .. })
        ));
    }

    #[test]
    fn resolve_only_accepts_submitters() {
        let mut engine = engine_with_scores(&[20, 20, 20]);
        engine.start_tie_breaker_clue().unwrap();
        assert_eq!(
            engine.resolve_tie_breaker_winner("t1"),
            Err(EngineError::NoConflictToResolve)
        );
        engine.submit_tie_breaker_correct(&claim("p1", "t1")).unwrap();
        engine.submit_tie_breaker_correct(&claim("p2", "t2")).unwrap();
        engine.finalize_tie_breaker().unwrap();
        assert_eq!(
            engine.resolve_tie_breaker_winner("t3"),
            Err(EngineError::NotACandidate("t3".into()))
        );
    }

    #[test]
    fn undo_restores_the_open_clue() {
        let mut engine = engine_with_scores(&[20, 20]);
        engine.start_tie_breaker_clue().unwrap();
        engine.submit_tie_breaker_correct(&claim("p1", "t1")).unwrap();
        engine.finalize_tie_breaker().unwrap();
        assert_eq!(engine.game().team("t1").unwrap().score, 21);

        assert!(engine.undo());
        let game = engine.game();
        assert_eq!(game.team("t1").unwrap().score, 20);
        assert!(!game.tie_breaker.finalized);
        assert_eq!(game.tie_breaker_stage, TieBreakerStage::Open);
    }
}
