use crate::state::{
    error::EngineError,
    game::{Game, Phase, ScoreResult, TeamId},
};

/// A proctor's result for one team on the current clue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSubmission {
    /// Reporting proctor.
    pub proctor_id: String,
    /// Scored team.
    pub team_id: TeamId,
    /// Reported outcome.
    pub result: ScoreResult,
}

/// A proctor's DIFFICULT wager for one team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BetSubmission {
    /// Reporting proctor.
    pub proctor_id: String,
    /// Betting team.
    pub team_id: TeamId,
    /// Wager amount.
    pub bet: i64,
}

/// Effect of an accepted score submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreChange {
    /// Scored team.
    pub team_id: TeamId,
    /// Points added (negative when lost).
    pub delta: i64,
    /// Score after the change.
    pub score: i64,
    /// Whether this submission eliminated the team.
    pub eliminated: bool,
}

impl Game {
    pub(crate) fn apply_score(
        &mut self,
        submission: &ScoreSubmission,
    ) -> Result<ScoreChange, EngineError> {
        if !self.state.scoring_open {
            return Err(EngineError::ScoringClosed);
        }
        self.authorize(&submission.proctor_id, &submission.team_id)?;
        let team = self
            .team(&submission.team_id)
            .ok_or_else(|| EngineError::UnknownTeam(submission.team_id.clone()))?;
        if team.eliminated {
            return Err(EngineError::TeamEliminated(team.id.clone()));
        }
        if self.has_scored(&submission.team_id) {
            return Err(EngineError::AlreadyScored {
                team_id: submission.team_id.clone(),
                key: self.phase_clue_key(),
            });
        }

        let phase = self.state.phase;
        let delta = match (phase, submission.result) {
            (Phase::Easy, ScoreResult::Correct) => self.state.clue_value,
            (Phase::Average, ScoreResult::Correct) => self.state.clue_value,
            (Phase::Average, ScoreResult::Wrong) => self.state.clue_value.saturating_neg(),
            (Phase::Difficult, ScoreResult::Correct) => self.bet_for(&submission.team_id),
            (Phase::Difficult, ScoreResult::Wrong) => self.bet_for(&submission.team_id).saturating_neg(),
            // JACKPOT and TIE_BREAKER scores move through their own flows.
            _ => 0,
        };

        let team = self
            .team_mut(&submission.team_id)
            .ok_or_else(|| EngineError::UnknownTeam(submission.team_id.clone()))?;
        team.score = team.score.saturating_add(delta);
        let eliminated = phase == Phase::Difficult && team.score <= 0;
        if eliminated {
            team.eliminated = true;
        }
        let change = ScoreChange {
            team_id: team.id.clone(),
            delta,
            score: team.score,
            eliminated,
        };

        let tracker = &mut self.scoring_tracker;
        if tracker.key.is_some()
            && tracker.eligible_team_ids.contains(&submission.team_id)
            && !tracker.received_team_ids.contains(&submission.team_id)
        {
            tracker.received_team_ids.push(submission.team_id.clone());
        }
        self.mark_scored(&submission.team_id);

        Ok(change)
    }

    pub(crate) fn apply_bet(&mut self, submission: &BetSubmission) -> Result<(), EngineError> {
        if self.state.phase != Phase::Difficult {
            return Err(EngineError::BetsNotAllowed {
                phase: self.state.phase,
            });
        }
        if !self.state.bets_open {
            return Err(EngineError::BetsClosed);
        }
        self.authorize(&submission.proctor_id, &submission.team_id)?;
        let team = self
            .team(&submission.team_id)
            .ok_or_else(|| EngineError::UnknownTeam(submission.team_id.clone()))?;
        if team.eliminated {
            return Err(EngineError::TeamEliminated(team.id.clone()));
        }
        if team.score <= 0 {
            return Err(EngineError::InvalidBet(format!(
                "team `{}` has no points to wager",
                team.id
            )));
        }
        if submission.bet < 0 {
            return Err(EngineError::InvalidBet("bet must not be negative".into()));
        }
        if submission.bet > team.score {
            return Err(EngineError::InvalidBet(format!(
                "bet {} exceeds score {}",
                submission.bet, team.score
            )));
        }

        self.bets.insert(submission.team_id.clone(), submission.bet);
        let tracker = &mut self.bet_tracker;
        if tracker.key.is_some()
            && tracker.eligible_team_ids.contains(&submission.team_id)
            && !tracker.submitted_team_ids.contains(&submission.team_id)
        {
            tracker.submitted_team_ids.push(submission.team_id.clone());
        }
        Ok(())
    }

    fn bet_for(&self, team_id: &str) -> i64 {
        self.bets.get(team_id).copied().unwrap_or(0)
    }
}
