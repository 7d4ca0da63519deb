//! Operations reported from proctor devices.

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dto::{
        proctor::{BetRequest, ProctorTeamRequest, ScoreRequest},
        sse::FlagEvent,
    },
    error::ServiceError,
    services::sse_events::broadcast_flag,
    state::{
        SharedState,
        game::{Game, rfc3339_now},
        scoring::{BetSubmission, ScoreSubmission},
        tie_breaker::TieBreakerClaim,
        transitions::run_with_broadcast,
    },
};

/// Record a result for one team on the current clue.
pub async fn score(state: &SharedState, request: ScoreRequest) -> Result<Game, ServiceError> {
    let submission = ScoreSubmission::try_from(request)?;
    let (change, game) = run_with_broadcast(state, "score", |engine| {
        engine.score_by_proctor(&submission)
    })
    .await?;
    info!(
        proctor_id = %submission.proctor_id,
        team_id = %change.team_id,
        delta = change.delta,
        score = change.score,
        eliminated = change.eliminated,
        "score recorded"
    );
    Ok(game)
}

/// Record a DIFFICULT wager.
pub async fn set_bet(state: &SharedState, request: BetRequest) -> Result<Game, ServiceError> {
    let submission = BetSubmission::from(request);
    let (_, game) = run_with_broadcast(state, "set_bet", |engine| {
        engine.set_bet_by_proctor(&submission)
    })
    .await?;
    info!(
        proctor_id = %submission.proctor_id,
        team_id = %submission.team_id,
        bet = submission.bet,
        "bet recorded"
    );
    Ok(game)
}

/// Report a correct tie-break answer. The flag is `false` for a repeat report.
pub async fn tie_breaker_correct(
    state: &SharedState,
    request: ProctorTeamRequest,
) -> Result<(bool, Game), ServiceError> {
    let claim = TieBreakerClaim::from(request);
    let (recorded, game) = run_with_broadcast(state, "tie_breaker_correct", |engine| {
        engine.submit_tie_breaker_correct(&claim)
    })
    .await?;
    info!(proctor_id = %claim.proctor_id, team_id = %claim.team_id, recorded, "tie-breaker answer reported");
    Ok((recorded, game))
}

/// Raise an ephemeral flag for the Game Master about one of the proctor's teams.
pub async fn raise_flag(
    state: &SharedState,
    request: ProctorTeamRequest,
) -> Result<FlagEvent, ServiceError> {
    let flag = state
        .with_game(|game| {
            game.authorize(&request.proctor_id, &request.team_id)?;
            let proctor = game.proctor(&request.proctor_id);
            let team = game.team(&request.team_id);
            Ok::<_, ServiceError>(FlagEvent {
                id: Uuid::new_v4(),
                proctor_id: request.proctor_id.clone(),
                proctor_name: proctor.map(|p| p.name.clone()).unwrap_or_default(),
                team_id: request.team_id.clone(),
                team_name: team.map(|t| t.name.clone()).unwrap_or_default(),
                raised_at: rfc3339_now(),
            })
        })
        .await;

    match flag {
        Ok(flag) => {
            info!(proctor_id = %flag.proctor_id, team_id = %flag.team_id, "flag raised");
            broadcast_flag(state, &flag);
            Ok(flag)
        }
        Err(err) => {
            warn!(proctor_id = %request.proctor_id, team_id = %request.team_id, error = %err, "flag rejected");
            Err(err)
        }
    }
}
