//! Request payloads sent from proctor devices.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dto::validation::validate_entity_id,
    state::{
        error::EngineError,
        scoring::{BetSubmission, ScoreSubmission},
        tie_breaker::TieBreakerClaim,
    },
};

/// Result for one team on the current clue.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    #[validate(custom(function = "validate_entity_id"))]
    pub proctor_id: String,
    #[validate(custom(function = "validate_entity_id"))]
    pub team_id: String,
    /// `correct`, `wrong` or `no_answer`.
    pub result: String,
}

impl TryFrom<ScoreRequest> for ScoreSubmission {
    type Error = EngineError;

    fn try_from(value: ScoreRequest) -> Result<Self, Self::Error> {
        Ok(ScoreSubmission {
            result: value.result.parse()?,
            proctor_id: value.proctor_id,
            team_id: value.team_id,
        })
    }
}

/// DIFFICULT wager for one team.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BetRequest {
    #[validate(custom(function = "validate_entity_id"))]
    pub proctor_id: String,
    #[validate(custom(function = "validate_entity_id"))]
    pub team_id: String,
    pub bet: i64,
}

impl From<BetRequest> for BetSubmission {
    fn from(value: BetRequest) -> Self {
        BetSubmission {
            proctor_id: value.proctor_id,
            team_id: value.team_id,
            bet: value.bet,
        }
    }
}

/// A proctor/team pair, used for tie-break reports and flags.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProctorTeamRequest {
    #[validate(custom(function = "validate_entity_id"))]
    pub proctor_id: String,
    #[validate(custom(function = "validate_entity_id"))]
    pub team_id: String,
}

impl From<ProctorTeamRequest> for TieBreakerClaim {
    fn from(value: ProctorTeamRequest) -> Self {
        TieBreakerClaim {
            proctor_id: value.proctor_id,
            team_id: value.team_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::game::ScoreResult;

    #[test]
    fn score_request_parses_result() {
        let request: ScoreRequest = serde_json::from_str(
            r#"{"proctorId": "p1", "teamId": "t2", "result": "wrong"}"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());
        let submission = ScoreSubmission::try_from(request).unwrap();
        assert_eq!(submission.result, ScoreResult::Wrong);
        assert_eq!(submission.team_id, "t2");
    }

    #[test]
    fn score_request_rejects_unknown_result() {
        let request = ScoreRequest {
            proctor_id: "p1".into(),
            team_id: "t1".into(),
            result: "partial".into(),
        };
        assert_eq!(
            ScoreSubmission::try_from(request),
            Err(EngineError::InvalidResult("partial".into()))
        );
    }

    #[test]
    fn malformed_ids_fail_validation() {
        let request = BetRequest {
            proctor_id: "proctor one".into(),
            team_id: "t1".into(),
            bet: 5,
        };
        assert!(request.validate().is_err());
    }
}
