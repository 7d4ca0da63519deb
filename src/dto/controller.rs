//! Request payloads sent by the Game Master controller.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dto::validation::{validate_entity_id, validate_entity_ids, validate_team_names},
    state::{engine::StateUpdate, error::EngineError, game::Phase},
};

/// Partial update of the round controls. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StateUpdateRequest {
    /// `EASY`, `AVERAGE`, `DIFFICULT`, `JACKPOT` or `TIE_BREAKER`.
    pub phase: Option<String>,
    #[validate(length(max = 80))]
    pub round_label: Option<String>,
    pub clue_number: Option<i64>,
    pub clue_value: Option<i64>,
    pub scoring_open: Option<bool>,
    pub bets_open: Option<bool>,
    pub post_final: Option<bool>,
}

impl TryFrom<StateUpdateRequest> for StateUpdate {
    type Error = EngineError;

    fn try_from(value: StateUpdateRequest) -> Result<Self, Self::Error> {
        Ok(StateUpdate {
            phase: value.phase.as_deref().map(str::parse::<Phase>).transpose()?,
            round_label: value.round_label,
            clue_number: value
                .clue_number
                .map(|n| u32::try_from(n).map_err(|_| EngineError::InvalidClueNumber(n)))
                .transpose()?,
            clue_value: value.clue_value,
            scoring_open: value.scoring_open,
            bets_open: value.bets_open,
            post_final: value.post_final,
        })
    }
}

/// List of team names for replace/add.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct TeamsRequest {
    #[validate(length(min = 1), custom(function = "validate_team_names"))]
    pub teams: Vec<String>,
}

/// How imported names are applied to the roster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Replace the whole roster.
    Replace,
    /// Append to the roster.
    #[default]
    Add,
}

/// Pasted CSV text, one team per line.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ImportCsvRequest {
    #[validate(length(min = 1, max = 20000))]
    pub csv_text: String,
    #[serde(default)]
    pub mode: ImportMode,
}

/// Explicit assignment of teams to one proctor.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    #[validate(custom(function = "validate_entity_id"))]
    pub proctor_id: String,
    #[validate(custom(function = "validate_entity_ids"))]
    pub team_ids: Vec<String>,
}

/// Open or pause the tie-breaker submission gate.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TieBreakerOpenRequest {
    pub scoring_open: bool,
}

/// Manual pick of the tie-break winner.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    #[validate(custom(function = "validate_entity_id"))]
    pub team_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_request_parses_phase() {
        let request: StateUpdateRequest =
            serde_json::from_str(r#"{"phase": "AVERAGE", "clueValue": 40}"#).unwrap();
        let update = StateUpdate::try_from(request).unwrap();
        assert_eq!(update.phase, Some(Phase::Average));
        assert_eq!(update.clue_value, Some(40));
        assert!(update.scoring_open.is_none());
    }

    #[test]
    fn unknown_phase_is_rejected() {
        let request = StateUpdateRequest {
            phase: Some("FINAL".into()),
            ..StateUpdateRequest::default()
        };
        assert_eq!(
            StateUpdate::try_from(request),
            Err(EngineError::InvalidPhase("FINAL".into()))
        );
    }

    #[test]
    fn out_of_range_clue_numbers_are_rule_errors() {
        let request: StateUpdateRequest = serde_json::from_str(r#"{"clueNumber": -1}"#).unwrap();
        assert_eq!(
            StateUpdate::try_from(request),
            Err(EngineError::InvalidClueNumber(-1))
        );

        let too_big = i64::from(u32::MAX) + 1;
        let request = StateUpdateRequest {
            clue_number: Some(too_big),
            ..Default::default()
        };
        assert_eq!(
            StateUpdate::try_from(request),
            Err(EngineError::InvalidClueNumber(too_big))
        );

        let request = StateUpdateRequest {
            clue_number: Some(7),
            ..Default::default()
        };
        assert_eq!(StateUpdate::try_from(request).unwrap().clue_number, Some(7));
    }

    #[test]
    fn teams_request_requires_names() {
        let empty = TeamsRequest { teams: vec![] };
        assert!(empty.validate().is_err());
        let ok = TeamsRequest {
            teams: vec!["Owls".into()],
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn import_mode_defaults_to_add() {
        let request: ImportCsvRequest = serde_json::from_str(r#"{"csvText": "A\nB"}"#).unwrap();
        assert_eq!(request.mode, ImportMode::Add);
    }

    #[test]
    fn assign_request_checks_ids() {
        let request = AssignRequest {
            proctor_id: "p1".into(),
            team_ids: vec!["t1".into(), "bad id".into()],
        };
        assert!(request.validate().is_err());
    }
}
