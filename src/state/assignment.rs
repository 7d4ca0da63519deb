use crate::state::{
    error::EngineError,
    game::{Game, MAX_TEAMS_PER_PROCTOR, TeamId},
};

/// Split teams into contiguous seat-order chunks, one per proctor.
///
/// Returns one list per proctor; proctors past the last chunk get an empty list.
pub fn plan_seat_order(
    team_ids: &[TeamId],
    proctor_count: usize,
) -> Result<Vec<Vec<TeamId>>, EngineError> {
    let mut plan = vec![Vec::new(); proctor_count];
    if team_ids.is_empty() || proctor_count == 0 {
        return Ok(plan);
    }

    let chunk_size = team_ids.len().div_ceil(proctor_count);
    if chunk_size > MAX_TEAMS_PER_PROCTOR {
        return Err(EngineError::CapacityExceeded {
            chunk_size,
            max: MAX_TEAMS_PER_PROCTOR,
        });
    }

    for (slot, chunk) in plan.iter_mut().zip(team_ids.chunks(chunk_size)) {
        *slot = chunk.to_vec();
    }
    Ok(plan)
}

impl Game {
    /// Give a proctor exactly `team_ids`, replacing the previous list.
    pub(crate) fn assign_teams(
        &mut self,
        proctor_id: &str,
        team_ids: Vec<TeamId>,
    ) -> Result<(), EngineError> {
        let index = self
            .proctors
            .iter()
            .position(|proctor| proctor.id == proctor_id)
            .ok_or_else(|| EngineError::ProctorNotFound(proctor_id.to_string()))?;

        if team_ids.len() > MAX_TEAMS_PER_PROCTOR {
            return Err(EngineError::TooManyTeamsForProctor {
                requested: team_ids.len(),
                max: MAX_TEAMS_PER_PROCTOR,
            });
        }

        for (position, team_id) in team_ids.iter().enumerate() {
            if self.team(team_id).is_none() {
                return Err(EngineError::UnknownTeam(team_id.clone()));
            }
            if team_ids[..position].contains(team_id) {
                return Err(EngineError::DuplicateTeam(team_id.clone()));
            }
            let owner = self
                .proctors
                .iter()
                .enumerate()
                .find(|(other, proctor)| *other != index && proctor.team_ids.contains(team_id));
            if let Some((_, owner)) = owner {
                return Err(EngineError::TeamAlreadyAssigned {
                    team_id: team_id.clone(),
                    proctor_id: owner.id.clone(),
                });
            }
        }

        self.proctors[index].team_ids = team_ids;
        Ok(())
    }

    /// Reassign every proctor from the current roster order.
    pub(crate) fn auto_assign(&mut self) -> Result<(), EngineError> {
        let team_ids: Vec<TeamId> = self.teams.iter().map(|team| team.id.clone()).collect();
        let plan = plan_seat_order(&team_ids, self.proctors.len())?;
        for (proctor, assigned) in self.proctors.iter_mut().zip(plan) {
            proctor.team_ids = assigned;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(count: usize) -> Vec<TeamId> {
        (1..=count).map(|i| format!("t{i}")).collect()
    }

    #[test]
    fn chunks_follow_seat_order() {
        let plan = plan_seat_order(&ids(10), 8).unwrap();
        assert_eq!(plan[0], ["t1", "t2"]);
        assert_eq!(plan[4], ["t9", "t10"]);
        assert!(plan[5..].iter().all(Vec::is_empty));
    }

    #[test]
    fn full_roster_fills_every_proctor() {
        let plan = plan_seat_order(&ids(40), 8).unwrap();
        assert!(plan.iter().all(|chunk| chunk.len() == MAX_TEAMS_PER_PROCTOR));
    }

    #[test]
    fn overflow_is_rejected() {
        match plan_seat_order(&ids(41), 8) {
            Err(EngineError::CapacityExceeded { chunk_size, max }) => {
                assert_eq!(chunk_size, 6);
                assert_eq!(max, MAX_TEAMS_PER_PROCTOR);
            }
            other => panic!("unexpected plan: {other:?}"),
        }
    }

    #[test]
    fn empty_roster_clears_everyone() {
        let plan = plan_seat_order(&[], 8).unwrap();
        assert_eq!(plan.len(), 8);
        assert!(plan.iter().all(Vec::is_empty));
    }
}
