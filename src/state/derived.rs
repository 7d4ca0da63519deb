//! Values recomputed from the roster after every accepted mutation.

use crate::state::{
    game::{Clincher, Game, LeaderboardEntry, Team},
    tie_breaker::TieBreakerStage,
};

/// Ranks examined when looking for a tie that needs breaking.
const CLINCHER_RANKS: usize = 3;

/// Refresh leaderboard, clincher and tie-breaker stage on the game.
pub fn recompute(game: &mut Game) {
    game.leaderboard = leaderboard(&game.teams);
    game.clincher = clincher(&game.teams);
    game.tie_breaker_stage = TieBreakerStage::of(game);
}

/// All teams sorted by score descending; equal scores keep seat order.
pub fn leaderboard(teams: &[Team]) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = teams
        .iter()
        .map(|team| LeaderboardEntry {
            id: team.id.clone(),
            name: team.name.clone(),
            score: team.score,
            eliminated: team.eliminated,
        })
        .collect();
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries
}

/// First tie among the top three ranks of active teams.
///
/// The tie group at rank N holds every active team whose score equals the
/// Nth active score. Rank 1 wins over rank 2, which wins over rank 3.
pub fn clincher(teams: &[Team]) -> Clincher {
    let mut active: Vec<&Team> = teams.iter().filter(|team| !team.eliminated).collect();
    if active.len() < 2 {
        return Clincher::default();
    }
    active.sort_by(|a, b| b.score.cmp(&a.score));

    for rank in 0..CLINCHER_RANKS.min(active.len()) {
        let score = active[rank].score;
        let tied: Vec<String> = active
            .iter()
            .filter(|team| team.score == score)
            .map(|team| team.id.clone())
            .collect();
        if tied.len() > 1 {
            return Clincher {
                needed: true,
                tied_team_ids: tied,
            };
        }
    }

    Clincher::default()
}
