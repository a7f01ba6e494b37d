use super::models::{Round, Winner, MATCHES_PER_ROUND};
use crate::errors::TournamentError;

/// Points newly credited to one player by a result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Credit {
    pub player_id: u32,
    pub points: f64,
}

impl Round {
    /// Record one winner code per match, in `match_nb` order.
    ///
    /// Matches that already had their points assigned keep the winner update
    /// but yield no new credit. Nothing is touched when `winners` is malformed.
    pub fn register_results(&mut self, winners: &[u8]) -> Result<Vec<Credit>, TournamentError> {
        let winners = parse_winners(winners)?;
        if self.matches.len() != MATCHES_PER_ROUND {
            return Err(TournamentError::MalformedResult(format!(
                "round {} holds {} matches",
                self.round_nb,
                self.matches.len()
            )));
        }

        let mut credits = Vec::new();
        for (pairing, winner) in self.matches.values_mut().zip(winners) {
            pairing.winner = Some(winner);
            if !pairing.points_assigned {
                let (first, second) = winner.points();
                pairing.player1.points += first;
                pairing.player2.points += second;
                credits.push(Credit {
                    player_id: pairing.player1.player_id,
                    points: first,
                });
                credits.push(Credit {
                    player_id: pairing.player2.player_id,
                    points: second,
                });
                pairing.points_assigned = true;
            }
            pairing.finished = true;
        }

        self.finished = self.matches.values().all(|m| m.finished);
        Ok(credits)
    }
}

fn parse_winners(winners: &[u8]) -> Result<Vec<Winner>, TournamentError> {
    if winners.len() != MATCHES_PER_ROUND {
        return Err(TournamentError::MalformedResult(format!(
            "expected {} winners, got {}",
            MATCHES_PER_ROUND,
            winners.len()
        )));
    }
    winners
        .iter()
        .map(|&code| Winner::try_from(code).map_err(TournamentError::MalformedResult))
        .collect()
}
