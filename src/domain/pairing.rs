use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};

use super::models::{Match, Player, Round, MATCHES_PER_ROUND, NUMBER_OF_ROUNDS, ROSTER_SIZE};
use crate::errors::TournamentError;

/// Two players paired again because no rematch-free pairing was left.
///
/// Informational only: the round is still built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateOpponentUnavoidable {
    pub round_nb: u32,
    pub player1: u32,
    pub player2: u32,
}

/// A freshly built round together with the rematches it had to accept
#[derive(Debug, Clone)]
pub struct PairedRound {
    pub round: Round,
    pub rematches: Vec<DuplicateOpponentUnavoidable>,
}

type Pairs = Vec<(usize, usize)>;

/// Pair the roster for round `round_index`.
///
/// Round 0 cross-pairs the upper half of the rank order against the lower half.
/// Later rounds sort by points then ranking and pair neighbours, avoiding rematches
/// whenever some pairing allows it. Paired players record each other as opponents.
pub fn build_round(round_index: u32, roster: &mut [Player]) -> Result<PairedRound, TournamentError> {
    check_roster(roster)?;
    if round_index >= NUMBER_OF_ROUNDS {
        return Err(TournamentError::StateSequence {
            operation: format!("pair round {round_index}"),
            state: format!("limited to {NUMBER_OF_ROUNDS} rounds"),
        });
    }

    let seeding = round_index == 0;
    let (order, pairs) = if seeding {
        let order = rank_order(roster);
        assign_ranking(roster, &order);
        let pairs = seeding_pairs(&order);
        (order, pairs)
    } else {
        let order = score_order(roster);
        let pairs = swiss_pairs(&order, roster);
        (order, pairs)
    };

    let players: Vec<Player> = order.iter().map(|&idx| roster[idx].clone()).collect();
    let tournament_id = roster[0].tournament_id.clone();

    let mut rematches = Vec::new();
    let mut matches = BTreeMap::new();
    for (match_nb, &(first, second)) in pairs.iter().enumerate() {
        let (id1, id2) = (roster[first].player_id, roster[second].player_id);
        if have_met(roster, first, second) {
            warn!("Round {round_index}: rematch between players {id1} and {id2} could not be avoided");
            rematches.push(DuplicateOpponentUnavoidable {
                round_nb: round_index,
                player1: id1,
                player2: id2,
            });
        }
        debug!("Round {round_index}, match {match_nb}: player {id1} vs player {id2}");

        roster[first].record_opponent(id2);
        roster[second].record_opponent(id1);

        let pairing = Match::new(
            match_nb as u32,
            round_index,
            roster[first].clone(),
            roster[second].clone(),
        );
        matches.insert(match_nb as u32, pairing);
    }

    let round = Round {
        round_nb: round_index,
        tournament_id,
        players,
        players_ranked: seeding,
        players_sorted: !seeding,
        finished: false,
        matches,
    };
    Ok(PairedRound { round, rematches })
}

fn check_roster(roster: &[Player]) -> Result<(), TournamentError> {
    let distinct: BTreeSet<u32> = roster.iter().map(|p| p.player_id).collect();
    if roster.len() != ROSTER_SIZE || distinct.len() != ROSTER_SIZE {
        let found = if roster.len() != ROSTER_SIZE {
            roster.len()
        } else {
            distinct.len()
        };
        return Err(TournamentError::InsufficientRoster {
            expected: ROSTER_SIZE,
            found,
        });
    }
    Ok(())
}

/// Roster indices by reference rank, best (lowest) first
fn rank_order(roster: &[Player]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..roster.len()).collect();
    order.sort_by_key(|&idx| roster[idx].rank);
    order
}

/// The best seed gets the highest pairing score
fn assign_ranking(roster: &mut [Player], order: &[usize]) {
    for (position, &idx) in order.iter().enumerate() {
        roster[idx].ranking = (ROSTER_SIZE - position) as u32;
    }
}

/// Roster indices by points, then ranking, both descending
fn score_order(roster: &[Player]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..roster.len()).collect();
    order.sort_by(|&a, &b| compare_standing(&roster[a], &roster[b]));
    order
}

pub(crate) fn compare_standing(a: &Player, b: &Player) -> Ordering {
    b.points
        .total_cmp(&a.points)
        .then_with(|| b.ranking.cmp(&a.ranking))
}

fn seeding_pairs(order: &[usize]) -> Pairs {
    let (upper, lower) = order.split_at(MATCHES_PER_ROUND);
    upper.iter().copied().zip(lower.iter().copied()).collect()
}

fn have_met(roster: &[Player], a: usize, b: usize) -> bool {
    roster[a].has_faced(roster[b].player_id) || roster[b].has_faced(roster[a].player_id)
}

/// Greedy neighbour pairing with backtracking.
///
/// Candidates are probed in sorted order, so the plain greedy pairing wins whenever
/// it is rematch-free. Otherwise the first pairing (in the same order) with the
/// fewest rematches is taken.
fn swiss_pairs(order: &[usize], roster: &[Player]) -> Pairs {
    let mut search = PairingSearch {
        roster,
        current: Vec::with_capacity(MATCHES_PER_ROUND),
        best: None,
    };
    search.explore(order, 0);
    search.best.map(|(_, pairs)| pairs).unwrap_or_default()
}

struct PairingSearch<'a> {
    roster: &'a [Player],
    current: Pairs,
    best: Option<(usize, Pairs)>,
}

impl PairingSearch<'_> {
    fn explore(&mut self, remaining: &[usize], rematches: usize) {
        if self.best.as_ref().is_some_and(|(fewest, _)| rematches >= *fewest) {
            return;
        }
        let Some((&first, rest)) = remaining.split_first() else {
            self.best = Some((rematches, self.current.clone()));
            return;
        };

        for (position, &candidate) in rest.iter().enumerate() {
            let cost = usize::from(have_met(self.roster, first, candidate));
            let mut left = rest.to_vec();
            left.remove(position);

            self.current.push((first, candidate));
            self.explore(&left, rematches + cost);
            self.current.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::testing::roster;

    fn pair_ids(round: &Round) -> Vec<(u32, u32)> {
        round
            .matches
            .values()
            .map(|m| (m.player1.player_id, m.player2.player_id))
            .collect()
    }

    fn assert_covers_roster(round: &Round) {
        let mut seen: Vec<u32> = round
            .matches
            .values()
            .flat_map(|m| [m.player1.player_id, m.player2.player_id])
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (1..=8).collect::<Vec<u32>>());
        assert_eq!(round.matches.len(), MATCHES_PER_ROUND);
    }

    /// Every perfect matching of `ids`
    fn all_matchings(ids: &[u32]) -> Vec<Vec<(u32, u32)>> {
        let Some((&first, rest)) = ids.split_first() else {
            return vec![Vec::new()];
        };
        let mut matchings = Vec::new();
        for (pos, &other) in rest.iter().enumerate() {
            let mut left = rest.to_vec();
            left.remove(pos);
            for mut tail in all_matchings(&left) {
                tail.push((first, other));
                matchings.push(tail);
            }
        }
        matchings
    }

    fn rematch_count(players: &[Player], pairs: &[(u32, u32)]) -> usize {
        pairs
            .iter()
            .filter(|(a, b)| players.iter().any(|p| p.player_id == *a && p.has_faced(*b)))
            .count()
    }

    #[test]
    fn test_seeding_cross_pairs_halves() {
        let mut players = roster();
        let paired = build_round(0, &mut players).unwrap();

        assert_eq!(pair_ids(&paired.round), vec![(1, 5), (2, 6), (3, 7), (4, 8)]);
        assert!(paired.round.players_ranked);
        assert!(!paired.round.players_sorted);
        assert!(paired.rematches.is_empty());
        assert_covers_roster(&paired.round);
    }

    #[test]
    fn test_seeding_follows_rank_not_seat() {
        let mut players = roster();
        for p in players.iter_mut() {
            p.rank = 100 - p.player_id;
        }

        let paired = build_round(0, &mut players).unwrap();

        assert_eq!(pair_ids(&paired.round), vec![(8, 4), (7, 3), (6, 2), (5, 1)]);
        assert_eq!(players.iter().find(|p| p.player_id == 8).unwrap().ranking, 8);
        assert_eq!(players.iter().find(|p| p.player_id == 1).unwrap().ranking, 1);
    }

    #[test]
    fn test_seeding_is_deterministic() {
        let mut first = roster();
        let mut second = roster();
        let a = build_round(0, &mut first).unwrap();
        let b = build_round(0, &mut second).unwrap();
        assert_eq!(a.round, b.round);
    }

    #[test]
    fn test_pairing_records_opponents() {
        let mut players = roster();
        build_round(0, &mut players).unwrap();

        assert_eq!(players[0].opponents, vec![5]);
        assert_eq!(players[4].opponents, vec![1]);
        assert!(players.iter().all(|p| !p.has_faced(p.player_id)));
    }

    #[test]
    fn test_snapshot_is_taken_in_pairing_order() {
        let mut players = roster();
        build_round(0, &mut players).unwrap();
        players[5].points = 2.0;
        players[2].points = 1.0;

        let paired = build_round(1, &mut players).unwrap();

        let order: Vec<u32> = paired.round.players.iter().map(|p| p.player_id).collect();
        assert_eq!(order[0], 6);
        assert_eq!(order[1], 3);
        assert!(paired.round.players_sorted);
    }

    #[test]
    fn test_swiss_round_pairs_neighbours_when_fresh() {
        let mut players = roster();
        build_round(0, &mut players).unwrap();
        // winners 1, 6, draw 3/7, 4
        for (id, points) in [(1, 1.0), (6, 1.0), (3, 0.5), (7, 0.5), (4, 1.0)] {
            players[id - 1].points = points;
        }

        let paired = build_round(1, &mut players).unwrap();

        // order: 1(8) 4(5) 6(3) | 3(6) 7(2) | 2(7) 5(4) 8(1)
        assert_eq!(pair_ids(&paired.round), vec![(1, 4), (6, 3), (7, 2), (5, 8)]);
        assert!(paired.rematches.is_empty());
    }

    #[test]
    fn test_swiss_round_skips_previous_opponent() {
        let mut players = roster();
        build_round(0, &mut players).unwrap();
        players[0].points = 1.0; // player 1 beat player 5
        players[4].points = 1.0; // force 5 right behind 1

        let paired = build_round(1, &mut players).unwrap();

        let pairs = pair_ids(&paired.round);
        assert!(!pairs.contains(&(1, 5)));
        assert_eq!(pairs[0].0, 1);
        assert!(paired.rematches.is_empty());
    }

    #[test]
    fn test_forced_rematch_is_reported() {
        let mut players = roster();
        // Everyone has already met everyone.
        for p in players.iter_mut() {
            p.opponents = (1..=8).filter(|id| *id != p.player_id).collect();
        }

        let paired = build_round(1, &mut players).unwrap();

        assert_covers_roster(&paired.round);
        assert_eq!(paired.rematches.len(), MATCHES_PER_ROUND);
        assert_eq!(players[0].opponents.len(), 7);
    }

    #[test]
    fn test_rejects_short_roster_without_mutation() {
        let mut players = roster();
        players.pop();

        let err = build_round(0, &mut players).unwrap_err();

        assert_eq!(
            err,
            TournamentError::InsufficientRoster {
                expected: 8,
                found: 7
            }
        );
        assert!(players.iter().all(|p| p.opponents.is_empty() && p.ranking == 0));
    }

    #[test]
    fn test_oversized_roster_reports_its_length() {
        let mut players = roster();
        let duplicate = players[7].clone();
        players.push(duplicate);

        let err = build_round(0, &mut players).unwrap_err();

        assert_eq!(
            err,
            TournamentError::InsufficientRoster {
                expected: 8,
                found: 9
            }
        );
    }

    #[test]
    fn test_rejects_duplicate_seats() {
        let mut players = roster();
        players[7].player_id = 1;
        assert!(matches!(
            build_round(0, &mut players),
            Err(TournamentError::InsufficientRoster { found: 7, .. })
        ));
    }

    #[test]
    fn test_every_round_covers_roster() {
        let mut players = roster();
        for round_index in 0..NUMBER_OF_ROUNDS {
            let paired = build_round(round_index, &mut players).unwrap();
            assert_covers_roster(&paired.round);
            for (n, m) in paired.round.matches.values().enumerate() {
                assert_eq!(m.match_nb, n as u32);
                assert_eq!(m.winner, None);
                assert!(!m.finished && !m.points_assigned);
            }
            // favour the first player of every match
            for m in paired.round.matches.values() {
                players[m.player1.player_id as usize - 1].points += 1.0;
            }
        }
    }

    #[test]
    fn test_rematch_only_when_unavoidable() {
        // Deterministic histories of increasing density, checked against all 105 matchings.
        let all_ids: Vec<u32> = (1..=8).collect();
        let matchings = all_matchings(&all_ids);
        assert_eq!(matchings.len(), 105);

        let mut state: u64 = 0x2545_F491_4F6C_DD1D;
        for case in 0..200 {
            let mut players = roster();
            let density = case % 8;
            for a in 1..=8u32 {
                for b in (a + 1)..=8u32 {
                    state ^= state << 13;
                    state ^= state >> 7;
                    state ^= state << 17;
                    if state % 8 < density {
                        players[a as usize - 1].opponents.push(b);
                        players[b as usize - 1].opponents.push(a);
                    }
                }
                players[a as usize - 1].points = (state % 4) as f64 * 0.5;
                players[a as usize - 1].ranking = 9 - a;
            }

            let before = players.clone();
            let fewest = matchings
                .iter()
                .map(|m| rematch_count(&before, m))
                .min()
                .unwrap();

            let paired = build_round(1, &mut players).unwrap();
            let produced = rematch_count(&before, &pair_ids(&paired.round));

            assert_eq!(produced, fewest, "case {case}");
            assert_eq!(paired.rematches.len(), produced, "case {case}");
        }
    }

    #[test]
    fn test_rejects_round_past_limit() {
        let mut players = roster();
        assert!(matches!(
            build_round(4, &mut players),
            Err(TournamentError::StateSequence { .. })
        ));
    }
}
