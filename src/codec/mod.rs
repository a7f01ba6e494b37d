//! Conversion between the tournament object graph and flat store records.
//!
//! Every entity becomes a JSON mapping. Nested entities are embedded by value,
//! so a match record carries full player snapshots and a tournament record
//! carries its whole roster and every round.

pub mod encoding;

use std::collections::BTreeSet;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::domain::{
    is_identifier, Actor, Match, Player, Round, Tournament, MATCHES_PER_ROUND, NUMBER_OF_ROUNDS,
    ROSTER_SIZE,
};
use crate::errors::TournamentError;

/// A flat store record
pub type Record = serde_json::Map<String, Value>;

/// An entity that can travel through the store
pub trait Codec: Serialize + DeserializeOwned {
    const ENTITY: &'static str;

    /// Invariants a decoded value must satisfy beyond its shape
    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

pub fn serialize<T: Codec>(entity: &T) -> Result<Record, TournamentError> {
    match serde_json::to_value(entity) {
        Ok(Value::Object(record)) => Ok(record),
        Ok(other) => Err(TournamentError::corrupt(
            T::ENTITY,
            format!("encoded as {other} instead of a mapping"),
        )),
        Err(e) => Err(TournamentError::corrupt(T::ENTITY, e.to_string())),
    }
}

pub fn deserialize<T: Codec>(record: &Record) -> Result<T, TournamentError> {
    let entity: T = serde_json::from_value(Value::Object(record.clone()))
        .map_err(|e| TournamentError::corrupt(T::ENTITY, e.to_string()))?;
    entity
        .check()
        .map_err(|reason| TournamentError::corrupt(T::ENTITY, reason))?;
    Ok(entity)
}

impl Codec for Actor {
    const ENTITY: &'static str = "actor";

    fn check(&self) -> Result<(), String> {
        if !is_identifier(&self.actor_id) {
            return Err(format!("malformed actor id {:?}", self.actor_id));
        }
        match self.tournaments.iter().find(|id| !is_identifier(id)) {
            Some(bad) => Err(format!("malformed tournament id {bad:?}")),
            None => Ok(()),
        }
    }
}

impl Codec for Player {
    const ENTITY: &'static str = "player";

    fn check(&self) -> Result<(), String> {
        self.actor.check()?;
        if !(1..=ROSTER_SIZE as u32).contains(&self.player_id) {
            return Err(format!("seat {} outside 1..={}", self.player_id, ROSTER_SIZE));
        }
        if self.has_faced(self.player_id) {
            return Err(format!("player {} lists itself as opponent", self.player_id));
        }
        let mut seen = self.opponents.clone();
        seen.sort_unstable();
        seen.dedup();
        if seen.len() != self.opponents.len() {
            return Err(format!("player {} lists an opponent twice", self.player_id));
        }
        Ok(())
    }
}

impl Codec for Match {
    const ENTITY: &'static str = "match";

    fn check(&self) -> Result<(), String> {
        self.player1.check()?;
        self.player2.check()?;
        if self.match_nb as usize >= MATCHES_PER_ROUND {
            return Err(format!("match number {} out of range", self.match_nb));
        }
        if self.player1.player_id == self.player2.player_id {
            return Err(format!("player {} paired with itself", self.player1.player_id));
        }
        if self.points_assigned && self.winner.is_none() {
            return Err(format!("match {} credited without a winner", self.match_nb));
        }
        Ok(())
    }
}

impl Codec for Round {
    const ENTITY: &'static str = "round";

    fn check(&self) -> Result<(), String> {
        if self.round_nb >= NUMBER_OF_ROUNDS {
            return Err(format!("round number {} out of range", self.round_nb));
        }
        if self.matches.len() != MATCHES_PER_ROUND {
            return Err(format!("round {} holds {} matches", self.round_nb, self.matches.len()));
        }
        if self.players.len() != ROSTER_SIZE {
            return Err(format!("round {} snapshots {} players", self.round_nb, self.players.len()));
        }
        for player in &self.players {
            player.check()?;
        }
        for pairing in self.matches.values() {
            pairing.check()?;
            if pairing.round_nb != self.round_nb {
                return Err(format!(
                    "match {} claims round {} inside round {}",
                    pairing.match_nb, pairing.round_nb, self.round_nb
                ));
            }
            if pairing.finished && pairing.winner.is_none() {
                return Err(format!("match {} finished without a winner", pairing.match_nb));
            }
            if pairing.points_assigned && !pairing.finished {
                return Err(format!("match {} credited but not finished", pairing.match_nb));
            }
        }
        let all_finished = self.matches.values().all(|m| m.finished);
        if self.finished != all_finished {
            return Err(format!(
                "round {} marked finished={} but its matches say {}",
                self.round_nb, self.finished, all_finished
            ));
        }
        Ok(())
    }
}

impl Codec for Tournament {
    const ENTITY: &'static str = "tournament";

    fn check(&self) -> Result<(), String> {
        if !is_identifier(&self.tournament_id) {
            return Err(format!("malformed tournament id {:?}", self.tournament_id));
        }
        if self.number_of_rounds != NUMBER_OF_ROUNDS {
            return Err(format!("{} rounds announced", self.number_of_rounds));
        }
        if self.rounds.len() > self.number_of_rounds as usize {
            return Err(format!("{} rounds stored", self.rounds.len()));
        }
        if self.players_assigned as usize != self.list_of_players.len() {
            return Err(format!(
                "{} players assigned but {} listed",
                self.players_assigned,
                self.list_of_players.len()
            ));
        }
        let seats: BTreeSet<u32> = self.list_of_players.iter().map(|p| p.player_id).collect();
        if seats.len() != self.list_of_players.len() {
            return Err("two roster players share a seat".to_string());
        }
        if !self.rounds.is_empty() && self.list_of_players.len() != ROSTER_SIZE {
            return Err(format!(
                "rounds stored for a roster of {}",
                self.list_of_players.len()
            ));
        }
        for player in &self.list_of_players {
            player.check()?;
            self.check_member(player)?;
        }

        let last = self.rounds.len().saturating_sub(1);
        for (index, round) in self.rounds.iter().enumerate() {
            round.check()?;
            if round.round_nb as usize != index {
                return Err(format!("round {} stored at position {}", round.round_nb, index));
            }
            if round.tournament_id != self.tournament_id {
                return Err(format!(
                    "round {} belongs to tournament {}",
                    round.round_nb, round.tournament_id
                ));
            }
            if index < last && !round.finished {
                return Err(format!("round {} left unfinished before round {}", index, last));
            }
            for player in &round.players {
                self.check_member(player)?;
            }
            for pairing in round.matches.values() {
                if pairing.tournament_id != self.tournament_id {
                    return Err(format!(
                        "match {} of round {} belongs to tournament {}",
                        pairing.match_nb, round.round_nb, pairing.tournament_id
                    ));
                }
                self.check_member(&pairing.player1)?;
                self.check_member(&pairing.player2)?;
            }
        }

        if self.finished {
            let complete = self.rounds.len() == self.number_of_rounds as usize
                && self.rounds.iter().all(|r| r.finished);
            if !complete {
                return Err(format!("finished after {} rounds", self.rounds.len()));
            }
        }
        Ok(())
    }
}

impl Tournament {
    fn check_member(&self, player: &Player) -> Result<(), String> {
        if player.tournament_id == self.tournament_id {
            Ok(())
        } else {
            Err(format!(
                "player {} belongs to tournament {}",
                player.player_id, player.tournament_id
            ))
        }
    }
}
