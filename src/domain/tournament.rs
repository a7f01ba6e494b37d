use std::collections::BTreeSet;

use chrono::{Local, NaiveDate};
use log::info;

use super::models::{
    Player, Round, TimerType, Tournament, TournamentState, NUMBER_OF_ROUNDS, ROSTER_SIZE,
};
use super::pairing::{build_round, compare_standing, DuplicateOpponentUnavoidable};
use crate::errors::TournamentError;

impl Tournament {
    pub fn new(
        tournament_id: &str,
        name: &str,
        location: &str,
        timer_type: TimerType,
        description: &str,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            tournament_id: tournament_id.to_string(),
            name: name.to_string(),
            location: location.to_string(),
            timer_type,
            description: description.to_string(),
            start_date,
            end_date: None,
            number_of_rounds: NUMBER_OF_ROUNDS,
            players_assigned: 0,
            list_of_players: Vec::new(),
            rounds: Vec::new(),
            finished: false,
        }
    }

    pub fn state(&self) -> TournamentState {
        if self.finished {
            return TournamentState::Finished;
        }
        match self.rounds.last() {
            None if self.players_assigned as usize == ROSTER_SIZE => TournamentState::RosterComplete,
            None => TournamentState::Created,
            Some(round) if round.finished => TournamentState::RoundComplete(round.round_nb),
            Some(round) => TournamentState::RoundInProgress(round.round_nb),
        }
    }

    /// Fill the roster. Only valid on a freshly created tournament.
    pub fn define_players(&mut self, players: Vec<Player>) -> Result<(), TournamentError> {
        self.expect_state("define players", |state| state == TournamentState::Created)?;

        let seats: BTreeSet<u32> = players.iter().map(|p| p.player_id).collect();
        let actors: BTreeSet<&str> = players.iter().map(|p| p.actor.actor_id.as_str()).collect();
        if players.len() != ROSTER_SIZE || seats.len() != ROSTER_SIZE || actors.len() != ROSTER_SIZE {
            return Err(TournamentError::RosterSize {
                expected: ROSTER_SIZE,
                found: seats.len().min(actors.len()),
            });
        }
        if let Some(foreign) = players.iter().find(|p| p.tournament_id != self.tournament_id) {
            return Err(TournamentError::ForeignPlayer {
                player_id: foreign.player_id,
                expected: self.tournament_id.clone(),
                found: foreign.tournament_id.clone(),
            });
        }

        info!("Tournament {}: roster of {} players assigned", self.tournament_id, players.len());
        self.players_assigned = players.len() as u32;
        self.list_of_players = players;
        Ok(())
    }

    /// Pair round `round_nb` and append it.
    ///
    /// Returns the rematches the pairing could not avoid.
    pub fn init_round(&mut self, round_nb: u32) -> Result<Vec<DuplicateOpponentUnavoidable>, TournamentError> {
        let operation = format!("start round {round_nb}");
        self.expect_state(&operation, |state| match state {
            TournamentState::RosterComplete => round_nb == 0,
            TournamentState::RoundComplete(previous) => round_nb == previous + 1,
            _ => false,
        })?;
        if round_nb >= self.number_of_rounds {
            return Err(self.sequence_error(&operation));
        }

        let paired = build_round(round_nb, &mut self.list_of_players)?;
        info!(
            "Tournament {}: round {} paired ({} forced rematches)",
            self.tournament_id,
            round_nb,
            paired.rematches.len()
        );
        self.rounds.push(paired.round);
        Ok(paired.rematches)
    }

    /// Record the winners of the round in progress and credit the roster.
    ///
    /// Completing the last round computes the final places.
    pub fn register_round_results(
        &mut self,
        round_nb: u32,
        winners: &[u8],
    ) -> Result<TournamentState, TournamentError> {
        let operation = format!("record results of round {round_nb}");
        self.expect_state(&operation, |state| state == TournamentState::RoundInProgress(round_nb))?;

        let index = round_nb as usize;
        let credits = self.rounds[index].register_results(winners)?;
        for credit in credits {
            if let Some(player) = self
                .list_of_players
                .iter_mut()
                .find(|p| p.player_id == credit.player_id)
            {
                player.points += credit.points;
            }
        }
        info!("Tournament {}: round {} results recorded", self.tournament_id, round_nb);

        if self.rounds[index].finished && round_nb + 1 == self.number_of_rounds {
            self.finish();
        }
        Ok(self.state())
    }

    /// Players by points, then ranking, both descending
    pub fn standings(&self) -> Vec<&Player> {
        let mut players: Vec<&Player> = self.list_of_players.iter().collect();
        players.sort_by(|a, b| compare_standing(a, b));
        players
    }

    pub fn current_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    /// Index of the round that would be paired next, if any
    pub fn next_round(&self) -> Option<u32> {
        match self.state() {
            TournamentState::RosterComplete => Some(0),
            TournamentState::RoundComplete(n) if n + 1 < self.number_of_rounds => Some(n + 1),
            _ => None,
        }
    }

    fn finish(&mut self) {
        let order: Vec<u32> = self.standings().iter().map(|p| p.player_id).collect();
        for (position, player_id) in order.iter().enumerate() {
            if let Some(player) = self.list_of_players.iter_mut().find(|p| p.player_id == *player_id) {
                player.place = Some(position as u32 + 1);
            }
        }
        self.end_date = Some(Local::now().date_naive());
        self.finished = true;
        info!("Tournament {} finished", self.tournament_id);
    }

    fn expect_state(
        &self,
        operation: &str,
        allowed: impl Fn(TournamentState) -> bool,
    ) -> Result<(), TournamentError> {
        if allowed(self.state()) {
            Ok(())
        } else {
            Err(self.sequence_error(operation))
        }
    }

    fn sequence_error(&self, operation: &str) -> TournamentError {
        TournamentError::StateSequence {
            operation: operation.to_string(),
            state: self.state().to_string(),
        }
    }
}
