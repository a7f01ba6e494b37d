use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use log::info;

use super::models::{next_identifier, Actor, Gender, Player, ROSTER_SIZE};
use crate::errors::TournamentError;

/// Fields collected when registering a new actor
#[derive(Debug, Clone)]
pub struct NewActor {
    pub last_name: String,
    pub first_name: String,
    pub birthdate: NaiveDate,
    pub gender: Gender,
    pub rank: u32,
}

/// Result of filling a roster from actor ids
#[derive(Debug)]
pub enum Enrollment {
    Enrolled(Vec<Player>),
    /// The caller entered the cancel sentinel
    Cancelled,
}

/// Every actor known to the application, indexed by id
pub struct ActorDirectory {
    actors: BTreeMap<String, Actor>,
    cancel_sentinel: String,
}

impl ActorDirectory {
    pub fn new(cancel_sentinel: &str) -> Self {
        Self {
            actors: BTreeMap::new(),
            cancel_sentinel: cancel_sentinel.to_string(),
        }
    }

    pub fn from_actors(actors: Vec<Actor>, cancel_sentinel: &str) -> Self {
        let mut directory = Self::new(cancel_sentinel);
        for actor in actors {
            directory.actors.insert(actor.actor_id.clone(), actor);
        }
        directory
    }

    /// Add an actor under the next free identifier
    pub fn register(&mut self, new_actor: NewActor) -> Result<&Actor, TournamentError> {
        let actor_id = next_identifier(self.actors.keys().map(String::as_str))?;
        info!(
            "Registered actor {} ({} {})",
            actor_id, new_actor.first_name, new_actor.last_name
        );

        let actor = Actor {
            actor_id: actor_id.clone(),
            last_name: new_actor.last_name,
            first_name: new_actor.first_name,
            birthdate: new_actor.birthdate,
            gender: new_actor.gender,
            rank: new_actor.rank,
            tournaments: Vec::new(),
        };
        Ok(self.actors.entry(actor_id).or_insert(actor))
    }

    pub fn get(&self, actor_id: &str) -> Option<&Actor> {
        self.actors.get(actor_id)
    }

    pub fn update_rank(&mut self, actor_id: &str, rank: u32) -> Result<(), TournamentError> {
        let actor = self
            .actors
            .get_mut(actor_id)
            .ok_or_else(|| TournamentError::UnknownActor(actor_id.to_string()))?;
        actor.rank = rank;
        Ok(())
    }

    /// Build the roster of `tournament_id` from actor ids, seats numbered in input order.
    ///
    /// Either every actor is enrolled or none is.
    pub fn enroll(
        &mut self,
        tournament_id: &str,
        actor_ids: &[String],
    ) -> Result<Enrollment, TournamentError> {
        if actor_ids.iter().any(|id| *id == self.cancel_sentinel) {
            return Ok(Enrollment::Cancelled);
        }

        let distinct: HashSet<&str> = actor_ids.iter().map(String::as_str).collect();
        if actor_ids.len() != ROSTER_SIZE || distinct.len() != ROSTER_SIZE {
            return Err(TournamentError::RosterSize {
                expected: ROSTER_SIZE,
                found: distinct.len(),
            });
        }
        if let Some(unknown) = actor_ids.iter().find(|id| !self.actors.contains_key(*id)) {
            return Err(TournamentError::UnknownActor(unknown.clone()));
        }

        let mut players = Vec::with_capacity(ROSTER_SIZE);
        for (seat, actor_id) in actor_ids.iter().enumerate() {
            let actor = self
                .actors
                .get_mut(actor_id)
                .ok_or_else(|| TournamentError::UnknownActor(actor_id.clone()))?;
            if !actor.tournaments.iter().any(|t| t == tournament_id) {
                actor.tournaments.push(tournament_id.to_string());
            }
            players.push(Player::new(actor.clone(), tournament_id, seat as u32 + 1));
        }

        Ok(Enrollment::Enrolled(players))
    }

    /// Actors sorted by last name, then first name
    pub fn by_name(&self) -> Vec<&Actor> {
        let mut actors: Vec<&Actor> = self.actors.values().collect();
        actors.sort_by(|a, b| {
            a.last_name
                .to_lowercase()
                .cmp(&b.last_name.to_lowercase())
                .then_with(|| a.first_name.to_lowercase().cmp(&b.first_name.to_lowercase()))
        });
        actors
    }

    /// Actors sorted by reference rank, best first
    pub fn by_rank(&self) -> Vec<&Actor> {
        let mut actors: Vec<&Actor> = self.actors.values().collect();
        actors.sort_by_key(|a| a.rank);
        actors
    }

    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}
