use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::codec::encoding::{match_table, space_list};
use crate::errors::TournamentError;

pub const ROSTER_SIZE: usize = 8;
pub const NUMBER_OF_ROUNDS: u32 = 4;
pub const MATCHES_PER_ROUND: usize = ROSTER_SIZE / 2;

/// Width of actor and tournament identifiers ("00000042")
pub const IDENTIFIER_WIDTH: usize = 8;

/// Registered person, independent of any tournament
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub actor_id: String,
    pub last_name: String,
    pub first_name: String,
    pub birthdate: NaiveDate,
    pub gender: Gender,
    pub rank: u32,
    #[serde(with = "space_list")]
    pub tournaments: Vec<String>,
}

impl Actor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "X")]
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Other => "X",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "M" => Ok(Gender::Male),
            "F" => Ok(Gender::Female),
            "X" => Ok(Gender::Other),
            other => Err(format!("unknown gender: {other} (expected M, F or X)")),
        }
    }
}

/// Time control announced for a tournament
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerType {
    Bullet,
    Blitz,
    Rapid,
}

impl TimerType {
    pub fn as_str(&self) -> &str {
        match self {
            TimerType::Bullet => "bullet",
            TimerType::Blitz => "blitz",
            TimerType::Rapid => "rapid",
        }
    }
}

impl FromStr for TimerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bullet" => Ok(TimerType::Bullet),
            "blitz" => Ok(TimerType::Blitz),
            "rapid" => Ok(TimerType::Rapid),
            other => Err(format!("unknown timer type: {other} (expected bullet, blitz or rapid)")),
        }
    }
}

/// An actor's participation in one tournament
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub actor: Actor,
    pub tournament_id: String,
    /// Seat number, 1..=8
    pub player_id: u32,
    pub name: String,
    /// Reference rank of the actor when the roster was filled
    pub rank: u32,
    /// Pairing score, assigned by the first ranking pass (higher is stronger)
    pub ranking: u32,
    pub points: f64,
    pub place: Option<u32>,
    #[serde(with = "space_list")]
    pub opponents: Vec<u32>,
}

impl Player {
    pub fn new(actor: Actor, tournament_id: &str, player_id: u32) -> Self {
        Self {
            name: actor.full_name(),
            rank: actor.rank,
            actor,
            tournament_id: tournament_id.to_string(),
            player_id,
            ranking: 0,
            points: 0.0,
            place: None,
            opponents: Vec::new(),
        }
    }

    pub fn has_faced(&self, player_id: u32) -> bool {
        self.opponents.contains(&player_id)
    }

    pub(crate) fn record_opponent(&mut self, player_id: u32) {
        if player_id != self.player_id && !self.has_faced(player_id) {
            self.opponents.push(player_id);
        }
    }
}

/// Outcome of a match, stored as 0 (player1), 1 (player2) or 2 (draw)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Winner {
    Player1,
    Player2,
    Draw,
}

impl Winner {
    /// Points credited to (player1, player2)
    pub fn points(self) -> (f64, f64) {
        match self {
            Winner::Player1 => (1.0, 0.0),
            Winner::Player2 => (0.0, 1.0),
            Winner::Draw => (0.5, 0.5),
        }
    }
}

impl TryFrom<u8> for Winner {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Winner::Player1),
            1 => Ok(Winner::Player2),
            2 => Ok(Winner::Draw),
            other => Err(format!("winner must be 0, 1 or 2, got {other}")),
        }
    }
}

impl From<Winner> for u8 {
    fn from(winner: Winner) -> Self {
        match winner {
            Winner::Player1 => 0,
            Winner::Player2 => 1,
            Winner::Draw => 2,
        }
    }
}

/// One pairing within a round. Both players are value snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub match_nb: u32,
    pub round_nb: u32,
    pub tournament_id: String,
    pub player1: Player,
    pub player2: Player,
    pub winner: Option<Winner>,
    pub finished: bool,
    pub points_assigned: bool,
}

impl Match {
    pub fn new(match_nb: u32, round_nb: u32, player1: Player, player2: Player) -> Self {
        Self {
            match_nb,
            round_nb,
            tournament_id: player1.tournament_id.clone(),
            player1,
            player2,
            winner: None,
            finished: false,
            points_assigned: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub round_nb: u32,
    pub tournament_id: String,
    /// Roster snapshot in the order used for pairing
    pub players: Vec<Player>,
    pub players_ranked: bool,
    pub players_sorted: bool,
    pub finished: bool,
    #[serde(rename = "matchs", with = "match_table")]
    pub matches: BTreeMap<u32, Match>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub tournament_id: String,
    pub name: String,
    pub location: String,
    pub timer_type: TimerType,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub number_of_rounds: u32,
    pub players_assigned: u32,
    pub list_of_players: Vec<Player>,
    pub rounds: Vec<Round>,
    pub finished: bool,
}

/// Lifecycle position, derived from the tournament's own fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TournamentState {
    Created,
    RosterComplete,
    RoundInProgress(u32),
    RoundComplete(u32),
    Finished,
}

impl fmt::Display for TournamentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TournamentState::Created => write!(f, "created"),
            TournamentState::RosterComplete => write!(f, "roster complete"),
            TournamentState::RoundInProgress(n) => write!(f, "playing round {n}"),
            TournamentState::RoundComplete(n) => write!(f, "done with round {n}"),
            TournamentState::Finished => write!(f, "finished"),
        }
    }
}

/// Whether `value` is a well-formed actor or tournament identifier
pub fn is_identifier(value: &str) -> bool {
    value.len() == IDENTIFIER_WIDTH && value.bytes().all(|b| b.is_ascii_digit())
}

/// Next identifier after the highest existing one
pub fn next_identifier<'a>(
    existing: impl IntoIterator<Item = &'a str>,
) -> Result<String, TournamentError> {
    let highest = existing
        .into_iter()
        .filter(|id| is_identifier(id))
        .filter_map(|id| id.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    let next = format!("{:0width$}", highest + 1, width = IDENTIFIER_WIDTH);
    if next.len() > IDENTIFIER_WIDTH {
        return Err(TournamentError::IdentifiersExhausted {
            width: IDENTIFIER_WIDTH,
        });
    }
    Ok(next)
}
