use chrono::NaiveDate;

use super::models::{Actor, Gender, Player, TimerType, Tournament};

pub const TOURNAMENT_ID: &str = "00000001";

pub fn actor(n: u32) -> Actor {
    Actor {
        actor_id: format!("{:08}", n + 10),
        last_name: format!("Last{n}"),
        first_name: format!("First{n}"),
        birthdate: NaiveDate::from_ymd_opt(1980 + n as i32, 1 + n % 12, 1 + n % 28).unwrap(),
        gender: if n % 2 == 0 { Gender::Female } else { Gender::Male },
        rank: n,
        tournaments: vec![TOURNAMENT_ID.to_string()],
    }
}

/// Eight players seated 1..=8 whose reference rank equals their seat
pub fn roster() -> Vec<Player> {
    (1..=8).map(|n| Player::new(actor(n), TOURNAMENT_ID, n)).collect()
}

pub fn tournament() -> Tournament {
    Tournament::new(
        TOURNAMENT_ID,
        "Star Wars Chess",
        "In a galaxy far far away",
        TimerType::Blitz,
        "Friendly open",
        NaiveDate::from_ymd_opt(2024, 5, 4).unwrap(),
    )
}
