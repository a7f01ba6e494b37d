//! Terminal rendering of actors, pairings and standings.

use colored::Colorize;

use crate::domain::{Actor, DuplicateOpponentUnavoidable, Round, Tournament, Winner};

pub fn print_actors(actors: &[&Actor]) {
    if actors.is_empty() {
        println!("{}", "No actors registered".yellow());
        return;
    }
    println!(
        "{}",
        format!("{:<10} {:<28} {:<12} {:<3} {:>6}", "ID", "NAME", "BIRTHDATE", "G", "RANK").bold()
    );
    for actor in actors {
        println!(
            "{:<10} {:<28} {:<12} {:<3} {:>6}",
            actor.actor_id,
            format!("{}, {}", actor.last_name, actor.first_name),
            actor.birthdate.format("%Y-%m-%d"),
            actor.gender.as_str(),
            actor.rank
        );
    }
}

pub fn print_round(tournament: &Tournament, round: &Round) {
    println!(
        "{}",
        format!("{} · round {}", tournament.name, round.round_nb + 1).bold()
    );
    for pairing in round.matches.values() {
        let outcome = match pairing.winner {
            Some(Winner::Player1) => "1 - 0".green(),
            Some(Winner::Player2) => "0 - 1".green(),
            Some(Winner::Draw) => "½ - ½".cyan(),
            None => "pending".dimmed(),
        };
        println!(
            "  #{}  [{}] {:<24} vs  [{}] {:<24} {}",
            pairing.match_nb,
            pairing.player1.player_id,
            pairing.player1.name,
            pairing.player2.player_id,
            pairing.player2.name,
            outcome
        );
    }
}

pub fn print_rounds(tournament: &Tournament) {
    if tournament.rounds.is_empty() {
        println!("{}", "No round paired yet".yellow());
        return;
    }
    for round in &tournament.rounds {
        let decided = round.matches.values().filter(|m| m.finished).count();
        let status = if round.finished {
            "complete".green()
        } else {
            "in progress".yellow()
        };
        println!(
            "  round {}  {:<12} {}/{} matches decided",
            round.round_nb + 1,
            status,
            decided,
            round.matches.len()
        );
    }
}

pub fn print_rematches(rematches: &[DuplicateOpponentUnavoidable]) {
    for rematch in rematches {
        println!(
            "{} players {} and {} meet again in round {}",
            "warning:".yellow().bold(),
            rematch.player1,
            rematch.player2,
            rematch.round_nb + 1
        );
    }
}

pub fn print_standings(tournament: &Tournament) {
    println!(
        "{}",
        format!(
            "{} ({}) · {}",
            tournament.name,
            tournament.tournament_id,
            tournament.state()
        )
        .bold()
    );
    for (position, player) in tournament.standings().iter().enumerate() {
        let place = player.place.unwrap_or(position as u32 + 1);
        let line = format!(
            "  {:>2}. [{}] {:<28} {:>4.1} pts  ranking {}",
            place, player.player_id, player.name, player.points, player.ranking
        );
        if player.place == Some(1) {
            println!("{}", line.green().bold());
        } else {
            println!("{line}");
        }
    }
}

pub fn print_tournaments(tournaments: &[Tournament]) {
    if tournaments.is_empty() {
        println!("{}", "No finished tournaments".yellow());
        return;
    }
    for tournament in tournaments {
        let end = tournament
            .end_date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "-".to_string());
        let champion = tournament
            .standings()
            .first()
            .map(|player| player.name.clone())
            .unwrap_or_default();
        println!(
            "{} {:<24} {:<16} {:<7} {} → {}  winner: {}",
            tournament.tournament_id.bold(),
            tournament.name,
            tournament.location,
            tournament.timer_type.as_str(),
            tournament.start_date,
            end,
            champion
        );
    }
}
