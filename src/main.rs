use anyhow::Result;

use chess_tournament::cli::Command;
use chess_tournament::{
    handle_actor, handle_completions, handle_create, handle_pair, handle_report, handle_results,
    handle_standings, handle_tournaments, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Actor { command } => handle_actor(command),
        Command::Create {
            name,
            location,
            timer_type,
            description,
            players,
        } => handle_create(name, location, *timer_type, description, players),
        Command::Pair => handle_pair(),
        Command::Results { winners } => handle_results(winners),
        Command::Standings => handle_standings(),
        Command::Tournaments => handle_tournaments(),
        Command::Report {
            tournament_id,
            view,
        } => handle_report(tournament_id, *view),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
