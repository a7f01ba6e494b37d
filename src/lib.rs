pub mod cli;
pub mod codec;
pub mod config;
pub mod database;
pub mod display;
pub mod domain;
pub mod errors;
pub mod services;

use anyhow::{bail, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;
use log::info;

use crate::cli::{ActorCommand, ActorOrder, Command, ReportView};
use crate::config::AppConfig;
use crate::database::create_pool;
use crate::domain::{NewActor, TimerType};
use crate::services::{SessionService, TournamentDraft};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

fn open_session() -> Result<SessionService> {
    let config = AppConfig::new();
    info!("Opening store at {}", config.store.database_path);
    let pool = create_pool(&config.store.database_path)?;
    Ok(SessionService::new(pool, &config))
}

pub fn handle_actor(command: &ActorCommand) -> Result<()> {
    let session = open_session()?;
    let registry = session.registry();
    let mut directory = registry.load()?;

    match command {
        ActorCommand::Add {
            last_name,
            first_name,
            birthdate,
            gender,
            rank,
        } => {
            let actor = directory.register(NewActor {
                last_name: last_name.clone(),
                first_name: first_name.clone(),
                birthdate: *birthdate,
                gender: *gender,
                rank: *rank,
            })?;
            println!("Registered {} as {}", actor.full_name(), actor.actor_id);
            registry.save(&directory)
        }
        ActorCommand::List { by } => {
            let actors = match by {
                ActorOrder::Alpha => directory.by_name(),
                ActorOrder::Rank => directory.by_rank(),
            };
            display::print_actors(&actors);
            Ok(())
        }
        ActorCommand::Rank { actor_id, rank } => {
            directory.update_rank(actor_id, *rank)?;
            registry.save(&directory)
        }
    }
}

pub fn handle_create(
    name: &str,
    location: &str,
    timer_type: TimerType,
    description: &str,
    players: &[String],
) -> Result<()> {
    let session = open_session()?;
    let draft = TournamentDraft {
        name: name.to_string(),
        location: location.to_string(),
        timer_type,
        description: description.to_string(),
    };

    match session.create(draft, players)? {
        Some(tournament) => display::print_standings(&tournament),
        None => println!("Tournament creation cancelled"),
    }
    Ok(())
}

pub fn handle_pair() -> Result<()> {
    let session = open_session()?;
    let (tournament, rematches) = session.pair_next()?;

    display::print_rematches(&rematches);
    if let Some(round) = tournament.current_round() {
        display::print_round(&tournament, round);
    }
    Ok(())
}

pub fn handle_results(winners: &[u8]) -> Result<()> {
    let session = open_session()?;
    let tournament = session.record(winners)?;

    if let Some(round) = tournament.current_round() {
        display::print_round(&tournament, round);
    }
    display::print_standings(&tournament);
    Ok(())
}

pub fn handle_standings() -> Result<()> {
    let session = open_session()?;
    match session.current_tournament()? {
        Some(tournament) => {
            display::print_standings(&tournament);
            Ok(())
        }
        None => bail!("No tournament in progress"),
    }
}

pub fn handle_tournaments() -> Result<()> {
    let session = open_session()?;
    display::print_tournaments(&session.archived()?);
    Ok(())
}

pub fn handle_report(tournament_id: &str, view: ReportView) -> Result<()> {
    let session = open_session()?;
    let Some(tournament) = session.find(tournament_id)? else {
        bail!("Unknown tournament id: {tournament_id}");
    };

    match view {
        ReportView::Players => display::print_standings(&tournament),
        ReportView::Matches => {
            for round in &tournament.rounds {
                display::print_round(&tournament, round);
            }
        }
        ReportView::Rounds => display::print_rounds(&tournament),
    }
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}
