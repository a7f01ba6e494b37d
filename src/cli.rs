use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::domain::{Gender, TimerType};

#[derive(Parser, Debug)]
#[command(author, version, about = "Swiss chess tournament manager")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Manage the actor directory
    Actor {
        #[clap(subcommand)]
        command: ActorCommand,
    },
    /// Create a tournament from eight actor ids (00000000 cancels)
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        location: String,
        #[arg(long, value_parser = parse_timer_type)]
        timer_type: TimerType,
        #[arg(long, default_value = "")]
        description: String,
        /// Actor ids, in seat order
        #[arg(long, num_args = 1.., required = true)]
        players: Vec<String>,
    },
    /// Pair the next round of the tournament in progress
    Pair,
    /// Record the round in progress: one code per match (0 player 1 wins, 1 player 2 wins, 2 draw)
    Results {
        #[arg(num_args = 1.., required = true)]
        winners: Vec<u8>,
    },
    /// Show the standings of the tournament in progress
    Standings,
    /// List finished tournaments
    Tournaments,
    /// Report on one tournament, finished or in progress
    Report {
        tournament_id: String,
        #[arg(value_enum, default_value_t = ReportView::Players)]
        view: ReportView,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ActorCommand {
    /// Register a new actor
    Add {
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        first_name: String,
        /// Birthdate as YYYY-MM-DD
        #[arg(long)]
        birthdate: NaiveDate,
        #[arg(long, value_parser = parse_gender)]
        gender: Gender,
        #[arg(long, default_value_t = 0)]
        rank: u32,
    },
    /// List registered actors
    List {
        #[arg(long, value_enum, default_value_t = ActorOrder::Alpha)]
        by: ActorOrder,
    },
    /// Change an actor's reference rank
    Rank { actor_id: String, rank: u32 },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq)]
pub enum ActorOrder {
    Alpha,
    Rank,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq)]
pub enum ReportView {
    /// Roster with points and places
    Players,
    /// Every match of every round
    Matches,
    /// One line per round
    Rounds,
}

fn parse_timer_type(value: &str) -> Result<TimerType, String> {
    value.parse()
}

fn parse_gender(value: &str) -> Result<Gender, String> {
    value.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create() {
        let cli = Cli::try_parse_from([
            "chess_tournament",
            "create",
            "--name",
            "Spring Open",
            "--location",
            "Club",
            "--timer-type",
            "Blitz",
            "--players",
            "00000001",
            "00000002",
        ])
        .unwrap();

        match cli.command {
            Command::Create {
                timer_type,
                players,
                description,
                ..
            } => {
                assert_eq!(timer_type, TimerType::Blitz);
                assert_eq!(players.len(), 2);
                assert!(description.is_empty());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_results_and_actor_commands() {
        let cli = Cli::try_parse_from(["chess_tournament", "results", "0", "1", "2", "0"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Results {
                winners: vec![0, 1, 2, 0]
            }
        );

        let cli = Cli::try_parse_from(["chess_tournament", "actor", "list", "--by", "rank"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Actor {
                command: ActorCommand::List { by: ActorOrder::Rank }
            }
        );

        let cli = Cli::try_parse_from(["chess_tournament", "report", "00000003", "matches"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Report {
                tournament_id: "00000003".to_string(),
                view: ReportView::Matches
            }
        );

        assert!(Cli::try_parse_from([
            "chess_tournament",
            "actor",
            "add",
            "--last-name",
            "Solo",
            "--first-name",
            "Han",
            "--birthdate",
            "1977-05-25",
            "--gender",
            "Q",
        ])
        .is_err());
    }
}
