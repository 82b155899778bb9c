use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use swiss_pairing::config::{AppConfig, RematchPolicy};
use swiss_pairing::models::{PlayerId, RoundPairings, StandingEntry};
use swiss_pairing::storage::{JsonlStore, StorageConfig};
use swiss_pairing::tournament::Tournament;

#[derive(Parser)]
#[command(name = "swiss-pairing")]
#[command(about = "Swiss-system tournament pairing")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a player
    Register {
        /// Full name (need not be unique)
        name: String,
    },

    /// Record the outcome of a match
    Report {
        /// Winner's player id
        #[arg(long)]
        winner: u32,

        /// Loser's player id
        #[arg(long)]
        loser: u32,
    },

    /// Print the number of registered players
    Count,

    /// Print current standings
    Standings {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Pair the next round
    Pairings {
        /// Record the round's bye so it counts in the standings
        #[arg(long)]
        commit: bool,

        /// Accept rematches when no rematch-free bracket exists
        #[arg(long)]
        allow_forced: bool,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete all matches, or everything
    Reset {
        /// Keep registered players
        #[arg(long)]
        matches_only: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::debug!("Starting swiss-pairing v{}", env!("CARGO_PKG_VERSION"));

    let mut pairing_config = config.pairing.clone();
    if matches!(
        cli.command,
        Commands::Pairings {
            allow_forced: true,
            ..
        }
    ) {
        pairing_config.rematch_policy = RematchPolicy::AllowForced;
    }

    let store = JsonlStore::new(StorageConfig::new(config.data_dir.clone()));
    let mut tournament = Tournament::new(store, pairing_config);

    match cli.command {
        Commands::Register { name } => {
            let player = tournament.register_player(&name)?;
            println!("Registered player {}: {}", player.id, player.name);
        }
        Commands::Report { winner, loser } => {
            let result = tournament.report_match(PlayerId::new(winner), PlayerId::new(loser))?;
            println!(
                "Recorded match {}: {} beat {}",
                result.id, result.winner_id, result.loser_id
            );
        }
        Commands::Count => {
            println!("{}", tournament.count_players()?);
        }
        Commands::Standings { json } => {
            let standings = tournament.standings()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&standings)?);
            } else {
                print_standings(&standings);
            }
        }
        Commands::Pairings { commit, json, .. } => {
            let round = if commit {
                tournament.pair_next_round()?
            } else {
                tournament.preview_pairings()?
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&round)?);
            } else {
                print_round(&round);
                if !commit && round.bye.is_some() {
                    println!("\n(preview - bye not recorded, pass --commit to record it)");
                }
            }
        }
        Commands::Reset { matches_only } => {
            if matches_only {
                tournament.delete_matches()?;
                println!("Deleted all matches");
            } else {
                tournament.delete_players()?;
                println!("Deleted all players and matches");
            }
        }
    }

    Ok(())
}

fn print_standings(standings: &[StandingEntry]) {
    println!("\n=== Standings ===");
    println!(
        "{:>4}  {:>6}  {:<30} {:>4} {:>6} {:>7} {:>6}",
        "Rank", "Id", "Name", "Wins", "Losses", "Matches", "Win%"
    );
    for (rank, entry) in standings.iter().enumerate() {
        println!(
            "{:>4}  {:>6}  {:<30} {:>4} {:>6} {:>7} {:>5.1}%",
            rank + 1,
            entry.player_id.value(),
            entry.name,
            entry.wins,
            entry.losses(),
            entry.matches,
            entry.win_rate() * 100.0
        );
    }
}

fn print_round(round: &RoundPairings) {
    println!("\n=== Next Round ===");
    for (table, pairing) in round.pairings.iter().enumerate() {
        let marker = if pairing.forced_rematch {
            "  (forced rematch)"
        } else {
            ""
        };
        println!(
            "Table {:>3}: [{}] {} vs [{}] {}{}",
            table + 1,
            pairing.player1_id,
            pairing.player1_name,
            pairing.player2_id,
            pairing.player2_name,
            marker
        );
    }
    if let Some(bye) = &round.bye {
        println!("Bye:       [{}] {}", bye.player_id, bye.name);
    }
}
