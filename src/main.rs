use anyhow::Result;
use clap::{Parser, Subcommand};
use debugmate::{Assistant, Config};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Log errors with their fixes, recall them when they happen again", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (defaults to .debugmate/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging to stderr
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Store an error and the fix that resolved it
    Log {
        /// Error message or description
        #[arg(long)]
        error: String,

        /// How the error was fixed
        #[arg(long)]
        solution: String,
    },

    /// Find similar logged errors and ask for a diagnosis
    Ask {
        /// Error message or description to look up
        query: String,

        /// Number of similar errors to retrieve
        #[arg(short, long)]
        limit: Option<usize>,

        /// Only show similar errors, skip the AI diagnosis
        #[arg(long)]
        no_diagnosis: bool,
    },

    /// Show how many errors are stored
    Stats {
        /// Report every embedding-size collection, not just the default one
        #[arg(short, long)]
        all: bool,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let dotenv = dotenvy::dotenv();
    debugmate::logging::init(cli.debug);
    if dotenv.is_err() {
        tracing::warn!(".env file not found");
    }

    let config = match &cli.config {
        Some(path) => {
            let mut config = Config::from_file(path)?;
            config.apply_env();
            config
        }
        None => Config::load()?,
    };

    let assistant = Assistant::new(config)?;

    match cli.command {
        None => commands::menu::execute(&assistant)?,
        Some(Commands::Log { error, solution }) => {
            commands::log::execute(&assistant, error.trim(), solution.trim())?;
        }
        Some(Commands::Ask {
            query,
            limit,
            no_diagnosis,
        }) => {
            let options = commands::ask::AskOptions {
                limit,
                no_diagnosis,
            };
            commands::ask::execute(&assistant, query.trim(), &options)?;
        }
        Some(Commands::Stats { all, json }) => {
            commands::stats::execute(&assistant, all, json)?;
        }
    }

    Ok(())
}
