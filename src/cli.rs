use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::api::DEFAULT_API_URL;

/// Highest id of the first generation
pub const DEFAULT_MAX_ID: u32 = 151;

#[derive(Parser, Debug)]
#[command(name = "pokedex-to-sqlite")]
#[command(version, about = "Fetch Pokémon from PokeAPI into a SQLite database")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// SQLite database path (default: platform data directory)
    #[arg(long, global = true, env = "POKEDEX_DB")]
    pub db: Option<PathBuf>,

    /// PokeAPI base URL
    #[arg(long, global = true, env = "POKEDEX_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Per-request timeout in seconds
    #[arg(long, global = true, env = "POKEDEX_TIMEOUT_SECS", default_value_t = 5)]
    pub timeout_secs: u64,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Populate the database on first run, then look Pokémon up interactively
    Run {
        /// Highest id to load and accept at the prompt
        #[arg(long, default_value_t = DEFAULT_MAX_ID)]
        max_id: u32,

        /// Show a full-screen progress view while populating
        #[arg(long)]
        tui: bool,
    },

    /// Fetch a range or list of ids into the database
    Sync {
        /// First id of the range
        #[arg(long)]
        from: Option<u32>,

        /// Last id of the range (inclusive)
        #[arg(long)]
        to: Option<u32>,

        /// Explicit ids (comma-separated)
        #[arg(long, value_delimiter = ',')]
        ids: Option<Vec<u32>>,

        /// Show a full-screen progress view
        #[arg(long)]
        tui: bool,
    },

    /// Fetch a single Pokémon into the database
    Fetch {
        /// Pokémon id
        id: u32,
    },

    /// Print everything stored about one Pokémon
    Show {
        /// Pokémon id
        id: u32,
    },

    /// List all table names in creation order
    ListTables,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
