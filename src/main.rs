//! # Incident Sim CLI (`incsim`)
//!
//! ## Usage
//!
//! ```bash
//! incsim --config ./config/incsim.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `incsim init` | Create both SQLite stores and run schema migrations |
//! | `incsim generate` | Generate incidents and write them to both stores |
//! | `incsim stats` | Summarise what the stores hold |
//! | `incsim get <id>` | Print one incident document with its notes |
//! | `incsim recent` | List the newest incidents |
//! | `incsim mapping` | Print the incident → sink field mapping |
//! | `incsim serve` | Start the dashboard HTTP server |
//!
//! ## Examples
//!
//! ```bash
//! # Reproducible batch of cardiac calls with a note timeline each
//! incsim generate --count 10 --seed 42 --type "Cardiac Arrest" --notes 5
//!
//! # Preview without touching the stores
//! incsim generate --count 5 --dry-run
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use incident_sim::{config, generate, get, mapping, migrate, server, stats};

/// Incident Sim CLI: synthetic emergency-call generation with SQLite
/// persistence and a live dashboard.
#[derive(Parser)]
#[command(
    name = "incsim",
    about = "Incident Sim — synthetic emergency-call generator",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/incsim.toml`.
    #[arg(long, global = true, default_value = "./config/incsim.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize both stores.
    ///
    /// Creates the SQLite files and all tables. Idempotent.
    Init,

    /// Generate incidents and persist them.
    Generate {
        /// Number of incidents (defaults to `generation.default_count`).
        #[arg(long)]
        count: Option<usize>,

        /// RNG seed; overrides `generation.seed`.
        #[arg(long)]
        seed: Option<u64>,

        /// Pin the emergency type (case-insensitive label).
        #[arg(long = "type")]
        emergency_type: Option<String>,

        /// Provider notes per incident; overrides `generation.notes_per_incident`.
        #[arg(long)]
        notes: Option<usize>,

        /// Print what would be generated without writing to the stores.
        #[arg(long)]
        dry_run: bool,
    },

    /// Show counts and breakdowns for both stores.
    Stats,

    /// Print a stored incident document and its notes.
    Get {
        /// Incident id, e.g. `INC3F9A01BC`.
        id: String,
    },

    /// List the most recent incidents.
    Recent {
        /// Number of rows (defaults to `server.recent_limit`).
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print the incident → sink field mapping table.
    Mapping,

    /// Start the dashboard HTTP server on `server.bind`.
    Serve,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let load = || config::load_config(&cli.config);

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&load()?).await?;
            println!("Stores initialized successfully.");
        }
        Commands::Generate {
            count,
            seed,
            emergency_type,
            notes,
            dry_run,
        } => {
            let opts = generate::GenerateOptions {
                count,
                seed,
                emergency_type,
                notes,
                dry_run,
            };
            // A dry run never touches the stores, so a missing file is fine.
            let cfg = if opts.dry_run {
                config::load_or_minimal(&cli.config)?
            } else {
                load()?
            };
            generate::run_generate(&cfg, &opts).await?;
        }
        Commands::Stats => {
            stats::run_stats(&load()?).await?;
        }
        Commands::Get { id } => {
            get::run_get(&load()?, &id).await?;
        }
        Commands::Recent { limit } => {
            get::run_recent(&load()?, limit).await?;
        }
        Commands::Mapping => {
            mapping::run_mapping();
        }
        Commands::Serve => {
            server::run_server(&load()?).await?;
        }
    }

    Ok(())
}
