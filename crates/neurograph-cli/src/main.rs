//! Neurograph CLI - talk to, teach and inspect a persisted concept graph.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "neurograph")]
#[command(author, version, about = "Neurograph - a concept graph that learns by use", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Database file (overrides neurograph.toml)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a neurograph project in a directory
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Start an interactive session with background musing
    Chat {
        /// Disable background musing for this session
        #[arg(long)]
        no_musing: bool,

        /// Skip the startup decay-and-prune pass
        #[arg(long)]
        no_prune: bool,
    },

    /// Show graph statistics
    Stats {
        /// Number of most connected concepts to list
        #[arg(short, long, default_value = "10")]
        top: usize,
    },

    /// Spread activation from one or more concepts
    Activate {
        /// Seed concepts
        #[arg(required = true)]
        labels: Vec<String>,

        /// Initial energy of each seed
        #[arg(short, long, default_value = "1.0")]
        energy: f64,
    },

    /// Teach an explicit association
    Teach {
        /// Source concept
        concept: String,
        /// Associated concept
        associated: String,

        /// Association strength (default 0.2)
        #[arg(short, long)]
        strength: Option<f64>,
    },

    /// Decay every synapse and prune the weak ones
    Prune,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut settings = config::load()?;
    if let Some(db) = cli.db {
        settings.store.path = db;
    }

    match cli.command {
        Commands::Init { path } => commands::init::run(path),
        Commands::Chat { no_musing, no_prune } => {
            if no_musing {
                settings.musing.enabled = false;
            }
            commands::chat::run(&settings, !no_prune)
        }
        Commands::Stats { top } => commands::stats::run(&settings, top),
        Commands::Activate { labels, energy } => commands::activate::run(&settings, &labels, energy),
        Commands::Teach { concept, associated, strength } => {
            commands::teach::run(&settings, &concept, &associated, strength)
        }
        Commands::Prune => commands::prune::run(&settings),
    }
}
