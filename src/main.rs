mod commands;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use royale_core::{IngestConfig, WindowMode};
use simplelog::{ColorChoice, Config as LogConfig, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "royale")]
#[command(about = "Ingest an .ics class schedule into the Class Royale document store")]
struct Cli {
    /// Show debug output (skipped events, sync stages)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse, expand and upload a schedule, replacing the collection
    Ingest {
        /// Path to the .ics file
        file: PathBuf,

        #[command(flatten)]
        window: WindowOpts,

        /// Store backend name (runs royale-store-<name>)
        #[arg(long)]
        store: Option<String>,

        /// Target collection
        #[arg(long)]
        collection: Option<String>,

        /// Documents per insert wave
        #[arg(long)]
        batch_size: Option<usize>,
    },
    /// Compute and print the schedule without touching the store
    Preview {
        /// Path to the .ics file
        file: PathBuf,

        #[command(flatten)]
        window: WindowOpts,
    },
    /// Delete every document in the collection
    Clear {
        /// Store backend name (runs royale-store-<name>)
        #[arg(long)]
        store: Option<String>,

        /// Target collection
        #[arg(long)]
        collection: Option<String>,
    },
}

#[derive(clap::Args)]
struct WindowOpts {
    /// Reference timezone (IANA name, e.g. America/New_York)
    #[arg(long)]
    timezone: Option<String>,

    /// Window policy
    #[arg(long, value_enum)]
    window: Option<WindowArg>,

    /// Strict-mode buffer for slightly-past events, in minutes
    #[arg(long)]
    buffer_minutes: Option<i64>,

    /// How many days ahead to ingest
    #[arg(long)]
    horizon_days: Option<i64>,
}

#[derive(ValueEnum, Clone, Copy)]
enum WindowArg {
    Strict,
    Relaxed,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    TermLogger::init(
        level,
        LogConfig::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    match cli.command {
        Commands::Ingest {
            file,
            window,
            store,
            collection,
            batch_size,
        } => {
            let mut config = resolve_config(&window)?;
            if let Some(store) = store {
                config.store = store;
            }
            if let Some(collection) = collection {
                config.collection = collection;
            }
            if let Some(batch_size) = batch_size {
                config.batch_size = batch_size;
            }
            commands::ingest::run(&file, config).await
        }
        Commands::Preview { file, window } => {
            let config = resolve_config(&window)?;
            commands::preview::run(&file, config)
        }
        Commands::Clear { store, collection } => {
            let mut config = IngestConfig::load()?;
            if let Some(store) = store {
                config.store = store;
            }
            if let Some(collection) = collection {
                config.collection = collection;
            }
            commands::clear::run(config).await
        }
    }
}

fn resolve_config(opts: &WindowOpts) -> Result<IngestConfig> {
    let mut config = IngestConfig::load()?;

    if let Some(tz) = &opts.timezone {
        config.timezone = tz
            .parse()
            .map_err(|_| anyhow::anyhow!("Unknown timezone '{}'", tz))?;
    }
    if let Some(window) = opts.window {
        config.window = match window {
            WindowArg::Strict => WindowMode::Strict,
            WindowArg::Relaxed => WindowMode::Relaxed,
        };
    }
    if let Some(buffer_minutes) = opts.buffer_minutes {
        config.buffer_minutes = buffer_minutes;
    }
    if let Some(horizon_days) = opts.horizon_days {
        config.horizon_days = horizon_days;
    }

    Ok(config)
}
