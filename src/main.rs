//! mergerine CLI

mod cli;

use clap::{ArgAction, Parser, Subcommand};
use cli::context::{CommandContext, load_config};
use cli::decide::{run_decide, run_pr};
use cli::run::run_loop;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Auto-merge approved GitHub pull requests, one action per poll cycle
#[derive(Parser, Debug)]
#[command(name = "mergerine")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the TOML config file (default: ./mergerine.toml if present)
    #[arg(short, long, global = true, env = "MERGERINE_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Poll for pull requests and merge or update one per cycle
    Run {
        /// Log decisions without merging or updating
        #[arg(long)]
        dry: bool,

        /// Poll interval in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Run a single cycle and exit
        #[arg(long)]
        once: bool,
    },

    /// Run one decision cycle and print the result without writing
    Decide,

    /// Evaluate a single pull request without writing
    Pr {
        /// Pull request number
        number: u64,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "mergerine=info",
        1 => "mergerine=debug",
        _ => "mergerine=trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            dry,
            interval_ms,
            once,
        } => {
            if dry {
                config.dry = true;
            }
            if let Some(interval_ms) = interval_ms {
                config.interval_ms = interval_ms;
            }
            let ctx = CommandContext::new(config).await?;
            run_loop(&ctx, once).await?;
        }
        Commands::Decide => {
            let ctx = CommandContext::new(config).await?;
            run_decide(&ctx).await?;
        }
        Commands::Pr { number } => {
            let ctx = CommandContext::new(config).await?;
            run_pr(&ctx, number).await?;
        }
    }

    Ok(())
}
