//! Refnorm CLI - normalizes container image references to canonical form.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod logging;
mod output;

use commands::{familiar, normalize, serve, show_config};

#[derive(Parser)]
#[command(name = "refnorm")]
#[command(about = "Container image reference normalization CLI")]
struct Cli {
    /// Configuration file (TOML); defaults to $REFNORM_CONFIG, then the XDG config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Raise log verbosity on stderr (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical form of each reference
    Normalize {
        /// References to normalize
        #[arg(required = true)]
        refs: Vec<String>,
        /// Print a response envelope per reference
        #[arg(long)]
        json: bool,
        /// Print the parsed components of each reference
        #[arg(long, conflicts_with = "json")]
        explain: bool,
    },
    /// Print the familiar (short) form of each reference
    Familiar {
        /// References to shorten
        #[arg(required = true)]
        refs: Vec<String>,
    },
    /// Answer JSON-lines request envelopes from stdin on stdout
    Serve,
    /// Print the effective configuration as TOML
    Config,
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let normalizer = config::load_normalizer(cli.config.as_deref())?;

    match cli.command {
        Commands::Normalize {
            refs,
            json,
            explain,
        } => normalize::run(&normalizer, &refs, json, explain),
        Commands::Familiar { refs } => familiar::run(&normalizer, &refs),
        Commands::Serve => serve::run(&normalizer),
        Commands::Config => show_config::run(&normalizer),
    }
}
