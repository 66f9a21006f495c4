//! Matchstate CLI - reconstruct match state from decoded replay dumps.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Matchstate - continuous match state from replay tracker events
#[derive(Parser, Debug)]
#[command(name = "matchstate")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Reconstruction config file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print fixed-interval rows for a match
    Timeline {
        /// Replay dump (.json)
        #[arg(required = true)]
        replay: PathBuf,

        /// Interval step in seconds (default: 7)
        #[arg(short, long)]
        interval: Option<u32>,

        /// Group rows into windows of this many seconds
        #[arg(short, long)]
        window: Option<u32>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::TimelineFormat,
    },

    /// Capture state at checkpoint timestamps
    Checkpoints {
        /// Replay dump (.json)
        #[arg(required = true)]
        replay: PathBuf,

        /// Checkpoint times in seconds, ascending (default: 120,240,360,480,600)
        #[arg(short, long, value_delimiter = ',')]
        at: Option<Vec<u32>>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::ReportFormat,
    },

    /// Show final totals, live units and upgrades
    Summary {
        /// Replay dump (.json)
        #[arg(required = true)]
        replay: PathBuf,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::ReportFormat,
    },

    /// Reconstruct every replay dump in a directory
    Batch {
        /// Directory of replay dumps
        #[arg(required = true)]
        dir: PathBuf,

        /// Output directory for match reports
        #[arg(short, long, required = true)]
        out: PathBuf,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.log_json);

    let result = match args.command {
        Commands::Timeline {
            replay,
            interval,
            window,
            format,
        } => cli::timeline::execute(args.config, replay, interval, window, format),

        Commands::Checkpoints { replay, at, format } => {
            cli::checkpoints::execute(args.config, replay, at, format)
        }

        Commands::Summary { replay, format } => cli::summary::execute(args.config, replay, format),

        Commands::Batch {
            dir,
            out,
            threads,
            progress,
        } => cli::batch::execute(args.config, dir, out, threads, progress),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
