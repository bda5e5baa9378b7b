//! Command-line trace replayer for the core timing model.
//!
//! This binary replays a retirement trace produced by a functional simulator
//! through the timing model. It supports:
//! 1. **Run:** Replay a JSON-lines trace and report cycle statistics as text or JSON.
//! 2. **Config:** Print the default model configuration as an editable JSON document.
//!
//! Diagnostics go to stderr through `tracing`; set `RUST_LOG=rvtiming_core=debug`
//! to see every misprediction and cache miss.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process;

use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rvtiming_core::config::LoadError;
use rvtiming_core::sim::trace::{TraceError, TraceReader};
use rvtiming_core::soc::FlatMemory;
use rvtiming_core::stats::STATS_SECTIONS;
use rvtiming_core::{CoreTiming, TimingConfig, TimingStats};

#[derive(Parser, Debug)]
#[command(
    name = "rvtiming",
    author,
    version,
    about = "Cycle-accurate timing model for an in-order RISC-V core",
    long_about = "Replay a retirement trace through the pipeline, branch predictor and \
                  instruction-cache timing models.\n\nExamples:\n  \
                  rvtiming run --trace prog.jsonl\n  \
                  rvtiming run --trace prog.jsonl --config mcu.json --seed 7 --json\n  \
                  rvtiming run --trace prog.jsonl --image prog.bin --base 0x20000000\n  \
                  rvtiming config > mcu.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a JSON-lines retirement trace.
    Run {
        /// Trace file, one retired instruction per line.
        #[arg(short, long)]
        trace: PathBuf,

        /// Model configuration (JSON); defaults are used for missing fields.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Overrides the configured random seed.
        #[arg(long)]
        seed: Option<u64>,

        /// Raw program image backing instruction fetches.
        #[arg(long, requires = "base")]
        image: Option<PathBuf>,

        /// Load address of the program image.
        #[arg(long, value_parser = parse_addr)]
        base: Option<u64>,

        /// Print statistics as JSON instead of text.
        #[arg(long)]
        json: bool,

        /// Text report sections to print (default: all).
        #[arg(long, value_parser = PossibleValuesParser::new(STATS_SECTIONS.iter().copied()))]
        stats: Vec<String>,
    },

    /// Print the default configuration as JSON.
    Config,
}

/// Failure of a CLI command.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: LoadError,
    },
    #[error("{}: {source}", path.display())]
    Trace {
        path: PathBuf,
        #[source]
        source: TraceError,
    },
    #[error("cannot encode output: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run {
            trace,
            config,
            seed,
            image,
            base,
            json,
            stats,
        } => cmd_run(&RunArgs {
            trace,
            config,
            seed,
            image,
            base: base.unwrap_or_default(),
            json,
            stats,
        }),
        Commands::Config => cmd_config(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Options of the `run` subcommand.
#[derive(Debug, Default)]
struct RunArgs {
    trace: PathBuf,
    config: Option<PathBuf>,
    seed: Option<u64>,
    image: Option<PathBuf>,
    base: u64,
    json: bool,
    stats: Vec<String>,
}

fn cmd_run(args: &RunArgs) -> Result<(), CliError> {
    let stats = replay(args)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{}", stats.render_sections(&args.stats));
    }
    Ok(())
}

fn cmd_config() -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(&TimingConfig::default())?);
    Ok(())
}

/// Builds the model described by `args` and replays the trace through it.
fn replay(args: &RunArgs) -> Result<TimingStats, CliError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => TimingConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut mem = match &args.image {
        Some(path) => FlatMemory::new(args.base, read(path)?),
        None => FlatMemory::default(),
    };
    info!(
        trace = %args.trace.display(),
        seed = config.seed,
        image_bytes = mem.len(),
        "replaying trace"
    );

    let file = File::open(&args.trace).map_err(|source| CliError::Io {
        path: args.trace.clone(),
        source,
    })?;
    let mut core = CoreTiming::new(&config);
    for record in TraceReader::new(BufReader::new(file)) {
        let insn = record.map_err(|source| CliError::Trace {
            path: args.trace.clone(),
            source,
        })?;
        let _ = core.retire(&insn, &mut mem);
    }

    info!(
        cycles = core.total_cycles(),
        instructions = core.stats().instructions_retired,
        "replay finished"
    );
    Ok(core.stats().clone())
}

fn load_config(path: &Path) -> Result<TimingConfig, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    TimingConfig::from_json(&text).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })
}

fn read(path: &Path) -> Result<Vec<u8>, CliError> {
    fs::read(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses a decimal or `0x`-prefixed hexadecimal address.
fn parse_addr(s: &str) -> Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => s.replace('_', "").parse(),
    };
    parsed.map_err(|e| format!("invalid address '{s}': {e}"))
}
