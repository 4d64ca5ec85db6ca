//! Cache hierarchy simulator CLI.
//!
//! This binary runs a memory trace through the simulated cache hierarchy
//! and prints per-level statistics. It performs:
//! 1. **Default run:** `cachesim <trace-file>` with the stock L1/L2/L3
//!    hierarchy.
//! 2. **Configured run:** `--config <file.json>` overrides the hierarchy
//!    geometry, latencies, and write policies.
//! 3. **Inspection:** `--info` prints each level's configuration before
//!    the run; `--verbose` additionally dumps every block slot.

use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use std::process;

use cachesim_core::common::error::SimError;
use cachesim_core::config::SimConfig;
use cachesim_core::sim::Driver;

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Trace-driven multi-level cache hierarchy simulator",
    long_about = "Run a memory trace through a simulated cache hierarchy.\n\n\
        The trace is a whitespace-separated stream of records, each an\n\
        operation ('r' or 'w') followed by a hexadecimal byte address.\n\n\
        Examples:\n  cachesim traces/qsort.trace\n  \
        cachesim --config hierarchy.json --info traces/stream.trace"
)]
struct Cli {
    /// Trace file to simulate.
    trace: String,

    /// JSON hierarchy configuration (defaults to the stock L1/L2/L3).
    #[arg(long)]
    config: Option<String>,

    /// Transfer whole blocks on fill instead of the historical single
    /// byte (see RELEASE_NOTES.md).
    #[arg(long)]
    full_block_fill: bool,

    /// Print each cache level's configuration before the run.
    #[arg(long)]
    info: bool,

    /// With --info, also dump the state of every block slot after the run.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => load_config(path).unwrap_or_else(|err| {
            eprintln!("Error: {}", err);
            process::exit(1);
        }),
        None => SimConfig::default(),
    };
    if cli.full_block_fill {
        config.full_block_fill = true;
    }

    let mut driver = Driver::new(&config).unwrap_or_else(|err| {
        eprintln!("Error: {}", err);
        process::exit(1);
    });

    if cli.info {
        driver.hierarchy.print_info(false);
    }

    let trace = File::open(&cli.trace).unwrap_or_else(|err| {
        eprintln!("Unable to open file {}: {}", cli.trace, err);
        process::exit(1);
    });

    if let Err(err) = driver.run(BufReader::new(trace)) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }

    if cli.info && cli.verbose {
        driver.hierarchy.print_info(true);
    }

    driver.print_statistics();
}

/// Loads and deserializes a JSON hierarchy configuration.
///
/// # Errors
///
/// Returns [`SimError::Io`] if the file cannot be opened and
/// [`SimError::Config`] if it does not deserialize.
fn load_config(path: &str) -> Result<SimConfig, SimError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
