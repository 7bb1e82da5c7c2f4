//! # Join Stress
//!
//! Proves the exclusivity of a two-party join under real parallelism.
//!
//! ## Usage
//!
//! ```bash
//! join_stress --impl atomic --trials 100000 --threads-per-party 4
//! join_stress --config stress.toml --log-level debug
//! ```
//!
//! Exits non-zero if any trial claims zero times or more than once.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use twinjoin_stress::{run, Implementation, StressConfig, StressError, StressResult};

#[derive(Debug, Parser)]
#[command(
    name = "join_stress",
    version,
    about = "Stress the two-party completion join from many threads"
)]
struct Args {
    /// TOML config file. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Join implementation under test.
    #[arg(long = "impl", value_enum)]
    implementation: Option<Implementation>,

    /// Number of independent joins to exercise.
    #[arg(long)]
    trials: Option<usize>,

    /// Threads signaling each party per trial.
    #[arg(long)]
    threads_per_party: Option<usize>,

    /// Signals sent by each thread.
    #[arg(long)]
    calls_per_thread: Option<usize>,

    /// Seed for the spawn order shuffle.
    #[arg(long)]
    seed: Option<u64>,

    /// Logging level or filter directive. Falls back to RUST_LOG, then info.
    #[arg(long)]
    log_level: Option<String>,

    /// Print the effective config as TOML and exit.
    #[arg(long)]
    print_config: bool,
}

impl Args {
    fn resolve_config(&self) -> StressResult<StressConfig> {
        let mut config = match &self.config {
            Some(path) => StressConfig::load(path)?,
            None => StressConfig::default(),
        };

        if let Some(implementation) = self.implementation {
            config.implementation = implementation;
        }
        if let Some(trials) = self.trials {
            config.trials = trials;
        }
        if let Some(threads) = self.threads_per_party {
            config.threads_per_party = threads;
        }
        if let Some(calls) = self.calls_per_thread {
            config.calls_per_thread = calls;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }

        config.validate()?;
        Ok(config)
    }
}

fn build_filter(level: Option<&str>) -> StressResult<EnvFilter> {
    match level {
        Some(level) => EnvFilter::builder()
            .parse(level)
            .map_err(|e| StressError::InvalidConfig(format!("invalid log level '{level}': {e}"))),
        None => Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))),
    }
}

fn init_tracing(level: Option<&str>) -> StressResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(level)?)
        .with_target(false)
        .compact()
        .init();
    Ok(())
}

fn main() -> StressResult<()> {
    let args = Args::parse();
    init_tracing(args.log_level.as_deref())?;

    let config = args.resolve_config()?;
    if args.print_config {
        print!("{}", toml::to_string(&config)?);
        return Ok(());
    }

    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║         TWINJOIN STRESS                                          ║");
    println!("║         EXACTLY ONE CLAIM PER JOIN                               ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();
    println!("  Implementation:     {}", config.implementation);
    println!("  Trials:             {}", config.trials);
    println!("  Threads per party:  {}", config.threads_per_party);
    println!("  Calls per thread:   {}", config.calls_per_thread);
    println!("  Seed:               {:#x}", config.seed);
    println!();

    let report = run(&config)?;

    println!("  Signals sent:       {}", report.signals);
    println!("  Claims:             {}", report.claims);
    println!("  Won by first:       {}", report.first_wins);
    println!("  Won by second:      {}", report.second_wins);
    println!("  Elapsed:            {:.2?}", report.elapsed);
    println!("  Avg per trial:      {:.2} µs", report.avg_trial_us());
    println!();
    println!("  PASS: every trial claimed exactly once");

    Ok(())
}
