use clap::Parser;
use log::{debug, info, warn};
use std::io;
use std::time::Duration;

mod error;
mod search;

use error::Result;
use search::{run_parallel_search, LaneWidth, SearchConfig, SearchResult, Target};

// --- Command Line Arguments ---

#[derive(Parser)]
#[command(name = "number-guess")]
#[command(about = "number-guess - brute-force a random 64-bit secret with SIMD workers")]
#[command(version)]
struct Args {
    /// Number of worker threads, each owning one block of the number space
    #[arg(long, short = 'j', default_value_t = 4)]
    workers: usize,
    /// Candidates compared per vector-step (1, 2, 4 or 8)
    #[arg(long, default_value_t = 4)]
    lanes: usize,
    /// Milliseconds between throughput reports
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,
    /// Search for this value instead of a random one (1 ..= i64::MAX)
    #[arg(long, allow_hyphen_values = true)]
    target: Option<i64>,
    /// Random seed for drawing the target
    #[arg(long)]
    seed: Option<u64>,
    /// Use the portable kernel even when AVX2 is available
    #[arg(long)]
    portable: bool,
}

impl Args {
    fn to_config(&self) -> Result<SearchConfig> {
        let config = SearchConfig::default()
            .with_workers(self.workers)
            .with_lane_width(LaneWidth::try_from(self.lanes)?)
            .with_report_interval(Duration::from_millis(self.interval_ms))
            .with_target_option(self.target)
            .with_seed_option(self.seed)
            .with_portable_only(self.portable);
        config.validate()?;
        Ok(config)
    }
}

fn run(args: &Args) -> Result<SearchResult> {
    let config = args.to_config()?;

    let cores = num_cpus::get();
    if config.num_workers > cores {
        warn!(
            "{} workers requested but only {} cores available; workers will share cores",
            config.num_workers, cores
        );
    }

    let target = match config.target {
        Some(value) => Target::new(value)?,
        None => Target::from_seed(config.seed),
    };
    debug!("target: {}", target);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_parallel_search(&config, target, &mut out)
}

// --- Main Function ---
fn main() {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(result) => info!("search finished\n{}", result),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
