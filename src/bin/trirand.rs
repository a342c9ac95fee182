//! trirand command-line tool.
//!
//! Prints pseudo-random draws, one per line.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trirand::{Algorithm, Generator, GeneratorConfig};

/// Print pseudo-random numbers from one of three generators
#[derive(Parser, Debug)]
#[command(name = "trirand")]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (TOML format)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Algorithm: multiply_with_carry (mwc), blum_blum_shub (bbs), unix
    #[arg(short, long)]
    algorithm: Option<Algorithm>,

    /// Fixed seed; omit to seed from the system clock
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of draws to print
    #[arg(short = 'n', long, default_value_t = 10)]
    count: usize,

    /// Lower bound of a bounded draw (requires --max)
    #[arg(long, requires = "max")]
    min: Option<u64>,

    /// Upper bound of a bounded draw (requires --min)
    #[arg(long, requires = "min")]
    max: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TRIRAND_LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

impl Args {
    /// Loads the configuration file, if any, and applies command-line
    /// overrides on top of it.
    fn generator_config(&self) -> Result<GeneratorConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_toml_str(&std::fs::read_to_string(path)?)?,
            None => GeneratorConfig::default(),
        };
        if let Some(algorithm) = self.algorithm {
            config.algorithm = algorithm;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let config = args.generator_config()?;
    tracing::info!(
        algorithm = %config.algorithm,
        seed = ?config.seed,
        count = args.count,
        "generator configuration loaded"
    );

    let mut generator = Generator::from_config(&config)?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for _ in 0..args.count {
        let value = match (args.min, args.max) {
            (Some(min), Some(max)) => generator.random_range(min, max)?,
            _ => generator.random(),
        };
        writeln!(out, "{}", value)?;
    }
    out.flush()?;

    Ok(())
}
