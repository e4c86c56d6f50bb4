//! CLI for resuming a Kraken 2 genome library download.

mod resume;

use anyhow::Result;
use clap::Parser;
use k2dl_core::config::{self, K2dlConfig};
use std::path::{Path, PathBuf};

use resume::run_resume;

/// Fetch the genome files still missing from a Kraken 2 library directory.
#[derive(Debug, Parser)]
#[command(name = "k2dl")]
#[command(
    about = "k2dl: resume an interrupted Kraken 2 library download",
    long_about = "Reads <input>/manifest.txt, skips files already under <input>/genomes, \
                  downloads the rest in parallel and re-checks failures on disk."
)]
pub struct Cli {
    /// Library directory that holds manifest.txt (e.g. DBs/kraken/library/bacteria).
    #[arg(short = 'i', long = "input", value_name = "DIR")]
    pub input: PathBuf,

    /// Number of parallel downloads (default from config, 4 when the flag is given bare).
    #[arg(
        short = 't',
        long = "threads",
        value_name = "N",
        num_args = 0..=1,
        default_missing_value = "4",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub threads: Option<u32>,

    /// Read settings from this TOML file instead of ~/.config/k2dl/config.toml.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        cli.run()
    }

    pub fn run(self) -> Result<()> {
        let cfg = load_config(self.config.as_deref())?;
        tracing::debug!("loaded config: {:?}", cfg);
        let threads = self.threads.map(|t| t as usize).unwrap_or(cfg.threads);
        run_resume(&cfg, &self.input, threads)?;
        Ok(())
    }
}

/// An explicit `--config` must load; the default location falls back to built-in settings.
fn load_config(explicit: Option<&Path>) -> Result<K2dlConfig> {
    match explicit {
        Some(path) => config::load_from_path(path),
        None => match config::load_or_init() {
            Ok(cfg) => Ok(cfg),
            Err(e) => {
                tracing::warn!("using default config: {:#}", e);
                Ok(K2dlConfig::default())
            }
        },
    }
}
