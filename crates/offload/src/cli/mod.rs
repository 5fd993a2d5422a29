pub mod console;
pub mod run;

use clap::Parser;
use offload_lib::{Config, FailurePolicy, HashAlgorithm};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "offload")]
#[command(about = "Copy a directory tree, verify the copies by hash and remove old originals", long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(help = "Directory to copy from and prune")]
    pub source: PathBuf,

    #[arg(help = "Directory that receives the mirrored copies")]
    pub destination: PathBuf,

    #[arg(long, help = "Remove verified source files older than this many days [default: 2]")]
    pub days: Option<u32>,

    #[arg(long, value_parser = parse_algorithm, help = "Digest used for verification: md5, blake3 [default: md5]")]
    pub algorithm: Option<HashAlgorithm>,

    #[arg(long, value_parser = parse_failure_policy, help = "Per-file failure handling: abort, skip [default: abort]")]
    pub on_error: Option<FailurePolicy>,

    #[arg(long, help = "Report what would be copied and removed without changing anything")]
    pub dry_run: bool,

    #[arg(long, help = "Path to an offload.toml config file")]
    pub config: Option<PathBuf>,

    #[arg(long, short = 'v', help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, short = 'q', help = "Only print errors and the final summary")]
    pub quiet: bool,

    #[arg(long, help = "Disable coloured output")]
    pub no_color: bool,
}

impl Cli {
    /// Layers command-line overrides on top of file/default configuration.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(days) = self.days {
            config.retention_days = i64::from(days);
        }
        if let Some(algorithm) = self.algorithm {
            config.algorithm = algorithm;
        }
        if let Some(on_error) = self.on_error {
            config.on_error = on_error;
        }
        if self.dry_run {
            config.dry_run = true;
        }
        config
    }
}

fn parse_algorithm(s: &str) -> Result<HashAlgorithm, String> {
    HashAlgorithm::from_str(s).map_err(|e| e.to_string())
}

fn parse_failure_policy(s: &str) -> Result<FailurePolicy, String> {
    FailurePolicy::from_str(s).map_err(|e| e.to_string())
}

pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}
