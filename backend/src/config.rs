//! Configuration for the SantaCloud backend
//!
//! CLI arguments with environment variable fallbacks, using clap.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// SantaCloud - North Pole operations backend
#[derive(Parser, Debug, Clone)]
#[command(name = "santa-cloud")]
#[command(about = "Children, gifts, reindeer and letters for the North Pole")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "SANTA_LISTEN", default_value = "127.0.0.1:3000")]
    pub listen: SocketAddr,

    /// Directory for YAML record files; records stay in memory when unset
    #[arg(long, env = "SANTA_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Allowed CORS origin; any origin when unset
    #[arg(long, env = "SANTA_CORS_ORIGIN")]
    pub cors_origin: Option<String>,

    /// Seconds between reindeer simulator passes (0 disables the timer)
    #[arg(long, env = "SANTA_SIMULATOR_INTERVAL_SECS", default_value = "60")]
    pub simulator_interval_secs: u64,

    /// Seed for the simulator RNG, for reproducible runs
    #[arg(long, env = "SANTA_SIMULATOR_SEED")]
    pub simulator_seed: Option<u64>,

    /// Text generation endpoint for letter replies; canned replies when unset
    #[arg(long, env = "SANTA_TEXT_GENERATION_URL")]
    pub text_generation_url: Option<String>,

    /// Text generation request timeout in milliseconds
    #[arg(long, env = "SANTA_TEXT_GENERATION_TIMEOUT_MS", default_value = "10000")]
    pub text_generation_timeout_ms: u64,

    /// Seed the nine default reindeer into an empty reindeer collection
    #[arg(long, env = "SANTA_SEED_REINDEERS", default_value = "true", action = clap::ArgAction::Set)]
    pub seed_reindeers: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SANTA_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Runtime settings consumed by [`initialize_backend`](crate::initialize_backend)
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub data_dir: Option<PathBuf>,
    pub cors_origin: Option<String>,
    pub simulator_interval: Duration,
    pub simulator_seed: Option<u64>,
    pub text_generation_url: Option<String>,
    pub text_generation_timeout: Duration,
    pub seed_reindeers: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            cors_origin: None,
            simulator_interval: Duration::from_secs(60),
            simulator_seed: None,
            text_generation_url: None,
            text_generation_timeout: Duration::from_millis(10_000),
            seed_reindeers: true,
        }
    }
}

impl From<&Args> for BackendConfig {
    fn from(args: &Args) -> Self {
        Self {
            data_dir: args.data_dir.clone(),
            cors_origin: args.cors_origin.clone(),
            simulator_interval: Duration::from_secs(args.simulator_interval_secs),
            simulator_seed: args.simulator_seed,
            text_generation_url: args.text_generation_url.clone(),
            text_generation_timeout: Duration::from_millis(args.text_generation_timeout_ms),
            seed_reindeers: args.seed_reindeers,
        }
    }
}
