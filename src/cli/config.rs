//! Command line configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Arcade configuration
#[derive(Debug, Parser)]
#[command(name = "arcade", about = "Play mini-games to earn cart discounts", long_about = None)]
pub(crate) struct ArcadeConfig {
    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Catalog and cart storage settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

impl ArcadeConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub(crate) fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Catalog and storage settings.
#[derive(Debug, Args)]
pub(crate) struct StorageConfig {
    /// Directory the cart and session id are stored in
    #[arg(long, env = "ARCADE_STORAGE_DIR", default_value = ".arcade")]
    pub storage_dir: PathBuf,

    /// Product catalog (YAML)
    #[arg(long, env = "ARCADE_CATALOG", default_value = "fixtures/catalog.yml")]
    pub catalog: PathBuf,

    /// Currency for a new cart (ISO code)
    #[arg(long, env = "ARCADE_CURRENCY", default_value = "USD")]
    pub currency: String,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Play a game for a product and add it to the cart with the discount earned.
    Play(PlayArgs),

    /// Show the cart.
    Cart,

    /// Empty the cart and forget every earned discount.
    Clear,
}

/// Settings for a simulated game.
#[derive(Debug, Args)]
pub(crate) struct PlayArgs {
    /// Product catalog key, id or name
    pub product: String,

    /// Game to play (catch-the-deal, tap-rush, dodge-the-fees)
    #[arg(short, long, default_value = "catch-the-deal")]
    pub game: String,

    /// Variant name or id (defaults to the first in stock)
    #[arg(long)]
    pub variant: Option<String>,

    /// Quantity to add to the cart
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
    pub quantity: i64,

    /// Game length in seconds
    #[arg(long, env = "ARCADE_GAME_DURATION_SECS", default_value_t = 10)]
    pub duration_secs: u64,

    /// Session clock tick interval in milliseconds
    #[arg(long, env = "ARCADE_TICK_MS", default_value_t = 100)]
    pub tick_ms: u64,

    /// Lives for lives-based games
    #[arg(long, env = "ARCADE_LIVES", default_value_t = 3)]
    pub lives: u32,

    /// Tier table (YAML) replacing the game's built-in table
    #[arg(long, env = "ARCADE_TIERS")]
    pub tiers: Option<PathBuf>,

    /// Seed for the simulated player
    #[arg(long)]
    pub seed: Option<u64>,
}
