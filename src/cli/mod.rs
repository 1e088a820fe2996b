//! Command implementations

use std::io;

use jiff::Timestamp;
use rusty_money::iso::Currency;
use thiserror::Error;
use tokio::sync::oneshot::error::RecvError;

use arcade::{
    cart::CartAction,
    catalog::CatalogError,
    money::currency_from_code,
    persistence::FileStore,
    scoring::TierTableError,
    store::CartStore,
    summary::{SummaryError, write_cart},
};

use crate::cli::config::{ArcadeConfig, Command, StorageConfig};

pub(crate) mod config;
pub(crate) mod observability;
mod play;

/// Errors that end a command.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("failed to load catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("failed to load tier table: {0}")]
    Tiers(#[from] TierTableError),

    #[error("failed to read file: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Summary(#[from] SummaryError),

    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    #[error("no product matches '{0}'")]
    UnknownProduct(String),

    #[error("product '{product}' has no variant '{variant}'")]
    UnknownVariant { product: String, variant: String },

    #[error("product '{0}' has no variant in stock")]
    OutOfStock(String),

    #[error("game duration is out of range")]
    InvalidDuration,

    #[error("game session could not be started")]
    SessionNotStarted,

    #[error("game session ended without an outcome")]
    SessionAbandoned(#[from] RecvError),
}

/// Run the configured command.
pub(crate) async fn run(config: &ArcadeConfig) -> Result<(), CliError> {
    match &config.command {
        Command::Play(args) => play::run(&config.storage, args).await,
        Command::Cart => show_cart(&config.storage),
        Command::Clear => clear_cart(&config.storage),
    }
}

fn currency(storage: &StorageConfig) -> Result<&'static Currency, CliError> {
    currency_from_code(&storage.currency)
        .ok_or_else(|| CliError::UnknownCurrency(storage.currency.clone()))
}

fn open_store(storage: &StorageConfig, currency: &'static Currency) -> CartStore<FileStore> {
    CartStore::open(FileStore::new(&storage.storage_dir), currency, Timestamp::now())
}

fn show_cart(storage: &StorageConfig) -> Result<(), CliError> {
    let store = open_store(storage, currency(storage)?);

    write_cart(
        io::stdout().lock(),
        store.cart(),
        &store.totals(),
        Timestamp::now(),
    )?;

    Ok(())
}

fn clear_cart(storage: &StorageConfig) -> Result<(), CliError> {
    let mut store = open_store(storage, currency(storage)?);

    store.dispatch(CartAction::Clear, Timestamp::now());

    tracing::info!(session = store.session_id(), "cart cleared");

    Ok(())
}
