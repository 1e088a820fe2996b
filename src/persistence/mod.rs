//! Persistence
//!
//! Best-effort local storage for the cart and the shopper's session id. The cart is written
//! as a versioned JSON record under [`CART_STORAGE_KEY`] after every change. Reading never
//! fails: missing, corrupt or unknown records yield an empty cart.

use std::io;

use jiff::Timestamp;
use mockall::automock;
use rand::{Rng, distributions::Alphanumeric};
use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Cart;

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key the cart record is stored under.
pub const CART_STORAGE_KEY: &str = "arcade_cart";

/// Key the session id is stored under.
pub const SESSION_STORAGE_KEY: &str = "arcade_session";

/// Version written into every cart record.
pub const CART_RECORD_VERSION: u32 = 1;

const SESSION_ID_PREFIX: &str = "sess_";
const SESSION_ID_LENGTH: usize = 24;

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying storage failed.
    #[error("storage I/O error")]
    Io(#[from] io::Error),

    /// The key contains characters outside `[A-Za-z0-9_-]`.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// Errors raised while reading or writing the cart record.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The record could not be encoded or decoded.
    #[error("invalid cart record")]
    Json(#[from] serde_json::Error),

    /// The record was written by an incompatible version.
    #[error("unsupported cart record version: {0:?}")]
    UnsupportedVersion(Option<u32>),
}

/// String storage keyed by name.
#[automock]
pub trait KeyValueStore: Send {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the key is invalid or the storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the key is invalid or the storage cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the key is invalid or the storage cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Whether `key` is usable with every store.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[derive(Serialize)]
struct CartRecord<'a> {
    version: u32,

    #[serde(flatten)]
    cart: &'a Cart,
}

#[derive(Deserialize)]
struct RecordVersion {
    version: Option<u32>,
}

/// Reads and writes the cart through a [`KeyValueStore`].
#[derive(Debug)]
pub struct CartPersistence<S> {
    store: S,
}

impl<S: KeyValueStore> CartPersistence<S> {
    /// Persist through `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the stored cart, or an empty cart in `currency` if there is none, it cannot be
    /// read or it is priced in another currency.
    pub fn load_cart(&self, currency: &'static Currency, now: Timestamp) -> Cart {
        match self.try_load() {
            Ok(Some(cart)) if cart.currency() != currency => {
                tracing::warn!(
                    stored = cart.currency().iso_alpha_code,
                    requested = currency.iso_alpha_code,
                    "discarding cart stored in another currency"
                );

                Cart::new(currency, now)
            }
            Ok(Some(cart)) => cart,
            Ok(None) => Cart::new(currency, now),
            Err(error) => {
                tracing::warn!(%error, "discarding unreadable cart");

                Cart::new(currency, now)
            }
        }
    }

    /// Load the stored cart.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the store fails or the record is corrupt or was
    /// written by another version.
    pub fn try_load(&self) -> Result<Option<Cart>, PersistenceError> {
        let Some(raw) = self.store.get(CART_STORAGE_KEY)? else {
            return Ok(None);
        };

        let RecordVersion { version } = serde_json::from_str(&raw)?;

        if version != Some(CART_RECORD_VERSION) {
            return Err(PersistenceError::UnsupportedVersion(version));
        }

        let cart: Cart = serde_json::from_str(&raw)?;

        Ok(Some(cart.normalised()))
    }

    /// Store `cart`, logging rather than returning any failure.
    pub fn save_cart(&mut self, cart: &Cart) {
        if let Err(error) = self.try_save(cart) {
            tracing::warn!(%error, "failed to persist cart");
        }
    }

    /// Store `cart`.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the cart cannot be encoded or the store fails.
    pub fn try_save(&mut self, cart: &Cart) -> Result<(), PersistenceError> {
        let record = serde_json::to_string(&CartRecord {
            version: CART_RECORD_VERSION,
            cart,
        })?;

        self.store.set(CART_STORAGE_KEY, &record)?;

        Ok(())
    }

    /// The shopper's session id, generated and stored on first use.
    ///
    /// If the store is unavailable a fresh id is returned each time.
    pub fn session_id(&mut self) -> String {
        match self.store.get(SESSION_STORAGE_KEY) {
            Ok(Some(id)) if !id.is_empty() => return id,
            Ok(_) => {}
            Err(error) => tracing::warn!(%error, "failed to read session id"),
        }

        let id = generate_session_id();

        if let Err(error) = self.store.set(SESSION_STORAGE_KEY, &id) {
            tracing::warn!(%error, "failed to persist session id");
        }

        id
    }
}

/// A new random session id.
pub fn generate_session_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_ID_LENGTH)
        .map(char::from)
        .collect();

    format!("{SESSION_ID_PREFIX}{suffix}")
}
