//! Arcade prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartAction, CartItem, CartItemId, MAX_QUANTITY, MIN_QUANTITY, reduce},
    catalog::{Catalog, CatalogError},
    discounts::{
        Award, DISCOUNT_LIFETIME, Discount, DiscountId, MAX_LINE_DISCOUNT_PERCENT, award_discount,
    },
    games::GameType,
    ledger::DiscountLedger,
    persistence::{
        CartPersistence, FileStore, KeyValueStore, MemoryStore, PersistenceError, StoreError,
    },
    products::{Product, ProductId, ProductVariant, VariantId},
    scoring::{Flavour, NextTier, ScoreOutcome, Tier, TierTable, TierTableError},
    session::{
        Clock, GameRunner, GameSession, LivesSession, SessionOutcome, SessionStatus, SystemClock,
        TimedSession, TokioClock,
    },
    store::CartStore,
    summary::{SummaryError, render_cart, write_award, write_cart},
    totals::{CART_DISCOUNT_CAP, CartTotals, compute_totals},
};
