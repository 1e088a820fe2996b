//! Cart Store
//!
//! The single owner of a shopper's cart. It loads the cart when opened, applies every change
//! through [`Cart::dispatch`] and writes the cart back after each change. Mutation requires
//! `&mut self`, so there is exactly one writer at a time.

use std::sync::Arc;

use jiff::Timestamp;
use rusty_money::iso::Currency;

use crate::{
    cart::{Cart, CartAction},
    discounts::{Award, Discount, award_discount},
    persistence::{CartPersistence, KeyValueStore},
    products::{Product, ProductId, VariantId},
    scoring::TierTable,
    session::SessionOutcome,
    totals::{CartTotals, compute_totals},
};

/// A persisted cart.
#[derive(Debug)]
pub struct CartStore<S> {
    cart: Cart,
    persistence: CartPersistence<S>,
    session_id: String,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Open the cart held in `store`, starting an empty one in `currency` if needed.
    pub fn open(store: S, currency: &'static Currency, now: Timestamp) -> Self {
        let mut persistence = CartPersistence::new(store);
        let cart = persistence.load_cart(currency, now);
        let session_id = persistence.session_id();

        tracing::debug!(
            session = %session_id,
            lines = cart.items().len(),
            discounts = cart.discounts().len(),
            "opened cart"
        );

        Self {
            cart,
            persistence,
            session_id,
        }
    }

    /// The current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The shopper's session id.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        self.persistence.store()
    }

    /// Totals for the current cart.
    pub fn totals(&self) -> CartTotals {
        compute_totals(&self.cart)
    }

    /// Discounts that can still be applied at `now`.
    pub fn live_discounts(&self, now: Timestamp) -> impl Iterator<Item = &Discount> {
        self.cart.discounts().live(now)
    }

    /// Apply `action` and persist the cart if it changed.
    pub fn dispatch(&mut self, action: CartAction, now: Timestamp) -> bool {
        let changed = self.cart.dispatch(action, now);

        if changed {
            self.persistence.save_cart(&self.cart);
        }

        changed
    }

    /// Settle a finished game for `product_id` and record the discount it earned.
    pub fn record_game_result(
        &mut self,
        outcome: &SessionOutcome,
        product_id: ProductId,
        table: &TierTable,
    ) -> Award {
        let award = award_discount(outcome, product_id, table);

        self.dispatch(
            CartAction::AddDiscount(award.discount.clone()),
            outcome.finished_at,
        );

        award
    }

    /// Add a product line carrying the product's live discount, if it has one.
    pub fn add_product(
        &mut self,
        product: Arc<Product>,
        variant_id: VariantId,
        quantity: i64,
        now: Timestamp,
    ) -> bool {
        let discount_id = self
            .cart
            .discounts()
            .live_for_product(product.id, now)
            .map(|discount| discount.id);

        self.dispatch(
            CartAction::AddItem {
                product,
                variant_id,
                quantity,
                discount_id,
            },
            now,
        )
    }
}
