//! Discount Ledger
//!
//! Every discount earned during a shopping session, applied or not, live or expired. Expired
//! entries are never swept; they simply stop being applicable and are skipped by the
//! display queries until the cart is cleared.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    cart::CartItem,
    discounts::{Discount, DiscountId},
    products::ProductId,
};

/// The discounts earned during a shopping session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscountLedger {
    discounts: Vec<Discount>,
}

impl DiscountLedger {
    /// Empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly earned discount as unapplied.
    ///
    /// Ignored if a discount with the same id is already recorded. Any other live discount
    /// for the same product is evicted first, so the most recent play always wins.
    pub fn add(&mut self, discount: Discount, now: Timestamp) -> bool {
        if self.get(discount.id).is_some() {
            tracing::warn!(discount = %discount.id, "discount already recorded");

            return false;
        }

        let before = self.discounts.len();

        self.discounts
            .retain(|existing| existing.product_id != discount.product_id || !existing.is_live(now));

        let evicted = before - self.discounts.len();

        if evicted > 0 {
            tracing::debug!(
                product = %discount.product_id,
                evicted,
                "superseded live discount for product"
            );
        }

        self.discounts.push(Discount {
            applied: false,
            ..discount
        });

        true
    }

    /// Apply a discount to a cart line.
    ///
    /// Leaves everything untouched when the discount is unknown, has expired, or belongs to a
    /// different product. On success the discount is marked applied and the line records the
    /// discount's percentage, capped at the per-line maximum.
    pub fn apply(&mut self, id: DiscountId, item: &mut CartItem, now: Timestamp) -> bool {
        let Some(discount) = self.discounts.iter_mut().find(|discount| discount.id == id) else {
            tracing::warn!(discount = %id, item = %item.id, "applying unknown discount");

            return false;
        };

        if !discount.is_live(now) {
            tracing::debug!(discount = %id, expired_at = %discount.expires_at, "discount expired");

            return false;
        }

        if discount.product_id != item.product.id {
            tracing::warn!(
                discount = %id,
                discount_product = %discount.product_id,
                item_product = %item.product.id,
                "discount does not belong to cart line product"
            );

            return false;
        }

        discount.applied = true;
        item.earned_discount = discount.line_percent();

        true
    }

    /// Mark a discount unapplied. Cart lines keep the percentage they already captured.
    pub fn remove(&mut self, id: DiscountId) -> bool {
        let Some(discount) = self.discounts.iter_mut().find(|discount| discount.id == id) else {
            tracing::warn!(discount = %id, "removing unknown discount");

            return false;
        };

        discount.applied = false;

        true
    }

    /// Forget every discount.
    pub fn clear(&mut self) {
        self.discounts.clear();
    }

    /// Look up a discount by id, expired or not.
    pub fn get(&self, id: DiscountId) -> Option<&Discount> {
        self.discounts.iter().find(|discount| discount.id == id)
    }

    /// Every recorded discount, in the order earned.
    pub fn all(&self) -> &[Discount] {
        &self.discounts
    }

    /// Discounts that can still be applied at `now`.
    pub fn live(&self, now: Timestamp) -> impl Iterator<Item = &Discount> {
        self.discounts
            .iter()
            .filter(move |discount| discount.is_live(now))
    }

    /// The live discount for `product`, if any.
    pub fn live_for_product(&self, product: ProductId, now: Timestamp) -> Option<&Discount> {
        self.live(now)
            .find(|discount| discount.product_id == product)
    }

    /// Number of recorded discounts.
    pub fn len(&self) -> usize {
        self.discounts.len()
    }

    /// Whether nothing has been earned yet.
    pub fn is_empty(&self) -> bool {
        self.discounts.is_empty()
    }
}
