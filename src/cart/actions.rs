//! Cart Actions
//!
//! Every change to a [`Cart`] is expressed as a [`CartAction`] and applied in one step.
//! Failed lookups leave the cart untouched and log a warning; expired discounts and clamped
//! quantities are not treated as errors.

use std::sync::Arc;

use jiff::Timestamp;

use crate::{
    cart::{Cart, CartItem, CartItemId, MAX_QUANTITY, clamp_quantity},
    discounts::{Discount, DiscountId},
    products::{Product, VariantId},
};

/// A change to a cart.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Add a product line, optionally applying an earned discount to it.
    AddItem {
        /// Product to add
        product: Arc<Product>,

        /// Variant to add
        variant_id: VariantId,

        /// Requested quantity, clamped
        quantity: i64,

        /// Discount to apply to the new line
        discount_id: Option<DiscountId>,
    },

    /// Remove a line.
    RemoveItem {
        /// Line to remove
        item_id: CartItemId,
    },

    /// Change a line's quantity, clamped.
    UpdateQuantity {
        /// Line to change
        item_id: CartItemId,

        /// New quantity
        quantity: i64,
    },

    /// Remove every line and forget every discount.
    Clear,

    /// Record an earned discount.
    AddDiscount(Discount),

    /// Apply a recorded discount to an existing line.
    ApplyDiscount {
        /// Discount to apply
        discount_id: DiscountId,

        /// Line to apply it to
        item_id: CartItemId,
    },

    /// Mark a discount unapplied.
    RemoveDiscount {
        /// Discount to unapply
        discount_id: DiscountId,
    },
}

/// Apply `action` to `cart`, returning the next cart.
pub fn reduce(mut cart: Cart, action: CartAction, now: Timestamp) -> Cart {
    cart.dispatch(action, now);
    cart
}

impl Cart {
    /// Apply `action` in place, returning whether the cart changed.
    pub fn dispatch(&mut self, action: CartAction, now: Timestamp) -> bool {
        let changed = match action {
            CartAction::AddItem {
                product,
                variant_id,
                quantity,
                discount_id,
            } => self.add_item(product, variant_id, quantity, discount_id, now),
            CartAction::RemoveItem { item_id } => self.remove_item(item_id),
            CartAction::UpdateQuantity { item_id, quantity } => {
                self.update_quantity(item_id, quantity)
            }
            CartAction::Clear => {
                self.items.clear();
                self.discounts.clear();

                true
            }
            CartAction::AddDiscount(discount) => self.discounts.add(discount, now),
            CartAction::ApplyDiscount {
                discount_id,
                item_id,
            } => self.apply_discount(discount_id, item_id, now),
            CartAction::RemoveDiscount { discount_id } => self.discounts.remove(discount_id),
        };

        if changed {
            self.last_updated = now;
        }

        changed
    }

    fn add_item(
        &mut self,
        product: Arc<Product>,
        variant_id: VariantId,
        quantity: i64,
        discount_id: Option<DiscountId>,
        now: Timestamp,
    ) -> bool {
        let Some(variant) = product.variant(variant_id) else {
            tracing::warn!(product = %product.id, variant = %variant_id, "unknown product variant");

            return false;
        };

        if !variant.in_stock {
            tracing::warn!(product = %product.id, variant = %variant_id, "variant out of stock");

            return false;
        }

        if product.currency != self.currency {
            tracing::warn!(
                product = %product.id,
                product_currency = product.currency.iso_alpha_code,
                cart_currency = self.currency.iso_alpha_code,
                "product priced in a different currency"
            );

            return false;
        }

        let mut line = CartItem {
            id: CartItemId::new(),
            product,
            variant_id,
            quantity: clamp_quantity(quantity),
            earned_discount: 0,
            added_at: now,
        };

        if let Some(reason) = line.pricing_defect(self.currency) {
            tracing::warn!(product = %line.product.id, reason, "product cannot be priced");

            return false;
        }

        if let Some(discount_id) = discount_id {
            self.discounts.apply(discount_id, &mut line, now);
        }

        let existing = self
            .items
            .iter_mut()
            .find(|item| item.merges_with(line.product.id, line.variant_id, line.earned_discount));

        match existing {
            Some(item) => {
                item.quantity = item.quantity.saturating_add(line.quantity).min(MAX_QUANTITY);
            }
            None => self.items.push(line),
        }

        true
    }

    fn remove_item(&mut self, item_id: CartItemId) -> bool {
        let before = self.items.len();

        self.items.retain(|item| item.id != item_id);

        if self.items.len() == before {
            tracing::warn!(item = %item_id, "removing unknown cart line");

            return false;
        }

        true
    }

    fn update_quantity(&mut self, item_id: CartItemId, quantity: i64) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.id == item_id) else {
            tracing::warn!(item = %item_id, "updating unknown cart line");

            return false;
        };

        item.quantity = clamp_quantity(quantity);

        true
    }

    fn apply_discount(&mut self, discount_id: DiscountId, item_id: CartItemId, now: Timestamp) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.id == item_id) else {
            tracing::warn!(item = %item_id, discount = %discount_id, "discount for unknown cart line");

            return false;
        };

        self.discounts.apply(discount_id, item, now)
    }
}
