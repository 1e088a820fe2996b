//! Cart
//!
//! The shopper's cart: product lines, the ledger of earned discounts and the time of the last
//! change. A cart only changes through [`CartAction`]s, see [`Cart::dispatch`] and [`reduce`].
//!
//! The same product can appear on several lines when the lines carry different earned
//! discounts. Lines only merge when product, variant and earned discount all match.

use std::sync::Arc;

use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};

use crate::{
    discounts::MAX_LINE_DISCOUNT_PERCENT,
    ids::typed_id,
    ledger::DiscountLedger,
    money::currency_code,
    products::{Product, ProductId, VariantId},
};

pub mod actions;

pub use actions::{CartAction, reduce};

typed_id! {
    /// Cart line identifier
    CartItemId
}

/// Smallest quantity a line can hold.
pub const MIN_QUANTITY: u32 = 1;

/// Largest quantity a line can hold.
pub const MAX_QUANTITY: u32 = 99;

/// Clamp any requested quantity into `MIN_QUANTITY..=MAX_QUANTITY`.
pub fn clamp_quantity(quantity: i64) -> u32 {
    let clamped = quantity.clamp(i64::from(MIN_QUANTITY), i64::from(MAX_QUANTITY));

    u32::try_from(clamped).unwrap_or(MIN_QUANTITY)
}

/// A line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Line identifier
    pub id: CartItemId,

    /// Product on this line
    pub product: Arc<Product>,

    /// Selected variant
    pub variant_id: VariantId,

    /// Quantity, within `MIN_QUANTITY..=MAX_QUANTITY`
    pub quantity: u32,

    /// Discount percent captured by this line
    pub earned_discount: u8,

    /// When the line was created
    pub added_at: Timestamp,
}

impl CartItem {
    /// Undiscounted line price at full precision, saturating at [`Decimal::MAX`].
    pub fn subtotal(&self) -> Decimal {
        self.product.price.saturating_mul(Decimal::from(self.quantity))
    }

    /// Discount this line asks for at full precision, before the cart-level cap.
    pub fn discount(&self) -> Decimal {
        let rate = Decimal::from(self.earned_discount) / Decimal::ONE_HUNDRED;

        self.subtotal().saturating_mul(rate)
    }

    /// Why this line cannot be priced in `currency`, if it cannot.
    ///
    /// Checked against [`MAX_QUANTITY`] so a line stays priceable after merges.
    pub(crate) fn pricing_defect(&self, currency: &Currency) -> Option<&'static str> {
        if self.product.price < Decimal::ZERO {
            return Some("negative price");
        }

        if self.product.currency != currency {
            return Some("priced in another currency");
        }

        if self
            .product
            .price
            .checked_mul(Decimal::from(MAX_QUANTITY))
            .is_none()
        {
            return Some("line amount out of range");
        }

        None
    }

    fn merges_with(&self, product: ProductId, variant: VariantId, earned_discount: u8) -> bool {
        self.product.id == product
            && self.variant_id == variant
            && self.earned_discount == earned_discount
    }
}

/// A shopper's cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(with = "currency_code")]
    currency: &'static Currency,
    items: Vec<CartItem>,
    discounts: DiscountLedger,
    last_updated: Timestamp,
}

impl Cart {
    /// An empty cart priced in `currency`.
    pub fn new(currency: &'static Currency, now: Timestamp) -> Self {
        Self {
            currency,
            items: Vec::new(),
            discounts: DiscountLedger::new(),
            last_updated: now,
        }
    }

    /// Currency every line must be priced in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Lines in the order they were added.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Look up a line.
    pub fn item(&self, id: CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Earned discounts.
    pub fn discounts(&self) -> &DiscountLedger {
        &self.discounts
    }

    /// When the cart last changed.
    pub fn last_updated(&self) -> Timestamp {
        self.last_updated
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of line quantities.
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |count, item| count.saturating_add(item.quantity))
    }

    /// Bring quantities and line discounts read from outside back within their bounds, and
    /// drop lines that cannot be priced in the cart's currency.
    pub(crate) fn normalised(mut self) -> Self {
        let currency = self.currency;

        self.items.retain(|item| match item.pricing_defect(currency) {
            Some(reason) => {
                tracing::warn!(
                    item = %item.id,
                    product = %item.product.id,
                    reason,
                    "dropping stored cart line"
                );

                false
            }
            None => true,
        });

        for item in &mut self.items {
            item.quantity = clamp_quantity(i64::from(item.quantity));
            item.earned_discount = item.earned_discount.min(MAX_LINE_DISCOUNT_PERCENT);
        }

        self
    }
}
