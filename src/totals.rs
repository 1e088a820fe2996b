//! Cart Totals
//!
//! Totals are derived from the cart lines on every read and never stored. Each line
//! contributes the discount it captured when it was added, so totals stay correct after the
//! ledger entry behind a line expires. The combined discount is then held to
//! [`CART_DISCOUNT_CAP`] of the subtotal.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso::Currency};

use crate::{
    cart::Cart,
    money::{round_cents, to_money},
};

/// Highest share of the subtotal that can be discounted, as a fraction.
pub const CART_DISCOUNT_CAP: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

/// The cart-level cap as a percentage.
pub fn cart_discount_cap() -> Percentage {
    Percentage::from(CART_DISCOUNT_CAP)
}

/// Display-ready cart totals.
#[derive(Debug, Clone, PartialEq)]
pub struct CartTotals {
    /// Sum of undiscounted line prices
    pub subtotal: Money<'static, Currency>,

    /// Discount after the cart-level cap
    pub total_discount: Money<'static, Currency>,

    /// Discount as a percentage of the subtotal, to two places
    pub effective_discount_percent: Decimal,

    /// Amount payable
    pub total: Money<'static, Currency>,

    /// Sum of line quantities
    pub item_count: u32,

    /// Same as `total_discount`
    pub savings: Money<'static, Currency>,
}

/// Compute the totals for `cart`.
///
/// Sums run at full precision and are rounded to cents once at the end. The discount is
/// rounded towards zero so the rounded figure never exceeds the cap.
pub fn compute_totals(cart: &Cart) -> CartTotals {
    let currency = cart.currency();

    let (subtotal, raw_discount) = cart
        .items()
        .iter()
        .fold((Decimal::ZERO, Decimal::ZERO), |(subtotal, discount), item| {
            (
                subtotal.saturating_add(item.subtotal()),
                discount.saturating_add(item.discount()),
            )
        });

    let cap = cart_discount_cap() * subtotal;
    let capped = raw_discount.min(cap);

    if capped < raw_discount {
        tracing::debug!(%raw_discount, %cap, "cart discount capped");
    }

    let subtotal = round_cents(subtotal);
    let total_discount = capped.round_dp_with_strategy(2, RoundingStrategy::ToZero);

    let effective_discount_percent = if subtotal.is_zero() {
        Decimal::ZERO
    } else {
        round_cents(total_discount / subtotal * Decimal::ONE_HUNDRED)
    };

    CartTotals {
        subtotal: to_money(subtotal, currency),
        total_discount: to_money(total_discount, currency),
        effective_discount_percent,
        total: to_money(subtotal - total_discount, currency),
        item_count: cart.item_count(),
        savings: to_money(total_discount, currency),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use jiff::Timestamp;
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::{
        cart::CartAction,
        discounts::Discount,
        games::GameType,
        products::{Product, ProductId, ProductVariant, VariantId},
    };

    use super::*;

    fn product(cents: i64) -> Arc<Product> {
        Arc::new(Product {
            id: ProductId::new(),
            name: "Item".to_string(),
            price: Decimal::new(cents, 2),
            currency: USD,
            variants: vec![ProductVariant {
                id: VariantId::new(),
                name: "Default".to_string(),
                in_stock: true,
            }],
        })
    }

    fn add_discounted(cart: &mut Cart, product: &Arc<Product>, quantity: i64, percent: u8) -> TestResult {
        let now = Timestamp::UNIX_EPOCH;
        let discount = Discount::earned(product.id, GameType::TapRush, percent, now);
        let variant_id = product.variants.first().ok_or("no variant")?.id;

        cart.dispatch(CartAction::AddDiscount(discount.clone()), now);
        cart.dispatch(
            CartAction::AddItem {
                product: Arc::clone(product),
                variant_id,
                quantity,
                discount_id: Some(discount.id),
            },
            now,
        );

        Ok(())
    }

    #[test]
    fn empty_cart_is_all_zero() {
        let totals = compute_totals(&Cart::new(USD, Timestamp::UNIX_EPOCH));

        assert!(totals.subtotal.is_zero());
        assert!(totals.total.is_zero());
        assert_eq!(totals.item_count, 0);
        assert_eq!(totals.effective_discount_percent, Decimal::ZERO);
    }

    #[test]
    fn undiscounted_lines_pay_full_price() -> TestResult {
        let mut cart = Cart::new(USD, Timestamp::UNIX_EPOCH);
        add_discounted(&mut cart, &product(1999), 3, 0)?;

        let totals = compute_totals(&cart);

        assert_eq!(totals.subtotal, Money::from_minor(5997, USD));
        assert_eq!(totals.total, Money::from_minor(5997, USD));
        assert!(totals.savings.is_zero());

        Ok(())
    }

    #[test]
    fn rounds_once_at_the_end() -> TestResult {
        let mut cart = Cart::new(USD, Timestamp::UNIX_EPOCH);

        // Three lines whose discounts are each 0.4995 before rounding.
        for _ in 0..3 {
            add_discounted(&mut cart, &product(333), 1, 15)?;
        }

        let totals = compute_totals(&cart);

        assert_eq!(totals.subtotal, Money::from_minor(999, USD));
        assert_eq!(totals.total_discount, Money::from_minor(149, USD));
        assert_eq!(totals.total, Money::from_minor(850, USD));

        Ok(())
    }

    #[test]
    fn effective_percent_is_below_line_percent_when_mixed() -> TestResult {
        let mut cart = Cart::new(USD, Timestamp::UNIX_EPOCH);
        add_discounted(&mut cart, &product(1000), 1, 12)?;
        add_discounted(&mut cart, &product(3000), 1, 0)?;

        let totals = compute_totals(&cart);

        assert_eq!(totals.total_discount, Money::from_minor(120, USD));
        assert_eq!(totals.effective_discount_percent, Decimal::new(300, 2));
        assert_eq!(totals.item_count, 2);

        Ok(())
    }
}
