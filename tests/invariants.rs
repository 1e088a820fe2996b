//! Invariant sweeps.
//!
//! Drives carts and tier tables across ranges of inputs and checks the properties that must
//! hold for every one of them: the cart discount never exceeds 15% of the subtotal, a higher
//! score never earns less, each product has at most one live discount, quantities stay within
//! 1-99 and expired discounts never reach a line.

use std::{fs, sync::Arc};

use jiff::{SignedDuration, Timestamp};
use rust_decimal::Decimal;
use rusty_money::iso::USD;
use testresult::TestResult;

use arcade::{
    prelude::*,
    scoring::tables::{five_tier, four_tier},
};

fn at(secs: i64) -> Timestamp {
    Timestamp::UNIX_EPOCH + SignedDuration::from_secs(secs)
}

fn product(cents: i64) -> (Arc<Product>, VariantId) {
    let variant_id = VariantId::new();

    let product = Arc::new(Product {
        id: ProductId::new(),
        name: format!("Item {cents}"),
        price: Decimal::new(cents, 2),
        currency: USD,
        variants: vec![ProductVariant {
            id: variant_id,
            name: "Default".to_string(),
            in_stock: true,
        }],
    });

    (product, variant_id)
}

fn add(cart: &mut Cart, product: &Arc<Product>, variant_id: VariantId, quantity: i64) {
    let discount_id = cart
        .discounts()
        .live_for_product(product.id, at(0))
        .map(|discount| discount.id);

    cart.dispatch(
        CartAction::AddItem {
            product: Arc::clone(product),
            variant_id,
            quantity,
            discount_id,
        },
        at(0),
    );
}

#[test]
fn cart_discount_never_exceeds_cap() {
    let prices = [1, 99, 333, 1999, 4550, 12_345];

    for percent in 0..=15_u8 {
        for &cents in &prices {
            for quantity in [1, 3, 7, 99] {
                let mut cart = Cart::new(USD, at(0));

                for offset in 0..3 {
                    let (item, variant) = product(cents + offset);

                    cart.dispatch(
                        CartAction::AddDiscount(Discount::earned(
                            item.id,
                            GameType::TapRush,
                            percent,
                            at(0),
                        )),
                        at(0),
                    );
                    add(&mut cart, &item, variant, quantity);
                }

                let totals = compute_totals(&cart);
                let cap = totals.subtotal.amount() * CART_DISCOUNT_CAP;

                assert!(
                    *totals.total_discount.amount() <= cap,
                    "{percent}% of {cents} x{quantity}: {} exceeds {cap}",
                    totals.total_discount
                );
                assert!(totals.effective_discount_percent <= Decimal::from(15));
                assert_eq!(
                    *totals.total.amount(),
                    totals.subtotal.amount() - totals.total_discount.amount()
                );
            }
        }
    }
}

#[test]
fn higher_scores_never_earn_less() -> TestResult {
    let custom = TierTable::from_yaml(&fs::read_to_string("fixtures/tiers.yml")?)?;

    for table in [five_tier(), four_tier(), custom] {
        let mut previous = 0;

        for score in -50..=200 {
            let percent = table.convert(score).discount_percent;

            assert!(percent >= previous, "score {score} dropped to {percent}%");
            assert!(percent <= table.max_percent());

            previous = percent;
        }
    }

    Ok(())
}

#[test]
fn one_live_discount_per_product() {
    let (item, _) = product(1000);
    let other = ProductId::new();
    let mut ledger = DiscountLedger::new();

    for round in 0..10_i64 {
        let now = at(round * 60);

        ledger.add(
            Discount::earned(item.id, GameType::CatchTheDeal, 3, now),
            now,
        );
        ledger.add(Discount::earned(other, GameType::TapRush, 6, now), now);

        for product_id in [item.id, other] {
            let live = ledger
                .live(now)
                .filter(|discount| discount.product_id == product_id)
                .count();

            assert_eq!(live, 1, "round {round}");
        }
    }
}

#[test]
fn quantities_stay_in_range() -> TestResult {
    let (item, variant) = product(500);

    for requested in [-100, -1, 0, 1, 2, 50, 98, 99, 100, 1000, i64::MAX] {
        let mut cart = Cart::new(USD, at(0));

        add(&mut cart, &item, variant, requested);

        let line = cart.items().first().ok_or("missing line")?;
        let item_id = line.id;

        assert!((MIN_QUANTITY..=MAX_QUANTITY).contains(&line.quantity));

        cart.dispatch(
            CartAction::UpdateQuantity {
                item_id,
                quantity: requested.saturating_mul(3),
            },
            at(0),
        );

        for line in cart.items() {
            assert!((MIN_QUANTITY..=MAX_QUANTITY).contains(&line.quantity));
        }
    }

    Ok(())
}

#[test]
fn merged_lines_stop_at_maximum_quantity() -> TestResult {
    let (item, variant) = product(500);
    let mut cart = Cart::new(USD, at(0));

    for _ in 0..5 {
        add(&mut cart, &item, variant, 40);
    }

    assert_eq!(cart.items().len(), 1);
    assert_eq!(
        cart.items().first().ok_or("missing line")?.quantity,
        MAX_QUANTITY
    );

    Ok(())
}

#[test]
fn expired_discounts_never_apply() -> TestResult {
    let (item, variant) = product(2500);
    let earned = at(0);

    for offset in [1, 60, 3600, 86_400] {
        let now = earned + DISCOUNT_LIFETIME + SignedDuration::from_secs(offset);
        let discount = Discount::earned(item.id, GameType::TapRush, 12, earned);
        let mut cart = Cart::new(USD, earned);

        cart.dispatch(CartAction::AddDiscount(discount.clone()), earned);

        assert!(cart.discounts().live(now).next().is_none());
        assert!(cart.discounts().live_for_product(item.id, now).is_none());

        cart.dispatch(
            CartAction::AddItem {
                product: Arc::clone(&item),
                variant_id: variant,
                quantity: 1,
                discount_id: Some(discount.id),
            },
            now,
        );

        let line = cart.items().first().ok_or("missing line")?;

        assert_eq!(line.earned_discount, 0);
        assert!(compute_totals(&cart).total_discount.is_zero());
    }

    Ok(())
}
