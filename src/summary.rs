//! Cart Summary
//!
//! Text rendering of a cart, its totals and the discounts still waiting to be used.

use std::io;

use jiff::{SignedDuration, Timestamp};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::Cart,
    discounts::Award,
    money::to_money,
    products::Product,
    session::SessionOutcome,
    totals::CartTotals,
};

/// Errors raised while writing a summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// The output could not be written.
    #[error("failed to write summary")]
    Io(#[from] io::Error),
}

/// Render the cart and its totals as text.
pub fn render_cart(cart: &Cart, totals: &CartTotals, now: Timestamp) -> String {
    let mut out = Vec::new();

    // Writing into a Vec cannot fail.
    if write_cart(&mut out, cart, totals, now).is_err() {
        return String::new();
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// Write the cart lines, totals and live discounts to `out`.
///
/// # Errors
///
/// Returns a [`SummaryError`] if `out` cannot be written.
pub fn write_cart(
    mut out: impl io::Write,
    cart: &Cart,
    totals: &CartTotals,
    now: Timestamp,
) -> Result<(), SummaryError> {
    if cart.is_empty() {
        writeln!(out, "\nYour cart is empty.")?;
    } else {
        writeln!(out, "\n{}", lines_table(cart))?;
    }

    writeln!(out, " Items:    {}", totals.item_count)?;
    writeln!(out, " Subtotal: {}", totals.subtotal)?;
    writeln!(
        out,
        " Savings:  ({:.2}%) {}",
        totals.effective_discount_percent, totals.savings
    )?;
    writeln!(out, " \x1b[1mTotal:    {}\x1b[0m", totals.total)?;

    let live: Vec<_> = cart.discounts().live(now).collect();

    if !live.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["Product", "Game", "Discount", "Expires in", "Applied"]);

        for discount in live {
            let product = cart
                .items()
                .iter()
                .find(|item| item.product.id == discount.product_id)
                .map_or_else(|| discount.product_id.to_string(), |item| item.product.name.clone());

            builder.push_record([
                product,
                discount.game_type.to_string(),
                format!("{}%", discount.discount_percent),
                countdown(discount.time_remaining(now)),
                if discount.applied { "yes" } else { "no" }.to_string(),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);

        writeln!(out, "\n{table}")?;
    }

    writeln!(out)?;

    Ok(())
}

fn lines_table(cart: &Cart) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Item", "Qty", "Unit Price", "Line Total", "Discount"]);

    for item in cart.items() {
        let discount = if item.earned_discount == 0 {
            String::new()
        } else {
            format!("{}%", item.earned_discount)
        };

        builder.push_record([
            item.product.name.clone(),
            item.quantity.to_string(),
            to_money(item.product.price, cart.currency()).to_string(),
            to_money(item.subtotal(), cart.currency()).to_string(),
            discount,
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(1..5), Alignment::right());

    table.to_string()
}

/// Write the result of a finished game.
///
/// # Errors
///
/// Returns a [`SummaryError`] if `out` cannot be written.
pub fn write_award(
    mut out: impl io::Write,
    outcome: &SessionOutcome,
    product: &Product,
    award: &Award,
) -> Result<(), SummaryError> {
    let flavour = &award.score.flavour;

    writeln!(
        out,
        "\n{} {} ({}): scored {}",
        outcome.game, outcome.status, product.name, outcome.score
    )?;

    if flavour.emoji.is_empty() {
        writeln!(out, " {}", flavour.message)?;
    } else {
        writeln!(out, " {} {}", flavour.emoji, flavour.message)?;
    }

    if !flavour.subtext.is_empty() {
        writeln!(out, " {}", flavour.subtext)?;
    }

    writeln!(
        out,
        " Earned {}% off, valid for {}",
        award.discount.discount_percent,
        countdown(award.discount.time_remaining(outcome.finished_at))
    )?;

    if award.score.can_retry {
        writeln!(out, " Play again to earn a discount.")?;
    }

    Ok(())
}

fn countdown(remaining: SignedDuration) -> String {
    let secs = remaining.as_secs().max(0);

    format!("{}m {:02}s", secs / 60, secs % 60)
}
