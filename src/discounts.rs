//! Discounts
//!
//! A discount is earned by finishing a game session for a particular product and stays
//! usable for [`DISCOUNT_LIFETIME`] after it was earned.

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

use crate::{
    games::GameType,
    ids::typed_id,
    products::ProductId,
    scoring::{MAX_TIER_PERCENT, ScoreOutcome, TierTable},
    session::SessionOutcome,
};

typed_id! {
    /// Discount identifier
    DiscountId
}

/// How long an earned discount can be applied for.
pub const DISCOUNT_LIFETIME: SignedDuration = SignedDuration::from_mins(30);

/// Highest discount a single cart line may carry.
pub const MAX_LINE_DISCOUNT_PERCENT: u8 = 15;

/// A discount earned by playing a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    /// Discount identifier
    pub id: DiscountId,

    /// The only product this discount applies to
    pub product_id: ProductId,

    /// Game the discount was earned in
    pub game_type: GameType,

    /// Percentage off
    pub discount_percent: u8,

    /// When the discount was earned
    pub earned_at: Timestamp,

    /// After this instant the discount can no longer be applied
    pub expires_at: Timestamp,

    /// Whether the discount is currently reflected in a cart line
    pub applied: bool,
}

impl Discount {
    /// A fresh, unapplied discount earned at `now`.
    pub fn earned(product_id: ProductId, game_type: GameType, percent: u8, now: Timestamp) -> Self {
        Self {
            id: DiscountId::new(),
            product_id,
            game_type,
            discount_percent: percent.min(MAX_TIER_PERCENT),
            earned_at: now,
            expires_at: now.checked_add(DISCOUNT_LIFETIME).unwrap_or(now),
            applied: false,
        }
    }

    /// Whether the discount can still be applied at `now`.
    pub fn is_live(&self, now: Timestamp) -> bool {
        now <= self.expires_at
    }

    /// Time left before expiry, zero once expired.
    pub fn time_remaining(&self, now: Timestamp) -> SignedDuration {
        self.expires_at
            .duration_since(now)
            .max(SignedDuration::ZERO)
    }

    /// Percentage to record on a cart line, limited to [`MAX_LINE_DISCOUNT_PERCENT`].
    pub fn line_percent(&self) -> u8 {
        self.discount_percent.min(MAX_LINE_DISCOUNT_PERCENT)
    }
}

/// The result of settling a finished session for a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Award {
    /// Score conversion shown to the shopper
    pub score: ScoreOutcome,

    /// Discount to hand to the ledger
    pub discount: Discount,
}

/// Convert a finished session into a discount for `product_id`.
///
/// A losing score still produces a 0% discount: the most recent play for a product always
/// replaces the previous one once it reaches the ledger.
pub fn award_discount(outcome: &SessionOutcome, product_id: ProductId, table: &TierTable) -> Award {
    let score = table.convert(outcome.score);

    let discount = Discount::earned(
        product_id,
        outcome.game.clone(),
        score.discount_percent,
        outcome.finished_at,
    );

    tracing::info!(
        game = %outcome.game,
        score = outcome.score,
        percent = discount.discount_percent,
        product = %product_id,
        "discount earned"
    );

    Award { score, discount }
}
