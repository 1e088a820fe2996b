//! Score Conversion
//!
//! Converts the final score of a game session into a discount. Every game shares the same
//! algorithm and differs only in its [`TierTable`]: an ascending list of score thresholds, each
//! unlocking a discount percentage. Scores below the lowest threshold earn nothing and may be
//! retried.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

pub mod tables;

/// Highest percentage a tier may grant.
pub const MAX_TIER_PERCENT: u8 = 100;

/// Errors raised when building a tier table.
#[derive(Debug, Error)]
pub enum TierTableError {
    /// A table needs at least one tier.
    #[error("tier table has no tiers")]
    Empty,

    /// Thresholds must be strictly ascending.
    #[error("tier threshold {current} does not exceed previous threshold {previous}")]
    ThresholdNotAscending {
        /// Threshold of the previous tier
        previous: i64,
        /// Offending threshold
        current: i64,
    },

    /// Percentages must never decrease as the score rises.
    #[error("tier at threshold {threshold} grants {percent}%, less than the tier below it")]
    PercentDecreasing {
        /// Threshold of the offending tier
        threshold: i64,
        /// Offending percentage
        percent: u8,
    },

    /// Percentage above [`MAX_TIER_PERCENT`].
    #[error("tier at threshold {threshold} grants {percent}%, above the maximum")]
    PercentOutOfRange {
        /// Threshold of the offending tier
        threshold: i64,
        /// Offending percentage
        percent: u8,
    },

    /// YAML parsing error
    #[error("failed to parse tier table: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// Presentation strings shown with a result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flavour {
    /// Headline message
    pub message: String,

    /// Secondary line under the headline
    #[serde(default)]
    pub subtext: String,

    /// Emoji decoration
    #[serde(default)]
    pub emoji: String,
}

impl Flavour {
    /// Create flavour text with only a headline.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Set the secondary line.
    #[must_use]
    pub fn with_subtext(mut self, subtext: impl Into<String>) -> Self {
        self.subtext = subtext.into();
        self
    }

    /// Set the emoji.
    #[must_use]
    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = emoji.into();
        self
    }
}

/// A single score threshold and the discount it unlocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tier {
    min_score: i64,
    discount_percent: u8,
    #[serde(flatten)]
    flavour: Flavour,
}

impl Tier {
    /// Create a new tier.
    pub fn new(min_score: i64, discount_percent: u8, flavour: Flavour) -> Self {
        Self {
            min_score,
            discount_percent,
            flavour,
        }
    }

    /// Lowest score that reaches this tier.
    pub fn min_score(&self) -> i64 {
        self.min_score
    }

    /// Discount percentage unlocked by this tier.
    pub fn discount_percent(&self) -> u8 {
        self.discount_percent
    }

    /// Presentation strings for this tier.
    pub fn flavour(&self) -> &Flavour {
        &self.flavour
    }
}

/// Result of converting a final score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreOutcome {
    /// Discount percentage earned (0 when no tier was reached)
    pub discount_percent: u8,

    /// Whether the shopper should be offered another attempt
    pub can_retry: bool,

    /// Presentation strings
    pub flavour: Flavour,
}

/// The next tier a score has not yet reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextTier {
    /// Score required to reach the tier
    pub threshold: i64,

    /// Points still needed from the current score
    pub points_needed: i64,

    /// Discount percentage the tier unlocks
    pub discount_percent: u8,
}

#[derive(Debug, Deserialize)]
struct RawTierTable {
    tiers: Vec<Tier>,
    miss: Flavour,
}

/// Ordered score thresholds for one game.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawTierTable")]
pub struct TierTable {
    tiers: SmallVec<[Tier; 5]>,
    miss: Flavour,
}

impl TryFrom<RawTierTable> for TierTable {
    type Error = TierTableError;

    fn try_from(raw: RawTierTable) -> Result<Self, Self::Error> {
        TierTable::new(raw.tiers, raw.miss)
    }
}

impl TierTable {
    /// Build a tier table, validating that thresholds ascend and percentages never decrease.
    ///
    /// `miss` is the flavour shown for scores below the lowest tier.
    ///
    /// # Errors
    ///
    /// Returns a [`TierTableError`] if the table is empty, thresholds are not strictly
    /// ascending, or percentages decrease or exceed [`MAX_TIER_PERCENT`].
    pub fn new(
        tiers: impl IntoIterator<Item = Tier>,
        miss: Flavour,
    ) -> Result<Self, TierTableError> {
        let tiers: SmallVec<[Tier; 5]> = tiers.into_iter().collect();

        if tiers.is_empty() {
            return Err(TierTableError::Empty);
        }

        let mut previous: Option<&Tier> = None;

        for tier in &tiers {
            if tier.discount_percent > MAX_TIER_PERCENT {
                return Err(TierTableError::PercentOutOfRange {
                    threshold: tier.min_score,
                    percent: tier.discount_percent,
                });
            }

            if let Some(previous) = previous {
                if tier.min_score <= previous.min_score {
                    return Err(TierTableError::ThresholdNotAscending {
                        previous: previous.min_score,
                        current: tier.min_score,
                    });
                }

                if tier.discount_percent < previous.discount_percent {
                    return Err(TierTableError::PercentDecreasing {
                        threshold: tier.min_score,
                        percent: tier.discount_percent,
                    });
                }
            }

            previous = Some(tier);
        }

        Ok(Self { tiers, miss })
    }

    /// Parse and validate a tier table from YAML.
    ///
    /// ```yaml
    /// miss:
    ///   message: Keep practising!
    /// tiers:
    ///   - minScore: 20
    ///     discountPercent: 3
    ///     message: Nice start
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`TierTableError::Yaml`] for malformed documents; validation failures are
    /// reported through the same variant because they surface during deserialization.
    pub fn from_yaml(yaml: &str) -> Result<Self, TierTableError> {
        serde_norway::from_str(yaml).map_err(TierTableError::from)
    }

    /// Tiers in ascending threshold order.
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// Highest discount percentage any score can earn.
    pub fn max_percent(&self) -> u8 {
        self.tiers.last().map_or(0, Tier::discount_percent)
    }

    /// The tier reached by `score`, if any.
    pub fn tier_for(&self, score: i64) -> Option<&Tier> {
        self.tiers.iter().rev().find(|tier| score >= tier.min_score)
    }

    /// Convert a final score into a discount.
    ///
    /// Tiers are checked from the highest threshold down and the first one reached wins.
    /// Any score below the lowest threshold, negative scores included, earns 0% and may be
    /// retried.
    pub fn convert(&self, score: i64) -> ScoreOutcome {
        match self.tier_for(score) {
            Some(tier) => ScoreOutcome {
                discount_percent: tier.discount_percent,
                can_retry: false,
                flavour: tier.flavour.clone(),
            },
            None => ScoreOutcome {
                discount_percent: 0,
                can_retry: true,
                flavour: self.miss.clone(),
            },
        }
    }

    /// The lowest tier `score` has not reached yet, or `None` at the top tier.
    pub fn next_threshold(&self, score: i64) -> Option<NextTier> {
        self.tiers
            .iter()
            .find(|tier| tier.min_score > score)
            .map(|tier| NextTier {
                threshold: tier.min_score,
                points_needed: tier.min_score.saturating_sub(score),
                discount_percent: tier.discount_percent,
            })
    }
}
