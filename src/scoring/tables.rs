//! Built-in Tier Tables

use smallvec::smallvec;

use crate::{
    games::GameType,
    scoring::{Flavour, Tier, TierTable},
};

fn miss() -> Flavour {
    Flavour::message("So close!")
        .with_subtext("Play again to unlock a discount")
        .with_emoji("🎯")
}

/// Five tiers over scores 0-60+: 20/30/40/50/60 points unlock 3/6/9/12/15%.
pub fn five_tier() -> TierTable {
    TierTable {
        tiers: smallvec![
            Tier::new(20, 3, Flavour::message("Nice start!").with_emoji("👍")),
            Tier::new(30, 6, Flavour::message("Good job!").with_emoji("😎")),
            Tier::new(40, 9, Flavour::message("Great play!").with_emoji("🔥")),
            Tier::new(50, 12, Flavour::message("Amazing!").with_emoji("🚀")),
            Tier::new(
                60,
                15,
                Flavour::message("Legendary!")
                    .with_subtext("You unlocked the maximum discount")
                    .with_emoji("🏆"),
            ),
        ],
        miss: miss(),
    }
}

/// Four tiers over scores 0-45+: 15/25/35/45 points unlock 5/8/12/15%.
pub fn four_tier() -> TierTable {
    TierTable {
        tiers: smallvec![
            Tier::new(15, 5, Flavour::message("Not bad!").with_emoji("👍")),
            Tier::new(25, 8, Flavour::message("Sharp reflexes!").with_emoji("⚡")),
            Tier::new(35, 12, Flavour::message("Untouchable!").with_emoji("🛡️")),
            Tier::new(
                45,
                15,
                Flavour::message("Flawless!")
                    .with_subtext("You unlocked the maximum discount")
                    .with_emoji("🏆"),
            ),
        ],
        miss: miss(),
    }
}

impl TierTable {
    /// The tier table a game settles its scores against.
    ///
    /// Unknown games use the five-tier table.
    pub fn for_game(game: &GameType) -> Self {
        match game {
            GameType::DodgeTheFees => four_tier(),
            GameType::CatchTheDeal | GameType::TapRush | GameType::Other(_) => five_tier(),
        }
    }
}
