//! Arcade
//!
//! Arcade turns short mini-game sessions into cart discounts. A timed [`session`] produces a
//! score, a [`scoring::TierTable`] converts the score into a percentage, the earned
//! [`discounts::Discount`] lands in the cart's [`ledger`], and [`totals`] keeps the combined
//! discount on any cart within a fixed share of its subtotal.
//!
//! ```no_run
//! use arcade::prelude::*;
//! use jiff::Timestamp;
//! use rusty_money::iso::USD;
//!
//! let store = CartStore::open(MemoryStore::default(), USD, Timestamp::now());
//!
//! println!("{}", render_cart(store.cart(), &store.totals(), Timestamp::now()));
//! ```

pub mod cart;
pub mod catalog;
pub mod discounts;
pub mod games;
mod ids;
pub mod ledger;
pub mod money;
pub mod persistence;
pub mod prelude;
pub mod products;
pub mod scoring;
pub mod session;
pub mod store;
pub mod summary;
pub mod totals;
