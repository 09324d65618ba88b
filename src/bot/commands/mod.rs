//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

use crate::{bot::BotData, errors::Error};

/// Account commands
pub mod account;

/// Administration commands
pub mod admin;

/// General utility commands
pub mod general;

/// Shopping commands
pub mod shop;

// Export commands
pub use account::*;
pub use admin::*;
pub use general::*;
pub use shop::*;

/// Every top-level command the bot registers.
#[must_use]
pub fn all() -> Vec<poise::Command<BotData, Error>> {
    vec![
        ping(),
        help(),
        menu(),
        cart(),
        checkout(),
        buy(),
        cancel(),
        profile(),
        notifications(),
        picture(),
        admin(),
    ]
}
