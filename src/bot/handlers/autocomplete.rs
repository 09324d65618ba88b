//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggestions are filtered case-insensitively and capped at Discord's limit
//! of 25 entries.

use crate::{bot::BotData, core::product, errors::Error};

const DISCORD_AUTOCOMPLETE_LIMIT: usize = 25;

fn matching(names: impl Iterator<Item = String>, partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    let mut matching: Vec<String> = names
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .take(DISCORD_AUTOCOMPLETE_LIMIT)
        .collect();
    matching.sort();
    matching
}

/// Suggests active product names.
pub async fn autocomplete_product_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(products) = product::get_active_products(&ctx.data().database).await else {
        return Vec::new();
    };
    matching(products.into_iter().map(|p| p.name), partial)
}

/// Suggests deactivated product names, for restoring them.
pub async fn autocomplete_inactive_product_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(products) = product::get_inactive_products(&ctx.data().database).await else {
        return Vec::new();
    };
    matching(products.into_iter().map(|p| p.name), partial)
}

/// Suggests names of products in the invoking user's cart.
pub async fn autocomplete_cart_item(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let visitor = ctx.author().id.to_string();
    let cart = ctx.data().sessions.cart(&visitor).await;
    matching(cart.iter().map(|(name, _)| name.to_string()), partial)
}

/// Suggests usernames from the directory.
pub async fn autocomplete_username(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(users) = ctx.data().directory.list_users().await else {
        return Vec::new();
    };
    matching(
        users.into_iter().filter(|u| u.is_active).map(|u| u.username),
        partial,
    )
}
