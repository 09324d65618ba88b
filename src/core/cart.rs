//! Shopping cart.
//!
//! A cart is a plain value mapping product names to positive quantities. It
//! is passed into every operation and the updated cart is handed back; where
//! it lives between requests is the session store's business. Invalid input
//! (a product that is not in the cart) leaves the cart unchanged.

use crate::{
    core::{money::Money, product},
    entities::product as product_entity,
    errors::{Error, Result},
};
use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Product name → quantity. A product that is absent has quantity zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingCart {
    items: BTreeMap<String, u32>,
}

/// A change requested by the visitor, decoded once at the boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CartAction {
    /// Put one more unit into the cart; the product must exist
    Add(String),
    /// One more unit of a product already in the cart
    Increase(String),
    /// One unit less; the entry disappears at zero
    Decrease(String),
    /// Drop the entry entirely
    Remove(String),
}

/// One cart entry priced at the current catalog price.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CartLine {
    /// The product as it is stored right now
    pub product: product_entity::Model,
    /// Units in the cart
    pub quantity: u32,
    /// Live price times quantity
    pub line_total: Money,
}

impl ShoppingCart {
    /// A cart holding `quantity` units of a single product.
    #[must_use]
    pub fn with_quantity(mut self, product_name: &str, quantity: u32) -> Self {
        if quantity == 0 {
            self.items.remove(product_name);
        } else {
            self.items.insert(product_name.to_string(), quantity);
        }
        self
    }

    /// Units of `product_name` in the cart.
    #[must_use]
    pub fn quantity(&self, product_name: &str) -> u32 {
        self.items.get(product_name).copied().unwrap_or(0)
    }

    /// Total number of units, shown as the cart badge.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.items.values().map(|q| u64::from(*q)).sum()
    }

    /// Whether the cart holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Entries ordered by product name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.items.iter().map(|(name, q)| (name.as_str(), *q))
    }

    /// One more unit of a product that is already in the cart.
    #[must_use]
    pub fn increase(mut self, product_name: &str) -> Self {
        if let Some(quantity) = self.items.get_mut(product_name) {
            *quantity = quantity.saturating_add(1);
        }
        self
    }

    /// One unit less of a product; removes the entry when it reaches zero.
    #[must_use]
    pub fn decrease(mut self, product_name: &str) -> Self {
        if let Some(quantity) = self.items.get_mut(product_name) {
            *quantity -= 1;
            if *quantity == 0 {
                self.items.remove(product_name);
            }
        }
        self
    }

    /// Drops a product from the cart.
    #[must_use]
    pub fn remove(mut self, product_name: &str) -> Self {
        self.items.remove(product_name);
        self
    }

    fn increment(mut self, product_name: &str) -> Self {
        let quantity = self.items.entry(product_name.to_string()).or_insert(0);
        *quantity = quantity.saturating_add(1);
        self
    }
}

/// Adds one unit of `product_name`, starting at 1 if it was absent.
///
/// # Errors
/// Returns `ProductNotFound` if no product has that name; the cart is
/// consumed either way, so callers keep their stored copy on error.
pub async fn add<C>(db: &C, cart: ShoppingCart, product_name: &str) -> Result<ShoppingCart>
where
    C: ConnectionTrait,
{
    let product = product::get_product_by_name(db, product_name)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            name: product_name.to_string(),
        })?;
    debug!("Adding '{}' to cart", product.name);
    Ok(cart.increment(&product.name))
}

/// Applies a decoded cart action.
///
/// # Errors
/// Only `Add` can fail, with `ProductNotFound`.
pub async fn apply<C>(db: &C, cart: ShoppingCart, action: &CartAction) -> Result<ShoppingCart>
where
    C: ConnectionTrait,
{
    match action {
        CartAction::Add(name) => add(db, cart, name).await,
        CartAction::Increase(name) => Ok(cart.increase(name)),
        CartAction::Decrease(name) => Ok(cart.decrease(name)),
        CartAction::Remove(name) => Ok(cart.remove(name)),
    }
}

/// Prices every entry at the current catalog price.
///
/// # Errors
/// Returns `ProductNotFound` if a product in the cart no longer exists.
pub async fn lines<C>(db: &C, cart: &ShoppingCart) -> Result<Vec<CartLine>>
where
    C: ConnectionTrait,
{
    let mut lines = Vec::with_capacity(cart.len());
    for (name, quantity) in cart.iter() {
        let product = product::get_product_by_name(db, name)
            .await?
            .ok_or_else(|| Error::ProductNotFound {
                name: name.to_string(),
            })?;
        let line_total = Money::from_cents(product.price_cents).times(quantity)?;
        lines.push(CartLine {
            product,
            quantity,
            line_total,
        });
    }
    Ok(lines)
}

/// Sum of live price times quantity over the cart.
///
/// Prices are read at call time, so the total follows price changes made
/// while items sit in the cart.
///
/// # Errors
/// Returns `ProductNotFound` if a product in the cart no longer exists.
pub async fn total_cost<C>(db: &C, cart: &ShoppingCart) -> Result<Money>
where
    C: ConnectionTrait,
{
    Ok(lines(db, cart).await?.iter().map(|l| l.line_total).sum())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_add_twice_then_decrease_to_zero() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_product(&db, "Espresso", "1.50").await?;

        let cart = add(&db, ShoppingCart::default(), "Espresso").await?;
        let cart = add(&db, cart, "Espresso").await?;
        assert_eq!(cart.quantity("Espresso"), 2);

        let cart = cart.decrease("Espresso");
        assert_eq!(cart.count(), 1);

        let cart = cart.decrease("Espresso");
        assert_eq!(cart.count(), 0);
        assert!(cart.is_empty());
        assert_eq!(cart.quantity("Espresso"), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_unknown_product_is_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let result = add(&db, ShoppingCart::default(), "Unicorn Latte").await;
        assert!(matches!(result, Err(Error::ProductNotFound { name }) if name == "Unicorn Latte"));
        Ok(())
    }

    #[test]
    fn test_increase_decrease_remove_ignore_absent_products() {
        let cart = ShoppingCart::default().with_quantity("Mate", 2);

        assert_eq!(cart.clone().increase("Tea"), cart);
        assert_eq!(cart.clone().decrease("Tea"), cart);
        assert_eq!(cart.clone().remove("Tea"), cart);

        let cart = cart.increase("Mate");
        assert_eq!(cart.quantity("Mate"), 3);
        let cart = cart.remove("Mate");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_count_sums_quantities() {
        let cart = ShoppingCart::default()
            .with_quantity("Espresso", 2)
            .with_quantity("Cookie", 3);
        assert_eq!(cart.count(), 5);
        assert_eq!(cart.len(), 2);
        let names: Vec<&str> = cart.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Cookie", "Espresso"]);
    }

    #[tokio::test]
    async fn test_apply_dispatches_actions() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_product(&db, "Cookie", "0.80").await?;

        let cart = apply(&db, ShoppingCart::default(), &CartAction::Add("Cookie".to_string())).await?;
        let cart = apply(&db, cart, &CartAction::Increase("Cookie".to_string())).await?;
        assert_eq!(cart.quantity("Cookie"), 2);
        let cart = apply(&db, cart, &CartAction::Decrease("Cookie".to_string())).await?;
        assert_eq!(cart.quantity("Cookie"), 1);
        let cart = apply(&db, cart, &CartAction::Remove("Cookie".to_string())).await?;
        assert!(cart.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_total_cost_follows_live_prices() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_product(&db, "Espresso", "1.50").await?;
        create_test_product(&db, "Cookie", "0.80").await?;
        let cart = ShoppingCart::default()
            .with_quantity("Espresso", 2)
            .with_quantity("Cookie", 1);

        assert_eq!(total_cost(&db, &cart).await?, Money::from_cents(380));

        product::set_price(&db, "Espresso", Money::from_cents(200)).await?;
        assert_eq!(total_cost(&db, &cart).await?, Money::from_cents(480));

        let lines = lines(&db, &cart).await?;
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].product.name, "Cookie");
        assert_eq!(lines[1].line_total, Money::from_cents(400));
        Ok(())
    }
}
