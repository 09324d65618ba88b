//! Product business logic - catalog queries and product administration.
//!
//! Products are addressed by name everywhere a person types one. Prices are
//! validated as [`Money`] before they reach the database. Products that were
//! ever purchased can only be deactivated, never deleted.

use crate::{
    core::money::Money,
    entities::{Category, Product, Purchase, product, purchase},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, PaginatorTrait, QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

/// An administrative change to one product, decoded once from user input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProductAction {
    /// Hide the product from the catalog
    Deactivate,
    /// Show a hidden product again
    Restore,
    /// Change the unit price
    SetPrice {
        /// The new price
        value: Money,
    },
}

impl ProductAction {
    /// Decodes a typed price (e.g. `"€1,50"`) into a `SetPrice` action.
    ///
    /// # Errors
    /// Returns `InvalidAmount` for malformed input.
    pub fn set_price(input: &str) -> Result<Self> {
        Ok(Self::SetPrice {
            value: Money::parse(input)?,
        })
    }
}

/// Active products ordered by category, then name, as shown in the catalog.
pub async fn get_active_products<C>(db: &C) -> Result<Vec<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find()
        .filter(product::Column::Active.eq(true))
        .order_by_asc(product::Column::Category)
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deactivated products, ordered by name.
pub async fn get_inactive_products<C>(db: &C) -> Result<Vec<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find()
        .filter(product::Column::Active.eq(false))
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a product by its exact name, active or not.
pub async fn get_product_by_name<C>(db: &C, name: &str) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find()
        .filter(product::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

async fn require_product<C>(db: &C, name: &str) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    get_product_by_name(db, name)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            name: name.to_string(),
        })
}

/// Creates a new active product.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only (`InvalidName`)
/// - The price is negative (`InvalidAmount`)
/// - A product with the same name exists (`DuplicateProduct`)
#[instrument(skip(db))]
pub async fn create_product<C>(
    db: &C,
    name: &str,
    price: Money,
    category: Category,
) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidName {
            name: name.to_string(),
        });
    }
    if price.is_negative() {
        return Err(Error::InvalidAmount {
            input: price.to_string(),
        });
    }
    if get_product_by_name(db, name).await?.is_some() {
        return Err(Error::DuplicateProduct {
            name: name.to_string(),
        });
    }

    let now = chrono::Utc::now().naive_utc();
    let product = product::ActiveModel {
        name: Set(name.to_string()),
        price_cents: Set(price.cents()),
        category: Set(category),
        active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let product = product.insert(db).await?;
    info!("Created product '{}' at {}", product.name, price);
    Ok(product)
}

/// Changes the unit price. Existing purchases keep the price they were made at.
///
/// # Errors
/// Returns `ProductNotFound` or `InvalidAmount` for a negative price.
pub async fn set_price<C>(db: &C, name: &str, price: Money) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    apply_action(db, name, &ProductAction::SetPrice { value: price }).await
}

/// Applies an administrative action to the named product.
///
/// # Errors
/// Returns `ProductNotFound` if the name is unknown and `InvalidAmount` for a
/// negative price.
#[instrument(skip(db))]
pub async fn apply_action<C>(db: &C, name: &str, action: &ProductAction) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    let mut product: product::ActiveModel = require_product(db, name).await?.into();

    match action {
        ProductAction::Deactivate => product.active = Set(false),
        ProductAction::Restore => product.active = Set(true),
        ProductAction::SetPrice { value } => {
            if value.is_negative() {
                return Err(Error::InvalidAmount {
                    input: value.to_string(),
                });
            }
            product.price_cents = Set(value.cents());
        }
    }
    product.updated_at = Set(chrono::Utc::now().naive_utc());

    let product = product.update(db).await?;
    info!("Applied {:?} to product '{}'", action, product.name);
    Ok(product)
}

/// Deletes a product that was never purchased.
///
/// # Errors
/// Returns `ProductNotFound` if the name is unknown and `ProductInUse` when
/// purchases reference the product; deactivate it instead.
#[instrument(skip(db))]
pub async fn delete_product<C>(db: &C, name: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    let product = require_product(db, name).await?;

    let references = Purchase::find()
        .filter(purchase::Column::ProductId.eq(product.id))
        .count(db)
        .await?;
    if references > 0 {
        return Err(Error::ProductInUse {
            name: product.name,
            count: references,
        });
    }

    product.delete(db).await?;
    info!("Deleted product '{name}'");
    Ok(())
}
