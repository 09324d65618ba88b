//! Database configuration module.
//!
//! This module handles `SQLite` database connection, table creation and product
//! seeding using `SeaORM`. Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs.

use crate::{
    config::settings::ProductConfig,
    core::product,
    entities::{Deposit, Employee, Product, Purchase},
    errors::Result,
};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::info;

/// Database used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/coffee_fund.sqlite?mode=rwc";

/// Gets the database URL from the environment or returns the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    info!("Connecting to {database_url}");
    Database::connect(&database_url).await.map_err(Into::into)
}

fn create_table<C, E>(db: &C, schema: &Schema, entity: E) -> sea_orm::Statement
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    db.get_database_backend().build(&table)
}

/// Creates all tables and the purchase indexes if they do not exist.
///
/// Products must be created before purchases for the foreign key.
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    db.execute(create_table(db, &schema, Product)).await?;
    db.execute(create_table(db, &schema, Employee)).await?;
    db.execute(create_table(db, &schema, Deposit)).await?;
    db.execute(create_table(db, &schema, Purchase)).await?;

    // Purchases are looked up by key and by buyer
    for mut index in schema.create_index_from_entity(Purchase) {
        index.if_not_exists();
        db.execute(builder.build(&index)).await?;
    }

    Ok(())
}

/// Creates every configured product that does not exist yet.
///
/// Existing products keep their current price and state. Returns the number
/// of products created.
pub async fn seed_products<C>(db: &C, products: &[ProductConfig]) -> Result<usize>
where
    C: ConnectionTrait,
{
    let mut created = 0;
    for config in products {
        if product::get_product_by_name(db, &config.name).await?.is_none() {
            product::create_product(db, &config.name, config.price, config.category).await?;
            created += 1;
        }
    }
    if created > 0 {
        info!("Seeded {created} product(s) from configuration");
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::money::Money, entities::Category};
    use sea_orm::QuerySelect;

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        let _ = Product::find().limit(1).all(&db).await?;
        let _ = Employee::find().limit(1).all(&db).await?;
        let _ = Deposit::find().limit(1).all(&db).await?;
        let _ = Purchase::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_repeatable() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_products_skips_existing() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        let products = vec![
            ProductConfig {
                name: "Espresso".to_string(),
                price: Money::from_cents(150),
                category: Category::Drink,
            },
            ProductConfig {
                name: "Twix".to_string(),
                price: Money::from_cents(90),
                category: Category::Snack,
            },
        ];
        assert_eq!(seed_products(&db, &products).await?, 2);

        product::set_price(&db, "Espresso", Money::from_cents(170)).await?;
        assert_eq!(seed_products(&db, &products).await?, 0);

        let espresso = product::get_product_by_name(&db, "Espresso").await?;
        assert_eq!(espresso.map(|p| p.price_cents), Some(170));
        Ok(())
    }
}
