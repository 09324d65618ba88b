//! Product entity - Items offered by the coffee fund.
//!
//! Products are looked up by their unique name. Deactivated products vanish
//! from the catalog but stay in the table so purchase history keeps pointing
//! at them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog section a product is listed under.
///
/// Stored as an integer so that ordering by category follows declaration order.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, DeriveActiveEnum,
    Serialize, Deserialize,
)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Coffee, tea, soft drinks
    #[sea_orm(num_value = 1)]
    Drink,
    /// Chocolate bars, biscuits
    #[sea_orm(num_value = 2)]
    Snack,
    /// Frozen treats
    #[sea_orm(num_value = 3)]
    IceCream,
}

impl Category {
    /// Heading used when listing the catalog.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Drink => "Drinks",
            Self::Snack => "Snacks",
            Self::IceCream => "Ice cream",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Product database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display and lookup name (e.g., "Espresso")
    #[sea_orm(unique)]
    pub name: String,
    /// Current unit price in cents
    pub price_cents: i64,
    /// Catalog section
    pub category: Category,
    /// Inactive products are hidden from the catalog
    pub active: bool,
    /// When the product was created
    pub created_at: DateTime,
    /// When the product was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One product appears in many purchases
    #[sea_orm(has_many = "super::purchase::Entity")]
    Purchases,
}

impl Related<super::purchase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchases.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
