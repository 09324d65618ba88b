//! Purchase entity - One line of a checkout.
//!
//! All rows written by a single checkout share `date` and `key`; together they
//! form a purchase group, which is the unit of display and cancellation.
//! `total_price_cents` is frozen at purchase time.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    /// Unique identifier for the purchase row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Directory username of the buyer
    #[sea_orm(indexed)]
    pub username: String,
    /// Purchased product; deletion of the product is restricted
    pub product_id: i64,
    /// Number of units bought
    pub quantity: i32,
    /// Unit price times quantity at the moment of purchase, in cents
    pub total_price_cents: i64,
    /// Checkout timestamp shared by the whole group
    pub date: DateTimeUtc,
    /// 64-character cancellation key shared by the whole group
    #[sea_orm(indexed)]
    pub key: String,
}

/// Defines relationships between Purchase and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each purchase references one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "Restrict"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
