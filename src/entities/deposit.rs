//! Deposit entity - Append-only ledger of money paid into the fund.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Deposit database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "deposits")]
pub struct Model {
    /// Unique identifier for the deposit
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Directory username the money was credited to
    pub username: String,
    /// Amount in cents (negative for corrections)
    pub amount_cents: i64,
    /// When the deposit was recorded
    pub created_at: DateTimeUtc,
}

/// `Deposit` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
