//! Employee entity - A directory user extended with a prepaid balance.
//!
//! Rows are created lazily through `core::employee::get_or_create_employee`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Employee database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    /// Unique identifier for the employee
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Directory username this account belongs to
    #[sea_orm(unique)]
    pub username: String,
    /// Current balance in cents, negative when the employee owes the fund
    pub balance_cents: i64,
    /// Whether deposits trigger a notification email
    pub receive_deposit_emails: bool,
    /// Whether purchases trigger a confirmation email
    pub receive_purchase_emails: bool,
    /// Reference into the image store, if a picture was uploaded
    pub picture: Option<String>,
}

/// `Employee` rows are joined to other tables through the username only
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
