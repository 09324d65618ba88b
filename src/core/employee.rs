//! Employee accounts - the per-user balance and notification preferences.
//!
//! An employee row is created on first use; the directory remains the source
//! of truth for names, email addresses and group membership.

use crate::{
    core::money::Money,
    entities::{Employee, employee},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, Set, prelude::*, sea_query::Expr};
use tracing::{debug, info, instrument};

/// Which notification emails an employee receives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NotificationPreferences {
    /// Email on every deposit
    pub deposits: bool,
    /// Email on every purchase
    pub purchases: bool,
}

impl From<&employee::Model> for NotificationPreferences {
    fn from(employee: &employee::Model) -> Self {
        Self {
            deposits: employee.receive_deposit_emails,
            purchases: employee.receive_purchase_emails,
        }
    }
}

/// Finds the employee row for `username`, if one was created.
pub async fn get_employee<C>(db: &C, username: &str) -> Result<Option<employee::Model>>
where
    C: ConnectionTrait,
{
    Employee::find()
        .filter(employee::Column::Username.eq(username))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns the employee row for `username`, creating it with a zero balance
/// and all notifications enabled if it does not exist yet.
#[instrument(skip(db))]
pub async fn get_or_create_employee<C>(db: &C, username: &str) -> Result<employee::Model>
where
    C: ConnectionTrait,
{
    if let Some(existing) = get_employee(db, username).await? {
        return Ok(existing);
    }

    let employee = employee::ActiveModel {
        username: Set(username.to_string()),
        balance_cents: Set(0),
        receive_deposit_emails: Set(true),
        receive_purchase_emails: Set(true),
        picture: Set(None),
        ..Default::default()
    };
    let employee = employee.insert(db).await?;
    debug!("Created employee account for {username}");
    Ok(employee)
}

/// Current balance of `username`; users without an account have zero.
pub async fn balance<C>(db: &C, username: &str) -> Result<Money>
where
    C: ConnectionTrait,
{
    Ok(get_employee(db, username)
        .await?
        .map_or(Money::ZERO, |e| Money::from_cents(e.balance_cents)))
}

/// Adds `delta` to the balance with a single `UPDATE ... SET balance = balance + ?`,
/// so concurrent checkouts and deposits never lose an update.
///
/// # Errors
/// Returns `UserNotFound` if no account exists for `username`.
pub async fn adjust_balance<C>(db: &C, username: &str, delta: Money) -> Result<employee::Model>
where
    C: ConnectionTrait,
{
    let result = Employee::update_many()
        .col_expr(
            employee::Column::BalanceCents,
            Expr::col(employee::Column::BalanceCents).add(delta.cents()),
        )
        .filter(employee::Column::Username.eq(username))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::UserNotFound {
            username: username.to_string(),
        });
    }

    get_employee(db, username)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            username: username.to_string(),
        })
}

/// Stores new notification preferences, creating the account if needed.
#[instrument(skip(db))]
pub async fn set_notification_preferences<C>(
    db: &C,
    username: &str,
    preferences: NotificationPreferences,
) -> Result<employee::Model>
where
    C: ConnectionTrait,
{
    let mut employee: employee::ActiveModel = get_or_create_employee(db, username).await?.into();
    employee.receive_deposit_emails = Set(preferences.deposits);
    employee.receive_purchase_emails = Set(preferences.purchases);
    let employee = employee.update(db).await?;
    info!("Updated notification preferences for {username}: {preferences:?}");
    Ok(employee)
}

/// Points the profile picture at `reference` in the image store.
pub async fn set_picture<C>(db: &C, username: &str, reference: &str) -> Result<employee::Model>
where
    C: ConnectionTrait,
{
    let mut employee: employee::ActiveModel = get_or_create_employee(db, username).await?.into();
    employee.picture = Set(Some(reference.to_string()));
    employee.update(db).await.map_err(Into::into)
}

/// Removes the profile picture reference.
pub async fn clear_picture<C>(db: &C, username: &str) -> Result<employee::Model>
where
    C: ConnectionTrait,
{
    let mut employee: employee::ActiveModel = get_or_create_employee(db, username).await?.into();
    employee.picture = Set(None);
    employee.update(db).await.map_err(Into::into)
}
