//! Deposits - money paid into an employee's account by an administrator.

use crate::{
    core::{employee, money::Money, notification::Notifier},
    entities::{Deposit, deposit},
    errors::Result,
    services::DirectoryUser,
};
use sea_orm::{ConnectionTrait, DatabaseConnection, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Outcome of a recorded deposit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepositReceipt {
    /// The stored ledger row
    pub deposit: deposit::Model,
    /// Balance after the credit
    pub new_balance: Money,
    /// Whether the user was emailed
    pub notified: bool,
}

/// Credits `amount` to `user`, appends a ledger row and emails the user if
/// they receive deposit emails, all in one transaction.
///
/// A zero amount changes nothing and returns `Ok(None)`. Negative amounts
/// are allowed as corrections.
///
/// # Errors
/// Returns `MailDelivery` if the notification cannot be sent; the deposit is
/// rolled back in that case.
#[instrument(skip(db, notifier, user), fields(username = %user.username))]
pub async fn record_deposit(
    db: &DatabaseConnection,
    notifier: &Notifier,
    user: &DirectoryUser,
    amount: Money,
) -> Result<Option<DepositReceipt>> {
    if amount.is_zero() {
        return Ok(None);
    }

    let txn = db.begin().await?;

    employee::get_or_create_employee(&txn, &user.username).await?;
    let account = employee::adjust_balance(&txn, &user.username, amount).await?;
    let new_balance = Money::from_cents(account.balance_cents);

    let deposit = deposit::ActiveModel {
        username: Set(user.username.clone()),
        amount_cents: Set(amount.cents()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let notified = account.receive_deposit_emails;
    if notified {
        notifier.deposit(user, amount, new_balance).await?;
    }

    txn.commit().await?;
    info!("Deposited {amount} for {}, balance now {new_balance}", user.username);

    Ok(Some(DepositReceipt {
        deposit,
        new_balance,
        notified,
    }))
}

/// Deposits of `username`, newest first.
pub async fn list_deposits<C>(db: &C, username: &str) -> Result<Vec<deposit::Model>>
where
    C: ConnectionTrait,
{
    Deposit::find()
        .filter(deposit::Column::Username.eq(username))
        .order_by_desc(deposit::Column::CreatedAt)
        .order_by_desc(deposit::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{errors::Error, test_utils::*};

    #[tokio::test]
    async fn test_deposit_credits_and_notifies() -> Result<()> {
        let db = setup_test_db().await?;
        let (notifier, mailer) = test_notifier();
        let user = test_user("jdoe");

        let receipt = record_deposit(&db, &notifier, &user, Money::from_cents(1000))
            .await?
            .unwrap();
        assert_eq!(receipt.new_balance, Money::from_cents(1000));
        assert!(receipt.notified);

        record_deposit(&db, &notifier, &user, Money::from_cents(-250)).await?;
        assert_eq!(employee::balance(&db, "jdoe").await?, Money::from_cents(750));

        let deposits = list_deposits(&db, "jdoe").await?;
        assert_eq!(deposits.len(), 2);
        assert_eq!(deposits[0].amount_cents, -250);

        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 2);
        assert!(sent[0].body.contains("€10.00"));
        Ok(())
    }

    #[tokio::test]
    async fn test_zero_deposit_is_noop() -> Result<()> {
        let db = setup_test_db().await?;
        let (notifier, mailer) = test_notifier();

        let receipt = record_deposit(&db, &notifier, &test_user("jdoe"), Money::ZERO).await?;
        assert!(receipt.is_none());
        assert!(employee::get_employee(&db, "jdoe").await?.is_none());
        assert!(mailer.sent().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_mail_failure_rolls_back_deposit() -> Result<()> {
        let db = setup_test_db().await?;
        let result = record_deposit(
            &db,
            &failing_notifier(),
            &test_user("jdoe"),
            Money::from_cents(500),
        )
        .await;
        assert!(matches!(result, Err(Error::MailDelivery { .. })));
        assert!(list_deposits(&db, "jdoe").await?.is_empty());
        assert_eq!(employee::balance(&db, "jdoe").await?, Money::ZERO);
        Ok(())
    }
}
