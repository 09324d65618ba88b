//! Cancellation - reverses a purchase group identified by its key.

use crate::{
    core::{employee, keys, money::Money, notification::{MailLine, Notifier}},
    entities::{Product, Purchase, purchase},
    errors::{Error, Result},
    services::Directory,
};
use sea_orm::{DatabaseConnection, ModelTrait, QueryOrder, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Outcome of a successful cancellation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cancellation {
    /// Buyer whose balance was credited
    pub username: String,
    /// Amount credited back
    pub refunded: Money,
    /// Balance after the refund
    pub new_balance: Money,
    /// Number of purchase rows removed
    pub rows: usize,
}

/// Cancels every purchase row sharing `key`.
///
/// Each row's frozen total is credited back, the rows are deleted and a
/// cancellation email is sent regardless of notification preferences, all in
/// one transaction.
///
/// # Errors
/// Returns `PurchaseGroupNotFound` when `key` is malformed or no row carries
/// it (nothing is changed), `UserNotFound` when the buyer is no longer in the directory and
/// `MailDelivery` when the email cannot be sent.
#[instrument(skip(db, notifier, directory))]
pub async fn cancel_purchase(
    db: &DatabaseConnection,
    notifier: &Notifier,
    directory: &dyn Directory,
    key: &str,
) -> Result<Cancellation> {
    if !keys::is_well_formed(key) {
        return Err(Error::PurchaseGroupNotFound {
            key: key.to_string(),
        });
    }

    let txn = db.begin().await?;

    let rows = Purchase::find()
        .filter(purchase::Column::Key.eq(key))
        .order_by_asc(purchase::Column::Id)
        .find_also_related(Product)
        .all(&txn)
        .await?;

    let Some((first, _)) = rows.first() else {
        return Err(Error::PurchaseGroupNotFound {
            key: key.to_string(),
        });
    };
    let username = first.username.clone();
    let user = directory
        .find_user(&username)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            username: username.clone(),
        })?;

    let mut refunded = Money::ZERO;
    let mut lines = Vec::with_capacity(rows.len());
    let count = rows.len();
    for (row, product) in rows {
        let total = Money::from_cents(row.total_price_cents);
        refunded += total;
        lines.push(MailLine {
            quantity: u32::try_from(row.quantity)?,
            product: product.map_or_else(|| format!("product #{}", row.product_id), |p| p.name),
            total,
        });
        row.delete(&txn).await?;
    }

    let account = employee::adjust_balance(&txn, &username, refunded).await?;
    let new_balance = Money::from_cents(account.balance_cents);

    notifier.cancellation(&user, &lines, new_balance).await?;
    txn.commit().await?;

    info!("Cancelled purchase of {username}: refunded {refunded}, balance now {new_balance}");
    Ok(Cancellation {
        username,
        refunded,
        new_balance,
        rows: count,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::{cart::ShoppingCart, purchase::purchase_cart},
        test_utils::*,
    };
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_cancel_refunds_and_deletes() -> Result<()> {
        let db = setup_test_db().await?;
        let (notifier, mailer) = test_notifier();
        let directory = test_directory();
        let user = test_user("jdoe");
        create_test_product(&db, "Espresso", "1.50").await?;

        let cart = ShoppingCart::default().with_quantity("Espresso", 2);
        let receipt = purchase_cart(&db, &notifier, &cart, &user, TEST_BASE_URL).await?;

        let cancellation = cancel_purchase(&db, &notifier, &directory, &receipt.key).await?;
        assert_eq!(cancellation.refunded, Money::from_cents(300));
        assert_eq!(cancellation.new_balance, Money::ZERO);
        assert_eq!(cancellation.rows, 1);

        assert!(Purchase::find().all(&db).await?.is_empty());
        assert_eq!(employee::balance(&db, "jdoe").await?, Money::ZERO);

        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 2);
        assert!(sent[1].body.contains("2 Espresso for €3.00"));
        Ok(())
    }

    #[tokio::test]
    async fn test_cancel_whole_group() -> Result<()> {
        let db = setup_test_db().await?;
        let (notifier, mailer) = test_notifier();
        create_test_product(&db, "Espresso", "1.50").await?;
        create_test_product(&db, "Mate", "1.20").await?;

        let cart = ShoppingCart::default()
            .with_quantity("Espresso", 2)
            .with_quantity("Mate", 1);
        let receipt = purchase_cart(&db, &notifier, &cart, &test_user("jdoe"), TEST_BASE_URL).await?;
        assert_eq!(Purchase::find().all(&db).await?.len(), 2);

        let cancellation = cancel_purchase(&db, &notifier, &test_directory(), &receipt.key).await?;
        assert_eq!(cancellation.rows, 2);
        assert_eq!(cancellation.refunded, Money::from_cents(420));
        assert_eq!(cancellation.new_balance, Money::ZERO);
        assert!(Purchase::find().all(&db).await?.is_empty());

        // One confirmation for the checkout, one for the cancellation
        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 2);
        assert!(sent[1].body.contains("cancelled"));
        assert!(sent[1].body.contains("2 Espresso for €3.00"));
        assert!(sent[1].body.contains("1 Mate for €1.20"));
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_key_has_no_side_effects() -> Result<()> {
        let db = setup_test_db().await?;
        let (notifier, mailer) = test_notifier();
        create_test_product(&db, "Espresso", "1.50").await?;
        buy(&db, &test_user("jdoe"), &[("Espresso", 1)]).await?;

        let result = cancel_purchase(&db, &notifier, &test_directory(), &"0".repeat(64)).await;
        assert!(matches!(result, Err(Error::PurchaseGroupNotFound { .. })));
        assert_eq!(Purchase::find().all(&db).await?.len(), 1);
        assert_eq!(employee::balance(&db, "jdoe").await?, Money::from_cents(-150));
        assert!(mailer.sent().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_key_never_reaches_database() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let (notifier, _) = test_notifier();

        let upper = "A".repeat(64);
        let long = "a".repeat(65);
        for key in ["nope", "", upper.as_str(), long.as_str()] {
            let result = cancel_purchase(&db, &notifier, &test_directory(), key).await;
            assert!(matches!(result, Err(Error::PurchaseGroupNotFound { .. })));
        }
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_mail_is_unconditional_and_failure_rolls_back() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_product(&db, "Espresso", "1.50").await?;
        employee::set_notification_preferences(
            &db,
            "jdoe",
            employee::NotificationPreferences {
                deposits: false,
                purchases: false,
            },
        )
        .await?;
        let receipt = buy(&db, &test_user("jdoe"), &[("Espresso", 1)]).await?;

        let result =
            cancel_purchase(&db, &failing_notifier(), &test_directory(), &receipt.key).await;
        assert!(matches!(result, Err(Error::MailDelivery { .. })));
        assert_eq!(Purchase::find().all(&db).await?.len(), 1);
        assert_eq!(employee::balance(&db, "jdoe").await?, Money::from_cents(-150));
        Ok(())
    }
}
