//! Checkout - turns a shopping cart into a purchase group.
//!
//! A purchase group is every row written by one checkout: same buyer, same
//! `date`, same 64-character key. Rows store the price at purchase time, so
//! later catalog changes never alter history.

use crate::{
    core::{
        cart::{self, CartLine, ShoppingCart},
        employee, keys,
        money::Money,
        notification::{MailLine, Notifier},
    },
    entities::purchase,
    errors::{Error, Result},
    services::DirectoryUser,
};
use chrono::{DateTime, SubsecRound, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, TransactionTrait};
use tracing::{info, instrument};

/// Outcome of a successful checkout.
#[derive(Clone, Debug)]
pub struct PurchaseReceipt {
    /// Cancellation key shared by all rows
    pub key: String,
    /// Timestamp shared by all rows
    pub date: DateTime<Utc>,
    /// Lines as charged
    pub lines: Vec<CartLine>,
    /// Amount debited
    pub total: Money,
    /// Balance after the debit
    pub new_balance: Money,
    /// Link that cancels this purchase
    pub cancel_url: String,
    /// Whether a confirmation email was sent
    pub notified: bool,
}

/// Builds `<base_url>/cancel-purchase/<key>/`.
#[must_use]
pub fn cancel_url(base_url: &str, key: &str) -> String {
    format!("{}/cancel-purchase/{key}/", base_url.trim_end_matches('/'))
}

/// Buys everything in `cart` for `user` in a single database transaction.
///
/// The balance is debited by the sum of the line totals. If the employee
/// receives purchase emails the confirmation is sent before commit, so a
/// delivery failure leaves no trace.
///
/// # Errors
/// Returns `EmptyCart` for an empty cart, `ProductNotFound` if any entry no
/// longer resolves, and `MailDelivery` if the confirmation cannot be sent.
/// Nothing is written in any of these cases.
#[instrument(skip(db, notifier, cart, user), fields(username = %user.username))]
pub async fn purchase_cart(
    db: &DatabaseConnection,
    notifier: &Notifier,
    cart: &ShoppingCart,
    user: &DirectoryUser,
    base_url: &str,
) -> Result<PurchaseReceipt> {
    if cart.is_empty() {
        return Err(Error::EmptyCart);
    }

    let txn = db.begin().await?;

    employee::get_or_create_employee(&txn, &user.username).await?;
    let key = keys::generate_key(&txn).await?;
    let date = Utc::now().trunc_subsecs(6);

    let lines = cart::lines(&txn, cart).await?;
    let mut total = Money::ZERO;
    for line in &lines {
        purchase::ActiveModel {
            username: Set(user.username.clone()),
            product_id: Set(line.product.id),
            quantity: Set(i32::try_from(line.quantity)?),
            total_price_cents: Set(line.line_total.cents()),
            date: Set(date),
            key: Set(key.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        total += line.line_total;
    }

    let account = employee::adjust_balance(&txn, &user.username, -total).await?;
    let new_balance = Money::from_cents(account.balance_cents);
    let cancel_url = cancel_url(base_url, &key);

    let notified = account.receive_purchase_emails;
    if notified {
        let mail_lines: Vec<MailLine> = lines
            .iter()
            .map(|line| MailLine {
                quantity: line.quantity,
                product: line.product.name.clone(),
                total: line.line_total,
            })
            .collect();
        notifier
            .purchase(user, &mail_lines, new_balance, &cancel_url)
            .await?;
    }

    txn.commit().await?;

    info!(
        "{} bought {} item(s) for {total}, balance now {new_balance}",
        user.username,
        cart.count()
    );

    Ok(PurchaseReceipt {
        key,
        date,
        lines,
        total,
        new_balance,
        cancel_url,
        notified,
    })
}

/// Buys a single unit of `product_name` without touching the session cart.
///
/// # Errors
/// Same as [`purchase_cart`].
pub async fn buy_now(
    db: &DatabaseConnection,
    notifier: &Notifier,
    user: &DirectoryUser,
    product_name: &str,
    base_url: &str,
) -> Result<PurchaseReceipt> {
    let cart = ShoppingCart::default().with_quantity(product_name, 1);
    purchase_cart(db, notifier, &cart, user, base_url).await
}
