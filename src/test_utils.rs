//! Shared test utilities for the coffee fund.
//!
//! This module provides helpers for setting up test databases, creating
//! products and users with sensible defaults, and mail doubles that record or
//! reject what they are asked to send.

use crate::{
    core::{
        cart::ShoppingCart,
        money::Money,
        notification::Notifier,
        product,
        purchase::{self, PurchaseReceipt},
    },
    entities::{self, Category},
    errors::{Error, Result},
    services::{DirectoryUser, Mailer, OutgoingMail, StaticDirectory},
};
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Base URL used for cancellation links in tests.
pub const TEST_BASE_URL: &str = "https://coffee.example.org";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates an active drink priced at `price` (e.g. `"1.50"`).
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    price: &str,
) -> Result<entities::product::Model> {
    product::create_product(db, name, Money::parse(price)?, Category::Drink).await
}

/// An active customer named "Test {username}" in the `stud` group, reachable
/// at `{username}@example.org`.
#[must_use]
pub fn test_user(username: &str) -> DirectoryUser {
    DirectoryUser {
        username: username.to_string(),
        first_name: "Test".to_string(),
        last_name: username.to_string(),
        email: format!("{username}@example.org"),
        is_active: true,
        is_superuser: false,
        groups: vec!["stud".to_string()],
        discord_id: Some(format!("discord-{username}")),
    }
}

/// Directory with the users `jdoe` and `asmith`.
#[must_use]
pub fn test_directory() -> StaticDirectory {
    StaticDirectory::new(vec![test_user("jdoe"), test_user("asmith")])
}

/// Mailer that keeps every message, or rejects all of them.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
    fail: bool,
}

impl RecordingMailer {
    /// A mailer whose every delivery fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            sent: Mutex::default(),
            fail: true,
        }
    }

    /// Messages delivered so far.
    pub async fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        if self.fail {
            return Err(Error::MailDelivery {
                message: "test relay refused the message".to_string(),
            });
        }
        mail.validate()?;
        self.sent.lock().await.push(mail.clone());
        Ok(())
    }
}

/// Notifier backed by a [`RecordingMailer`] the test can inspect.
#[must_use]
pub fn test_notifier() -> (Notifier, Arc<RecordingMailer>) {
    let mailer = Arc::new(RecordingMailer::default());
    let sink: Arc<dyn Mailer> = Arc::<RecordingMailer>::clone(&mailer);
    let notifier = Notifier::new(sink, "fund@example.org", "Coffee fund");
    (notifier, mailer)
}

/// Notifier whose deliveries always fail.
#[must_use]
pub fn failing_notifier() -> Notifier {
    Notifier::new(
        Arc::new(RecordingMailer::failing()),
        "fund@example.org",
        "Coffee fund",
    )
}

/// Checks out `items` for `user`, discarding the notification.
pub async fn buy(
    db: &DatabaseConnection,
    user: &DirectoryUser,
    items: &[(&str, u32)],
) -> Result<PurchaseReceipt> {
    let cart = items
        .iter()
        .fold(ShoppingCart::default(), |cart, (name, quantity)| {
            cart.with_quantity(name, *quantity)
        });
    let (notifier, _) = test_notifier();
    purchase::purchase_cart(db, &notifier, &cart, user, TEST_BASE_URL).await
}
