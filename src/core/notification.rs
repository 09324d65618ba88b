//! Notification emails sent to fund members.

use crate::{
    core::money::Money,
    errors::Result,
    services::{DirectoryUser, Mailer, OutgoingMail},
};
use std::{fmt::Write as _, sync::Arc};
use tracing::debug;

/// One "quantity × product for total" line of a notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MailLine {
    /// Number of units
    pub quantity: u32,
    /// Product name
    pub product: String,
    /// Frozen line total
    pub total: Money,
}

/// Composes notification messages and hands them to a [`Mailer`].
#[derive(Clone)]
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    from: String,
    subject: String,
}

impl Notifier {
    /// Creates a notifier sending from `from` with a fixed `subject`.
    pub fn new(mailer: Arc<dyn Mailer>, from: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            mailer,
            from: from.into(),
            subject: subject.into(),
        }
    }

    /// Confirms a checkout and offers the cancellation link.
    pub async fn purchase(
        &self,
        user: &DirectoryUser,
        lines: &[MailLine],
        balance: Money,
        cancel_url: &str,
    ) -> Result<()> {
        let body = format!(
            "{}You bought the following products:\n{}\nYour current balance is {balance}.\n\n\
             To cancel this purchase, follow this link: {cancel_url}",
            greeting(user),
            list(lines),
        );
        self.deliver(user, body).await
    }

    /// Confirms that a purchase group was cancelled and refunded.
    pub async fn cancellation(
        &self,
        user: &DirectoryUser,
        lines: &[MailLine],
        balance: Money,
    ) -> Result<()> {
        let body = format!(
            "{}You successfully cancelled the following purchase:\n{}\nYour current balance is {balance}.",
            greeting(user),
            list(lines),
        );
        self.deliver(user, body).await
    }

    /// Tells the user that money was paid into their account.
    pub async fn deposit(&self, user: &DirectoryUser, amount: Money, balance: Money) -> Result<()> {
        let body = format!(
            "{}Money was deposited into your account: {amount}\n\nYour current balance is {balance}.",
            greeting(user),
        );
        self.deliver(user, body).await
    }

    async fn deliver(&self, user: &DirectoryUser, body: String) -> Result<()> {
        let mail = OutgoingMail {
            subject: self.subject.clone(),
            body,
            from: self.from.clone(),
            to: vec![user.email.clone()],
        };
        debug!("Sending '{}' to {}", mail.subject, user.username);
        self.mailer.send(&mail).await
    }
}

fn greeting(user: &DirectoryUser) -> String {
    format!("Hello {}!\n\n", user.full_name())
}

fn list(lines: &[MailLine]) -> String {
    lines.iter().fold(String::new(), |mut out, line| {
        let _ = writeln!(out, "{} {} for {}", line.quantity, line.product, line.total);
        out
    })
}
