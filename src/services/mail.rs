//! Mail delivery seam.
//!
//! The core only knows the [`Mailer`] trait. Delivery failures must be
//! reported as `Error::MailDelivery`, never swallowed, so that the enclosing
//! purchase or cancellation can roll back.

use crate::errors::{Error, Result};
use async_trait::async_trait;
use tracing::{debug, info};

/// A fully composed message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutgoingMail {
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub body: String,
    /// Sender address
    pub from: String,
    /// Recipient addresses
    pub to: Vec<String>,
}

impl OutgoingMail {
    /// Checks that there is at least one plausible recipient.
    ///
    /// # Errors
    /// Returns `MailDelivery` when a recipient address is missing or malformed.
    pub fn validate(&self) -> Result<()> {
        if self.to.is_empty() {
            return Err(Error::MailDelivery {
                message: "no recipient".to_string(),
            });
        }
        if let Some(bad) = self.to.iter().find(|address| !address.contains('@')) {
            return Err(Error::MailDelivery {
                message: format!("invalid recipient address '{bad}'"),
            });
        }
        Ok(())
    }
}

/// Email delivery service.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Delivers `mail`, failing loudly.
    async fn send(&self, mail: &OutgoingMail) -> Result<()>;
}

/// Mailer that writes every message to the log instead of an SMTP relay.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        mail.validate()?;
        info!(
            "Mail '{}' from {} to {}",
            mail.subject,
            mail.from,
            mail.to.join(", ")
        );
        debug!("Mail body:\n{}", mail.body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail_to(to: &[&str]) -> OutgoingMail {
        OutgoingMail {
            subject: "Coffee fund".to_string(),
            body: "Hello".to_string(),
            from: "fund@example.org".to_string(),
            to: to.iter().map(ToString::to_string).collect(),
        }
    }

    #[tokio::test]
    async fn test_log_mailer_accepts_valid_mail() -> Result<()> {
        LogMailer.send(&mail_to(&["jdoe@example.org"])).await
    }

    #[tokio::test]
    async fn test_log_mailer_fails_loudly_without_recipient() {
        let result = LogMailer.send(&mail_to(&[])).await;
        assert!(matches!(result, Err(Error::MailDelivery { .. })));

        let result = LogMailer.send(&mail_to(&[""])).await;
        assert!(matches!(result, Err(Error::MailDelivery { .. })));
    }
}
