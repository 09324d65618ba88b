//! Unified error type for the coffee fund.
//!
//! Not-found and validation errors are "recoverable": the user-facing layer
//! answers them with a short notice and leaves all state untouched.

use thiserror::Error;

/// Every failure the crate can surface.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Persistence layer failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// No product with this name exists
    #[error("Product not found: {name}")]
    ProductNotFound {
        /// Requested product name
        name: String,
    },

    /// The directory does not know this user
    #[error("User not found: {username}")]
    UserNotFound {
        /// Requested username or identity
        username: String,
    },

    /// No purchase rows share this key
    #[error("No purchase found for key {key}")]
    PurchaseGroupNotFound {
        /// Requested cancellation key
        key: String,
    },

    /// Malformed or out-of-range money input
    #[error("Invalid amount: {input}")]
    InvalidAmount {
        /// The rejected input, as given
        input: String,
    },

    /// Checkout was attempted with nothing in the cart
    #[error("The shopping cart is empty")]
    EmptyCart,

    /// Hard delete refused because purchases still point at the product
    #[error("Product '{name}' is referenced by {count} purchase(s) and cannot be deleted")]
    ProductInUse {
        /// Product name
        name: String,
        /// Number of referencing purchases
        count: u64,
    },

    /// Product names must not be blank
    #[error("Invalid product name: '{name}'")]
    InvalidName {
        /// The rejected name
        name: String,
    },

    /// Product names are unique
    #[error("A product named '{name}' already exists")]
    DuplicateProduct {
        /// Product name
        name: String,
    },

    /// The mail service rejected or failed to deliver a message
    #[error("Mail delivery failed: {message}")]
    MailDelivery {
        /// Reason reported by the mail service
        message: String,
    },

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Integer conversion overflow
    #[error("Integer conversion error: {0}")]
    IntConversion(#[from] std::num::TryFromIntError),

    /// Discord framework failure
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl Error {
    /// Whether the error is a not-found or validation condition that callers
    /// should answer with a silent no-op instead of a failure.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ProductNotFound { .. }
                | Self::UserNotFound { .. }
                | Self::PurchaseGroupNotFound { .. }
                | Self::InvalidAmount { .. }
                | Self::InvalidName { .. }
                | Self::EmptyCart
                | Self::ProductInUse { .. }
                | Self::DuplicateProduct { .. }
        )
    }
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_and_validation_are_recoverable() {
        assert!(Error::ProductNotFound { name: "Mate".to_string() }.is_recoverable());
        assert!(Error::PurchaseGroupNotFound { key: "abc".to_string() }.is_recoverable());
        assert!(Error::InvalidAmount { input: "x".to_string() }.is_recoverable());
        assert!(Error::EmptyCart.is_recoverable());
    }

    #[test]
    fn test_mail_and_storage_failures_are_not_recoverable() {
        assert!(
            !Error::MailDelivery {
                message: "smtp down".to_string()
            }
            .is_recoverable()
        );
        assert!(!Error::Database(sea_orm::DbErr::Custom("boom".to_string())).is_recoverable());
    }
}
