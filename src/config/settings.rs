//! Fund configuration loading from config.toml
//!
//! The file holds the public URL used in cancellation links, the mail sender
//! and subject, the groups whose members count as customers, the product list
//! seeded on startup and the static user directory.

use crate::{
    core::money::Money,
    entities::Category,
    errors::{Error, Result},
    services::DirectoryUser,
};
use serde::Deserialize;
use std::path::Path;

fn default_public_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_mail_from() -> String {
    "coffee-fund@localhost".to_string()
}

fn default_mail_subject() -> String {
    "Coffee fund".to_string()
}

fn default_customer_groups() -> Vec<String> {
    ["prof", "wimi", "stud"].map(String::from).to_vec()
}

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Fund-wide settings
    #[serde(default)]
    pub fund: FundConfig,
    /// Products to seed
    #[serde(default)]
    pub products: Vec<ProductConfig>,
    /// Users served by the static directory
    #[serde(default)]
    pub users: Vec<DirectoryUser>,
}

/// The `[fund]` table
#[derive(Debug, Deserialize, Clone)]
pub struct FundConfig {
    /// Scheme and host that cancellation links point at
    #[serde(default = "default_public_url")]
    pub public_url: String,
    /// Sender address of notification emails
    #[serde(default = "default_mail_from")]
    pub mail_from: String,
    /// Subject line of notification emails
    #[serde(default = "default_mail_subject")]
    pub mail_subject: String,
    /// Directory groups whose members are listed as customers
    #[serde(default = "default_customer_groups")]
    pub customer_groups: Vec<String>,
}

impl Default for FundConfig {
    fn default() -> Self {
        Self {
            public_url: default_public_url(),
            mail_from: default_mail_from(),
            mail_subject: default_mail_subject(),
            customer_groups: default_customer_groups(),
        }
    }
}

/// Configuration for a single product
#[derive(Debug, Deserialize, Clone)]
pub struct ProductConfig {
    /// Product name
    pub name: String,
    /// Unit price, e.g. "1.50"
    pub price: Money,
    /// Catalog section (`drink`, `snack` or `ice_cream`)
    pub category: Category,
}

/// Loads the configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A price is malformed
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text
///
/// # Errors
/// Returns `Config` for invalid TOML or values.
pub fn parse_config(contents: &str) -> Result<Config> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the configuration from the default location (./config.toml)
pub fn load_default_config() -> Result<Config> {
    load_config("config.toml")
}
