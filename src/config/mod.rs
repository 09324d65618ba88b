/// Database configuration and connection management
pub mod database;

/// Fund, product and directory configuration from config.toml
pub mod settings;
