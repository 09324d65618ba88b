use coffee_fund::{
    bot::{self, BotData},
    config::{database, settings},
    core::notification::Notifier,
    errors::{Error, Result},
    services::{LogMailer, StaticDirectory},
};
use dotenvy::dotenv;
use std::{env, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also be set externally
    dotenv().ok();

    // 3. Load config.toml
    let config = settings::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {e}"))?;
    info!(
        "Loaded configuration with {} product(s) and {} user(s)",
        config.products.len(),
        config.users.len()
    );

    // 4. Connect, create tables and seed products
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    database::create_tables(&db).await?;
    database::seed_products(&db, &config.products).await?;

    // 5. Run the bot
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {e}"))
        .map_err(Error::EnvVar)?;

    let notifier = Notifier::new(
        Arc::new(LogMailer),
        config.fund.mail_from.clone(),
        config.fund.mail_subject.clone(),
    );
    let directory = Arc::new(StaticDirectory::new(config.users));
    let data = BotData::new(db, config.fund, notifier, directory);

    bot::run_bot(token, data).await
}
