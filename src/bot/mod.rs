//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the coffee fund: slash
//! commands, autocomplete handlers, the shared bot context and the error
//! handler that turns recoverable errors into short replies.

/// Discord command implementations (general, shop, account, admin)
pub mod commands;
/// Rendering helpers for replies
pub mod format;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    config::settings::FundConfig,
    core::notification::Notifier,
    errors::{Error, Result},
    services::{Directory, DirectoryUser, SessionStore},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Poise context used by every command.
pub type Context<'a> = poise::Context<'a, BotData, Error>;

/// Shared data available to all bot commands.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Fund settings (public URL, customer groups)
    pub fund: FundConfig,
    /// Sends notification emails
    pub notifier: Notifier,
    /// Resolves Discord users to directory users
    pub directory: Arc<dyn Directory>,
    /// Shopping carts keyed by Discord user id
    pub sessions: SessionStore,
}

impl BotData {
    /// Creates the shared context with an empty session store.
    #[must_use]
    pub fn new(
        database: DatabaseConnection,
        fund: FundConfig,
        notifier: Notifier,
        directory: Arc<dyn Directory>,
    ) -> Self {
        Self {
            database,
            fund,
            notifier,
            directory,
            sessions: SessionStore::new(),
        }
    }
}

/// The directory user behind the invoking Discord account.
///
/// Replies and returns `None` when the account is not linked to an active
/// directory user.
pub async fn signed_in_user(ctx: Context<'_>) -> Result<Option<DirectoryUser>> {
    let discord_id = ctx.author().id.to_string();
    let user = ctx.data().directory.authenticate(&discord_id).await?;
    if user.is_none() {
        ctx.say("🔒 Your Discord account is not linked to a coffee fund account.")
            .await?;
    }
    Ok(user)
}

/// Like [`signed_in_user`], but only lets administrators through.
pub async fn signed_in_admin(ctx: Context<'_>) -> Result<Option<DirectoryUser>> {
    let Some(user) = signed_in_user(ctx).await? else {
        return Ok(None);
    };
    if !user.is_superuser {
        warn!("{} tried to use an admin command", user.username);
        ctx.say("🔒 This command is for administrators only.").await?;
        return Ok(None);
    }
    Ok(Some(user))
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            let reply = if error.is_recoverable() {
                info!("Command `{}` declined: {error}", ctx.command().name);
                format!("⚠️ {error}")
            } else {
                error!("Error in command `{}`: {error:?}", ctx.command().name);
                "❌ Something went wrong. Nothing was changed, please try again later.".to_string()
            };
            if let Err(e) = ctx.say(reply).await {
                error!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Registers all commands and runs the Discord client until it stops.
#[instrument(skip(token, data))]
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Starting Discord client");
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;
    client.start().await?;
    Ok(())
}
