//! Account commands - profile, notification preferences and picture.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, format, signed_in_user},
        core::{
            deposit,
            employee::{self, NotificationPreferences},
            history,
            money::Money,
            pagination,
        },
        errors::Result,
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write as _;

    const RECENT_DEPOSITS: usize = 5;

    fn on_off(enabled: bool) -> &'static str {
        if enabled { "on" } else { "off" }
    }

    /// Shows your balance, email settings and purchase history.
    #[poise::command(slash_command, prefix_command)]
    pub async fn profile(
        ctx: Context<'_>,
        #[description = "History page to show"] page: Option<String>,
    ) -> Result<()> {
        let Some(user) = signed_in_user(ctx).await? else {
            return Ok(());
        };
        let db = &ctx.data().database;
        let account = employee::get_or_create_employee(db, &user.username).await?;
        let requested = pagination::current_page(page.as_deref(), u64::MAX).unwrap_or(1);
        let history = history::user_history(db, &user.username, requested).await?;

        let mut message = format!(
            "👤 **{}**\nBalance: **{}**\nDeposit emails: {} | Purchase emails: {}\n",
            user.full_name(),
            Money::from_cents(account.balance_cents),
            on_off(account.receive_deposit_emails),
            on_off(account.receive_purchase_emails),
        );
        if let Some(picture) = &account.picture {
            let _ = writeln!(message, "Picture: {picture}");
        }

        let deposits = deposit::list_deposits(db, &user.username).await?;
        if !deposits.is_empty() {
            message.push_str("\n**Recent deposits**\n");
            message.push_str(&format::recent_deposits(&deposits, RECENT_DEPOSITS));
        }

        if history.groups.is_empty() {
            message.push_str("\nNo purchases yet.");
        } else {
            message.push_str("\n**Purchases**\n");
            message.push_str(&format::purchase_groups(&history.groups, false));
            format::push_page_bar(&mut message, &history.pagination);
        }

        ctx.say(message).await?;
        Ok(())
    }

    /// Chooses which notification emails you receive.
    #[poise::command(slash_command)]
    pub async fn notifications(
        ctx: Context<'_>,
        #[description = "Email me when money is deposited"] deposits: bool,
        #[description = "Email me after every purchase"] purchases: bool,
    ) -> Result<()> {
        let Some(user) = signed_in_user(ctx).await? else {
            return Ok(());
        };
        let account = employee::set_notification_preferences(
            &ctx.data().database,
            &user.username,
            NotificationPreferences {
                deposits,
                purchases,
            },
        )
        .await?;
        ctx.say(format!(
            "📧 Deposit emails {}, purchase emails {}.",
            on_off(account.receive_deposit_emails),
            on_off(account.receive_purchase_emails)
        ))
        .await?;
        Ok(())
    }

    /// Sets your profile picture, or removes it when no image is given.
    #[poise::command(slash_command)]
    pub async fn picture(
        ctx: Context<'_>,
        #[description = "Image to use"] image: Option<serenity::Attachment>,
    ) -> Result<()> {
        let Some(user) = signed_in_user(ctx).await? else {
            return Ok(());
        };
        let db = &ctx.data().database;

        match image {
            Some(image) if image.content_type.as_deref().is_some_and(|t| t.starts_with("image/")) => {
                employee::set_picture(db, &user.username, &image.url).await?;
                ctx.say("🖼️ Profile picture updated.").await?;
            }
            Some(_) => {
                ctx.say("⚠️ That file is not an image.").await?;
            }
            None => {
                employee::clear_picture(db, &user.username).await?;
                ctx.say("🖼️ Profile picture removed.").await?;
            }
        }
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
