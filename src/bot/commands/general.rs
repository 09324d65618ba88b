//! General Discord commands - ping and help.
//! These commands don't touch the database.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**Coffee Fund Help**\n\n\
        **Shopping**\n\
        • `/menu` - Shows everything on offer, by category.\n\
        • `/cart add|increase|decrease|remove <product>` - Edits your shopping cart.\n\
        • `/cart show [page]` - Shows your cart and its current total.\n\
        • `/cart clear` - Empties your cart.\n\
        • `/checkout` - Buys everything in your cart.\n\
        • `/buy <product>` - Buys a single item right away.\n\
        • `/cancel <key>` - Cancels a purchase with the key from your receipt.\n\n\
        **Your account**\n\
        • `/profile [page]` - Shows your balance and purchase history.\n\
        • `/notifications <deposits> <purchases>` - Chooses which emails you get.\n\
        • `/picture [image]` - Sets or removes your profile picture.\n\n\
        **Administration**\n\
        • `/admin deposit|accounts|purchases` - Deposits and account overview.\n\
        • `/admin products|product_add|price|deactivate|restore|delete` - Product management.\n\n\
        **Utility**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
