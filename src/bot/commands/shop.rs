//! Shopping commands - menu, cart, checkout, buy and cancel.
//!
//! Carts are kept per Discord account in the session store. Only checkout
//! and buy require a linked directory account; cancelling needs nothing but
//! the key from the receipt.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, format, handlers::autocomplete, signed_in_user},
        core::{
            cancellation,
            cart::{self, CartAction},
            money::Money,
            pagination::{self, Pagination},
            product,
            purchase::{self, PurchaseReceipt},
        },
        errors::Result,
    };
    use std::fmt::Write as _;

    fn visitor(ctx: Context<'_>) -> String {
        ctx.author().id.to_string()
    }

    async fn update_cart(ctx: Context<'_>, action: &CartAction) -> Result<()> {
        let visitor = visitor(ctx);
        let data = ctx.data();
        let current = data.sessions.cart(&visitor).await;
        let updated = cart::apply(&data.database, current, action).await?;
        let count = updated.count();
        data.sessions.store(&visitor, updated).await;
        ctx.say(format!("🛒 Your cart now holds {count} item(s)."))
            .await?;
        Ok(())
    }

    fn receipt_message(receipt: &PurchaseReceipt) -> String {
        let mut message = String::from("✅ Purchase complete.\n");
        message.push_str(&format::cart_lines(&receipt.lines, receipt.total));
        let _ = write!(
            message,
            "\nYour balance is now **{}**.\nTo undo this purchase run `/cancel {}`",
            receipt.new_balance, receipt.key
        );
        if receipt.notified {
            message.push_str("\nA confirmation email is on its way.");
        }
        message
    }

    /// Shows all products on offer, grouped by category.
    #[poise::command(slash_command, prefix_command)]
    pub async fn menu(ctx: Context<'_>) -> Result<()> {
        let products = product::get_active_products(&ctx.data().database).await?;
        if products.is_empty() {
            ctx.say("The menu is empty right now.").await?;
            return Ok(());
        }

        let mut message = String::from("☕ **Menu**\n");
        let mut category = None;
        for product in &products {
            if category != Some(product.category) {
                category = Some(product.category);
                let _ = writeln!(message, "\n**{}**", product.category);
            }
            let _ = writeln!(
                message,
                "• {} - {}",
                product.name,
                Money::from_cents(product.price_cents)
            );
        }
        ctx.say(message).await?;
        Ok(())
    }

    /// Manages your shopping cart.
    #[poise::command(
        slash_command,
        subcommands(
            "cart_add",
            "cart_show",
            "cart_increase",
            "cart_decrease",
            "cart_remove",
            "cart_clear"
        )
    )]
    pub async fn cart(ctx: Context<'_>) -> Result<()> {
        ctx.say(
            "Cart commands: `/cart add`, `/cart show`, `/cart increase`, \
             `/cart decrease`, `/cart remove`, `/cart clear`",
        )
        .await?;
        Ok(())
    }

    /// Puts one unit of a product into your cart.
    #[poise::command(slash_command, rename = "add")]
    pub async fn cart_add(
        ctx: Context<'_>,
        #[description = "Product to add"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        product: String,
    ) -> Result<()> {
        update_cart(ctx, &CartAction::Add(product)).await
    }

    /// Adds one more unit of a product already in your cart.
    #[poise::command(slash_command, rename = "increase")]
    pub async fn cart_increase(
        ctx: Context<'_>,
        #[description = "Product in your cart"]
        #[autocomplete = "autocomplete::autocomplete_cart_item"]
        product: String,
    ) -> Result<()> {
        update_cart(ctx, &CartAction::Increase(product)).await
    }

    /// Takes one unit of a product out of your cart.
    #[poise::command(slash_command, rename = "decrease")]
    pub async fn cart_decrease(
        ctx: Context<'_>,
        #[description = "Product in your cart"]
        #[autocomplete = "autocomplete::autocomplete_cart_item"]
        product: String,
    ) -> Result<()> {
        update_cart(ctx, &CartAction::Decrease(product)).await
    }

    /// Removes a product from your cart entirely.
    #[poise::command(slash_command, rename = "remove")]
    pub async fn cart_remove(
        ctx: Context<'_>,
        #[description = "Product in your cart"]
        #[autocomplete = "autocomplete::autocomplete_cart_item"]
        product: String,
    ) -> Result<()> {
        update_cart(ctx, &CartAction::Remove(product)).await
    }

    /// Empties your cart.
    #[poise::command(slash_command, rename = "clear")]
    pub async fn cart_clear(ctx: Context<'_>) -> Result<()> {
        ctx.data().sessions.clear(&visitor(ctx)).await;
        ctx.say("🛒 Your cart is empty.").await?;
        Ok(())
    }

    /// Shows your cart priced at today's prices.
    #[poise::command(slash_command, rename = "show")]
    pub async fn cart_show(
        ctx: Context<'_>,
        #[description = "Page to show"] page: Option<String>,
    ) -> Result<()> {
        let cart = ctx.data().sessions.cart(&visitor(ctx)).await;
        if cart.is_empty() {
            ctx.say("🛒 Your cart is empty. Use `/cart add` to fill it.")
                .await?;
            return Ok(());
        }

        let lines = cart::lines(&ctx.data().database, &cart).await?;
        let count = u64::try_from(lines.len())?;
        let requested = pagination::current_page(page.as_deref(), u64::MAX).unwrap_or(1);
        let pagination = Pagination::new(requested, pagination::total_pages(count));
        let total = cart::total_cost(&ctx.data().database, &cart).await?;

        let mut message = format!("🛒 **Your cart** ({} item(s))\n", cart.count());
        message.push_str(&format::cart_lines(
            &lines[pagination::page_range(pagination.current(), count)],
            total,
        ));
        format::push_page_bar(&mut message, &pagination);
        message.push_str("\nRun `/checkout` to buy.");
        ctx.say(message).await?;
        Ok(())
    }

    /// Buys everything in your cart and debits your balance.
    #[poise::command(slash_command)]
    pub async fn checkout(ctx: Context<'_>) -> Result<()> {
        let Some(user) = signed_in_user(ctx).await? else {
            return Ok(());
        };
        let visitor = visitor(ctx);
        let data = ctx.data();
        let cart = data.sessions.cart(&visitor).await;

        let receipt = purchase::purchase_cart(
            &data.database,
            &data.notifier,
            &cart,
            &user,
            &data.fund.public_url,
        )
        .await?;
        data.sessions.clear(&visitor).await;

        ctx.say(receipt_message(&receipt)).await?;
        Ok(())
    }

    /// Buys a single unit of a product right away.
    #[poise::command(slash_command, prefix_command)]
    pub async fn buy(
        ctx: Context<'_>,
        #[description = "Product to buy"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        product: String,
    ) -> Result<()> {
        let Some(user) = signed_in_user(ctx).await? else {
            return Ok(());
        };
        let data = ctx.data();
        let receipt = purchase::buy_now(
            &data.database,
            &data.notifier,
            &user,
            &product,
            &data.fund.public_url,
        )
        .await?;
        ctx.say(receipt_message(&receipt)).await?;
        Ok(())
    }

    /// Cancels a purchase and refunds it.
    #[poise::command(slash_command, prefix_command)]
    pub async fn cancel(
        ctx: Context<'_>,
        #[description = "Key from your purchase receipt"] key: String,
    ) -> Result<()> {
        let data = ctx.data();
        let cancellation = cancellation::cancel_purchase(
            &data.database,
            &data.notifier,
            data.directory.as_ref(),
            key.trim(),
        )
        .await?;
        ctx.say(format!(
            "↩️ Purchase cancelled. {} was refunded, the balance is now **{}**.",
            cancellation.refunded, cancellation.new_balance
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
