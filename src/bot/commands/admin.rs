//! Administration commands - deposits, products, purchases and accounts.
//!
//! Every subcommand checks that the invoking Discord account belongs to a
//! directory superuser before doing anything.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, format, handlers::autocomplete, signed_in_admin},
        core::{
            accounts, deposit,
            history::{self, DateRange, PurchaseFilter},
            money::Money,
            pagination::{self, Pagination},
            product::{self, ProductAction},
        },
        entities::Category,
        errors::{Error, Result},
    };
    use chrono::NaiveDate;
    use std::fmt::Write as _;

    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum CategoryChoice {
        Drink,
        Snack,
        #[name = "Ice cream"]
        IceCream,
    }

    impl From<CategoryChoice> for Category {
        fn from(choice: CategoryChoice) -> Self {
            match choice {
                CategoryChoice::Drink => Self::Drink,
                CategoryChoice::Snack => Self::Snack,
                CategoryChoice::IceCream => Self::IceCream,
            }
        }
    }

    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum RangeChoice {
        Today,
        Yesterday,
        #[name = "Past 7 days"]
        PastWeek,
        #[name = "This month"]
        ThisMonth,
        #[name = "This year"]
        ThisYear,
    }

    impl From<RangeChoice> for DateRange {
        fn from(choice: RangeChoice) -> Self {
            match choice {
                RangeChoice::Today => Self::Today,
                RangeChoice::Yesterday => Self::Yesterday,
                RangeChoice::PastWeek => Self::PastWeek,
                RangeChoice::ThisMonth => Self::ThisMonth,
                RangeChoice::ThisYear => Self::ThisYear,
            }
        }
    }

    fn requested_page(page: Option<&str>) -> u64 {
        pagination::current_page(page, u64::MAX).unwrap_or(1)
    }

    fn parse_day(input: Option<&str>) -> std::result::Result<Option<NaiveDate>, String> {
        input
            .map(|raw| {
                NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                    .map_err(|_| format!("⚠️ '{raw}' is not a date (expected YYYY-MM-DD)."))
            })
            .transpose()
    }

    /// Fund administration.
    #[poise::command(
        slash_command,
        subcommands(
            "admin_deposit",
            "admin_products",
            "admin_product_add",
            "admin_price",
            "admin_deactivate",
            "admin_restore",
            "admin_delete",
            "admin_purchases",
            "admin_accounts"
        )
    )]
    pub async fn admin(ctx: Context<'_>) -> Result<()> {
        ctx.say(
            "Admin commands: `deposit`, `accounts`, `purchases`, `products`, \
             `product_add`, `price`, `deactivate`, `restore`, `delete`",
        )
        .await?;
        Ok(())
    }

    /// Pays money into a user's account (negative amounts correct mistakes).
    #[poise::command(slash_command, rename = "deposit")]
    pub async fn admin_deposit(
        ctx: Context<'_>,
        #[description = "Username of the account"]
        #[autocomplete = "autocomplete::autocomplete_username"]
        username: String,
        #[description = "Amount, e.g. 10 or 7,50"] amount: String,
    ) -> Result<()> {
        let Some(admin) = signed_in_admin(ctx).await? else {
            return Ok(());
        };
        let data = ctx.data();
        let amount = Money::parse(&amount)?;
        let user = data
            .directory
            .find_user(&username)
            .await?
            .ok_or_else(|| Error::UserNotFound {
                username: username.clone(),
            })?;

        match deposit::record_deposit(&data.database, &data.notifier, &user, amount).await? {
            Some(receipt) => {
                tracing::info!("{} deposited {amount} for {}", admin.username, user.username);
                ctx.say(format!(
                    "💶 Deposited {amount} for {}. New balance: **{}**.",
                    user.full_name(),
                    receipt.new_balance
                ))
                .await?;
            }
            None => {
                ctx.say("Nothing deposited.").await?;
            }
        }
        Ok(())
    }

    /// Lists active products and the deactivated ones.
    #[poise::command(slash_command, rename = "products")]
    pub async fn admin_products(
        ctx: Context<'_>,
        #[description = "Page to show"] page: Option<String>,
    ) -> Result<()> {
        if signed_in_admin(ctx).await?.is_none() {
            return Ok(());
        }
        let db = &ctx.data().database;
        let active = product::get_active_products(db).await?;
        let inactive = product::get_inactive_products(db).await?;

        let count = u64::try_from(active.len())?;
        let pagination = Pagination::new(
            requested_page(page.as_deref()),
            pagination::total_pages(count),
        );

        let mut message = String::from("📦 **Active products**\n");
        for product in &active[pagination::page_range(pagination.current(), count)] {
            let _ = writeln!(
                message,
                "• {} ({}) - {}",
                product.name,
                product.category,
                Money::from_cents(product.price_cents)
            );
        }
        format::push_page_bar(&mut message, &pagination);
        if !inactive.is_empty() {
            let names: Vec<&str> = inactive.iter().map(|p| p.name.as_str()).collect();
            let _ = write!(message, "\n\n**Inactive:** {}", names.join(", "));
        }
        ctx.say(message).await?;
        Ok(())
    }

    /// Adds a product to the menu.
    #[poise::command(slash_command, rename = "product_add")]
    pub async fn admin_product_add(
        ctx: Context<'_>,
        #[description = "Unique product name"] name: String,
        #[description = "Unit price, e.g. 1,50"] price: String,
        #[description = "Menu section"] category: CategoryChoice,
    ) -> Result<()> {
        if signed_in_admin(ctx).await?.is_none() {
            return Ok(());
        }
        let price = Money::parse(&price)?;
        let product =
            product::create_product(&ctx.data().database, &name, price, category.into()).await?;
        ctx.say(format!(
            "✅ Added **{}** to {} at {price}.",
            product.name, product.category
        ))
        .await?;
        Ok(())
    }

    async fn apply(ctx: Context<'_>, name: &str, action: ProductAction) -> Result<()> {
        if signed_in_admin(ctx).await?.is_none() {
            return Ok(());
        }
        let product = product::apply_action(&ctx.data().database, name, &action).await?;
        let message = match action {
            ProductAction::Deactivate => format!("🚫 **{}** is no longer on the menu.", product.name),
            ProductAction::Restore => format!("✅ **{}** is back on the menu.", product.name),
            ProductAction::SetPrice { value } => format!("💶 **{}** now costs {value}.", product.name),
        };
        ctx.say(message).await?;
        Ok(())
    }

    /// Changes a product's price; past purchases keep theirs.
    #[poise::command(slash_command, rename = "price")]
    pub async fn admin_price(
        ctx: Context<'_>,
        #[description = "Product"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        product: String,
        #[description = "New unit price, e.g. €1,50"] price: String,
    ) -> Result<()> {
        let action = ProductAction::set_price(&price)?;
        apply(ctx, &product, action).await
    }

    /// Takes a product off the menu.
    #[poise::command(slash_command, rename = "deactivate")]
    pub async fn admin_deactivate(
        ctx: Context<'_>,
        #[description = "Product"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        product: String,
    ) -> Result<()> {
        apply(ctx, &product, ProductAction::Deactivate).await
    }

    /// Puts a deactivated product back on the menu.
    #[poise::command(slash_command, rename = "restore")]
    pub async fn admin_restore(
        ctx: Context<'_>,
        #[description = "Product"]
        #[autocomplete = "autocomplete::autocomplete_inactive_product_name"]
        product: String,
    ) -> Result<()> {
        apply(ctx, &product, ProductAction::Restore).await
    }

    /// Deletes a product that was never bought.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn admin_delete(
        ctx: Context<'_>,
        #[description = "Product"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        product: String,
    ) -> Result<()> {
        if signed_in_admin(ctx).await?.is_none() {
            return Ok(());
        }
        product::delete_product(&ctx.data().database, &product).await?;
        ctx.say(format!("🗑️ Deleted **{product}**.")).await?;
        Ok(())
    }

    /// Lists purchases, optionally filtered.
    #[poise::command(slash_command, rename = "purchases")]
    pub async fn admin_purchases(
        ctx: Context<'_>,
        #[description = "Only this buyer"]
        #[autocomplete = "autocomplete::autocomplete_username"]
        username: Option<String>,
        #[description = "Only this product"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        product: Option<String>,
        #[description = "Predefined date range"] range: Option<RangeChoice>,
        #[description = "First day (YYYY-MM-DD)"] from: Option<String>,
        #[description = "Last day (YYYY-MM-DD)"] to: Option<String>,
        #[description = "Page to show"] page: Option<String>,
    ) -> Result<()> {
        if signed_in_admin(ctx).await?.is_none() {
            return Ok(());
        }
        let (from, to) = match (parse_day(from.as_deref()), parse_day(to.as_deref())) {
            (Ok(from), Ok(to)) => (from, to),
            (Err(message), _) | (_, Err(message)) => {
                ctx.say(message).await?;
                return Ok(());
            }
        };
        let range = match range {
            Some(choice) => Some(DateRange::from(choice)),
            None if from.is_some() || to.is_some() => Some(DateRange::Between { from, to }),
            None => None,
        };
        let filter = PurchaseFilter {
            username,
            product,
            range,
        };

        let page = history::filter_purchases(
            &ctx.data().database,
            &filter,
            chrono::Utc::now(),
            requested_page(page.as_deref()),
        )
        .await?;

        if page.groups.is_empty() {
            ctx.say("No purchases match.").await?;
            return Ok(());
        }
        let mut message = format!("🧾 **Purchases** ({} rows)\n", page.total_rows);
        message.push_str(&format::purchase_groups(&page.groups, true));
        format::push_page_bar(&mut message, &page.pagination);
        ctx.say(message).await?;
        Ok(())
    }

    /// Lists customer accounts and their balances.
    #[poise::command(slash_command, rename = "accounts")]
    pub async fn admin_accounts(
        ctx: Context<'_>,
        #[description = "Page to show"] page: Option<String>,
    ) -> Result<()> {
        if signed_in_admin(ctx).await?.is_none() {
            return Ok(());
        }
        let data = ctx.data();
        let page = accounts::list_accounts(
            &data.database,
            data.directory.as_ref(),
            &data.fund.customer_groups,
            requested_page(page.as_deref()),
        )
        .await?;

        let mut message = String::from("👥 **Accounts**\n");
        for account in &page.accounts {
            let _ = writeln!(
                message,
                "• {} ({}) - {}",
                account.user.sort_name(),
                account.user.username,
                account.balance
            );
        }
        format::push_page_bar(&mut message, &page.pagination);
        ctx.say(message).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
