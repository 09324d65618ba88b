//! Account overview for administrators.

use crate::{
    core::{
        employee,
        money::Money,
        pagination::{self, Pagination},
    },
    errors::Result,
    services::{Directory, DirectoryUser},
};
use sea_orm::ConnectionTrait;

/// A customer and their current balance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    /// Directory entry
    pub user: DirectoryUser,
    /// Balance; zero when no employee row exists yet
    pub balance: Money,
}

/// One page of customer accounts.
#[derive(Clone, Debug)]
pub struct AccountsPage {
    /// Pagination over accounts
    pub pagination: Pagination,
    /// Accounts on this page
    pub accounts: Vec<Account>,
}

/// Active directory users in any of `customer_groups`, sorted by last then
/// first name.
pub async fn customers(directory: &dyn Directory, customer_groups: &[String]) -> Result<Vec<DirectoryUser>> {
    let mut users: Vec<DirectoryUser> = directory
        .list_users()
        .await?
        .into_iter()
        .filter(|u| u.is_active && u.in_any_group(customer_groups))
        .collect();
    users.sort_by(|a, b| {
        (a.last_name.as_str(), a.first_name.as_str()).cmp(&(b.last_name.as_str(), b.first_name.as_str()))
    });
    Ok(users)
}

/// Page `page` of the customer accounts with their balances.
pub async fn list_accounts<C>(
    db: &C,
    directory: &dyn Directory,
    customer_groups: &[String],
    page: u64,
) -> Result<AccountsPage>
where
    C: ConnectionTrait,
{
    let users = customers(directory, customer_groups).await?;
    let count = u64::try_from(users.len())?;
    let pagination = Pagination::new(page, pagination::total_pages(count));

    let mut accounts = Vec::new();
    for user in &users[pagination::page_range(pagination.current(), count)] {
        accounts.push(Account {
            balance: employee::balance(db, &user.username).await?,
            user: user.clone(),
        });
    }

    Ok(AccountsPage { pagination, accounts })
}
