//! Purchase history - grouping, per-user history and the admin purchase list.

use crate::{
    core::{
        money::Money,
        pagination::{self, PAGE_SIZE, Pagination},
        product as product_api,
    },
    entities::{Product, product, purchase},
    errors::Result,
};
use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use sea_orm::{ConnectionTrait, PaginatorTrait, QueryOrder, Select, prelude::*};

/// A purchase row joined with its product's name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PurchaseLine {
    /// Buyer
    pub username: String,
    /// Product name at display time
    pub product: String,
    /// Units bought
    pub quantity: i32,
    /// Frozen line total
    pub total: Money,
    /// Checkout timestamp
    pub date: DateTime<Utc>,
    /// Cancellation key
    pub key: String,
}

impl From<(purchase::Model, Option<product::Model>)> for PurchaseLine {
    fn from((row, product): (purchase::Model, Option<product::Model>)) -> Self {
        Self {
            product: product.map_or_else(|| format!("product #{}", row.product_id), |p| p.name),
            username: row.username,
            quantity: row.quantity,
            total: Money::from_cents(row.total_price_cents),
            date: row.date,
            key: row.key,
        }
    }
}

/// Rows that share one checkout timestamp.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PurchaseGroup {
    /// Shared timestamp
    pub date: DateTime<Utc>,
    /// Rows in their original order
    pub lines: Vec<PurchaseLine>,
}

impl PurchaseGroup {
    /// Sum of the frozen line totals.
    #[must_use]
    pub fn total(&self) -> Money {
        self.lines.iter().map(|l| l.total).sum()
    }

    /// Cancellation key of the group.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.lines.first().map(|l| l.key.as_str())
    }
}

/// Groups rows with identical dates, newest group first.
///
/// Rows keep their relative order inside each group.
#[must_use]
pub fn group_purchases_by_date(mut lines: Vec<PurchaseLine>) -> Vec<PurchaseGroup> {
    lines.sort_by(|a, b| b.date.cmp(&a.date));

    let mut groups: Vec<PurchaseGroup> = Vec::new();
    for line in lines {
        match groups.last_mut() {
            Some(group) if group.date == line.date => group.lines.push(line),
            _ => groups.push(PurchaseGroup {
                date: line.date,
                lines: vec![line],
            }),
        }
    }
    groups
}

/// Predefined and explicit date windows for the admin purchase list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateRange {
    /// Since midnight
    Today,
    /// The previous calendar day
    Yesterday,
    /// From midnight seven days ago through the end of today
    PastWeek,
    /// Since the first of the month
    ThisMonth,
    /// Since January 1st
    ThisYear,
    /// Inclusive calendar days; open ends are unbounded
    Between {
        /// First day
        from: Option<NaiveDate>,
        /// Last day
        to: Option<NaiveDate>,
    },
}

impl DateRange {
    /// Half-open `[start, end)` bounds relative to `now`.
    #[must_use]
    pub fn bounds(self, now: DateTime<Utc>) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        let today = now.date_naive();
        let tomorrow = today.checked_add_days(Days::new(1));
        let (from, to) = match self {
            Self::Today => (Some(today), tomorrow),
            Self::Yesterday => (today.checked_sub_days(Days::new(1)), Some(today)),
            Self::PastWeek => (today.checked_sub_days(Days::new(7)), tomorrow),
            Self::ThisMonth => (today.with_day(1), tomorrow),
            Self::ThisYear => (today.with_ordinal(1), tomorrow),
            Self::Between { from, to } => (from, to.and_then(|d| d.checked_add_days(Days::new(1)))),
        };
        (from.map(midnight), to.map(midnight))
    }
}

fn midnight(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Admin filter over all purchases; `None` fields match everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PurchaseFilter {
    /// Only this buyer
    pub username: Option<String>,
    /// Only this product (by name)
    pub product: Option<String>,
    /// Only this date window
    pub range: Option<DateRange>,
}

impl PurchaseFilter {
    fn apply(
        &self,
        mut query: Select<purchase::Entity>,
        product_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> Select<purchase::Entity> {
        if let Some(username) = &self.username {
            query = query.filter(purchase::Column::Username.eq(username.as_str()));
        }
        if let Some(id) = product_id {
            query = query.filter(purchase::Column::ProductId.eq(id));
        }
        if let Some(range) = self.range {
            let (start, end) = range.bounds(now);
            if let Some(start) = start {
                query = query.filter(purchase::Column::Date.gte(start));
            }
            if let Some(end) = end {
                query = query.filter(purchase::Column::Date.lt(end));
            }
        }
        query
    }
}

/// One page of grouped purchases.
#[derive(Clone, Debug)]
pub struct HistoryPage {
    /// Pagination over rows
    pub pagination: Pagination,
    /// Groups on this page
    pub groups: Vec<PurchaseGroup>,
    /// Rows matched over all pages
    pub total_rows: u64,
}

impl HistoryPage {
    fn empty() -> Self {
        Self {
            pagination: Pagination::new(1, 0),
            groups: Vec::new(),
            total_rows: 0,
        }
    }
}

async fn fetch_page<C>(db: &C, query: Select<purchase::Entity>, page: u64) -> Result<HistoryPage>
where
    C: ConnectionTrait,
{
    let paginator = query
        .order_by_desc(purchase::Column::Date)
        .order_by_asc(purchase::Column::Username)
        .order_by_asc(purchase::Column::ProductId)
        .order_by_asc(purchase::Column::Id)
        .find_also_related(Product)
        .paginate(db, PAGE_SIZE);

    let total_rows = paginator.num_items().await?;
    let pagination = Pagination::new(page, pagination::total_pages(total_rows));
    let rows = paginator.fetch_page(pagination.current() - 1).await?;

    Ok(HistoryPage {
        pagination,
        groups: group_purchases_by_date(rows.into_iter().map(PurchaseLine::from).collect()),
        total_rows,
    })
}

/// The purchase history of `username` for the profile view.
pub async fn user_history<C>(db: &C, username: &str, page: u64) -> Result<HistoryPage>
where
    C: ConnectionTrait,
{
    let query = purchase::Entity::find().filter(purchase::Column::Username.eq(username));
    fetch_page(db, query, page).await
}

/// All purchases matching `filter`, evaluated relative to `now`.
pub async fn filter_purchases<C>(
    db: &C,
    filter: &PurchaseFilter,
    now: DateTime<Utc>,
    page: u64,
) -> Result<HistoryPage>
where
    C: ConnectionTrait,
{
    let product_id = match &filter.product {
        Some(name) => match product_api::get_product_by_name(db, name).await? {
            Some(product) => Some(product.id),
            None => return Ok(HistoryPage::empty()),
        },
        None => None,
    };
    let query = filter.apply(purchase::Entity::find(), product_id, now);
    fetch_page(db, query, page).await
}
