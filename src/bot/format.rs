//! Plain-text rendering of lists, page windows and purchase groups.

use crate::{
    core::{
        cart::CartLine,
        history::PurchaseGroup,
        money::Money,
        pagination::{PageMarker, Pagination},
    },
    entities::deposit,
};
use std::fmt::Write as _;

/// Renders the page window, e.g. `1 … 8 9 [10] 11 12 … 20`.
///
/// A single page renders as an empty string.
#[must_use]
pub fn page_bar(pagination: &Pagination) -> String {
    if pagination.total() <= 1 {
        return String::new();
    }
    pagination
        .pages()
        .iter()
        .map(|marker| match marker {
            PageMarker::Page(page) if *page == pagination.current() => format!("[{page}]"),
            PageMarker::Page(page) => page.to_string(),
            PageMarker::EllipsisBefore | PageMarker::EllipsisAfter => "…".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Appends the page bar as a footer when there is more than one page.
pub fn push_page_bar(out: &mut String, pagination: &Pagination) {
    let bar = page_bar(pagination);
    if !bar.is_empty() {
        let _ = write!(out, "\nPage {bar}");
    }
}

/// One line per cart entry followed by `total`, the total of the whole cart.
///
/// `lines` may be a single page of the cart.
#[must_use]
pub fn cart_lines(lines: &[CartLine], total: Money) -> String {
    let mut out = String::new();
    for line in lines {
        let _ = writeln!(
            out,
            "• {} × {} = {}",
            line.quantity, line.product.name, line.line_total
        );
    }
    let _ = write!(out, "**Total: {total}**");
    out
}

/// The newest `limit` deposits, one per line.
#[must_use]
pub fn recent_deposits(deposits: &[deposit::Model], limit: usize) -> String {
    deposits.iter().take(limit).fold(String::new(), |mut out, d| {
        let _ = writeln!(
            out,
            "  {} {}",
            d.created_at.format("%Y-%m-%d"),
            Money::from_cents(d.amount_cents)
        );
        out
    })
}

/// Purchase groups with their timestamp, lines and total.
#[must_use]
pub fn purchase_groups(groups: &[PurchaseGroup], show_buyer: bool) -> String {
    let mut out = String::new();
    for group in groups {
        let _ = writeln!(
            out,
            "**{}** ({})",
            group.date.format("%Y-%m-%d %H:%M"),
            group.total()
        );
        for line in &group.lines {
            if show_buyer {
                let _ = writeln!(
                    out,
                    "  {} × {} for {} ({})",
                    line.quantity, line.product, line.total, line.username
                );
            } else {
                let _ = writeln!(out, "  {} × {} for {}", line.quantity, line.product, line.total);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::history::PurchaseLine,
        entities::{Category, product},
    };
    use chrono::{TimeZone, Utc};

    fn cart_line(name: &str, quantity: u32, cents: i64) -> CartLine {
        CartLine {
            product: product::Model {
                id: 1,
                name: name.to_string(),
                price_cents: cents,
                category: Category::Drink,
                active: true,
                created_at: chrono::NaiveDateTime::default(),
                updated_at: chrono::NaiveDateTime::default(),
            },
            quantity,
            line_total: Money::from_cents(cents * i64::from(quantity)),
        }
    }

    #[test]
    fn test_cart_page_shows_whole_cart_total() {
        let page = [cart_line("Espresso", 2, 150)];
        let text = cart_lines(&page, Money::from_cents(1_380));
        assert!(text.contains("• 2 × Espresso = €3.00"));
        assert!(text.ends_with("**Total: €13.80**"));
        assert_eq!(text.matches("Total").count(), 1);
    }

    #[test]
    fn test_page_bar_marks_current_page() {
        assert_eq!(page_bar(&Pagination::new(10, 20)), "1 … 8 9 [10] 11 12 … 20");
        assert_eq!(page_bar(&Pagination::new(1, 3)), "[1] 2 3");
        assert_eq!(page_bar(&Pagination::new(1, 1)), "");
    }

    #[test]
    fn test_recent_deposits_are_capped() {
        let Some(date) = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).single() else {
            return;
        };
        let deposits: Vec<deposit::Model> = (1..=4)
            .map(|i| deposit::Model {
                id: i,
                username: "jdoe".to_string(),
                amount_cents: i * 500,
                created_at: date,
            })
            .collect();
        let text = recent_deposits(&deposits, 3);
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("  2024-03-01 €5.00\n"));
        assert!(!text.contains("€20.00"));
    }

    #[test]
    fn test_purchase_groups_render_totals() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).single();
        let Some(date) = date else {
            return;
        };
        let group = PurchaseGroup {
            date,
            lines: vec![PurchaseLine {
                username: "jdoe".to_string(),
                product: "Espresso".to_string(),
                quantity: 2,
                total: Money::from_cents(300),
                date,
                key: "k".to_string(),
            }],
        };
        let text = purchase_groups(&[group], true);
        assert!(text.starts_with("**2024-03-01 09:30** (€3.00)"));
        assert!(text.contains("2 × Espresso for €3.00 (jdoe)"));
    }
}
