//! # Reporting Aggregator
//!
//! Everything on the reports dashboard is derived here from records that
//! were already fetched. Nothing is cached: every window change reprocesses
//! the full lists.
//!
//! ## Aggregation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  orders ──► filter order_date >= window.threshold(now)                  │
//! │                 │                                                       │
//! │     ┌───────────┼──────────────┬──────────────┬───────────────┐         │
//! │     ▼           ▼              ▼              ▼               ▼         │
//! │  revenue    order count   top customer   top/least       monthly        │
//! │  (DELIVERED) (all)        (by # orders)  product (qty,   series         │
//! │                                           not CANCELLED)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ties
//! Rankings walk records in first-seen order and only replace the current
//! leader on a strictly better count, so on a tie the record seen first
//! keeps the title.
//!
//! ## Determinism
//! `now` is always a parameter. This crate never reads the clock.

use chrono::{DateTime, Datelike, Duration, Months, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Customer, Expense, Order, OrderStatus, Product};

/// Points kept in the monthly revenue series.
pub const MONTHLY_REVENUE_POINTS: usize = 6;

/// Points kept in the monthly order-count series.
pub const MONTHLY_ORDER_POINTS: usize = 12;

// =============================================================================
// Window
// =============================================================================

/// The period a report covers, counted back from "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ReportWindow {
    /// The last 7 days.
    LastWeek,
    /// The last calendar month.
    #[default]
    LastMonth,
    /// The last 12 calendar months.
    LastYear,
}

impl ReportWindow {
    /// Earliest order date included in the window.
    ///
    /// ```rust
    /// use chrono::{TimeZone, Utc};
    /// use sapore_core::reports::ReportWindow;
    ///
    /// let now = Utc.with_ymd_and_hms(2026, 3, 31, 12, 0, 0).unwrap();
    /// // One calendar month back from 31 March clamps to 28 February
    /// assert_eq!(
    ///     ReportWindow::LastMonth.threshold(now),
    ///     Utc.with_ymd_and_hms(2026, 2, 28, 12, 0, 0).unwrap()
    /// );
    /// ```
    pub fn threshold(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let earliest = match self {
            ReportWindow::LastWeek => now.checked_sub_signed(Duration::days(7)),
            ReportWindow::LastMonth => now.checked_sub_months(Months::new(1)),
            ReportWindow::LastYear => now.checked_sub_months(Months::new(12)),
        };
        earliest.unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Portuguese label for the window selector.
    pub const fn label(&self) -> &'static str {
        match self {
            ReportWindow::LastWeek => "Última semana",
            ReportWindow::LastMonth => "Último mês",
            ReportWindow::LastYear => "Último ano",
        }
    }
}

impl fmt::Display for ReportWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReportWindow {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" | "last_week" | "semana" => Ok(ReportWindow::LastWeek),
            "month" | "last_month" | "mes" | "mês" => Ok(ReportWindow::LastMonth),
            "year" | "last_year" | "ano" => Ok(ReportWindow::LastYear),
            _ => Err(ValidationError::NotAllowed {
                field: "window".to_string(),
                allowed: vec!["week".to_string(), "month".to_string(), "year".to_string()],
            }),
        }
    }
}

// =============================================================================
// Summary Records
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRanking {
    pub customer_id: String,
    pub name: String,
    pub order_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductRanking {
    pub product_id: String,
    pub name: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: usize,
}

/// One point of a monthly series. `month` is `YYYY-MM`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenue {
    pub month: String,
    #[ts(type = "number")]
    pub revenue: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyOrders {
    pub month: String,
    pub count: usize,
}

/// The full dashboard for one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub window: ReportWindow,

    #[ts(as = "String")]
    pub since: DateTime<Utc>,

    /// Sum of delivered orders' totals.
    #[ts(type = "number")]
    pub total_revenue: Money,

    /// Orders in the window, any status.
    pub order_count: usize,

    pub top_customer: Option<CustomerRanking>,
    pub top_product: Option<ProductRanking>,
    pub least_product: Option<ProductRanking>,

    /// One entry per status, in [`OrderStatus::ALL`] order.
    pub status_counts: Vec<StatusCount>,

    /// Up to the last 6 months with delivered orders, oldest first.
    pub monthly_revenue: Vec<MonthlyRevenue>,

    /// Up to the last 12 months with orders, oldest first.
    pub monthly_orders: Vec<MonthlyOrders>,
}

impl ReportSummary {
    /// Revenue minus expenses for the same window.
    pub fn net_result(&self, expenses: &ExpenseSummary) -> Money {
        self.total_revenue - expenses.total
    }

    pub fn count_for(&self, status: OrderStatus) -> usize {
        self.status_counts
            .iter()
            .find(|s| s.status == status)
            .map(|s| s.count)
            .unwrap_or(0)
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Builds the dashboard for `window` as of `now`.
///
/// `customers` and `products` are only used to resolve display names;
/// rankings are keyed by the ids on the orders.
pub fn summarize(
    orders: &[Order],
    customers: &[Customer],
    products: &[Product],
    window: ReportWindow,
    now: DateTime<Utc>,
) -> ReportSummary {
    let since = window.threshold(now);
    let in_window: Vec<&Order> = orders.iter().filter(|o| o.order_date >= since).collect();

    let total_revenue = in_window
        .iter()
        .filter(|o| o.is_revenue())
        .map(|o| o.total)
        .sum();

    let status_counts = OrderStatus::ALL
        .iter()
        .map(|&status| StatusCount {
            status,
            count: in_window.iter().filter(|o| o.status == status).count(),
        })
        .collect();

    ReportSummary {
        window,
        since,
        total_revenue,
        order_count: in_window.len(),
        top_customer: top_customer(&in_window, customers),
        top_product: product_ranking(&in_window, products, |candidate, best| candidate > best),
        least_product: product_ranking(&in_window, products, |candidate, best| candidate < best),
        status_counts,
        monthly_revenue: monthly_revenue(&in_window),
        monthly_orders: monthly_orders(&in_window),
    }
}

fn top_customer(orders: &[&Order], customers: &[Customer]) -> Option<CustomerRanking> {
    let mut counts: IndexMap<&str, (usize, Option<&str>)> = IndexMap::new();
    for order in orders {
        let entry = counts
            .entry(order.customer_id.as_str())
            .or_insert((0, order.customer_name.as_deref()));
        entry.0 += 1;
    }

    let mut best: Option<(&str, usize, Option<&str>)> = None;
    for (&id, &(count, fallback_name)) in &counts {
        if best.map_or(true, |(_, best_count, _)| count > best_count) {
            best = Some((id, count, fallback_name));
        }
    }

    best.map(|(id, order_count, fallback_name)| CustomerRanking {
        customer_id: id.to_string(),
        name: customers
            .iter()
            .find(|c| c.id.as_deref() == Some(id))
            .map(|c| c.name.as_str())
            .or(fallback_name)
            .unwrap_or(id)
            .to_string(),
        order_count,
    })
}

/// Walks per-product quantities in first-seen order, replacing the leader
/// only when `beats(candidate, leader)` holds.
fn product_ranking(
    orders: &[&Order],
    products: &[Product],
    beats: impl Fn(i64, i64) -> bool,
) -> Option<ProductRanking> {
    let mut quantities: IndexMap<&str, (i64, Option<&str>)> = IndexMap::new();
    for order in orders.iter().filter(|o| o.status != OrderStatus::Cancelled) {
        for item in &order.items {
            let entry = quantities
                .entry(item.product_id.as_str())
                .or_insert((0, item.product_name.as_deref()));
            entry.0 += item.quantity;
        }
    }

    let mut leader: Option<(&str, i64, Option<&str>)> = None;
    for (&id, &(quantity, fallback_name)) in &quantities {
        if leader.map_or(true, |(_, best, _)| beats(quantity, best)) {
            leader = Some((id, quantity, fallback_name));
        }
    }

    leader.map(|(id, quantity, fallback_name)| ProductRanking {
        product_id: id.to_string(),
        name: products
            .iter()
            .find(|p| p.id.as_deref() == Some(id))
            .map(|p| p.name.as_str())
            .or(fallback_name)
            .unwrap_or(id)
            .to_string(),
        quantity,
    })
}

fn month_key(date: DateTime<Utc>) -> (i32, u32) {
    (date.year(), date.month())
}

fn month_label((year, month): (i32, u32)) -> String {
    format!("{:04}-{:02}", year, month)
}

/// Keeps the last `n` entries of an ordered map, oldest first.
fn last_points<V>(grouped: BTreeMap<(i32, u32), V>, n: usize) -> Vec<((i32, u32), V)> {
    let skip = grouped.len().saturating_sub(n);
    grouped.into_iter().skip(skip).collect()
}

fn monthly_revenue(orders: &[&Order]) -> Vec<MonthlyRevenue> {
    let mut grouped: BTreeMap<(i32, u32), Money> = BTreeMap::new();
    for order in orders.iter().filter(|o| o.is_revenue()) {
        *grouped.entry(month_key(order.order_date)).or_default() += order.total;
    }

    last_points(grouped, MONTHLY_REVENUE_POINTS)
        .into_iter()
        .map(|(key, revenue)| MonthlyRevenue {
            month: month_label(key),
            revenue,
        })
        .collect()
}

fn monthly_orders(orders: &[&Order]) -> Vec<MonthlyOrders> {
    let mut grouped: BTreeMap<(i32, u32), usize> = BTreeMap::new();
    for order in orders {
        *grouped.entry(month_key(order.order_date)).or_default() += 1;
    }

    last_points(grouped, MONTHLY_ORDER_POINTS)
        .into_iter()
        .map(|(key, count)| MonthlyOrders {
            month: month_label(key),
            count,
        })
        .collect()
}

// =============================================================================
// Expenses
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    #[ts(type = "number")]
    pub total: Money,
}

/// Expenses in a window, per category (first-seen order) and overall.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSummary {
    #[ts(type = "number")]
    pub total: Money,
    pub by_category: Vec<CategoryTotal>,
}

/// Totals the expenses dated on or after the window's threshold day.
///
/// Expenses without a category are grouped under "Outros".
pub fn expense_summary(expenses: &[Expense], window: ReportWindow, now: DateTime<Utc>) -> ExpenseSummary {
    let since = window.threshold(now).date_naive();

    let mut by_category: IndexMap<&str, Money> = IndexMap::new();
    for expense in expenses.iter().filter(|e| e.date >= since) {
        let category = match expense.category.trim() {
            "" => "Outros",
            c => c,
        };
        *by_category.entry(category).or_default() += expense.amount;
    }

    ExpenseSummary {
        total: by_category.values().sum(),
        by_category: by_category
            .into_iter()
            .map(|(category, total)| CategoryTotal {
                category: category.to_string(),
                total,
            })
            .collect(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CustomerModality, OrderItem};
    use chrono::{NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap()
    }

    fn order(customer: &str, status: OrderStatus, date: DateTime<Utc>, items: &[(&str, i64)]) -> Order {
        let items: Vec<OrderItem> = items
            .iter()
            .map(|&(pid, qty)| OrderItem::new(pid, qty, Money::from_centavos(500)))
            .collect();
        Order {
            id: None,
            customer_id: customer.to_string(),
            customer_name: None,
            total: items.iter().map(|i| i.subtotal).sum(),
            items,
            status,
            order_date: date,
            delivery_date: None,
            notes: None,
        }
    }

    fn days_ago(days: i64) -> DateTime<Utc> {
        now() - Duration::days(days)
    }

    fn customer(id: &str, name: &str) -> Customer {
        Customer {
            id: Some(id.to_string()),
            name: name.to_string(),
            document: String::new(),
            phone: None,
            email: None,
            address: None,
            modality: CustomerModality::Retail,
        }
    }

    #[test]
    fn test_window_thresholds() {
        assert_eq!(ReportWindow::LastWeek.threshold(now()), days_ago(7));
        assert_eq!(
            ReportWindow::LastMonth.threshold(now()),
            Utc.with_ymd_and_hms(2026, 9, 15, 12, 0, 0).unwrap()
        );
        assert_eq!(
            ReportWindow::LastYear.threshold(now()),
            Utc.with_ymd_and_hms(2025, 10, 15, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_revenue_counts_only_delivered_in_window() {
        let orders = vec![
            order("c1", OrderStatus::Delivered, days_ago(1), &[("p1", 2)]),
            order("c1", OrderStatus::Pending, days_ago(2), &[("p1", 4)]),
            order("c2", OrderStatus::Delivered, days_ago(30), &[("p1", 10)]),
            // exactly on the threshold is inside
            order("c2", OrderStatus::Delivered, days_ago(7), &[("p2", 1)]),
        ];

        let summary = summarize(&orders, &[], &[], ReportWindow::LastWeek, now());
        assert_eq!(summary.order_count, 3);
        assert_eq!(summary.total_revenue, Money::from_centavos(1500));
    }

    #[test]
    fn test_status_counts_always_list_every_status() {
        let orders = vec![order("c1", OrderStatus::Delivered, days_ago(1), &[("p1", 1)])];
        let summary = summarize(&orders, &[], &[], ReportWindow::LastWeek, now());

        assert_eq!(summary.status_counts.len(), 4);
        assert_eq!(summary.count_for(OrderStatus::Delivered), 1);
        assert_eq!(summary.count_for(OrderStatus::Cancelled), 0);

        let empty = summarize(&[], &[], &[], ReportWindow::LastWeek, now());
        assert_eq!(empty.status_counts.len(), 4);
        assert!(empty.top_customer.is_none());
        assert!(empty.top_product.is_none());
    }

    #[test]
    fn test_top_customer_tie_keeps_first_seen() {
        let orders = vec![
            order("c2", OrderStatus::Pending, days_ago(1), &[("p1", 1)]),
            order("c1", OrderStatus::Pending, days_ago(1), &[("p1", 1)]),
            order("c1", OrderStatus::Pending, days_ago(1), &[("p1", 1)]),
            order("c2", OrderStatus::Pending, days_ago(1), &[("p1", 1)]),
        ];
        let customers = vec![customer("c1", "Ana"), customer("c2", "Bruno")];

        let top = summarize(&orders, &customers, &[], ReportWindow::LastWeek, now())
            .top_customer
            .unwrap();
        assert_eq!(top.customer_id, "c2");
        assert_eq!(top.name, "Bruno");
        assert_eq!(top.order_count, 2);
    }

    #[test]
    fn test_product_rankings_skip_cancelled() {
        let orders = vec![
            order("c1", OrderStatus::Delivered, days_ago(1), &[("p1", 5), ("p2", 3)]),
            order("c1", OrderStatus::Pending, days_ago(1), &[("p3", 3)]),
            order("c1", OrderStatus::Cancelled, days_ago(1), &[("p2", 50), ("p4", 1)]),
        ];
        let mut brigadeiro = Product::new("Brigadeiro", "Doces");
        brigadeiro.id = Some("p1".to_string());

        let summary = summarize(&orders, &[], &[brigadeiro], ReportWindow::LastWeek, now());
        let top = summary.top_product.unwrap();
        assert_eq!(top.name, "Brigadeiro");
        assert_eq!(top.quantity, 5);

        // p2 and p3 tie at 3; p2 was seen first. p4 only appears cancelled.
        let least = summary.least_product.unwrap();
        assert_eq!(least.product_id, "p2");
        assert_eq!(least.name, "p2");
    }

    #[test]
    fn test_monthly_revenue_keeps_last_six_chronologically() {
        let orders: Vec<Order> = (0..7)
            .rev()
            .map(|months_back| {
                let date = now()
                    .checked_sub_months(Months::new(months_back))
                    .unwrap();
                order("c1", OrderStatus::Delivered, date, &[("p1", 1)])
            })
            .collect();

        let summary = summarize(&orders, &[], &[], ReportWindow::LastYear, now());
        let months: Vec<&str> = summary.monthly_revenue.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(
            months,
            vec!["2026-05", "2026-06", "2026-07", "2026-08", "2026-09", "2026-10"]
        );
        assert_eq!(summary.monthly_orders.len(), 7);
        assert_eq!(summary.monthly_orders[0].month, "2026-04");
    }

    #[test]
    fn test_expense_summary_and_net_result() {
        let expense = |category: &str, centavos: i64, date: NaiveDate| Expense {
            id: None,
            description: "x".to_string(),
            category: category.to_string(),
            amount: Money::from_centavos(centavos),
            date,
            notes: None,
        };
        let expenses = vec![
            expense("Embalagens", 1000, NaiveDate::from_ymd_opt(2026, 10, 10).unwrap()),
            expense("", 200, NaiveDate::from_ymd_opt(2026, 10, 12).unwrap()),
            expense("Embalagens", 500, NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()),
            expense("Gás", 9999, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()),
        ];

        let summary = expense_summary(&expenses, ReportWindow::LastWeek, now());
        assert_eq!(summary.total, Money::from_centavos(1700));
        assert_eq!(summary.by_category[0].category, "Embalagens");
        assert_eq!(summary.by_category[0].total, Money::from_centavos(1500));
        assert_eq!(summary.by_category[1].category, "Outros");

        let orders = vec![order("c1", OrderStatus::Delivered, days_ago(1), &[("p1", 4)])];
        let report = summarize(&orders, &[], &[], ReportWindow::LastWeek, now());
        assert_eq!(report.net_result(&summary), Money::from_centavos(300));
    }

    #[test]
    fn test_window_parsing() {
        assert_eq!("semana".parse::<ReportWindow>().unwrap(), ReportWindow::LastWeek);
        assert_eq!("YEAR".parse::<ReportWindow>().unwrap(), ReportWindow::LastYear);
        assert!("decade".parse::<ReportWindow>().is_err());
    }
}
