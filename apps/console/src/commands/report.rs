//! # Reports Dashboard
//!
//! Fetches the four record lists concurrently and aggregates them locally.
//!
//! ```text
//! GET /orders ─┐
//! GET /customers ─┤
//! GET /products ─┼──► summarize(window, now) ──┐
//! GET /expenses ─┴──► expense_summary ─────────┴──► net result
//! ```

use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use std::fmt::Write;

use sapore_core::reports::{expense_summary, summarize, ExpenseSummary, ReportSummary, ReportWindow};
use sapore_core::{Money, OrderStatus};

use crate::error::CommandResult;
use crate::output::{or_dash, CommandOutput};
use crate::state::AppContext;

#[derive(Debug, Clone, Args)]
pub struct ReportArgs {
    #[arg(long, default_value = "month", help = "week, month or year")]
    pub window: ReportWindow,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Dashboard {
    summary: ReportSummary,
    expenses: ExpenseSummary,
    net_result: Money,
}

fn describe(d: &Dashboard) -> String {
    let s = &d.summary;
    let mut out = String::new();

    let _ = writeln!(out, "Relatório: {} (desde {})", s.window.label(), s.since.format("%d/%m/%Y"));
    let _ = writeln!(out, "Faturamento: {}", s.total_revenue);
    let _ = writeln!(out, "Despesas: {}", d.expenses.total);
    let _ = writeln!(out, "Resultado: {}", d.net_result);
    let _ = writeln!(out, "Pedidos: {}", s.order_count);
    for status in OrderStatus::ALL {
        let _ = writeln!(out, "  {:<12} {}", status.label(), s.count_for(status));
    }

    let _ = writeln!(
        out,
        "Melhor cliente: {}",
        or_dash(
            s.top_customer
                .as_ref()
                .map(|c| format!("{} ({} pedidos)", c.name, c.order_count))
        )
    );
    let _ = writeln!(
        out,
        "Mais vendido: {}",
        or_dash(s.top_product.as_ref().map(|p| format!("{} ({} un)", p.name, p.quantity)))
    );
    let _ = writeln!(
        out,
        "Menos vendido: {}",
        or_dash(s.least_product.as_ref().map(|p| format!("{} ({} un)", p.name, p.quantity)))
    );

    if !d.expenses.by_category.is_empty() {
        let _ = writeln!(out, "Despesas por categoria:");
        for c in &d.expenses.by_category {
            let _ = writeln!(out, "  {:<20} {}", c.category, c.total);
        }
    }

    if !s.monthly_revenue.is_empty() {
        let _ = writeln!(out, "Faturamento mensal:");
        for m in &s.monthly_revenue {
            let _ = writeln!(out, "  {}  {}", m.month, m.revenue);
        }
    }
    if !s.monthly_orders.is_empty() {
        let _ = writeln!(out, "Pedidos por mês:");
        for m in &s.monthly_orders {
            let _ = writeln!(out, "  {}  {}", m.month, m.count);
        }
    }

    out.trim_end().to_string()
}

pub async fn run(ctx: &AppContext, args: ReportArgs, now: DateTime<Utc>) -> CommandResult<CommandOutput> {
    ctx.require_user()?;

    let (orders, customers, products, expenses) = tokio::try_join!(
        ctx.client.list_orders(),
        ctx.client.list_customers(),
        ctx.client.list_products(),
        ctx.client.list_expenses(),
    )?;

    let summary = summarize(&orders, &customers, &products, args.window, now);
    let expenses = expense_summary(&expenses, args.window, now);
    let dashboard = Dashboard {
        net_result: summary.net_result(&expenses),
        summary,
        expenses,
    };

    CommandOutput::new(describe(&dashboard), &dashboard)
}
