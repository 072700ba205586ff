//! # Expense Commands

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};

use sapore_core::fields::{expense_form, parse_date, parse_decimal, FormValues};
use sapore_core::reports::{expense_summary, ReportWindow};
use sapore_core::{Expense, Money};

use crate::error::CommandResult;
use crate::output::{clip, listing, or_dash, CommandOutput};
use crate::state::AppContext;

#[derive(Debug, Subcommand)]
pub enum ExpenseCommand {
    /// List expenses, optionally only those inside a report window
    List {
        #[arg(long, help = "week, month or year")]
        window: Option<ReportWindow>,
    },
    /// Record an expense
    Create(ExpenseArgs),
    /// Replace an expense
    Update {
        id: String,
        #[command(flatten)]
        expense: ExpenseArgs,
    },
    /// Remove an expense
    Delete { id: String },
}

#[derive(Debug, Clone, Args)]
pub struct ExpenseArgs {
    #[arg(long)]
    pub description: String,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long, help = "Amount in reais, e.g. 1.234,56")]
    pub amount: String,

    #[arg(long, help = "YYYY-MM-DD or DD/MM/YYYY; today when omitted")]
    pub date: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

impl ExpenseArgs {
    pub fn form_values(&self, now: DateTime<Utc>) -> FormValues {
        let mut values = FormValues::new();
        values.insert("description".into(), self.description.clone());
        values.insert("amount".into(), self.amount.clone());
        values.insert(
            "date".into(),
            self.date
                .clone()
                .unwrap_or_else(|| now.date_naive().format("%Y-%m-%d").to_string()),
        );
        if let Some(c) = &self.category {
            values.insert("category".into(), c.clone());
        }
        if let Some(n) = &self.notes {
            values.insert("notes".into(), n.clone());
        }
        values
    }

    pub fn into_expense(self, id: Option<String>, now: DateTime<Utc>) -> CommandResult<Expense> {
        let values = self.form_values(now);
        expense_form().validate(&values)?;

        // Both parse: the form checked them
        let amount = parse_decimal(&self.amount)
            .map(Money::from_reais)
            .unwrap_or(Money::zero());
        let date = values
            .get("date")
            .and_then(|d| parse_date(d))
            .unwrap_or_else(|| now.date_naive());

        Ok(Expense {
            id,
            description: self.description.trim().to_string(),
            category: self.category.map(|c| c.trim().to_string()).unwrap_or_default(),
            amount,
            date,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
        })
    }
}

pub async fn run(ctx: &AppContext, command: ExpenseCommand, now: DateTime<Utc>) -> CommandResult<CommandOutput> {
    ctx.require_user()?;

    match command {
        ExpenseCommand::List { window } => {
            let mut expenses = ctx.client.list_expenses().await?;
            if let Some(window) = window {
                let since = window.threshold(now).date_naive();
                expenses.retain(|e| e.date >= since);
            }

            let mut text = listing("Despesas", &expenses, |e| {
                format!(
                    "{:>6}  {}  {:<32} {:<16} {}",
                    or_dash(e.id.as_deref()),
                    e.date.format("%d/%m/%Y"),
                    clip(&e.description, 32),
                    clip(&e.category, 16),
                    e.amount
                )
            });
            if let Some(window) = window {
                let summary = expense_summary(&expenses, window, now);
                text.push_str(&format!("\nTotal ({}): {}", window.label(), summary.total));
            }
            CommandOutput::new(text, &expenses)
        }
        ExpenseCommand::Create(args) => {
            let expense = args.into_expense(None, now)?;
            let created = ctx.client.create_expense(&expense).await?;
            let text = format!("Despesa {} registrada: {}.", created.description, created.amount);
            CommandOutput::new(text, &created)
        }
        ExpenseCommand::Update { id, expense } => {
            let expense = expense.into_expense(Some(id.clone()), now)?;
            let updated = ctx.client.update_expense(&id, &expense).await?;
            CommandOutput::new(format!("Despesa {} atualizada.", updated.description), &updated)
        }
        ExpenseCommand::Delete { id } => {
            ctx.client.delete_expense(&id).await?;
            Ok(CommandOutput::message(format!("Despesa {} removida.", id)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap()
    }

    fn args(amount: &str, date: Option<&str>) -> ExpenseArgs {
        ExpenseArgs {
            description: "Conta de luz".to_string(),
            category: None,
            amount: amount.to_string(),
            date: date.map(str::to_string),
            notes: None,
        }
    }

    #[test]
    fn test_into_expense() {
        let expense = args("R$ 1.234,56", Some("05/03/2024"))
            .into_expense(None, now())
            .unwrap();
        assert_eq!(expense.amount, Money::from_centavos(123_456));
        assert_eq!(expense.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(expense.category, "");
    }

    #[test]
    fn test_date_defaults_to_today() {
        let expense = args("10", None).into_expense(None, now()).unwrap();
        assert_eq!(expense.date, NaiveDate::from_ymd_opt(2024, 5, 20).unwrap());
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        assert!(args("-5,00", None).into_expense(None, now()).is_err());
        assert!(args("cinco", None).into_expense(None, now()).is_err());
    }
}
