//! # Console Commands Module
//!
//! One module per back-office screen.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs          ◄─── You are here (Command enum + dispatch)
//! ├── auth.rs         ◄─── login, logout, whoami
//! ├── customers.rs    ◄─── Customer registration
//! ├── products.rs     ◄─── Catalogue, photo upload, cost audit
//! ├── ingredients.rs  ◄─── Ingredient registry, debounced search
//! ├── orders.rs       ◄─── Orders, status changes, production queue
//! ├── expenses.rs     ◄─── Expense records
//! ├── pricing.rs      ◄─── Pricing board, simulate, commit, recipes
//! ├── report.rs       ◄─── Reports dashboard
//! ├── convert.rs      ◄─── Unit conversion
//! └── config.rs       ◄─── console.toml
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  $ sapore orders status 41 delivered                                    │
//! │         │                                                               │
//! │         │ (clap)                                                        │
//! │         ▼                                                               │
//! │  Command::Orders(OrderCommand::Status { id: "41", status: Delivered })  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  orders::run(&ctx, command, now)                                        │
//! │      -> CommandResult<CommandOutput>                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  text on stdout (or JSON with --json), notice on stderr on failure     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every command that talks to the backend checks for a live login first.

pub mod auth;
pub mod config;
pub mod convert;
pub mod customers;
pub mod expenses;
pub mod ingredients;
pub mod orders;
pub mod pricing;
pub mod products;
pub mod report;

use chrono::{DateTime, Utc};
use clap::Subcommand;

use sapore_core::fields::parse_decimal;

use crate::error::CommandResult;
use crate::output::CommandOutput;
use crate::state::AppContext;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and keep the session for later commands
    Login(auth::LoginArgs),
    /// Forget the stored session
    Logout,
    /// Show who is logged in
    Whoami,
    /// Customer registration
    #[command(subcommand)]
    Customers(customers::CustomerCommand),
    /// Product catalogue
    #[command(subcommand)]
    Products(products::ProductCommand),
    /// Ingredient registry
    #[command(subcommand)]
    Ingredients(ingredients::IngredientCommand),
    /// Orders and production queue
    #[command(subcommand)]
    Orders(orders::OrderCommand),
    /// Expenses
    #[command(subcommand)]
    Expenses(expenses::ExpenseCommand),
    /// Pricing board and recipes
    #[command(subcommand)]
    Pricing(pricing::PricingCommand),
    /// Reports dashboard
    Report(report::ReportArgs),
    /// Convert a quantity between units
    Convert(convert::ConvertArgs),
    /// Console configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Runs a command that needs the application context.
///
/// `config` is handled before the context exists, see [`crate::execute`].
pub async fn dispatch(ctx: &AppContext, command: Command, now: DateTime<Utc>) -> CommandResult<CommandOutput> {
    match command {
        Command::Login(args) => auth::login(ctx, args).await,
        Command::Logout => auth::logout(ctx),
        Command::Whoami => auth::whoami(ctx),
        Command::Customers(c) => customers::run(ctx, c).await,
        Command::Products(c) => products::run(ctx, c).await,
        Command::Ingredients(c) => ingredients::run(ctx, c).await,
        Command::Orders(c) => orders::run(ctx, c, now).await,
        Command::Expenses(c) => expenses::run(ctx, c, now).await,
        Command::Pricing(c) => pricing::run(ctx, c).await,
        Command::Report(args) => report::run(ctx, args, now).await,
        Command::Convert(args) => convert::run(&args),
        Command::Config(c) => config::run(&ctx.config, None, c),
    }
}

/// clap value parser for numbers typed either way ("12,5" or "12.5").
pub(crate) fn parse_number(s: &str) -> Result<f64, String> {
    parse_decimal(s).ok_or_else(|| format!("'{}' is not a number", s))
}
