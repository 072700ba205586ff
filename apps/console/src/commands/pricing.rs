//! # Pricing Commands
//!
//! The pricing screen: two lists, a simulator and the recipe editor.
//!
//! ## Simulate, then Commit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sapore pricing simulate 12 --markup 120                                │
//! │     └── POST /pricing/products/12/simulate  { markupPercent: 120, .. }  │
//! │         prints suggested price, profit, margin                          │
//! │                                                                         │
//! │  sapore pricing commit 12 --markup 120                                  │
//! │     ├── refresh board (pending + priced)                                │
//! │     ├── simulate again with the same inputs                             │
//! │     ├── PricingBoard::commit  ──► product moves to priced at once       │
//! │     └── await the background refetch before printing the lists         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The strategy decides which percentage is sent: `markup` sends only
//! `markupPercent`, `margin` only `profitPercent`.

use clap::{Args, Subcommand};
use std::fmt::Write;
use tracing::warn;

use sapore_client::endpoints::pricing::RecipeLineInput;
use sapore_client::BoardLists;
use sapore_core::pricing::{CommitRequest, PricingInputs, PricingStrategy, SimulationRequest, SimulationResult};
use sapore_core::{Product, Unit};

use super::parse_number;
use crate::error::CommandResult;
use crate::output::{clip, decimal, or_dash, CommandOutput};
use crate::state::AppContext;

#[derive(Debug, Subcommand)]
pub enum PricingCommand {
    /// Show products still to price and products already priced
    Board,
    /// Products not priced yet
    Pending,
    /// Products with a committed price
    Priced,
    /// Ask the backend for a price without saving it
    Simulate {
        id: String,
        #[command(flatten)]
        inputs: PricingArgs,
    },
    /// Simulate and save the resulting price
    Commit {
        id: String,
        #[command(flatten)]
        inputs: PricingArgs,
    },
    /// Add an ingredient to a product's recipe
    AddIngredient {
        id: String,
        #[arg(long)]
        ingredient: String,
        #[arg(long, value_parser = parse_number)]
        quantity: f64,
        #[arg(long)]
        unit: Unit,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Remove a recipe line from a product
    RemoveIngredient { id: String, line: String },
}

#[derive(Debug, Clone, Args)]
pub struct PricingArgs {
    #[arg(long, default_value = "markup", help = "markup or margin")]
    pub strategy: PricingStrategy,

    #[arg(long, value_parser = parse_number, help = "Markup over cost, in percent")]
    pub markup: Option<f64>,

    #[arg(long, value_parser = parse_number, help = "Target profit margin, in percent")]
    pub margin: Option<f64>,

    #[arg(long, value_parser = parse_number, default_value = "0")]
    pub expense: f64,

    #[arg(long, value_parser = parse_number, default_value = "0")]
    pub tax: f64,

    #[arg(long, value_parser = parse_number, default_value = "0")]
    pub min_profit: f64,
}

impl PricingArgs {
    pub fn request(&self) -> CommandResult<SimulationRequest> {
        let inputs = PricingInputs {
            strategy: self.strategy,
            markup_percent: self.markup,
            margin_percent: self.margin,
            expense_percent: self.expense,
            tax_percent: self.tax,
            minimum_profit_percent: self.min_profit,
        };
        Ok(SimulationRequest::build(&inputs)?)
    }
}

fn describe_result(product_id: &str, strategy: PricingStrategy, r: &SimulationResult) -> String {
    let mut out = format!(
        "Produto {} ({})\nCusto dos ingredientes: R$ {}\nCusto por unidade: R$ {}\nPreço sugerido: {}\nLucro por unidade: {}\nMargem: {}%  Markup: {}%",
        product_id,
        strategy,
        decimal(r.ingredient_cost),
        decimal(r.cost_per_unit),
        r.suggested_price,
        r.unit_profit,
        decimal(r.profit_margin),
        decimal(r.markup)
    );
    if r.is_loss() {
        out.push_str("\nAtenção: o preço sugerido dá prejuízo.");
    }
    out
}

fn product_row(p: &Product) -> String {
    format!(
        "{:>6}  {:<32} custo {:<14} venda {}",
        or_dash(p.id.as_deref()),
        clip(&p.name, 32),
        or_dash(p.cost_price),
        or_dash(p.sale_price)
    )
}

fn describe_board(lists: &BoardLists) -> String {
    let mut out = String::new();
    for (title, products) in [("A precificar", &lists.pending), ("Precificados", &lists.priced)] {
        let _ = writeln!(out, "{} ({})", title, products.len());
        for p in products.iter() {
            let _ = writeln!(out, "  {}", product_row(p));
        }
    }
    out.trim_end().to_string()
}

pub async fn run(ctx: &AppContext, command: PricingCommand) -> CommandResult<CommandOutput> {
    ctx.require_user()?;

    match command {
        PricingCommand::Board => {
            ctx.board.refresh(&ctx.client).await?;
            let lists = ctx.board.snapshot().await;
            CommandOutput::new(
                describe_board(&lists),
                &serde_json::json!({ "pending": lists.pending, "priced": lists.priced }),
            )
        }
        PricingCommand::Pending => {
            let products = ctx.client.pending_products().await?;
            let text = crate::output::listing("A precificar", &products, product_row);
            CommandOutput::new(text, &products)
        }
        PricingCommand::Priced => {
            let products = ctx.client.priced_products().await?;
            let text = crate::output::listing("Precificados", &products, product_row);
            CommandOutput::new(text, &products)
        }
        PricingCommand::Simulate { id, inputs } => {
            let request = inputs.request()?;
            let result = ctx.client.simulate_pricing(&id, &request).await?;
            CommandOutput::new(describe_result(&id, request.strategy(), &result), &result)
        }
        PricingCommand::Commit { id, inputs } => commit(ctx, &id, &inputs).await,
        PricingCommand::AddIngredient {
            id,
            ingredient,
            quantity,
            unit,
            notes,
        } => {
            let line = RecipeLineInput {
                ingredient_id: ingredient,
                quantity,
                unit,
                notes: notes.filter(|n| !n.trim().is_empty()),
            };
            let product = ctx.client.add_recipe_line(&id, &line).await?;
            let text = format!(
                "{} agora tem {} ingredientes.",
                product.name,
                product.ingredients.len()
            );
            CommandOutput::new(text, &product)
        }
        PricingCommand::RemoveIngredient { id, line } => {
            ctx.client.remove_recipe_line(&id, &line).await?;
            Ok(CommandOutput::message(format!(
                "Item {} removido da receita do produto {}.",
                line, id
            )))
        }
    }
}

/// Simulates with `inputs` and commits the result through the board.
pub async fn commit(ctx: &AppContext, id: &str, inputs: &PricingArgs) -> CommandResult<CommandOutput> {
    let request = inputs.request()?;

    let (refreshed, result) = tokio::join!(
        ctx.board.refresh(&ctx.client),
        ctx.client.simulate_pricing(id, &request)
    );
    if let Err(e) = refreshed {
        warn!(error = %e, "Pricing board could not be loaded before commit");
    }
    let result = result?;

    let commit = CommitRequest::new(&request, &result);
    let refetch = ctx.board.commit(&ctx.client, id, &commit).await?;

    let mut text = describe_result(id, request.strategy(), &result);
    text.push_str("\nPreço salvo.");

    // The product is already on the priced list; wait for the server's view
    match refetch.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "Showing lists from before the refetch"),
        Err(e) => warn!(error = %e, "Pricing board refetch task failed"),
    }
    let lists = ctx.board.snapshot().await;
    text.push('\n');
    text.push_str(&describe_board(&lists));

    CommandOutput::new(
        text,
        &serde_json::json!({
            "commit": commit,
            "pending": lists.pending,
            "priced": lists.priced,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(strategy: PricingStrategy) -> PricingArgs {
        PricingArgs {
            strategy,
            markup: Some(120.0),
            margin: None,
            expense: 5.0,
            tax: 0.0,
            min_profit: 0.0,
        }
    }

    #[test]
    fn test_markup_request() {
        let request = args(PricingStrategy::Markup).request().unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["markupPercent"], 120.0);
        assert!(json.get("profitPercent").is_none());
    }

    #[test]
    fn test_margin_without_percentage_is_rejected() {
        let err = args(PricingStrategy::Margin).request().unwrap_err();
        assert!(err.message.contains("profitPercent"), "{}", err.message);
    }
}
