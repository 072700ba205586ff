//! # Ingredient Commands
//!
//! The ingredient registry, plus `ingredients watch`: an interactive search
//! that reads one query per line and only searches once typing pauses.
//!
//! ## Watch Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stdin line ──► Debouncer::call(search) ──► (delay) ──► GET ?search=    │
//! │                                                               │         │
//! │                                                               ▼         │
//! │  stdout ◄──────────────── results channel ◄─────────── rendered lines   │
//! │                                                                         │
//! │  EOF ──► drain the channel until the last pending query has answered    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use clap::{Args, Subcommand};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use sapore_client::UserNotice;
use sapore_core::fields::{ingredient_form, parse_decimal, FormValues};
use sapore_core::{Ingredient, Unit};

use crate::error::CommandResult;
use crate::output::{clip, decimal, listing, or_dash, CommandOutput};
use crate::state::AppContext;

#[derive(Debug, Subcommand)]
pub enum IngredientCommand {
    /// List every ingredient
    List,
    /// Search ingredients by name
    Search { query: String },
    /// Search interactively, one query per input line
    Watch,
    /// Register an ingredient
    Create(IngredientArgs),
    /// Replace an ingredient's data
    Update {
        id: String,
        #[command(flatten)]
        ingredient: IngredientArgs,
    },
    /// Remove an ingredient no recipe uses
    Delete { id: String },
}

#[derive(Debug, Clone, Args)]
pub struct IngredientArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long, help = "mg, g, kg, ml, cl, L or un")]
    pub unit: Unit,

    #[arg(long, help = "Cost in reais per unit, e.g. 4,50")]
    pub unit_cost: String,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub supplier: Option<String>,
}

impl IngredientArgs {
    pub fn form_values(&self) -> FormValues {
        let mut values = FormValues::new();
        values.insert("name".into(), self.name.clone());
        values.insert("unit".into(), self.unit.symbol().into());
        values.insert("unitCost".into(), self.unit_cost.clone());
        if let Some(c) = &self.category {
            values.insert("category".into(), c.clone());
        }
        if let Some(s) = &self.supplier {
            values.insert("supplier".into(), s.clone());
        }
        values
    }

    pub fn into_ingredient(self, id: Option<String>) -> CommandResult<Ingredient> {
        ingredient_form().validate(&self.form_values())?;

        Ok(Ingredient {
            id,
            name: self.name.trim().to_string(),
            unit: self.unit,
            // validated above
            unit_cost: parse_decimal(&self.unit_cost).unwrap_or_default(),
            category: self.category.filter(|c| !c.trim().is_empty()),
            supplier: self.supplier.filter(|s| !s.trim().is_empty()),
        })
    }
}

fn row(i: &Ingredient) -> String {
    format!(
        "{:>6}  {:<32} R$ {} / {}",
        or_dash(i.id.as_deref()),
        clip(&i.name, 32),
        decimal(i.unit_cost),
        i.unit
    )
}

pub async fn run(ctx: &AppContext, command: IngredientCommand) -> CommandResult<CommandOutput> {
    ctx.require_user()?;

    match command {
        IngredientCommand::List => {
            let ingredients = ctx.client.list_ingredients().await?;
            CommandOutput::new(listing("Ingredientes", &ingredients, row), &ingredients)
        }
        IngredientCommand::Search { query } => {
            let ingredients = ctx.client.search_ingredients(&query).await?;
            CommandOutput::new(listing("Ingredientes", &ingredients, row), &ingredients)
        }
        IngredientCommand::Watch => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let searches = watch(ctx, stdin, &mut std::io::stdout()).await?;
            Ok(CommandOutput::message(format!("{} buscas realizadas.", searches)))
        }
        IngredientCommand::Create(args) => {
            let ingredient = args.into_ingredient(None)?;
            let created = ctx.client.create_ingredient(&ingredient).await?;
            let text = format!(
                "Ingrediente {} cadastrado ({}).",
                created.name,
                or_dash(created.id.as_deref())
            );
            CommandOutput::new(text, &created)
        }
        IngredientCommand::Update { id, ingredient } => {
            let ingredient = ingredient.into_ingredient(Some(id.clone()))?;
            let updated = ctx.client.update_ingredient(&id, &ingredient).await?;
            CommandOutput::new(format!("Ingrediente {} atualizado.", updated.name), &updated)
        }
        IngredientCommand::Delete { id } => {
            ctx.client.delete_ingredient(&id).await?;
            Ok(CommandOutput::message(format!("Ingrediente {} removido.", id)))
        }
    }
}

// =============================================================================
// Interactive Search
// =============================================================================

/// Runs the debounced search loop until `input` ends.
///
/// Returns how many searches actually reached the backend.
pub async fn watch<R, W>(ctx: &AppContext, input: R, out: &mut W) -> CommandResult<usize>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let mut lines = input.lines();
    let mut searches = 0usize;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(query) = line? else { break };
                let client = ctx.client.clone();
                let tx = tx.clone();
                debug!(query = %query, "Search scheduled");
                ctx.search.call(move || async move {
                    let text = match client.search_ingredients(&query).await {
                        Ok(found) => listing(&format!("\"{}\"", query.trim()), &found, row),
                        Err(e) => UserNotice::from_error(&e).to_string(),
                    };
                    let _ = tx.send(text);
                });
            }
            Some(text) = rx.recv() => {
                searches += 1;
                writeln!(out, "{}", text)?;
            }
        }
    }

    // The pending timer holds its own sender, so the channel stays open
    // until the last query has fired and answered
    drop(tx);
    while let Some(text) = rx.recv().await {
        searches += 1;
        writeln!(out, "{}", text)?;
    }
    if searches == 0 {
        warn!("Input ended before any search ran");
    }
    Ok(searches)
}
