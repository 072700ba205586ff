//! # Product Commands
//!
//! Catalogue maintenance. Prices are not set here; see `pricing`.
//!
//! `products audit` recomputes a product's recipe cost locally and lists the
//! lines whose stored cost disagrees. It never writes anything back.

use clap::{Args, Subcommand};
use std::fmt::Write;
use std::path::PathBuf;

use sapore_client::photo::encode_photo;
use sapore_core::costing::CostAudit;
use sapore_core::fields::{parse_decimal, product_form, FormValues};
use sapore_core::Product;

use crate::error::CommandResult;
use crate::output::{clip, decimal, listing, or_dash, CommandOutput};
use crate::state::AppContext;

#[derive(Debug, Subcommand)]
pub enum ProductCommand {
    /// List products, optionally from one category
    List {
        #[arg(long)]
        category: Option<String>,
    },
    /// Show a product with its recipe
    Show { id: String },
    /// Add a product to the catalogue
    Create(ProductArgs),
    /// Change a product's catalogue data, keeping its price and recipe
    Update {
        id: String,
        #[command(flatten)]
        product: ProductArgs,
    },
    /// Remove a product
    Delete { id: String },
    /// Recompute the recipe cost and report stored-cost discrepancies
    Audit { id: String },
}

#[derive(Debug, Clone, Args)]
pub struct ProductArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub category: String,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, help = "Weight in grams")]
    pub weight: Option<String>,

    #[arg(long = "yield", help = "Units per batch")]
    pub yield_units: Option<String>,

    #[arg(long, help = "Image file (png, jpg, jpeg, webp, gif)")]
    pub photo: Option<PathBuf>,
}

impl ProductArgs {
    pub fn form_values(&self) -> FormValues {
        let mut values = FormValues::new();
        values.insert("name".into(), self.name.clone());
        values.insert("category".into(), self.category.clone());
        if let Some(d) = &self.description {
            values.insert("description".into(), d.clone());
        }
        if let Some(w) = &self.weight {
            values.insert("weight".into(), w.clone());
        }
        if let Some(y) = &self.yield_units {
            values.insert("yield".into(), y.clone());
        }
        if let Some(p) = &self.photo {
            values.insert("photo".into(), p.display().to_string());
        }
        values
    }

    /// Validates and writes the catalogue fields onto `product`.
    pub fn apply_to(&self, product: &mut Product) -> CommandResult<()> {
        product_form().validate(&self.form_values())?;

        product.name = self.name.trim().to_string();
        product.category = self.category.trim().to_string();
        if let Some(d) = &self.description {
            product.description = Some(d.trim().to_string()).filter(|d| !d.is_empty());
        }
        if let Some(w) = self.weight.as_deref().and_then(parse_decimal) {
            product.weight = Some(w);
        }
        if let Some(y) = self.yield_units.as_deref().and_then(parse_decimal) {
            product.yield_units = Some(y);
        }
        if let Some(path) = &self.photo {
            product.photo = Some(encode_photo(path)?);
        }
        Ok(())
    }
}

fn describe(p: &Product) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", p.name, p.category);
    if let Some(d) = &p.description {
        let _ = writeln!(out, "{}", d);
    }
    let _ = writeln!(
        out,
        "Peso: {} g  Rendimento: {} un",
        or_dash(p.weight.map(decimal)),
        or_dash(p.yield_units.map(decimal))
    );
    let _ = writeln!(
        out,
        "Custo: {}  Venda: {}  Markup: {}  Lucro: {}",
        or_dash(p.cost_price),
        or_dash(p.sale_price),
        or_dash(p.markup_percent),
        or_dash(p.profit_percent)
    );
    let _ = writeln!(out, "Foto: {}", if p.photo.is_some() { "sim" } else { "não" });

    let _ = write!(out, "Receita ({} itens)", p.ingredients.len());
    for line in &p.ingredients {
        let _ = write!(
            out,
            "\n  [{}] {} {} {}  R$ {}",
            or_dash(line.id.as_deref()),
            decimal(line.quantity),
            line.unit,
            line.ingredient.name,
            decimal(line.total_cost)
        );
    }
    out
}

fn describe_audit(product: &Product, audit: &CostAudit) -> String {
    let mut out = format!(
        "{}\nCusto dos ingredientes: R$ {}\nCusto por unidade: R$ {}",
        product.name,
        decimal(audit.ingredient_cost),
        decimal(audit.cost_per_unit)
    );
    if audit.is_consistent() {
        out.push_str("\nCustos registrados conferem.");
    }
    for d in &audit.discrepancies {
        let _ = write!(
            out,
            "\n  {}: calculado R$ {}, registrado R$ {} (diferença {})",
            d.ingredient,
            decimal(d.computed),
            decimal(d.stored),
            decimal(d.difference())
        );
    }
    out
}

pub async fn run(ctx: &AppContext, command: ProductCommand) -> CommandResult<CommandOutput> {
    ctx.require_user()?;

    match command {
        ProductCommand::List { category } => {
            let mut products = ctx.client.list_products().await?;
            if let Some(category) = category {
                products.retain(|p| p.category.eq_ignore_ascii_case(category.trim()));
            }
            let text = listing("Produtos", &products, |p| {
                format!(
                    "{:>6}  {:<32} {:<16} {}",
                    or_dash(p.id.as_deref()),
                    clip(&p.name, 32),
                    clip(&p.category, 16),
                    or_dash(p.sale_price)
                )
            });
            CommandOutput::new(text, &products)
        }
        ProductCommand::Show { id } => {
            let product = ctx.client.get_product(&id).await?;
            CommandOutput::new(describe(&product), &product)
        }
        ProductCommand::Create(args) => {
            let mut product = Product::new(args.name.clone(), args.category.clone());
            args.apply_to(&mut product)?;
            let created = ctx.client.create_product(&product).await?;
            let text = format!(
                "Produto {} cadastrado ({}).",
                created.name,
                or_dash(created.id.as_deref())
            );
            CommandOutput::new(text, &created)
        }
        ProductCommand::Update { id, product: args } => {
            let mut product = ctx.client.get_product(&id).await?;
            args.apply_to(&mut product)?;
            let updated = ctx.client.update_product(&id, &product).await?;
            CommandOutput::new(format!("Produto {} atualizado.", updated.name), &updated)
        }
        ProductCommand::Delete { id } => {
            ctx.client.delete_product(&id).await?;
            Ok(CommandOutput::message(format!("Produto {} removido.", id)))
        }
        ProductCommand::Audit { id } => {
            let product = ctx.client.get_product(&id).await?;
            let audit = CostAudit::of(&product);
            CommandOutput::new(describe_audit(&product, &audit), &audit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sapore_core::{Ingredient, ProductIngredient, Unit};

    fn args() -> ProductArgs {
        ProductArgs {
            name: " Bolo de cenoura ".to_string(),
            category: "Bolos".to_string(),
            description: None,
            weight: Some("1.200,5".to_string()),
            yield_units: Some("12".to_string()),
            photo: None,
        }
    }

    #[test]
    fn test_apply_to_parses_brazilian_numbers() {
        let mut product = Product::new("", "");
        args().apply_to(&mut product).unwrap();
        assert_eq!(product.name, "Bolo de cenoura");
        assert_eq!(product.weight, Some(1200.5));
        assert_eq!(product.yield_units, Some(12.0));
    }

    #[test]
    fn test_zero_yield_is_rejected() {
        let mut a = args();
        a.yield_units = Some("0".to_string());
        assert!(a.apply_to(&mut Product::new("", "")).is_err());
    }

    #[test]
    fn test_photo_is_encoded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bolo.png");
        std::fs::write(&path, b"abc").unwrap();

        let mut a = args();
        a.photo = Some(path);
        let mut product = Product::new("", "");
        a.apply_to(&mut product).unwrap();
        assert_eq!(product.photo.as_deref(), Some("data:image/png;base64,YWJj"));
    }

    #[test]
    fn test_audit_text_lists_discrepancies() {
        let mut product = Product::new("Bolo", "Bolos");
        product.ingredients.push(ProductIngredient {
            id: Some("1".to_string()),
            ingredient: Ingredient {
                id: Some("10".to_string()),
                name: "Farinha".to_string(),
                unit: Unit::Kilogram,
                unit_cost: 4.5,
                category: None,
                supplier: None,
            },
            quantity: 500.0,
            unit: Unit::Gram,
            total_cost: 3.0,
            notes: None,
        });

        let audit = CostAudit::of(&product);
        let text = describe_audit(&product, &audit);
        assert!(text.contains("Farinha: calculado R$ 2,25, registrado R$ 3"), "{}", text);
    }
}
