//! # Order Commands
//!
//! Orders are assembled locally with an [`OrderDraft`] from the fetched
//! customer and product records, then sent whole.
//!
//! ```text
//! --customer 7 --item 3=12 --item 5=2
//!        │
//!        ▼
//! GET /customers/7  +  GET /products      (concurrently)
//!        │
//!        ▼
//! OrderDraft::new(customer)
//!   .add_product(product 3, 12)   ── unpriced product? ──► refused
//!   .add_product(product 5, 2)
//!   .build(now)                   ── no items? ──► refused
//!        │
//!        ▼
//! POST /orders
//! ```

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use std::fmt::Write;
use std::str::FromStr;

use sapore_core::fields::parse_date;
use sapore_core::priority::production_queue;
use sapore_core::{Order, OrderDraft, OrderStatus, ValidationError};

use crate::error::{CommandError, CommandResult};
use crate::output::{clip, listing, or_dash, CommandOutput};
use crate::state::AppContext;

#[derive(Debug, Subcommand)]
pub enum OrderCommand {
    /// List orders, optionally with one status
    List {
        #[arg(long)]
        status: Option<OrderStatus>,
    },
    /// Show one order with its items
    Show { id: String },
    /// Place an order
    Create(OrderArgs),
    /// Move an order to another status
    Status { id: String, status: OrderStatus },
    /// Remove an order
    Delete { id: String },
    /// Open orders ranked by production priority
    Queue,
}

/// One `--item PRODUCT=QUANTITY` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    pub product_id: String,
    pub quantity: i64,
}

impl FromStr for ItemSpec {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidFormat {
            field: "item".to_string(),
            reason: format!("expected PRODUCT=QUANTITY, got '{}'", s),
        };

        let (product_id, quantity) = s.split_once('=').ok_or_else(invalid)?;
        let product_id = product_id.trim();
        if product_id.is_empty() {
            return Err(invalid());
        }
        let quantity = quantity.trim().parse::<i64>().map_err(|_| invalid())?;

        Ok(ItemSpec {
            product_id: product_id.to_string(),
            quantity,
        })
    }
}

#[derive(Debug, Clone, Args)]
pub struct OrderArgs {
    #[arg(long, help = "Customer id")]
    pub customer: String,

    #[arg(long = "item", required = true, help = "PRODUCT=QUANTITY, repeatable")]
    pub items: Vec<ItemSpec>,

    #[arg(long, help = "Delivery date, YYYY-MM-DD or DD/MM/YYYY")]
    pub delivery: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

fn row(o: &Order) -> String {
    format!(
        "{:>6}  {}  {:<28} {:<12} {}",
        or_dash(o.id.as_deref()),
        o.order_date.format("%d/%m/%Y"),
        clip(o.customer_name.as_deref().unwrap_or(&o.customer_id), 28),
        o.status.label(),
        o.total
    )
}

fn describe(o: &Order) -> String {
    let mut out = format!(
        "Pedido {} de {}\nData: {}  Entrega: {}\nStatus: {}",
        or_dash(o.id.as_deref()),
        o.customer_name.as_deref().unwrap_or(&o.customer_id),
        o.order_date.format("%d/%m/%Y"),
        or_dash(o.delivery_date.map(|d| d.format("%d/%m/%Y"))),
        o.status.label()
    );
    for item in &o.items {
        let _ = write!(
            out,
            "\n  {:>4} x {:<28} {:>12} {:>12}",
            item.quantity,
            clip(item.product_name.as_deref().unwrap_or(&item.product_id), 28),
            item.unit_price.to_string(),
            item.subtotal.to_string()
        );
    }
    let _ = write!(out, "\nTotal: {}", o.total);
    if let Some(notes) = &o.notes {
        let _ = write!(out, "\nObservações: {}", notes);
    }
    out
}

/// Builds the order from fetched records. Nothing is sent.
pub async fn draft(ctx: &AppContext, args: &OrderArgs, now: DateTime<Utc>) -> CommandResult<Order> {
    let (customer, products) =
        tokio::try_join!(ctx.client.get_customer(&args.customer), ctx.client.list_products())?;

    let mut builder = OrderDraft::new(&customer)?;
    for item in &args.items {
        let product = products
            .iter()
            .find(|p| p.id.as_deref() == Some(item.product_id.as_str()))
            .ok_or_else(|| CommandError::not_found("Produto", &item.product_id))?;
        builder.add_product(product, item.quantity)?;
    }

    if let Some(raw) = &args.delivery {
        let date = parse_date(raw).ok_or_else(|| ValidationError::InvalidFormat {
            field: "delivery".to_string(),
            reason: "expected YYYY-MM-DD or DD/MM/YYYY".to_string(),
        })?;
        builder.delivery_date(date);
    }
    if let Some(notes) = &args.notes {
        builder.notes(notes.clone());
    }

    Ok(builder.build(now)?)
}

pub async fn run(ctx: &AppContext, command: OrderCommand, now: DateTime<Utc>) -> CommandResult<CommandOutput> {
    ctx.require_user()?;

    match command {
        OrderCommand::List { status } => {
            let mut orders = ctx.client.list_orders().await?;
            if let Some(status) = status {
                orders.retain(|o| o.status == status);
            }
            CommandOutput::new(listing("Pedidos", &orders, row), &orders)
        }
        OrderCommand::Show { id } => {
            let order = ctx.client.get_order(&id).await?;
            CommandOutput::new(describe(&order), &order)
        }
        OrderCommand::Create(args) => {
            let order = draft(ctx, &args, now).await?;
            let created = ctx.client.create_order(&order).await?;
            let text = format!(
                "Pedido {} registrado: {} itens, total {}.",
                or_dash(created.id.as_deref()),
                created.items.len(),
                created.total
            );
            CommandOutput::new(text, &created)
        }
        OrderCommand::Status { id, status } => {
            let updated = ctx.client.update_order_status(&id, status).await?;
            let text = format!("Pedido {} agora está {}.", id, updated.status.label());
            CommandOutput::new(text, &updated)
        }
        OrderCommand::Delete { id } => {
            ctx.client.delete_order(&id).await?;
            Ok(CommandOutput::message(format!("Pedido {} removido.", id)))
        }
        OrderCommand::Queue => {
            let orders = ctx.client.list_orders().await?;
            let queue = production_queue(&orders);
            let text = listing("Fila de produção", &queue, |t| {
                format!(
                    "{:<8} {:>6}  {:<28} {:>5} un  {}",
                    t.priority.label(),
                    or_dash(t.order_id.as_deref()),
                    clip(&t.customer, 28),
                    t.units,
                    t.status.label()
                )
            });
            CommandOutput::new(text, &queue)
        }
    }
}
