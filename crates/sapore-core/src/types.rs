//! # Domain Types
//!
//! Records exchanged with the Sant'Sapore backend.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │◄──│      Order      │──►│   OrderItem     │       │
//! │  │  name, document │   │  status, total  │   │  qty × price    │       │
//! │  │  modality       │   │  order_date     │   │  = subtotal     │       │
//! │  └─────────────────┘   └─────────────────┘   └────────┬────────┘       │
//! │                                                       │                 │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌────────▼────────┐       │
//! │  │   Ingredient    │◄──│ProductIngredient│◄──│    Product      │       │
//! │  │  unit, unitCost │   │  qty, unit,     │   │  pricingStatus  │       │
//! │  └─────────────────┘   │  totalCost      │   │  salePrice      │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐                                                    │
//! │  │    Expense      │   Percentage (bps)   Money (centavos)             │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is held only until the next fetch. The backend is the
//! source of truth.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::serde_helpers;
use crate::units::Unit;

// =============================================================================
// Percentage
// =============================================================================

/// A percentage in basis points (1 bp = 0.01 %).
///
/// ## Why Basis Points?
/// Pricing inputs arrive as decimals such as `12.5`. Storing `1250` keeps
/// equality and hashing exact.
///
/// On the wire a `Percentage` is the decimal percent: `12.5`, not `0.125`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Percentage(u32);

impl Percentage {
    /// Creates a percentage from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percentage(bps)
    }

    /// Creates a percentage from a decimal percent (`12.5` = 12.5 %).
    ///
    /// Negative and non-finite inputs clamp to zero; use
    /// [`crate::validation::validate_percentage`] to reject them instead.
    pub fn from_percent(pct: f64) -> Self {
        if !pct.is_finite() || pct <= 0.0 {
            return Percentage(0);
        }
        Percentage((pct * 100.0).round() as u32)
    }

    /// Returns the value in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the value as a decimal percent.
    #[inline]
    pub fn percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Percentage(0)
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Percentage::zero()
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            write!(f, "{:.2}%", self.percent())
        }
    }
}

impl TryFrom<f64> for Percentage {
    type Error = ValidationError;

    fn try_from(pct: f64) -> Result<Self, Self::Error> {
        if !pct.is_finite() || pct < 0.0 {
            return Err(ValidationError::InvalidFormat {
                field: "percentage".to_string(),
                reason: format!("{} is not a non-negative number", pct),
            });
        }
        Ok(Percentage::from_percent(pct))
    }
}

impl From<Percentage> for f64 {
    fn from(pct: Percentage) -> f64 {
        pct.percent()
    }
}

// =============================================================================
// Customer
// =============================================================================

/// Customer classification.
///
/// Wholesale customers are businesses (CNPJ); retail customers are people
/// (CPF).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerModality {
    #[serde(alias = "ATACADO")]
    Wholesale,
    #[default]
    #[serde(alias = "VAREJO")]
    Retail,
}

impl CustomerModality {
    /// Portuguese label for lists and forms.
    pub const fn label(&self) -> &'static str {
        match self {
            CustomerModality::Wholesale => "Atacado",
            CustomerModality::Retail => "Varejo",
        }
    }
}

impl FromStr for CustomerModality {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "wholesale" | "atacado" => Ok(CustomerModality::Wholesale),
            "retail" | "varejo" => Ok(CustomerModality::Retail),
            _ => Err(ValidationError::NotAllowed {
                field: "modality".to_string(),
                allowed: vec!["wholesale".to_string(), "retail".to_string()],
            }),
        }
    }
}

/// A registered customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Backend id; `None` for a customer not yet saved.
    #[serde(default, deserialize_with = "serde_helpers::option_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    /// CPF (retail) or CNPJ (wholesale), digits only or formatted.
    pub document: String,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub modality: CustomerModality,
}

// =============================================================================
// Order
// =============================================================================

/// The status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Taken, not started.
    #[default]
    Pending,
    /// In the kitchen.
    InProgress,
    /// Handed to the customer. Only delivered orders count as revenue.
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::InProgress,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Portuguese label for lists and charts.
    pub const fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pendente",
            OrderStatus::InProgress => "Em produção",
            OrderStatus::Delivered => "Entregue",
            OrderStatus::Cancelled => "Cancelado",
        }
    }

    /// Wire name, as the backend expects it in status updates.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::InProgress => "IN_PROGRESS",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "pending" | "pendente" => Ok(OrderStatus::Pending),
            "in_progress" | "em_producao" | "em_produção" => Ok(OrderStatus::InProgress),
            "delivered" | "entregue" => Ok(OrderStatus::Delivered),
            "cancelled" | "canceled" | "cancelado" => Ok(OrderStatus::Cancelled),
            _ => Err(ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: OrderStatus::ALL
                    .iter()
                    .map(|s| s.as_str().to_lowercase())
                    .collect(),
            }),
        }
    }
}

/// A line item in an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(deserialize_with = "serde_helpers::id")]
    pub product_id: String,

    /// Product name as the backend denormalised it, if it did.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,

    pub quantity: i64,

    #[ts(type = "number")]
    pub unit_price: Money,

    /// unit_price × quantity.
    #[ts(type = "number")]
    pub subtotal: Money,
}

impl OrderItem {
    /// Creates a line item, computing the subtotal.
    pub fn new(product_id: impl Into<String>, quantity: i64, unit_price: Money) -> Self {
        OrderItem {
            product_id: product_id.into(),
            product_name: None,
            quantity,
            unit_price,
            subtotal: unit_price.multiply_quantity(quantity),
        }
    }
}

/// A customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default, deserialize_with = "serde_helpers::option_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(deserialize_with = "serde_helpers::id")]
    pub customer_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,

    #[serde(default)]
    pub items: Vec<OrderItem>,

    /// Sum of the item subtotals.
    #[ts(type = "number")]
    pub total: Money,

    #[serde(default)]
    pub status: OrderStatus,

    #[ts(as = "String")]
    pub order_date: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub delivery_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Order {
    /// Recomputes the total from the line items.
    ///
    /// The stored `total` comes from the backend and is trusted for
    /// reporting; this is for drafts and for spotting drift.
    pub fn computed_total(&self) -> Money {
        self.items.iter().map(|i| i.subtotal).sum()
    }

    /// Whether this order counts toward revenue.
    #[inline]
    pub fn is_revenue(&self) -> bool {
        self.status == OrderStatus::Delivered
    }
}

/// Builder for a new order.
///
/// ## User Workflow
/// ```text
/// Pick customer ──► add_product(brigadeiro, 100) ──► add_product(bolo, 2)
///                                                          │
///                                                          ▼
///                                      build(now) → Order { total: Σ subtotal }
/// ```
#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
    customer_id: String,
    customer_name: Option<String>,
    items: Vec<OrderItem>,
    delivery_date: Option<NaiveDate>,
    notes: Option<String>,
}

impl OrderDraft {
    pub fn new(customer: &Customer) -> CoreResult<Self> {
        let customer_id = customer.id.clone().ok_or_else(|| ValidationError::Required {
            field: "customer id".to_string(),
        })?;

        Ok(OrderDraft {
            customer_id,
            customer_name: Some(customer.name.clone()),
            ..Default::default()
        })
    }

    /// Adds a product at its current sale price.
    ///
    /// Adding the same product twice merges the quantities.
    pub fn add_product(&mut self, product: &Product, quantity: i64) -> CoreResult<&mut Self> {
        crate::validation::validate_quantity(quantity)?;

        let product_id = product
            .id
            .clone()
            .ok_or_else(|| CoreError::ProductNotFound(product.name.clone()))?;
        let unit_price = product
            .sale_price
            .ok_or_else(|| CoreError::ProductNotPriced(product.name.clone()))?;

        if let Some(existing) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            let merged = existing.quantity + quantity;
            crate::validation::validate_quantity(merged)?;
            existing.quantity = merged;
            existing.subtotal = existing.unit_price.multiply_quantity(merged);
        } else {
            let mut item = OrderItem::new(product_id, quantity, unit_price);
            item.product_name = Some(product.name.clone());
            self.items.push(item);
        }

        Ok(self)
    }

    pub fn delivery_date(&mut self, date: NaiveDate) -> &mut Self {
        self.delivery_date = Some(date);
        self
    }

    pub fn notes(&mut self, notes: impl Into<String>) -> &mut Self {
        let notes = notes.into();
        self.notes = if notes.trim().is_empty() { None } else { Some(notes) };
        self
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Finalises the draft into a pending order dated `now`.
    pub fn build(&self, now: DateTime<Utc>) -> CoreResult<Order> {
        if self.items.is_empty() {
            return Err(CoreError::EmptyOrder);
        }

        let total = self.items.iter().map(|i| i.subtotal).sum();
        Ok(Order {
            id: None,
            customer_id: self.customer_id.clone(),
            customer_name: self.customer_name.clone(),
            items: self.items.clone(),
            total,
            status: OrderStatus::Pending,
            order_date: now,
            delivery_date: self.delivery_date,
            notes: self.notes.clone(),
        })
    }
}

// =============================================================================
// Ingredient
// =============================================================================

/// A purchasable ingredient, costed per canonical unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    #[serde(default, deserialize_with = "serde_helpers::option_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    /// Canonical unit the cost refers to.
    pub unit: Unit,

    /// Reais per one `unit`. Not `Money`: sub-centavo costs are common.
    pub unit_cost: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
}

/// One line of a product's recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductIngredient {
    #[serde(default, deserialize_with = "serde_helpers::option_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub ingredient: Ingredient,

    /// Quantity used, in `unit`.
    pub quantity: f64,

    /// Unit the quantity is expressed in; may differ from the ingredient's.
    pub unit: Unit,

    /// Cost persisted by the backend for this line.
    pub total_cost: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// =============================================================================
// Product
// =============================================================================

/// Whether a product has gone through the pricing screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PricingStatus {
    #[default]
    NotCalculated,
    Calculated,
}

/// A product on the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, deserialize_with = "serde_helpers::option_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(default)]
    pub category: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Weight in grams.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    /// Units produced per recipe batch.
    #[serde(default, rename = "yield", skip_serializing_if = "Option::is_none")]
    pub yield_units: Option<f64>,

    /// Photo as a `data:` URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,

    #[serde(default)]
    pub pricing_status: PricingStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub cost_price: Option<Money>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub sale_price: Option<Money>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub markup_percent: Option<Percentage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub profit_percent: Option<Percentage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub expense_percent: Option<Percentage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub tax_percent: Option<Percentage>,

    #[serde(default)]
    pub ingredients: Vec<ProductIngredient>,
}

impl Product {
    /// Creates an unpriced product with only the required fields.
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Product {
            id: None,
            name: name.into(),
            category: category.into(),
            description: None,
            weight: None,
            yield_units: None,
            photo: None,
            pricing_status: PricingStatus::NotCalculated,
            cost_price: None,
            sale_price: None,
            markup_percent: None,
            profit_percent: None,
            expense_percent: None,
            tax_percent: None,
            ingredients: Vec::new(),
        }
    }

    #[inline]
    pub fn is_priced(&self) -> bool {
        self.pricing_status == PricingStatus::Calculated
    }

    /// Whether any recipe line references `ingredient_id`.
    pub fn uses_ingredient(&self, ingredient_id: &str) -> bool {
        self.ingredients
            .iter()
            .any(|pi| pi.ingredient.id.as_deref() == Some(ingredient_id))
    }
}

// =============================================================================
// Expense
// =============================================================================

/// An operating expense (packaging, gas, rent, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    #[serde(default, deserialize_with = "serde_helpers::option_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub description: String,

    #[serde(default)]
    pub category: String,

    #[ts(type = "number")]
    pub amount: Money,

    #[ts(as = "String")]
    pub date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
