//! # Recipe Costing
//!
//! Turns recipe lines into reais.
//!
//! ## Cost of One Recipe Line
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Ingredient: Farinha de trigo     R$ 4,50 / kg                          │
//! │  Recipe line: 500 g                                                     │
//! │                                                                         │
//! │  same unit as ingredient? ──yes──► trust stored totalCost               │
//! │          │                                                              │
//! │          no                                                             │
//! │          ▼                                                              │
//! │  convert(500, g, kg) = 0.5  ×  4.50  =  2.25                            │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  |2.25 − stored totalCost| > 0.01 ? ──► warn!, keep going               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Discrepancies are reported, never corrected: the stored figure belongs
//! to the backend.

use serde::Serialize;
use tracing::warn;

use crate::types::{Product, ProductIngredient};
use crate::units::convert;

/// Maximum difference between the computed and stored cost of a line
/// before it is considered a discrepancy.
pub const COST_TOLERANCE: f64 = 0.01;

/// Cost of one recipe line, in reais.
///
/// ## Rules
/// - Usage unit == ingredient unit → stored `total_cost` as-is
/// - Otherwise → `convert(quantity, unit, ingredient.unit) × unit_cost`,
///   with a warning when that differs from `total_cost` by more than
///   [`COST_TOLERANCE`]
///
/// ```rust
/// use sapore_core::costing::calculated_cost;
/// use sapore_core::types::{Ingredient, ProductIngredient};
/// use sapore_core::units::Unit;
///
/// let line = ProductIngredient {
///     id: None,
///     ingredient: Ingredient {
///         id: None,
///         name: "Farinha".into(),
///         unit: Unit::Kilogram,
///         unit_cost: 4.50,
///         category: None,
///         supplier: None,
///     },
///     quantity: 500.0,
///     unit: Unit::Gram,
///     total_cost: 2.25,
///     notes: None,
/// };
/// assert!((calculated_cost(&line) - 2.25).abs() < 1e-9);
/// ```
pub fn calculated_cost(item: &ProductIngredient) -> f64 {
    let ingredient = &item.ingredient;

    if item.unit == ingredient.unit {
        return item.total_cost;
    }

    let quantity = convert(item.quantity, item.unit, ingredient.unit);
    let cost = quantity * ingredient.unit_cost;

    if (cost - item.total_cost).abs() > COST_TOLERANCE {
        warn!(
            ingredient = %ingredient.name,
            quantity = item.quantity,
            unit = %item.unit,
            computed = cost,
            stored = item.total_cost,
            "Recipe line cost differs from stored total"
        );
    }

    cost
}

/// Total ingredient cost of a recipe.
pub fn recipe_cost(items: &[ProductIngredient]) -> f64 {
    items.iter().map(calculated_cost).sum()
}

/// Cost of one unit out of a batch.
///
/// A missing or non-positive yield means the recipe makes one unit.
pub fn cost_per_unit(total: f64, yield_units: Option<f64>) -> f64 {
    match yield_units {
        Some(y) if y > 0.0 => total / y,
        _ => total,
    }
}

// =============================================================================
// Cost Audit
// =============================================================================

/// A recipe line whose stored cost disagrees with the computed one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostDiscrepancy {
    pub ingredient: String,
    pub computed: f64,
    pub stored: f64,
}

impl CostDiscrepancy {
    pub fn difference(&self) -> f64 {
        self.computed - self.stored
    }
}

/// Cost figures for one product, computed from its recipe.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostAudit {
    pub ingredient_cost: f64,
    pub cost_per_unit: f64,
    pub discrepancies: Vec<CostDiscrepancy>,
}

impl CostAudit {
    /// Audits a product's recipe without touching the product.
    pub fn of(product: &Product) -> Self {
        let mut discrepancies = Vec::new();
        let mut ingredient_cost = 0.0;

        for item in &product.ingredients {
            let computed = calculated_cost(item);
            ingredient_cost += computed;

            if (computed - item.total_cost).abs() > COST_TOLERANCE {
                discrepancies.push(CostDiscrepancy {
                    ingredient: item.ingredient.name.clone(),
                    computed,
                    stored: item.total_cost,
                });
            }
        }

        CostAudit {
            ingredient_cost,
            cost_per_unit: cost_per_unit(ingredient_cost, product.yield_units),
            discrepancies,
        }
    }

    #[inline]
    pub fn is_consistent(&self) -> bool {
        self.discrepancies.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
