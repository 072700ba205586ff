//! # Pricing Simulation Payloads
//!
//! The pricing formula runs on the backend. This module owns the two things
//! the console is responsible for: assembling a well-formed request, and
//! folding a committed result back into a product.
//!
//! ## Simulation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operator picks strategy + percentages                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SimulationRequest::build ← THIS MODULE                                 │
//! │       │  Markup → { markupPercent, ... }                                │
//! │       │  Margin → { profitPercent, ... }                                │
//! │       │  neither supplied → ValidationError, no request sent            │
//! │       ▼                                                                 │
//! │  POST /pricing/products/{id}/simulate  (backend computes)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SimulationResult: ingredient cost, cost/unit, suggested price,         │
//! │                    unit profit, margin, markup                          │
//! │       │                                                                 │
//! │       ▼ "Salvar"                                                        │
//! │  CommitRequest::new(request, result) → POST /pricing/products/{id}/...  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Percentage, PricingStatus, Product};
use crate::validation::{validate_percentage, ValidationResult};

// =============================================================================
// Strategy
// =============================================================================

/// How the sale price is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PricingStrategy {
    /// Sale price = cost + markup % of cost.
    #[default]
    Markup,
    /// Sale price chosen so profit is margin % of the sale price.
    Margin,
}

impl fmt::Display for PricingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingStrategy::Markup => write!(f, "markup"),
            PricingStrategy::Margin => write!(f, "margin"),
        }
    }
}

impl FromStr for PricingStrategy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "markup" => Ok(PricingStrategy::Markup),
            "margin" | "margem" => Ok(PricingStrategy::Margin),
            _ => Err(ValidationError::NotAllowed {
                field: "strategy".to_string(),
                allowed: vec!["markup".to_string(), "margin".to_string()],
            }),
        }
    }
}

// =============================================================================
// Inputs → Request
// =============================================================================

/// Raw percentages as typed into the pricing form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricingInputs {
    pub strategy: PricingStrategy,
    pub markup_percent: Option<f64>,
    pub margin_percent: Option<f64>,
    pub expense_percent: f64,
    pub tax_percent: f64,
    pub minimum_profit_percent: f64,
}

/// Body of `POST /pricing/products/{id}/simulate`.
///
/// Exactly one of `markup_percent` / `profit_percent` is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub markup_percent: Option<Percentage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub profit_percent: Option<Percentage>,

    #[ts(type = "number")]
    pub expense_percent: Percentage,

    #[ts(type = "number")]
    pub tax_percent: Percentage,

    #[ts(type = "number")]
    pub minimum_profit_percent: Percentage,
}

impl SimulationRequest {
    /// Assembles the request for the chosen strategy.
    ///
    /// ## Rules
    /// - Markup strategy sends only `markupPercent`
    /// - Margin strategy sends only `profitPercent`
    /// - The percentage the strategy needs must be supplied
    /// - Every percentage must be within 0..=1000
    ///
    /// ```rust
    /// use sapore_core::pricing::{PricingInputs, PricingStrategy, SimulationRequest};
    ///
    /// let inputs = PricingInputs {
    ///     strategy: PricingStrategy::Margin,
    ///     markup_percent: Some(100.0),
    ///     margin_percent: Some(30.0),
    ///     ..Default::default()
    /// };
    /// let req = SimulationRequest::build(&inputs).unwrap();
    /// assert!(req.markup_percent.is_none());
    /// assert_eq!(req.profit_percent.unwrap().bps(), 3000);
    /// ```
    pub fn build(inputs: &PricingInputs) -> ValidationResult<Self> {
        let (markup_percent, profit_percent) = match inputs.strategy {
            PricingStrategy::Markup => (inputs.markup_percent.map(|p| ("markupPercent", p)), None),
            PricingStrategy::Margin => (None, inputs.margin_percent.map(|p| ("profitPercent", p))),
        };

        if markup_percent.is_none() && profit_percent.is_none() {
            return Err(ValidationError::Required {
                field: match inputs.strategy {
                    PricingStrategy::Markup => "markupPercent".to_string(),
                    PricingStrategy::Margin => "profitPercent".to_string(),
                },
            });
        }

        Ok(SimulationRequest {
            markup_percent: markup_percent
                .map(|(field, pct)| checked_percent(field, pct))
                .transpose()?,
            profit_percent: profit_percent
                .map(|(field, pct)| checked_percent(field, pct))
                .transpose()?,
            expense_percent: checked_percent("expensePercent", inputs.expense_percent)?,
            tax_percent: checked_percent("taxPercent", inputs.tax_percent)?,
            minimum_profit_percent: checked_percent(
                "minimumProfitPercent",
                inputs.minimum_profit_percent,
            )?,
        })
    }

    /// Strategy implied by which percentage is present.
    pub fn strategy(&self) -> PricingStrategy {
        if self.profit_percent.is_some() {
            PricingStrategy::Margin
        } else {
            PricingStrategy::Markup
        }
    }
}

fn checked_percent(field: &str, pct: f64) -> ValidationResult<Percentage> {
    validate_percentage(field, pct)?;
    Ok(Percentage::from_percent(pct))
}

// =============================================================================
// Result
// =============================================================================

/// The backend's pricing breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Total ingredient cost of one batch, in reais.
    pub ingredient_cost: f64,

    /// Ingredient cost per unit sold, in reais.
    pub cost_per_unit: f64,

    #[ts(type = "number")]
    pub suggested_price: Money,

    /// Negative when the inputs price below cost.
    #[ts(type = "number")]
    pub unit_profit: Money,

    /// Profit as a percent of the sale price.
    pub profit_margin: f64,

    /// Markup as a percent of cost.
    pub markup: f64,
}

impl SimulationResult {
    #[inline]
    pub fn is_loss(&self) -> bool {
        self.unit_profit.is_negative()
    }
}

// =============================================================================
// Commit
// =============================================================================

/// Body of the pricing persistence call: the simulated figures, re-submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CommitRequest {
    #[serde(flatten)]
    pub request: SimulationRequest,

    #[ts(type = "number")]
    pub cost_price: Money,

    #[ts(type = "number")]
    pub sale_price: Money,

    pub profit_margin: f64,

    pub markup: f64,
}

impl CommitRequest {
    pub fn new(request: &SimulationRequest, result: &SimulationResult) -> Self {
        CommitRequest {
            request: request.clone(),
            cost_price: Money::from_reais(result.cost_per_unit),
            sale_price: result.suggested_price,
            profit_margin: result.profit_margin,
            markup: result.markup,
        }
    }

    /// Folds the committed figures into a product, as the backend will.
    ///
    /// Used for the optimistic "move to priced" before the refetch lands.
    pub fn apply_to(&self, product: &mut Product) {
        product.pricing_status = PricingStatus::Calculated;
        product.cost_price = Some(self.cost_price);
        product.sale_price = Some(self.sale_price);
        product.markup_percent = self.request.markup_percent;
        product.profit_percent = self.request.profit_percent;
        product.expense_percent = Some(self.request.expense_percent);
        product.tax_percent = Some(self.request.tax_percent);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(strategy: PricingStrategy, markup: Option<f64>, margin: Option<f64>) -> PricingInputs {
        PricingInputs {
            strategy,
            markup_percent: markup,
            margin_percent: margin,
            expense_percent: 10.0,
            tax_percent: 6.0,
            minimum_profit_percent: 5.0,
        }
    }

    fn result() -> SimulationResult {
        SimulationResult {
            ingredient_cost: 30.0,
            cost_per_unit: 3.0,
            suggested_price: Money::from_centavos(700),
            unit_profit: Money::from_centavos(252),
            profit_margin: 36.0,
            markup: 133.33,
        }
    }

    #[test]
    fn test_markup_strategy_sends_only_markup() {
        let req = SimulationRequest::build(&inputs(PricingStrategy::Markup, Some(100.0), Some(30.0)))
            .unwrap();
        let json = serde_json::to_value(&req).unwrap();

        assert_eq!(json["markupPercent"], 100.0);
        assert!(json.get("profitPercent").is_none());
        assert_eq!(json["expensePercent"], 10.0);
        assert_eq!(json["taxPercent"], 6.0);
        assert_eq!(json["minimumProfitPercent"], 5.0);
        assert_eq!(req.strategy(), PricingStrategy::Markup);
    }

    #[test]
    fn test_margin_strategy_sends_only_profit() {
        let req = SimulationRequest::build(&inputs(PricingStrategy::Margin, Some(100.0), Some(30.0)))
            .unwrap();
        let json = serde_json::to_value(&req).unwrap();

        assert!(json.get("markupPercent").is_none());
        assert_eq!(json["profitPercent"], 30.0);
        assert_eq!(req.strategy(), PricingStrategy::Margin);
    }

    #[test]
    fn test_missing_strategy_percentage_is_rejected() {
        let err = SimulationRequest::build(&inputs(PricingStrategy::Markup, None, Some(30.0)))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::Required {
                field: "markupPercent".to_string()
            }
        );

        assert!(SimulationRequest::build(&inputs(PricingStrategy::Margin, None, None)).is_err());
    }

    #[test]
    fn test_out_of_range_percentage_is_rejected() {
        let mut bad = inputs(PricingStrategy::Markup, Some(100.0), None);
        bad.tax_percent = -2.0;
        assert!(SimulationRequest::build(&bad).is_err());

        let bad = inputs(PricingStrategy::Markup, Some(5000.0), None);
        assert!(SimulationRequest::build(&bad).is_err());
    }

    #[test]
    fn test_result_decodes_backend_json() {
        let json = r#"{
            "ingredientCost": 30.0,
            "costPerUnit": 3.0,
            "suggestedPrice": 7.0,
            "unitProfit": -0.5,
            "profitMargin": -7.1,
            "markup": 133.3
        }"#;
        let res: SimulationResult = serde_json::from_str(json).unwrap();
        assert_eq!(res.suggested_price.centavos(), 700);
        assert!(res.is_loss());
    }

    #[test]
    fn test_commit_resubmits_figures_and_applies() {
        let req = SimulationRequest::build(&inputs(PricingStrategy::Markup, Some(133.0), None))
            .unwrap();
        let commit = CommitRequest::new(&req, &result());

        let json = serde_json::to_value(&commit).unwrap();
        assert_eq!(json["markupPercent"], 133.0);
        assert_eq!(json["salePrice"], 7.0);
        assert_eq!(json["costPrice"], 3.0);

        let mut product = Product::new("Brigadeiro", "Doces");
        commit.apply_to(&mut product);
        assert!(product.is_priced());
        assert_eq!(product.sale_price, Some(Money::from_centavos(700)));
        assert_eq!(product.tax_percent, Some(Percentage::from_bps(600)));
        assert!(product.profit_percent.is_none());
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("margem".parse::<PricingStrategy>().unwrap(), PricingStrategy::Margin);
        assert!("cost-plus".parse::<PricingStrategy>().is_err());
    }
}
