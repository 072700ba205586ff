//! # sapore-core: Pure Business Logic for the Sant'Sapore Back-Office
//!
//! Everything the back-office computes locally lives here as pure
//! functions: unit conversion, recipe costing, pricing payloads, report
//! aggregation, production priority and form validation.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Sant'Sapore Back-Office                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/console (`sapore` CLI)                     │   │
//! │  │   customers ─ products ─ orders ─ pricing ─ report ─ convert   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          sapore-client (REST, session, config)                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ sapore-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  units  │ │ costing │ │ pricing │ │ reports │ │ fields  │  │   │
//! │  │   │ convert │ │ recipe  │ │ payload │ │ summary │ │  forms  │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO CLOCK • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (Customer, Order, Product, Ingredient, Expense)
//! - [`money`] - Money in integer centavos
//! - [`units`] - Units of measure and conversion
//! - [`costing`] - Recipe line and batch costs
//! - [`pricing`] - Simulation and commit payloads
//! - [`reports`] - Dashboard aggregation
//! - [`priority`] - Production queue buckets
//! - [`fields`] - Form descriptors and validation
//! - [`validation`] - Business rule validators
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: "now" is always a parameter
//! 2. **No I/O**: the backend and the token store belong to sapore-client
//! 3. **Integer Money**: prices and totals are centavos (i64)
//! 4. **Explicit Errors**: typed enums, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use sapore_core::units::{convert, Unit};
//! use sapore_core::Money;
//!
//! // 500 g of flour bought at R$ 4,50 / kg
//! let kg = convert(500.0, Unit::Gram, Unit::Kilogram);
//! let cost = Money::from_reais(kg * 4.50);
//! assert_eq!(cost.centavos(), 225);
//! assert_eq!(cost.to_string(), "R$ 2,25");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod costing;
pub mod error;
pub mod fields;
pub mod money;
pub mod pricing;
pub mod priority;
pub mod reports;
pub mod serde_helpers;
pub mod types;
pub mod units;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;
pub use units::Unit;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single product in an order.
///
/// ## Business Reason
/// Party orders of a few thousand brigadeiros are normal; five digits is a
/// typo.
pub const MAX_ITEM_QUANTITY: i64 = 9999;

/// Upper bound for any pricing percentage input.
pub const MAX_PERCENTAGE: f64 = 1000.0;
