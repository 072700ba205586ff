//! # Units of Measure
//!
//! Recipe quantities are entered in whatever unit the baker thinks in
//! ("200 g de chocolate") while ingredients are bought and costed in a
//! canonical unit ("R$ 45,00 / kg"). This module bridges the two.
//!
//! ## Unit Families
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   MASS              VOLUME             COUNT                            │
//! │   ────              ──────             ─────                            │
//! │   kg ─×1000─► g     L ─×100─► cl       un                               │
//! │   g  ─×1000─► mg    cl ─×10─► ml                                        │
//! │   kg ─×10⁶──► mg    L ─×1000► ml                                        │
//! │                                                                         │
//! │   No edges BETWEEN families: 1 L of milk is not 1 kg of milk.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Fallback Behaviour
//! A conversion with no path (cross-family, or an unknown unit string)
//! returns the input value unchanged and logs a warning. It never fails:
//! a wrong cost on screen is preferable to a pricing page that won't load.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Unit
// =============================================================================

/// A unit of measure used by ingredients and recipe lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Unit {
    #[serde(rename = "mg")]
    Milligram,
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "ml")]
    Milliliter,
    #[serde(rename = "cl")]
    Centiliter,
    #[serde(rename = "L", alias = "l")]
    Liter,
    #[serde(rename = "un")]
    Unit,
}

/// The physical dimension a unit measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitFamily {
    Mass,
    Volume,
    Count,
}

impl Unit {
    /// All supported units, in display order.
    pub const ALL: [Unit; 7] = [
        Unit::Milligram,
        Unit::Gram,
        Unit::Kilogram,
        Unit::Milliliter,
        Unit::Centiliter,
        Unit::Liter,
        Unit::Unit,
    ];

    /// Returns the family this unit belongs to.
    pub const fn family(&self) -> UnitFamily {
        match self {
            Unit::Milligram | Unit::Gram | Unit::Kilogram => UnitFamily::Mass,
            Unit::Milliliter | Unit::Centiliter | Unit::Liter => UnitFamily::Volume,
            Unit::Unit => UnitFamily::Count,
        }
    }

    /// The short symbol the backend uses.
    pub const fn symbol(&self) -> &'static str {
        match self {
            Unit::Milligram => "mg",
            Unit::Gram => "g",
            Unit::Kilogram => "kg",
            Unit::Milliliter => "ml",
            Unit::Centiliter => "cl",
            Unit::Liter => "L",
            Unit::Unit => "un",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Unit {
    type Err = ValidationError;

    /// Parses symbols and the Portuguese names operators type into forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mg" | "miligrama" | "miligramas" => Ok(Unit::Milligram),
            "g" | "gr" | "grama" | "gramas" => Ok(Unit::Gram),
            "kg" | "quilo" | "quilos" | "quilograma" | "quilogramas" => Ok(Unit::Kilogram),
            "ml" | "mililitro" | "mililitros" => Ok(Unit::Milliliter),
            "cl" | "centilitro" | "centilitros" => Ok(Unit::Centiliter),
            "l" | "lt" | "litro" | "litros" => Ok(Unit::Liter),
            "un" | "und" | "unid" | "unidade" | "unidades" => Ok(Unit::Unit),
            other => Err(ValidationError::NotAllowed {
                field: format!("unit '{}'", other),
                allowed: Unit::ALL.iter().map(|u| u.symbol().to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Conversion Table
// =============================================================================

/// Pairwise multipliers: `value_in_from × factor = value_in_to`.
///
/// Only one direction is stored; the reverse uses the reciprocal.
const CONVERSIONS: &[(Unit, Unit, f64)] = &[
    (Unit::Kilogram, Unit::Gram, 1_000.0),
    (Unit::Gram, Unit::Milligram, 1_000.0),
    (Unit::Kilogram, Unit::Milligram, 1_000_000.0),
    (Unit::Liter, Unit::Milliliter, 1_000.0),
    (Unit::Liter, Unit::Centiliter, 100.0),
    (Unit::Centiliter, Unit::Milliliter, 10.0),
];

/// How a value moves along one table entry.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    Multiply(f64),
    // Division keeps 1000 g → 1 kg exact where multiplying by 0.001 would not
    Divide(f64),
}

impl Step {
    fn apply(self, value: f64) -> f64 {
        match self {
            Step::Multiply(factor) => value * factor,
            Step::Divide(factor) => value / factor,
        }
    }
}

/// The single table walk behind [`conversion_factor`] and [`convert`].
/// `None` means no path; same-unit pairs never reach the table.
fn lookup(from: Unit, to: Unit) -> Option<Step> {
    if from == to {
        return Some(Step::Multiply(1.0));
    }

    CONVERSIONS.iter().find_map(|&(a, b, factor)| {
        if a == from && b == to {
            Some(Step::Multiply(factor))
        } else if a == to && b == from {
            Some(Step::Divide(factor))
        } else {
            None
        }
    })
}

/// Looks up the multiplier from `from` to `to`, if a path exists.
///
/// ```rust
/// use sapore_core::units::{conversion_factor, Unit};
///
/// assert_eq!(conversion_factor(Unit::Kilogram, Unit::Gram), Some(1000.0));
/// assert_eq!(conversion_factor(Unit::Gram, Unit::Liter), None);
/// ```
pub fn conversion_factor(from: Unit, to: Unit) -> Option<f64> {
    lookup(from, to).map(|step| match step {
        Step::Multiply(factor) => factor,
        Step::Divide(factor) => 1.0 / factor,
    })
}

/// Converts `value` from one unit to another.
///
/// ## Rules
/// 1. Same unit → `value` unchanged
/// 2. Direct table entry → `value × factor`
/// 3. Inverse table entry → `value ÷ factor`
/// 4. No path → warning logged, `value` unchanged
///
/// ```rust
/// use sapore_core::units::{convert, Unit};
///
/// assert_eq!(convert(1000.0, Unit::Gram, Unit::Kilogram), 1.0);
/// assert_eq!(convert(1.0, Unit::Kilogram, Unit::Gram), 1000.0);
/// assert_eq!(convert(3.0, Unit::Gram, Unit::Liter), 3.0); // no path
/// ```
pub fn convert(value: f64, from: Unit, to: Unit) -> f64 {
    if from == to {
        return value;
    }

    match lookup(from, to) {
        Some(step) => step.apply(value),
        None => {
            warn!(
                value,
                from = %from,
                to = %to,
                "No conversion path between units, using value unchanged"
            );
            value
        }
    }
}

/// String front end for [`convert`], for unit fields that arrive untyped.
///
/// An unrecognised unit takes the same warn-and-return-unchanged path as a
/// cross-family conversion.
pub fn convert_str(value: f64, from: &str, to: &str) -> f64 {
    match (from.parse::<Unit>(), to.parse::<Unit>()) {
        (Ok(from), Ok(to)) => convert(value, from, to),
        _ if from.trim() == to.trim() => value,
        _ => {
            warn!(value, from, to, "Unknown unit in conversion, using value unchanged");
            value
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::count_warnings;

    #[test]
    fn test_identity_for_every_unit() {
        for unit in Unit::ALL {
            assert_eq!(convert(12.34, unit, unit), 12.34);
        }
    }

    #[test]
    fn test_direct_and_reciprocal() {
        assert_eq!(convert(1000.0, Unit::Gram, Unit::Kilogram), 1.0);
        assert_eq!(convert(1.0, Unit::Kilogram, Unit::Gram), 1000.0);
        assert_eq!(convert(1.0, Unit::Liter, Unit::Milliliter), 1000.0);
        assert_eq!(convert(500.0, Unit::Milliliter, Unit::Liter), 0.5);
        assert_eq!(convert(2.0, Unit::Centiliter, Unit::Milliliter), 20.0);
        assert_eq!(convert(250.0, Unit::Milligram, Unit::Gram), 0.25);
        assert_eq!(convert(2.0, Unit::Kilogram, Unit::Milligram), 2_000_000.0);
    }

    #[test]
    fn test_cross_family_is_a_no_op() {
        assert_eq!(convert(7.5, Unit::Gram, Unit::Liter), 7.5);
        assert_eq!(convert(3.0, Unit::Unit, Unit::Kilogram), 3.0);
        assert_eq!(conversion_factor(Unit::Milliliter, Unit::Milligram), None);
    }

    #[test]
    fn test_missing_path_warns_once() {
        let (value, warnings) = count_warnings(|| convert(7.5, Unit::Gram, Unit::Liter));
        assert_eq!(value, 7.5);
        assert_eq!(warnings, 1);

        let (value, warnings) = count_warnings(|| convert_str(4.0, "xícara", "g"));
        assert_eq!(value, 4.0);
        assert_eq!(warnings, 1);
    }

    #[test]
    fn test_known_paths_stay_quiet() {
        let (_, warnings) = count_warnings(|| {
            convert(2.0, Unit::Kilogram, Unit::Kilogram);
            convert(500.0, Unit::Gram, Unit::Kilogram);
            convert_str(1.0, "litro", "ml");
            convert_str(4.0, "xícara", "xícara");
        });
        assert_eq!(warnings, 0);
    }

    #[test]
    fn test_factor_and_convert_agree() {
        for from in Unit::ALL {
            for to in Unit::ALL {
                match conversion_factor(from, to) {
                    Some(factor) => {
                        let expected = 3.0 * factor;
                        assert!((convert(3.0, from, to) - expected).abs() < 1e-9, "{} -> {}", from, to);
                    }
                    None => assert_ne!(from.family(), to.family(), "{} -> {}", from, to),
                }
            }
        }
    }

    #[test]
    fn test_convert_str() {
        assert_eq!(convert_str(1000.0, "g", "kg"), 1.0);
        assert_eq!(convert_str(1.0, "litro", "ml"), 1000.0);
        assert_eq!(convert_str(4.0, "xícara", "g"), 4.0);
        assert_eq!(convert_str(4.0, "xícara", "xícara"), 4.0);
    }

    #[test]
    fn test_parse_units() {
        assert_eq!("KG".parse::<Unit>().unwrap(), Unit::Kilogram);
        assert_eq!("L".parse::<Unit>().unwrap(), Unit::Liter);
        assert_eq!(" gramas ".parse::<Unit>().unwrap(), Unit::Gram);
        assert_eq!("unidade".parse::<Unit>().unwrap(), Unit::Unit);
        assert!("colher".parse::<Unit>().is_err());
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&Unit::Liter).unwrap(), "\"L\"");
        let unit: Unit = serde_json::from_str("\"l\"").unwrap();
        assert_eq!(unit, Unit::Liter);
        let unit: Unit = serde_json::from_str("\"kg\"").unwrap();
        assert_eq!(unit, Unit::Kilogram);
    }

    #[test]
    fn test_families() {
        assert_eq!(Unit::Milligram.family(), UnitFamily::Mass);
        assert_eq!(Unit::Centiliter.family(), UnitFamily::Volume);
        assert_eq!(Unit::Unit.family(), UnitFamily::Count);
    }
}
