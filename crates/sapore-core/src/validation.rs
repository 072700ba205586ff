//! # Validation Module
//!
//! Input validation for the back-office console.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form field descriptors (crate::fields)                       │
//! │  ├── Required / length / numeric range                                 │
//! │  └── Immediate operator feedback                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rules                                 │
//! │  ├── CPF / CNPJ check digits                                           │
//! │  └── Quantities, prices, percentages                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                      │
//! │  ├── Uniqueness (duplicate document → HTTP 409)                        │
//! │  └── Referential integrity                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use sapore_core::validation::{validate_document, validate_quantity};
//!
//! assert!(validate_document("529.982.247-25").is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::Product;
use crate::{MAX_ITEM_QUANTITY, MAX_PERCENTAGE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a person or business name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 150 characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > 150 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 150,
        });
    }

    Ok(())
}

/// Validates a search query and returns it trimmed.
///
/// ## Rules
/// - Can be empty (lists everything)
/// - Maximum 100 characters
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Light e-mail shape check: one `@`, something on both sides, a dot in
/// the domain. The backend sends the confirmation mail, not us.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(|| invalid("missing @"))?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid("must have exactly one @ with a local part"));
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid("domain must contain a dot"));
    }

    Ok(())
}

// =============================================================================
// Tax Documents
// =============================================================================

/// Kind of Brazilian tax document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Cadastro de Pessoas Físicas, 11 digits.
    Cpf,
    /// Cadastro Nacional da Pessoa Jurídica, 14 digits.
    Cnpj,
}

/// Validates a CPF or CNPJ, formatted or not, and reports which one it is.
///
/// ## Rules
/// - 11 digits → CPF, 14 digits → CNPJ, anything else is rejected
/// - All-same-digit numbers ("111.111.111-11") are rejected
/// - Both check digits must match
///
/// ```rust
/// use sapore_core::validation::{validate_document, DocumentKind};
///
/// assert_eq!(validate_document("529.982.247-25").unwrap(), DocumentKind::Cpf);
/// assert_eq!(validate_document("11.222.333/0001-81").unwrap(), DocumentKind::Cnpj);
/// assert!(validate_document("529.982.247-26").is_err());
/// ```
pub fn validate_document(document: &str) -> ValidationResult<DocumentKind> {
    let digits: Vec<u32> = document.chars().filter_map(|c| c.to_digit(10)).collect();
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "document".to_string(),
        reason: reason.to_string(),
    };

    if digits.is_empty() {
        return Err(ValidationError::Required {
            field: "document".to_string(),
        });
    }

    let kind = match digits.len() {
        11 => DocumentKind::Cpf,
        14 => DocumentKind::Cnpj,
        _ => return Err(invalid("must have 11 (CPF) or 14 (CNPJ) digits")),
    };

    if digits.iter().all(|&d| d == digits[0]) {
        return Err(invalid("repeated digits"));
    }

    let ok = match kind {
        DocumentKind::Cpf => {
            cpf_digit(&digits[..9]) == digits[9] && cpf_digit(&digits[..10]) == digits[10]
        }
        DocumentKind::Cnpj => {
            cnpj_digit(&digits[..12]) == digits[12] && cnpj_digit(&digits[..13]) == digits[13]
        }
    };

    if !ok {
        return Err(invalid("check digits do not match"));
    }

    Ok(kind)
}

fn cpf_digit(body: &[u32]) -> u32 {
    let weight_start = body.len() as u32 + 1;
    let sum: u32 = body
        .iter()
        .enumerate()
        .map(|(i, d)| d * (weight_start - i as u32))
        .sum();
    let rest = (sum * 10) % 11;
    if rest == 10 {
        0
    } else {
        rest
    }
}

fn cnpj_digit(body: &[u32]) -> u32 {
    // Weights cycle 2..=9 from the rightmost digit
    let sum: u32 = body
        .iter()
        .rev()
        .enumerate()
        .map(|(i, d)| d * (2 + (i as u32 % 8)))
        .sum();
    let rest = sum % 11;
    if rest < 2 {
        0
    } else {
        11 - rest
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an order item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (9999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1.0,
            max: MAX_ITEM_QUANTITY as f64,
        });
    }

    Ok(())
}

/// Validates a recipe quantity (fractional, strictly positive).
pub fn validate_recipe_quantity(qty: f64) -> ValidationResult<()> {
    if !qty.is_finite() || qty <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates a price in centavos. Zero is allowed (samples, gifts).
pub fn validate_price_centavos(centavos: i64) -> ValidationResult<()> {
    if centavos < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0.0,
            max: i64::MAX as f64,
        });
    }

    Ok(())
}

/// Validates an ingredient unit cost in reais.
pub fn validate_unit_cost(cost: f64) -> ValidationResult<()> {
    if !cost.is_finite() || cost < 0.0 {
        return Err(ValidationError::InvalidFormat {
            field: "unitCost".to_string(),
            reason: "must be a non-negative number".to_string(),
        });
    }

    Ok(())
}

/// Validates a decimal percentage input.
///
/// ## Rules
/// - Finite and between 0 and MAX_PERCENTAGE (1000 %)
/// - Markups above 100 % are normal in confectionery; 1000 % is a typo guard
pub fn validate_percentage(field: &str, pct: f64) -> ValidationResult<()> {
    if !pct.is_finite() || !(0.0..=MAX_PERCENTAGE).contains(&pct) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0.0,
            max: MAX_PERCENTAGE,
        });
    }

    Ok(())
}

// =============================================================================
// Referential Guards
// =============================================================================

/// Refuses to delete an ingredient that any product recipe still uses.
///
/// ## User Workflow
/// ```text
/// Delete "Leite condensado"
///      │
///      ▼
/// ensure_ingredient_unused ← THIS FUNCTION (over the fetched product list)
///      │
///      ├── used by [Brigadeiro, Beijinho] → IngredientInUse, no request sent
///      │
///      └── unused → DELETE /pricing/ingredients/{id}
/// ```
pub fn ensure_ingredient_unused(ingredient_id: &str, products: &[Product]) -> CoreResult<()> {
    let users: Vec<String> = products
        .iter()
        .filter(|p| p.uses_ingredient(ingredient_id))
        .map(|p| p.name.clone())
        .collect();

    if users.is_empty() {
        Ok(())
    } else {
        Err(CoreError::IngredientInUse {
            ingredient: ingredient_id.to_string(),
            products: users,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Ingredient, ProductIngredient};
    use crate::units::Unit;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Maria das Graças").is_ok());
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"A".repeat(151)).is_err());
    }

    #[test]
    fn test_validate_cpf() {
        assert_eq!(validate_document("52998224725").unwrap(), DocumentKind::Cpf);
        assert_eq!(validate_document("529.982.247-25").unwrap(), DocumentKind::Cpf);
        assert!(validate_document("529.982.247-24").is_err());
        assert!(validate_document("111.111.111-11").is_err());
    }

    #[test]
    fn test_validate_cnpj() {
        assert_eq!(validate_document("11222333000181").unwrap(), DocumentKind::Cnpj);
        assert!(validate_document("11.222.333/0001-80").is_err());
    }

    #[test]
    fn test_validate_document_length() {
        assert!(matches!(
            validate_document(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(validate_document("12345").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("contato@santsapore.com.br").is_ok());
        assert!(validate_email("contato.santsapore.com").is_err());
        assert!(validate_email("@santsapore.com").is_err());
        assert!(validate_email("a@b@c.com").is_err());
        assert!(validate_email("a@localhost").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(9999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(10_000).is_err());
    }

    #[test]
    fn test_validate_percentage() {
        assert!(validate_percentage("markup", 0.0).is_ok());
        assert!(validate_percentage("markup", 250.0).is_ok());
        assert!(validate_percentage("markup", -1.0).is_err());
        assert!(validate_percentage("markup", 1000.5).is_err());
        assert!(validate_percentage("markup", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_costs_and_prices() {
        assert!(validate_unit_cost(0.0045).is_ok());
        assert!(validate_unit_cost(-0.01).is_err());
        assert!(validate_price_centavos(0).is_ok());
        assert!(validate_price_centavos(-1).is_err());
        assert!(validate_recipe_quantity(0.5).is_ok());
        assert!(validate_recipe_quantity(0.0).is_err());
    }

    #[test]
    fn test_ensure_ingredient_unused() {
        let leite = Ingredient {
            id: Some("i1".to_string()),
            name: "Leite condensado".to_string(),
            unit: Unit::Gram,
            unit_cost: 0.02,
            category: None,
            supplier: None,
        };
        let mut brigadeiro = Product::new("Brigadeiro", "Doces");
        brigadeiro.ingredients.push(ProductIngredient {
            id: None,
            ingredient: leite,
            quantity: 395.0,
            unit: Unit::Gram,
            total_cost: 7.9,
            notes: None,
        });
        let products = vec![brigadeiro, Product::new("Pão de mel", "Doces")];

        let err = ensure_ingredient_unused("i1", &products).unwrap_err();
        match err {
            CoreError::IngredientInUse { products, .. } => {
                assert_eq!(products, vec!["Brigadeiro".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(ensure_ingredient_unused("i2", &products).is_ok());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  farinha ").unwrap(), "farinha");
        assert!(validate_search_query(&"x".repeat(101)).is_err());
    }
}
