//! # Form Field Descriptors
//!
//! Every registration form (customer, product, ingredient, expense) is
//! described as data: an ordered list of [`FieldDescriptor`]s. Front ends
//! render from it, and [`FormSpec::validate`] checks submitted values
//! against it before anything is sent to the backend.
//!
//! ## Validation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  submitted values { "name": "Ana", "modality": "RETAIL", "cpf": ... }   │
//! │       │                                                                 │
//! │       ▼  for each descriptor, in order                                  │
//! │  visible_when met? ──no──► skip                                         │
//! │       │ yes                                                             │
//! │       ▼                                                                 │
//! │  blank? ──yes──► required? → Required : skip                            │
//! │       │ no                                                              │
//! │       ▼                                                                 │
//! │  check by kind (Text length, Number range, Document digits, ...)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{CustomerModality, OrderStatus};
use crate::units::Unit;
use crate::validation::{
    validate_document, validate_email, validate_percentage, validate_price_centavos,
    ValidationResult,
};

/// File extensions accepted by the product photo picker.
pub const PHOTO_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];

/// Submitted form values, keyed by field name.
pub type FormValues = BTreeMap<String, String>;

// =============================================================================
// Descriptors
// =============================================================================

/// One choice of a select field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        SelectOption {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// What a field holds, and so how it is checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text { max_len: usize },
    Number { min: Option<f64>, max: Option<f64> },
    /// Reais, "12,50" or "12.50", optionally prefixed with "R$".
    Money,
    Percentage,
    Select { options: Vec<SelectOption> },
    /// `YYYY-MM-DD` or `DD/MM/YYYY`.
    Date,
    /// CPF or CNPJ.
    Document,
    Email,
    /// Path to an image file.
    Photo,
}

/// Shows a field only while another field holds a given value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VisibleWhen {
    pub field: String,
    pub equals: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: String,
    pub label: String,
    pub required: bool,
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_when: Option<VisibleWhen>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        FieldDescriptor {
            name: name.into(),
            label: label.into(),
            required: false,
            kind,
            visible_when: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn visible_when(mut self, field: impl Into<String>, equals: impl Into<String>) -> Self {
        self.visible_when = Some(VisibleWhen {
            field: field.into(),
            equals: equals.into(),
        });
        self
    }

    /// Whether the field is shown given the other submitted values.
    pub fn is_visible(&self, values: &FormValues) -> bool {
        match &self.visible_when {
            None => true,
            Some(cond) => values
                .get(&cond.field)
                .is_some_and(|v| v.trim().eq_ignore_ascii_case(cond.equals.trim())),
        }
    }

    /// Checks one non-blank value against this field's kind.
    fn check(&self, value: &str) -> ValidationResult<()> {
        let field = self.name.as_str();
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: reason.to_string(),
        };

        match &self.kind {
            FieldKind::Text { max_len } => {
                if value.chars().count() > *max_len {
                    return Err(ValidationError::TooLong {
                        field: field.to_string(),
                        max: *max_len,
                    });
                }
            }
            FieldKind::Number { min, max } => {
                let n = parse_decimal(value).ok_or_else(|| invalid("not a number"))?;
                let lo = min.unwrap_or(f64::MIN);
                let hi = max.unwrap_or(f64::MAX);
                if n < lo || n > hi {
                    return Err(ValidationError::OutOfRange {
                        field: field.to_string(),
                        min: lo,
                        max: hi,
                    });
                }
            }
            FieldKind::Money => {
                let reais = parse_decimal(value).ok_or_else(|| invalid("not an amount"))?;
                validate_price_centavos(Money::from_reais(reais).centavos())
                    .map_err(|_| ValidationError::MustBePositive {
                        field: field.to_string(),
                    })?;
            }
            FieldKind::Percentage => {
                let pct = parse_decimal(value.trim_end_matches('%'))
                    .ok_or_else(|| invalid("not a percentage"))?;
                validate_percentage(field, pct)?;
            }
            FieldKind::Select { options } => {
                let value = value.trim();
                if !options.iter().any(|o| o.value.eq_ignore_ascii_case(value)) {
                    return Err(ValidationError::NotAllowed {
                        field: field.to_string(),
                        allowed: options.iter().map(|o| o.value.clone()).collect(),
                    });
                }
            }
            FieldKind::Date => {
                parse_date(value).ok_or_else(|| invalid("expected YYYY-MM-DD or DD/MM/YYYY"))?;
            }
            FieldKind::Document => {
                validate_document(value)?;
            }
            FieldKind::Email => validate_email(value)?,
            FieldKind::Photo => {
                let ext = value
                    .rsplit_once('.')
                    .map(|(_, ext)| ext.to_ascii_lowercase())
                    .unwrap_or_default();
                if !PHOTO_EXTENSIONS.contains(&ext.as_str()) {
                    return Err(ValidationError::NotAllowed {
                        field: field.to_string(),
                        allowed: PHOTO_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
                    });
                }
            }
        }

        Ok(())
    }
}

// =============================================================================
// Form Spec
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FormSpec {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
}

impl FormSpec {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Every problem with the submitted values, in field order.
    pub fn errors(&self, values: &FormValues) -> Vec<ValidationError> {
        self.fields
            .iter()
            .filter(|f| f.is_visible(values))
            .filter_map(|f| {
                match values.get(&f.name).map(|v| v.trim()).filter(|v| !v.is_empty()) {
                    Some(value) => f.check(value).err(),
                    None if f.required => Some(ValidationError::Required {
                        field: f.name.clone(),
                    }),
                    None => None,
                }
            })
            .collect()
    }

    /// Fails with the first problem found.
    pub fn validate(&self, values: &FormValues) -> ValidationResult<()> {
        match self.errors(values).into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

// =============================================================================
// Built-in Forms
// =============================================================================

/// Customer registration. CPF is asked of retail customers, CNPJ of
/// wholesale ones; both are stored as the customer's document.
pub fn customer_form() -> FormSpec {
    let modality = [CustomerModality::Retail, CustomerModality::Wholesale]
        .iter()
        .map(|m| {
            let value = serde_json::to_value(m)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            SelectOption::new(value, m.label())
        })
        .collect();

    FormSpec {
        name: "customer".to_string(),
        fields: vec![
            FieldDescriptor::new("name", "Nome", FieldKind::Text { max_len: 150 }).required(),
            FieldDescriptor::new("modality", "Modalidade", FieldKind::Select { options: modality })
                .required(),
            FieldDescriptor::new("cpf", "CPF", FieldKind::Document)
                .required()
                .visible_when("modality", "RETAIL"),
            FieldDescriptor::new("cnpj", "CNPJ", FieldKind::Document)
                .required()
                .visible_when("modality", "WHOLESALE"),
            FieldDescriptor::new("phone", "Telefone", FieldKind::Text { max_len: 20 }),
            FieldDescriptor::new("email", "E-mail", FieldKind::Email),
            FieldDescriptor::new("address", "Endereço", FieldKind::Text { max_len: 255 }),
        ],
    }
}

pub fn product_form() -> FormSpec {
    FormSpec {
        name: "product".to_string(),
        fields: vec![
            FieldDescriptor::new("name", "Nome", FieldKind::Text { max_len: 150 }).required(),
            FieldDescriptor::new("category", "Categoria", FieldKind::Text { max_len: 80 })
                .required(),
            FieldDescriptor::new("description", "Descrição", FieldKind::Text { max_len: 500 }),
            FieldDescriptor::new(
                "weight",
                "Peso (g)",
                FieldKind::Number {
                    min: Some(0.0),
                    max: None,
                },
            ),
            FieldDescriptor::new(
                "yield",
                "Rendimento (un)",
                FieldKind::Number {
                    min: Some(1.0),
                    max: None,
                },
            ),
            FieldDescriptor::new("photo", "Foto", FieldKind::Photo),
        ],
    }
}

pub fn ingredient_form() -> FormSpec {
    let units = Unit::ALL
        .iter()
        .map(|u| SelectOption::new(u.symbol(), u.symbol()))
        .collect();

    FormSpec {
        name: "ingredient".to_string(),
        fields: vec![
            FieldDescriptor::new("name", "Nome", FieldKind::Text { max_len: 150 }).required(),
            FieldDescriptor::new("unit", "Unidade", FieldKind::Select { options: units })
                .required(),
            FieldDescriptor::new(
                "unitCost",
                "Custo por unidade",
                FieldKind::Number {
                    min: Some(0.0),
                    max: None,
                },
            )
            .required(),
            FieldDescriptor::new("category", "Categoria", FieldKind::Text { max_len: 80 }),
            FieldDescriptor::new("supplier", "Fornecedor", FieldKind::Text { max_len: 150 }),
        ],
    }
}

pub fn expense_form() -> FormSpec {
    FormSpec {
        name: "expense".to_string(),
        fields: vec![
            FieldDescriptor::new("description", "Descrição", FieldKind::Text { max_len: 255 })
                .required(),
            FieldDescriptor::new("category", "Categoria", FieldKind::Text { max_len: 80 }),
            FieldDescriptor::new("amount", "Valor", FieldKind::Money).required(),
            FieldDescriptor::new("date", "Data", FieldKind::Date).required(),
            FieldDescriptor::new("notes", "Observações", FieldKind::Text { max_len: 500 }),
        ],
    }
}

/// Order status select, for the status update form.
pub fn order_status_field() -> FieldDescriptor {
    let options = OrderStatus::ALL
        .iter()
        .map(|s| SelectOption::new(s.as_str(), s.label()))
        .collect();
    FieldDescriptor::new("status", "Status", FieldKind::Select { options }).required()
}

// =============================================================================
// Parsing Helpers
// =============================================================================

/// Parses a number typed the Brazilian or the international way.
///
/// ```rust
/// use sapore_core::fields::parse_decimal;
///
/// assert_eq!(parse_decimal("R$ 1.234,56"), Some(1234.56));
/// assert_eq!(parse_decimal("12.5"), Some(12.5));
/// assert_eq!(parse_decimal("doze"), None);
/// ```
pub fn parse_decimal(input: &str) -> Option<f64> {
    let s = input.trim().trim_start_matches("R$").trim();
    let normalized = if s.contains(',') {
        s.replace('.', "").replace(',', ".")
    } else {
        s.to_string()
    };
    normalized.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parses `YYYY-MM-DD` or `DD/MM/YYYY`.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let s = input.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .ok()
}

// =============================================================================
// Unit Tests
// =============================================================================
