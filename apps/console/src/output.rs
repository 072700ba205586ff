//! # Command Output
//!
//! Every command produces both a human rendering and a JSON value; the
//! global `--json` flag picks which one is printed.
//!
//! ```text
//! CommandOutput
//! ├── text   "3 clientes\n  7  Padaria Central ..."
//! └── json   [{ "id": "7", "name": "Padaria Central", ... }]
//! ```

use serde::Serialize;
use serde_json::Value;
use std::fmt::{Display, Write};

use crate::error::{CommandError, CommandResult, ErrorCode};

#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutput {
    text: String,
    json: Value,
}

impl CommandOutput {
    pub fn new(text: impl Into<String>, value: &impl Serialize) -> CommandResult<Self> {
        let json = serde_json::to_value(value).map_err(|e| {
            CommandError::new(ErrorCode::Internal, "Erro", format!("Falha ao gerar JSON: {}", e))
        })?;
        Ok(CommandOutput {
            text: text.into(),
            json,
        })
    }

    /// Output with no record attached, just a confirmation line.
    pub fn message(text: impl Into<String>) -> Self {
        let text = text.into();
        CommandOutput {
            json: serde_json::json!({ "message": text }),
            text,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn json(&self) -> &Value {
        &self.json
    }

    pub fn render(&self, json: bool) -> String {
        if json {
            serde_json::to_string_pretty(&self.json).unwrap_or_else(|_| self.json.to_string())
        } else {
            self.text.clone()
        }
    }
}

// =============================================================================
// Text Helpers
// =============================================================================

/// Renders an optional value, or "-" when absent.
pub(crate) fn or_dash<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Shortens `s` to `width` characters, marking the cut with '…'.
pub(crate) fn clip(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Writes a title line followed by one line per row.
pub(crate) fn listing<T>(title: &str, rows: &[T], line: impl Fn(&T) -> String) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", title, rows.len());
    for row in rows {
        let _ = writeln!(out, "  {}", line(row));
    }
    out.trim_end().to_string()
}

/// Formats a plain number the Brazilian way, dropping useless decimals.
pub(crate) fn decimal(value: f64) -> String {
    let s = format!("{:.4}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.replace('.', ",")
}
