//! # Client Error Types
//!
//! Error types for backend calls, the session store and configuration, plus
//! the mapping from any of them to what the operator is shown.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Backend             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Connection     │  │  Api { status, message }│ │
//! │  │  InvalidUrl     │  │  Timeout        │  │  Deserialization        │ │
//! │  │  ConfigLoad/Save│  │  Request        │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    Session      │  │     Local       │  │      Domain             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  NotLoggedIn    │  │  Io             │  │  Core(CoreError)        │ │
//! │  │  InvalidToken   │  │  UnsupportedPhoto│ │  Validation             │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │                 every variant ──► UserNotice::from_error                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use sapore_core::{CoreError, ValidationError};

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Client error type covering every failure outside the pure core.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Backend unreachable.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(String),

    // =========================================================================
    // Backend Errors
    // =========================================================================
    /// Non-2xx response. `message` is the backend's own text when it sent one.
    #[error("Backend returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response body: {0}")]
    Deserialization(String),

    // =========================================================================
    // Session Errors
    // =========================================================================
    #[error("Not logged in. Run `sapore login` first.")]
    NotLoggedIn,

    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    // =========================================================================
    // Local Errors
    // =========================================================================
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Unsupported photo type '{extension}' (accepted: png, jpg, jpeg, webp, gif)")]
    UnsupportedPhoto { extension: String },

    // =========================================================================
    // Domain Errors
    // =========================================================================
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_connect() {
            ClientError::ConnectionFailed(err.to_string())
        } else if err.is_decode() {
            ClientError::Deserialization(err.to_string())
        } else {
            ClientError::Request(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Deserialization(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for ClientError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        ClientError::InvalidToken(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// HTTP status of a backend rejection, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the session is gone and the operator must log in again.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ClientError::NotLoggedIn | ClientError::InvalidToken(_))
            || matches!(self.status(), Some(401) | Some(403))
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
                | ClientError::ConfigSaveFailed(_)
        )
    }
}

// =============================================================================
// User Notices
// =============================================================================

/// Fragments that mark a backend message as a duplicate-record rejection.
const DUPLICATE_MARKERS: &[&str] = &[
    "already exists",
    "duplicate",
    "já existe",
    "já cadastrad",
    "unique",
];

/// Broad category of a notice, for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Duplicate,
    Invalid,
    NotFound,
    SessionExpired,
    Unavailable,
    Generic,
}

/// What the operator is shown when an action fails.
///
/// ## Mapping
/// ```text
/// 409, or text matching a duplicate marker ──► "Registro duplicado"
/// 400 / local validation                   ──► backend message as-is
/// 404                                      ──► "Não encontrado"
/// 401 / 403 / no token                     ──► "Sessão expirada"
/// unreachable / timeout                    ──► "Servidor indisponível"
/// bad console.toml or environment          ──► "Configuração inválida"
/// anything else                            ──► generic failure
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserNotice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl UserNotice {
    fn new(kind: NoticeKind, title: &str, message: impl Into<String>) -> Self {
        UserNotice {
            kind,
            title: title.to_string(),
            message: message.into(),
        }
    }

    pub fn from_error(err: &ClientError) -> Self {
        let text = match err {
            ClientError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        };
        let lowered = text.to_lowercase();

        if err.status() == Some(409) || DUPLICATE_MARKERS.iter().any(|m| lowered.contains(m)) {
            return UserNotice::new(
                NoticeKind::Duplicate,
                "Registro duplicado",
                "Já existe um registro com esses dados.",
            );
        }

        match err {
            ClientError::Api { status: 400, message } if !message.trim().is_empty() => {
                UserNotice::new(NoticeKind::Invalid, "Dados inválidos", message.trim())
            }
            ClientError::Api { status: 400, .. } => UserNotice::new(
                NoticeKind::Invalid,
                "Dados inválidos",
                "Verifique os campos e tente novamente.",
            ),
            ClientError::Validation(e) | ClientError::Core(CoreError::Validation(e)) => {
                UserNotice::new(NoticeKind::Invalid, "Dados inválidos", e.to_string())
            }
            ClientError::Core(e) => UserNotice::new(NoticeKind::Invalid, "Operação recusada", e.to_string()),
            ClientError::Api { status: 404, .. } => UserNotice::new(
                NoticeKind::NotFound,
                "Não encontrado",
                "O registro solicitado não foi encontrado.",
            ),
            e if e.is_auth_error() => UserNotice::new(
                NoticeKind::SessionExpired,
                "Sessão expirada",
                "Faça login novamente.",
            ),
            e if e.is_config_error() => {
                UserNotice::new(NoticeKind::Invalid, "Configuração inválida", e.to_string())
            }
            ClientError::ConnectionFailed(_) | ClientError::Timeout => UserNotice::new(
                NoticeKind::Unavailable,
                "Servidor indisponível",
                "Não foi possível contatar o servidor. Tente novamente.",
            ),
            _ => UserNotice::new(
                NoticeKind::Generic,
                "Erro",
                "Não foi possível concluir a operação. Tente novamente.",
            ),
        }
    }
}

impl std::fmt::Display for UserNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

impl From<&ClientError> for UserNotice {
    fn from(err: &ClientError) -> Self {
        UserNotice::from_error(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16, message: &str) -> ClientError {
        ClientError::Api {
            status,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_conflict_is_duplicate() {
        assert_eq!(UserNotice::from_error(&api(409, "")).kind, NoticeKind::Duplicate);
    }

    #[test]
    fn test_duplicate_markers_match_any_status() {
        for msg in [
            "Customer already exists",
            "DUPLICATE key value",
            "Cliente já existe",
            "Documento já cadastrado",
            "violates unique constraint",
        ] {
            assert_eq!(
                UserNotice::from_error(&api(500, msg)).kind,
                NoticeKind::Duplicate,
                "{msg}"
            );
        }
    }

    #[test]
    fn test_bad_request_passes_message_through() {
        let notice = UserNotice::from_error(&api(400, "Nome é obrigatório"));
        assert_eq!(notice.kind, NoticeKind::Invalid);
        assert_eq!(notice.message, "Nome é obrigatório");

        let empty = UserNotice::from_error(&api(400, "  "));
        assert_eq!(empty.message, "Verifique os campos e tente novamente.");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(UserNotice::from_error(&api(404, "nope")).kind, NoticeKind::NotFound);
        assert_eq!(UserNotice::from_error(&api(401, "")).kind, NoticeKind::SessionExpired);
        assert_eq!(UserNotice::from_error(&api(403, "")).kind, NoticeKind::SessionExpired);
        assert_eq!(UserNotice::from_error(&ClientError::NotLoggedIn).kind, NoticeKind::SessionExpired);
        assert_eq!(UserNotice::from_error(&api(502, "bad gateway")).kind, NoticeKind::Generic);
        assert_eq!(UserNotice::from_error(&ClientError::Timeout).kind, NoticeKind::Unavailable);
    }

    #[test]
    fn test_local_validation_is_invalid() {
        let err: ClientError = ValidationError::Required {
            field: "name".to_string(),
        }
        .into();
        let notice = UserNotice::from_error(&err);
        assert_eq!(notice.kind, NoticeKind::Invalid);
        assert!(notice.message.contains("name"));
    }

    #[test]
    fn test_config_problems_keep_their_reason() {
        let err = ClientError::InvalidConfig("timeout_secs must be greater than 0".into());
        let notice = UserNotice::from_error(&err);
        assert_eq!(notice.kind, NoticeKind::Invalid);
        assert_eq!(notice.title, "Configuração inválida");
        assert!(notice.message.contains("timeout_secs"), "{}", notice.message);
    }

    #[test]
    fn test_categories() {
        assert!(api(401, "").is_auth_error());
        assert!(!api(500, "").is_auth_error());
        assert!(ClientError::InvalidConfig("x".into()).is_config_error());
        assert_eq!(api(418, "").status(), Some(418));
    }
}
