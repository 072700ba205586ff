//! # Command Error Type
//!
//! Unified error type for console commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Console                            │
//! │                                                                         │
//! │  $ sapore customers create ...                                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  CommandResult<CommandOutput>                                    │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Backend Error? ──── ClientError::Api { 409, .. } ──┐            │  │
//! │  │         │                                           │            │  │
//! │  │         ▼                                           ▼            │  │
//! │  │  Validation Error? ── ValidationError ────── UserNotice ──► code │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────► │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stderr: "Registro duplicado: Já existe um registro com esses dados."   │
//! │  exit status: 65                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The technical cause is logged at debug level; the operator only sees the
//! notice.

use serde::Serialize;
use tracing::debug;

use sapore_client::{ClientError, NoticeKind, UserNotice};
use sapore_core::{CoreError, ValidationError};

/// Error returned from console commands.
///
/// ## Serialization
/// With `--json`, this is what lands on stderr:
/// ```json
/// {
///   "code": "DUPLICATE",
///   "title": "Registro duplicado",
///   "message": "Já existe um registro com esses dados."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
    /// Machine-readable error code for scripts
    pub code: ErrorCode,

    pub title: String,

    /// Human-readable message for display
    pub message: String,
}

/// Error codes, one per exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input rejected locally or with HTTP 400
    Invalid,

    /// Record already exists (409)
    Duplicate,

    /// Record not found (404)
    NotFound,

    /// No token, expired token, 401 or 403
    SessionExpired,

    /// Backend unreachable or too slow
    Unavailable,

    /// Anything else
    Internal,
}

impl ErrorCode {
    /// Process exit status, following the BSD `sysexits` numbering.
    pub const fn exit_code(&self) -> u8 {
        match self {
            ErrorCode::Invalid | ErrorCode::Duplicate => 65,
            ErrorCode::NotFound => 66,
            ErrorCode::Unavailable => 69,
            ErrorCode::Internal => 70,
            ErrorCode::SessionExpired => 77,
        }
    }
}

impl From<NoticeKind> for ErrorCode {
    fn from(kind: NoticeKind) -> Self {
        match kind {
            NoticeKind::Duplicate => ErrorCode::Duplicate,
            NoticeKind::Invalid => ErrorCode::Invalid,
            NoticeKind::NotFound => ErrorCode::NotFound,
            NoticeKind::SessionExpired => ErrorCode::SessionExpired,
            NoticeKind::Unavailable => ErrorCode::Unavailable,
            NoticeKind::Generic => ErrorCode::Internal,
        }
    }
}

impl CommandError {
    pub fn new(code: ErrorCode, title: impl Into<String>, message: impl Into<String>) -> Self {
        CommandError {
            code,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Creates a not found error for a record missing from a fetched list.
    pub fn not_found(resource: &str, id: &str) -> Self {
        CommandError::new(
            ErrorCode::NotFound,
            "Não encontrado",
            format!("{} {} não encontrado.", resource, id),
        )
    }

    pub fn exit_code(&self) -> u8 {
        self.code.exit_code()
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

impl std::error::Error for CommandError {}

impl From<UserNotice> for CommandError {
    fn from(notice: UserNotice) -> Self {
        CommandError {
            code: notice.kind.into(),
            title: notice.title,
            message: notice.message,
        }
    }
}

/// Every client failure goes through [`UserNotice::from_error`].
impl From<ClientError> for CommandError {
    fn from(err: ClientError) -> Self {
        debug!(error = %err, "Command failed");
        UserNotice::from_error(&err).into()
    }
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        ClientError::from(err).into()
    }
}

impl From<ValidationError> for CommandError {
    fn from(err: ValidationError) -> Self {
        ClientError::from(err).into()
    }
}

impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        ClientError::from(err).into()
    }
}

/// Result type for console commands.
pub type CommandResult<T> = Result<T, CommandError>;
