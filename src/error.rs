//! Error types for Proton Pass CLI operations.

use std::time::Duration;
use thiserror::Error;

/// Result type alias using [`PassError`].
pub type Result<T> = std::result::Result<T, PassError>;

/// Maximum number of characters of unparsable CLI output kept in a
/// [`PassError::Parse`] message.
pub const PARSE_PREVIEW_CHARS: usize = 200;

/// Substrings that mark a CLI failure as an authentication problem.
///
/// Matched case-sensitively against the failure message.
pub const AUTH_FAILURE_KEYWORDS: &[&str] = &[
    "not logged in",
    "authentication",
    "sign in",
    "login required",
];

/// Errors that can occur while talking to `pass-cli`.
///
/// All errors implement `std::error::Error` and can be chained with `source()`.
#[derive(Debug, Error)]
pub enum PassError {
    /// The `pass-cli` binary could not be located or spawned.
    #[error("Proton Pass CLI (pass-cli) not found. Please install it and ensure it's in your PATH.")]
    CliNotFound,

    /// The CLI reported that the user must log in first.
    #[error("Authentication required. Please run 'pass-cli login' in your terminal.")]
    AuthenticationRequired,

    /// The CLI exited unsuccessfully for any other reason.
    #[error("{0}")]
    CommandFailed(String),

    /// The CLI produced output that is not the JSON we expected.
    #[error("Failed to parse CLI output: {message}")]
    Parse {
        /// Truncated preview of the offending payload
        message: String,
        /// Underlying decoder error
        #[source]
        source: serde_json::Error,
    },

    /// The CLI did not finish within the configured timeout.
    #[error("pass-cli timed out after {0:?}")]
    Timeout(Duration),

    /// The CLI wrote more output than the configured cap.
    #[error("pass-cli output exceeded {0} bytes")]
    OutputTooLarge(usize),

    /// A share id, item id or field name cannot be used in a `pass://` reference.
    #[error("invalid item reference: {0}")]
    InvalidReference(String),

    /// An operation failed with context about what was being done.
    #[error("{operation} {target}: {source}")]
    Operation {
        /// Operation name (item list, item view, ...)
        operation: String,
        /// What the operation was applied to (vault name, item id)
        target: String,
        /// Underlying error
        #[source]
        source: Box<PassError>,
    },

    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error (catch-all).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// The three kinds of failure callers are expected to react to.
///
/// `BinaryNotFound` and `AuthenticationRequired` lead to guided recovery
/// (install the CLI, run `pass-cli login`); everything else is surfaced with
/// its raw message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// `pass-cli` is missing.
    BinaryNotFound,
    /// `pass-cli` is present but not logged in.
    AuthenticationRequired,
    /// Any other failure.
    Failure,
}

impl PassError {
    /// Wraps an error with the operation and target that produced it.
    ///
    /// # Example
    ///
    /// ```
    /// use protonpass::{ErrorKind, PassError};
    ///
    /// let err = PassError::operation("item list", "Work", PassError::AuthenticationRequired);
    /// assert_eq!(err.kind(), ErrorKind::AuthenticationRequired);
    /// assert!(err.to_string().starts_with("item list Work: "));
    /// ```
    pub fn operation(
        operation: impl Into<String>,
        target: impl Into<String>,
        err: PassError,
    ) -> Self {
        Self::Operation {
            operation: operation.into(),
            target: target.into(),
            source: Box::new(err),
        }
    }

    /// Builds a parse error, keeping only a short preview of `payload`.
    pub fn parse(payload: &str, source: serde_json::Error) -> Self {
        Self::Parse {
            message: truncate_preview(payload),
            source,
        }
    }

    /// Returns the recovery-relevant kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CliNotFound => ErrorKind::BinaryNotFound,
            Self::AuthenticationRequired => ErrorKind::AuthenticationRequired,
            Self::Operation { source, .. } => source.kind(),
            _ => ErrorKind::Failure,
        }
    }

    /// Short heading suitable for a toast or error screen.
    pub fn title(&self) -> &'static str {
        match self {
            Self::CliNotFound => "CLI Not Found",
            Self::AuthenticationRequired => "Authentication Required",
            Self::Parse { .. } => "Parse Error",
            Self::Operation { source, .. } => source.title(),
            _ => "Proton Pass Error",
        }
    }
}

/// Classifies a failed CLI invocation.
///
/// An exit code listed in `auth_exit_codes` wins over message matching.
/// Otherwise the message is searched for [`AUTH_FAILURE_KEYWORDS`]; anything
/// else becomes [`PassError::CommandFailed`] carrying the raw message.
pub fn classify_failure(exit_code: Option<i32>, message: &str, auth_exit_codes: &[i32]) -> PassError {
    if let Some(code) = exit_code {
        if auth_exit_codes.contains(&code) {
            return PassError::AuthenticationRequired;
        }
    }

    if AUTH_FAILURE_KEYWORDS.iter().any(|k| message.contains(k)) {
        return PassError::AuthenticationRequired;
    }

    let message = message.trim();
    if message.is_empty() {
        PassError::CommandFailed(match exit_code {
            Some(code) => format!("pass-cli exited with code {}", code),
            None => "pass-cli terminated by signal".to_string(),
        })
    } else {
        PassError::CommandFailed(message.to_string())
    }
}

fn truncate_preview(payload: &str) -> String {
    let preview: String = payload.chars().take(PARSE_PREVIEW_CHARS).collect();
    format!("{}...", preview)
}
