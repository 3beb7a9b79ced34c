//! Error types shared by every Directus adapter.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for Directus operations.
pub type Result<T> = std::result::Result<T, DirectusError>;

/// One entry of the backend error envelope.
///
/// Directus answers failed requests with
/// `{ "errors": [{ "message": "...", "extensions": { "code": "..." } }] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorEntry {
    /// Human readable message.
    pub message: String,
    /// Machine readable metadata (error code and friends).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ApiErrorExtensions>,
}

/// Extension block of an [`ApiErrorEntry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorExtensions {
    /// Error code, e.g. `INVALID_CREDENTIALS` or `FORBIDDEN`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ApiErrorEntry {
    /// Create an entry with a message and an error code.
    #[must_use]
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            extensions: Some(ApiErrorExtensions {
                code: Some(code.into()),
            }),
        }
    }

    /// Error code, if the backend sent one.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.extensions.as_ref().and_then(|ext| ext.code.as_deref())
    }
}

/// Errors that can occur when talking to a Directus backend.
///
/// Every adapter operation returns this type. Failures are also logged once
/// by the adapter through [`DirectusError::log_failure`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DirectusError {
    // ═══════════════════════════════════════════════════════════
    // Backend / network errors
    // ═══════════════════════════════════════════════════════════

    /// The backend answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// First error message of the envelope (or the status text)
        message: String,
        /// Full error envelope
        errors: Vec<ApiErrorEntry>,
    },

    /// HTTP request could not be performed.
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response body could not be decoded.
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    // ═══════════════════════════════════════════════════════════
    // Locally raised errors
    // ═══════════════════════════════════════════════════════════

    /// Refresh token required but not found in argument, session or cookie.
    #[error("No refresh token found")]
    MissingRefreshToken,

    /// Static token requested but none is configured.
    #[error("No static token configured")]
    MissingStaticToken,

    /// Item operations cannot target system collections.
    #[error("Cannot use {operation} for core collection '{collection}'")]
    CoreCollection {
        /// Operation that was attempted
        operation: &'static str,
        /// Offending collection name
        collection: String,
    },

    /// A collection name or primary key is empty.
    #[error("Empty {argument} is not valid for {operation}")]
    EmptyArgument {
        /// Operation that was attempted
        operation: &'static str,
        /// `collection` or `key`
        argument: &'static str,
    },

    /// Payload could not be encoded as JSON.
    #[error("Payload serialization failed: {0}")]
    SerializationFailed(String),

    /// Configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DirectusError {
    /// Backend error entries carried by this error (empty for local errors).
    #[must_use]
    pub fn errors(&self) -> &[ApiErrorEntry] {
        match self {
            Self::Api { errors, .. } => errors,
            _ => &[],
        }
    }

    /// HTTP status, if the error came from the backend.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if the backend rejected the credentials or token.
    ///
    /// # Examples
    ///
    /// ```
    /// # use directus_composable_core::DirectusError;
    /// let err = DirectusError::Api { status: 401, message: "Invalid user credentials.".into(), errors: vec![] };
    /// assert!(err.is_unauthorized());
    /// assert!(!DirectusError::MissingRefreshToken.is_unauthorized());
    /// ```
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. })
    }

    /// Log this error under a fixed, per-operation context message.
    ///
    /// Backend errors are logged with their error envelope, everything else
    /// is logged as-is.
    pub fn log_failure(&self, context: &'static str) {
        match self {
            Self::Api { status, errors, .. } => {
                let detail = serde_json::to_string(errors).unwrap_or_default();
                tracing::error!(status = *status, errors = %detail, "{context}");
            }
            other => {
                tracing::error!(error = %other, "{context}");
            }
        }
    }
}

impl From<serde_json::Error> for DirectusError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationFailed(err.to_string())
    }
}
