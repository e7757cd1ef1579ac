//! Error taxonomy of the sharing facade.
//!
//! Callers need to distinguish "your data was rejected" (validation, fix and
//! resubmit) from "the remote could not be reached" (transport, retry later)
//! from "this instance is misconfigured" (configuration, operator action).
//! The facade therefore exposes its own error enum instead of the generic
//! [`AppError`].

use thiserror::Error;

use caselink_core::error::{AppError, ErrorKind};
use caselink_core::types::ValidationErrors;

/// A specialized `Result` type for sharing operations.
pub type ShareResult<T> = Result<T, ShareError>;

/// Errors surfaced by the sharing facade.
#[derive(Debug, Error)]
pub enum ShareError {
    /// No local or remote sharing identity is registered, or key material is
    /// unusable. Fatal to the operation; never retried automatically.
    #[error("sharing is not properly configured: {0}")]
    Configuration(String),

    /// Encryption or decryption failed. Inbound, this means the envelope is
    /// untrusted or malformed and is rejected wholesale.
    #[error("shared data could not be encrypted or decrypted: {0}")]
    Crypto(String),

    /// Business-rule violations, aggregated across the whole batch. No entity
    /// of the batch was sent or persisted.
    #[error("{message}")]
    Validation {
        /// Summary message for display.
        message: String,
        /// Per-entity errors keyed by validation group.
        errors: ValidationErrors,
    },

    /// The remote instance could not be reached (connection refused, timeout,
    /// TLS failure).
    #[error("the remote instance could not be reached: {0}")]
    Connection(String),

    /// The remote instance was reached but its response could not be
    /// processed.
    #[error("the remote instance returned an unexpected response: {0}")]
    Processing(String),

    /// Anything else, kept as the underlying application error.
    #[error(transparent)]
    Internal(AppError),
}

impl ShareError {
    /// Convenience constructor for a validation failure.
    pub fn validation(message: impl Into<String>, errors: ValidationErrors) -> Self {
        Self::Validation {
            message: message.into(),
            errors,
        }
    }

    /// The aggregated validation errors, if this is a validation failure.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }
}

impl From<AppError> for ShareError {
    fn from(err: AppError) -> Self {
        match err.kind {
            ErrorKind::Configuration => Self::Configuration(err.message),
            ErrorKind::Crypto => Self::Crypto(err.message),
            ErrorKind::Transport => Self::Connection(err.message),
            _ => Self::Internal(err),
        }
    }
}
