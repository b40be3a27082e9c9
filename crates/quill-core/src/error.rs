//! Host-level error type.
//!
//! Extension runtime errors carry their own enum; at the process boundary
//! (configuration, persistence, the CLI) everything is folded into
//! [`AppError`], a category plus a message.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad category of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// An extension, command, or setting id is unknown.
    NotFound,
    /// Bad input, or an operation attempted from the wrong lifecycle state.
    Validation,
    /// An id is already taken by another registration.
    Conflict,
    /// Extension code failed while activating, deactivating, or running.
    Extension,
    /// Reading or writing persisted data failed.
    Storage,
    /// Configuration could not be loaded.
    Configuration,
    /// JSON could not be encoded or decoded.
    Serialization,
}

impl ErrorKind {
    /// Stable upper-case code, as printed in error messages.
    pub fn code(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Validation => "VALIDATION",
            Self::Conflict => "CONFLICT",
            Self::Extension => "EXTENSION",
            Self::Storage => "STORAGE",
            Self::Configuration => "CONFIGURATION",
            Self::Serialization => "SERIALIZATION",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error surfaced at the host boundary.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    /// Underlying cause; not preserved by `Clone`.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    fn caused_by(
        kind: ErrorKind,
        message: String,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Bad input.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Configuration could not be loaded.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self::new(self.kind, self.message.clone())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::caused_by(ErrorKind::Serialization, format!("invalid JSON: {err}"), err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::caused_by(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::caused_by(ErrorKind::Configuration, err.to_string(), err)
    }
}
