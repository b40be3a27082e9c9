//! Error types for the extension runtime.

use thiserror::Error;

use quill_core::error::{AppError, ErrorKind};

use crate::lifecycle::state::ExtensionState;

/// Errors raised by the extension runtime.
///
/// Registration-time errors (`Duplicate*`) are returned to whoever is
/// loading extensions. Runtime errors (`Activation`, `CommandNotFound`,
/// `CommandExecution`, `Deactivation`) are contained to the offending
/// extension and also reported through the notification surface.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtensionError {
    #[error("Extension '{0}' is already registered")]
    DuplicateExtension(String),

    #[error("Command '{command}' is already registered by extension '{owner}'")]
    DuplicateCommand { command: String, owner: String },

    #[error("{kind} '{id}' is already registered by extension '{owner}'")]
    DuplicateContribution {
        kind: &'static str,
        id: String,
        owner: String,
    },

    #[error("Setting '{id}' is already declared by extension '{owner}'")]
    DuplicateSetting { id: String, owner: String },

    #[error("Extension '{0}' not found")]
    NotFound(String),

    #[error("Cannot {operation} extension '{id}' while it is {state}")]
    InvalidState {
        id: String,
        state: ExtensionState,
        operation: &'static str,
    },

    #[error("Extension '{id}' failed to activate: {message}")]
    Activation { id: String, message: String },

    #[error("Extension '{id}' failed to deactivate cleanly: {message}")]
    Deactivation { id: String, message: String },

    #[error("Command '{0}' not found")]
    CommandNotFound(String),

    #[error("Command '{command}' failed: {message}")]
    CommandExecution { command: String, message: String },

    #[error("Setting '{0}' not found")]
    SettingNotFound(String),

    #[error("Invalid value for setting '{id}': {message}")]
    InvalidSettingValue { id: String, message: String },

    #[error("The activation context of extension '{0}' has been revoked")]
    ContextRevoked(String),

    #[error("Failed to load persisted settings: {0}")]
    SettingsLoad(String),
}

impl ExtensionError {
    /// Maps the error onto the application-wide error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateExtension(_)
            | Self::DuplicateCommand { .. }
            | Self::DuplicateContribution { .. }
            | Self::DuplicateSetting { .. } => ErrorKind::Conflict,
            Self::NotFound(_) | Self::CommandNotFound(_) | Self::SettingNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::InvalidState { .. }
            | Self::InvalidSettingValue { .. }
            | Self::ContextRevoked(_) => ErrorKind::Validation,
            Self::Activation { .. } | Self::Deactivation { .. } | Self::CommandExecution { .. } => {
                ErrorKind::Extension
            }
            Self::SettingsLoad(_) => ErrorKind::Storage,
        }
    }
}

impl From<ExtensionError> for AppError {
    fn from(err: ExtensionError) -> Self {
        AppError::new(err.kind(), err.to_string())
    }
}

/// Result type for extension runtime operations.
pub type ExtensionResult<T> = Result<T, ExtensionError>;
