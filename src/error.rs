use serde::Serialize;
use thiserror::Error;

/// Failure to build a property report
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetailError {
    #[error("Property not found: {id}")]
    NotFound { id: String },

    #[error("Catalog error: {0}")]
    Catalog(String),
}

/// A single rejected form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Failure reported by an email dispatcher
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    /// Network failure before a response was received
    #[error("Email transport failed: {0}")]
    Transport(String),

    /// Provider answered with a non-success status
    #[error("Email provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    /// Provider credentials or addresses are missing
    #[error("Email provider not configured: {0}")]
    Configuration(String),
}

impl DispatchError {
    /// HTTP-style status a caller would observe for this failure
    pub fn status(&self) -> u16 {
        match self {
            DispatchError::Transport(_) => 502,
            DispatchError::Provider { status, .. } => *status,
            DispatchError::Configuration(_) => 500,
        }
    }
}

/// Failure of a form submission
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LeadError {
    #[error("Invalid submission: {}", summarize(.0))]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("Failed to persist unlock state: {0}")]
    Storage(String),
}

impl LeadError {
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            LeadError::Validation(errors) => errors,
            _ => &[],
        }
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}
