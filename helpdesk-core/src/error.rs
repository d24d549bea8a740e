//! Unified error handling system
//!
//! Provides the error classification shared by every component, and the
//! structured error type used for configuration and I/O failures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

pub type HelpdeskResult<T> = Result<T, HelpdeskError>;

/// Classification of a failure, independent of the component that raised it.
///
/// The HTTP layer picks the response status from this value alone, so a
/// component must never rely on its message text to signal a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad or missing request fields
    ClientInput,
    /// A credential or setting required by a component is missing or invalid
    Configuration,
    /// The upstream could not be reached or did not answer in time
    UpstreamTransport,
    /// The upstream answered with a non-success status
    UpstreamService,
    /// The upstream model is still loading (HTTP 503 from the chat service)
    UpstreamLoading,
    /// A query vector was malformed or could not be produced
    RetrievalFormat,
}

impl ErrorKind {
    /// HTTP status code a caller should see for this kind of failure
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::ClientInput => 400,
            ErrorKind::UpstreamLoading => 503,
            ErrorKind::Configuration
            | ErrorKind::UpstreamTransport
            | ErrorKind::UpstreamService
            | ErrorKind::RetrievalFormat => 500,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ClientInput => "client_input",
            ErrorKind::Configuration => "configuration",
            ErrorKind::UpstreamTransport => "upstream_transport",
            ErrorKind::UpstreamService => "upstream_service",
            ErrorKind::UpstreamLoading => "upstream_loading",
            ErrorKind::RetrievalFormat => "retrieval_format",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implemented by every component error so callers can classify it.
pub trait Classify {
    fn kind(&self) -> ErrorKind;
}

/// Error context providing additional information for debugging and recovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
    /// Recovery suggestions
    pub recovery_suggestions: Vec<String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
            recovery_suggestions: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.recovery_suggestions.push(suggestion.to_string());
        self
    }
}

/// Error type for configuration loading and process-level failures
#[derive(Error, Debug)]
pub enum HelpdeskError {
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
        context: ErrorContext,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HelpdeskError {
    /// Get the error context
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            HelpdeskError::Config { context, .. } => Some(context),
            HelpdeskError::Validation { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            HelpdeskError::Validation { .. } => {
                warn!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Validation error"
                );
            }
            _ => {
                error!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Configuration error"
                );
            }
        }
    }
}

/// Only configuration loading produces these, so every variant is a
/// configuration problem rather than bad request input.
impl Classify for HelpdeskError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Configuration
    }
}

/// Convenience macros for creating errors with context
#[macro_export]
macro_rules! config_error {
    ($msg:expr, $component:expr) => {
        $crate::HelpdeskError::Config {
            message: $msg.to_string(),
            source: None,
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check your configuration file and environment variables"),
        }
    };
    ($msg:expr, $component:expr, $source:expr) => {
        $crate::HelpdeskError::Config {
            message: $msg.to_string(),
            source: Some(Box::new($source)),
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check your configuration file and environment variables"),
        }
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr, $field:expr, $component:expr) => {
        $crate::HelpdeskError::Validation {
            message: $msg.to_string(),
            field: Some($field.to_string()),
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check the field value and format"),
        }
    };
}
