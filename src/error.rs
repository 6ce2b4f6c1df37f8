use crate::pipeline::PipelineError;
use crate::transport::TransportError;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "provider.base_url")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "request_mapper", "provider_config")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the transformer.
///
/// Shape defects in provider payloads never reach this type: they are defaulted
/// in place. What remains is configuration, serialization and stream faults.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Pipeline processing error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Whether the error came from the upstream byte source rather than this crate.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_is_rendered_in_message() {
        let err = Error::configuration_with_context(
            "invalid base URL",
            ErrorContext::new()
                .with_field_path("provider.base_url")
                .with_source("request_mapper"),
        );
        let msg = err.to_string();
        assert!(msg.contains("invalid base URL"));
        assert!(msg.contains("field: provider.base_url"));
        assert!(msg.contains("source: request_mapper"));
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("provider.base_url")
        );
    }

    #[test]
    fn test_empty_context_adds_nothing() {
        let err = Error::configuration_with_context("boom", ErrorContext::default());
        assert_eq!(err.to_string(), "Configuration error: boom");
    }

    #[test]
    fn test_transport_classification() {
        let err: Error = TransportError::Other("reset by peer".into()).into();
        assert!(err.is_transport());
        let err: Error = PipelineError::Encoding("x".into()).into();
        assert!(!err.is_transport());
        assert!(err.context().is_none());
    }
}
