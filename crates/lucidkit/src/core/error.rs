//! Core error types
//!
//! Every fallible operation in the crate reports a [`LucidError`]. Validation
//! and usage errors are raised locally and synchronously; API and transport
//! errors carry whatever the remote service or the HTTP stack reported.

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, LucidError>;

/// Errors raised while building, serializing or uploading documents
#[derive(Error, Debug)]
pub enum LucidError {
    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Usage error: {message}")]
    Usage { message: String },

    #[error("API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Transport error: {source}")]
    Transport {
        #[from]
        source: reqwest::Error,
    },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    #[error("Archive error: {source}")]
    Archive {
        #[from]
        source: zip::result::ZipError,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl LucidError {
    /// Create a new validation error naming the offending field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Create a new API error from a non-success response
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Field named by a validation error
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = LucidError::validation("boundingBox.w", "must not be negative");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Validation error"));
        assert!(error_msg.contains("boundingBox.w"));
        assert!(error_msg.contains("must not be negative"));
        assert_eq!(error.field(), Some("boundingBox.w"));
        assert!(error.is_validation());
    }

    #[test]
    fn test_usage_error() {
        let error = LucidError::usage("columns must be positive");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Usage error"));
        assert!(error.is_usage());
        assert!(!error.is_validation());
    }

    #[test]
    fn test_api_error_keeps_status_and_body() {
        let error = LucidError::api(403, r#"{"error":"forbidden"}"#);
        assert_eq!(error.status(), Some(403));
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("HTTP 403"));
        assert!(error_msg.contains(r#"{"error":"forbidden"}"#));
    }

    #[test]
    fn test_config_error() {
        let error = LucidError::config("no API key");
        assert!(format!("{}", error).contains("Configuration error"));
        assert_eq!(error.status(), None);
    }

    #[test]
    fn test_io_error_conversion() {
        use std::io;
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: LucidError = io_err.into();
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("IO error"));
        assert!(error_msg.contains("File not found"));
    }

    #[test]
    fn test_serde_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: LucidError = json_err.into();
        assert!(format!("{}", error).contains("Serialization error"));
    }
}
