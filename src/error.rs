//! Configuration error types.
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use drf_consumer::{BaseUrl, ConfigError};
//!
//! let result = BaseUrl::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyBaseUrl)));
//! ```

use thiserror::Error;

/// Errors that can occur while building a [`ConsumerConfig`](crate::ConsumerConfig).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Base URL cannot be empty.
    #[error("Base URL cannot be empty. Please provide the root URL of the API (e.g., 'https://example.com/api').")]
    EmptyBaseUrl,

    /// Base URL is not an absolute http(s) URL.
    #[error("Invalid base URL '{url}'. Please provide a valid URL with scheme (e.g., 'https://example.com/api').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// Output format is empty or would break the query string.
    #[error("Invalid output format '{format}'. Expected a bare format name such as 'json'.")]
    InvalidOutputFormat {
        /// The invalid format that was provided.
        format: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_base_url_error_message() {
        let message = ConfigError::EmptyBaseUrl.to_string();
        assert!(message.contains("Base URL cannot be empty"));
    }

    #[test]
    fn test_invalid_base_url_error_includes_url() {
        let error = ConfigError::InvalidBaseUrl {
            url: "ftp://nope".to_string(),
        };
        assert!(error.to_string().contains("ftp://nope"));
    }

    #[test]
    fn test_missing_required_field_error_message() {
        let error = ConfigError::MissingRequiredField { field: "base_url" };
        let message = error.to_string();
        assert!(message.contains("base_url"));
        assert!(message.contains("must be set"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::EmptyBaseUrl;
        let _: &dyn std::error::Error = &error;
    }
}
