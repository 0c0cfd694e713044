//! Configuration types for the resource consumer.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`ConsumerConfig`]: The configuration shared by every client and resource
//! - [`ConsumerConfigBuilder`]: A builder for constructing [`ConsumerConfig`] instances
//! - [`BaseUrl`]: A validated API root URL
//! - [`OutputFormat`]: The `format` query parameter sent with each request
//!
//! # Example
//!
//! ```rust
//! use drf_consumer::{BaseUrl, ConsumerConfig};
//!
//! let config = ConsumerConfig::builder()
//!     .base_url(BaseUrl::new("https://example.com/api").unwrap())
//!     .verbose_errors(true)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.output_format().as_ref(), "json");
//! ```

mod newtypes;

pub use newtypes::{BaseUrl, OutputFormat};

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Configuration for the resource consumer.
///
/// Applying a configuration to a [`RestClient`](crate::RestClient) always
/// resets its pagination cursor.
///
/// # Thread Safety
///
/// `ConsumerConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct ConsumerConfig {
    base_url: BaseUrl,
    output_format: OutputFormat,
    verbose_errors: bool,
    user_agent_prefix: Option<String>,
    headers: HashMap<String, String>,
    payload_log_dir: Option<PathBuf>,
}

impl ConsumerConfig {
    /// Creates a new builder for constructing a `ConsumerConfig`.
    #[must_use]
    pub fn builder() -> ConsumerConfigBuilder {
        ConsumerConfigBuilder::new()
    }

    /// Shorthand for a configuration with only a base URL.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the URL fails validation.
    ///
    /// # Example
    ///
    /// ```rust
    /// use drf_consumer::ConsumerConfig;
    ///
    /// let config = ConsumerConfig::new("http://test.com/api").unwrap();
    /// assert!(!config.verbose_errors());
    /// ```
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        Self::builder().base_url(BaseUrl::new(base_url)?).build()
    }

    /// Returns the API root URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the output format sent as the `format` query parameter.
    #[must_use]
    pub const fn output_format(&self) -> &OutputFormat {
        &self.output_format
    }

    /// Returns whether error messages include the request URL and raw body.
    #[must_use]
    pub const fn verbose_errors(&self) -> bool {
        self.verbose_errors
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the extra headers that override the client defaults.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Returns the directory `save()` appends payload logs to, if any.
    #[must_use]
    pub fn payload_log_dir(&self) -> Option<&Path> {
        self.payload_log_dir.as_deref()
    }
}

// Verify ConsumerConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ConsumerConfig>();
};

/// Builder for constructing [`ConsumerConfig`] instances.
///
/// `base_url` is required. Defaults:
///
/// - `output_format`: `json`
/// - `verbose_errors`: `false`
/// - `user_agent_prefix`: `None`
/// - `headers`: empty
/// - `payload_log_dir`: `None`
#[derive(Debug, Default)]
pub struct ConsumerConfigBuilder {
    base_url: Option<BaseUrl>,
    output_format: Option<OutputFormat>,
    verbose_errors: Option<bool>,
    user_agent_prefix: Option<String>,
    headers: HashMap<String, String>,
    payload_log_dir: Option<PathBuf>,
}

impl ConsumerConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API root URL (required).
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    /// Enables the request URL and raw response body in error messages.
    #[must_use]
    pub const fn verbose_errors(mut self, verbose: bool) -> Self {
        self.verbose_errors = Some(verbose);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Adds a header sent with every request, replacing any default of the same name.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Enables the payload log written by `save()`.
    #[must_use]
    pub fn payload_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.payload_log_dir = Some(dir.into());
        self
    }

    /// Builds the [`ConsumerConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `base_url` is not set.
    pub fn build(self) -> Result<ConsumerConfig, ConfigError> {
        let base_url = self
            .base_url
            .ok_or(ConfigError::MissingRequiredField { field: "base_url" })?;

        Ok(ConsumerConfig {
            base_url,
            output_format: self.output_format.unwrap_or_default(),
            verbose_errors: self.verbose_errors.unwrap_or(false),
            user_agent_prefix: self.user_agent_prefix,
            headers: self.headers,
            payload_log_dir: self.payload_log_dir,
        })
    }
}
