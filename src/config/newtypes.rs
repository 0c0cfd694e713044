//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated API root URL.
///
/// The URL must carry an `http` or `https` scheme and a host. Trailing
/// slashes are trimmed so that resource paths can be appended with a single
/// `/` separator.
///
/// # Example
///
/// ```rust
/// use drf_consumer::BaseUrl;
///
/// let url = BaseUrl::new("https://example.com/api/").unwrap();
/// assert_eq!(url.as_ref(), "https://example.com/api");
/// assert_eq!(url.scheme(), "https");
/// assert_eq!(url.host_name(), "example.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    url: String,
    scheme_end: usize,
    host_end: usize,
}

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyBaseUrl`] if the URL is empty and
    /// [`ConfigError::InvalidBaseUrl`] if it has no http(s) scheme or host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();
        if url.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }

        let scheme_end = url
            .find("://")
            .ok_or_else(|| ConfigError::InvalidBaseUrl { url: url.clone() })?;

        let scheme = url[..scheme_end].to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(ConfigError::InvalidBaseUrl { url });
        }

        // Host ends at port, path, query, or end of string
        let host_start = scheme_end + 3;
        let remainder = &url[host_start..];
        let host_end = remainder
            .find([':', '/', '?', '#'])
            .map_or(url.len(), |i| host_start + i);

        if host_end == host_start || url[host_start..].contains(['?', '#']) {
            return Err(ConfigError::InvalidBaseUrl { url });
        }

        Ok(Self {
            url,
            scheme_end,
            host_end,
        })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.url[self.scheme_end + 3..self.host_end]
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl Serialize for BaseUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.url)
    }
}

impl<'de> Deserialize<'de> for BaseUrl {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

/// The `format` query parameter sent with every request.
///
/// Defaults to `json`. The value is placed verbatim in the query string, so
/// it may not contain `&`, `?`, `#`, `=` or whitespace.
///
/// # Example
///
/// ```rust
/// use drf_consumer::OutputFormat;
///
/// assert_eq!(OutputFormat::default().as_ref(), "json");
/// assert!(OutputFormat::new("api").is_ok());
/// assert!(OutputFormat::new("json&x=1").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputFormat(String);

impl OutputFormat {
    /// Creates a new validated output format.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOutputFormat`] if the format is empty or
    /// contains query-string delimiters.
    pub fn new(format: impl Into<String>) -> Result<Self, ConfigError> {
        let format = format.into();
        let invalid = format.is_empty()
            || format
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '&' | '?' | '#' | '='));
        if invalid {
            return Err(ConfigError::InvalidOutputFormat { format });
        }
        Ok(Self(format))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self("json".to_string())
    }
}

impl AsRef<str> for OutputFormat {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
