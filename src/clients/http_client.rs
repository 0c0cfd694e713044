//! HTTP transport.
//!
//! This module provides the [`HttpClient`] type, the leaf layer that sends
//! one request per logical operation and reports the status and body.

use std::collections::HashMap;

use crate::clients::errors::HttpError;
use crate::clients::http_request::{DataType, HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::ConsumerConfig;

/// Library version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for resource endpoints.
///
/// The client handles:
/// - Default headers (`User-Agent`, `Accept`, `Content-Type`)
/// - Header overrides from [`ConsumerConfig`]
/// - Response decoding into [`HttpResponse`]
///
/// Every response is returned as-is, whatever its status code; retries,
/// authentication and caching are left to the caller.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, and cloning it shares the underlying
/// connection pool.
///
/// # Example
///
/// ```rust,ignore
/// use drf_consumer::{ConsumerConfig, HttpClient, HttpRequest, HttpMethod};
///
/// let config = ConsumerConfig::new("https://example.com/api")?;
/// let client = HttpClient::new(&config);
///
/// let request = HttpRequest::builder(HttpMethod::Get, "https://example.com/api/user/?format=json")
///     .build()?;
///
/// let response = client.request(request).await?;
/// ```
#[derive(Clone, Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client for the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS initialization failure).
    #[must_use]
    pub fn new(config: &ConsumerConfig) -> Self {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            default_headers: Self::build_default_headers(config),
        }
    }

    /// Re-derives the default headers from a new configuration, keeping the
    /// connection pool.
    pub fn reconfigure(&mut self, config: &ConsumerConfig) {
        self.default_headers = Self::build_default_headers(config);
    }

    fn build_default_headers(config: &ConsumerConfig) -> HashMap<String, String> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}DRF Consumer Library v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert(
            "Content-Type".to_string(),
            DataType::Json.as_content_type().to_string(),
        );

        for (key, value) in config.headers() {
            // Replace case-insensitively so an override never duplicates a default.
            default_headers.retain(|existing, _| !existing.eq_ignore_ascii_case(key));
            default_headers.insert(key.clone(), value.clone());
        }

        default_headers
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends an HTTP request.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - The request could not be exchanged (`Network`), including timeouts
    ///   and bodies that cannot be read in full
    ///
    /// Non-2xx responses are returned as `Ok`.
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let mut headers = self.default_headers.clone();
        if let Some(body_type) = &request.body_type {
            // A configured Content-Type wins over the body type.
            let has_content_type = headers
                .keys()
                .any(|key| key.eq_ignore_ascii_case("content-type"));
            if !has_content_type {
                headers.insert(
                    "Content-Type".to_string(),
                    body_type.as_content_type().to_string(),
                );
            }
        }

        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Put => self.client.put(&request.url),
            HttpMethod::Patch => self.client.patch(&request.url),
            HttpMethod::Delete => self.client.delete(&request.url),
        };

        for (key, value) in &headers {
            req_builder = req_builder.header(key, value);
        }

        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.to_string());
        }

        tracing::debug!(method = %request.http_method, url = %request.url, "sending request");

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await?;

        tracing::debug!(
            method = %request.http_method,
            url = %request.url,
            status = code,
            "received response"
        );

        Ok(HttpResponse::new(
            request.http_method,
            request.url,
            code,
            res_headers,
            body_text,
        ))
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}
