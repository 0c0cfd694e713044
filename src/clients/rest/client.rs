//! Resource mapping engine.
//!
//! This module provides the [`RestClient`] type, which turns resource
//! operations into requests against `{base_url}/{resource}/{id}` endpoints
//! and walks paginated collections with a stored cursor.

use std::fmt;

use serde_json::Value;

use crate::clients::{DataType, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse};
use crate::config::ConsumerConfig;
use crate::rest::{
    build_url, is_truthy, CollectionPage, Page, PageCursor, RemoteOperationError, ResourceError,
};

/// Raw-record client for a paginated REST API.
///
/// Each operation builds the endpoint URL from the configuration, sends one
/// request and checks the operation's success code. Anything else is
/// reported as a [`ResourceError`] and logged at `warn` level.
///
/// # Thread Safety
///
/// `RestClient` is `Send + Sync`. The pagination cursor is mutated through
/// `&mut self`, so a single walk is never shared between tasks.
///
/// # Example
///
/// ```rust,ignore
/// use drf_consumer::{ConsumerConfig, Page, RestClient};
/// use serde_json::json;
///
/// let mut client = RestClient::new(ConsumerConfig::new("https://example.com/api")?);
///
/// let users = client.list("user", &["ordering=-id"], Page::First).await?;
/// let more = client.list("user", &[], Page::Next).await?;
///
/// let created = client.create("user", json!({"name": "bob"}), &[]).await?;
/// ```
#[derive(Debug, Clone)]
pub struct RestClient {
    /// The internal HTTP client for making requests.
    http_client: HttpClient,
    /// Endpoint and reporting configuration.
    config: ConsumerConfig,
    /// Previous/next URLs of the collection being walked.
    cursor: PageCursor,
}

// Verify RestClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestClient>();
};

impl RestClient {
    /// Creates a new client with an empty cursor.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be created (see
    /// [`HttpClient::new`]).
    #[must_use]
    pub fn new(config: ConsumerConfig) -> Self {
        Self {
            http_client: HttpClient::new(&config),
            config,
            cursor: PageCursor::new(),
        }
    }

    /// Returns a client with the same configuration and connection pool,
    /// and an empty cursor.
    #[must_use]
    pub fn fork(&self) -> Self {
        Self {
            http_client: self.http_client.clone(),
            config: self.config.clone(),
            cursor: PageCursor::new(),
        }
    }

    /// Replaces the configuration and resets the cursor.
    pub fn configure(&mut self, config: ConsumerConfig) {
        tracing::debug!(base_url = %config.base_url(), "Reconfiguring rest client");
        self.http_client.reconfigure(&config);
        self.config = config;
        self.cursor.reset();
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ConsumerConfig {
        &self.config
    }

    /// Returns the pagination cursor left by the last `list` call.
    #[must_use]
    pub const fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    /// Builds the URL of a collection (`id == None`) or item endpoint.
    #[must_use]
    pub fn url(&self, resource: &str, id: Option<&str>, options: &[&str]) -> String {
        build_url(
            self.config.base_url().as_ref(),
            resource,
            id,
            self.config.output_format().as_ref(),
            options,
        )
    }

    /// Fetches one page of a collection.
    ///
    /// [`Page::First`] resets the cursor and fetches the first page with
    /// `options`. [`Page::Next`] and [`Page::Prev`] follow the URL stored by
    /// the previous call (`options` are not applied: the stored URL already
    /// carries the query); when no such URL is stored, an empty list is
    /// returned and no request is made.
    ///
    /// A paginated response updates the cursor. A bare array is returned
    /// as-is and leaves the cursor empty.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::Remote`] if the status is not 200
    /// - [`ResourceError::UnexpectedPayload`] if the body is neither an
    ///   envelope nor an array
    /// - [`ResourceError::Transport`] if the request cannot be exchanged
    pub async fn list(
        &mut self,
        resource: &str,
        options: &[&str],
        page: Page,
    ) -> Result<Vec<Value>, ResourceError> {
        let url = match page {
            Page::First => {
                self.cursor.reset();
                self.url(resource, None, options)
            }
            Page::Next | Page::Prev => {
                if let Some(url) = self.cursor.url_for(page) {
                    url.to_string()
                } else {
                    tracing::debug!(resource, page = %page, "No stored page URL, skipping request");
                    return Ok(Vec::new());
                }
            }
        };

        let response = self.send(resource, HttpMethod::Get, url, None).await?;
        if !response.is_status(200) {
            return Err(self.report(resource, &response));
        }

        let Some(collection) = CollectionPage::from_body(response.body) else {
            return Err(self.unexpected(
                resource,
                "expected a paginated envelope or a JSON array",
            ));
        };

        let (results, previous, next) = collection.into_parts();
        self.cursor.update(previous, next);
        tracing::debug!(
            resource,
            page = %page,
            count = results.len(),
            has_next = self.cursor.has_next(),
            "Fetched collection page"
        );

        Ok(results)
    }

    /// Fetches a single item.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Remote`] if the status is not 200, or
    /// [`ResourceError::Transport`] if the request cannot be exchanged.
    pub async fn get_one(
        &self,
        resource: &str,
        id: u64,
        options: &[&str],
    ) -> Result<Value, ResourceError> {
        let url = self.url(resource, Some(&id.to_string()), options);
        let response = self.send(resource, HttpMethod::Get, url, None).await?;
        if !response.is_status(200) {
            return Err(self.report(resource, &response));
        }

        Ok(response.body)
    }

    /// Creates an item with `payload` and returns the body the API echoes.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Remote`] if the status is not 201. The error
    /// keeps the response body (see [`ResourceError::body`]), which usually
    /// holds the validation messages.
    pub async fn create(
        &self,
        resource: &str,
        payload: Value,
        options: &[&str],
    ) -> Result<Value, ResourceError> {
        let url = self.url(resource, None, options);
        let response = self
            .send(resource, HttpMethod::Post, url, Some(payload))
            .await?;
        if !response.is_status(201) {
            return Err(self.report(resource, &response));
        }

        Ok(response.body)
    }

    /// Replaces an item (PUT) with `payload`.
    ///
    /// Returns `Ok(None)` without sending anything if `payload` carries no
    /// usable `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Remote`] if the status is not 200.
    pub async fn replace(
        &self,
        resource: &str,
        payload: Value,
        options: &[&str],
    ) -> Result<Option<Value>, ResourceError> {
        self.write_item(resource, HttpMethod::Put, payload, options)
            .await
    }

    /// Partially updates an item (PATCH) with `payload`.
    ///
    /// Returns `Ok(None)` without sending anything if `payload` carries no
    /// usable `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Remote`] if the status is not 200.
    pub async fn update(
        &self,
        resource: &str,
        payload: Value,
        options: &[&str],
    ) -> Result<Option<Value>, ResourceError> {
        self.write_item(resource, HttpMethod::Patch, payload, options)
            .await
    }

    /// Deletes the item identified by `payload["id"]`.
    ///
    /// Returns `Ok(true)` on 204, and `Ok(false)` without sending anything
    /// if `payload` carries no usable `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Remote`] for any status other than 204.
    pub async fn remove(
        &self,
        resource: &str,
        payload: Value,
        options: &[&str],
    ) -> Result<bool, ResourceError> {
        let Some(id) = payload_id(&payload) else {
            tracing::debug!(resource, "Delete skipped, payload has no id");
            return Ok(false);
        };

        let url = self.url(resource, Some(&id), options);
        let response = self
            .send(resource, HttpMethod::Delete, url, Some(payload))
            .await?;
        if !response.is_status(204) {
            return Err(self.report(resource, &response));
        }

        Ok(true)
    }

    async fn write_item(
        &self,
        resource: &str,
        method: HttpMethod,
        payload: Value,
        options: &[&str],
    ) -> Result<Option<Value>, ResourceError> {
        let Some(id) = payload_id(&payload) else {
            tracing::debug!(resource, method = %method, "Write skipped, payload has no id");
            return Ok(None);
        };

        let url = self.url(resource, Some(&id), options);
        let response = self.send(resource, method, url, Some(payload)).await?;
        if !response.is_status(200) {
            return Err(self.report(resource, &response));
        }

        Ok(Some(response.body))
    }

    async fn send(
        &self,
        resource: &str,
        method: HttpMethod,
        url: String,
        body: Option<Value>,
    ) -> Result<HttpResponse, ResourceError> {
        let mut builder = HttpRequest::builder(method, url);
        if let Some(body) = body {
            builder = builder.body(body).body_type(DataType::Json);
        }

        let transport = |source: HttpError| ResourceError::Transport {
            resource: resource.to_string(),
            method,
            source,
        };

        let request = builder.build().map_err(|e| transport(HttpError::from(e)))?;
        self.http_client.request(request).await.map_err(|e| {
            tracing::warn!(resource, method = %method, error = %e, "Request failed");
            transport(e)
        })
    }

    /// Builds the error for an unexpected status and logs it.
    fn report(&self, resource: &str, response: &HttpResponse) -> ResourceError {
        let error =
            RemoteOperationError::from_response(resource, response, self.config.verbose_errors());
        tracing::warn!(
            resource,
            method = %response.method,
            status = response.code,
            url = %response.url,
            "{}",
            error.message
        );
        error.into()
    }

    fn unexpected(&self, resource: &str, reason: &str) -> ResourceError {
        tracing::warn!(resource, base_url = %self.config.base_url(), reason, "Unexpected payload");
        ResourceError::UnexpectedPayload {
            resource: resource.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for RestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.config.base_url())
    }
}

/// Extracts a usable `id` from a payload as a URL segment.
///
/// An id is usable when it is truthy: a non-zero number or a non-empty
/// string.
fn payload_id(payload: &Value) -> Option<String> {
    let id = payload.get("id")?;
    if !is_truthy(id) {
        return None;
    }

    match id {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}
