//! Transport error types.
//!
//! The transport only fails when a request could not be exchanged at all.
//! Non-success status codes are *not* transport errors: the client returns
//! every response and the resource layer decides what counts as success for
//! each operation.
//!
//! - [`InvalidHttpRequestError`]: A request failed validation before sending
//! - [`HttpError`]: Unified error type for the transport layer
//!
//! # Example
//!
//! ```rust,ignore
//! use drf_consumer::clients::{HttpClient, HttpRequest, HttpMethod, HttpError};
//!
//! match client.request(request).await {
//!     Ok(response) => println!("{} {}", response.code, response.body),
//!     Err(HttpError::InvalidRequest(e)) => println!("Invalid request: {e}"),
//!     Err(HttpError::Network(e)) => println!("Network error: {e}"),
//! }
//! ```

use thiserror::Error;

/// Error returned when an HTTP request fails validation.
///
/// # Example
///
/// ```rust
/// use drf_consumer::clients::InvalidHttpRequestError;
///
/// let error = InvalidHttpRequestError::MissingBody {
///     method: "POST".to_string(),
/// };
///
/// assert_eq!(error.to_string(), "Cannot use POST without specifying data.");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// The request has no URL.
    #[error("Cannot send a request without a URL.")]
    EmptyUrl,

    /// A request body was provided without specifying the body type.
    #[error("Cannot set a body without also setting body_type.")]
    MissingBodyType,

    /// A POST, PUT or PATCH request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },
}

/// Unified error type for all transport errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network, timeout or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
