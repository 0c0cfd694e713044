//! Resource error types.
//!
//! Failures fall in two groups:
//!
//! - **API-side** ([`ResourceError::is_remote`]): the request was sent (or
//!   could not be exchanged) and the API did not deliver what the operation
//!   needs. [`ResourceError::Remote`] carries the status code, the request
//!   URL and the body that came back.
//! - **Local** ([`ResourceError::is_local`]): a precondition failed before
//!   any network access (no id to fetch, invalid resource type, relation
//!   attribute of the wrong shape).
//!
//! # Example
//!
//! ```rust,ignore
//! use drf_consumer::rest::ResourceError;
//!
//! match user.get(Some(5)).await {
//!     Ok(up_to_date) => println!("loaded, fresh = {up_to_date}"),
//!     Err(ResourceError::Remote(e)) if e.code == 404 => println!("no such user"),
//!     Err(e) if e.is_remote() => println!("API failure: {e}"),
//!     Err(e) => println!("local error: {e}"),
//! }
//! ```

use serde_json::Value;
use thiserror::Error;

use crate::clients::{HttpError, HttpMethod, HttpResponse};

/// A call returned a status other than the success code of its operation.
///
/// The display message is the diagnostic report: method and status code,
/// plus the request URL and raw response body when verbose errors are
/// enabled. The decoded body is always kept so callers can inspect error
/// payloads (for instance validation messages on a failed create).
#[derive(Debug, Error, Clone)]
#[error("{message}")]
pub struct RemoteOperationError {
    /// The resource name the operation targeted.
    pub resource: String,
    /// The HTTP method of the failed request.
    pub method: HttpMethod,
    /// The HTTP status code received.
    pub code: u16,
    /// The full request URL.
    pub url: String,
    /// The decoded response body (`Null` when empty or not JSON).
    pub body: Value,
    /// The diagnostic message.
    pub message: String,
}

impl RemoteOperationError {
    /// Builds the error report for a response.
    ///
    /// # Example
    ///
    /// ```rust
    /// use drf_consumer::clients::{HttpMethod, HttpResponse};
    /// use drf_consumer::rest::RemoteOperationError;
    /// use std::collections::HashMap;
    ///
    /// let response = HttpResponse::new(
    ///     HttpMethod::Get,
    ///     "http://x/api/user/5/?format=json",
    ///     404,
    ///     HashMap::new(),
    ///     r#"{"detail": "Not found."}"#,
    /// );
    ///
    /// let error = RemoteOperationError::from_response("user", &response, false);
    /// assert_eq!(error.to_string(), "API error (user) - Err GET 404");
    /// assert_eq!(error.body["detail"], "Not found.");
    /// ```
    #[must_use]
    pub fn from_response(resource: &str, response: &HttpResponse, verbose: bool) -> Self {
        let message = if verbose {
            format!(
                "API error ({resource})\nErr {} {}\n{}\n##########\n{}\n##########",
                response.method, response.code, response.url, response.raw_body
            )
        } else {
            format!(
                "API error ({resource}) - Err {} {}",
                response.method, response.code
            )
        };

        Self {
            resource: resource.to_string(),
            method: response.method,
            code: response.code,
            url: response.url.clone(),
            body: response.body.clone(),
            message,
        }
    }
}

/// Error type for resource operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The API answered with a non-success status for the operation.
    #[error(transparent)]
    Remote(#[from] RemoteOperationError),

    /// The request could not be exchanged (connection failure, timeout, ...).
    #[error("API error ({resource}) - Err {method}: {source}")]
    Transport {
        /// The resource name the operation targeted.
        resource: String,
        /// The HTTP method of the failed request.
        method: HttpMethod,
        /// The transport failure.
        source: HttpError,
    },

    /// The API answered with a success status but a body the operation cannot use.
    #[error("API error ({resource}) - unexpected payload: {reason}")]
    UnexpectedPayload {
        /// The resource name the operation targeted.
        resource: String,
        /// What was wrong with the body.
        reason: String,
    },

    /// A fetch that must return a record returned an empty body.
    #[error("Error retrieving item {resource}({id}) from API")]
    RemoteFetch {
        /// The resource name.
        resource: String,
        /// The id that was requested.
        id: u64,
    },

    /// An operation needing an id was called without one.
    #[error("ID required for item {resource}")]
    MissingIdentifier {
        /// The resource name.
        resource: String,
    },

    /// A resource type descriptor failed validation.
    #[error("Invalid resource type '{name}': {reason}")]
    InvalidResourceType {
        /// The descriptor's name.
        name: String,
        /// Why the descriptor was rejected.
        reason: String,
    },

    /// An id/object conversion was attempted on an attribute of the wrong shape.
    #[error("Cannot convert attribute '{attribute}' in {resource}: {reason}")]
    RelationResolution {
        /// The resource name of the instance owning the attribute.
        resource: String,
        /// The attribute being converted.
        attribute: String,
        /// Why the conversion is impossible.
        reason: String,
    },
}

impl ResourceError {
    /// Returns `true` for failures reported by (or on the way to) the API.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Remote(_)
                | Self::Transport { .. }
                | Self::UnexpectedPayload { .. }
                | Self::RemoteFetch { .. }
        )
    }

    /// Returns `true` for precondition failures detected before any request.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        !self.is_remote()
    }

    /// Returns the HTTP status code, for [`ResourceError::Remote`] errors.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Remote(e) => Some(e.code),
            _ => None,
        }
    }

    /// Returns the response body, for [`ResourceError::Remote`] errors.
    #[must_use]
    pub const fn body(&self) -> Option<&Value> {
        match self {
            Self::Remote(e) => Some(&e.body),
            _ => None,
        }
    }
}

// Verify ResourceError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceError>();
};
