//! HTTP client types for resource endpoints.
//!
//! This module provides the transport layer and the mapping engine that
//! speaks to collection and item endpoints.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`HttpClient`]: The async HTTP transport
//! - [`HttpRequest`]: A request to be sent
//! - [`HttpResponse`]: A decoded response with an echo of its request
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PUT, PATCH, DELETE)
//! - [`DataType`]: Content types for request bodies
//! - [`rest::RestClient`]: The mapping engine (list/get/create/update/remove
//!   on raw records, pagination cursor)
//!
//! # Example
//!
//! ```rust,ignore
//! use drf_consumer::{ConsumerConfig, RestClient, Page};
//!
//! let mut client = RestClient::new(ConsumerConfig::new("https://example.com/api")?);
//!
//! let first = client.list("user", &["limit=15"], Page::First).await?;
//! let second = client.list("user", &[], Page::Next).await?;
//! ```
//!
//! # Status Handling
//!
//! The transport never turns a status code into an error. Each engine
//! operation checks for its own success code (201 for create, 204 for
//! remove, 200 otherwise) and reports anything else as a
//! [`RemoteOperationError`](crate::rest::RemoteOperationError).

mod errors;
mod http_client;
mod http_request;
mod http_response;
pub mod rest;

pub use errors::{HttpError, InvalidHttpRequestError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{DataType, HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;

pub use rest::RestClient;
