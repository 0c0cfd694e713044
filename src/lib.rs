//! # DRF Consumer
//!
//! A typed mapping layer for REST APIs that follow the Django REST Framework
//! conventions: one collection endpoint per resource, one item endpoint per
//! record, and `{previous, next, results}` pagination envelopes.
//!
//! ## Overview
//!
//! This library provides:
//! - Type-safe configuration via [`ConsumerConfig`] and [`ConsumerConfigBuilder`]
//! - An async HTTP transport ([`HttpClient`]) with fixed JSON headers
//! - A raw-record engine ([`RestClient`]) with list/get/create/replace/update/remove
//!   and a stored pagination cursor
//! - Declared resource schemas ([`ResourceType`], [`FieldDef`]) and typed
//!   instances ([`Resource`]) with coercion, factories, multi-page queries and
//!   relation composition
//!
//! ## Quick Start
//!
//! ```rust
//! use drf_consumer::{BaseUrl, ConsumerConfig, FieldDef, FieldValue, Resource, ResourceType};
//! use serde_json::json;
//!
//! static USER_FIELDS: [FieldDef; 2] = [FieldDef::string("name"), FieldDef::int("age")];
//! static USER: ResourceType = ResourceType::new("user", &USER_FIELDS);
//!
//! // Create configuration using the builder pattern
//! let config = ConsumerConfig::builder()
//!     .base_url(BaseUrl::new("https://example.com/api").unwrap())
//!     .verbose_errors(true)
//!     .build()
//!     .unwrap();
//!
//! let mut user = Resource::new(&USER, config).unwrap();
//!
//! // Load a record received from elsewhere
//! let record = json!({"id": 3, "name": "bob", "age": "27"});
//! user.hydrate(record.as_object().unwrap());
//!
//! assert_eq!(user.id(), 3);
//! assert_eq!(user.value("age"), Some(&FieldValue::Int(27)));
//! assert_eq!(user.to_string(), "https://example.com/api");
//! ```
//!
//! ## Working With Records
//!
//! ```rust,ignore
//! use drf_consumer::{ConsumerConfig, Page, QueryResult, Resource, RestClient};
//!
//! let config = ConsumerConfig::new("https://example.com/api")?;
//!
//! // Raw records
//! let mut client = RestClient::new(config.clone());
//! let first = client.list("user", &["ordering=-id"], Page::First).await?;
//! let second = client.list("user", &[], Page::Next).await?;
//!
//! // Typed instances
//! let mut user = Resource::new(&USER, config)?;
//! user.get(Some(5)).await?;
//! user.set("name", "alice");
//! user.save().await?;
//!
//! match user.query(&[], 100, Some(&USER)).await? {
//!     QueryResult::Many(users) => println!("{} users", users.len()),
//!     QueryResult::One(user) => println!("one user: {}", user.id()),
//!     QueryResult::Records(records) => println!("nothing typed: {records:?}"),
//! }
//! ```
//!
//! ## Errors
//!
//! Every operation returns [`ResourceError`]. Use
//! [`ResourceError::is_remote`] to tell API failures from local precondition
//! failures; [`ResourceError::Remote`] keeps the status code, URL and body.
//!
//! ## Logging
//!
//! The library emits [`tracing`] events (`debug` for requests and page walks,
//! `warn` for reported failures) and never installs a subscriber.
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: Newtypes and descriptors validate on construction
//! - **Thread-safe**: All types are `Send + Sync`
//! - **Async-first**: Designed for use with Tokio async runtime
//! - **Explicit schemas**: Field kinds are declared, never inferred

pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

// Re-export public types at crate root for convenience
pub use config::{BaseUrl, ConsumerConfig, ConsumerConfigBuilder, OutputFormat};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    DataType, HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    InvalidHttpRequestError, RestClient,
};

// Re-export resource types
pub use rest::{
    FieldDef, FieldKind, FieldValue, Page, PageCursor, QueryResult, RemoteOperationError,
    Resource, ResourceError, ResourceType,
};
