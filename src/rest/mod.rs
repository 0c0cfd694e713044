//! Typed resources on top of the mapping engine.
//!
//! This module provides:
//!
//! - **[`ResourceType`] / [`FieldDef`] / [`FieldKind`]**: `static` descriptors
//!   declaring a collection's name and field schema
//! - **[`Resource`]**: one record, with `save`/`get`/`update`/`replace`/`remove`,
//!   factories, paginated `query` and relation composition
//! - **[`FieldValue`]**: typed field values and coercion of incoming JSON
//! - **Path building**: [`build_url`] and the pagination [`PageCursor`]
//! - **[`CollectionPage`]**: decoding of paginated envelopes
//! - **[`ResourceError`]**: error types for resource operations
//!
//! # Example
//!
//! ```rust,ignore
//! use drf_consumer::{ConsumerConfig, FieldDef, QueryResult, Resource, ResourceType};
//!
//! static USER_FIELDS: [FieldDef; 1] = [FieldDef::string("name")];
//! static USER: ResourceType = ResourceType::new("user", &USER_FIELDS);
//!
//! let mut user = Resource::new(&USER, ConsumerConfig::new("https://example.com/api")?)?;
//! user.get(Some(5)).await?;
//!
//! // Gather up to 50 users across pages
//! if let QueryResult::Many(users) = user.query(&["ordering=name"], 50, Some(&USER)).await? {
//!     for u in &users {
//!         println!("{} {:?}", u.id(), u.value("name"));
//!     }
//! }
//! ```

mod errors;
mod field;
mod path;
mod resource;
mod response;
mod schema;

// Public exports
pub use errors::{RemoteOperationError, ResourceError};
pub use field::FieldValue;
pub use path::{build_url, format_options, Page, PageCursor};
pub use resource::{QueryResult, Resource};
pub use response::{is_truthy, CollectionPage};
pub use schema::{
    validate_resource_name, FieldDef, FieldKind, ResourceType, ID_FIELD, RESERVED_PREFIX,
};
