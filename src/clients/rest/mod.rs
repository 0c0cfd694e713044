//! The resource mapping engine.
//!
//! [`RestClient`] performs the raw-record operations of the engine on top of
//! the [`HttpClient`](crate::clients::HttpClient):
//!
//! - `list()` walks a paginated collection with a stored cursor
//! - `get_one()` fetches a single item
//! - `create()`, `replace()`, `update()` and `remove()` write items
//!
//! Each operation checks its own success code and reports failures through
//! [`ResourceError`](crate::rest::ResourceError).
//!
//! # Cursor Ownership
//!
//! The pagination cursor lives inside the client and every operation that
//! reads or writes it takes `&mut self`. Walking two collections at the same
//! time requires two clients; cloning a client yields an independent one.

mod client;

pub use client::RestClient;
