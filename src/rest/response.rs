//! Collection envelope decoding.
//!
//! Paginated collection endpoints answer with an envelope:
//!
//! ```json
//! {"previous": null, "next": "http://x/api/user/?page=2", "results": [...]}
//! ```
//!
//! Unpaginated endpoints answer with a bare JSON array. [`CollectionPage`]
//! decodes both shapes and exposes the records through `Deref`:
//!
//! ```rust
//! use drf_consumer::rest::CollectionPage;
//! use serde_json::json;
//!
//! let page = CollectionPage::from_body(json!({
//!     "previous": null,
//!     "next": "http://x/api/user/?page=2",
//!     "results": [{"id": 1}, {"id": 2}],
//! }))
//! .unwrap();
//!
//! assert_eq!(page.len(), 2);
//! assert!(page.has_next_page());
//! assert!(page.is_paginated());
//! ```

use std::ops::{Deref, DerefMut};

use serde_json::Value;

/// One page of raw records, plus the cursor URLs of its envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionPage {
    results: Vec<Value>,
    previous: Option<String>,
    next: Option<String>,
    paginated: bool,
}

impl CollectionPage {
    /// Decodes a collection body.
    ///
    /// Returns `None` if the body is neither an envelope (an object with
    /// `previous`, `next` and an array `results`) nor a bare array.
    #[must_use]
    pub fn from_body(body: Value) -> Option<Self> {
        match body {
            Value::Array(results) => Some(Self {
                results,
                previous: None,
                next: None,
                paginated: false,
            }),
            Value::Object(mut map) => {
                if !map.contains_key("previous") || !map.contains_key("next") {
                    return None;
                }
                let Some(Value::Array(results)) = map.remove("results") else {
                    return None;
                };
                Some(Self {
                    results,
                    previous: map.get("previous").and_then(Self::cursor_url),
                    next: map.get("next").and_then(Self::cursor_url),
                    paginated: true,
                })
            }
            _ => None,
        }
    }

    fn cursor_url(value: &Value) -> Option<String> {
        value
            .as_str()
            .filter(|url| !url.is_empty())
            .map(ToString::to_string)
    }

    /// Returns `true` if the body was an envelope rather than a bare array.
    #[must_use]
    pub const fn is_paginated(&self) -> bool {
        self.paginated
    }

    /// Returns `true` if the envelope points at a next page.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.next.is_some()
    }

    /// Returns `true` if the envelope points at a previous page.
    #[must_use]
    pub const fn has_prev_page(&self) -> bool {
        self.previous.is_some()
    }

    /// Returns the URL of the next page, if any.
    #[must_use]
    pub fn next_page_url(&self) -> Option<&str> {
        self.next.as_deref()
    }

    /// Returns the URL of the previous page, if any.
    #[must_use]
    pub fn prev_page_url(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    /// Splits the page into its records and its `(previous, next)` URLs.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Value>, Option<String>, Option<String>) {
        (self.results, self.previous, self.next)
    }

    /// Consumes the page and returns the records.
    #[must_use]
    pub fn into_inner(self) -> Vec<Value> {
        self.results
    }
}

/// Returns `true` if a response body carries something: not `null`,
/// `false`, zero, or an empty string, array or object.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

impl Deref for CollectionPage {
    type Target = Vec<Value>;

    fn deref(&self) -> &Self::Target {
        &self.results
    }
}

impl DerefMut for CollectionPage {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.results
    }
}
