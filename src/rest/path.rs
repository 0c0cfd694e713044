//! Endpoint resolution and pagination cursor state.
//!
//! Every resource lives under the same URL shape:
//!
//! ```text
//! {base_url}/{resource_name}/{id-or-empty}?format={output_format}[&option]*
//! ```
//!
//! Options are raw query-string fragments (`"limit=15"`, `"ordering=-id"`)
//! appended verbatim, unescaped, in the order the caller gave them.
//!
//! # Example
//!
//! ```rust
//! use drf_consumer::rest::build_url;
//!
//! let url = build_url("http://x/api", "user", None, "json", &["limit=15", "search=bob"]);
//! assert_eq!(url, "http://x/api/user/?format=json&limit=15&search=bob");
//!
//! let url = build_url("http://x/api", "user", Some("5"), "json", &[]);
//! assert_eq!(url, "http://x/api/user/5/?format=json");
//! ```

use std::fmt;

/// Builds the URL of a collection (`id == None`) or item endpoint.
#[must_use]
pub fn build_url(
    base_url: &str,
    resource: &str,
    id: Option<&str>,
    output_format: &str,
    options: &[&str],
) -> String {
    format!(
        "{}/{}/{}?format={}{}",
        base_url,
        resource,
        id.unwrap_or_default(),
        output_format,
        format_options(options)
    )
}

/// Joins raw options into a query-string suffix (`"&a&b"`, or `""` when empty).
#[must_use]
pub fn format_options(options: &[&str]) -> String {
    if options.is_empty() {
        String::new()
    } else {
        format!("&{}", options.join("&"))
    }
}

/// Which page of a collection a `list` call should fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    /// The first page; resets the cursor.
    #[default]
    First,
    /// The page after the last one fetched.
    Next,
    /// The page before the last one fetched.
    Prev,
}

impl Page {
    /// Returns the page name used in log output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Next => "next",
            Self::Prev => "prev",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Previous/next page URLs of the collection currently being walked.
///
/// Both URLs are empty on a fresh cursor. Empty strings are normalized to
/// `None` so that "no such page" has a single representation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCursor {
    previous: Option<String>,
    next: Option<String>,
}

impl PageCursor {
    /// Creates an empty cursor.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            previous: None,
            next: None,
        }
    }

    /// Returns the stored URL of the next page, or `None` if there is none.
    #[must_use]
    pub fn next_page_url(&self) -> Option<&str> {
        self.next.as_deref()
    }

    /// Returns the stored URL of the previous page, or `None` if there is none.
    #[must_use]
    pub fn prev_page_url(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    /// Returns `true` if a next page URL is stored.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Returns `true` if a previous page URL is stored.
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.previous.is_some()
    }

    /// Returns the stored URL for a relative page.
    ///
    /// [`Page::First`] has no stored URL and always yields `None`.
    #[must_use]
    pub fn url_for(&self, page: Page) -> Option<&str> {
        match page {
            Page::First => None,
            Page::Next => self.next_page_url(),
            Page::Prev => self.prev_page_url(),
        }
    }

    /// Stores the cursor URLs received in a collection envelope.
    pub fn update(&mut self, previous: Option<String>, next: Option<String>) {
        self.previous = previous.filter(|url| !url.is_empty());
        self.next = next.filter(|url| !url.is_empty());
    }

    /// Clears both URLs.
    pub fn reset(&mut self) {
        self.previous = None;
        self.next = None;
    }

    /// Returns `true` if neither URL is stored.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.previous.is_none() && self.next.is_none()
    }
}
