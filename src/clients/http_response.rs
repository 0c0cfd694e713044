//! HTTP response types.
//!
//! This module provides the [`HttpResponse`] type returned by the transport.

use std::collections::HashMap;

use crate::clients::HttpMethod;

/// An HTTP response, together with an echo of the request that produced it.
///
/// The body is decoded eagerly: an empty body, or a body that is not valid
/// JSON, decodes to `Value::Null`. The undecoded text is kept in
/// [`raw_body`](Self::raw_body) for verbose error reports.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, lowercased (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The decoded response body.
    pub body: serde_json::Value,
    /// The response body exactly as received.
    pub raw_body: String,
    /// Method of the request that produced this response.
    pub method: HttpMethod,
    /// URL of the request that produced this response.
    pub url: String,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, decoding `raw_body` as JSON.
    ///
    /// # Example
    ///
    /// ```rust
    /// use drf_consumer::clients::{HttpMethod, HttpResponse};
    /// use std::collections::HashMap;
    ///
    /// let response = HttpResponse::new(
    ///     HttpMethod::Get,
    ///     "http://x/api/user/1/?format=json",
    ///     200,
    ///     HashMap::new(),
    ///     r#"{"id": 1}"#,
    /// );
    /// assert_eq!(response.body["id"], 1);
    /// ```
    #[must_use]
    pub fn new(
        method: HttpMethod,
        url: impl Into<String>,
        code: u16,
        headers: HashMap<String, Vec<String>>,
        raw_body: impl Into<String>,
    ) -> Self {
        let raw_body = raw_body.into();
        let body = if raw_body.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&raw_body).unwrap_or(serde_json::Value::Null)
        };

        Self {
            code,
            headers,
            body,
            raw_body,
            method,
            url: url.into(),
        }
    }

    /// Returns `true` if the response carries exactly the given status code.
    #[must_use]
    pub const fn is_status(&self, code: u16) -> bool {
        self.code == code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(code: u16, raw_body: &str) -> HttpResponse {
        HttpResponse::new(
            HttpMethod::Get,
            "http://test.com/api/user/?format=json",
            code,
            HashMap::new(),
            raw_body,
        )
    }

    #[test]
    fn test_is_status_is_exact() {
        let created = response(201, "{}");
        assert!(created.is_status(201));
        assert!(!created.is_status(200));
    }

    #[test]
    fn test_body_is_decoded() {
        let r = response(200, r#"{"previous": null, "next": null, "results": []}"#);
        assert_eq!(r.body, json!({"previous": null, "next": null, "results": []}));
    }

    #[test]
    fn test_empty_or_invalid_body_decodes_to_null() {
        assert!(response(204, "").body.is_null());
        assert!(response(204, "  \n").body.is_null());

        let html = response(500, "<h1>Server Error</h1>");
        assert!(html.body.is_null());
        assert_eq!(html.raw_body, "<h1>Server Error</h1>");
    }

    #[test]
    fn test_request_echo_is_kept() {
        let r = response(200, "[]");
        assert_eq!(r.method, HttpMethod::Get);
        assert_eq!(r.url, "http://test.com/api/user/?format=json");
    }
}
