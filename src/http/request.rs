//! The request value handed to the dispatch engine and every handler.
//!
//! Handlers and middleware read request state (origin, conditional headers,
//! body) exclusively from this value; there is no ambient lookup of any
//! kind. Header names are normalized to lowercase on insertion so lookups
//! are case-insensitive.
use std::collections::HashMap;

use crate::http::method::Method;

/// An inbound HTTP request as seen by the routing core.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    /// Request target: path plus optional `?query` suffix, as received.
    url: String,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// The full request target, including any query string.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The path portion of the target, without the query string.
    pub fn path(&self) -> &str {
        self.url.split('?').next().unwrap_or(&self.url)
    }

    /// The raw query string, if any.
    pub fn query(&self) -> Option<&str> {
        self.url.split_once('?').map(|(_, query)| query)
    }

    /// The URL-decoded value of one query parameter. A key present without
    /// `=value` yields an empty string.
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.query()?.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (key == name).then(|| match urlencoding::decode(value) {
                Ok(decoded) => decoded.into_owned(),
                Err(_) => value.to_string(),
            })
        })
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn set_header(&mut self, name: impl AsRef<str>, value: impl Into<String>) -> &mut Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Builder-style variant of [`Request::set_header`].
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) -> &mut Self {
        self.body = body.into();
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.set_body(body);
        self
    }
}
