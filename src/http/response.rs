//! The response value produced by handlers and threaded through the
//! dispatch loop.
//!
//! Two flags matter to the core: `complete` (default true) tells the
//! dispatch loop whether to stop trying further candidate routes, and is
//! never serialized; `sent` is a write-once guard against double emission
//! by a transport adapter.
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{error::ResponseError, http::status};

/// An HTTP response under construction.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    /// Insertion-ordered header pairs; repeated names are kept as separate
    /// entries and emitted in order.
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    file_path: Option<PathBuf>,
    complete: bool,
    sent: bool,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: Vec::new(),
            file_path: None,
            complete: true,
            sent: false,
        }
    }
}

impl Response {
    /// A fresh 200 response with an empty body.
    pub fn new() -> Self {
        Self::default()
    }

    /// A response with the given status, which must be a recognized code.
    pub fn with_status(code: u16) -> Result<Self, ResponseError> {
        let mut response = Self::default();
        response.set_status(code)?;
        Ok(response)
    }

    /// Internal constructor for codes the crate itself picks.
    pub(crate) fn with_known_status(code: u16) -> Self {
        debug_assert!(status::is_recognized(code));
        Self {
            status: code,
            ..Self::default()
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// The reason phrase for the current status.
    pub fn reason(&self) -> &'static str {
        status::reason_phrase(self.status).unwrap_or("")
    }

    /// Set the status code. Unrecognized codes fail immediately; the
    /// previous status is left untouched.
    pub fn set_status(&mut self, code: u16) -> Result<&mut Self, ResponseError> {
        if !status::is_recognized(code) {
            return Err(ResponseError::InvalidStatus(code));
        }
        self.status = code;
        Ok(self)
    }

    /// Append a header, keeping any existing entries with the same name.
    pub fn header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Replace every header with the given name by a single entry.
    pub fn set_header(&mut self, name: impl AsRef<str>, value: impl Into<String>) -> &mut Self {
        self.remove_header(name.as_ref());
        self.headers.push((name.as_ref().to_string(), value.into()));
        self
    }

    pub fn remove_header(&mut self, name: &str) -> &mut Self {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// All values recorded for a header name, in insertion order.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> {
        self.headers
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Append content to the body accumulator.
    pub fn write(&mut self, content: impl AsRef<[u8]>) -> &mut Self {
        self.body.extend_from_slice(content.as_ref());
        self
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn content_length(&self) -> usize {
        self.body.len()
    }

    /// Reset status, headers and body. The `complete` and `sent` flags are
    /// deliberately preserved.
    pub fn clear(&mut self) -> &mut Self {
        self.status = 200;
        self.headers.clear();
        self.body.clear();
        self.file_path = None;
        self
    }

    /// Serve the contents of a file instead of the accumulated body.
    pub fn file(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Whether the dispatch loop should stop trying further candidates.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn set_complete(&mut self, complete: bool) -> &mut Self {
        self.complete = complete;
        self
    }

    pub fn sent(&self) -> bool {
        self.sent
    }

    /// Flip the write-once `sent` flag. Fails if the response already went
    /// out once.
    pub fn mark_sent(&mut self) -> Result<(), ResponseError> {
        if self.sent {
            return Err(ResponseError::AlreadySent);
        }
        self.sent = true;
        Ok(())
    }

    /// The synthetic response the dispatch loop produces when every
    /// candidate route is exhausted.
    pub fn not_found() -> Self {
        let mut response = Self::with_known_status(404);
        response.write("404 Not Found");
        response
    }

    /// A JSON response with the given status.
    pub fn json<T: Serialize>(data: &T, code: u16) -> Result<Self, ResponseError> {
        let body = serde_json::to_vec(data)?;
        let mut response = Self::with_status(code)?;
        response.set_header("Content-Type", "application/json; charset=utf-8");
        response.write(body);
        Ok(response)
    }

    /// A JSONP response: the JSON body wrapped in a call to `callback`.
    /// Callers typically take the callback name from a query parameter
    /// (see [`crate::http::Request::query_param`]).
    pub fn jsonp<T: Serialize>(
        data: &T,
        callback: &str,
        code: u16,
    ) -> Result<Self, ResponseError> {
        let body = serde_json::to_vec(data)?;
        let mut response = Self::with_status(code)?;
        response.set_header("Content-Type", "application/javascript; charset=utf-8");
        response.write(callback).write("(").write(body).write(");");
        Ok(response)
    }

    /// A 200 response serving `path` as a download: sets the content type
    /// and an attachment `Content-Disposition` alongside the file override.
    pub fn attachment(
        path: impl Into<PathBuf>,
        name: &str,
        content_type: &str,
    ) -> Self {
        let mut response = Self::new();
        response.set_header("Content-Type", content_type);
        response.set_header(
            "Content-Disposition",
            format!("attachment; filename=\"{name}\""),
        );
        response.file(path);
        response
    }

    /// Set caching headers. `None` disables caching entirely; `Some(when)`
    /// marks the response fresh until `when`.
    pub fn cache(&mut self, expires: Option<DateTime<Utc>>) -> &mut Self {
        match expires {
            None => {
                self.set_header("Expires", "Mon, 26 Jul 1997 05:00:00 GMT");
                self.remove_header("Cache-Control");
                self.header("Cache-Control", "no-store, no-cache, must-revalidate");
                self.header("Cache-Control", "post-check=0, pre-check=0");
                self.header("Cache-Control", "max-age=0");
                self.set_header("Pragma", "no-cache");
            }
            Some(when) => {
                let max_age = (when - Utc::now()).num_seconds().max(0);
                self.set_header("Expires", when.format("%a, %d %b %Y %H:%M:%S GMT").to_string());
                self.set_header("Cache-Control", format!("max-age={max_age}"));
                // A previous no-cache directive would contradict the new policy.
                if self.header_values("Pragma").any(|v| v == "no-cache") {
                    self.remove_header("Pragma");
                }
            }
        }
        self
    }
}
