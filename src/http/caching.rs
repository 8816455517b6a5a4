//! Conditional-request helpers: ETag and Last-Modified revalidation.
//!
//! Both helpers consume the response being built and either return it with
//! the validator header attached, or replace it by an empty 304 when the
//! request already carries a matching validator.
use chrono::{DateTime, Utc};

use crate::http::{request::Request, response::Response};

/// Strength of an entity tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtagKind {
    Strong,
    Weak,
}

/// Attach an `ETag` header, or short-circuit to 304 when the request's
/// `If-None-Match` equals the tag.
pub fn etag(response: Response, request: &Request, id: &str, kind: EtagKind) -> Response {
    let tag = match kind {
        EtagKind::Weak => format!("W/{id}"),
        EtagKind::Strong => id.to_string(),
    };

    if request.header("if-none-match") == Some(tag.as_str()) {
        return Response::with_known_status(304);
    }

    let mut response = response;
    response.set_header("ETag", tag);
    response
}

/// Attach a `Last-Modified` header, or short-circuit to 304 when the
/// request's `If-Modified-Since` names the same instant.
pub fn last_modified(response: Response, request: &Request, time: DateTime<Utc>) -> Response {
    let matches_validator = request
        .header("if-modified-since")
        .and_then(|value| DateTime::parse_from_rfc2822(value).ok())
        .is_some_and(|since| since.timestamp() == time.timestamp());

    if matches_validator {
        return Response::with_known_status(304);
    }

    let mut response = response;
    response.set_header(
        "Last-Modified",
        time.format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
    );
    response
}
