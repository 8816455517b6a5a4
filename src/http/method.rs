//! The set of HTTP verbs the route table supports.
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::MethodParseError;

/// One of the seven verbs a route may be registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Head,
}

impl Method {
    /// Every supported verb, in the order buckets are created.
    pub const ALL: [Method; 7] = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Patch,
        Method::Delete,
        Method::Options,
        Method::Head,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
            Method::Head => "HEAD",
        }
    }

    /// Parse a pipe-delimited method spec such as `"GET"` or `"GET|POST"`.
    pub fn parse_spec(spec: &str) -> Result<Vec<Method>, MethodParseError> {
        spec.split('|').map(|token| token.trim().parse()).collect()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = MethodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            "OPTIONS" => Ok(Method::Options),
            "HEAD" => Ok(Method::Head),
            other => Err(MethodParseError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_method() {
        assert_eq!("GET".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("delete".parse::<Method>().unwrap(), Method::Delete);
    }

    #[test]
    fn test_parse_spec() {
        let methods = Method::parse_spec("GET|POST").unwrap();
        assert_eq!(methods, vec![Method::Get, Method::Post]);
    }

    #[test]
    fn test_parse_unknown_method() {
        let err = "TRACE".parse::<Method>().unwrap_err();
        assert_eq!(err.0, "TRACE");
    }
}
