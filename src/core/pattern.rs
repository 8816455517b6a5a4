//! URL pattern compilation and matching.
//!
//! # Pattern syntax
//! - `@name` — named segment, captured and URL-decoded; the default
//!   character class excludes `/` and `?`
//! - `@name:regex` — named segment with a custom sub-expression
//! - `(...)` — optional group
//! - trailing `*` — wildcard; the literal remainder of the path is exposed
//!   as the splat, distinct from named captures
//!
//! Literal pattern text is passed to the regex engine unescaped, so plain
//! regex routes such as `/num/[0-9]+` work as well.
//!
//! Compilation is a pure function of the pattern string: compiling twice
//! yields matchers with identical behavior. It happens lazily on the first
//! match attempt and is cached per case-sensitivity mode, which is why a
//! malformed custom sub-expression surfaces as a [`PatternError`] at match
//! time rather than at registration.
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;

use crate::error::PatternError;

/// `@name` or `@name:regex` tokens inside a pattern. Parameter names are
/// ASCII word characters, matching what named capture groups accept.
static PARAM_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@([0-9A-Za-z_]+)(:([^/()]*))?").expect("param token regex"));

/// The outcome of a successful match: per-request data only, the pattern
/// itself stays untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    params: Vec<(String, Option<String>)>,
    splat: String,
}

impl RouteMatch {
    fn unconditional() -> Self {
        Self {
            params: Vec::new(),
            splat: String::new(),
        }
    }

    /// Named parameters in pattern-declaration order. A `None` value marks
    /// a parameter declared in the pattern but absent from this match.
    pub fn params(&self) -> &[(String, Option<String>)] {
        &self.params
    }

    /// The matched value of one named parameter, if it participated.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_deref())
    }

    /// The literal trailing remainder captured by a wildcard pattern;
    /// empty when the pattern has no wildcard or nothing trailed.
    pub fn splat(&self) -> &str {
        &self.splat
    }
}

#[derive(Debug, Clone)]
struct Compiled {
    regex: Regex,
    /// Capture names in pattern-declaration order.
    names: Vec<String>,
}

/// A route pattern with its lazily compiled matchers.
#[derive(Debug)]
pub struct RoutePattern {
    raw: String,
    sensitive: OnceCell<Compiled>,
    insensitive: OnceCell<Compiled>,
}

impl RoutePattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            raw: pattern.into(),
            sensitive: OnceCell::new(),
            insensitive: OnceCell::new(),
        }
    }

    /// The pattern string as registered.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Test a decoded request path against this pattern.
    ///
    /// `*` alone and an exact string match succeed without touching the
    /// regex engine. A query-string suffix on the path is always tolerated
    /// and ignored. Named captures are URL-decoded; the splat is taken
    /// verbatim from the path.
    pub fn match_path(
        &self,
        path: &str,
        case_sensitive: bool,
    ) -> Result<Option<RouteMatch>, PatternError> {
        if self.raw == "*" || self.raw == path {
            return Ok(Some(RouteMatch::unconditional()));
        }

        let compiled = self.compiled(case_sensitive)?;
        let Some(captures) = compiled.regex.captures(path) else {
            return Ok(None);
        };

        let params = compiled
            .names
            .iter()
            .map(|name| {
                let value = captures.name(name).map(|m| url_decode(m.as_str()));
                (name.clone(), value)
            })
            .collect();

        let splat = if self.raw.ends_with('*') {
            splat_of(&self.raw, path)
        } else {
            String::new()
        };

        Ok(Some(RouteMatch { params, splat }))
    }

    fn compiled(&self, case_sensitive: bool) -> Result<&Compiled, PatternError> {
        let cell = if case_sensitive {
            &self.sensitive
        } else {
            &self.insensitive
        };
        cell.get_or_try_init(|| self.compile(case_sensitive))
    }

    fn compile(&self, case_sensitive: bool) -> Result<Compiled, PatternError> {
        // Optional groups and the permissive wildcard tail are plain string
        // rewrites applied before parameter substitution.
        let source = self.raw.replace(')', ")?").replace("/*", "(/?|/.*?)");

        let mut names = Vec::new();
        let source = PARAM_TOKEN.replace_all(&source, |caps: &regex::Captures| {
            let name = &caps[1];
            names.push(name.to_string());
            match caps.get(3) {
                Some(custom) => format!("(?P<{name}>{})", custom.as_str()),
                None => format!("(?P<{name}>[^/?]+)"),
            }
        });

        // A pattern ending in '/' makes that slash optional; any other
        // pattern tolerates one trailing slash on the path.
        let tail = if self.raw.ends_with('/') { "?" } else { "/?" };
        let flags = if case_sensitive { "" } else { "(?i)" };
        let full = format!("{flags}^{source}{tail}(?:\\?.*)?$");

        let regex = Regex::new(&full).map_err(|source| PatternError {
            pattern: self.raw.clone(),
            source,
        })?;

        Ok(Compiled { regex, names })
    }
}

/// URL-decode a captured value; undecodable sequences are kept as-is.
fn url_decode(value: &str) -> String {
    match urlencoding::decode(value) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => value.to_string(),
    }
}

/// Compute the wildcard remainder: skip as many path separators as the
/// pattern contains, then take everything after that point verbatim.
fn splat_of(pattern: &str, path: &str) -> String {
    let separators = pattern.matches('/').count();
    let mut seen = 0;
    for (idx, ch) in path.char_indices() {
        if ch == '/' {
            seen += 1;
        }
        if seen == separators {
            return path[idx + 1..].to_string();
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(pattern: &str, path: &str) -> RouteMatch {
        RoutePattern::new(pattern)
            .match_path(path, false)
            .unwrap()
            .expect("pattern should match")
    }

    fn rejects(pattern: &str, path: &str) {
        assert!(
            RoutePattern::new(pattern)
                .match_path(path, false)
                .unwrap()
                .is_none(),
            "pattern {pattern} should not match {path}"
        );
    }

    #[test]
    fn test_star_matches_everything() {
        assert!(matched("*", "/anything/at/all").params().is_empty());
    }

    #[test]
    fn test_exact_match_bypasses_regex() {
        // An exact match succeeds even when the pattern would be an invalid
        // regex, because compilation is bypassed.
        let m = matched("/broken(@x:[", "/broken(@x:[");
        assert!(m.params().is_empty());
    }

    #[test]
    fn test_named_parameter() {
        let m = matched("/user/@id", "/user/123");
        assert_eq!(m.params(), &[("id".to_string(), Some("123".to_string()))]);
        rejects("/user/@id", "/user/");
        rejects("/user/@id", "/usher/123");
    }

    #[test]
    fn test_parameter_values_are_url_decoded() {
        let m = matched("/file/@name", "/file/a%20b");
        assert_eq!(m.param("name"), Some("a b"));
    }

    #[test]
    fn test_custom_parameter_regex() {
        let m = matched("/test/@name:[a-z]+", "/test/abc");
        assert_eq!(m.param("name"), Some("abc"));
        rejects("/test/@name:[a-z]+", "/test/123");
    }

    #[test]
    fn test_malformed_custom_regex_fails_at_match_time() {
        let pattern = RoutePattern::new("/bad/@id:[0-9");
        let err = pattern.match_path("/bad/1", false).unwrap_err();
        assert_eq!(err.pattern, "/bad/@id:[0-9");
    }

    #[test]
    fn test_optional_parameters_report_absent_entries() {
        let m = matched("/blog(/@year(/@month(/@day)))", "/blog/2000");
        assert_eq!(
            m.params(),
            &[
                ("year".to_string(), Some("2000".to_string())),
                ("month".to_string(), None),
                ("day".to_string(), None),
            ]
        );
    }

    #[test]
    fn test_optional_parameters_all_present() {
        let m = matched("/blog(/@year(/@month(/@day)))", "/blog/2000/02/01");
        assert_eq!(m.param("year"), Some("2000"));
        assert_eq!(m.param("month"), Some("02"));
        assert_eq!(m.param("day"), Some("01"));
    }

    #[test]
    fn test_custom_regex_inside_optional_group() {
        let m = matched("/@controller/@method(/@id:[0-9]+)", "/user/delete/123");
        assert_eq!(m.param("controller"), Some("user"));
        assert_eq!(m.param("method"), Some("delete"));
        assert_eq!(m.param("id"), Some("123"));

        let m = matched("/@controller/@method(/@id:[0-9]+)", "/user/delete/");
        assert_eq!(m.param("id"), None);
    }

    #[test]
    fn test_wildcard_splat() {
        let m = matched("/account/*", "/account/456/def/xyz");
        assert_eq!(m.splat(), "456/def/xyz");

        let m = matched("/account/*", "/account");
        assert_eq!(m.splat(), "");
    }

    #[test]
    fn test_splat_is_verbatim_not_decoded() {
        let m = matched("/raw/*", "/raw/a%20b/c");
        assert_eq!(m.splat(), "a%20b/c");
    }

    #[test]
    fn test_trailing_slash_handling() {
        // Pattern without trailing slash tolerates one on the path.
        assert_eq!(matched("/path", "/path/").params().len(), 0);
        // Pattern with trailing slash matches the bare path too.
        assert_eq!(matched("/path/", "/path").params().len(), 0);
    }

    #[test]
    fn test_query_string_is_ignored() {
        let m = matched("/user/@id", "/user/7?tab=posts&x=1");
        assert_eq!(m.param("id"), Some("7"));
    }

    #[test]
    fn test_case_sensitivity_flag() {
        let pattern = RoutePattern::new("/hello");
        assert!(pattern.match_path("/HELLO", false).unwrap().is_some());
        assert!(pattern.match_path("/HELLO", true).unwrap().is_none());
        assert!(pattern.match_path("/hello", true).unwrap().is_some());
    }

    #[test]
    fn test_case_insensitivity_is_not_ascii_only() {
        let pattern = RoutePattern::new("/café");
        assert!(pattern.match_path("/CAFÉ", false).unwrap().is_some());
        assert!(pattern.match_path("/CAFÉ", true).unwrap().is_none());
    }

    #[test]
    fn test_unicode_parameter_values() {
        let m = matched("/greet/@name", "/greet/østers");
        assert_eq!(m.param("name"), Some("østers"));
    }

    #[test]
    fn test_raw_regex_route() {
        matched("/num/[0-9]+", "/num/1234");
        rejects("/num/[0-9]+", "/num/abcd");
    }

    #[test]
    fn test_compilation_is_idempotent() {
        let first = RoutePattern::new("/a/@x(/@y)");
        let second = RoutePattern::new("/a/@x(/@y)");
        for path in ["/a/1", "/a/1/2", "/a", "/a/1/2/3"] {
            assert_eq!(
                first.match_path(path, false).unwrap(),
                second.match_path(path, false).unwrap(),
                "behavior diverged on {path}"
            );
        }
    }
}
