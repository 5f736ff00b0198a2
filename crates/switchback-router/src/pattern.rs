//! Route pattern compilation and matching.
//!
//! This module provides [`RoutePattern`], the compiled form of a route
//! pattern string. A pattern supports three pieces of syntax:
//!
//! - `:name` captures one path segment (one or more non-`/` characters).
//!   When the capture sits at the very end of the pattern it also accepts
//!   the empty string.
//! - `*name` captures a run of any characters, including `/`, matched
//!   non-greedily.
//! - `(...)` marks an optional sub-sequence, which may nest and may contain
//!   any other syntax.
//!
//! Every other character matches literally. A `:` or `*` not followed by an
//! identifier is a literal too.
//!
//! Compilation happens once at registration time; the compiled pattern is
//! reused for every dispatch. Two match modes derive from one compiled body:
//! a full match anchored at both ends (for routes) and a prefix match
//! anchored at the start only (for mounts).

use std::fmt;

use percent_encoding::percent_decode_str;
use regex::Regex;

use switchback_core::PatternError;

use crate::context::Params;

/// The immutable, compiled form of a route pattern string.
///
/// # Examples
///
/// ```
/// use switchback_router::pattern::RoutePattern;
///
/// let pattern = RoutePattern::compile("/articles/:year(/:slug)").unwrap();
/// assert_eq!(pattern.parameter_names(), ["year", "slug"]);
///
/// let params = pattern.matches("/articles/2024/hello-world").unwrap();
/// assert_eq!(params.get("year"), Some("2024"));
/// assert_eq!(params.get("slug"), Some("hello-world"));
///
/// // The optional group may be absent entirely.
/// let params = pattern.matches("/articles/2024").unwrap();
/// assert_eq!(params.get("slug"), None);
/// ```
pub struct RoutePattern {
    /// The original pattern string.
    source: String,
    /// Capture names in order of first textual appearance.
    names: Vec<String>,
    /// The compiled body anchored at both ends.
    full: Regex,
    /// The compiled body anchored at the start only.
    prefix: Regex,
}

impl fmt::Debug for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutePattern")
            .field("source", &self.source)
            .field("names", &self.names)
            .field("regex", &self.full.as_str())
            .finish()
    }
}

impl RoutePattern {
    /// Compiles a pattern string.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] for unbalanced optional groups, duplicate
    /// capture names, or a body the regex engine rejects.
    pub fn compile(source: &str) -> Result<Self, PatternError> {
        let (body, names) = translate(source)?;
        let full = Regex::new(&format!("^{body}$")).map_err(|e| PatternError::Syntax {
            pattern: source.to_string(),
            reason: e.to_string(),
        })?;
        let prefix = Regex::new(&format!("^{body}")).map_err(|e| PatternError::Syntax {
            pattern: source.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            source: source.to_string(),
            names,
            full,
            prefix,
        })
    }

    /// Returns the original pattern string.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the capture names in order of first textual appearance.
    pub fn parameter_names(&self) -> &[String] {
        &self.names
    }

    /// Matches the entire path against this pattern.
    ///
    /// Returns the captured parameters on success. Captured substrings are
    /// percent-decoded. Optional groups that did not participate in the
    /// match contribute no parameter.
    pub fn matches(&self, path: &str) -> Option<Params> {
        let captures = self.full.captures(path)?;
        Some(self.collect(&captures))
    }

    /// Matches a prefix of the path against this pattern.
    ///
    /// Returns the captured parameters and the unmatched suffix on success.
    /// This is the mode used for mount points.
    pub fn match_prefix<'p>(&self, path: &'p str) -> Option<(Params, &'p str)> {
        let captures = self.prefix.captures(path)?;
        let end = captures.get(0).map_or(0, |m| m.end());
        Some((self.collect(&captures), &path[end..]))
    }

    fn collect(&self, captures: &regex::Captures<'_>) -> Params {
        let mut params = Params::new();
        for (index, name) in self.names.iter().enumerate() {
            if let Some(m) = captures.get(index + 1) {
                let decoded = percent_decode_str(m.as_str())
                    .decode_utf8_lossy()
                    .into_owned();
                params.insert(name.clone(), decoded);
            }
        }
        params
    }
}

/// Length in bytes of the identifier at the start of `s`, or 0 if `s` does
/// not start with one. Identifiers are `[A-Za-z_][A-Za-z0-9_]*`.
fn identifier_len(s: &str) -> usize {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return 0,
    }
    1 + chars
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .count()
}

/// Translates a pattern string into a regex body and its ordered capture
/// names, in a single left-to-right pass.
fn translate(source: &str) -> Result<(String, Vec<String>), PatternError> {
    let mut body = String::new();
    let mut names: Vec<String> = Vec::new();
    let mut depth = 0usize;

    let mut iter = source.char_indices();
    while let Some((i, c)) = iter.next() {
        match c {
            ':' | '*' => {
                let name_len = identifier_len(&source[i + 1..]);
                if name_len == 0 {
                    // A bare `:` or `*` is an ordinary literal.
                    body.push_str(&regex::escape(&c.to_string()));
                    continue;
                }
                let name = &source[i + 1..=i + name_len];
                if names.iter().any(|n| n == name) {
                    return Err(PatternError::DuplicateParameter {
                        pattern: source.to_string(),
                        name: name.to_string(),
                    });
                }
                names.push(name.to_string());
                if c == '*' {
                    body.push_str("(.*?)");
                } else if i + 1 + name_len == source.len() {
                    // A `:name` capture ending the pattern also accepts the
                    // empty segment.
                    body.push_str("([^/]*)");
                } else {
                    body.push_str("([^/]+)");
                }
                // Identifiers are ASCII, so byte length equals char count.
                for _ in 0..name_len {
                    iter.next();
                }
            }
            '(' => {
                depth += 1;
                body.push_str("(?:");
            }
            ')' => {
                if depth == 0 {
                    return Err(PatternError::UnbalancedGroup {
                        pattern: source.to_string(),
                    });
                }
                depth -= 1;
                body.push_str(")?");
            }
            _ => body.push_str(&regex::escape(&c.to_string())),
        }
    }

    if depth != 0 {
        return Err(PatternError::UnbalancedGroup {
            pattern: source.to_string(),
        });
    }
    Ok((body, names))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_pattern() {
        let p = RoutePattern::compile("/about").unwrap();
        assert!(p.matches("/about").is_some());
        assert!(p.matches("/about/").is_none());
        assert!(p.matches("/contact").is_none());
        assert!(p.parameter_names().is_empty());
    }

    #[test]
    fn test_segment_capture() {
        let p = RoutePattern::compile("/users/:id/posts").unwrap();
        let params = p.matches("/users/42/posts").unwrap();
        assert_eq!(params.get("id"), Some("42"));
        // `:id` in segment position requires at least one character.
        assert!(p.matches("/users//posts").is_none());
        // Segment captures never cross a slash.
        assert!(p.matches("/users/4/2/posts").is_none());
    }

    #[test]
    fn test_trailing_segment_capture_accepts_empty() {
        let p = RoutePattern::compile("/users/:id").unwrap();
        assert_eq!(p.matches("/users/42").unwrap().get("id"), Some("42"));
        assert_eq!(p.matches("/users/").unwrap().get("id"), Some(""));
        assert!(p.matches("/users").is_none());
    }

    #[test]
    fn test_multi_segment_capture() {
        let p = RoutePattern::compile("/files/*path").unwrap();
        let params = p.matches("/files/a/b/c.txt").unwrap();
        assert_eq!(params.get("path"), Some("a/b/c.txt"));
    }

    #[test]
    fn test_optional_group() {
        let p = RoutePattern::compile("/users(/:id)").unwrap();
        let params = p.matches("/users").unwrap();
        assert!(params.is_empty());
        let params = p.matches("/users/42").unwrap();
        assert_eq!(params.get("id"), Some("42"));
    }

    #[test]
    fn test_nested_optional_groups() {
        let p = RoutePattern::compile("/archive(/:year(/:month))").unwrap();
        assert_eq!(p.parameter_names(), ["year", "month"]);
        assert!(p.matches("/archive").unwrap().is_empty());
        let params = p.matches("/archive/2024").unwrap();
        assert_eq!(params.get("year"), Some("2024"));
        assert_eq!(params.get("month"), None);
        let params = p.matches("/archive/2024/06").unwrap();
        assert_eq!(params.get("month"), Some("06"));
    }

    #[test]
    fn test_parameter_order_is_first_appearance() {
        let p = RoutePattern::compile("/:a/*b/:c").unwrap();
        assert_eq!(p.parameter_names(), ["a", "b", "c"]);
    }

    #[test]
    fn test_percent_decoding() {
        let p = RoutePattern::compile("/tags/:name").unwrap();
        let params = p.matches("/tags/caf%C3%A9%20bar").unwrap();
        assert_eq!(params.get("name"), Some("café bar"));
    }

    #[test]
    fn test_bare_sigils_are_literals() {
        let p = RoutePattern::compile("/time/::").unwrap();
        assert!(p.matches("/time/::").is_some());
        assert!(p.parameter_names().is_empty());

        let p = RoutePattern::compile("/glob/*").unwrap();
        assert!(p.matches("/glob/*").is_some());
    }

    #[test]
    fn test_regex_metacharacters_are_escaped() {
        let p = RoutePattern::compile("/a.b+c").unwrap();
        assert!(p.matches("/a.b+c").is_some());
        assert!(p.matches("/aXb+c").is_none());
    }

    #[test]
    fn test_unbalanced_groups_are_rejected() {
        assert!(matches!(
            RoutePattern::compile("/users(/:id"),
            Err(PatternError::UnbalancedGroup { .. })
        ));
        assert!(matches!(
            RoutePattern::compile("/users/:id)"),
            Err(PatternError::UnbalancedGroup { .. })
        ));
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        assert!(matches!(
            RoutePattern::compile("/:id/:id"),
            Err(PatternError::DuplicateParameter { .. })
        ));
    }

    #[test]
    fn test_compilation_is_pure() {
        let a = RoutePattern::compile("/users(/:id)").unwrap();
        let b = RoutePattern::compile("/users(/:id)").unwrap();
        for path in ["/users", "/users/42", "/users/42/x", "/other"] {
            assert_eq!(a.matches(path), b.matches(path), "diverged on {path}");
        }
    }

    #[test]
    fn test_prefix_match() {
        let p = RoutePattern::compile("/api/:version").unwrap();
        let (params, rest) = p.match_prefix("/api/v2/users/7").unwrap();
        assert_eq!(params.get("version"), Some("v2"));
        assert_eq!(rest, "/users/7");
        assert!(p.match_prefix("/web/v2").is_none());
    }

    #[test]
    fn test_prefix_match_consumes_nothing_extra() {
        let p = RoutePattern::compile("/a").unwrap();
        let (params, rest) = p.match_prefix("/a/1/c").unwrap();
        assert!(params.is_empty());
        assert_eq!(rest, "/1/c");
    }
}
