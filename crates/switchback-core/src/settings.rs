//! Site settings for routers and their callers.
//!
//! [`SiteSettings`] describes where a router is mounted externally: the
//! scheme, host, and base path of the site. Its main job from the routing
//! engine's point of view is [`SiteSettings::strip_path`], which turns an
//! absolute request path into the relative remainder that seeds a dispatch.
//! Settings can be loaded from TOML files with [`from_toml_str`] and
//! [`from_toml_file`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RouterError;

/// Configuration for a site served by a router.
///
/// # Examples
///
/// ```
/// use switchback_core::SiteSettings;
///
/// let settings = SiteSettings {
///     path: "blog".to_string(),
///     ..SiteSettings::default()
/// };
/// assert_eq!(settings.base_path(), "/blog/");
/// assert_eq!(settings.strip_path("/blog/posts/1"), Some("posts/1".to_string()));
/// assert_eq!(settings.strip_path("/shop/cart"), None);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    /// The scheme or protocol used by the site (`http` or `https`).
    pub scheme: String,
    /// The host name of the site (such as `example.com`).
    pub host: String,
    /// The path section of the base URL, without normalization.
    pub path: String,
    /// Whether debug mode is enabled.
    pub debug: bool,
    /// The log filter directive (e.g. `info`, `switchback=debug`).
    pub log_level: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: "localhost".to_string(),
            path: String::new(),
            debug: true,
            log_level: "info".to_string(),
        }
    }
}

impl SiteSettings {
    /// Returns `path` formatted so that it always begins and ends with a
    /// slash. An empty `path` yields `/`.
    pub fn base_path(&self) -> String {
        let trimmed = self.path.trim_matches('/');
        if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{trimmed}/")
        }
    }

    /// Strips the base path off an absolute request path.
    ///
    /// Returns the relative remainder, or `None` when the base path is not a
    /// prefix of the given path. The remainder is what seeds the route field
    /// of a dispatch context.
    pub fn strip_path(&self, abs_path: &str) -> Option<String> {
        abs_path
            .strip_prefix(&self.base_path())
            .map(ToString::to_string)
    }

    /// Appends a relative path to the base path to form an absolute path.
    pub fn make_path(&self, rel_path: &str) -> String {
        format!("{}{rel_path}", self.base_path())
    }

    /// Returns the external base URL: `<scheme>://<host><base_path>`.
    pub fn base_url(&self) -> String {
        format!("{}://{}{}", self.scheme, self.host, self.base_path())
    }

    /// Appends a relative path to the base URL to form an absolute URL.
    ///
    /// One special case: when both `path` and `rel_path` are empty, the URL
    /// consists of the scheme and host with no trailing slash. This differs
    /// from a `path` of `/`, which always produces a trailing slash.
    ///
    /// # Examples
    ///
    /// ```
    /// use switchback_core::SiteSettings;
    ///
    /// let settings = SiteSettings {
    ///     host: "example.com".to_string(),
    ///     ..SiteSettings::default()
    /// };
    /// assert_eq!(settings.make_url(""), "http://example.com");
    /// assert_eq!(settings.make_url("about"), "http://example.com/about");
    /// ```
    pub fn make_url(&self, rel_path: &str) -> String {
        if rel_path.is_empty() && self.path.is_empty() {
            format!("{}://{}", self.scheme, self.host)
        } else {
            format!("{}://{}{}", self.scheme, self.host, self.make_path(rel_path))
        }
    }
}

/// Loads settings from a TOML string.
///
/// Fields not present in the TOML keep their default values.
///
/// # Errors
///
/// Returns [`RouterError::Configuration`] if the TOML is malformed.
pub fn from_toml_str(toml_str: &str) -> Result<SiteSettings, RouterError> {
    toml::from_str(toml_str)
        .map_err(|e| RouterError::Configuration(format!("failed to parse TOML settings: {e}")))
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns [`RouterError::Configuration`] if the file cannot be read or the
/// TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<SiteSettings, RouterError> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        RouterError::Configuration(format!(
            "failed to read settings file {}: {e}",
            path.as_ref().display()
        ))
    })?;
    from_toml_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_path_empty() {
        let settings = SiteSettings::default();
        assert_eq!(settings.base_path(), "/");
    }

    #[test]
    fn test_base_path_normalizes_slashes() {
        let settings = SiteSettings {
            path: "/api/v1".to_string(),
            ..SiteSettings::default()
        };
        assert_eq!(settings.base_path(), "/api/v1/");

        let settings = SiteSettings {
            path: "api/v1/".to_string(),
            ..SiteSettings::default()
        };
        assert_eq!(settings.base_path(), "/api/v1/");
    }

    #[test]
    fn test_strip_path_match() {
        let settings = SiteSettings {
            path: "blog".to_string(),
            ..SiteSettings::default()
        };
        assert_eq!(
            settings.strip_path("/blog/posts/42"),
            Some("posts/42".to_string())
        );
    }

    #[test]
    fn test_strip_path_no_match() {
        let settings = SiteSettings {
            path: "blog".to_string(),
            ..SiteSettings::default()
        };
        assert_eq!(settings.strip_path("/shop/cart"), None);
    }

    #[test]
    fn test_strip_path_root() {
        let settings = SiteSettings::default();
        assert_eq!(settings.strip_path("/users/7"), Some("users/7".to_string()));
    }

    #[test]
    fn test_make_path_round_trips_with_strip() {
        let settings = SiteSettings {
            path: "app".to_string(),
            ..SiteSettings::default()
        };
        let abs = settings.make_path("users/7");
        assert_eq!(abs, "/app/users/7");
        assert_eq!(settings.strip_path(&abs), Some("users/7".to_string()));
    }

    #[test]
    fn test_base_url() {
        let settings = SiteSettings {
            scheme: "https".to_string(),
            host: "example.com".to_string(),
            path: "app".to_string(),
            ..SiteSettings::default()
        };
        assert_eq!(settings.base_url(), "https://example.com/app/");
    }

    #[test]
    fn test_make_url_empty_special_case() {
        let settings = SiteSettings {
            host: "example.com".to_string(),
            ..SiteSettings::default()
        };
        assert_eq!(settings.make_url(""), "http://example.com");

        let settings = SiteSettings {
            host: "example.com".to_string(),
            path: "/".to_string(),
            ..SiteSettings::default()
        };
        assert_eq!(settings.make_url(""), "http://example.com/");
    }

    #[test]
    fn test_from_toml_str() {
        let settings = from_toml_str(
            r#"
            scheme = "https"
            host = "example.com"
            path = "api"
            debug = false
            "#,
        )
        .unwrap();
        assert_eq!(settings.scheme, "https");
        assert_eq!(settings.host, "example.com");
        assert_eq!(settings.base_path(), "/api/");
        assert!(!settings.debug);
        // Defaults survive for fields not present in the TOML.
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_from_toml_str_invalid() {
        assert!(from_toml_str("scheme = [").is_err());
    }
}
