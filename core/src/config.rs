//! Client configuration.
//!
//! Every recognised option is a named member with a documented default.
//! Values come from the application (or the environment), never from
//! hardcoded backend addresses.

use crate::error::{DirectusError, Result};
use crate::session::AuthMode;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Authentication configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Keep the refresh token in an application-managed cookie.
    ///
    /// When `true`, login and refresh run in `json` mode: the backend returns
    /// the refresh token in the response body and the adapter persists it via
    /// the refresh token cookie store. When `false`, they run in `cookie` mode
    /// and the backend keeps the token in an httpOnly cookie.
    ///
    /// Default: `true`
    pub use_app_cookies: bool,
}

impl AuthConfig {
    /// Request mode derived from [`AuthConfig::use_app_cookies`].
    #[must_use]
    pub const fn default_mode(&self) -> AuthMode {
        if self.use_app_cookies {
            AuthMode::Json
        } else {
            AuthMode::Cookie
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            use_app_cookies: true,
        }
    }
}

/// Directus client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DirectusConfig {
    /// Base URL of the Directus instance (e.g. "https://cms.example.com").
    ///
    /// Default: `http://localhost:8055`
    #[serde(deserialize_with = "deserialize_url")]
    pub url: String,

    /// Static token used when a call selects [`crate::TokenSelection::Static`].
    ///
    /// Default: none
    pub static_token: Option<String>,

    /// Headers sent with every request.
    ///
    /// Default: empty
    pub headers: BTreeMap<String, String>,

    /// Per-request timeout applied by the HTTP client.
    ///
    /// Default: none (inherit the HTTP client's behaviour)
    #[serde(with = "duration_secs")]
    pub timeout: Option<Duration>,

    /// Authentication settings.
    pub auth: AuthConfig,
}

impl DirectusConfig {
    /// Create configuration for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns `DirectusError::InvalidConfig` if the URL is not `http(s)`.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url = normalize_url(&url.into())?;
        Ok(Self {
            url,
            ..Self::default()
        })
    }

    /// Create configuration from environment variables.
    ///
    /// - `DIRECTUS_URL` (required)
    /// - `DIRECTUS_STATIC_TOKEN` (optional)
    /// - `DIRECTUS_USE_APP_COOKIES` (optional, `true`/`false`)
    ///
    /// # Errors
    ///
    /// Returns `DirectusError::InvalidConfig` if `DIRECTUS_URL` is missing or
    /// invalid, or if `DIRECTUS_USE_APP_COOKIES` is not a boolean.
    pub fn from_env() -> Result<Self> {
        let url = std::env::var("DIRECTUS_URL")
            .map_err(|_| DirectusError::InvalidConfig("DIRECTUS_URL is not set".to_string()))?;
        let mut config = Self::new(url)?;

        if let Ok(token) = std::env::var("DIRECTUS_STATIC_TOKEN") {
            if !token.is_empty() {
                config.static_token = Some(token);
            }
        }

        if let Ok(flag) = std::env::var("DIRECTUS_USE_APP_COOKIES") {
            config.auth.use_app_cookies = flag.parse().map_err(|_| {
                DirectusError::InvalidConfig(format!(
                    "DIRECTUS_USE_APP_COOKIES must be true or false, got '{flag}'"
                ))
            })?;
        }

        Ok(config)
    }

    /// Set the static token.
    #[must_use]
    pub fn with_static_token(mut self, token: impl Into<String>) -> Self {
        self.static_token = Some(token.into());
        self
    }

    /// Add a header sent with every request.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the authentication settings.
    #[must_use]
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    /// Absolute URL for a request path (`path` starts with `/`).
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.url)
    }
}

impl Default for DirectusConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8055".to_string(),
            static_token: None,
            headers: BTreeMap::new(),
            timeout: None,
            auth: AuthConfig::default(),
        }
    }
}

fn normalize_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(DirectusError::InvalidConfig(format!(
            "url must start with http:// or https://, got '{url}'"
        )));
    }
    Ok(trimmed.to_string())
}

fn deserialize_url<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    normalize_url(&raw).map_err(serde::de::Error::custom)
}

mod duration_secs {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::unwrap_used)] // Test code
    fn test_new_trims_trailing_slash() {
        let config = DirectusConfig::new("https://cms.example.com/").unwrap();
        assert_eq!(config.url, "https://cms.example.com");
        assert_eq!(
            config.endpoint("/items/posts"),
            "https://cms.example.com/items/posts"
        );
    }

    #[test]
    fn test_new_rejects_non_http_url() {
        let result = DirectusConfig::new("ftp://cms.example.com");
        assert!(matches!(result, Err(DirectusError::InvalidConfig(_))));
    }

    #[test]
    fn test_defaults() {
        let config = DirectusConfig::default();
        assert_eq!(config.url, "http://localhost:8055");
        assert_eq!(config.static_token, None);
        assert_eq!(config.timeout, None);
        assert!(config.auth.use_app_cookies);
        assert_eq!(config.auth.default_mode(), AuthMode::Json);
    }

    #[test]
    fn test_cookie_mode_when_app_cookies_disabled() {
        let auth = AuthConfig {
            use_app_cookies: false,
        };
        assert_eq!(auth.default_mode(), AuthMode::Cookie);
    }

    #[test]
    #[allow(clippy::unwrap_used)] // Test code
    fn test_builder() {
        let config = DirectusConfig::new("https://cms.example.com")
            .unwrap()
            .with_static_token("static")
            .with_header("x-app", "blog")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.static_token.as_deref(), Some("static"));
        assert_eq!(config.headers.get("x-app").map(String::as_str), Some("blog"));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    #[allow(clippy::unwrap_used)] // Test code
    fn test_deserialize_partial() {
        let config: DirectusConfig = serde_json::from_str(
            r#"{"url":"https://cms.example.com","timeout":10,"auth":{"use_app_cookies":false}}"#,
        )
        .unwrap();

        assert_eq!(config.timeout, Some(Duration::from_secs(10)));
        assert!(!config.auth.use_app_cookies);
        assert_eq!(config.url, "https://cms.example.com");
    }

    #[test]
    #[allow(clippy::unwrap_used)] // Test code
    fn test_deserialize_normalizes_url() {
        let config: DirectusConfig =
            serde_json::from_str(r#"{"url":"https://cms.example.com/"}"#).unwrap();
        assert_eq!(config.url, "https://cms.example.com");

        let missing: DirectusConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.url, "http://localhost:8055");
    }

    #[test]
    #[allow(clippy::unwrap_used)] // Test code
    fn test_deserialize_rejects_non_http_url() {
        let result = serde_json::from_str::<DirectusConfig>(r#"{"url":"ftp://cms.example.com/"}"#);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("url must start with http:// or https://"), "{err}");
    }
}
