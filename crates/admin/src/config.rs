//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `BOOKSHELF_API_URL` - Backend base URL (default: `http://localhost:8080`)
//! - `BOOKSHELF_LOGIN_PATH` - Login page path used for auth redirects
//!   (default: `/admin/login`)
//! - `BOOKSHELF_SESSION_FILE` - Where the session (token, cached profile) is
//!   persisted (default: `.bookshelf-session.json`)
//! - `BOOKSHELF_LOG_JSON` - Set to `1` or `true` for JSON log output
//! - `RUST_LOG` - Tracing filter, read by the binaries

use std::path::PathBuf;

use reqwest::Method;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_LOGIN_PATH: &str = "/admin/login";
const DEFAULT_SESSION_FILE: &str = ".bookshelf-session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// A `(method, path)` pair sent without the CSRF header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfExemption {
    pub method: Method,
    /// Path relative to the base URL, e.g. `/api/orders`.
    pub path: String,
}

impl CsrfExemption {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    /// Whether this exemption covers `method` on `path`. Leading and
    /// trailing slashes are ignored.
    #[must_use]
    pub fn matches(&self, method: &Method, path: &str) -> bool {
        self.method == *method && trim_slashes(&self.path) == trim_slashes(path)
    }
}

fn trim_slashes(path: &str) -> &str {
    path.trim_matches('/')
}

/// Public endpoints that must work without a CSRF cookie: guest checkout and
/// the contact form.
#[must_use]
pub fn default_csrf_exemptions() -> Vec<CsrfExemption> {
    vec![
        CsrfExemption::new(Method::POST, "/api/orders"),
        CsrfExemption::new(Method::POST, "/api/contact"),
    ]
}

/// Settings for one [`ApiClient`](crate::api::ApiClient).
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Backend origin. Endpoint paths are appended to it.
    pub base_url: Url,
    /// Path of the login page; 401/403 responses redirect here.
    pub login_path: String,
    /// Mutating requests sent without the CSRF header.
    pub csrf_exempt: Vec<CsrfExemption>,
}

impl ApiConfig {
    /// Configuration for `base_url` with the default login path and
    /// exemption list.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `base_url` is not an absolute
    /// http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("BOOKSHELF_API_URL", base_url)?,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            csrf_exempt: default_csrf_exemptions(),
        })
    }

    /// Load the API settings from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `BOOKSHELF_API_URL` is not a valid URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_env_or_default("BOOKSHELF_API_URL", DEFAULT_API_URL);
        let login_path = get_env_or_default("BOOKSHELF_LOGIN_PATH", DEFAULT_LOGIN_PATH);

        Ok(Self {
            base_url: parse_base_url("BOOKSHELF_API_URL", &base_url)?,
            login_path,
            csrf_exempt: default_csrf_exemptions(),
        })
    }

    /// Replace the login path.
    #[must_use]
    pub fn with_login_path(mut self, login_path: impl Into<String>) -> Self {
        self.login_path = login_path.into();
        self
    }

    /// Whether a `method` request to `path` skips the CSRF header.
    #[must_use]
    pub fn is_csrf_exempt(&self, method: &Method, path: &str) -> bool {
        self.csrf_exempt.iter().any(|e| e.matches(method, path))
    }

    /// Base URL without a trailing slash, for building derived asset URLs.
    #[must_use]
    pub fn origin(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }
}

/// Everything the CLI needs: API settings, session storage and logging.
#[derive(Debug, Clone)]
pub struct BookshelfConfig {
    pub api: ApiConfig,
    /// Persisted session file.
    pub session_file: PathBuf,
    /// Emit JSON logs instead of human-readable text.
    pub log_json: bool,
}

impl BookshelfConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api = ApiConfig::from_env()?;
        let session_file =
            PathBuf::from(get_env_or_default("BOOKSHELF_SESSION_FILE", DEFAULT_SESSION_FILE));
        let log_json = get_optional_env("BOOKSHELF_LOG_JSON")
            .map(|v| parse_flag("BOOKSHELF_LOG_JSON", &v))
            .transpose()?
            .unwrap_or(false);

        Ok(Self {
            api,
            session_file,
            log_json,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.query().is_some() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "base URL cannot carry a query string".to_string(),
        ));
    }

    Ok(url)
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
