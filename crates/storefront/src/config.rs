//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the storefront starts with sensible defaults.
//!
//! - `AQUACAFE_HOST` - Bind address (default: 127.0.0.1)
//! - `AQUACAFE_PORT` - Listen port (default: 3000)
//! - `AQUACAFE_BASE_URL` - Public URL; `https://` enables secure cookies
//!   (default: <http://localhost:3000>)
//! - `GEMINI_API_KEY` - Gemini API key (falls back to `API_KEY`). Without it
//!   every consultation answers with the fallback reply.
//! - `GEMINI_MODEL` - Model name (default: gemini-3-flash-preview)
//! - `GEMINI_API_BASE` - API root (default: <https://generativelanguage.googleapis.com>)
//! - `CONSULTATION_TIMEOUT_SECS` - Upstream timeout, 1-120 (default: 20)
//! - `AQUACAFE_SESSION_CAPACITY` - Most sessions held in memory at once
//!   (default: 10000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_TIMEOUT_SECS: u64 = 20;
const MAX_TIMEOUT_SECS: u64 = 120;
const DEFAULT_SESSION_CAPACITY: u64 = 10_000;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Most sessions kept before the least used are evicted
    pub session_capacity: u64,
    /// Gemini API configuration for the plant consultant
    pub gemini: GeminiConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Gemini API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key; `None` means every consultation falls back.
    pub api_key: Option<SecretString>,
    /// Model name (e.g., gemini-3-flash-preview)
    pub model: String,
    /// API root URL
    pub api_base: Url,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field(
                "api_key",
                &self.api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("model", &self.model)
            .field("api_base", &self.api_base.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_base: Url::parse(DEFAULT_GEMINI_API_BASE)
                .unwrap_or_else(|_| unreachable!("default API base is a valid URL")),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            session_capacity: DEFAULT_SESSION_CAPACITY,
            gemini: GeminiConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

/// Source of configuration values.
///
/// Production reads the process environment; tests pass a map so they never
/// touch global state.
trait Env {
    fn get(&self, key: &str) -> Option<String>;
}

struct ProcessEnv;

impl Env for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl Env for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid, or if the
    /// API key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::load(&ProcessEnv)
    }

    /// Load configuration from an explicit map of variables.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::load(vars)
    }

    fn load(env: &impl Env) -> Result<Self, ConfigError> {
        let host = get_env_or_default(env, "AQUACAFE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("AQUACAFE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default(env, "AQUACAFE_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("AQUACAFE_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default(env, "AQUACAFE_BASE_URL", "http://localhost:3000");
        Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("AQUACAFE_BASE_URL".to_string(), e.to_string())
        })?;
        let session_capacity = get_env_or_default(
            env,
            "AQUACAFE_SESSION_CAPACITY",
            &DEFAULT_SESSION_CAPACITY.to_string(),
        )
        .parse::<u64>()
        .ok()
        .filter(|&capacity| capacity > 0)
        .ok_or_else(|| {
            ConfigError::InvalidEnvVar(
                "AQUACAFE_SESSION_CAPACITY".to_string(),
                "must be a positive integer".to_string(),
            )
        })?;

        Ok(Self {
            host,
            port,
            base_url,
            session_capacity,
            gemini: GeminiConfig::load(env)?,
            sentry_dsn: get_optional_env(env, "SENTRY_DSN"),
            sentry_environment: get_optional_env(env, "SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl GeminiConfig {
    fn load(env: &impl Env) -> Result<Self, ConfigError> {
        let api_key = match get_api_key(env) {
            Some((key, value)) => {
                validate_secret_strength(&value, key)?;
                Some(SecretString::from(value))
            }
            None => None,
        };

        let api_base = get_env_or_default(env, "GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE);
        let api_base = Url::parse(&api_base).map_err(|e| {
            ConfigError::InvalidEnvVar("GEMINI_API_BASE".to_string(), e.to_string())
        })?;

        let timeout_secs = get_env_or_default(
            env,
            "CONSULTATION_TIMEOUT_SECS",
            &DEFAULT_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("CONSULTATION_TIMEOUT_SECS".to_string(), e.to_string())
        })?;
        if !(1..=MAX_TIMEOUT_SECS).contains(&timeout_secs) {
            return Err(ConfigError::InvalidEnvVar(
                "CONSULTATION_TIMEOUT_SECS".to_string(),
                format!("must be between 1 and {MAX_TIMEOUT_SECS}"),
            ));
        }

        Ok(Self {
            api_key,
            model: get_env_or_default(env, "GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            api_base,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Whether an API key is available.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get the API key, preferring `GEMINI_API_KEY` over the generic `API_KEY`.
///
/// Blank values count as unset.
fn get_api_key(env: &impl Env) -> Option<(&'static str, String)> {
    ["GEMINI_API_KEY", "API_KEY"].into_iter().find_map(|key| {
        get_optional_env(env, key).map(|value| (key, value))
    })
}

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(env: &impl Env, key: &str) -> Option<String> {
    env.get(key).filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(env: &impl Env, key: &str, default: &str) -> String {
    get_optional_env(env, key).unwrap_or_else(|| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}
