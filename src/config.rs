//! Connection configuration
//!
//! A [`ConnectionConfig`] holds everything a [`Connection`](crate::http::Connection)
//! needs: the API token, the base address and the transport timeouts. It can be
//! built in code, or loaded from a YAML (or JSON) file:
//!
//! ```yaml
//! api_token: "..."            # optional, falls back to CODA_API_TOKEN
//! base_url: https://coda.io/apis/v1
//! connect_timeout_secs: 30
//! read_timeout_secs: 60
//! write_timeout_secs: 60
//! rate_limit:
//!   requests: 100
//!   per_seconds: 6
//! ```

use crate::error::{Error, Result};
use crate::http::RateLimiterConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default API origin
pub const DEFAULT_BASE_URL: &str = "https://coda.io/apis/v1";

/// Environment variable consulted when no token is configured
pub const TOKEN_ENV_VAR: &str = "CODA_API_TOKEN";

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(60);

// ============================================================================
// Connection Config
// ============================================================================

/// Configuration for a [`Connection`](crate::http::Connection)
#[derive(Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Bearer token sent on every request
    #[serde(default)]
    pub api_token: String,

    /// Origin all relative endpoints are rooted at
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Time allowed to establish a connection
    #[serde(
        rename = "connect_timeout_secs",
        with = "duration_secs",
        default = "default_connect_timeout"
    )]
    pub connect_timeout: Duration,

    /// Time allowed between reads of the response
    #[serde(
        rename = "read_timeout_secs",
        with = "duration_secs",
        default = "default_read_timeout"
    )]
    pub read_timeout: Duration,

    /// Time allowed to send the request
    #[serde(
        rename = "write_timeout_secs",
        with = "duration_secs",
        default = "default_write_timeout"
    )]
    pub write_timeout: Duration,

    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Optional client-side request pacing
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_connect_timeout() -> Duration {
    DEFAULT_CONNECT_TIMEOUT
}

fn default_read_timeout() -> Duration {
    DEFAULT_READ_TIMEOUT
}

fn default_write_timeout() -> Duration {
    DEFAULT_WRITE_TIMEOUT
}

fn default_user_agent() -> String {
    format!("coda-connect/{}", env!("CARGO_PKG_VERSION"))
}

impl ConnectionConfig {
    /// Create a config with default settings for the given token
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            base_url: default_base_url(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            user_agent: default_user_agent(),
            rate_limit: None,
        }
    }

    /// Create a new config builder
    pub fn builder(api_token: impl Into<String>) -> ConnectionConfigBuilder {
        ConnectionConfigBuilder {
            config: Self::new(api_token),
        }
    }

    /// Parse a config from YAML (JSON is accepted too)
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load a config file, filling a missing token from the environment
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        Ok(Self::from_yaml_str(&content)?.with_env_token())
    }

    /// Use `CODA_API_TOKEN` when no token is set
    #[must_use]
    pub fn with_env_token(self) -> Self {
        self.with_token_fallback(std::env::var(TOKEN_ENV_VAR).ok())
    }

    pub(crate) fn with_token_fallback(mut self, fallback: Option<String>) -> Self {
        if self.api_token.trim().is_empty() {
            if let Some(token) = fallback {
                self.api_token = token;
            }
        }
        self
    }

    /// Overall deadline for one request
    pub fn request_timeout(&self) -> Duration {
        self.connect_timeout + self.write_timeout + self.read_timeout
    }

    /// Check the config is usable
    pub fn validate(&self) -> Result<()> {
        if self.api_token.trim().is_empty() {
            return Err(Error::config(format!(
                "API token is required (set it in the config or via {TOKEN_ENV_VAR})"
            )));
        }

        let url = Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "base URL must be http or https, got '{}'",
                self.base_url
            )));
        }

        if self.connect_timeout.is_zero() || self.read_timeout.is_zero() {
            return Err(Error::config("timeouts must be greater than zero"));
        }

        Ok(())
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("api_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .field("write_timeout", &self.write_timeout)
            .field("user_agent", &self.user_agent)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}

/// Builder for [`ConnectionConfig`]
#[derive(Debug, Clone)]
pub struct ConnectionConfigBuilder {
    config: ConnectionConfig,
}

impl ConnectionConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the connect timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the read timeout
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.config.read_timeout = timeout;
        self
    }

    /// Set the write timeout
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.config.write_timeout = timeout;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Pace requests on the client side
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable client-side pacing
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Build the config
    pub fn build(self) -> ConnectionConfig {
        self.config
    }
}

/// Serde adapter storing a [`Duration`] as whole seconds
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
