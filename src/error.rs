//! Error types for coda-connect
//!
//! Every failure coming out of the connection layer is exactly one variant of
//! [`Error`]. HTTP failures are classified by status code, transport failures
//! carry their cause, and callers branch on [`Error::kind`] rather than on the
//! concrete variant.

use std::time::Duration;
use thiserror::Error;

/// The main error type for coda-connect
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // HTTP Status Errors
    // ============================================================================
    #[error("Authentication failed (HTTP 401): check your API token")]
    Authentication,

    #[error("Resource not found (HTTP 404): {url}")]
    NotFound { url: String },

    #[error("Rate limit exceeded (HTTP 429){}", retry_hint(.retry_after_seconds))]
    RateLimited { retry_after_seconds: Option<u64> },

    #[error("Request failed (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("Failed to execute request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Failed to serialize request body: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Configuration / Input Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Wrapped Errors
    // ============================================================================
    #[error("{message}: {source}")]
    Context {
        message: String,
        source: Box<Error>,
    },
}

/// Flat classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// HTTP 401
    Authentication,
    /// HTTP 404
    NotFound,
    /// HTTP 429, the only kind worth retrying
    RateLimited,
    /// Any other non-success status
    Api,
    /// No usable response: connection, timeout, malformed body
    Transport,
    /// Bad configuration
    Config,
    /// Rejected before any request was made
    InvalidInput,
}

fn retry_hint(retry_after_seconds: &Option<u64>) -> String {
    match retry_after_seconds {
        Some(secs) => format!(". Retry after {secs} seconds."),
        None => String::new(),
    }
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an input validation error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a not-found error for a requested URL
    pub fn not_found(url: impl Into<String>) -> Self {
        Self::NotFound { url: url.into() }
    }

    /// Create a generic API error
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    /// Classify an unsuccessful HTTP response
    pub fn from_status(
        status: u16,
        url: &str,
        retry_after_seconds: Option<u64>,
        body: impl Into<String>,
    ) -> Self {
        match status {
            401 => Self::Authentication,
            404 => Self::not_found(url),
            429 => Self::RateLimited {
                retry_after_seconds,
            },
            _ => Self::api(status, body),
        }
    }

    /// The kind of failure, for callers that branch on it
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Authentication => ErrorKind::Authentication,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::RateLimited { .. } => ErrorKind::RateLimited,
            Error::Api { .. } => ErrorKind::Api,
            Error::Transport(_)
            | Error::Decode { .. }
            | Error::Serialize(_)
            | Error::InvalidUrl(_) => ErrorKind::Transport,
            Error::Config { .. } | Error::YamlParse(_) | Error::Io(_) => ErrorKind::Config,
            Error::InvalidInput { .. } => ErrorKind::InvalidInput,
            Error::Context { source, .. } => source.kind(),
        }
    }

    /// HTTP status code, when the failure came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Authentication => Some(401),
            Error::NotFound { .. } => Some(404),
            Error::RateLimited { .. } => Some(429),
            Error::Api { status, .. } => Some(*status),
            Error::Transport(e) => e.status().map(|s| s.as_u16()),
            Error::Context { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Server-provided delay before retrying, if any
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::RateLimited {
                retry_after_seconds: Some(secs),
            } => Some(Duration::from_secs(*secs)),
            Error::Context { source, .. } => source.retry_after(),
            _ => None,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::RateLimited
    }

    /// Check if this error is a transport timeout
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Transport(e) => e.is_timeout(),
            Error::Context { source, .. } => source.is_timeout(),
            _ => false,
        }
    }
}

/// Result type alias for coda-connect
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
///
/// The wrapped error keeps its kind, status and retry hint.
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Context {
            message: message.into(),
            source: Box::new(e.into()),
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| Error::Context {
            message: f(),
            source: Box::new(e.into()),
        })
    }
}
