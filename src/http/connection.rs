//! Authenticated connection to the API
//!
//! Handles:
//! - Resolving endpoints against the base URL
//! - Bearer authentication and JSON headers on every request
//! - Response body decoding into the caller's type
//! - Classifying failures into [`Error`] variants
//!
//! The connection never retries. A 429 surfaces as [`Error::RateLimited`] with
//! the server's `Retry-After` hint so the caller can decide.

use super::rate_limit::RateLimiter;
use crate::config::ConnectionConfig;
use crate::error::{Error, Result};
use crate::types::JsonValue;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, ACCEPT, CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

const APPLICATION_JSON: &str = "application/json";
const BODY_PREVIEW_LIMIT: usize = 2048;

/// A successful response, before decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code (always 2xx)
    pub status: u16,
    /// Full response body as text
    pub body: String,
}

impl RawResponse {
    /// Whether the body carries no content
    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }

    /// Decode the body; an empty body decodes as JSON `null`
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        decode_body(&self.body)
    }
}

/// Connection to the API, owning the token and the pooled transport
///
/// Cloning is cheap and clones share the transport pool and rate limiter.
#[derive(Clone)]
pub struct Connection {
    client: Client,
    base_url: String,
    api_token: String,
    request_timeout: Duration,
    rate_limiter: Option<RateLimiter>,
}

impl Connection {
    /// Create a connection with default settings
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        Self::with_config(ConnectionConfig::new(api_token))
    }

    /// Create a connection from a config
    pub fn with_config(config: ConnectionConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_timeout: config.request_timeout(),
            rate_limiter: config.rate_limit.as_ref().map(RateLimiter::new),
            api_token: config.api_token,
        })
    }

    /// Base URL relative endpoints are rooted at
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if client-side pacing is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Resolve an endpoint to the URL that will be requested
    ///
    /// Absolute URLs are returned unchanged; anything else is joined to the
    /// base URL with exactly one slash.
    pub fn resolve(&self, endpoint: &str) -> String {
        if is_absolute(endpoint) {
            return endpoint.to_string();
        }

        let path = endpoint.trim_start_matches('/');
        format!("{}/{path}", self.base_url)
    }

    /// GET an endpoint and decode the response
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.execute(Method::GET, endpoint, None::<&()>).await
    }

    /// POST a JSON body and decode the response
    pub async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(Method::POST, endpoint, Some(body)).await
    }

    /// PUT a JSON body and decode the response
    pub async fn put<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(Method::PUT, endpoint, Some(body)).await
    }

    /// DELETE an endpoint and decode the response
    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.execute(Method::DELETE, endpoint, None::<&()>).await
    }

    /// Make a request and decode the response into `T`
    pub async fn execute<B, T>(&self, method: Method, endpoint: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(method, endpoint, body).await?.decode()
    }

    /// Make a request and return the raw successful response
    ///
    /// Every non-2xx status is turned into an error here, after the body has
    /// been read in full.
    pub async fn send<B>(&self, method: Method, endpoint: &str, body: Option<&B>) -> Result<RawResponse>
    where
        B: Serialize + ?Sized,
    {
        let url = Url::parse(&self.resolve(endpoint))?;
        let payload = body.map(serde_json::to_string).transpose()?;

        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        debug!("{} {}", method, url);
        if let Some(ref json) = payload {
            debug!("Request body: {}", preview(json));
        }

        let mut req = self
            .client
            .request(method, url.clone())
            .bearer_auth(&self.api_token)
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .header(ACCEPT, APPLICATION_JSON)
            .timeout(self.request_timeout);

        if let Some(json) = payload {
            req = req.body(json);
        }

        let response = req.send().await?;
        let status = response.status();
        debug!("Response code: {}", status.as_u16());

        if !status.is_success() {
            let retry_after = parse_retry_after(response.headers(), Utc::now());
            // An unreadable error body must not hide the status
            let body = response.text().await.unwrap_or_default();
            debug!("Response body: {}", preview(&body));
            return Err(Error::from_status(
                status.as_u16(),
                url.as_str(),
                retry_after,
                body,
            ));
        }

        let body = response.text().await?;
        debug!("Response body: {}", preview(&body));

        Ok(RawResponse {
            status: status.as_u16(),
            body,
        })
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("base_url", &self.base_url)
            .field("api_token", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Check whether an endpoint is already a full URL
pub(crate) fn is_absolute(endpoint: &str) -> bool {
    endpoint.starts_with("http://") || endpoint.starts_with("https://")
}

fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    let decoded = if body.trim().is_empty() {
        serde_json::from_value(JsonValue::Null)
    } else {
        serde_json::from_str(body)
    };

    decoded.map_err(|e| Error::decode(e.to_string()))
}

/// Read `Retry-After` as delta-seconds or an HTTP date
fn parse_retry_after(headers: &HeaderMap, now: DateTime<Utc>) -> Option<u64> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();

    if let Ok(secs) = value.parse::<u64>() {
        return Some(secs);
    }

    let at = DateTime::parse_from_rfc2822(value).ok()?;
    let secs = at.with_timezone(&Utc).signed_duration_since(now).num_seconds();
    Some(secs.max(0) as u64)
}

fn preview(body: &str) -> &str {
    if body.len() <= BODY_PREVIEW_LIMIT {
        return body;
    }

    let mut end = BODY_PREVIEW_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
mod connection_tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_parse_retry_after_seconds() {
        assert_eq!(parse_retry_after(&headers("30"), Utc::now()), Some(30));
        assert_eq!(parse_retry_after(&headers(" 5 "), Utc::now()), Some(5));
    }

    #[test]
    fn test_parse_retry_after_http_date() {
        let now = DateTime::parse_from_rfc2822("Wed, 21 Oct 2015 07:28:00 GMT")
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!(
            parse_retry_after(&headers("Wed, 21 Oct 2015 07:28:45 GMT"), now),
            Some(45)
        );
        assert_eq!(
            parse_retry_after(&headers("Wed, 21 Oct 2015 07:00:00 GMT"), now),
            Some(0)
        );
    }

    #[test]
    fn test_parse_retry_after_absent_or_garbage() {
        assert_eq!(parse_retry_after(&HeaderMap::new(), Utc::now()), None);
        assert_eq!(parse_retry_after(&headers("soon"), Utc::now()), None);
    }

    #[test]
    fn test_decode_empty_body() {
        let value: Option<JsonValue> = decode_body("").unwrap();
        assert!(value.is_none());

        let value: Option<JsonValue> = decode_body("   \n").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_decode_malformed_body() {
        let err = decode_body::<JsonValue>("<html>oops</html>").unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let body = "é".repeat(BODY_PREVIEW_LIMIT);
        let shown = preview(&body);
        assert!(shown.len() <= BODY_PREVIEW_LIMIT);
        assert!(body.starts_with(shown));

        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_is_absolute() {
        assert!(is_absolute("https://coda.io/apis/v1/docs"));
        assert!(is_absolute("http://localhost:1234/x"));
        assert!(!is_absolute("/docs/abc"));
        assert!(!is_absolute("docs/abc"));
    }
}
