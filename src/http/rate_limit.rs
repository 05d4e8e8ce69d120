//! Client-side request pacing
//!
//! Uses the governor crate for token bucket rate limiting. Pacing only spaces
//! requests out; it never retries and never hides a 429 from the caller.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for client-side pacing: `requests` per `per_seconds` window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    /// Requests allowed in one window (also the burst size)
    pub requests: u32,
    /// Window length in seconds
    pub per_seconds: u64,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self::reads()
    }
}

impl RateLimiterConfig {
    /// Create a new rate limiter config
    pub fn new(requests: u32, per_seconds: u64) -> Self {
        Self {
            requests,
            per_seconds,
        }
    }

    /// Published read quota: 100 requests per 6 seconds
    pub fn reads() -> Self {
        Self::new(100, 6)
    }

    /// Published write quota: 10 requests per 6 seconds
    pub fn writes() -> Self {
        Self::new(10, 6)
    }

    fn quota(&self) -> Quota {
        let burst = NonZeroU32::new(self.requests).unwrap_or(NonZeroU32::MIN);
        let window = Duration::from_secs(self.per_seconds.max(1));
        let interval = window / burst.get();

        Quota::with_period(interval)
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst)
    }
}

/// Token bucket shared by clones of a connection
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given config
    pub fn new(config: &RateLimiterConfig) -> Self {
        Self {
            limiter: Arc::new(Governor::direct(config.quota())),
        }
    }

    /// Wait until a request can be made
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Try to acquire a permit, returning immediately
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish()
    }
}
