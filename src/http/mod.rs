//! HTTP connection module
//!
//! Provides the authenticated [`Connection`] every resource operation goes
//! through.
//!
//! # Features
//!
//! - **Endpoint resolution**: relative paths are rooted at the base URL, absolute
//!   URLs (pagination links) are used verbatim
//! - **Typed decoding**: the caller picks the response type at the call site
//! - **Error classification**: 401/404/429/other statuses map onto [`crate::Error`]
//! - **Pacing**: optional token bucket rate limiting using governor

mod connection;
mod rate_limit;

pub(crate) use connection::is_absolute;
pub use connection::{Connection, RawResponse};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
