//! Process-wide token-bucket admission control
//!
//! One bucket is shared by every route. Denied requests are rejected
//! immediately; nothing waits for a token.

use std::num::NonZeroU32;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};

use crate::{
    config::RateLimitConfig,
    error::{Error, Result},
};

/// Token bucket with a burst capacity and a steady refill rate
///
/// Backed by a lock-free GCRA limiter, so concurrent callers never block
/// each other.
pub struct TokenBucket {
    limiter: DefaultDirectRateLimiter,
    capacity: NonZeroU32,
    refill_per_sec: NonZeroU32,
}

impl TokenBucket {
    pub fn new(capacity: NonZeroU32, refill_per_sec: NonZeroU32) -> Self {
        let quota = Quota::per_second(refill_per_sec).allow_burst(capacity);
        Self {
            limiter: RateLimiter::direct(quota),
            capacity,
            refill_per_sec,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Result<Self> {
        let capacity = NonZeroU32::new(config.capacity)
            .ok_or_else(|| Error::InvalidConfig("rate_limit.capacity must be positive".to_string()))?;
        let refill = NonZeroU32::new(config.refill_per_sec).ok_or_else(|| {
            Error::InvalidConfig("rate_limit.refill_per_sec must be positive".to_string())
        })?;
        Ok(Self::new(capacity, refill))
    }

    /// Take one token if available
    pub fn allow(&self) -> bool {
        self.limiter.check().is_ok()
    }

    pub fn capacity(&self) -> u32 {
        self.capacity.get()
    }

    pub fn refill_per_sec(&self) -> u32 {
        self.refill_per_sec.get()
    }
}

/// Reject the request with 429 when the bucket is empty
pub async fn enforce(
    State(bucket): State<Arc<TokenBucket>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response> {
    if !bucket.allow() {
        return Err(Error::RateLimitExceeded);
    }
    Ok(next.run(request).await)
}
