//! Token-bucket admission control.

use std::sync::Mutex;
use std::time::Instant;

use revdb_core::{RevError, RevResult};

/// Shared token bucket.
///
/// Starts full with `burst` tokens and refills continuously at
/// `rate_per_second`, never exceeding `burst`. Each admitted request takes one
/// token.
#[derive(Debug)]
pub struct RateLimiter {
    rate_per_second: f64,
    burst: f64,
    bucket: Mutex<Bucket>,
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    refilled_at: Instant,
}

impl RateLimiter {
    pub fn new(rate_per_second: f64, burst: u32) -> Self {
        Self::new_at(rate_per_second, burst, Instant::now())
    }

    fn new_at(rate_per_second: f64, burst: u32, now: Instant) -> Self {
        let burst = f64::from(burst.max(1));
        Self {
            rate_per_second: rate_per_second.max(0.0),
            burst,
            bucket: Mutex::new(Bucket {
                tokens: burst,
                refilled_at: now,
            }),
        }
    }

    /// Take a token if one is available.
    ///
    /// A rejection carries the whole seconds until the next token refills.
    pub fn try_acquire(&self) -> RevResult<()> {
        self.try_acquire_at(Instant::now())
    }

    fn try_acquire_at(&self, now: Instant) -> RevResult<()> {
        // a panic while holding this lock cannot leave the bucket inconsistent
        let mut bucket = self
            .bucket
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let elapsed = now.saturating_duration_since(bucket.refilled_at).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.rate_per_second).min(self.burst);
        bucket.refilled_at = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            return Ok(());
        }

        let retry_after = (self.rate_per_second > 0.0)
            .then(|| ((1.0 - bucket.tokens) / self.rate_per_second).ceil().max(1.0) as u64);
        Err(RevError::rate_limit("Too Many Requests", retry_after))
    }
}
