//! Fixed-window request counting.

use http::header::{HeaderName, HeaderValue, RETRY_AFTER};
use linkhop_cache::FifoMap;
use linkhop_core::{Clock, SystemClock};
use parking_lot::Mutex;
use std::num::{NonZeroU32, NonZeroU64, NonZeroUsize};
use std::sync::Arc;
use tracing::{debug, trace};

/// Default maximum number of buckets held by a [`FixedWindowLimiter`].
pub const DEFAULT_MAX_BUCKETS: usize = 50_000;

pub const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
pub const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
pub const X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

/// How many requests a client may make per window.
///
/// Both values are non-zero by construction, so a limiter can never be asked
/// to divide by an empty window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    limit: NonZeroU32,
    window_ms: NonZeroU64,
}

impl RateLimitPolicy {
    pub fn new(limit: NonZeroU32, window_ms: NonZeroU64) -> Self {
        Self { limit, window_ms }
    }

    pub fn limit(&self) -> u32 {
        self.limit.get()
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms.get()
    }
}

impl Default for RateLimitPolicy {
    /// 10 requests per 60 second window.
    fn default() -> Self {
        Self {
            limit: NonZeroU32::new(10).unwrap_or(NonZeroU32::MIN),
            window_ms: NonZeroU64::new(60_000).unwrap_or(NonZeroU64::MIN),
        }
    }
}

/// Outcome of a single [`FixedWindowLimiter::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// End of the current window, in Unix seconds.
    pub reset_at_epoch_seconds: i64,
    /// Seconds until the window resets. Only set when the request was rejected.
    pub retry_after_seconds: Option<u64>,
}

impl RateLimitDecision {
    /// The `X-RateLimit-*` headers, plus `Retry-After` on rejection.
    pub fn headers(&self) -> Vec<(HeaderName, HeaderValue)> {
        let mut headers = vec![
            (X_RATELIMIT_LIMIT, HeaderValue::from(self.limit)),
            (X_RATELIMIT_REMAINING, HeaderValue::from(self.remaining)),
            (X_RATELIMIT_RESET, HeaderValue::from(self.reset_at_epoch_seconds)),
        ];
        if let Some(retry_after) = self.retry_after_seconds {
            headers.push((RETRY_AFTER, HeaderValue::from(retry_after)));
        }
        headers
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct BucketKey {
    purpose: String,
    client: String,
    window_start_ms: i64,
}

#[derive(Debug, Clone)]
struct Bucket {
    count: u32,
    reset_at_ms: i64,
}

/// A fixed-window rate limiter.
///
/// Requests are grouped into clock-aligned windows of `window_ms`. Each
/// `(purpose, client, window start)` triple gets its own counter, so a new
/// window simply starts a new bucket; buckets from past windows are never
/// consulted again and age out through FIFO eviction once the store is full.
///
/// Exactly `limit` requests per window are allowed. The bucket store is one
/// mutex-guarded [`FifoMap`], independent of any link cache.
pub struct FixedWindowLimiter {
    buckets: Mutex<FifoMap<BucketKey, Bucket>>,
    clock: Arc<dyn Clock>,
}

impl FixedWindowLimiter {
    /// Creates a limiter holding at most `max_buckets` buckets, using the system clock.
    pub fn new(max_buckets: NonZeroUsize) -> Self {
        Self::with_clock(max_buckets, Arc::new(SystemClock))
    }

    /// Creates a limiter with a custom [`Clock`] for [`check_now`](Self::check_now).
    pub fn with_clock(max_buckets: NonZeroUsize, clock: Arc<dyn Clock>) -> Self {
        Self {
            buckets: Mutex::new(FifoMap::new(max_buckets)),
            clock,
        }
    }

    /// Counts one request for `client` under `purpose` at `now_ms`.
    pub fn check(
        &self,
        purpose: &str,
        client: &str,
        policy: RateLimitPolicy,
        now_ms: i64,
    ) -> RateLimitDecision {
        // Windows longer than i64::MAX ms are meaningless; clamp so the math stays signed.
        let window_ms = i64::try_from(policy.window_ms()).unwrap_or(i64::MAX);
        let window_start_ms = now_ms.div_euclid(window_ms) * window_ms;
        let reset_at_ms = window_start_ms.saturating_add(window_ms);

        let key = BucketKey {
            purpose: purpose.to_owned(),
            client: client.to_owned(),
            window_start_ms,
        };

        let (count, reset_at_ms) = {
            let mut buckets = self.buckets.lock();
            match buckets.get_mut(&key) {
                Some(bucket) => {
                    bucket.count = bucket.count.saturating_add(1);
                    (bucket.count, bucket.reset_at_ms)
                }
                None => {
                    let evicted = buckets.insert(
                        key,
                        Bucket {
                            count: 1,
                            reset_at_ms,
                        },
                    );
                    if evicted > 0 {
                        trace!(evicted, "Evicted oldest rate limit buckets");
                    }
                    (1, reset_at_ms)
                }
            }
        };

        let limit = policy.limit();
        let allowed = count <= limit;
        let remaining = limit.saturating_sub(count);
        let retry_after_seconds = (!allowed).then(|| {
            let until_reset_ms = reset_at_ms.saturating_sub(now_ms).max(0);
            until_reset_ms.div_euclid(1_000) as u64 + u64::from(until_reset_ms % 1_000 != 0)
        });

        if !allowed {
            debug!(purpose, client, count, limit, "Rate limit exceeded");
        }

        RateLimitDecision {
            allowed,
            limit,
            remaining,
            reset_at_epoch_seconds: reset_at_ms.div_euclid(1_000),
            retry_after_seconds,
        }
    }

    /// [`check`](Self::check) at the limiter clock's current time.
    pub fn check_now(
        &self,
        purpose: &str,
        client: &str,
        policy: RateLimitPolicy,
    ) -> RateLimitDecision {
        self.check(purpose, client, policy, self.clock.now_ms())
    }

    /// Number of buckets currently held.
    pub fn len(&self) -> usize {
        self.buckets.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.buckets.lock().clear();
    }
}

impl Default for FixedWindowLimiter {
    fn default() -> Self {
        Self::new(NonZeroUsize::new(DEFAULT_MAX_BUCKETS).unwrap_or(NonZeroUsize::MIN))
    }
}

impl std::fmt::Debug for FixedWindowLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let buckets = self.buckets.lock();
        f.debug_struct("FixedWindowLimiter")
            .field("len", &buckets.len())
            .field("capacity", &buckets.capacity())
            .finish()
    }
}
