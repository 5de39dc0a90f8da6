//! Fixed-window rate limiting for the link creation path.

pub mod client;
pub mod fixed_window;

pub use client::{client_identity, UNKNOWN_CLIENT};
pub use fixed_window::{
    FixedWindowLimiter, RateLimitDecision, RateLimitPolicy, DEFAULT_MAX_BUCKETS,
};
