//! In-memory caching for the redirect read path.
//!
//! [`BoundedCache`] is the concrete [`LinkCache`]: a capacity-bounded map with
//! FIFO eviction and lazy expiry. [`FifoMap`] is the ordered map underneath it,
//! also reused by the rate limiter's bucket store.

pub mod bounded;
pub mod cache;
pub mod fifo;

pub use bounded::{BoundedCache, DEFAULT_MAX_ENTRIES};
pub use cache::LinkCache;
pub use fifo::FifoMap;
