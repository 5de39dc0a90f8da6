use linkhop_core::ShortCode;
use std::sync::Arc;

/// A cache of resolved links, keyed by [`ShortCode`].
///
/// Implementations must never return a destination whose expiry has passed.
/// All operations are in-memory and infallible.
pub trait LinkCache: Send + Sync + 'static {
    /// Get the destination URL for `code`.
    ///
    /// Returns `None` on a miss or when the entry has expired. An expired
    /// entry is removed as part of the lookup.
    fn get(&self, code: &ShortCode) -> Option<String>;

    /// Store the destination for `code`, valid until `expires_at_ms`
    /// (Unix milliseconds).
    fn set(&self, code: &ShortCode, long_url: &str, expires_at_ms: i64);

    /// Remove every entry.
    fn clear(&self);

    /// Number of entries currently held, expired or not.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: LinkCache + ?Sized> LinkCache for Arc<T> {
    fn get(&self, code: &ShortCode) -> Option<String> {
        (**self).get(code)
    }

    fn set(&self, code: &ShortCode, long_url: &str, expires_at_ms: i64) {
        (**self).set(code, long_url, expires_at_ms)
    }

    fn clear(&self) {
        (**self).clear()
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}
