use std::sync::Arc;

use crate::redirector::{Redirector, Resolution};
use async_trait::async_trait;
use linkhop_cache::LinkCache;
use linkhop_core::{Clock, ReadRepository, ShortCode, SystemClock};
use tracing::{debug, trace};

/// Service for handling URL redirects.
///
/// Reads go to the cache first. On a miss the stored row is fetched and, when
/// still valid, written back to the cache together with its expiry so the
/// cache can never outlive the link.
pub struct RedirectorService<R, C> {
    repository: Arc<R>,
    cache: C,
    clock: Arc<dyn Clock>,
}

impl<R: ReadRepository, C: LinkCache> RedirectorService<R, C> {
    pub fn new(repository: R, cache: C) -> Self {
        Self::with_clock(repository, cache, Arc::new(SystemClock))
    }

    pub fn with_clock(repository: R, cache: C, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository: Arc::new(repository),
            cache,
            clock,
        }
    }

    /// Resolves a short code to its destination.
    pub async fn resolve(&self, code: &ShortCode) -> crate::Result<Resolution> {
        Redirector::resolve(self, code).await
    }
}

#[async_trait]
impl<R: ReadRepository, C: LinkCache> Redirector for RedirectorService<R, C> {
    async fn resolve(&self, code: &ShortCode) -> crate::Result<Resolution> {
        if let Some(long_url) = self.cache.get(code) {
            debug!(code = %code, "Resolved short code from cache");
            return Ok(Resolution::Redirect(long_url));
        }

        trace!(code = %code, "Cache miss, fetching from repository");
        let Some(row) = self.repository.get_by_code(code).await? else {
            trace!(code = %code, "Short code not found");
            return Ok(Resolution::NotFound);
        };

        let now_ms = self.clock.now_ms();
        let expires_at_ms = match row.expires_at_ms() {
            Some(ms) if ms >= now_ms => ms,
            Some(_) => {
                debug!(code = %code, "Link has expired");
                return Ok(Resolution::Expired);
            }
            None => {
                debug!(code = %code, expires_at = %row.expires_at, "Link has unreadable expiry");
                return Ok(Resolution::Expired);
            }
        };

        self.cache.set(code, &row.long_url, expires_at_ms);
        debug!(code = %code, url = %row.long_url, "Resolved short code");
        Ok(Resolution::Redirect(row.long_url))
    }
}

impl<R, C: Clone> Clone for RedirectorService<R, C> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            cache: self.cache.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C: std::fmt::Debug> std::fmt::Debug for RedirectorService<R, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedirectorService")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
