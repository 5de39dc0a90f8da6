use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use linkhop_core::repository::{ReadRepository, Repository, Result};
use linkhop_core::{format_instant, LinkRow, NewLink, ShortCode, StorageError};
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::trace;

/// In-memory link store backed by a [`DashMap`].
///
/// Rows are never removed, expired ones included, matching a durable store
/// that keeps history. The entry API makes check-and-insert atomic per code.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    rows: DashMap<ShortCode, LinkRow>,
    next_id: AtomicI64,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get_by_code(&self, code: &ShortCode) -> Result<Option<LinkRow>> {
        trace!(code = %code, "Looking up link in memory store");
        Ok(self.rows.get(code).map(|row| row.value().clone()))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, link: NewLink) -> Result<LinkRow> {
        match self.rows.entry(link.code) {
            Entry::Occupied(occupied) => {
                Err(StorageError::UniqueViolation(occupied.key().to_string()))
            }
            Entry::Vacant(vacant) => {
                let row = LinkRow {
                    id: self.next_id.fetch_add(1, Ordering::Relaxed) + 1,
                    code: vacant.key().to_string(),
                    long_url: link.long_url,
                    created_at: format_instant(link.created_at),
                    expires_at: format_instant(link.expires_at),
                    clicks: 0,
                };
                vacant.insert(row.clone());
                Ok(row)
            }
        }
    }
}
