use crate::error::StorageError;
use crate::link::{LinkRow, NewLink};
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// Result type for link store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A read-only view of a link store.
///
/// The redirector only ever needs this half of the contract.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the stored row for a given short code.
    /// Returns `None` if the code does not exist.
    ///
    /// Expired rows are still returned; deciding validity is the caller's job.
    async fn get_by_code(&self, code: &ShortCode) -> Result<Option<LinkRow>>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new link and returns the stored row.
    ///
    /// Returns `Err(StorageError::UniqueViolation)` if the code already exists.
    async fn insert(&self, link: NewLink) -> Result<LinkRow>;
}

#[async_trait]
impl<T: ReadRepository + ?Sized> ReadRepository for std::sync::Arc<T> {
    async fn get_by_code(&self, code: &ShortCode) -> Result<Option<LinkRow>> {
        (**self).get_by_code(code).await
    }
}

#[async_trait]
impl<T: Repository + ?Sized> Repository for std::sync::Arc<T> {
    async fn insert(&self, link: NewLink) -> Result<LinkRow> {
        (**self).insert(link).await
    }
}
