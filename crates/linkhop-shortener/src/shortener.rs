use crate::error::Result;
use async_trait::async_trait;
use linkhop_core::LinkRow;

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Validates `long_url` and stores it under a freshly generated code.
    async fn shorten(&self, long_url: &str) -> Result<LinkRow>;
}

#[async_trait]
impl<T: Shortener + ?Sized> Shortener for std::sync::Arc<T> {
    async fn shorten(&self, long_url: &str) -> Result<LinkRow> {
        (**self).shorten(long_url).await
    }
}
