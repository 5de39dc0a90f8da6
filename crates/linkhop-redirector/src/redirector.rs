use crate::Result;
use async_trait::async_trait;
use linkhop_core::ShortCode;

/// Outcome of resolving a short code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The code maps to this destination and is still valid.
    Redirect(String),
    /// No link was ever stored under the code.
    NotFound,
    /// The link exists but its expiry has passed or cannot be read.
    Expired,
}

#[async_trait]
pub trait Redirector: Send + Sync + 'static {
    async fn resolve(&self, code: &ShortCode) -> Result<Resolution>;
}

#[async_trait]
impl<T: Redirector + ?Sized> Redirector for std::sync::Arc<T> {
    async fn resolve(&self, code: &ShortCode) -> Result<Resolution> {
        (**self).resolve(code).await
    }
}
