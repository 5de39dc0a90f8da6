//! Short code resolution for the redirect path.
//!
//! [`RedirectorService`] answers "where does this code point, and is it still
//! valid" using a cache-aside protocol: the [`LinkCache`] is consulted first
//! and refilled from the link store on a miss. Expired links are never cached,
//! so they hit the store on every lookup.
//!
//! ```rust
//! use std::num::NonZeroUsize;
//! use std::sync::Arc;
//! use linkhop_cache::BoundedCache;
//! use linkhop_core::ShortCode;
//! use linkhop_redirector::{RedirectorService, Resolution};
//! use linkhop_storage::InMemoryRepository;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let cache = Arc::new(BoundedCache::new(NonZeroUsize::new(1_000).unwrap()));
//! let service = RedirectorService::new(InMemoryRepository::new(), cache);
//!
//! let code = ShortCode::new("abc1234")?;
//! if let Resolution::Redirect(url) = service.resolve(&code).await? {
//!     println!("Redirect to: {url}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`LinkCache`]: linkhop_cache::LinkCache

pub mod error;
pub mod redirector;
pub mod service;

pub use error::{RedirectorError, Result};
pub use redirector::{Redirector, Resolution};
pub use service::RedirectorService;
