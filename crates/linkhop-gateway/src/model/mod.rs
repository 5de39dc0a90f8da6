mod link;
mod ops;

pub use link::{CreateLinkRequest, CreateLinkResponse};
pub use ops::{CacheResetResponse, HealthResponse};
