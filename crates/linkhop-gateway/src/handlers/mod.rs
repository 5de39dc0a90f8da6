mod link;
mod ops;

pub use link::{redirect_handler, shorten_handler, SHORTEN_PURPOSE};
pub use ops::{health_handler, reset_cache_handler};
