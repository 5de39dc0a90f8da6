use std::sync::Arc;

use crate::cli::Environment;
use linkhop_cache::LinkCache;
use linkhop_ratelimit::{FixedWindowLimiter, RateLimitPolicy};
use linkhop_redirector::Redirector;
use linkhop_shortener::Shortener;
use typed_builder::TypedBuilder;

/// Shared state handed to every handler.
///
/// `cache` is the same cache the redirector reads through; the gateway only
/// touches it directly for the development reset endpoint.
#[derive(Clone, TypedBuilder)]
pub struct AppState {
    pub(crate) shortener: Arc<dyn Shortener>,
    pub(crate) redirector: Arc<dyn Redirector>,
    pub(crate) cache: Arc<dyn LinkCache>,
    pub(crate) limiter: Arc<FixedWindowLimiter>,
    #[builder(default)]
    pub(crate) policy: RateLimitPolicy,
    #[builder(setter(into))]
    pub(crate) base_url: Arc<str>,
    #[builder(default)]
    pub(crate) environment: Environment,
}
