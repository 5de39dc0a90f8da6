//! Link creation for the redirect service.
//!
//! [`validate_long_url`] normalizes user input, and [`ShortenerService`] mints
//! a fresh code for it, retrying on code collisions until the configured
//! attempt budget runs out.

pub mod error;
pub mod service;
pub mod settings;
pub mod shortener;
pub mod validate;

pub use error::{ShortenerError, UrlError};
pub use service::ShortenerService;
pub use settings::{InvalidTtlDays, ShortenerSettings, TtlDays, DEFAULT_MAX_ATTEMPTS};
pub use shortener::Shortener;
pub use validate::{validate_long_url, MAX_URL_LENGTH};
