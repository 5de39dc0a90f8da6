//! Core types and traits for the linkhop redirect service.
//!
//! This crate provides the shared vocabulary used by the shortener, the
//! redirector and the storage backends: short codes, stored link rows, the
//! link store contract and the clock abstraction used for expiry math.

pub mod clock;
pub mod error;
pub mod link;
pub mod repository;
pub mod shortcode;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, StorageError};
pub use link::{format_instant, LinkRow, NewLink};
pub use repository::{ReadRepository, Repository};
pub use shortcode::ShortCode;
