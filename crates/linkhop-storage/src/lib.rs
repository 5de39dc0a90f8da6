//! Link store implementations.
//!
//! [`InMemoryRepository`] keeps everything in process and is what the gateway
//! runs with by default. [`PgRepository`] is the durable Postgres store.

pub mod memory;
pub mod postgres;

pub use linkhop_core::repository::{ReadRepository, Repository, Result};
pub use linkhop_core::StorageError;
pub use memory::InMemoryRepository;
pub use postgres::{PgRepository, PoolSettings};
