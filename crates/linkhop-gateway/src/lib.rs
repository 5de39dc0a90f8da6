//! HTTP front end for the linkhop redirect service.

pub mod app;
pub mod cli;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;
pub mod telemetry;

pub use app::App;
pub use cli::{Config, Environment, LogFormat, StorageBackendArg};
pub use error::{AppError, Result};
pub use state::AppState;
