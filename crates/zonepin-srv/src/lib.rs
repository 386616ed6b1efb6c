//! zonepin-srv: web form in front of the zone reconciler.
//!
//! # Request flow
//!
//! ```text
//! GET  /  -> read zone file -> page with current records
//! POST /  -> reconcile (blocking pool, serialized) -> reload command -> page
//! ```
//!
//! The page always shows the records that are in the zone file after the
//! request: the submitted list on success, a fresh read otherwise.

pub mod app;
pub mod cli;
pub mod error;
pub mod page;
pub mod reload;
pub mod routes;
pub mod server;
pub mod status;
pub mod telemetry;

// Re-exports for convenience.
pub use app::{AppState, Outcome};
pub use cli::run;
pub use error::SrvError;
pub use status::Status;

/// Result type for zonepin-srv operations.
pub type Result<T> = std::result::Result<T, SrvError>;
