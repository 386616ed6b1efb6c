//! zonepin-core: pin a host's A/AAAA records in a zone fragment to a
//! submitted address list.
//!
//! # Zone fragment
//!
//! A zone fragment is a text file included from a DNS zone. Lines of the
//! exact shape `<host>\tIN\tA\t<address>` or `<host>\tIN\tAAAA\t<address>`
//! are *managed*; every other line is passed through untouched.
//!
//! # Reconciliation
//!
//! [`Reconciler::reconcile`] validates the submitted addresses, writes a
//! timestamped backup of the current file, drops all managed lines and
//! appends one line per submitted address. See [`reconcile`] for the
//! failure behavior of each step.

pub mod config;
pub mod error;
pub mod reconcile;
pub mod record;
pub mod store;

// Re-exports for convenience.
pub use config::Config;
pub use error::{ConfigError, ReconcileError, ValidationError};
pub use reconcile::{BackupStatus, Reconciler, Summary};
pub use record::{
    extract_managed_addresses, parse_and_classify, render, strip_managed, AddressRecord,
    RecordKind,
};
pub use store::{DiskStore, MemoryStore, ZoneStore};
