//! Error types for zone reconciliation and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Rejected address input. Validation stops at the first bad token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No non-empty lines were submitted.
    #[error("no addresses submitted")]
    EmptyInput,

    /// A non-empty line did not parse as an IPv4 or IPv6 address.
    #[error("invalid IP address: {0:?}")]
    InvalidAddress(String),
}

/// Errors from a reconciliation run.
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// Submitted addresses were rejected; no file was touched.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The zone file could not be read; no file was touched.
    #[error("failed to read zone file {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backup copy could not be written.
    ///
    /// Only returned when the abort-on-backup-failure policy is enabled,
    /// otherwise the failure is logged and reported in the summary.
    #[error("failed to write backup {}: {source}", path.display())]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The zone file could not be overwritten. The backup, if written,
    /// holds the previous content.
    #[error("failed to write zone file {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReconcileError {
    /// Returns true if the error was caused by the submitted input rather
    /// than by the server's file system.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Configuration loading and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file content is not valid TOML/JSON for [`crate::Config`].
    #[error("failed to parse config {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Config parsed but a field has an unusable value.
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_converts_into_reconcile_error() {
        let err: ReconcileError = ValidationError::InvalidAddress("nope".into()).into();
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "invalid IP address: \"nope\"");
    }

    #[test]
    fn test_io_errors_are_not_client_errors() {
        let err = ReconcileError::WriteFailed {
            path: PathBuf::from("/etc/bind/zone"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!err.is_client_error());
        assert!(err.to_string().contains("/etc/bind/zone"));
    }
}
