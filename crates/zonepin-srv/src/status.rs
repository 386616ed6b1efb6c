//! User-facing status of a submission.

use axum::http::StatusCode;
use zonepin_core::{ReconcileError, ValidationError};

/// Outcome shown on the page after a form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Plain page view, nothing submitted.
    Idle,
    /// Records written and DNS reloaded.
    Done { backup_failed: bool },
    /// Records written, but the reload command failed.
    ReloadFailed,
    /// Form field missing or contained no addresses.
    EmptyRequest,
    /// A submitted line is not an IP address.
    InvalidAddress(String),
    /// Backup could not be written and the abort policy is on.
    BackupFailed,
    /// Zone file could not be read or written.
    Internal,
}

impl Status {
    pub fn message(&self) -> String {
        match self {
            Self::Idle => String::new(),
            Self::Done {
                backup_failed: false,
            } => "All done".into(),
            Self::Done {
                backup_failed: true,
            } => "All done, but the backup could not be written, check the logs".into(),
            Self::ReloadFailed => "Could not reload DNS, check the logs".into(),
            Self::EmptyRequest => "The request is empty or malformed".into(),
            Self::InvalidAddress(token) => format!("Could not parse IP \"{token}\""),
            Self::BackupFailed => "Failed to create a backup, nothing was changed".into(),
            Self::Internal => "An internal error occurred".into(),
        }
    }

    pub const fn is_error(&self) -> bool {
        !matches!(self, Self::Idle | Self::Done { .. })
    }

    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::Idle | Self::Done { .. } => StatusCode::OK,
            Self::EmptyRequest | Self::InvalidAddress(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ReloadFailed | Self::BackupFailed | Self::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<&ReconcileError> for Status {
    fn from(err: &ReconcileError) -> Self {
        match err {
            ReconcileError::Validation(ValidationError::EmptyInput) => Self::EmptyRequest,
            ReconcileError::Validation(ValidationError::InvalidAddress(token)) => {
                Self::InvalidAddress(token.clone())
            }
            ReconcileError::BackupFailed { .. } => Self::BackupFailed,
            ReconcileError::ReadFailed { .. } | ReconcileError::WriteFailed { .. } => {
                Self::Internal
            }
        }
    }
}
