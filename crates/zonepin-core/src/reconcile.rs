//! Zone reconciler: validate, back up, replace the host's records, write.
//!
//! Each call is a one-shot transaction over the zone file:
//!
//! ```text
//! parse_and_classify --(bad input)--> Validation, nothing touched
//!   -> read zone     --(io error)---> ReadFailed, nothing touched
//!   -> write backup  --(io error)---> logged, continue
//!                                     (BackupFailed if abort policy is set)
//!   -> strip managed lines + append rendered records
//!   -> write zone    --(io error)---> WriteFailed, backup kept
//! ```
//!
//! No state is kept between calls; the zone file is read fresh every time.

use chrono::{Local, NaiveDateTime};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::error::ReconcileError;
use crate::record::{self, AddressRecord};
use crate::store::ZoneStore;

/// Timestamp suffix of backup file names.
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// What happened to the pre-mutation copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupStatus {
    /// Backup written at `path`.
    Written { path: PathBuf },
    /// Backup could not be written; the zone file was rewritten anyway.
    Failed { path: PathBuf, reason: String },
}

impl BackupStatus {
    pub const fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

/// Result of a successful reconciliation.
#[derive(Debug, Clone)]
pub struct Summary {
    /// Records now published for the host, in submission order.
    pub records: Vec<AddressRecord>,
    pub backup: BackupStatus,
}

impl Summary {
    /// Active addresses as display strings.
    pub fn addresses(&self) -> Vec<String> {
        self.records.iter().map(|r| r.address.to_string()).collect()
    }
}

/// Rewrites the managed records of one host in one zone file.
#[derive(Clone)]
pub struct Reconciler {
    file: PathBuf,
    host: String,
    backup_dir: PathBuf,
    abort_on_backup_failure: bool,
    ensure_trailing_newline: bool,
    store: Arc<dyn ZoneStore>,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("file", &self.file)
            .field("host", &self.host)
            .field("backup_dir", &self.backup_dir)
            .field("abort_on_backup_failure", &self.abort_on_backup_failure)
            .field("ensure_trailing_newline", &self.ensure_trailing_newline)
            .finish_non_exhaustive()
    }
}

impl Reconciler {
    pub fn new(config: &Config, store: Arc<dyn ZoneStore>) -> Self {
        Self {
            file: config.file.clone(),
            host: config.host.clone(),
            backup_dir: config.backup_dir.clone(),
            abort_on_backup_failure: config.abort_on_backup_failure,
            ensure_trailing_newline: config.ensure_trailing_newline,
            store,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Addresses currently in the zone file for the host.
    pub fn current_addresses(&self) -> Result<Vec<String>, ReconcileError> {
        let content = self.read_zone()?;
        Ok(record::extract_managed_addresses(&content, &self.host))
    }

    /// Replace the host's records with the addresses in `raw`, using the
    /// current local time for the backup name.
    pub fn reconcile(&self, raw: &str) -> Result<Summary, ReconcileError> {
        self.reconcile_at(raw, Local::now().naive_local())
    }

    /// Same as [`Reconciler::reconcile`] with an explicit backup timestamp.
    #[instrument(skip(self, raw), fields(host = %self.host, file = %self.file.display()))]
    pub fn reconcile_at(&self, raw: &str, now: NaiveDateTime) -> Result<Summary, ReconcileError> {
        let records = record::parse_and_classify(raw)?;
        debug!(count = records.len(), "parsed submitted addresses");

        let original = self.read_zone()?;
        let backup = self.write_backup(original.as_bytes(), now)?;

        let mut updated = record::strip_managed(&original, &self.host);
        if self.ensure_trailing_newline && !updated.is_empty() && !updated.ends_with('\n') {
            updated.push('\n');
        }
        updated.push_str(&record::render(&self.host, &records));

        self.store
            .write(&self.file, updated.as_bytes())
            .map_err(|source| ReconcileError::WriteFailed {
                path: self.file.clone(),
                source,
            })?;

        info!(
            records = records.len(),
            backup_written = backup.is_written(),
            "zone file updated"
        );

        Ok(Summary { records, backup })
    }

    /// Backup file path for a run at `now`: `<backup_dir>/<file name>.<timestamp>`.
    pub fn backup_path(&self, now: NaiveDateTime) -> PathBuf {
        let base = self
            .file
            .file_name()
            .map_or_else(|| "zone".into(), |name| name.to_string_lossy());
        self.backup_dir
            .join(format!("{base}.{}", now.format(BACKUP_TIMESTAMP_FORMAT)))
    }

    fn read_zone(&self) -> Result<String, ReconcileError> {
        let read_failed = |source| ReconcileError::ReadFailed {
            path: self.file.clone(),
            source,
        };
        let bytes = self.store.read(&self.file).map_err(read_failed)?;
        String::from_utf8(bytes)
            .map_err(|e| read_failed(io::Error::new(io::ErrorKind::InvalidData, e)))
    }

    fn write_backup(
        &self,
        original: &[u8],
        now: NaiveDateTime,
    ) -> Result<BackupStatus, ReconcileError> {
        let path = self.backup_path(now);
        match self.store.write(&path, original) {
            Ok(()) => {
                debug!(path = %path.display(), "backup written");
                Ok(BackupStatus::Written { path })
            }
            Err(source) if self.abort_on_backup_failure => {
                warn!(path = %path.display(), error = %source, "backup failed, aborting");
                Err(ReconcileError::BackupFailed { path, source })
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "backup failed, continuing without it");
                Ok(BackupStatus::Failed {
                    path,
                    reason: e.to_string(),
                })
            }
        }
    }
}
