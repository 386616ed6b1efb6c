//! Shared service state: reconcile, then reload.

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, warn};
use zonepin_core::{Config, Reconciler, ZoneStore};

use crate::error::SrvError;
use crate::page::{Page, PageView};
use crate::reload::Reload;
use crate::status::Status;

/// Result of applying a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: Status,
    /// Addresses now in the zone file, when the write succeeded.
    pub addresses: Option<Vec<String>>,
}

impl Outcome {
    const fn failed(status: Status) -> Self {
        Self {
            status,
            addresses: None,
        }
    }
}

/// State shared by all listeners and requests.
pub struct AppState {
    config: Config,
    reconciler: Reconciler,
    reloader: Arc<dyn Reload>,
    page: Page,
    /// Held for the whole reconcile + reload sequence so two submissions
    /// never interleave their writes. The guard travels into the blocking
    /// task, so it outlives a dropped request.
    write_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn ZoneStore>,
        reloader: Arc<dyn Reload>,
    ) -> crate::Result<Self> {
        let reconciler = Reconciler::new(&config, store);
        Ok(Self {
            config,
            reconciler,
            reloader,
            page: Page::new()?,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Addresses currently published for the host, read fresh from disk.
    pub async fn current_addresses(&self) -> crate::Result<Vec<String>> {
        let reconciler = self.reconciler.clone();
        let addresses = tokio::task::spawn_blocking(move || reconciler.current_addresses())
            .await
            .map_err(|e| SrvError::Task(e.to_string()))??;
        Ok(addresses)
    }

    /// Replace the host's records with `raw` and reload the DNS daemon.
    pub async fn apply(&self, raw: String) -> Outcome {
        let guard = Arc::clone(&self.write_lock).lock_owned().await;

        let reconciler = self.reconciler.clone();
        let joined = tokio::task::spawn_blocking(move || {
            let result = reconciler.reconcile(&raw);
            (result, guard)
        })
        .await;

        let (result, _guard) = match joined {
            Ok(done) => done,
            Err(e) => {
                error!(error = %e, "zone update task failed");
                return Outcome::failed(Status::Internal);
            }
        };

        let summary = match result {
            Ok(summary) => summary,
            Err(e) if e.is_client_error() => {
                warn!(error = %e, "rejected submission");
                return Outcome::failed(Status::from(&e));
            }
            Err(e) => {
                error!(error = %e, "zone update failed");
                return Outcome::failed(Status::from(&e));
            }
        };

        let status = match self.reloader.reload().await {
            Ok(out) if out.success => Status::Done {
                backup_failed: !summary.backup.is_written(),
            },
            Ok(out) => {
                error!(output = %out.output, "reload command failed");
                Status::ReloadFailed
            }
            Err(e) => {
                error!(error = %e, "reload command failed");
                Status::ReloadFailed
            }
        };

        Outcome {
            status,
            addresses: Some(summary.addresses()),
        }
    }

    /// Render the page for `status`.
    ///
    /// When `addresses` is `None` the zone file is read again; a read
    /// failure is logged and shown as an empty list.
    pub async fn render(
        &self,
        status: &Status,
        addresses: Option<Vec<String>>,
    ) -> crate::Result<String> {
        let addresses = match addresses {
            Some(addresses) => addresses,
            None => self.current_addresses().await.unwrap_or_else(|e| {
                error!(error = %e, "failed to read current records");
                Vec::new()
            }),
        };
        let view = PageView::new(
            &self.config.domain,
            &self.config.host,
            &addresses,
            status,
        );
        self.page.render(&view)
    }
}
