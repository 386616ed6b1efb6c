//! DNS daemon reload.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::SrvError;

/// Result of running the reload action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadOutput {
    /// True if the command exited with status 0.
    pub success: bool,
    /// Combined stdout and stderr.
    pub output: String,
}

/// Reloads the DNS daemon after the zone file changed.
#[async_trait]
pub trait Reload: Send + Sync {
    async fn reload(&self) -> crate::Result<ReloadOutput>;
}

/// Runs a shell command via `sh -c`.
#[derive(Debug, Clone)]
pub struct ShellReload {
    command: String,
}

impl ShellReload {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl Reload for ShellReload {
    async fn reload(&self) -> crate::Result<ReloadOutput> {
        if self.command.trim().is_empty() {
            debug!("no reload command configured");
            return Ok(ReloadOutput {
                success: true,
                output: String::new(),
            });
        }

        let out = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| SrvError::Reload(format!("failed to run {:?}: {e}", self.command)))?;

        let mut output = String::from_utf8_lossy(&out.stdout).into_owned();
        output.push_str(&String::from_utf8_lossy(&out.stderr));

        info!(
            command = %self.command,
            status = %out.status,
            "reload command finished"
        );

        Ok(ReloadOutput {
            success: out.status.success(),
            output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_command_is_a_no_op() {
        let out = ShellReload::new("  ").reload().await.unwrap();
        assert!(out.success);
        assert!(out.output.is_empty());
    }

    #[tokio::test]
    async fn test_successful_command() {
        let out = ShellReload::new("echo reloaded").reload().await.unwrap();
        assert!(out.success);
        assert_eq!(out.output.trim(), "reloaded");
    }

    #[tokio::test]
    async fn test_failing_command_captures_stderr() {
        let out = ShellReload::new("echo 'zone not loaded' >&2; exit 3")
            .reload()
            .await
            .unwrap();
        assert!(!out.success);
        assert!(out.output.contains("zone not loaded"));
    }
}
