//! CI status through the `hub` CLI (`hub ci-status`)

use crate::ci::CiService;
use crate::error::{Error, Result};
use crate::types::CiStatus;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

/// `hub ci-status` wrapper
///
/// hub exits non-zero for every status other than success, so the exit code
/// is ignored and the status word on stdout is parsed instead.
#[derive(Debug, Clone)]
pub struct HubCiStatus {
    workdir: PathBuf,
}

impl HubCiStatus {
    /// Query from a specific repository directory
    pub fn in_dir(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Whether `hub` is installed
    pub async fn is_available() -> bool {
        Command::new("hub")
            .arg("--version")
            .output()
            .await
            .is_ok_and(|o| o.status.success())
    }

    async fn hub(&self, args: &[&str]) -> Result<Output> {
        debug!("hub {}", args.join(" "));
        let output = Command::new("hub")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .await?;
        Ok(output)
    }
}

/// Parse the status word printed by `hub ci-status`
pub fn parse_ci_status(stdout: &str) -> Result<CiStatus> {
    let line = stdout.lines().next().unwrap_or_default();
    line.parse::<CiStatus>().map_err(Error::Ci)
}

#[async_trait]
impl CiService for HubCiStatus {
    async fn status(&self, branch: &str) -> Result<CiStatus> {
        let output = self.hub(&["ci-status", branch]).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        parse_ci_status(&stdout).map_err(|e| {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.trim().is_empty() {
                e
            } else {
                Error::Ci(stderr.trim().to_string())
            }
        })
    }

    async fn verbose_status(&self, branch: &str) -> Result<String> {
        let output = self.hub(&["ci-status", "-v", branch]).await?;
        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    }
}
