//! CI status lookup
//!
//! The CI gate is optional: when no status tool is installed the pipeline
//! skips it rather than failing closed.

mod hub;

pub use hub::HubCiStatus;

use crate::error::Result;
use crate::types::CiStatus;
use async_trait::async_trait;
use std::path::Path;

/// Source of CI results for a branch's tip commit
#[async_trait]
pub trait CiService: Send + Sync {
    /// Combined CI status of the branch tip
    async fn status(&self, branch: &str) -> Result<CiStatus>;

    /// Human-readable per-check detail, shown when the gate fails
    async fn verbose_status(&self, branch: &str) -> Result<String>;
}

/// Locate an installed CI status tool
///
/// Returns `None` when none is available, which disables the CI gate.
pub async fn detect_ci_service(workdir: &Path) -> Option<Box<dyn CiService>> {
    if HubCiStatus::is_available().await {
        Some(Box::new(HubCiStatus::in_dir(workdir)))
    } else {
        None
    }
}
