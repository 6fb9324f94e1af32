//! Restore point for post-mutation failures

use crate::error::Result;
use crate::repo::Vcs;
use tracing::info;

/// Mainline and branch tips recorded before the pipeline mutates anything
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    /// Mainline branch name
    pub mainline: String,
    /// Local mainline tip when recorded
    pub mainline_tip: String,
    /// Submitted branch name
    pub branch: String,
    /// Branch tip when recorded
    pub branch_tip: String,
}

impl Checkpoint {
    /// Record the current tips of `mainline` and `branch`
    pub async fn record(vcs: &dyn Vcs, mainline: &str, branch: &str) -> Result<Self> {
        Ok(Self {
            mainline: mainline.to_string(),
            mainline_tip: vcs.resolve(mainline).await?,
            branch: branch.to_string(),
            branch_tip: vcs.resolve(branch).await?,
        })
    }

    /// Force both branches back to their recorded tips
    ///
    /// Leaves the submitted branch checked out. Restoring twice is harmless.
    pub async fn restore(&self, vcs: &dyn Vcs) -> Result<()> {
        info!(
            "Restoring {} to {} and {} to {}",
            self.mainline, self.mainline_tip, self.branch, self.branch_tip
        );

        vcs.checkout(&self.mainline, true).await?;
        vcs.reset_hard(&self.mainline_tip).await?;
        vcs.checkout(&self.branch, true).await?;
        vcs.reset_hard(&self.branch_tip).await?;
        Ok(())
    }
}
