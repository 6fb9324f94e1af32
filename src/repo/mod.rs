//! Version-control interface
//!
//! The pipeline only talks to git through [`Vcs`], so every stage can be
//! exercised against an in-memory repository in tests.

mod git;

pub use git::GitRepo;

use crate::error::{Error, Result};
use crate::types::BranchTracking;
use async_trait::async_trait;

/// Operations the submission pipeline needs from version control
///
/// Methods that mutate the repository return an error when git exits
/// non-zero; queries return `Ok(None)`/`Ok(false)` for a negative answer.
#[async_trait]
pub trait Vcs: Send + Sync {
    /// Name of the checked-out branch (`HEAD` when detached)
    async fn current_branch(&self) -> Result<String>;

    /// All local branch names
    async fn local_branches(&self) -> Result<Vec<String>>;

    /// Whether the working tree matches the last commit
    async fn is_clean(&self) -> Result<bool>;

    /// Resolve a revision to a commit id, `None` if it does not resolve
    async fn rev_parse(&self, rev: &str) -> Result<Option<String>>;

    /// Whether `ancestor` is an ancestor of (or equal to) `descendant`
    async fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool>;

    /// Refresh all remote-tracking refs
    async fn fetch_all(&self) -> Result<()>;

    /// Rebase `branch` (or the checked-out branch) onto `upstream`
    async fn rebase(&self, upstream: &str, branch: Option<&str>) -> Result<()>;

    /// Run an operator-driven interactive rebase of `branch` onto `upstream`
    async fn rebase_interactive(&self, upstream: &str, branch: &str) -> Result<()>;

    /// Abort an in-progress rebase, restoring the pre-rebase state
    async fn rebase_abort(&self) -> Result<()>;

    /// Check out a branch, discarding local changes when `force` is set
    async fn checkout(&self, branch: &str, force: bool) -> Result<()>;

    /// Hard-reset the checked-out branch to a commit
    async fn reset_hard(&self, commit: &str) -> Result<()>;

    /// Push a refspec to a remote
    async fn push(&self, remote: &str, refspec: &str, force: bool) -> Result<()>;

    /// Push a branch and record the remote as its upstream
    async fn push_set_upstream(&self, remote: &str, branch: &str) -> Result<()>;

    /// Delete a branch on a remote
    async fn delete_remote_branch(&self, remote: &str, branch: &str) -> Result<()>;

    /// Force-delete a local branch
    async fn delete_branch(&self, branch: &str) -> Result<()>;

    /// Fast-forward the checked-out branch from its upstream
    async fn pull_ff_only(&self) -> Result<()>;

    /// Read a git config value
    async fn config_get(&self, key: &str) -> Result<Option<String>>;

    /// Whether a revision resolves to a commit
    async fn ref_exists(&self, rev: &str) -> Result<bool> {
        Ok(self.rev_parse(rev).await?.is_some())
    }

    /// Resolve a revision that must exist
    async fn resolve(&self, rev: &str) -> Result<String> {
        self.rev_parse(rev)
            .await?
            .ok_or_else(|| Error::Git(format!("cannot resolve `{rev}`")))
    }

    /// Upstream configuration of a branch (empty when untracked)
    async fn tracking(&self, branch: &str) -> Result<BranchTracking> {
        let remote = self
            .config_get(&format!("branch.{branch}.remote"))
            .await?
            .unwrap_or_default();
        let merge = self
            .config_get(&format!("branch.{branch}.merge"))
            .await?
            .unwrap_or_default();

        Ok(BranchTracking {
            remote,
            merge: merge
                .strip_prefix("refs/heads/")
                .map_or(merge.clone(), ToString::to_string),
        })
    }

    /// URL configured for a remote
    async fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        self.config_get(&format!("remote.{remote}.url")).await
    }
}
