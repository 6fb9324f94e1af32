//! Error types for git-submit
//!
//! Every reason the pipeline can stop has its own variant and its own exit
//! code, so calling scripts can branch on the outcome without parsing text.

use crate::types::CiStatus;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while submitting a branch
#[derive(Debug, Error)]
pub enum Error {
    /// No branch given and the checked-out one cannot be submitted
    #[error("no branch specified; `{current}` cannot be submitted")]
    NoBranchSpecified {
        /// Checked-out branch (mainline, or `HEAD` when detached)
        current: String,
        /// Other local branches, offered as a hint
        candidates: Vec<String>,
    },

    /// Uncommitted modifications in the working tree
    #[error("working tree has uncommitted changes; commit or stash them first")]
    DirtyWorkingTree,

    /// The branch does not resolve to a commit
    #[error("`{0}` is not a valid branch")]
    InvalidBranch(String),

    /// CI did not report success and `--force` was not given
    #[error("CI status for `{branch}` is {status}; use --force to submit anyway")]
    CiGateFailed {
        /// Branch that was checked
        branch: String,
        /// Reported status
        status: CiStatus,
    },

    /// Automatic rebase onto mainline hit a conflict
    #[error("rebasing `{branch}` onto `{onto}` failed; the rebase was aborted")]
    RebaseConflict {
        /// Branch being rebased
        branch: String,
        /// Upstream it was rebased onto
        onto: String,
    },

    /// More than one commit on the branch in squash-on-host mode
    #[error("`{0}` has more than one commit on top of mainline; squash it first")]
    MultipleCommitsNotAllowed(String),

    /// Operator-driven interactive rebase did not complete
    #[error("interactive rebase of `{0}` failed; the rebase was aborted")]
    InteractiveRebaseFailed(String),

    /// Operator declined to squash the branch history
    #[error("`{0}` must be a single commit on top of mainline")]
    UserDeclinedRebase(String),

    /// Branch has no upstream configured
    #[error("`{0}` does not track a remote branch")]
    BranchNotTracked(String),

    /// No GitHub token could be located
    #[error("no GitHub credential found; run `hub` or `gh auth login`, or set GITHUB_TOKEN")]
    MissingCredential,

    /// Remote URL does not point at a supported GitHub repository
    #[error("cannot determine the GitHub repository from remote URL `{0}`")]
    UnresolvableRepository(String),

    /// No open pull request for the branch against mainline
    #[error("no open pull request from `{head}` into `{base}`")]
    PullRequestNotFound {
        /// Head branch
        head: String,
        /// Base branch
        base: String,
    },

    /// A step after the repository was mutated failed; tips were restored
    #[error("{cause}; restored `{mainline}` and `{branch}` to their previous commits")]
    RolledBack {
        /// Description of the failure that triggered the rollback
        cause: String,
        /// Mainline branch name
        mainline: String,
        /// Submitted branch name
        branch: String,
    },

    /// A step after mutation failed and restoring the tips failed as well
    #[error("{cause}; rollback failed: {rollback}")]
    RollbackFailed {
        /// Description of the original failure
        cause: String,
        /// Description of the rollback failure
        rollback: String,
    },

    /// Path is not inside a git work tree
    #[error("not a git repository: {}", .0.display())]
    NotARepository(PathBuf),

    /// A git command failed
    #[error("git error: {0}")]
    Git(String),

    /// The CI status tool failed or produced unexpected output
    #[error("CI status error: {0}")]
    Ci(String),

    /// GitHub API error
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Interactive prompt failure
    #[error("prompt error: {0}")]
    Prompt(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        Self::GitHubApi(err.to_string())
    }
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Self::Prompt(err.to_string())
    }
}

impl Error {
    /// Process exit code for this failure
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::NotARepository(_)
            | Self::Git(_)
            | Self::Ci(_)
            | Self::GitHubApi(_)
            | Self::Prompt(_)
            | Self::Io(_) => 1,
            Self::NoBranchSpecified { .. } => 3,
            Self::DirtyWorkingTree => 4,
            Self::InvalidBranch(_) => 5,
            Self::CiGateFailed { .. } => 6,
            Self::RebaseConflict { .. } => 7,
            Self::MultipleCommitsNotAllowed(_) => 8,
            Self::InteractiveRebaseFailed(_) => 9,
            Self::UserDeclinedRebase(_) => 10,
            Self::BranchNotTracked(_) => 11,
            Self::MissingCredential => 12,
            Self::UnresolvableRepository(_) => 13,
            Self::PullRequestNotFound { .. } => 14,
            Self::RolledBack { .. } => 20,
            Self::RollbackFailed { .. } => 21,
        }
    }
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;
