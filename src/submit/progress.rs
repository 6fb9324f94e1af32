//! Progress callback trait for interface-agnostic updates
//!
//! The pipeline never prints. Everything the operator sees goes through a
//! [`ProgressCallback`], so the CLI decides on streams and styling.

use crate::submit::Checkpoint;
use crate::types::PullRequest;
use async_trait::async_trait;
use std::fmt;

/// Submission phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Resolving the branch and checking the working tree
    Validating,
    /// Waiting on the CI gate
    CheckingCi,
    /// Refreshing remote-tracking refs
    Fetching,
    /// Rebasing the branch into a single commit on mainline
    Negotiating,
    /// Landing the commit on mainline
    Integrating,
    /// Deleting the submitted branch
    CleaningUp,
    /// Submission complete
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Validating => "Validating",
            Self::CheckingCi => "Checking CI status",
            Self::Fetching => "Fetching",
            Self::Negotiating => "Checking history",
            Self::Integrating => "Landing on mainline",
            Self::CleaningUp => "Cleaning up",
            Self::Complete => "Done",
        };
        f.write_str(s)
    }
}

/// Progress callback trait
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called when entering a new phase
    async fn on_phase(&self, phase: Phase);

    /// Called with a general status message
    async fn on_message(&self, message: &str);

    /// Called when the pipeline continues despite a problem
    async fn on_warning(&self, message: &str);

    /// Called with commands the operator may want to copy and run
    async fn on_instructions(&self, text: &str);

    /// Called after GitHub squash-merged the pull request
    async fn on_pr_merged(&self, pr: &PullRequest);

    /// Called before mainline and the branch are reset to their saved tips
    async fn on_rollback(&self, checkpoint: &Checkpoint);
}

/// No-op progress callback for testing or when progress isn't needed
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_phase(&self, _phase: Phase) {}
    async fn on_message(&self, _message: &str) {}
    async fn on_warning(&self, _message: &str) {}
    async fn on_instructions(&self, _text: &str) {}
    async fn on_pr_merged(&self, _pr: &PullRequest) {}
    async fn on_rollback(&self, _checkpoint: &Checkpoint) {}
}
