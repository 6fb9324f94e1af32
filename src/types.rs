//! Core types for git-submit

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A parsed `git-submit` invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    /// Branch to submit (defaults to the checked-out branch)
    pub branch: Option<String>,
    /// Submit even when CI has not reported success
    pub force: bool,
}

/// CI status reported for a branch's tip commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CiStatus {
    /// All checks passed
    Success,
    /// Checks are still running
    Pending,
    /// At least one check failed
    Failure,
    /// At least one check errored
    Error,
    /// No checks reported for the commit
    NoStatus,
}

impl CiStatus {
    /// Whether the gate may pass without `--force`
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for CiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::Pending => "pending",
            Self::Failure => "failure",
            Self::Error => "error",
            Self::NoStatus => "no status",
        };
        f.write_str(s)
    }
}

impl FromStr for CiStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" => Ok(Self::Success),
            "pending" => Ok(Self::Pending),
            "failure" => Ok(Self::Failure),
            "error" => Ok(Self::Error),
            "no status" | "no_status" => Ok(Self::NoStatus),
            other => Err(format!("unknown CI status: {other}")),
        }
    }
}

/// Upstream configuration of a local branch
///
/// Both fields are empty when the branch is untracked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchTracking {
    /// Remote name (`branch.<name>.remote`)
    pub remote: String,
    /// Branch name on the remote, without `refs/heads/`
    pub merge: String,
}

impl BranchTracking {
    /// Whether an upstream remote is configured
    pub const fn is_tracked(&self) -> bool {
        !self.remote.is_empty()
    }

    /// Remote-tracking ref, e.g. `origin/feature-x`
    pub fn remote_ref(&self) -> String {
        format!("{}/{}", self.remote, self.merge)
    }

    /// Full ref name on the remote, e.g. `refs/heads/feature-x`
    pub fn merge_ref(&self) -> String {
        format!("refs/heads/{}", self.merge)
    }
}

/// A pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// Web URL for the PR
    pub html_url: String,
    /// Base branch name
    pub base_ref: String,
    /// Head branch name
    pub head_ref: String,
    /// PR title
    pub title: String,
}

/// GitHub repository coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com)
    pub host: Option<String>,
}
