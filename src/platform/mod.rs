//! GitHub platform service
//!
//! Only squash-on-host mode talks to the hosting API.

mod detection;
mod factory;
mod github;

pub use detection::{is_github_host, parse_repo_info};
pub use factory::{GitHubFactory, PlatformFactory};
pub use github::GitHubService;

use crate::error::Result;
use crate::types::PullRequest;
use async_trait::async_trait;

/// Platform service trait for PR operations
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Find the open PR whose head is `head` and whose base is `base`
    async fn find_open_pr(&self, head: &str, base: &str) -> Result<Option<PullRequest>>;

    /// Squash-merge a PR, refusing if its head is no longer `expected_head_sha`
    async fn squash_merge(&self, pr_number: u64, expected_head_sha: &str) -> Result<()>;
}
