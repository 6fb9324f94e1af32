//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{PlatformConfig, PullRequest};
use async_trait::async_trait;
use octocrab::models::pulls::PullRequest as ApiPullRequest;
use octocrab::params::pulls::MergeMethod;
use octocrab::params::State;
use octocrab::Octocrab;
use tracing::debug;

/// GitHub (or GitHub Enterprise) API client for one repository
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
}

impl GitHubService {
    /// Authenticate against the repository described by `config`
    pub fn new(token: &str, config: PlatformConfig) -> Result<Self> {
        let api_error = |e: octocrab::Error| Error::GitHubApi(e.to_string());

        let builder = Octocrab::builder().personal_token(token.to_string());
        let builder = match &config.host {
            Some(host) => builder
                .base_uri(format!("https://{host}/api/v3"))
                .map_err(api_error)?,
            None => builder,
        };

        Ok(Self {
            client: builder.build().map_err(api_error)?,
            config,
        })
    }
}

fn to_pull_request(pr: &ApiPullRequest) -> PullRequest {
    PullRequest {
        number: pr.number,
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        base_ref: pr.base.ref_field.clone(),
        head_ref: pr.head.ref_field.clone(),
        title: pr.title.clone().unwrap_or_default(),
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn find_open_pr(&self, head: &str, base: &str) -> Result<Option<PullRequest>> {
        let PlatformConfig { owner, repo, .. } = &self.config;

        // GitHub filters heads by `owner:branch`.
        let page = self
            .client
            .pulls(owner, repo)
            .list()
            .state(State::Open)
            .head(format!("{owner}:{head}"))
            .base(base)
            .send()
            .await?;

        Ok(page.items.first().map(to_pull_request))
    }

    async fn squash_merge(&self, pr_number: u64, expected_head_sha: &str) -> Result<()> {
        let PlatformConfig { owner, repo, .. } = &self.config;
        debug!("Squash-merging {owner}/{repo}#{pr_number} at {expected_head_sha}");

        let merge = self
            .client
            .pulls(owner, repo)
            .merge(pr_number)
            .method(MergeMethod::Squash)
            .sha(expected_head_sha)
            .send()
            .await?;

        if !merge.merged {
            return Err(Error::GitHubApi(format!(
                "PR #{pr_number} was not merged: {}",
                merge.message.unwrap_or_default()
            )));
        }
        Ok(())
    }
}
