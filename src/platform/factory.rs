//! Platform service factory
//!
//! Splits credential lookup from client construction so the pipeline can
//! report a missing credential before it inspects the remote URL.

use crate::auth::{get_github_auth, DEFAULT_HOST};
use crate::error::Result;
use crate::platform::{GitHubService, PlatformService};
use crate::types::PlatformConfig;
use async_trait::async_trait;
use std::env;
use tracing::debug;

/// Builds authenticated platform services
#[async_trait]
pub trait PlatformFactory: Send + Sync {
    /// Locate an API token; `Error::MissingCredential` when none exists
    async fn credential(&self) -> Result<String>;

    /// Create a service for `config` authenticated with `token`
    fn connect(&self, token: &str, config: &PlatformConfig) -> Result<Box<dyn PlatformService>>;
}

/// Factory for the real GitHub API
#[derive(Debug, Clone, Copy, Default)]
pub struct GitHubFactory;

#[async_trait]
impl PlatformFactory for GitHubFactory {
    async fn credential(&self) -> Result<String> {
        let host = env::var("GH_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let auth = get_github_auth(&host).await?;
        debug!("Using GitHub token from {:?}", auth.source);
        Ok(auth.token)
    }

    fn connect(&self, token: &str, config: &PlatformConfig) -> Result<Box<dyn PlatformService>> {
        Ok(Box::new(GitHubService::new(token, config.clone())?))
    }
}
