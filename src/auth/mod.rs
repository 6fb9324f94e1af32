//! GitHub authentication
//!
//! Supports the hub config file, the gh CLI, and environment variables.

mod github;

pub use github::{
    get_github_auth, hub_config_path, parse_hub_config, GitHubAuthConfig, DEFAULT_HOST,
};

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token from the hub config file
    HubConfig,
    /// Token from the gh CLI
    Cli,
    /// Token from environment variable
    EnvVar,
}
