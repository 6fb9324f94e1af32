//! GitHub credential lookup

use crate::auth::AuthSource;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

/// Public GitHub host
pub const DEFAULT_HOST: &str = "github.com";

/// One account entry under a host in hub's config
#[derive(Debug, Deserialize)]
struct HubHostEntry {
    user: Option<String>,
    oauth_token: Option<String>,
}

/// GitHub authentication configuration
#[derive(Debug, Clone)]
pub struct GitHubAuthConfig {
    /// Authentication token
    pub token: String,
    /// Where the token was obtained from
    pub source: AuthSource,
}

/// Get GitHub authentication for `host`
///
/// Priority:
/// 1. hub config file (`oauth_token` under the host entry)
/// 2. gh CLI (`gh auth token`)
/// 3. `GITHUB_TOKEN` environment variable
/// 4. `GH_TOKEN` environment variable
pub async fn get_github_auth(host: &str) -> Result<GitHubAuthConfig> {
    if let Some(token) = read_hub_token(host) {
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::HubConfig,
        });
    }

    if let Some(token) = get_gh_cli_token(host).await {
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::Cli,
        });
    }

    for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
        if let Ok(token) = env::var(var) {
            if !token.trim().is_empty() {
                return Ok(GitHubAuthConfig {
                    token: token.trim().to_string(),
                    source: AuthSource::EnvVar,
                });
            }
        }
    }

    Err(Error::MissingCredential)
}

/// Location of the hub config file
///
/// `$HUB_CONFIG`, then `$XDG_CONFIG_HOME/hub`, then `~/.config/hub`.
pub fn hub_config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var("HUB_CONFIG") {
        return Some(PathBuf::from(path));
    }
    if let Ok(dir) = env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(dir).join("hub"));
    }
    dirs::home_dir().map(|home| home.join(".config").join("hub"))
}

fn read_hub_token(host: &str) -> Option<String> {
    let path = hub_config_path()?;
    let contents = std::fs::read_to_string(&path).ok()?;
    debug!("Reading hub credentials from {}", path.display());
    parse_hub_config(&contents, host)
}

/// Extract the first `oauth_token` for `host` from hub's YAML config
///
/// ```text
/// github.com:
/// - user: octocat
///   oauth_token: 0123abcd
///   protocol: https
/// ```
pub fn parse_hub_config(contents: &str, host: &str) -> Option<String> {
    let hosts: Option<HashMap<String, Vec<HubHostEntry>>> = match serde_yaml::from_str(contents) {
        Ok(hosts) => hosts,
        Err(e) => {
            debug!("Ignoring unreadable hub config: {e}");
            return None;
        }
    };

    let entry = hosts?.remove(host)?.into_iter().find(|entry| {
        entry
            .oauth_token
            .as_deref()
            .is_some_and(|token| !token.trim().is_empty())
    })?;
    debug!(
        "hub config has a token for {}",
        entry.user.as_deref().unwrap_or("an unnamed user")
    );
    entry.oauth_token.map(|token| token.trim().to_string())
}

async fn get_gh_cli_token(host: &str) -> Option<String> {
    // Check gh is available
    Command::new("gh").arg("--version").output().await.ok()?;

    let output = Command::new("gh")
        .args(["auth", "token", "--hostname", host])
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() { None } else { Some(token) }
}
