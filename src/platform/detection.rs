//! Repository detection from remote URLs

use crate::auth::DEFAULT_HOST;
use crate::error::{Error, Result};
use crate::types::PlatformConfig;
use regex::Regex;
use std::env;
use std::sync::LazyLock;

static SCP_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@/]+@([^:/]+):(.+)$").expect("hardcoded scp-style pattern is valid")
});

/// Whether `hostname` is github.com or the configured `GH_HOST`
pub fn is_github_host(hostname: &str) -> bool {
    let gh_host = env::var("GH_HOST").ok();

    is_public_github(hostname) || gh_host.as_deref().is_some_and(|h| hostname == h)
}

/// github.com and its own subdomains (e.g. `ssh.github.com`), served by api.github.com
fn is_public_github(hostname: &str) -> bool {
    hostname == DEFAULT_HOST || hostname.ends_with(".github.com")
}

/// Parse repository info (owner/repo) from a GitHub remote URL
///
/// Anything that is not an ssh or https URL on a GitHub host, or that does
/// not name exactly `owner/repo`, is unresolvable.
pub fn parse_repo_info(url: &str) -> Result<PlatformConfig> {
    let unresolvable = || Error::UnresolvableRepository(url.to_string());

    let (hostname, path) = split_remote(url).ok_or_else(unresolvable)?;
    if !is_github_host(&hostname) {
        return Err(unresolvable());
    }

    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let (owner, repo) = path.split_once('/').ok_or_else(unresolvable)?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return Err(unresolvable());
    }

    let host = (!is_public_github(&hostname)).then_some(hostname);

    Ok(PlatformConfig {
        owner: owner.to_string(),
        repo: repo.to_string(),
        host,
    })
}

/// Split a remote URL into hostname and repository path
fn split_remote(url: &str) -> Option<(String, String)> {
    // scp-like syntax: git@host:owner/repo.git
    if let Some(caps) = SCP_URL.captures(url) {
        return Some((caps[1].to_string(), caps[2].to_string()));
    }

    let parsed = url::Url::parse(url).ok()?;
    if !matches!(parsed.scheme(), "https" | "http" | "ssh" | "git") {
        return None;
    }
    let host = parsed.host_str()?.to_string();
    Some((host, parsed.path().to_string()))
}
