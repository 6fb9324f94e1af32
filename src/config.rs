//! Runtime configuration
//!
//! Read once from the environment at startup.

use std::env;

/// Environment variable enabling squash-on-host mode
pub const SQUASH_ON_HOST_VAR: &str = "GIT_SUBMIT_SQUASH_ON_HOST";

/// Environment variable overriding the mainline branch name
pub const MAINLINE_VAR: &str = "GIT_SUBMIT_MAINLINE";

/// Mainline branch used when none is configured
pub const DEFAULT_MAINLINE: &str = "master";

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Mainline branch that submissions land on
    pub mainline: String,
    /// Delegate the squash-merge to GitHub instead of merging locally
    pub squash_on_host: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mainline: DEFAULT_MAINLINE.to_string(),
            squash_on_host: false,
        }
    }
}

impl Config {
    /// Build configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mainline = lookup(MAINLINE_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_MAINLINE.to_string());

        let squash_on_host = lookup(SQUASH_ON_HOST_VAR).is_some_and(|v| is_truthy(&v));

        Self {
            mainline,
            squash_on_host,
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
