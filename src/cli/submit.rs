//! Submit command - land a branch on mainline

use crate::cli::confirm::TerminalConfirm;
use crate::cli::progress::CliProgress;
use crate::cli::style::{check, short_id, Stylize};
use anstream::println;
use git_submit::ci::detect_ci_service;
use git_submit::config::Config;
use git_submit::error::Result;
use git_submit::platform::GitHubFactory;
use git_submit::repo::GitRepo;
use git_submit::submit::{Outcome, Submitter};
use git_submit::types::Invocation;
use std::path::Path;

/// Run the submit command
pub async fn run_submit(path: &Path, invocation: &Invocation) -> Result<()> {
    let config = Config::from_env();
    let repo = GitRepo::open(path).await?;
    let ci = detect_ci_service(repo.workdir()).await;

    let progress = CliProgress;
    let submitter = Submitter::new(&config, &repo, &GitHubFactory, &TerminalConfirm, &progress)
        .with_ci(ci.as_deref());

    match submitter.submit(invocation).await? {
        Outcome::Submitted { branch, commit } => {
            println!(
                "{} Submitted {} as {} on {}",
                check(),
                branch.branch(),
                short_id(&commit).commit(),
                config.mainline.phase()
            );
        }
        Outcome::NoChanges { branch } => {
            println!(
                "Nothing to submit: {} is already on {}",
                branch.branch(),
                config.mainline.phase()
            );
        }
    }

    Ok(())
}
