//! CLI progress callback with styled output
//!
//! Diagnostics go to stderr. Suggested commands are also copied to stdout so
//! they can be piped or pasted.

use crate::cli::style::{arrow, cross, hyperlink_url, short_id, Stream, Stylize};
use anstream::{eprintln, println};
use async_trait::async_trait;
use git_submit::submit::{Checkpoint, Phase, ProgressCallback};
use git_submit::types::PullRequest;

/// CLI progress callback
pub struct CliProgress;

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_phase(&self, phase: Phase) {
        if phase != Phase::Complete {
            eprintln!("{} {}...", arrow().for_stderr(), phase.phase().for_stderr());
        }
    }

    async fn on_message(&self, message: &str) {
        eprintln!("  {message}");
    }

    async fn on_warning(&self, message: &str) {
        eprintln!("  {}: {}", "warning".warn(), message);
    }

    async fn on_instructions(&self, text: &str) {
        eprintln!("{text}");
        println!("{text}");
    }

    async fn on_pr_merged(&self, pr: &PullRequest) {
        let number = format!("#{}", pr.number);
        eprintln!(
            "  Merged PR {} {}",
            number.branch().for_stderr(),
            hyperlink_url(Stream::Stderr, &pr.html_url).muted().for_stderr()
        );
    }

    async fn on_rollback(&self, checkpoint: &Checkpoint) {
        eprintln!(
            "  {} Rolling back: {} to {}, {} to {}",
            cross(),
            checkpoint.mainline.branch().for_stderr(),
            short_id(&checkpoint.mainline_tip).commit().for_stderr(),
            checkpoint.branch.branch().for_stderr(),
            short_id(&checkpoint.branch_tip).commit().for_stderr()
        );
    }
}
