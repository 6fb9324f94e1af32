//! The submission pipeline itself

use crate::ci::CiService;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::platform::{parse_repo_info, PlatformFactory};
use crate::repo::Vcs;
use crate::submit::ancestry::{inspect, Ancestry};
use crate::submit::{Checkpoint, Confirm, Phase, ProgressCallback};
use crate::types::{BranchTracking, CiStatus, Invocation};
use tracing::{debug, error, info, warn};

/// How a submission ended, when it did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The branch landed on mainline and was deleted
    Submitted {
        /// Submitted branch
        branch: String,
        /// Mainline tip after landing
        commit: String,
    },
    /// The branch already points at mainline
    NoChanges {
        /// Branch that was inspected
        branch: String,
    },
}

/// Runs submissions against a set of collaborators
pub struct Submitter<'a> {
    config: &'a Config,
    vcs: &'a dyn Vcs,
    ci: Option<&'a dyn CiService>,
    platforms: &'a dyn PlatformFactory,
    confirm: &'a dyn Confirm,
    progress: &'a dyn ProgressCallback,
}

impl<'a> Submitter<'a> {
    /// Create a submitter with the CI gate disabled
    pub fn new(
        config: &'a Config,
        vcs: &'a dyn Vcs,
        platforms: &'a dyn PlatformFactory,
        confirm: &'a dyn Confirm,
        progress: &'a dyn ProgressCallback,
    ) -> Self {
        Self {
            config,
            vcs,
            ci: None,
            platforms,
            confirm,
            progress,
        }
    }

    /// Gate submissions on a CI status source (`None` skips the gate)
    #[must_use]
    pub fn with_ci(mut self, ci: Option<&'a dyn CiService>) -> Self {
        self.ci = ci;
        self
    }

    /// Submit a branch
    pub async fn submit(&self, invocation: &Invocation) -> Result<Outcome> {
        self.progress.on_phase(Phase::Validating).await;
        let branch = self.resolve_branch(invocation.branch.as_deref()).await?;
        self.require_clean().await?;
        self.require_branch(&branch).await?;

        if let Some(ci) = self.ci {
            self.progress.on_phase(Phase::CheckingCi).await;
            self.ci_gate(ci, &branch, invocation.force).await?;
        } else {
            debug!("No CI status tool available; skipping CI gate");
        }

        self.progress.on_phase(Phase::Fetching).await;
        self.vcs.fetch_all().await?;

        self.progress.on_phase(Phase::Negotiating).await;
        let mainline = self.mainline_tracking().await?;
        let tracking = self.vcs.tracking(&branch).await?;
        let checkpoint = Checkpoint::record(self.vcs, &self.config.mainline, &branch).await?;

        if !self.negotiate(&branch, &mainline).await? {
            info!("{branch} already points at {}", mainline.remote_ref());
            return Ok(Outcome::NoChanges { branch });
        }

        self.require_tracking(&branch, &tracking, &mainline).await?;

        self.progress.on_phase(Phase::Integrating).await;
        let commit = if self.config.squash_on_host {
            self.merge_on_host(&tracking, &mainline, &checkpoint).await?
        } else {
            self.merge_locally(&branch, &tracking, &mainline, &checkpoint)
                .await?
        };
        info!("Landed {branch} on {} at {commit}", self.config.mainline);

        self.progress.on_phase(Phase::CleaningUp).await;
        self.cleanup(&branch, &tracking).await?;

        self.progress.on_phase(Phase::Complete).await;
        Ok(Outcome::Submitted { branch, commit })
    }

    async fn resolve_branch(&self, requested: Option<&str>) -> Result<String> {
        let branch = match requested.filter(|b| !b.is_empty()) {
            Some(b) => b.to_string(),
            None => self.vcs.current_branch().await?,
        };

        if branch == self.config.mainline || branch == "HEAD" {
            let candidates: Vec<String> = self
                .vcs
                .local_branches()
                .await?
                .into_iter()
                .filter(|b| *b != self.config.mainline)
                .collect();

            if !candidates.is_empty() {
                self.progress
                    .on_message(&format!(
                        "Specify a branch to submit: {}",
                        candidates.join(", ")
                    ))
                    .await;
            }

            return Err(Error::NoBranchSpecified {
                current: branch,
                candidates,
            });
        }

        Ok(branch)
    }

    async fn require_clean(&self) -> Result<()> {
        if self.vcs.is_clean().await? {
            Ok(())
        } else {
            Err(Error::DirtyWorkingTree)
        }
    }

    async fn require_branch(&self, branch: &str) -> Result<()> {
        if self.vcs.ref_exists(&format!("refs/heads/{branch}")).await? {
            Ok(())
        } else {
            Err(Error::InvalidBranch(branch.to_string()))
        }
    }

    async fn ci_gate(&self, ci: &dyn CiService, branch: &str, force: bool) -> Result<()> {
        // An unreadable status counts as a failed gate, which --force may bypass.
        let status = ci.status(branch).await.unwrap_or_else(|e| {
            debug!("Could not read CI status for {branch}: {e}");
            CiStatus::Error
        });
        debug!("CI status for {branch}: {status}");
        if status.is_success() {
            return Ok(());
        }

        if force {
            warn!("CI status for {branch} is {status}; continuing because of --force");
            self.progress
                .on_warning(&format!(
                    "CI status for {branch} is {status}; submitting anyway (--force)"
                ))
                .await;
            return Ok(());
        }

        match ci.verbose_status(branch).await {
            Ok(detail) if !detail.is_empty() => self.progress.on_message(&detail).await,
            Ok(_) => {}
            Err(e) => debug!("Could not read CI detail for {branch}: {e}"),
        }
        Err(Error::CiGateFailed {
            branch: branch.to_string(),
            status,
        })
    }

    /// Mainline's upstream, defaulting to `origin/<mainline>`
    async fn mainline_tracking(&self) -> Result<BranchTracking> {
        let mut tracking = self.vcs.tracking(&self.config.mainline).await?;
        if tracking.remote.is_empty() {
            tracking.remote = "origin".to_string();
        }
        if tracking.merge.is_empty() {
            tracking.merge.clone_from(&self.config.mainline);
        }
        Ok(tracking)
    }

    /// Rebase until the branch is one commit on mainline
    ///
    /// Returns `false` when the branch has nothing to submit.
    async fn negotiate(&self, branch: &str, mainline: &BranchTracking) -> Result<bool> {
        let onto = mainline.remote_ref();

        loop {
            let ancestry = inspect(self.vcs, branch, &onto).await?;

            match ancestry {
                Ancestry::UpToDate => return Ok(true),
                Ancestry::NothingToSubmit => return Ok(false),
                Ancestry::StaleBase if self.config.squash_on_host => {
                    debug!("Leaving {branch} on its old base; GitHub squashes on merge");
                    return Ok(true);
                }
                Ancestry::StaleBase => {
                    self.progress
                        .on_message(&format!("Rebasing {branch} onto {onto}"))
                        .await;
                    if let Err(e) = self.vcs.rebase(&onto, Some(branch)).await {
                        debug!("Rebase failed: {e}");
                        self.abort_rebase().await;
                        return Err(Error::RebaseConflict {
                            branch: branch.to_string(),
                            onto,
                        });
                    }
                }
                Ancestry::Diverged if self.config.squash_on_host => {
                    return Err(Error::MultipleCommitsNotAllowed(branch.to_string()));
                }
                Ancestry::Diverged => self.squash_interactively(branch, &onto).await?,
            }
        }
    }

    async fn squash_interactively(&self, branch: &str, onto: &str) -> Result<()> {
        self.progress
            .on_instructions(&format!(
                "{branch} must be a single commit on top of {onto}. Squash it with:\n  git rebase -i {onto} {branch}"
            ))
            .await;

        if !self
            .confirm
            .confirm(&format!("Run an interactive rebase of {branch} now?"))?
        {
            return Err(Error::UserDeclinedRebase(branch.to_string()));
        }

        if let Err(e) = self.vcs.rebase_interactive(onto, branch).await {
            debug!("Interactive rebase failed: {e}");
            self.abort_rebase().await;
            return Err(Error::InteractiveRebaseFailed(branch.to_string()));
        }
        Ok(())
    }

    async fn abort_rebase(&self) {
        if let Err(e) = self.vcs.rebase_abort().await {
            // No rebase in progress when git refused to start one.
            debug!("rebase --abort: {e}");
        }
    }

    async fn require_tracking(
        &self,
        branch: &str,
        tracking: &BranchTracking,
        mainline: &BranchTracking,
    ) -> Result<()> {
        if tracking.is_tracked() {
            return Ok(());
        }

        let remote = &mainline.remote;
        self.progress
            .on_instructions(&format!(
                "{branch} does not track a remote branch. Push it for review with:\n  git push -u {remote} {branch}"
            ))
            .await;

        if self
            .confirm
            .confirm(&format!("Push {branch} to {remote} now?"))?
        {
            match self.vcs.push_set_upstream(remote, branch).await {
                Ok(()) => {
                    self.progress
                        .on_message(&format!(
                            "Pushed {branch}; run git-submit again once it is reviewed"
                        ))
                        .await;
                }
                Err(e) => {
                    warn!("Pushing {branch} failed: {e}");
                    self.progress
                        .on_warning(&format!("Pushing {branch} failed: {e}"))
                        .await;
                }
            }
        }

        Err(Error::BranchNotTracked(branch.to_string()))
    }

    /// Fast-forward mainline to the branch and push it
    async fn merge_locally(
        &self,
        branch: &str,
        tracking: &BranchTracking,
        mainline: &BranchTracking,
        checkpoint: &Checkpoint,
    ) -> Result<String> {
        let branch_tip = self.vcs.resolve(branch).await?;
        let remote_tip = self.vcs.rev_parse(&tracking.remote_ref()).await?;

        if remote_tip.as_deref() != Some(branch_tip.as_str()) {
            self.progress
                .on_message(&format!("Updating {}", tracking.remote_ref()))
                .await;
            let refspec = format!("{branch}:{}", tracking.merge_ref());
            let pushed = self.vcs.push(&tracking.remote, &refspec, true).await;
            self.or_roll_back(checkpoint, pushed).await?;
        }

        let checked_out = self.vcs.checkout(&self.config.mainline, false).await;
        self.or_roll_back(checkpoint, checked_out).await?;

        if let Err(e) = self.vcs.rebase(branch, None).await {
            self.abort_rebase().await;
            return Err(self.roll_back(checkpoint, &e).await);
        }

        self.progress
            .on_message(&format!("Pushing {} to {}", self.config.mainline, mainline.remote))
            .await;
        let refspec = format!("{}:{}", self.config.mainline, mainline.merge_ref());
        let pushed = self.vcs.push(&mainline.remote, &refspec, false).await;
        self.or_roll_back(checkpoint, pushed).await?;

        self.vcs.resolve(&self.config.mainline).await
    }

    /// Squash-merge the branch's pull request on GitHub, then pull mainline
    async fn merge_on_host(
        &self,
        tracking: &BranchTracking,
        mainline: &BranchTracking,
        checkpoint: &Checkpoint,
    ) -> Result<String> {
        let token = self.platforms.credential().await?;

        let url = self
            .vcs
            .remote_url(&tracking.remote)
            .await?
            .unwrap_or_default();
        let repo = parse_repo_info(&url)?;
        let platform = self.platforms.connect(&token, &repo)?;

        let pr = platform
            .find_open_pr(&tracking.merge, &mainline.merge)
            .await?
            .ok_or_else(|| Error::PullRequestNotFound {
                head: tracking.merge.clone(),
                base: mainline.merge.clone(),
            })?;

        self.progress
            .on_message(&format!("Squash-merging PR #{}", pr.number))
            .await;
        let merged = platform.squash_merge(pr.number, &checkpoint.branch_tip).await;
        self.or_roll_back(checkpoint, merged).await?;
        self.progress.on_pr_merged(&pr).await;

        let checked_out = self.vcs.checkout(&self.config.mainline, false).await;
        self.or_roll_back(checkpoint, checked_out).await?;
        let pulled = self.vcs.pull_ff_only().await;
        self.or_roll_back(checkpoint, pulled).await?;

        self.vcs.resolve(&self.config.mainline).await
    }

    async fn cleanup(&self, branch: &str, tracking: &BranchTracking) -> Result<()> {
        if self.vcs.current_branch().await? == branch {
            self.vcs.checkout(&self.config.mainline, false).await?;
        }

        self.vcs.delete_branch(branch).await?;

        if let Err(e) = self
            .vcs
            .delete_remote_branch(&tracking.remote, &tracking.merge)
            .await
        {
            warn!("Deleting {} failed: {e}", tracking.remote_ref());
            self.progress
                .on_warning(&format!(
                    "Could not delete {} on {}: {e}",
                    tracking.merge, tracking.remote
                ))
                .await;
        }

        Ok(())
    }

    async fn or_roll_back<T>(&self, checkpoint: &Checkpoint, result: Result<T>) -> Result<T> {
        match result {
            Ok(value) => Ok(value),
            Err(e) => Err(self.roll_back(checkpoint, &e).await),
        }
    }

    async fn roll_back(&self, checkpoint: &Checkpoint, cause: &Error) -> Error {
        warn!("{cause}; rolling back");
        self.progress.on_rollback(checkpoint).await;

        match checkpoint.restore(self.vcs).await {
            Ok(()) => Error::RolledBack {
                cause: cause.to_string(),
                mainline: checkpoint.mainline.clone(),
                branch: checkpoint.branch.clone(),
            },
            Err(e) => {
                error!("Rollback failed: {e}");
                Error::RollbackFailed {
                    cause: cause.to_string(),
                    rollback: e.to_string(),
                }
            }
        }
    }
}
