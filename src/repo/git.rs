//! git CLI backend

use crate::error::{Error, Result};
use crate::repo::Vcs;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::debug;

/// A git work tree driven through the `git` binary
#[derive(Debug, Clone)]
pub struct GitRepo {
    workdir: PathBuf,
}

impl GitRepo {
    /// Open the work tree containing `path`
    pub async fn open(path: &Path) -> Result<Self> {
        let repo = Self {
            workdir: path.to_path_buf(),
        };

        let output = repo.git(&["rev-parse", "--is-inside-work-tree"]).await?;
        if !output.status.success() || stdout_of(&output) != "true" {
            return Err(Error::NotARepository(path.to_path_buf()));
        }

        Ok(repo)
    }

    /// Directory git commands run in
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    async fn git(&self, args: &[&str]) -> Result<Output> {
        debug!("git {}", args.join(" "));
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .output()
            .await?;
        Ok(output)
    }

    /// Run git and fail with its stderr on a non-zero exit
    async fn git_ok(&self, args: &[&str]) -> Result<String> {
        let output = self.git(args).await?;
        if !output.status.success() {
            return Err(Error::Git(format!(
                "`git {}` failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(stdout_of(&output))
    }
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[async_trait]
impl Vcs for GitRepo {
    async fn current_branch(&self) -> Result<String> {
        self.git_ok(&["rev-parse", "--abbrev-ref", "HEAD"]).await
    }

    async fn local_branches(&self) -> Result<Vec<String>> {
        let out = self
            .git_ok(&["for-each-ref", "--format=%(refname:short)", "refs/heads/"])
            .await?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(ToString::to_string)
            .collect())
    }

    async fn is_clean(&self) -> Result<bool> {
        // Stale stat info would otherwise show up as modifications.
        let _ = self.git(&["update-index", "-q", "--refresh"]).await?;

        let output = self.git(&["diff-index", "--quiet", "HEAD", "--"]).await?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(Error::Git(format!(
                "cannot inspect working tree: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ))),
        }
    }

    async fn rev_parse(&self, rev: &str) -> Result<Option<String>> {
        let spec = format!("{rev}^{{commit}}");
        let output = self.git(&["rev-parse", "--verify", "--quiet", &spec]).await?;
        if output.status.success() {
            Ok(Some(stdout_of(&output)))
        } else {
            Ok(None)
        }
    }

    async fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool> {
        let output = self
            .git(&["merge-base", "--is-ancestor", ancestor, descendant])
            .await?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(Error::Git(format!(
                "cannot compare `{ancestor}` and `{descendant}`: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ))),
        }
    }

    async fn fetch_all(&self) -> Result<()> {
        self.git_ok(&["fetch", "--all"]).await.map(drop)
    }

    async fn rebase(&self, upstream: &str, branch: Option<&str>) -> Result<()> {
        let mut args = vec!["rebase", upstream];
        if let Some(b) = branch {
            args.push(b);
        }
        self.git_ok(&args).await.map(drop)
    }

    async fn rebase_interactive(&self, upstream: &str, branch: &str) -> Result<()> {
        debug!("git rebase -i {upstream} {branch}");
        // The editor needs the operator's terminal.
        let status = Command::new("git")
            .args(["rebase", "-i", upstream, branch])
            .current_dir(&self.workdir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::Git(format!(
                "`git rebase -i {upstream} {branch}` exited with {status}"
            )))
        }
    }

    async fn rebase_abort(&self) -> Result<()> {
        self.git_ok(&["rebase", "--abort"]).await.map(drop)
    }

    async fn checkout(&self, branch: &str, force: bool) -> Result<()> {
        let mut args = vec!["checkout"];
        if force {
            args.push("-f");
        }
        args.push(branch);
        self.git_ok(&args).await.map(drop)
    }

    async fn reset_hard(&self, commit: &str) -> Result<()> {
        self.git_ok(&["reset", "--hard", commit]).await.map(drop)
    }

    async fn push(&self, remote: &str, refspec: &str, force: bool) -> Result<()> {
        let mut args = vec!["push"];
        if force {
            args.push("--force");
        }
        args.extend([remote, refspec]);
        self.git_ok(&args).await.map(drop)
    }

    async fn push_set_upstream(&self, remote: &str, branch: &str) -> Result<()> {
        self.git_ok(&["push", "-u", remote, branch]).await.map(drop)
    }

    async fn delete_remote_branch(&self, remote: &str, branch: &str) -> Result<()> {
        self.git_ok(&["push", remote, "--delete", branch])
            .await
            .map(drop)
    }

    async fn delete_branch(&self, branch: &str) -> Result<()> {
        self.git_ok(&["branch", "-D", branch]).await.map(drop)
    }

    async fn pull_ff_only(&self) -> Result<()> {
        self.git_ok(&["pull", "--ff-only"]).await.map(drop)
    }

    async fn config_get(&self, key: &str) -> Result<Option<String>> {
        let output = self.git(&["config", "--get", key]).await?;
        match output.status.code() {
            Some(0) => Ok(Some(stdout_of(&output))),
            Some(1) => Ok(None),
            _ => Err(Error::Git(format!(
                "cannot read config `{key}`: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ))),
        }
    }
}
