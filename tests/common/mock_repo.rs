//! In-memory repository for pipeline tests
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use git_submit::error::{Error, Result};
use git_submit::repo::Vcs;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

#[derive(Default)]
struct State {
    parents: HashMap<String, Option<String>>,
    branches: BTreeMap<String, String>,
    remote_refs: BTreeMap<String, String>,
    config: HashMap<String, String>,
    head: String,
    dirty: bool,
    on_fetch: Vec<(String, String)>,
    on_pull: Vec<(String, String)>,
    failures: Vec<String>,
    calls: Vec<String>,
}

impl State {
    fn resolve(&self, rev: &str) -> Option<String> {
        if let Some(base) = rev.strip_suffix('^') {
            let commit = self.resolve(base)?;
            return self.parents.get(&commit).cloned().flatten();
        }

        let rev = rev.strip_prefix("refs/heads/").unwrap_or(rev);
        self.branches
            .get(rev)
            .or_else(|| self.remote_refs.get(rev))
            .cloned()
            .or_else(|| self.parents.contains_key(rev).then(|| rev.to_string()))
    }

    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> bool {
        let mut current = Some(descendant.to_string());
        while let Some(commit) = current {
            if commit == ancestor {
                return true;
            }
            current = self.parents.get(&commit).cloned().flatten();
        }
        false
    }

    /// Commits on `tip` that are not reachable from `upstream`, oldest first
    fn replay_list(&self, tip: &str, upstream: &str) -> Vec<String> {
        let mut list = Vec::new();
        let mut current = Some(tip.to_string());
        while let Some(commit) = current {
            if self.is_ancestor(&commit, upstream) {
                break;
            }
            list.push(commit.clone());
            current = self.parents.get(&commit).cloned().flatten();
        }
        list.reverse();
        list
    }

    /// Record a call and fail if it matches an injected failure
    fn call(&mut self, call: String) -> Result<()> {
        let failing = self.failures.iter().any(|f| call.starts_with(f.as_str()));
        self.calls.push(call.clone());
        if failing {
            Err(Error::Git(format!("`git {call}` failed: injected failure")))
        } else {
            Ok(())
        }
    }

    fn must_resolve(&self, rev: &str) -> Result<String> {
        self.resolve(rev)
            .ok_or_else(|| Error::Git(format!("unknown revision `{rev}`")))
    }
}

/// A linear-history git model implementing [`Vcs`]
///
/// Starts with one commit `A` on `master`, pushed to `origin/master`, and an
/// `origin` remote pointing at `github.com/acme/widgets`.
pub struct MockRepo {
    state: Mutex<State>,
}

impl MockRepo {
    pub fn new() -> Self {
        let mut state = State::default();
        state.parents.insert("A".into(), None);
        state.branches.insert("master".into(), "A".into());
        state.remote_refs.insert("origin/master".into(), "A".into());
        state.head = "master".into();
        state
            .config
            .insert("branch.master.remote".into(), "origin".into());
        state
            .config
            .insert("branch.master.merge".into(), "refs/heads/master".into());
        state.config.insert(
            "remote.origin.url".into(),
            "git@github.com:acme/widgets.git".into(),
        );

        Self {
            state: Mutex::new(state),
        }
    }

    // === Setup ===

    /// Add a commit
    pub fn commit(&self, id: &str, parent: &str) -> &Self {
        self.state
            .lock()
            .unwrap()
            .parents
            .insert(id.into(), Some(parent.into()));
        self
    }

    /// Point a local branch at a commit
    pub fn set_branch(&self, name: &str, id: &str) -> &Self {
        self.state
            .lock()
            .unwrap()
            .branches
            .insert(name.into(), id.into());
        self
    }

    /// Point a remote-tracking ref (`origin/x`) at a commit
    pub fn set_remote_ref(&self, name: &str, id: &str) -> &Self {
        self.state
            .lock()
            .unwrap()
            .remote_refs
            .insert(name.into(), id.into());
        self
    }

    /// Configure `origin/<branch>` as upstream and push the branch there
    pub fn track(&self, branch: &str) -> &Self {
        let mut state = self.state.lock().unwrap();
        let tip = state.branches[branch].clone();
        state
            .config
            .insert(format!("branch.{branch}.remote"), "origin".into());
        state
            .config
            .insert(format!("branch.{branch}.merge"), format!("refs/heads/{branch}"));
        state.remote_refs.insert(format!("origin/{branch}"), tip);
        drop(state);
        self
    }

    /// Set an arbitrary config value
    pub fn set_config(&self, key: &str, value: &str) -> &Self {
        self.state
            .lock()
            .unwrap()
            .config
            .insert(key.into(), value.into());
        self
    }

    /// Check out a branch without recording a call
    pub fn switch_to(&self, branch: &str) -> &Self {
        self.state.lock().unwrap().head = branch.into();
        self
    }

    /// Leave uncommitted modifications in the working tree
    pub fn make_dirty(&self) -> &Self {
        self.state.lock().unwrap().dirty = true;
        self
    }

    /// Move a remote-tracking ref to a new commit on the next fetch
    pub fn advance_on_fetch(&self, remote_ref: &str, id: &str, parent: &str) -> &Self {
        let mut state = self.state.lock().unwrap();
        state.parents.insert(id.into(), Some(parent.into()));
        state.on_fetch.push((remote_ref.into(), id.into()));
        drop(state);
        self
    }

    /// Move a remote-tracking ref to a new commit on the next pull
    pub fn advance_on_pull(&self, remote_ref: &str, id: &str, parent: &str) -> &Self {
        let mut state = self.state.lock().unwrap();
        state.parents.insert(id.into(), Some(parent.into()));
        state.on_pull.push((remote_ref.into(), id.into()));
        drop(state);
        self
    }

    /// Fail every call whose command line starts with `prefix`
    pub fn fail_on(&self, prefix: &str) -> &Self {
        self.state.lock().unwrap().failures.push(prefix.into());
        self
    }

    // === Inspection ===

    pub fn branch_tip(&self, name: &str) -> Option<String> {
        self.state.lock().unwrap().branches.get(name).cloned()
    }

    pub fn remote_tip(&self, name: &str) -> Option<String> {
        self.state.lock().unwrap().remote_refs.get(name).cloned()
    }

    pub fn parent_of(&self, id: &str) -> Option<String> {
        self.state.lock().unwrap().parents.get(id).cloned().flatten()
    }

    pub fn head(&self) -> String {
        self.state.lock().unwrap().head.clone()
    }

    /// Every recorded command, e.g. `push origin master:refs/heads/master`
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Whether any recorded command starts with `prefix`
    pub fn called(&self, prefix: &str) -> bool {
        self.calls().iter().any(|c| c.starts_with(prefix))
    }

    /// Recorded commands other than `fetch`
    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| !c.starts_with("fetch"))
            .collect()
    }
}

#[async_trait]
impl Vcs for MockRepo {
    async fn current_branch(&self) -> Result<String> {
        Ok(self.head())
    }

    async fn local_branches(&self) -> Result<Vec<String>> {
        Ok(self.state.lock().unwrap().branches.keys().cloned().collect())
    }

    async fn is_clean(&self) -> Result<bool> {
        Ok(!self.state.lock().unwrap().dirty)
    }

    async fn rev_parse(&self, rev: &str) -> Result<Option<String>> {
        Ok(self.state.lock().unwrap().resolve(rev))
    }

    async fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool> {
        Ok(self.state.lock().unwrap().is_ancestor(ancestor, descendant))
    }

    async fn fetch_all(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.call("fetch --all".into())?;
        for (name, id) in std::mem::take(&mut state.on_fetch) {
            state.remote_refs.insert(name, id);
        }
        Ok(())
    }

    async fn rebase(&self, upstream: &str, branch: Option<&str>) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let call = match branch {
            Some(b) => format!("rebase {upstream} {b}"),
            None => format!("rebase {upstream}"),
        };
        state.call(call)?;

        if let Some(b) = branch {
            state.head = b.to_string();
        }
        let target = state.head.clone();
        let onto = state.must_resolve(upstream)?;
        let tip = state.must_resolve(&target)?;

        let mut new_tip = onto.clone();
        for commit in state.replay_list(&tip, &onto) {
            let rewritten = format!("{commit}'");
            state.parents.insert(rewritten.clone(), Some(new_tip));
            new_tip = rewritten;
        }
        state.branches.insert(target, new_tip);
        Ok(())
    }

    async fn rebase_interactive(&self, upstream: &str, branch: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.call(format!("rebase -i {upstream} {branch}"))?;

        state.head = branch.to_string();
        let onto = state.must_resolve(upstream)?;
        let tip = state.must_resolve(branch)?;

        // The operator squashes everything into one commit.
        let new_tip = if state.replay_list(&tip, &onto).is_empty() {
            onto
        } else {
            let squashed = format!("{branch}-squashed");
            state.parents.insert(squashed.clone(), Some(onto));
            squashed
        };
        state.branches.insert(branch.to_string(), new_tip);
        Ok(())
    }

    async fn rebase_abort(&self) -> Result<()> {
        self.state.lock().unwrap().call("rebase --abort".into())
    }

    async fn checkout(&self, branch: &str, force: bool) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let call = if force {
            format!("checkout -f {branch}")
        } else {
            format!("checkout {branch}")
        };
        state.call(call)?;

        if !state.branches.contains_key(branch) {
            return Err(Error::Git(format!("pathspec `{branch}` did not match")));
        }
        state.head = branch.to_string();
        if force {
            state.dirty = false;
        }
        Ok(())
    }

    async fn reset_hard(&self, commit: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.call(format!("reset --hard {commit}"))?;

        let id = state.must_resolve(commit)?;
        let head = state.head.clone();
        state.branches.insert(head, id);
        state.dirty = false;
        Ok(())
    }

    async fn push(&self, remote: &str, refspec: &str, force: bool) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let call = if force {
            format!("push --force {remote} {refspec}")
        } else {
            format!("push {remote} {refspec}")
        };
        state.call(call)?;

        let (src, dst) = refspec.split_once(':').unwrap_or((refspec, refspec));
        let id = state.must_resolve(src)?;
        let dst = dst.strip_prefix("refs/heads/").unwrap_or(dst);
        state.remote_refs.insert(format!("{remote}/{dst}"), id);
        Ok(())
    }

    async fn push_set_upstream(&self, remote: &str, branch: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.call(format!("push -u {remote} {branch}"))?;

        let id = state.must_resolve(branch)?;
        state.remote_refs.insert(format!("{remote}/{branch}"), id);
        state
            .config
            .insert(format!("branch.{branch}.remote"), remote.to_string());
        state
            .config
            .insert(format!("branch.{branch}.merge"), format!("refs/heads/{branch}"));
        Ok(())
    }

    async fn delete_remote_branch(&self, remote: &str, branch: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.call(format!("push {remote} --delete {branch}"))?;

        state
            .remote_refs
            .remove(&format!("{remote}/{branch}"))
            .map(drop)
            .ok_or_else(|| Error::Git(format!("remote ref does not exist: {branch}")))
    }

    async fn delete_branch(&self, branch: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.call(format!("branch -D {branch}"))?;

        if state.head == branch {
            return Err(Error::Git(format!("cannot delete checked-out branch `{branch}`")));
        }
        state.branches.remove(branch);
        Ok(())
    }

    async fn pull_ff_only(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.call("pull --ff-only".into())?;

        for (name, id) in std::mem::take(&mut state.on_pull) {
            state.remote_refs.insert(name, id);
        }

        let head = state.head.clone();
        let remote = state.config.get(&format!("branch.{head}.remote")).cloned();
        let merge = state.config.get(&format!("branch.{head}.merge")).cloned();
        let (Some(remote), Some(merge)) = (remote, merge) else {
            return Err(Error::Git(format!("no upstream configured for `{head}`")));
        };
        let upstream = format!("{remote}/{}", merge.trim_start_matches("refs/heads/"));
        let id = state.must_resolve(&upstream)?;
        state.branches.insert(head, id);
        Ok(())
    }

    async fn config_get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.state.lock().unwrap().config.get(key).cloned())
    }
}
