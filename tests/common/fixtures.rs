//! Test data factories and scripted collaborators
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use super::mock_repo::MockRepo;
use async_trait::async_trait;
use git_submit::ci::CiService;
use git_submit::error::{Error, Result};
use git_submit::submit::{Checkpoint, Confirm, Phase, ProgressCallback};
use git_submit::types::{CiStatus, PlatformConfig, PullRequest};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Create a PR with default values
pub fn make_pr(number: u64, head: &str, base: &str) -> PullRequest {
    PullRequest {
        number,
        html_url: format!("https://github.com/acme/widgets/pull/{number}"),
        base_ref: base.to_string(),
        head_ref: head.to_string(),
        title: format!("PR for {head}"),
    }
}

/// Coordinates of the repository `MockRepo` points `origin` at
pub fn github_config() -> PlatformConfig {
    PlatformConfig {
        owner: "acme".to_string(),
        repo: "widgets".to_string(),
        host: None,
    }
}

/// `feature-x` is one commit `B` on mainline `A`, pushed and checked out
pub fn ready_repo() -> MockRepo {
    let repo = MockRepo::new();
    repo.commit("B", "A")
        .set_branch("feature-x", "B")
        .track("feature-x")
        .switch_to("feature-x");
    repo
}

/// `feature-x` is two commits `B`, `C` on mainline `A`, pushed and checked out
pub fn two_commit_repo() -> MockRepo {
    let repo = MockRepo::new();
    repo.commit("B", "A")
        .commit("C", "B")
        .set_branch("feature-x", "C")
        .track("feature-x")
        .switch_to("feature-x");
    repo
}

/// CI source returning a fixed status, or failing to report one
pub struct MockCi {
    status: Option<CiStatus>,
    detail: String,
    calls: Mutex<Vec<String>>,
}

impl MockCi {
    pub fn new(status: CiStatus) -> Self {
        Self {
            status: Some(status),
            detail: format!("✗ build  {status}"),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A status tool that errors instead of reporting
    pub fn broken() -> Self {
        Self {
            status: None,
            detail: String::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Branches queried, with `-v` marking verbose lookups
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CiService for MockCi {
    async fn status(&self, branch: &str) -> Result<CiStatus> {
        self.calls.lock().unwrap().push(branch.to_string());
        self.status
            .ok_or_else(|| Error::Ci("unknown CI status: neutral".to_string()))
    }

    async fn verbose_status(&self, branch: &str) -> Result<String> {
        self.calls.lock().unwrap().push(format!("-v {branch}"));
        Ok(self.detail.clone())
    }
}

/// Answers prompts from a script, declining once it runs out
#[derive(Default)]
pub struct ScriptedConfirm {
    answers: Mutex<VecDeque<bool>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirm {
    pub fn answering(answers: &[bool]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.answers.lock().unwrap().pop_front().unwrap_or(false))
    }
}

/// Progress event captured by [`RecordingProgress`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Phase(Phase),
    Message(String),
    Warning(String),
    Instructions(String),
    PrMerged(u64),
    Rollback(Checkpoint),
}

/// Progress callback that records everything it is told
#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<Event>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn phases(&self) -> Vec<Phase> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Phase(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    pub fn instructions(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Instructions(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Warning(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Message(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn rolled_back(&self) -> bool {
        self.events()
            .iter()
            .any(|e| matches!(e, Event::Rollback(_)))
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl ProgressCallback for RecordingProgress {
    async fn on_phase(&self, phase: Phase) {
        self.push(Event::Phase(phase));
    }

    async fn on_message(&self, message: &str) {
        self.push(Event::Message(message.to_string()));
    }

    async fn on_warning(&self, message: &str) {
        self.push(Event::Warning(message.to_string()));
    }

    async fn on_instructions(&self, text: &str) {
        self.push(Event::Instructions(text.to_string()));
    }

    async fn on_pr_merged(&self, pr: &PullRequest) {
        self.push(Event::PrMerged(pr.number));
    }

    async fn on_rollback(&self, checkpoint: &Checkpoint) {
        self.push(Event::Rollback(checkpoint.clone()));
    }
}
