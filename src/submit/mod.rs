//! Submission pipeline
//!
//! Lands one branch on mainline as a single commit:
//! 1. Validate - branch, working tree, CI gate
//! 2. Negotiate - rebase until the branch is one commit on mainline
//! 3. Integrate - merge locally or squash-merge on GitHub, then clean up
//!
//! Failures after the repository was mutated restore a [`Checkpoint`].

mod ancestry;
mod confirm;
mod pipeline;
mod progress;
mod rollback;

pub use ancestry::{classify, inspect, Ancestry, Tips};
pub use confirm::{Confirm, Decline};
pub use pipeline::{Outcome, Submitter};
pub use progress::{NoopProgress, Phase, ProgressCallback};
pub use rollback::Checkpoint;
