//! CLI commands
//!
//! Terminal-facing pieces of the `git-submit` binary.

mod confirm;
mod progress;
pub mod style;
mod submit;

pub use submit::run_submit;
