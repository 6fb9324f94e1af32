//! Operator confirmation

use crate::error::Result;

/// Asks the operator a yes/no question
///
/// The CLI backs this with an interactive prompt; tests script the answers.
pub trait Confirm: Send + Sync {
    /// Ask `prompt`; declining and the default answer both yield `false`
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Declines every prompt, for non-interactive runs
#[derive(Debug, Clone, Copy, Default)]
pub struct Decline;

impl Confirm for Decline {
    fn confirm(&self, _prompt: &str) -> Result<bool> {
        Ok(false)
    }
}
