//! Interactive confirmation backed by dialoguer

use dialoguer::Confirm as Prompt;
use git_submit::error::Result;
use git_submit::submit::Confirm;
use std::io::IsTerminal;

/// Asks on the terminal; answers "no" by default
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        if !std::io::stdin().is_terminal() {
            return Ok(false);
        }
        let answer = Prompt::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?;
        Ok(answer)
    }
}
