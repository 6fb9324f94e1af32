//! History negotiation decision
//!
//! One pass of the negotiation loop looks at three commits: the branch tip,
//! its parent, and the mainline tip. [`classify`] turns them into exactly
//! one [`Ancestry`] so each outcome can be handled (and tested) on its own.

use crate::error::Result;
use crate::repo::Vcs;
use tracing::debug;

/// Commits inspected by one negotiation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tips {
    /// Tip of the branch being submitted
    pub branch_tip: String,
    /// Parent of the branch tip (`None` for a root commit)
    pub branch_parent: Option<String>,
    /// Tip of the mainline remote-tracking ref
    pub mainline_tip: String,
}

/// Shape of the branch relative to mainline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ancestry {
    /// Exactly one commit directly on top of mainline
    UpToDate,
    /// The branch points at mainline; there is nothing to land
    NothingToSubmit,
    /// One commit on top of an older mainline commit
    StaleBase,
    /// More than one commit, or unrelated history
    Diverged,
}

/// Classify the branch given its tips
///
/// `parent_is_ancestor` says whether the branch parent is an ancestor of the
/// mainline tip; it is ignored when there is no parent.
pub fn classify(tips: &Tips, parent_is_ancestor: bool) -> Ancestry {
    match tips.branch_parent.as_deref() {
        Some(parent) if parent == tips.mainline_tip => Ancestry::UpToDate,
        _ if tips.branch_tip == tips.mainline_tip => Ancestry::NothingToSubmit,
        Some(_) if parent_is_ancestor => Ancestry::StaleBase,
        _ => Ancestry::Diverged,
    }
}

/// Query the repository and classify `branch` against `mainline_ref`
pub async fn inspect(vcs: &dyn Vcs, branch: &str, mainline_ref: &str) -> Result<Ancestry> {
    let mainline_tip = vcs.resolve(mainline_ref).await?;
    let branch_tip = vcs.resolve(branch).await?;
    let branch_parent = vcs.rev_parse(&format!("{branch}^")).await?;

    let parent_is_ancestor = match &branch_parent {
        Some(parent) => vcs.is_ancestor(parent, &mainline_tip).await?,
        None => false,
    };

    let tips = Tips {
        branch_tip,
        branch_parent,
        mainline_tip,
    };
    let ancestry = classify(&tips, parent_is_ancestor);
    debug!("{branch} against {mainline_ref}: {ancestry:?} ({tips:?})");

    Ok(ancestry)
}
