//! git-submit - land a reviewed branch on mainline as one rebased commit
//!
//! The library holds the submission pipeline and the narrow interfaces it
//! drives (git, CI status, GitHub, operator confirmation). The `git-submit`
//! binary wires the production implementations together.

pub mod auth;
pub mod ci;
pub mod config;
pub mod error;
pub mod platform;
pub mod repo;
pub mod submit;
pub mod types;
