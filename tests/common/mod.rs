//! Shared test utilities

pub mod fixtures;
pub mod mock_repo;

pub use fixtures::*;
pub use git_fixture::{git, GitFixture};
pub use mock_platform::{MockPlatformFactory, MockPlatformService};
pub use mock_repo::MockRepo;
