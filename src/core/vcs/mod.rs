pub mod system_git;
mod system_git_ops;

use crate::core::error::ReleaseResult;
use std::path::Path;

pub use system_git::SystemGit;

/// Version-control operations the release flow needs
pub trait Vcs {
  /// Stage files (relative to the work tree)
  fn stage(&self, paths: &[&Path]) -> ReleaseResult<()>;

  /// Whether anything is staged for commit
  fn has_staged_changes(&self) -> ReleaseResult<bool>;

  /// Commit staged changes, returning the new HEAD sha
  fn commit(&self, message: &str) -> ReleaseResult<String>;

  /// Push the current branch to `remote`
  fn push(&self, remote: &str) -> ReleaseResult<()>;
}
