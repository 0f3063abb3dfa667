//! Release operations for SystemGit (staging, commits, remotes)

use super::Vcs;
use super::system_git::SystemGit;
use crate::core::error::{GitError, ReleaseError, ReleaseResult, ResultExt};
use crate::utils::path_to_git_format;
use std::path::Path;

impl SystemGit {
  /// List all remotes
  pub fn list_remotes(&self) -> ReleaseResult<Vec<(String, String)>> {
    let output = self
      .git_cmd()
      .args(["remote", "-v"])
      .output()
      .context("Failed to list remotes")?;

    if !output.status.success() {
      return Ok(vec![]);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut remotes = Vec::new();

    for line in stdout.lines() {
      // Format: "origin  git@github.com:user/repo.git (fetch)"
      let parts: Vec<&str> = line.split_whitespace().collect();
      if parts.len() >= 2 && line.contains("(fetch)") {
        remotes.push((parts[0].to_string(), parts[1].to_string()));
      }
    }

    Ok(remotes)
  }

  /// Get remote URL
  pub fn remote_url(&self, name: &str) -> ReleaseResult<Option<String>> {
    let remotes = self.list_remotes()?;
    Ok(remotes.into_iter().find(|(n, _)| n == name).map(|(_, url)| url))
  }
}

impl Vcs for SystemGit {
  fn stage(&self, paths: &[&Path]) -> ReleaseResult<()> {
    if paths.is_empty() {
      return Ok(());
    }

    let mut cmd = self.git_cmd();
    cmd.args(["add", "--"]);
    for path in paths {
      cmd.arg(path_to_git_format(path));
    }

    let output = cmd.output().context("Failed to stage files")?;
    if !output.status.success() {
      return Err(ReleaseError::Git(GitError::CommandFailed {
        command: "git add".to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    Ok(())
  }

  fn has_staged_changes(&self) -> ReleaseResult<bool> {
    // `diff --cached --quiet` exits 1 when there are differences
    let output = self
      .git_cmd()
      .args(["diff", "--cached", "--quiet"])
      .output()
      .context("Failed to inspect index")?;

    match output.status.code() {
      Some(0) => Ok(false),
      Some(1) => Ok(true),
      _ => Err(ReleaseError::Git(GitError::CommandFailed {
        command: "git diff --cached --quiet".to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      })),
    }
  }

  fn commit(&self, message: &str) -> ReleaseResult<String> {
    self.run(&["commit", "-m", message], "Failed to commit")?;
    self.head_commit()
  }

  fn push(&self, remote: &str) -> ReleaseResult<()> {
    let branch = self.current_branch()?;

    let output = self
      .git_cmd()
      .args(["push", remote, branch.as_str()])
      .output()
      .context("Failed to push")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ReleaseError::Git(GitError::PushFailed {
        remote: remote.to_string(),
        branch,
        reason: stderr.to_string(),
      }));
    }

    tracing::info!(remote, branch = %branch, "Pushed release commit");
    Ok(())
  }
}
