//! Release context - resolve once, pass everywhere
//!
//! Built in main.rs from the repository root, release.toml and command-line
//! overrides, then handed to the command being run.

use crate::core::config::{Config, parse_repo_slug};
use crate::core::error::{ConfigError, ReleaseError, ReleaseResult};
use crate::core::vcs::SystemGit;
use crate::github::GithubRepo;
use crate::utils::parse_github_remote;
use std::path::{Path, PathBuf};

/// Command-line values that take precedence over release.toml
#[derive(Debug, Clone, Default)]
pub struct Overrides {
  pub version: Option<String>,
  pub tag_prefix: Option<String>,
  pub repo: Option<String>,
  pub api_url: Option<String>,
  pub commit: bool,
  pub push: bool,
}

/// Everything a command needs to talk to git and GitHub
pub struct ReleaseContext {
  /// Repository root (absolute path)
  pub root: PathBuf,

  /// Effective configuration (file + overrides)
  pub config: Config,

  /// Version being released, resolved before any network access
  pub version: String,
}

impl ReleaseContext {
  /// Load configuration, apply overrides and resolve the version
  ///
  /// Fails with a configuration error when no version can be determined.
  pub fn build(root: &Path, config_path: Option<&Path>, overrides: Overrides) -> ReleaseResult<Self> {
    let mut config = Config::load(root, config_path)?;

    if let Some(version) = overrides.version {
      config.release.version = Some(version);
      config.release.version_from_manifest = false;
    }
    if let Some(prefix) = overrides.tag_prefix {
      config.release.tag_prefix = prefix;
    }
    if let Some(repo) = overrides.repo {
      config.github.repo = Some(repo);
    }
    if let Some(api_url) = overrides.api_url {
      config.github.api_url = api_url;
    }
    config.release.commit |= overrides.commit;
    config.release.push |= overrides.push;

    let version = config.release.resolve_version(root)?;

    Ok(Self {
      root: root.to_path_buf(),
      config,
      version,
    })
  }

  /// Open the local git repository
  pub fn git(&self) -> ReleaseResult<SystemGit> {
    let git = SystemGit::open(&self.root)?;
    tracing::debug!(work_tree = %git.work_tree().display(), "Opened repository");
    Ok(git)
  }

  /// `(owner, name)` from config, else from the push remote
  pub fn repo_slug(&self, git: &SystemGit) -> ReleaseResult<(String, String)> {
    if let Some(repo) = &self.config.github.repo {
      return parse_repo_slug(repo).ok_or_else(|| {
        ReleaseError::Config(ConfigError::InvalidField {
          field: "github.repo".to_string(),
          reason: format!("expected owner/name, got '{}'", repo),
        })
      });
    }

    let remote = &self.config.release.remote;
    git
      .remote_url(remote)?
      .as_deref()
      .and_then(parse_github_remote)
      .ok_or_else(|| {
        ReleaseError::Config(ConfigError::MissingField {
          field: "github.repo".to_string(),
        })
      })
  }

  /// GitHub accessor for the configured repository
  ///
  /// Authenticates with `GITHUB_TOKEN` when it is set.
  pub fn github(&self, git: &SystemGit) -> ReleaseResult<GithubRepo> {
    let (owner, name) = self.repo_slug(git)?;
    tracing::debug!(owner = %owner, name = %name, api = %self.config.github.api_url, "Using GitHub repository");
    Ok(GithubRepo::new(&self.config.github.api_url, &owner, &name)?.with_token(std::env::var("GITHUB_TOKEN").ok()))
  }

  /// Absolute path of the notes document
  pub fn notes_path(&self) -> PathBuf {
    self.root.join(&self.config.release.notes_file)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn test_missing_version_fails_before_io() {
    let dir = TempDir::new().unwrap();
    let err = ReleaseContext::build(dir.path(), None, Overrides::default())
      .err()
      .unwrap();
    assert!(matches!(err, ReleaseError::Config(ConfigError::MissingField { .. })));
  }

  #[test]
  fn test_overrides_take_precedence() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
      dir.path().join("release.toml"),
      "[github]\nrepo = \"acme/widgets\"\n\n[release]\nversion = \"Cargo.toml\"\nversion_from_manifest = true\ntag_prefix = \"v\"\ncommit = true\n",
    )
    .unwrap();

    let ctx = ReleaseContext::build(
      dir.path(),
      None,
      Overrides {
        version: Some("2.0.0".to_string()),
        tag_prefix: Some("release-".to_string()),
        push: true,
        ..Default::default()
      },
    )
    .unwrap();

    assert_eq!(ctx.version, "2.0.0");
    assert_eq!(ctx.config.release.tag_name(&ctx.version), "release-2.0.0");
    assert!(ctx.config.release.commit);
    assert!(ctx.config.release.push);
    assert_eq!(ctx.notes_path(), dir.path().join("release-notes.md"));
  }
}
