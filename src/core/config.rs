use crate::core::error::{ConfigError, ReleaseError, ReleaseResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the release notes document
pub const DEFAULT_NOTES_FILE: &str = "release-notes.md";

/// Default GitHub REST endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Configuration for release-notes
/// Searched in order: release.toml, .release.toml, .config/release.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub github: GithubConfig,
  #[serde(default)]
  pub release: ReleaseConfig,
}

/// Where to find the hosting repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
  /// `owner/name`; inferred from the push remote when absent
  #[serde(default)]
  pub repo: Option<String>,

  /// REST API base URL (GitHub Enterprise or test servers)
  #[serde(default = "default_api_url")]
  pub api_url: String,
}

fn default_api_url() -> String {
  DEFAULT_API_URL.to_string()
}

impl Default for GithubConfig {
  fn default() -> Self {
    Self {
      repo: None,
      api_url: default_api_url(),
    }
  }
}

/// Release settings
///
/// # Example
///
/// ```toml
/// [release]
/// version = "crates/app/Cargo.toml"
/// version_from_manifest = true
/// tag_prefix = "v"
/// push = true
/// changelog = "CHANGELOG.md"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseConfig {
  /// Version to release, or a manifest path when `version_from_manifest` is set
  #[serde(default)]
  pub version: Option<String>,

  /// Treat `version` as a path to a Cargo.toml and read its version
  #[serde(default)]
  pub version_from_manifest: bool,

  /// Prefix prepended to the version to form the tag name
  #[serde(default)]
  pub tag_prefix: String,

  /// Commit the notes (and changelog) after generating them
  #[serde(default)]
  pub commit: bool,

  /// Push the release commit and create the GitHub release
  #[serde(default)]
  pub push: bool,

  /// Notes document, relative to the repository root
  #[serde(default = "default_notes_file")]
  pub notes_file: PathBuf,

  /// Changelog that receives each release body when committing
  #[serde(default)]
  pub changelog: Option<PathBuf>,

  /// Remote used for pushing and repository discovery
  #[serde(default = "default_remote")]
  pub remote: String,
}

fn default_notes_file() -> PathBuf {
  PathBuf::from(DEFAULT_NOTES_FILE)
}

fn default_remote() -> String {
  "origin".to_string()
}

impl Default for ReleaseConfig {
  fn default() -> Self {
    Self {
      version: None,
      version_from_manifest: false,
      tag_prefix: String::new(),
      commit: false,
      push: false,
      notes_file: default_notes_file(),
      changelog: None,
      remote: default_remote(),
    }
  }
}

impl ReleaseConfig {
  /// Resolve the version to release
  ///
  /// Fails with `MissingField` when no version is configured; this check
  /// happens before any network or git access.
  pub fn resolve_version(&self, repo_root: &Path) -> ReleaseResult<String> {
    let version = self
      .version
      .as_deref()
      .map(str::trim)
      .filter(|v| !v.is_empty())
      .ok_or_else(|| {
        ReleaseError::Config(ConfigError::MissingField {
          field: "version".to_string(),
        })
      })?;

    if self.version_from_manifest {
      tracing::debug!(manifest = version, "Reading release version from manifest");
      return version_from_manifest(&repo_root.join(version));
    }

    Ok(version.to_string())
  }

  /// Full tag name for a version
  pub fn tag_name(&self, version: &str) -> String {
    format!("{}{}", self.tag_prefix, version)
  }
}

/// Read `package.version` (or `workspace.package.version`) from a Cargo.toml
pub fn version_from_manifest(manifest: &Path) -> ReleaseResult<String> {
  let content =
    fs::read_to_string(manifest).with_context(|| format!("Failed to read manifest {}", manifest.display()))?;

  let doc: toml_edit::DocumentMut = content
    .parse()
    .with_context(|| format!("Failed to parse manifest {}", manifest.display()))?;

  let package_version = doc
    .get("package")
    .and_then(|p| p.get("version"))
    .and_then(|v| v.as_str());

  let workspace_version = doc
    .get("workspace")
    .and_then(|w| w.get("package"))
    .and_then(|p| p.get("version"))
    .and_then(|v| v.as_str());

  package_version.or(workspace_version).map(str::to_string).ok_or_else(|| {
    ReleaseError::Config(ConfigError::InvalidField {
      field: "version".to_string(),
      reason: format!("{} has no literal package.version", manifest.display()),
    })
  })
}

impl Config {
  /// Find config file in search order: release.toml, .release.toml, .config/release.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("release.toml"),
      path.join(".release.toml"),
      path.join(".config").join("release.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from an explicit file, or search the repository root
  ///
  /// A missing file is not an error: everything can come from the command line.
  pub fn load(repo_root: &Path, explicit: Option<&Path>) -> ReleaseResult<Self> {
    let config_path = match explicit {
      Some(path) if !path.exists() => {
        return Err(ReleaseError::Config(ConfigError::NotFound {
          repo_root: repo_root.to_path_buf(),
        }));
      }
      Some(path) => path.to_path_buf(),
      None => match Self::find_config_path(repo_root) {
        Some(path) => path,
        None => {
          tracing::debug!(root = %repo_root.display(), "No release.toml found, using defaults");
          return Ok(Self::default());
        }
      },
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    Self::parse(&content).with_context(|| format!("Failed to parse config from {}", config_path.display()))
  }

  /// Parse config from TOML text
  pub fn parse(content: &str) -> ReleaseResult<Self> {
    let config: Config = toml_edit::de::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  fn validate(&self) -> ReleaseResult<()> {
    if let Some(repo) = &self.github.repo
      && parse_repo_slug(repo).is_none()
    {
      return Err(ReleaseError::Config(ConfigError::InvalidField {
        field: "github.repo".to_string(),
        reason: format!("expected owner/name, got '{}'", repo),
      }));
    }

    if self.release.notes_file.as_os_str().is_empty() {
      return Err(ReleaseError::Config(ConfigError::InvalidField {
        field: "release.notes_file".to_string(),
        reason: "must not be empty".to_string(),
      }));
    }

    Ok(())
  }
}

/// Split `owner/name` into its parts
pub fn parse_repo_slug(slug: &str) -> Option<(String, String)> {
  let (owner, name) = slug.trim().split_once('/')?;
  let name = name.trim_end_matches(".git");
  if owner.is_empty() || name.is_empty() || name.contains('/') {
    return None;
  }
  Some((owner.to_string(), name.to_string()))
}
