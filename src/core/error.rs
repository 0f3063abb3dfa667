//! Error types for release-notes with contextual messages and exit codes
//!
//! Every error maps to an exit code, and most carry a suggestion that
//! points the operator at the fix before re-running the release.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for release-notes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing files)
  User = 1,
  /// System error (git, network, I/O)
  System = 2,
  /// Validation failure (tag exists, version not newer)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for release-notes
#[derive(Debug)]
pub enum ReleaseError {
  /// Configuration errors
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// GitHub API errors
  Github(GithubError),

  /// Tag / version validation errors
  Validation(ValidationError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ReleaseError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ReleaseError::Message { message, context, help } => ReleaseError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      ReleaseError::Io(err) => ReleaseError::Message {
        message: format!("I/O error: {}", err),
        context: Some(ctx_str),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ReleaseError::Config(_) => ExitCode::User,
      ReleaseError::Git(_) => ExitCode::System,
      ReleaseError::Github(_) => ExitCode::System,
      ReleaseError::Validation(_) => ExitCode::Validation,
      ReleaseError::Io(_) => ExitCode::System,
      ReleaseError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ReleaseError::Config(e) => e.help_message(),
      ReleaseError::Git(e) => e.help_message(),
      ReleaseError::Github(e) => e.help_message(),
      ReleaseError::Validation(e) => e.help_message(),
      ReleaseError::Message { help, .. } => help.clone(),
      ReleaseError::Io(_) => None,
    }
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseError::Config(e) => write!(f, "{}", e),
      ReleaseError::Git(e) => write!(f, "{}", e),
      ReleaseError::Github(e) => write!(f, "{}", e),
      ReleaseError::Validation(e) => write!(f, "{}", e),
      ReleaseError::Io(e) => write!(f, "I/O error: {}", e),
      ReleaseError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ReleaseError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ReleaseError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ReleaseError {
  fn from(err: io::Error) -> Self {
    ReleaseError::Io(err)
  }
}

impl From<String> for ReleaseError {
  fn from(msg: String) -> Self {
    ReleaseError::message(msg)
  }
}

impl From<&str> for ReleaseError {
  fn from(msg: &str) -> Self {
    ReleaseError::message(msg)
  }
}

impl From<toml_edit::TomlError> for ReleaseError {
  fn from(err: toml_edit::TomlError) -> Self {
    ReleaseError::message(format!("TOML parse error: {}", err))
  }
}

impl From<toml_edit::de::Error> for ReleaseError {
  fn from(err: toml_edit::de::Error) -> Self {
    ReleaseError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for ReleaseError {
  fn from(err: serde_json::Error) -> Self {
    ReleaseError::message(format!("JSON error: {}", err))
  }
}

impl From<reqwest::Error> for ReleaseError {
  fn from(err: reqwest::Error) -> Self {
    ReleaseError::Github(GithubError::Transport {
      message: err.to_string(),
    })
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// release.toml not found
  NotFound { repo_root: PathBuf },

  /// Missing required field
  MissingField { field: String },

  /// Field present but unusable
  InvalidField { field: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => {
        Some("Create a release.toml with a [release] table, or pass the version as `release-notes release <VERSION>`.".to_string())
      }
      ConfigError::MissingField { field } if field == "version" => {
        Some("Set `version` under [release] in release.toml, or pass it as `release-notes release <VERSION>`.".to_string())
      }
      ConfigError::MissingField { field } if field == "github.repo" => {
        Some("Set `repo = \"owner/name\"` under [github], or add a GitHub `origin` remote.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { repo_root } => {
        write!(
          f,
          "No release configuration found.\nExpected file: {}/release.toml",
          repo_root.display()
        )
      }
      ConfigError::MissingField { field } => {
        write!(f, "Missing required field in config: {}", field)
      }
      ConfigError::InvalidField { field, reason } => {
        write!(f, "Invalid value for '{}': {}", field, reason)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// Push failed
  PushFailed {
    remote: String,
    branch: String,
    reason: String,
  },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::PushFailed { reason, .. } => {
        if reason.contains("non-fast-forward") || reason.contains("rejected") {
          Some("The remote has commits you don't have. Pull, then re-run the release.".to_string())
        } else if reason.contains("permission denied") || reason.contains("403") {
          Some("Check your SSH key or credentials for the remote.".to_string())
        } else {
          None
        }
      }
      GitError::RepoNotFound { path } => Some(format!(
        "Run the command inside a git repository or pass -C/--repo-dir: {}",
        path.display()
      )),
      GitError::CommandFailed { .. } => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
      GitError::PushFailed { remote, branch, reason } => {
        write!(f, "Push to {}/{} failed: {}", remote, branch, reason)
      }
    }
  }
}

/// GitHub API errors
#[derive(Debug)]
pub enum GithubError {
  /// Non-success HTTP status
  Status { url: String, status: u16, message: String },

  /// Resource does not exist
  NotFound { url: String },

  /// Rate limit exhausted
  RateLimited,

  /// Connection / decoding failure
  Transport { message: String },
}

impl GithubError {
  fn help_message(&self) -> Option<String> {
    match self {
      GithubError::RateLimited => Some("Export GITHUB_TOKEN to raise the API rate limit.".to_string()),
      GithubError::Status { status: 401, .. } | GithubError::Status { status: 403, .. } => {
        Some("Check that GITHUB_TOKEN is set and has `repo` scope.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for GithubError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GithubError::Status { url, status, message } => {
        write!(f, "GitHub request to {} failed with {}: {}", url, status, message)
      }
      GithubError::NotFound { url } => write!(f, "GitHub resource not found: {}", url),
      GithubError::RateLimited => write!(f, "GitHub API rate limit exceeded"),
      GithubError::Transport { message } => write!(f, "GitHub request failed: {}", message),
    }
  }
}

/// Tag and version validation errors
#[derive(Debug)]
pub enum ValidationError {
  /// Version string does not parse
  InvalidVersion { version: String },

  /// Tag is already present on the remote
  TagExists { tag: String },

  /// New version does not move past the latest release
  VersionNotNewer { version: String, current: String },
}

impl ValidationError {
  fn help_message(&self) -> Option<String> {
    match self {
      ValidationError::InvalidVersion { .. } => Some("Use a semver version such as 1.4.0.".to_string()),
      ValidationError::TagExists { .. } => {
        Some("Bump the version in release.toml; released tags are never overwritten.".to_string())
      }
      ValidationError::VersionNotNewer { current, .. } => {
        Some(format!("Pick a version greater than the latest release {}.", current))
      }
    }
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValidationError::InvalidVersion { version } => write!(f, "Invalid version '{}'", version),
      ValidationError::TagExists { tag } => write!(f, "Tag {} already exists", tag),
      ValidationError::VersionNotNewer { version, current } => {
        write!(f, "Version {} is not newer than the current release {}", version, current)
      }
    }
  }
}

/// Result type alias for release-notes
pub type ReleaseResult<T> = Result<T, ReleaseError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ReleaseError>,
{
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ReleaseError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
