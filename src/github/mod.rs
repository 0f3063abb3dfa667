//! Repository accessor: the records release notes are built from
//!
//! `RepoAccessor` is the seam between the note-extraction core and the
//! hosting platform. `GithubRepo` implements it over the GitHub REST API;
//! tests implement it over in-memory fixtures.

pub mod client;
pub mod tags;

use crate::core::error::{ReleaseError, ReleaseResult, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use client::GithubRepo;

/// A commit as listed by `GET /repos/{owner}/{repo}/commits`
#[derive(Debug, Clone, Deserialize)]
pub struct CommitEntry {
  pub sha: String,
  pub html_url: String,
  pub commit: CommitDetail,
}

/// Git-level commit data
#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
  pub message: String,
  pub committer: Signature,
  #[serde(default)]
  pub comment_count: u64,
}

/// Author or committer stamp
#[derive(Debug, Clone, Deserialize)]
pub struct Signature {
  pub date: DateTime<Utc>,
}

/// A pull request as listed by `GET /repos/{owner}/{repo}/pulls`
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
  pub number: u64,
  #[serde(default)]
  pub body: Option<String>,
  pub html_url: String,
  #[serde(default)]
  pub closed_at: Option<DateTime<Utc>>,
  pub updated_at: DateTime<Utc>,
}

/// Commit comment or issue/PR comment
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
  #[serde(default)]
  pub body: Option<String>,
}

/// Issue lookup result
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
  pub number: u64,
  pub html_url: String,
}

/// A published release
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
  pub tag_name: String,
  pub created_at: DateTime<Utc>,
  #[serde(default)]
  pub html_url: String,
}

/// Payload for `POST /repos/{owner}/{repo}/releases`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRelease {
  pub tag_name: String,
  pub name: String,
  pub body: String,
  pub draft: bool,
  pub prerelease: bool,
}

/// Listing parameters for pull requests, as GitHub query values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullQuery {
  /// `open`, `closed` or `all`
  pub state: &'static str,
  /// `created`, `updated`, `popularity` or `long-running`
  pub sort: &'static str,
  /// `asc` or `desc`
  pub direction: &'static str,
}

impl PullQuery {
  /// Closed pull requests, most recently updated first
  pub fn recently_closed() -> Self {
    Self {
      state: "closed",
      sort: "updated",
      direction: "desc",
    }
  }

  /// Query-string pairs
  pub fn as_query(&self) -> [(&'static str, &'static str); 3] {
    [("state", self.state), ("sort", self.sort), ("direction", self.direction)]
  }
}

/// Keeps pull requests updated strictly after a reference time
///
/// Applied by the fetch to each page as it arrives. With no reference time
/// (first release) every pull request is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdatedSince {
  since: Option<DateTime<Utc>>,
}

impl UpdatedSince {
  pub fn new(since: Option<DateTime<Utc>>) -> Self {
    Self { since }
  }

  /// Whether a single pull request qualifies
  pub fn matches(&self, pull: &PullRequest) -> bool {
    match self.since {
      Some(since) => pull.updated_at > since,
      None => true,
    }
  }

  /// Filter one page of results
  pub fn apply(&self, page: Vec<PullRequest>) -> Vec<PullRequest> {
    page.into_iter().filter(|pull| self.matches(pull)).collect()
  }
}

/// Read access (plus release creation) on one hosted repository
pub trait RepoAccessor {
  /// Commits at or after `since` (all history when `None`)
  async fn commits(&self, since: Option<DateTime<Utc>>) -> ReleaseResult<Vec<CommitEntry>>;

  /// Comments attached to a commit
  async fn commit_comments(&self, sha: &str) -> ReleaseResult<Vec<Comment>>;

  /// Pull requests matching `query`, with `filter` applied page by page
  async fn pulls(&self, query: &PullQuery, filter: &UpdatedSince) -> ReleaseResult<Vec<PullRequest>>;

  /// Look up a single issue
  async fn issue(&self, number: u64) -> ReleaseResult<Issue>;

  /// Comments on an issue or pull request (they share one stream)
  async fn issue_comments(&self, number: u64) -> ReleaseResult<Vec<Comment>>;

  /// Most recent published release, if any
  async fn latest_release(&self) -> ReleaseResult<Option<Release>>;

  /// Whether a tag already exists
  async fn tag_exists(&self, tag: &str) -> ReleaseResult<bool>;

  /// Publish a release (creating its tag)
  async fn create_release(&self, release: &NewRelease) -> ReleaseResult<Release>;

  /// Check that `<prefix><version>` can be released
  ///
  /// The version must parse, its tag must not exist yet, and it must be
  /// newer than the latest release. Returns that latest release, whose
  /// `created_at` bounds the note scan; `None` means a first release.
  async fn validate_tag(&self, version: &str, prefix: &str) -> ReleaseResult<Option<Release>> {
    let new_version = tags::parse_loose_version(version).ok_or_else(|| {
      ReleaseError::Validation(ValidationError::InvalidVersion {
        version: version.to_string(),
      })
    })?;

    let tag = format!("{}{}", prefix, version);
    if self.tag_exists(&tag).await? {
      return Err(ReleaseError::Validation(ValidationError::TagExists { tag }));
    }

    let current = self.latest_release().await?;
    if let Some(release) = &current {
      match tags::version_from_tag(&release.tag_name, prefix) {
        Some(current_version) if current_version >= new_version => {
          return Err(ReleaseError::Validation(ValidationError::VersionNotNewer {
            version: version.to_string(),
            current: release.tag_name.clone(),
          }));
        }
        Some(_) => {}
        None => tracing::warn!(tag = %release.tag_name, "Latest release tag is not a version, skipping comparison"),
      }
    }

    Ok(current)
  }
}
