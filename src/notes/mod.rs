//! Release-note extraction and rendering
//!
//! Messages (commit messages, PR bodies and their comments) are scanned for
//! an explicit `#release-note[=section]` marker or, failing that, for
//! issue-closing references such as `fixes #12`. Each hit becomes a [`Note`];
//! notes from commits and pull requests are then grouped by section and
//! rendered as one Markdown document.
//!
//! ```text
//! collect::from_commits ─┐
//!                        ├─> annotate::add_note ─> Vec<Note> ─> render::render_notes
//! collect::from_pulls  ──┘          │
//!                                   └─> issues::link_issue_references
//! ```

pub mod annotate;
pub mod collect;
pub mod issues;
pub mod render;

use crate::core::error::ReleaseResult;
use crate::github::RepoAccessor;
use chrono::{DateTime, NaiveDate, Utc};

/// A single rendered release note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
  /// When the originating commit was committed / PR was closed
  pub timestamp: DateTime<Utc>,
  /// Lowercase section key, empty for unsectioned notes
  pub section: String,
  /// Markdown body
  pub body: String,
}

/// Metadata of the commit or pull request a message belongs to
#[derive(Debug, Clone, Copy)]
pub struct Source<'a> {
  pub timestamp: DateTime<Utc>,
  /// Short commit hash or `#<number>`
  pub id: &'a str,
  /// Link to the commit or pull request
  pub link: &'a str,
}

/// Scan commits, then pull requests, and render the notes document
///
/// `since` is the creation time of the previous release; `None` scans the
/// whole history.
pub async fn generate<R: RepoAccessor>(
  repo: &R,
  version: &str,
  since: Option<DateTime<Utc>>,
  today: NaiveDate,
) -> ReleaseResult<String> {
  let mut notes = collect::from_commits(repo, since).await?;
  notes.extend(collect::from_pull_requests(repo, since).await?);
  tracing::info!(count = notes.len(), "Collected release notes");
  Ok(render::render_notes(notes, version, today))
}

/// Uppercase the first character, leave the rest untouched
pub fn capitalize_first(text: &str) -> String {
  let mut chars = text.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}
