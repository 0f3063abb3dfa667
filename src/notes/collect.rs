//! Note collectors over commits and pull requests

use super::annotate::add_note;
use super::{Note, Source};
use crate::core::error::ReleaseResult;
use crate::github::{PullQuery, RepoAccessor, UpdatedSince};
use chrono::{DateTime, Utc};

/// Length of the abbreviated commit hash used as the note id
const SHORT_SHA_LEN: usize = 7;

/// Collect notes from commits made since `since`, and from their comments
///
/// Comments carry no timestamp of their own; they reuse the commit's.
pub async fn from_commits<R: RepoAccessor>(repo: &R, since: Option<DateTime<Utc>>) -> ReleaseResult<Vec<Note>> {
  let commits = repo.commits(since).await?;
  tracing::debug!(count = commits.len(), "Scanning commits");

  let mut notes = Vec::new();
  for entry in &commits {
    let id: String = entry.sha.chars().take(SHORT_SHA_LEN).collect();
    let source = Source {
      timestamp: entry.commit.committer.date,
      id: &id,
      link: &entry.html_url,
    };

    add_note(repo, &mut notes, &entry.commit.message, &source).await;

    if entry.commit.comment_count > 0 {
      for comment in repo.commit_comments(&entry.sha).await? {
        if let Some(body) = &comment.body {
          add_note(repo, &mut notes, body, &source).await;
        }
      }
    }
  }

  Ok(notes)
}

/// Collect notes from pull requests closed since `since`, and their comments
///
/// Pull requests are listed closed, most recently updated first, keeping
/// only those updated strictly after `since`.
pub async fn from_pull_requests<R: RepoAccessor>(
  repo: &R,
  since: Option<DateTime<Utc>>,
) -> ReleaseResult<Vec<Note>> {
  let pulls = repo
    .pulls(&PullQuery::recently_closed(), &UpdatedSince::new(since))
    .await?;
  tracing::debug!(count = pulls.len(), "Scanning pull requests");

  let mut notes = Vec::new();
  for pull in &pulls {
    let id = format!("#{}", pull.number);
    let source = Source {
      timestamp: pull.closed_at.unwrap_or(pull.updated_at),
      id: &id,
      link: &pull.html_url,
    };

    if let Some(body) = &pull.body {
      add_note(repo, &mut notes, body, &source).await;
    }

    for comment in repo.issue_comments(pull.number).await? {
      if let Some(body) = &comment.body {
        add_note(repo, &mut notes, body, &source).await;
      }
    }
  }

  Ok(notes)
}
