//! Release orchestration
//!
//! One release is a fixed, sequential pipeline that aborts on the first
//! error:
//!
//! 1. Validate the tag against GitHub (parseable, unused, newer than the
//!    latest release)
//! 2. Use the existing notes file, or generate the notes and write it
//! 3. With `commit` or `push`: update the changelog, stage and commit
//!    `Release <version>`
//! 4. With `push`: push the branch, then publish the GitHub release
//!
//! Nothing is retried. A failure after the commit leaves the commit in
//! place; re-running picks up the notes file written by the first run.

pub mod changelog;

use crate::core::context::ReleaseContext;
use crate::core::error::{ReleaseResult, ResultExt};
use crate::core::vcs::Vcs;
use crate::github::tags::parse_loose_version;
use crate::github::{NewRelease, Release, RepoAccessor};
use crate::notes;
use chrono::{DateTime, NaiveDate, Utc};
use std::path::Path;

/// Where the release body came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotesOrigin {
  /// Read from an existing notes file
  Existing,
  /// Generated from commits and pull requests
  Generated,
}

/// Release body plus its origin
#[derive(Debug, Clone)]
pub struct ReleaseNotes {
  pub body: String,
  pub origin: NotesOrigin,
}

/// What a release run did
#[derive(Debug, Clone)]
pub struct ReleaseOutcome {
  pub tag_name: String,
  pub notes: ReleaseNotes,
  /// Previous release the notes were collected from, if any
  pub previous: Option<Release>,
  /// Sha of the release commit, when one was made
  pub commit: Option<String>,
  /// Published GitHub release, when pushed
  pub published: Option<Release>,
}

/// Read the notes file if present, otherwise generate the notes
///
/// An existing file is used verbatim (trimmed) and never regenerated.
pub async fn load_or_generate<R: RepoAccessor>(
  repo: &R,
  notes_path: &Path,
  version: &str,
  since: Option<DateTime<Utc>>,
  today: NaiveDate,
) -> ReleaseResult<ReleaseNotes> {
  if notes_path.exists() {
    let content = std::fs::read_to_string(notes_path)
      .with_context(|| format!("Failed to read notes file {}", notes_path.display()))?;
    tracing::info!(path = %notes_path.display(), "Using existing release notes");
    return Ok(ReleaseNotes {
      body: content.trim().to_string(),
      origin: NotesOrigin::Existing,
    });
  }

  let body = notes::generate(repo, version, since, today).await?;
  Ok(ReleaseNotes {
    body,
    origin: NotesOrigin::Generated,
  })
}

/// Write generated notes so a re-run can reuse (or a human can edit) them
pub fn write_notes(notes_path: &Path, body: &str) -> ReleaseResult<()> {
  if let Some(parent) = notes_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
  }
  std::fs::write(notes_path, body).with_context(|| format!("Failed to write notes file {}", notes_path.display()))?;
  Ok(())
}

/// Run the release pipeline for `ctx.version`
pub async fn run_release<R: RepoAccessor, V: Vcs>(
  repo: &R,
  vcs: &V,
  ctx: &ReleaseContext,
  today: NaiveDate,
) -> ReleaseResult<ReleaseOutcome> {
  let release = &ctx.config.release;
  let version = ctx.version.as_str();
  let tag_name = release.tag_name(version);

  let previous = repo.validate_tag(version, &release.tag_prefix).await?;
  match &previous {
    Some(prev) => println!("🔖 Releasing {} (previous: {})", tag_name, prev.tag_name),
    None => println!("🔖 Releasing {} (first release)", tag_name),
  }

  let notes_path = ctx.notes_path();
  let since = previous.as_ref().map(|r| r.created_at);
  let notes = load_or_generate(repo, &notes_path, version, since, today).await?;
  match notes.origin {
    NotesOrigin::Existing => println!("   Using {}", release.notes_file.display()),
    NotesOrigin::Generated => {
      write_notes(&notes_path, &notes.body)?;
      println!("   Wrote {}", release.notes_file.display());
    }
  }

  let mut commit = None;
  if release.commit || release.push {
    let mut staged: Vec<&Path> = vec![release.notes_file.as_path()];

    if let Some(changelog_path) = &release.changelog {
      changelog::prepend(&ctx.root.join(changelog_path), &notes.body)?;
      println!("   Updated {}", changelog_path.display());
      staged.push(changelog_path.as_path());
    }

    vcs.stage(&staged)?;
    if vcs.has_staged_changes()? {
      let sha = vcs.commit(&format!("Release {}", version))?;
      println!("   Committed {}", short_sha(&sha));
      commit = Some(sha);
    } else {
      tracing::info!("Nothing to commit for release");
    }
  }

  let mut published = None;
  if release.push {
    vcs.push(&release.remote)?;
    println!("   Pushed to {}", release.remote);

    let prerelease = parse_loose_version(version).is_some_and(|v| !v.pre.is_empty());
    let created = repo
      .create_release(&NewRelease {
        tag_name: tag_name.clone(),
        name: tag_name.clone(),
        body: notes.body.clone(),
        draft: false,
        prerelease,
      })
      .await?;
    tracing::info!(tag = %created.tag_name, url = %created.html_url, "Created GitHub release");
    published = Some(created);
  }

  Ok(ReleaseOutcome {
    tag_name,
    notes,
    previous,
    commit,
    published,
  })
}

fn short_sha(sha: &str) -> &str {
  sha.get(..7).unwrap_or(sha)
}
