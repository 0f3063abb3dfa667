//! `notes` command: print the notes the next release would carry

use crate::core::context::ReleaseContext;
use crate::core::error::{ReleaseResult, ResultExt};
use crate::github::RepoAccessor;
use crate::release::{NotesOrigin, load_or_generate};
use chrono::{DateTime, Local, NaiveDate, Utc};
use std::path::PathBuf;

/// Parse `--since` as RFC 3339 or a plain `YYYY-MM-DD` (midnight UTC)
pub fn parse_since(raw: &str) -> Result<DateTime<Utc>, String> {
  if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
    return Ok(ts.with_timezone(&Utc));
  }
  NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    .ok()
    .and_then(|date| date.and_hms_opt(0, 0, 0))
    .map(|naive| naive.and_utc())
    .ok_or_else(|| format!("invalid timestamp '{}': expected RFC 3339 or YYYY-MM-DD", raw))
}

/// Validate the tag and print (or save) the notes without touching the repo
///
/// `since` replaces the previous release's creation time as the scan start.
pub async fn run_notes(
  ctx: &ReleaseContext,
  since: Option<DateTime<Utc>>,
  output: Option<PathBuf>,
) -> ReleaseResult<()> {
  let git = ctx.git()?;
  let repo = ctx.github(&git)?;

  let previous = repo
    .validate_tag(&ctx.version, &ctx.config.release.tag_prefix)
    .await?;
  let since = since.or(previous.as_ref().map(|r| r.created_at));
  tracing::info!(since = ?since, "Collecting notes");

  let today = Local::now().date_naive();
  let notes = load_or_generate(&repo, &ctx.notes_path(), &ctx.version, since, today).await?;

  match output {
    Some(path) => {
      std::fs::write(&path, &notes.body).with_context(|| format!("Failed to write {}", path.display()))?;
      match notes.origin {
        NotesOrigin::Existing => println!("✅ Copied {} to {}", ctx.config.release.notes_file.display(), path.display()),
        NotesOrigin::Generated => println!("✅ Wrote release notes to {}", path.display()),
      }
    }
    None => println!("{}", notes.body),
  }

  Ok(())
}
