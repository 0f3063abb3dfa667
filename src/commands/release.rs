//! `release` command: run the release pipeline against GitHub and git

use crate::core::context::ReleaseContext;
use crate::core::error::ReleaseResult;
use crate::release::{NotesOrigin, ReleaseOutcome};
use chrono::Local;

/// One-line description of the release body
fn notes_summary(outcome: &ReleaseOutcome, notes_file: &str) -> String {
  let entries = outcome.notes.body.lines().filter(|l| l.starts_with("* ")).count();
  match outcome.notes.origin {
    NotesOrigin::Existing => format!("Notes reused from {} ({} entries)", notes_file, entries),
    NotesOrigin::Generated => format!("Notes generated into {} ({} entries)", notes_file, entries),
  }
}

/// Run the full release for the resolved version
pub async fn run_release(ctx: &ReleaseContext) -> ReleaseResult<()> {
  let git = ctx.git()?;
  let repo = ctx.github(&git)?;
  let release = &ctx.config.release;

  let today = Local::now().date_naive();
  let outcome = crate::release::run_release(&repo, &git, ctx, today).await?;

  if let Some(previous) = &outcome.previous {
    tracing::debug!(previous = %previous.tag_name, since = %previous.created_at, "Notes collected since previous release");
  }

  println!();
  println!("📝 {}", notes_summary(&outcome, &release.notes_file.display().to_string()));
  match &outcome.published {
    Some(published) => {
      println!("✅ Published {} on {}", outcome.tag_name, repo.slug());
      if !published.html_url.is_empty() {
        println!("   {}", published.html_url);
      }
    }
    None => {
      println!("✅ Release notes for {} are ready", outcome.tag_name);
      println!();
      println!("Next steps:");
      if outcome.commit.is_none() {
        println!("  Review {}", release.notes_file.display());
      }
      println!("  release-notes release --push  # Commit, push and publish");
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::release::ReleaseNotes;

  fn outcome(origin: NotesOrigin) -> ReleaseOutcome {
    ReleaseOutcome {
      tag_name: "v1.1.0".to_string(),
      notes: ReleaseNotes {
        body: "# Ver. 1.1.0 - 2024-Jun-01\n\n* one\n\n## Fix\n* two\n".to_string(),
        origin,
      },
      previous: None,
      commit: None,
      published: None,
    }
  }

  #[test]
  fn test_summary_reports_generated_notes() {
    assert_eq!(
      notes_summary(&outcome(NotesOrigin::Generated), "release-notes.md"),
      "Notes generated into release-notes.md (2 entries)"
    );
  }

  #[test]
  fn test_summary_reports_reused_notes() {
    assert_eq!(
      notes_summary(&outcome(NotesOrigin::Existing), "release-notes.md"),
      "Notes reused from release-notes.md (2 entries)"
    );
  }
}
