//! Prepend release notes to a running changelog

use crate::core::error::{ReleaseResult, ResultExt};
use std::path::Path;

/// Title written when the changelog does not exist yet
pub const CHANGELOG_HEADER: &str = "# Changelog\n\nAll notable changes to this project will be documented in this file.\n\n";

/// Heading every rendered release starts with
const ENTRY_HEADING: &str = "# Ver. ";

/// Insert `entry` above the newest release already in `existing`
///
/// Anything before the first release heading (the title and preamble) stays
/// on top. Without any previous release the entry goes after the preamble.
pub fn insert_entry(existing: &str, entry: &str) -> String {
  let entry = format!("{}\n\n", entry.trim_end());

  let first_release = existing
    .match_indices(ENTRY_HEADING)
    .map(|(idx, _)| idx)
    .find(|&idx| idx == 0 || existing[..idx].ends_with('\n'));

  match first_release {
    Some(idx) => format!("{}{}{}", &existing[..idx], entry, &existing[idx..]),
    None if existing.is_empty() => entry,
    None if existing.ends_with("\n\n") => format!("{}{}", existing, entry),
    None => format!("{}\n\n{}", existing.trim_end(), entry),
  }
}

/// Prepend `entry` to the changelog at `path`, creating it when missing
pub fn prepend(path: &Path, entry: &str) -> ReleaseResult<()> {
  let existing = if path.exists() {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read changelog {}", path.display()))?
  } else {
    CHANGELOG_HEADER.to_string()
  };

  std::fs::write(path, insert_entry(&existing, entry))
    .with_context(|| format!("Failed to write changelog {}", path.display()))?;
  Ok(())
}
