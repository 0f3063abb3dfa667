//! Group notes into sections and render the Markdown document

use super::{Note, capitalize_first};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Notes grouped by section key, in deterministic order
///
/// Sections iterate alphabetically (the unsectioned `""` group first);
/// entries within a section are newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
  groups: BTreeMap<String, Vec<String>>,
}

impl Sections {
  /// Group notes, newest first
  ///
  /// Notes are stable-sorted oldest first and then walked in reverse, so
  /// notes sharing a timestamp come out in reverse discovery order.
  pub fn group(mut notes: Vec<Note>) -> Self {
    notes.sort_by_key(|note| note.timestamp);

    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for note in notes.into_iter().rev() {
      groups.entry(note.section).or_default().push(note.body);
    }

    Self { groups }
  }

  /// Iterate `(section, entries)` in render order
  pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
    self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
  }
}

/// Title line date, e.g. `2024-Jan-05`
pub fn format_release_date(date: NaiveDate) -> String {
  date.format("%Y-%b-%d").to_string()
}

/// Render notes as the release document
///
/// ```text
/// # Ver. 1.2.0 - 2024-Jan-05
///
/// * unsectioned entry
///
/// ## Bugfix
/// * entry
/// ```
pub fn render_notes(notes: Vec<Note>, version: &str, today: NaiveDate) -> String {
  let sections = Sections::group(notes);

  let mut lines = vec![format!("# Ver. {} - {}", version, format_release_date(today)), String::new()];
  for (title, entries) in sections.iter() {
    if !title.is_empty() {
      lines.push(format!("## {}", capitalize_first(title)));
    }
    for entry in entries {
      if entry.starts_with("* ") {
        lines.push(entry.clone());
      } else {
        lines.push(format!("* {}", entry));
      }
    }
    lines.push(String::new());
  }

  lines.join("\n")
}
