//! Decide whether a message contributes a release note

use super::issues::link_issue_references;
use super::{Note, Source, capitalize_first};
use crate::github::RepoAccessor;

/// Explicit release-note marker
pub const MARKER: &str = "#release-note";

/// Result of stripping a release-note marker from a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marked {
  /// Lowercase section, empty when the marker has no `=section`
  pub section: String,
  /// Message with every marker occurrence removed, trimmed
  pub body: String,
}

/// Parse an explicit `#release-note[=section]` marker
///
/// Returns `None` when the message has no marker. The section token runs
/// from after `=` to the next whitespace; the marker text (including the
/// section) is removed everywhere it appears in the message.
pub fn parse_marker(message: &str) -> Option<Marked> {
  let index = message.find(MARKER)?;
  let rest = &message[index + MARKER.len()..];

  let (key, section) = match rest.strip_prefix('=') {
    Some(after) => {
      let token = after.split_whitespace().next().filter(|_| !after.starts_with(char::is_whitespace));
      match token {
        Some(token) => (format!("{}={}", MARKER, token), token.to_lowercase()),
        None => (format!("{}=", MARKER), String::new()),
      }
    }
    None => (MARKER.to_string(), String::new()),
  };

  Some(Marked {
    section,
    body: message.replace(&key, "").trim().to_string(),
  })
}

/// Append the note carried by `message`, if any
///
/// A marked message always takes the marker path, even when it also closes
/// issues. Unmarked messages become notes only when at least one closing
/// reference resolves to an issue link.
pub async fn add_note<R: RepoAccessor>(repo: &R, notes: &mut Vec<Note>, message: &str, source: &Source<'_>) {
  match parse_marker(message) {
    Some(Marked { section, body }) => {
      if body.is_empty() {
        tracing::debug!(id = source.id, "Release-note marker without text, skipping");
        return;
      }
      let body = format!("{} [{}]({})", capitalize_first(&body), source.id, source.link);
      notes.push(Note {
        timestamp: source.timestamp,
        section,
        body,
      });
    }
    None => {
      let (linked, resolved) = link_issue_references(repo, message).await;
      if resolved > 0 {
        notes.push(Note {
          timestamp: source.timestamp,
          section: String::new(),
          body: linked,
        });
      }
    }
  }
}
