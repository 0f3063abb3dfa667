//! Issue-closing references (`fixes #12`) and their inline links

use crate::github::RepoAccessor;
use std::collections::HashSet;

/// Verbs that close an issue when followed by `#<number>`
pub const CLOSE_KEYWORDS: &[&str] = &[
  "close", "closes", "closed", "fix", "fixes", "fixed", "resolve", "resolves", "resolved",
];

/// A `#<number>` token that follows a close keyword
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueReference {
  /// Token exactly as written, e.g. `#12`
  pub token: String,
  pub number: u64,
}

fn is_close_keyword(word: &str) -> bool {
  let word = word.to_lowercase();
  CLOSE_KEYWORDS.contains(&word.as_str())
}

/// Find closing references in order of first appearance, one per token
///
/// Words are whitespace-delimited; the token must directly follow the
/// keyword and be `#` plus a number with nothing trailing (`#7.` is not a
/// reference).
pub fn find_references(message: &str) -> Vec<IssueReference> {
  let words: Vec<&str> = message.split_whitespace().collect();
  let mut seen = HashSet::new();
  let mut references = Vec::new();

  for pair in words.windows(2) {
    let (keyword, token) = (pair[0], pair[1]);
    if !is_close_keyword(keyword) {
      continue;
    }
    let Some(number) = token.strip_prefix('#').and_then(|n| n.parse::<u64>().ok()) else {
      continue;
    };
    if seen.insert(token) {
      references.push(IssueReference {
        token: token.to_string(),
        number,
      });
    }
  }

  references
}

/// Replace whole-token occurrences of `token` with `replacement`
///
/// An occurrence followed by another digit is part of a longer reference
/// (`#7` inside `#70`) and is left alone.
pub fn replace_token(message: &str, token: &str, replacement: &str) -> String {
  let mut out = String::with_capacity(message.len());
  let mut last = 0;

  for (start, _) in message.match_indices(token) {
    if start < last {
      continue;
    }
    let end = start + token.len();
    let continues = message[end..].chars().next().is_some_and(|c| c.is_ascii_digit());
    if continues {
      continue;
    }
    out.push_str(&message[last..start]);
    out.push_str(replacement);
    last = end;
  }

  out.push_str(&message[last..]);
  out
}

/// Rewrite closing references as Markdown links to their issues
///
/// Each distinct token is looked up once. Lookup failures (missing issue,
/// network error) are logged and skipped; they never abort the scan.
/// Returns the rewritten message and how many references resolved.
pub async fn link_issue_references<R: RepoAccessor>(repo: &R, message: &str) -> (String, usize) {
  let mut substitutes: Vec<(String, String)> = Vec::new();

  for reference in find_references(message) {
    match repo.issue(reference.number).await {
      Ok(issue) => {
        tracing::trace!(issue = issue.number, url = %issue.html_url, "Resolved issue reference");
        let link = format!("[{}]({})", reference.token, issue.html_url);
        substitutes.push((reference.token, link));
      }
      Err(err) => {
        tracing::debug!(issue = reference.number, error = %err, "Skipping unresolved issue reference");
      }
    }
  }

  let resolved = substitutes.len();
  let linked = substitutes
    .iter()
    .fold(message.to_string(), |text, (token, link)| replace_token(&text, token, link));

  (linked, resolved)
}
