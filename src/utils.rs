//! Remote URL and path helpers

use std::path::Path;

/// Whether a remote points at the local filesystem rather than a host
///
/// Relative (`./`, `../`), Unix absolute, Windows drive and UNC paths are
/// local. Anything with a scheme (`https://`) or a user (`git@`) is not.
pub fn is_local_path(remote: &str) -> bool {
  if remote.contains("://") || remote.contains('@') {
    return false;
  }

  let bytes = remote.as_bytes();
  let windows_drive = bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && matches!(bytes[2], b'\\' | b'/');

  remote.starts_with("./")
    || remote.starts_with("../")
    || remote.starts_with('/')
    || remote.starts_with("\\\\")
    || windows_drive
    || Path::new(remote).is_absolute()
}

/// Render a path the way git expects it on the command line
pub fn path_to_git_format(path: &Path) -> String {
  #[cfg(target_os = "windows")]
  {
    path.to_string_lossy().replace('\\', "/")
  }
  #[cfg(not(target_os = "windows"))]
  {
    path.to_string_lossy().to_string()
  }
}

/// Extract `(owner, name)` from a GitHub remote URL
///
/// Supports:
/// - `https://github.com/owner/repo(.git)`
/// - `git@github.com:owner/repo.git`
/// - `ssh://git@github.com/owner/repo.git`
///
/// Local paths never resolve to a repository slug.
pub fn parse_github_remote(url: &str) -> Option<(String, String)> {
  let url = url.trim();
  if url.is_empty() || is_local_path(url) {
    return None;
  }

  // scp-like SSH syntax: git@host:owner/repo.git
  let path = if let Some(rest) = url.strip_prefix("git@") {
    rest.split_once(':').map(|(_, path)| path)?
  } else if let Some((_, after_scheme)) = url.split_once("://") {
    after_scheme.split_once('/').map(|(_, path)| path)?
  } else {
    return None;
  };

  let mut parts = path.trim_matches('/').split('/');
  let owner = parts.next()?;
  let repo = parts.next()?.trim_end_matches(".git");
  if owner.is_empty() || repo.is_empty() {
    return None;
  }

  Some((owner.to_string(), repo.to_string()))
}
