//! Release tag and version parsing
//!
//! Tags are `<prefix><version>`. Versions are compared as semver, but
//! accept the short forms people actually tag with (`v1.2`, `3`).

use semver::Version;

/// Parse a version leniently
///
/// - optional leading `v`
/// - missing minor/patch components default to zero (`1.2` → `1.2.0`)
/// - pre-release and build metadata are kept (`1.2.0-rc.1`)
pub fn parse_loose_version(raw: &str) -> Option<Version> {
  let raw = raw.trim();
  let raw = raw.strip_prefix('v').unwrap_or(raw);
  if raw.is_empty() {
    return None;
  }

  if let Ok(version) = Version::parse(raw) {
    return Some(version);
  }

  // Pad the numeric core, keep any suffix
  let split_at = raw.find(['-', '+']).unwrap_or(raw.len());
  let (core, suffix) = raw.split_at(split_at);
  let parts: Vec<&str> = core.split('.').collect();
  if parts.is_empty() || parts.len() > 3 || parts.iter().any(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit())) {
    return None;
  }

  let mut padded = parts.join(".");
  for _ in parts.len()..3 {
    padded.push_str(".0");
  }
  padded.push_str(suffix);

  Version::parse(&padded).ok()
}

/// Extract the version from a tag name carrying `prefix`
///
/// A tag without the prefix is still parsed as a bare version, which covers
/// repositories that changed their prefix between releases.
pub fn version_from_tag(tag_name: &str, prefix: &str) -> Option<Version> {
  let stripped = tag_name.strip_prefix(prefix).unwrap_or(tag_name);
  parse_loose_version(stripped)
}
