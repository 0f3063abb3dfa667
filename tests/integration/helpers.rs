//! Test helpers for integration tests

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Repository slug every test workspace points at
pub const REPO: &str = "acme/widgets";

/// A git repository with a release.toml aimed at a mock GitHub
pub struct TestWorkspace {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestWorkspace {
  /// Create a repository with one commit on `main`
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;

    std::fs::write(path.join("README.md"), "# widgets\n")?;
    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial commit"])?;

    Ok(Self { _root: root, path })
  }

  /// Write release.toml with the given `[release]` body
  pub fn write_config(&self, api_url: &str, release: &str) -> Result<()> {
    std::fs::write(
      self.path.join("release.toml"),
      format!(
        "[github]\nrepo = \"{}\"\napi_url = \"{}\"\n\n[release]\n{}",
        REPO, api_url, release
      ),
    )?;
    Ok(())
  }

  /// Add a bare repository as `origin` and push `main` to it
  pub fn add_bare_remote(&self) -> Result<TempDir> {
    let remote = TempDir::new()?;
    git(remote.path(), &["init", "--bare", "--initial-branch=main"])?;
    let remote_path = remote.path().to_string_lossy().to_string();
    git(&self.path, &["remote", "add", "origin", &remote_path])?;
    git(&self.path, &["push", "origin", "main"])?;
    Ok(remote)
  }

  /// Commit current changes
  pub fn commit(&self, message: &str) -> Result<String> {
    git(&self.path, &["add", "."])?;
    git(&self.path, &["commit", "-m", message])?;

    let output = git(&self.path, &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Get git log
  pub fn git_log(&self, n: usize) -> Result<Vec<String>> {
    let output = git(&self.path, &["log", &format!("-{}", n), "--format=%s"])?;
    Ok(
      String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(String::from)
        .collect(),
    )
  }

  /// Check if a file exists
  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }

  /// Read a file
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run the release-notes binary without checking its exit status
///
/// Runs on the blocking pool so the mock server keeps serving meanwhile.
pub async fn run_release_notes(cwd: &Path, args: &[&str]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_release-notes");
  let cwd = cwd.to_path_buf();
  let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();

  tokio::task::spawn_blocking(move || {
    Command::new(bin)
      .current_dir(&cwd)
      .args(&args)
      .env_remove("GITHUB_TOKEN")
      .env_remove("RUST_LOG")
      .output()
      .context("Failed to run release-notes")
  })
  .await?
}

/// Stdout of a finished command
pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).to_string()
}

/// Stderr of a finished command
pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).to_string()
}

/// `/repos/acme/widgets{suffix}`
pub fn api_path(suffix: &str) -> String {
  format!("/repos/{}{}", REPO, suffix)
}

/// Commit list entry as GitHub returns it
pub fn commit_json(sha: &str, message: &str, date: &str) -> Value {
  json!({
    "sha": sha,
    "html_url": format!("https://github.com/{}/commit/{}", REPO, sha),
    "commit": {
      "message": message,
      "committer": { "name": "Test User", "date": date },
      "comment_count": 0
    }
  })
}

/// Closed pull request as GitHub returns it
pub fn pull_json(number: u64, body: &str, closed: &str) -> Value {
  json!({
    "number": number,
    "body": body,
    "html_url": format!("https://github.com/{}/pull/{}", REPO, number),
    "state": "closed",
    "closed_at": closed,
    "updated_at": closed
  })
}

/// Mock a GitHub repository with one previous release `v1.0.0`
///
/// Tag lookups 404 unless a test mounts a more specific mock first.
pub async fn mock_github(commits: Value, pulls: Value) -> MockServer {
  let server = MockServer::start().await;

  Mock::given(method("GET"))
    .and(path(api_path("/releases/latest")))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "tag_name": "v1.0.0",
      "created_at": "2024-01-01T00:00:00Z",
      "html_url": format!("https://github.com/{}/releases/tag/v1.0.0", REPO)
    })))
    .mount(&server)
    .await;

  Mock::given(method("GET"))
    .and(path(api_path("/commits")))
    .respond_with(ResponseTemplate::new(200).set_body_json(commits))
    .mount(&server)
    .await;

  Mock::given(method("GET"))
    .and(path(api_path("/pulls")))
    .respond_with(ResponseTemplate::new(200).set_body_json(pulls))
    .mount(&server)
    .await;

  server
}

/// Mock the comment list of a pull request as empty
pub async fn mock_no_comments(server: &MockServer, number: u64) {
  Mock::given(method("GET"))
    .and(path(api_path(&format!("/issues/{}/comments", number))))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
    .mount(server)
    .await;
}

/// Mock an issue lookup
pub async fn mock_issue(server: &MockServer, number: u64) {
  Mock::given(method("GET"))
    .and(path(api_path(&format!("/issues/{}", number))))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "number": number,
      "html_url": format!("https://github.com/{}/issues/{}", REPO, number)
    })))
    .mount(server)
    .await;
}
