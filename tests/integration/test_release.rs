//! Tests for the `release` command

use crate::helpers::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

const CONFIG: &str = "version = \"1.1.0\"\ntag_prefix = \"v\"\n";

async fn simple_history() -> wiremock::MockServer {
  mock_github(
    json!([commit_json("a1b2c3d4e5f6", "#release-note=fix Crash on empty input", "2024-02-01T10:00:00Z")]),
    json!([]),
  )
  .await
}

#[tokio::test]
async fn test_release_writes_notes_without_committing() -> anyhow::Result<()> {
  let ws = TestWorkspace::new()?;
  let server = simple_history().await;
  ws.write_config(&server.uri(), CONFIG)?;

  let output = run_release_notes(&ws.path, &["release"]).await?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  let notes = ws.read_file("release-notes.md")?;
  assert!(notes.starts_with("# Ver. 1.1.0 - "));
  assert!(notes.contains("## Fix\n* Crash on empty input [a1b2c3d]"));
  assert_eq!(ws.git_log(5)?, vec!["Initial commit"]);
  Ok(())
}

#[tokio::test]
async fn test_existing_tag_fails_validation() -> anyhow::Result<()> {
  let ws = TestWorkspace::new()?;
  let server = simple_history().await;
  Mock::given(method("GET"))
    .and(path(api_path("/git/ref/tags/v1.1.0")))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ref": "refs/tags/v1.1.0" })))
    .mount(&server)
    .await;
  ws.write_config(&server.uri(), CONFIG)?;

  let output = run_release_notes(&ws.path, &["release", "--push"]).await?;
  assert_eq!(output.status.code(), Some(3));
  assert!(stderr(&output).contains("v1.1.0"));
  assert!(!ws.file_exists("release-notes.md"));
  Ok(())
}

#[tokio::test]
async fn test_version_not_newer_fails_validation() -> anyhow::Result<()> {
  let ws = TestWorkspace::new()?;
  let server = simple_history().await;
  ws.write_config(&server.uri(), "version = \"0.9\"\ntag_prefix = \"v\"\n")?;

  let output = run_release_notes(&ws.path, &["release"]).await?;
  assert_eq!(output.status.code(), Some(3));
  assert!(!ws.file_exists("release-notes.md"));
  Ok(())
}

#[tokio::test]
async fn test_existing_notes_committed_verbatim() -> anyhow::Result<()> {
  let ws = TestWorkspace::new()?;
  let server = simple_history().await;
  ws.write_config(&server.uri(), &format!("{}changelog = \"CHANGELOG.md\"\n", CONFIG))?;
  ws.commit("Add release config")?;
  std::fs::write(ws.path.join("release-notes.md"), "Hand-written notes\n")?;

  let output = run_release_notes(&ws.path, &["release", "--commit"]).await?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  assert!(stdout(&output).contains("Notes reused from release-notes.md"));
  assert_eq!(ws.read_file("release-notes.md")?, "Hand-written notes\n");
  assert!(ws.read_file("CHANGELOG.md")?.contains("Hand-written notes"));
  assert_eq!(ws.git_log(1)?, vec!["Release 1.1.0"]);

  let tracked = git(&ws.path, &["show", "--name-only", "--format=", "HEAD"])?;
  let tracked = String::from_utf8_lossy(&tracked.stdout).to_string();
  assert!(tracked.contains("release-notes.md"));
  assert!(tracked.contains("CHANGELOG.md"));
  Ok(())
}

#[tokio::test]
async fn test_push_publishes_release() -> anyhow::Result<()> {
  let ws = TestWorkspace::new()?;
  let remote = ws.add_bare_remote()?;
  let server = simple_history().await;

  Mock::given(method("POST"))
    .and(path(api_path("/releases")))
    .and(body_partial_json(json!({
      "tag_name": "v1.1.0",
      "name": "v1.1.0",
      "draft": false,
      "prerelease": false
    })))
    .respond_with(ResponseTemplate::new(201).set_body_json(json!({
      "tag_name": "v1.1.0",
      "created_at": "2024-02-05T00:00:00Z",
      "html_url": "https://github.com/acme/widgets/releases/tag/v1.1.0"
    })))
    .expect(1)
    .mount(&server)
    .await;
  ws.write_config(&server.uri(), CONFIG)?;
  ws.commit("Add release config")?;

  let output = run_release_notes(&ws.path, &["release", "--push"]).await?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert!(stdout(&output).contains("https://github.com/acme/widgets/releases/tag/v1.1.0"));

  let pushed = git(remote.path(), &["log", "-1", "--format=%s", "main"])?;
  assert_eq!(String::from_utf8_lossy(&pushed.stdout).trim(), "Release 1.1.0");

  let requests = server.received_requests().await.unwrap_or_default();
  let post = requests
    .iter()
    .find(|r| r.method.as_str() == "POST")
    .expect("release was created");
  let body: serde_json::Value = serde_json::from_slice(&post.body)?;
  assert_eq!(body["body"].as_str().map(str::trim), Some(ws.read_file("release-notes.md")?.trim()));
  Ok(())
}
