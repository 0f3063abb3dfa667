//! Tests for the `notes` command

use crate::helpers::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_notes_printed_to_stdout() -> anyhow::Result<()> {
  let ws = TestWorkspace::new()?;
  let server = mock_github(
    json!([
      commit_json("a1b2c3d4e5f6", "#release-note=features Dark mode", "2024-02-01T10:00:00Z"),
      commit_json("0f0f0f0f0f0f", "fixes #3", "2024-02-02T10:00:00Z"),
      commit_json("999999999999", "Refactor internals", "2024-02-03T10:00:00Z"),
    ]),
    json!([pull_json(12, "#release-note Faster startup", "2024-02-04T10:00:00Z")]),
  )
  .await;
  mock_issue(&server, 3).await;
  mock_no_comments(&server, 12).await;
  ws.write_config(&server.uri(), "version = \"1.1.0\"\ntag_prefix = \"v\"\n")?;

  let output = run_release_notes(&ws.path, &["notes"]).await?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  let doc = stdout(&output);
  assert!(doc.starts_with("# Ver. 1.1.0 - "));
  assert!(doc.contains("* Faster startup [#12](https://github.com/acme/widgets/pull/12)\n"));
  assert!(doc.contains("* fixes [#3](https://github.com/acme/widgets/issues/3)\n"));
  assert!(doc.contains("## Features\n* Dark mode [a1b2c3d](https://github.com/acme/widgets/commit/a1b2c3d4e5f6)\n"));
  assert!(!doc.contains("Refactor internals"));

  // Unsectioned entries come first, newest first
  let startup = doc.find("Faster startup").unwrap();
  let fixes = doc.find("fixes [#3]").unwrap();
  let features = doc.find("## Features").unwrap();
  assert!(startup < fixes && fixes < features);

  // Previewing never writes the notes file
  assert!(!ws.file_exists("release-notes.md"));
  Ok(())
}

#[tokio::test]
async fn test_notes_since_overrides_latest_release() -> anyhow::Result<()> {
  let ws = TestWorkspace::new()?;
  let server = mock_github(json!([]), json!([])).await;

  Mock::given(method("GET"))
    .and(path(api_path("/commits")))
    .and(query_param("since", "2023-06-01T00:00:00Z"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!([commit_json(
      "abcdefabcdef",
      "#release-note Old but wanted",
      "2023-07-01T00:00:00Z"
    )])))
    .with_priority(1)
    .expect(1)
    .mount(&server)
    .await;
  ws.write_config(&server.uri(), "version = \"1.1.0\"\ntag_prefix = \"v\"\n")?;

  let output = run_release_notes(&ws.path, &["notes", "--since", "2023-06-01"]).await?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert!(stdout(&output).contains("* Old but wanted [abcdefa]"));
  Ok(())
}

#[tokio::test]
async fn test_notes_written_to_output_file() -> anyhow::Result<()> {
  let ws = TestWorkspace::new()?;
  let server = mock_github(
    json!([commit_json("a1b2c3d4e5f6", "#release-note Shiny", "2024-02-01T10:00:00Z")]),
    json!([]),
  )
  .await;
  ws.write_config(&server.uri(), "version = \"1.1.0\"\ntag_prefix = \"v\"\n")?;

  let output = run_release_notes(&ws.path, &["notes", "--output", "preview.md"]).await?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  let preview = ws.read_file("preview.md")?;
  assert!(preview.contains("* Shiny [a1b2c3d]"));
  assert!(!ws.file_exists("release-notes.md"));
  Ok(())
}

#[tokio::test]
async fn test_missing_version_is_user_error() -> anyhow::Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_config("http://127.0.0.1:9", "tag_prefix = \"v\"\n")?;

  let output = run_release_notes(&ws.path, &["notes"]).await?;
  assert_eq!(output.status.code(), Some(1));
  let err = stderr(&output);
  assert!(err.contains("version"));
  assert!(err.contains("release-notes release <VERSION>"));
  Ok(())
}

#[tokio::test]
async fn test_version_argument_overrides_config() -> anyhow::Result<()> {
  let ws = TestWorkspace::new()?;
  let server = mock_github(json!([]), json!([])).await;
  ws.write_config(&server.uri(), "version = \"1.1.0\"\ntag_prefix = \"v\"\n")?;

  let output = run_release_notes(&ws.path, &["notes", "2.0.0"]).await?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert!(stdout(&output).starts_with("# Ver. 2.0.0 - "));
  Ok(())
}
