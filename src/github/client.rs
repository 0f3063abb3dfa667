//! GitHub REST v3 implementation of `RepoAccessor`

use super::{
  Comment, CommitEntry, Issue, NewRelease, PullQuery, PullRequest, Release, RepoAccessor, UpdatedSince,
};
use crate::core::error::{GithubError, ReleaseError, ReleaseResult};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Items requested per page (GitHub maximum)
const PER_PAGE: usize = 100;

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("release-notes/", env!("CARGO_PKG_VERSION"));

/// GitHub API error body
#[derive(Debug, Deserialize)]
struct ApiError {
  message: String,
}

/// One repository on a GitHub (or GitHub Enterprise) server
pub struct GithubRepo {
  client: Client,
  api_url: String,
  owner: String,
  name: String,
  token: Option<String>,
}

impl GithubRepo {
  /// Create an accessor for `owner/name` on `api_url`
  pub fn new(api_url: &str, owner: &str, name: &str) -> ReleaseResult<Self> {
    let client = Client::builder().user_agent(USER_AGENT).timeout(REQUEST_TIMEOUT).build()?;

    Ok(Self {
      client,
      api_url: api_url.trim_end_matches('/').to_string(),
      owner: owner.to_string(),
      name: name.to_string(),
      token: None,
    })
  }

  /// Authenticate requests with a bearer token
  pub fn with_token(mut self, token: Option<String>) -> Self {
    self.token = token.filter(|t| !t.trim().is_empty());
    self
  }

  /// `owner/name`
  pub fn slug(&self) -> String {
    format!("{}/{}", self.owner, self.name)
  }

  fn url(&self, path: &str) -> String {
    format!("{}/repos/{}/{}{}", self.api_url, self.owner, self.name, path)
  }

  fn request(&self, method: Method, url: &str) -> RequestBuilder {
    let mut request = self
      .client
      .request(method, url)
      .header("Accept", "application/vnd.github+json")
      .header("X-GitHub-Api-Version", "2022-11-28");

    if let Some(token) = &self.token {
      request = request.bearer_auth(token);
    }

    request
  }

  /// Map non-success responses onto `GithubError`
  async fn check(response: Response, url: &str) -> ReleaseResult<Response> {
    let status = response.status();
    if status.is_success() {
      return Ok(response);
    }

    let exhausted = response
      .headers()
      .get("X-RateLimit-Remaining")
      .and_then(|v| v.to_str().ok())
      .is_some_and(|v| v == "0");

    if status == StatusCode::TOO_MANY_REQUESTS || (status == StatusCode::FORBIDDEN && exhausted) {
      return Err(ReleaseError::Github(GithubError::RateLimited));
    }

    if status == StatusCode::NOT_FOUND {
      return Err(ReleaseError::Github(GithubError::NotFound { url: url.to_string() }));
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiError>(&text)
      .map(|e| e.message)
      .unwrap_or(text);

    Err(ReleaseError::Github(GithubError::Status {
      url: url.to_string(),
      status: status.as_u16(),
      message,
    }))
  }

  async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> ReleaseResult<T> {
    tracing::debug!(url, "GET");
    let response = self.request(Method::GET, url).query(query).send().await?;
    let response = Self::check(response, url).await?;
    Ok(response.json::<T>().await?)
  }

  /// Walk every page of a list endpoint
  ///
  /// `page_filter` sees each page as it arrives and returns the items to
  /// keep plus whether to continue paging.
  async fn get_paged<T, F>(&self, path: &str, query: &[(&str, String)], mut page_filter: F) -> ReleaseResult<Vec<T>>
  where
    T: DeserializeOwned,
    F: FnMut(Vec<T>) -> (Vec<T>, bool),
  {
    let url = self.url(path);
    let mut items = Vec::new();
    let mut page = 1usize;

    loop {
      let mut params: Vec<(&str, String)> = query.to_vec();
      params.push(("per_page", PER_PAGE.to_string()));
      params.push(("page", page.to_string()));

      let batch: Vec<T> = self.get_json(&url, &params).await?;
      let full_page = batch.len() >= PER_PAGE;
      let (kept, more) = page_filter(batch);
      items.extend(kept);

      if !full_page || !more {
        break;
      }
      page += 1;
    }

    Ok(items)
  }
}

impl RepoAccessor for GithubRepo {
  async fn commits(&self, since: Option<DateTime<Utc>>) -> ReleaseResult<Vec<CommitEntry>> {
    let mut query = Vec::new();
    if let Some(since) = since {
      query.push(("since", since.to_rfc3339_opts(SecondsFormat::Secs, true)));
    }
    self.get_paged("/commits", &query, |page| (page, true)).await
  }

  async fn commit_comments(&self, sha: &str) -> ReleaseResult<Vec<Comment>> {
    self
      .get_paged(&format!("/commits/{}/comments", sha), &[], |page| (page, true))
      .await
  }

  async fn pulls(&self, query: &PullQuery, filter: &UpdatedSince) -> ReleaseResult<Vec<PullRequest>> {
    let params: Vec<(&str, String)> = query.as_query().iter().map(|(k, v)| (*k, v.to_string())).collect();

    // Sorted by update time descending: once a page loses items to the
    // filter, every later page would be filtered out entirely.
    self
      .get_paged("/pulls", &params, |page| {
        let fetched = page.len();
        let kept = filter.apply(page);
        let more = kept.len() == fetched;
        (kept, more)
      })
      .await
  }

  async fn issue(&self, number: u64) -> ReleaseResult<Issue> {
    self.get_json(&self.url(&format!("/issues/{}", number)), &[]).await
  }

  async fn issue_comments(&self, number: u64) -> ReleaseResult<Vec<Comment>> {
    self
      .get_paged(&format!("/issues/{}/comments", number), &[], |page| (page, true))
      .await
  }

  async fn latest_release(&self) -> ReleaseResult<Option<Release>> {
    match self.get_json(&self.url("/releases/latest"), &[]).await {
      Ok(release) => Ok(Some(release)),
      Err(ReleaseError::Github(GithubError::NotFound { .. })) => Ok(None),
      Err(e) => Err(e),
    }
  }

  async fn tag_exists(&self, tag: &str) -> ReleaseResult<bool> {
    let url = self.url(&format!("/git/ref/tags/{}", tag));
    let response = self.request(Method::GET, &url).send().await?;
    if response.status() == StatusCode::NOT_FOUND {
      return Ok(false);
    }
    Self::check(response, &url).await?;
    Ok(true)
  }

  async fn create_release(&self, release: &NewRelease) -> ReleaseResult<Release> {
    let url = self.url("/releases");
    tracing::info!(tag = %release.tag_name, repo = %self.slug(), "Creating release");
    let response = self.request(Method::POST, &url).json(release).send().await?;
    let response = Self::check(response, &url).await?;
    Ok(response.json::<Release>().await?)
  }
}
