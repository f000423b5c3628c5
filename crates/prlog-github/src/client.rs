//! GitHub REST client

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use prlog_core::config::GitHubConfig;
use prlog_core::{PullRequest, RepoId};

use crate::error::{GitHubError, Result};

const USER_AGENT: &str = "prlog";
const ACCEPT: &str = "application/vnd.github+json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Anything that can look up a merged pull request by number
#[async_trait]
pub trait PullRequestSource: Send + Sync {
    /// Fetch a single merged pull request
    async fn fetch_pull_request(&self, repo: &RepoId, id: u64) -> Result<PullRequest>;
}

#[derive(Debug, Deserialize)]
struct ApiLabel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiPullRequest {
    title: String,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    labels: Vec<ApiLabel>,
    merged_at: Option<DateTime<Utc>>,
}

/// Client for the GitHub pulls endpoint
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubClient {
    /// Create a client against `api_url`
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Create a client from configuration, reading the token from its env var
    pub fn from_config(config: &GitHubConfig) -> Result<Self> {
        let token = std::env::var(&config.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty());
        if token.is_none() {
            warn!(
                env = %config.token_env,
                "no GitHub token set, requests are unauthenticated"
            );
        }
        Self::new(&config.api_url, token)
    }

    fn pull_request_url(&self, repo: &RepoId, id: u64) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{}",
            self.api_url,
            repo.owner(),
            repo.name(),
            id
        )
    }
}

fn rate_limit_exhausted(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        == Some(0)
}

#[async_trait]
impl PullRequestSource for GitHubClient {
    #[instrument(skip(self, repo), fields(repo = %repo))]
    async fn fetch_pull_request(&self, repo: &RepoId, id: u64) -> Result<PullRequest> {
        let url = self.pull_request_url(repo, id);
        debug!(%url, "fetching pull request");

        let mut request = self.client.get(&url).header("Accept", ACCEPT);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(GitHubError::NotFound {
                repo: repo.path(),
                id,
            });
        }
        if status == StatusCode::TOO_MANY_REQUESTS
            || ((status == StatusCode::FORBIDDEN || status == StatusCode::UNAUTHORIZED)
                && rate_limit_exhausted(&response))
        {
            return Err(GitHubError::RateLimited);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GitHubError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await?;
        let api: ApiPullRequest = serde_json::from_str(&text)?;

        let merged_at = api.merged_at.ok_or_else(|| GitHubError::NotMerged {
            repo: repo.path(),
            id,
        })?;

        let mut pull_request = PullRequest::new(id, api.title, merged_at)
            .with_labels(api.labels.into_iter().map(|l| l.name));
        if let Some(body) = api.body {
            pull_request = pull_request.with_body(body);
        }
        Ok(pull_request)
    }
}

/// Fetch many pull requests with at most `concurrency` requests in flight.
///
/// Results are returned in the order of `ids`. The first failure aborts the
/// remaining requests.
#[instrument(skip(source, repo, ids), fields(repo = %repo, count = ids.len()))]
pub async fn fetch_pull_requests<S>(
    source: Arc<S>,
    repo: &RepoId,
    ids: &[u64],
    concurrency: usize,
) -> Result<Vec<PullRequest>>
where
    S: PullRequestSource + ?Sized + 'static,
{
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut join_set = JoinSet::new();

    for (index, &id) in ids.iter().enumerate() {
        let source = Arc::clone(&source);
        let semaphore = Arc::clone(&semaphore);
        let repo = repo.clone();
        join_set.spawn(async move {
            let _permit = semaphore.acquire_owned().await;
            (index, source.fetch_pull_request(&repo, id).await)
        });
    }

    let mut slots: Vec<Option<PullRequest>> = vec![None; ids.len()];
    while let Some(joined) = join_set.join_next().await {
        let (index, result) = joined?;
        slots[index] = Some(result?);
    }

    let pull_requests: Vec<PullRequest> = slots.into_iter().flatten().collect();
    info!(fetched = pull_requests.len(), "fetched pull requests");
    Ok(pull_requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn repo() -> RepoId {
        RepoId::new("octocat", "hello-world")
    }

    fn merged_body(title: &str) -> serde_json::Value {
        serde_json::json!({
            "number": 1,
            "title": title,
            "body": "Some description",
            "labels": [{ "name": "bug" }, { "name": "feature" }],
            "merged_at": "2024-03-01T12:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_fetch_pull_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello-world/pulls/1"))
            .and(header("Accept", ACCEPT))
            .and(header("User-Agent", USER_AGENT))
            .and(header("Authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(merged_body("Fix crash")))
            .mount(&server)
            .await;

        let client = GitHubClient::new(server.uri(), Some("secret".to_string())).unwrap();
        let pr = client.fetch_pull_request(&repo(), 1).await.unwrap();

        assert_eq!(pr.id, 1);
        assert_eq!(pr.title, "Fix crash");
        assert_eq!(pr.body.as_deref(), Some("Some description"));
        assert_eq!(pr.labels, vec!["bug", "feature"]);
        assert_eq!(pr.merged_at.to_rfc3339(), "2024-03-01T12:00:00+00:00");
    }

    #[tokio::test]
    async fn test_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello-world/pulls/9"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = GitHubClient::new(server.uri(), None).unwrap();
        let err = client.fetch_pull_request(&repo(), 9).await.unwrap_err();
        assert!(matches!(err, GitHubError::NotFound { id: 9, .. }));
    }

    #[tokio::test]
    async fn test_rate_limited_429() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = GitHubClient::new(server.uri(), None).unwrap();
        let err = client.fetch_pull_request(&repo(), 1).await.unwrap_err();
        assert!(matches!(err, GitHubError::RateLimited));
    }

    #[tokio::test]
    async fn test_rate_limited_forbidden() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).insert_header("X-RateLimit-Remaining", "0"))
            .mount(&server)
            .await;

        let client = GitHubClient::new(server.uri(), None).unwrap();
        let err = client.fetch_pull_request(&repo(), 1).await.unwrap_err();
        assert!(matches!(err, GitHubError::RateLimited));
    }

    #[tokio::test]
    async fn test_forbidden_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Resource not accessible"))
            .mount(&server)
            .await;

        let client = GitHubClient::new(server.uri(), None).unwrap();
        let err = client.fetch_pull_request(&repo(), 1).await.unwrap_err();
        match err {
            GitHubError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "Resource not accessible");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unmerged_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "title": "Open PR",
                "body": null,
                "labels": [],
                "merged_at": null
            })))
            .mount(&server)
            .await;

        let client = GitHubClient::new(server.uri(), None).unwrap();
        let err = client.fetch_pull_request(&repo(), 3).await.unwrap_err();
        assert!(matches!(err, GitHubError::NotMerged { id: 3, .. }));
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = GitHubClient::new(server.uri(), None).unwrap();
        let err = client.fetch_pull_request(&repo(), 1).await.unwrap_err();
        assert!(matches!(err, GitHubError::Json(_)));
    }

    struct SlowSource {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl PullRequestSource for SlowSource {
        async fn fetch_pull_request(&self, _repo: &RepoId, id: u64) -> Result<PullRequest> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            // later ids finish first
            tokio::time::sleep(Duration::from_millis(50 / id)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(PullRequest::new(id, format!("PR {id}"), Utc::now()))
        }
    }

    #[tokio::test]
    async fn test_fetch_many_in_input_order() {
        let source = Arc::new(SlowSource {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });

        let prs = fetch_pull_requests(Arc::clone(&source), &repo(), &[1, 2, 3, 4, 5], 2)
            .await
            .unwrap();

        let ids: Vec<u64> = prs.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert!(source.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_fetch_many_propagates_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello-world/pulls/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(merged_body("One")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello-world/pulls/2"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = Arc::new(GitHubClient::new(server.uri(), None).unwrap());
        let err = fetch_pull_requests(client, &repo(), &[1, 2], 4)
            .await
            .unwrap_err();
        assert!(matches!(err, GitHubError::NotFound { id: 2, .. }));
    }
}
