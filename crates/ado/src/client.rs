//! Azure DevOps REST API client for repositories, PRs, threads and comments

use common::models::{Comment, PrStatus, PullRequest, Repository, StatusFilter, Thread, TimeWindow};
use common::time::{format_timestamp, parse_timestamp};
use common::Config;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, RETRY_AFTER, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::ClientError;
use crate::retry::{RetryPolicy, Sleeper, TokioSleeper};

/// REST API version sent with every request
pub const API_VERSION: &str = "7.1";

/// `$top` used when paging pull requests
pub const PULL_REQUEST_PAGE_SIZE: usize = 100;

/// Azure DevOps API client.
///
/// Owns one configured transport and the credential; build once per run and
/// pass by reference.
pub struct AdoClient {
    client: reqwest::Client,
    api_root: String,
    project: String,
    token: String,
    retry: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

/// `{"value": [...]}` envelope shared by list endpoints
#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct RawRepository {
    id: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIdentity {
    id: Option<String>,
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPullRequest {
    pull_request_id: Option<i64>,
    creation_date: Option<String>,
    created_by: Option<RawIdentity>,
    closed_date: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawThread {
    id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawComment {
    author: Option<RawIdentity>,
    published_date: Option<String>,
}

impl AdoClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .default_headers(Self::headers())
            .timeout(config.request_timeout)
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            client,
            api_root: format!(
                "{}/{}/{}/_apis",
                config.base_url, config.organization, config.project
            ),
            project: config.project.clone(),
            token: config.pat.clone(),
            retry: RetryPolicy::default(),
            sleeper: Arc::new(TokioSleeper),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Project the client is scoped to
    pub fn project(&self) -> &str {
        &self.project
    }

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("ado-pr-kpi/0.1"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_root, path.trim_start_matches('/'))
    }

    /// GET a JSON object, retrying throttled and failing responses
    async fn get_json(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Map<String, Value>, ClientError> {
        let url = self.url(path);
        let mut params = query.to_vec();
        params.push(("api-version", API_VERSION.to_string()));

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            debug!(url = %url, attempt, "GET");

            let resp = match self
                .client
                .get(&url)
                .basic_auth("", Some(&self.token))
                .query(&params)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(source) => {
                    if !self.retry.has_attempts_left(attempt) {
                        return Err(ClientError::Transport { url, source });
                    }
                    let wait = self.retry.transport_backoff(attempt);
                    warn!(
                        url = %url,
                        attempt,
                        error = %source,
                        "Request failed, retrying in {:?}",
                        wait
                    );
                    self.sleeper.sleep(wait).await;
                    continue;
                }
            };

            let status = resp.status();
            if self.retry.is_retryable(status) && self.retry.has_attempts_left(attempt) {
                let retry_after = resp.headers().get(RETRY_AFTER).and_then(|v| v.to_str().ok());
                let wait = self.retry.backoff(attempt, retry_after);
                warn!(
                    url = %url,
                    attempt,
                    status = status.as_u16(),
                    "Retryable response, retrying in {:?}",
                    wait
                );
                self.sleeper.sleep(wait).await;
                continue;
            }

            if status.is_client_error() || status.is_server_error() {
                let body = resp.text().await.unwrap_or_default();
                return Err(ClientError::Status {
                    url,
                    status: status.as_u16(),
                    body,
                });
            }

            // A body cut off mid-read is retried like a failed connection
            let bytes = match resp.bytes().await {
                Ok(bytes) => bytes,
                Err(source) => {
                    if !self.retry.has_attempts_left(attempt) {
                        return Err(ClientError::Transport { url, source });
                    }
                    let wait = self.retry.transport_backoff(attempt);
                    warn!(
                        url = %url,
                        attempt,
                        error = %source,
                        "Reading response body failed, retrying in {:?}",
                        wait
                    );
                    self.sleeper.sleep(wait).await;
                    continue;
                }
            };

            return match serde_json::from_slice::<Value>(&bytes) {
                Ok(Value::Object(map)) => Ok(map),
                Ok(_) => Err(ClientError::UnexpectedShape { url }),
                Err(source) => Err(ClientError::InvalidJson { url, source }),
            };
        }
    }

    /// GET a list endpoint and decode its `value` array
    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, ClientError> {
        let payload = self.get_json(path, query).await?;
        serde_json::from_value::<ListResponse<T>>(Value::Object(payload))
            .map(|list| list.value)
            .map_err(|source| ClientError::Decode {
                url: self.url(path),
                source,
            })
    }

    /// List repositories in the configured project
    pub async fn list_repositories(
        &self,
        include_hidden: bool,
    ) -> Result<Vec<Repository>, ClientError> {
        let raw: Vec<RawRepository> = self
            .get_list(
                "git/repositories",
                &[("includeHidden", include_hidden.to_string())],
            )
            .await?;

        let repos: Vec<Repository> = raw
            .into_iter()
            .filter_map(|r| match (r.id, r.name) {
                (Some(id), Some(name)) if !id.is_empty() && !name.is_empty() => {
                    Some(Repository { id, name })
                }
                _ => None,
            })
            .collect();

        debug!("Listed {} repositories in {}", repos.len(), self.project);
        Ok(repos)
    }

    /// Fetch all pull requests matching `status`, paging with `$top`/`$skip`.
    ///
    /// Time criteria are sent only when `window` is given.
    pub async fn list_pull_requests(
        &self,
        repo_id: &str,
        status: StatusFilter,
        window: Option<TimeWindow>,
    ) -> Result<Vec<PullRequest>, ClientError> {
        let path = format!("git/repositories/{}/pullrequests", repo_id);
        let mut all_prs = Vec::new();
        let mut skip = 0usize;

        loop {
            let mut query = vec![
                ("searchCriteria.status", status.as_query().to_string()),
                ("$top", PULL_REQUEST_PAGE_SIZE.to_string()),
                ("$skip", skip.to_string()),
            ];
            if let Some(window) = window {
                query.push(("searchCriteria.minTime", format_timestamp(window.min)));
                query.push(("searchCriteria.maxTime", format_timestamp(window.max)));
            }

            let page: Vec<RawPullRequest> = self.get_list(&path, &query).await?;
            let page_len = page.len();
            debug!("Fetched PR page (skip={}, items={}) for {}", skip, page_len, repo_id);

            for raw in page {
                all_prs.push(raw.into_pull_request(repo_id)?);
            }

            if page_len < PULL_REQUEST_PAGE_SIZE {
                break;
            }
            skip += PULL_REQUEST_PAGE_SIZE;
        }

        info!("Fetched {} PRs total for repository {}", all_prs.len(), repo_id);
        Ok(all_prs)
    }

    /// List discussion threads on a pull request
    pub async fn list_threads(
        &self,
        repo_id: &str,
        pr_id: i64,
    ) -> Result<Vec<Thread>, ClientError> {
        let path = format!("git/repositories/{}/pullRequests/{}/threads", repo_id, pr_id);
        let raw: Vec<RawThread> = self.get_list(&path, &[]).await?;
        Ok(raw.into_iter().filter_map(|t| t.id.map(|id| Thread { id })).collect())
    }

    /// List comments in one pull request thread
    pub async fn list_thread_comments(
        &self,
        repo_id: &str,
        pr_id: i64,
        thread_id: i64,
    ) -> Result<Vec<Comment>, ClientError> {
        let path = format!(
            "git/repositories/{}/pullRequests/{}/threads/{}/comments",
            repo_id, pr_id, thread_id
        );
        let raw: Vec<RawComment> = self.get_list(&path, &[]).await?;
        Ok(raw.into_iter().filter_map(RawComment::into_comment).collect())
    }
}

impl RawPullRequest {
    fn into_pull_request(self, repo_id: &str) -> Result<PullRequest, ClientError> {
        let malformed = |detail: String| ClientError::MalformedPullRequest {
            repo_id: repo_id.to_string(),
            detail,
        };

        let id = self
            .pull_request_id
            .ok_or_else(|| malformed("missing pullRequestId".to_string()))?;
        let creation_date = self
            .creation_date
            .as_deref()
            .and_then(parse_timestamp)
            .ok_or_else(|| {
                malformed(format!("pullRequestId={id}: missing or invalid creationDate"))
            })?;
        let created_by_id = self
            .created_by
            .and_then(|identity| identity.id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| malformed(format!("pullRequestId={id}: missing createdBy.id")))?;
        let status = self
            .status
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(PrStatus::parse)
            .ok_or_else(|| malformed(format!("pullRequestId={id}: missing status")))?;
        let closed_date = match self.closed_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                parse_timestamp(raw).ok_or_else(|| {
                    malformed(format!("pullRequestId={id}: invalid closedDate {raw:?}"))
                })?,
            ),
        };

        Ok(PullRequest {
            id,
            creation_date,
            created_by_id,
            closed_date,
            status,
        })
    }
}

impl RawComment {
    fn into_comment(self) -> Option<Comment> {
        let author = self.author?;
        let author_id = author.id.filter(|id| !id.is_empty())?;
        Some(Comment {
            author_id,
            author_display_name: author.display_name,
            published_date: self.published_date.as_deref().and_then(parse_timestamp),
        })
    }
}
