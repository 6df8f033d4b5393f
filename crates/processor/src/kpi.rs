//! Per-PR KPI extraction: review dwell time and completion time

use ado::{AdoClient, ClientError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::models::{
    Comment, KpiSample, MetricKind, PrStatus, PullRequest, StatusFilter, Thread, TimeWindow,
};
use common::time::seconds_between;
use tracing::{debug, info};

/// Display-name fragments that mark an automated commenter
const BOT_MARKERS: [&str; 4] = ["bot", "build", "service", "pipeline"];

/// Where PR review data comes from
#[async_trait]
pub trait ReviewSource: Send + Sync {
    async fn list_pull_requests(
        &self,
        repo_id: &str,
        status: StatusFilter,
        window: Option<TimeWindow>,
    ) -> Result<Vec<PullRequest>, ClientError>;

    async fn list_threads(&self, repo_id: &str, pr_id: i64) -> Result<Vec<Thread>, ClientError>;

    async fn list_thread_comments(
        &self,
        repo_id: &str,
        pr_id: i64,
        thread_id: i64,
    ) -> Result<Vec<Comment>, ClientError>;
}

#[async_trait]
impl ReviewSource for AdoClient {
    async fn list_pull_requests(
        &self,
        repo_id: &str,
        status: StatusFilter,
        window: Option<TimeWindow>,
    ) -> Result<Vec<PullRequest>, ClientError> {
        AdoClient::list_pull_requests(self, repo_id, status, window).await
    }

    async fn list_threads(&self, repo_id: &str, pr_id: i64) -> Result<Vec<Thread>, ClientError> {
        AdoClient::list_threads(self, repo_id, pr_id).await
    }

    async fn list_thread_comments(
        &self,
        repo_id: &str,
        pr_id: i64,
        thread_id: i64,
    ) -> Result<Vec<Comment>, ClientError> {
        AdoClient::list_thread_comments(self, repo_id, pr_id, thread_id).await
    }
}

/// Knobs that change which comments count as a review response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KpiOptions {
    /// Skip comments from authors that look like bots or service accounts
    pub ignore_bots: bool,
}

/// Best-effort bot detection on an author display name
pub fn is_probable_bot(display_name: Option<&str>) -> bool {
    let Some(name) = display_name else {
        return false;
    };
    let name = name.to_lowercase();
    BOT_MARKERS.iter().any(|marker| name.contains(marker))
}

/// Earliest timestamped comment not written by `author_id`
pub fn earliest_response<'a>(
    comments: impl IntoIterator<Item = &'a Comment>,
    author_id: &str,
    options: &KpiOptions,
) -> Option<DateTime<Utc>> {
    comments
        .into_iter()
        .filter(|c| c.author_id != author_id)
        .filter(|c| !(options.ignore_bots && is_probable_bot(c.author_display_name.as_deref())))
        .filter_map(|c| c.published_date)
        .min()
}

/// Seconds from PR creation to the first non-author comment.
///
/// `None` when nobody but the author commented, or when the first response
/// predates the PR.
pub async fn compute_first_response_time<S: ReviewSource + ?Sized>(
    source: &S,
    repo_id: &str,
    pr: &PullRequest,
    options: &KpiOptions,
) -> Result<Option<f64>, ClientError> {
    let threads = source.list_threads(repo_id, pr.id).await?;

    let mut first_response: Option<DateTime<Utc>> = None;
    for thread in threads {
        let comments = source.list_thread_comments(repo_id, pr.id, thread.id).await?;
        if let Some(ts) = earliest_response(&comments, &pr.created_by_id, options) {
            first_response = Some(first_response.map_or(ts, |current| current.min(ts)));
        }
    }

    let Some(first_response) = first_response else {
        return Ok(None);
    };

    let seconds = seconds_between(pr.creation_date, first_response);
    if seconds < 0.0 {
        debug!(pr_id = pr.id, seconds, "Skipping negative first response duration");
        return Ok(None);
    }
    Ok(Some(seconds))
}

/// Seconds from creation to close, for completed PRs only
pub fn compute_completion_time(pr: &PullRequest) -> Option<f64> {
    if pr.status != PrStatus::Completed {
        return None;
    }
    let closed = pr.closed_date?;

    let seconds = seconds_between(pr.creation_date, closed);
    if seconds < 0.0 {
        debug!(pr_id = pr.id, seconds, "Skipping negative completion duration");
        return None;
    }
    Some(seconds)
}

/// Samples collected over a batch of PRs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KpiSamples {
    pub dwell: Vec<KpiSample>,
    pub completion: Vec<KpiSample>,
    pub prs_without_response: usize,
    pub prs_without_completion: usize,
}

impl KpiSamples {
    pub fn dwell_seconds(&self) -> Vec<f64> {
        self.dwell.iter().map(|s| s.seconds).collect()
    }

    pub fn completion_seconds(&self) -> Vec<f64> {
        self.completion.iter().map(|s| s.seconds).collect()
    }

    /// Append another batch, keeping order
    pub fn extend(&mut self, other: &KpiSamples) {
        self.dwell.extend_from_slice(&other.dwell);
        self.completion.extend_from_slice(&other.completion);
        self.prs_without_response += other.prs_without_response;
        self.prs_without_completion += other.prs_without_completion;
    }
}

/// Compute both KPIs for every PR, in order, dropping absent results
pub async fn collect_kpi_samples<S: ReviewSource + ?Sized>(
    source: &S,
    repo_id: &str,
    prs: &[PullRequest],
    options: &KpiOptions,
) -> Result<KpiSamples, ClientError> {
    let mut samples = KpiSamples::default();

    for pr in prs {
        match compute_first_response_time(source, repo_id, pr, options).await? {
            Some(seconds) => samples.dwell.push(KpiSample {
                pr_id: pr.id,
                kind: MetricKind::Dwell,
                seconds,
            }),
            None => samples.prs_without_response += 1,
        }

        match compute_completion_time(pr) {
            Some(seconds) => samples.completion.push(KpiSample {
                pr_id: pr.id,
                kind: MetricKind::Completion,
                seconds,
            }),
            None => samples.prs_without_completion += 1,
        }
    }

    info!(
        repo_id,
        prs_total = prs.len(),
        dwell_samples = samples.dwell.len(),
        completion_samples = samples.completion.len(),
        prs_without_response = samples.prs_without_response,
        prs_without_completion = samples.prs_without_completion,
        "Collected KPI samples"
    );

    Ok(samples)
}
