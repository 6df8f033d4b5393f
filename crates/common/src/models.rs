//! Domain models

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A Git repository in an Azure DevOps project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Repository {
    pub id: String,
    pub name: String,
}

/// Pull request lifecycle status as reported by Azure DevOps
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PrStatus {
    NotSet,
    Active,
    Abandoned,
    Completed,
    #[serde(other)]
    Other,
}

impl PrStatus {
    /// Parse a provider status string. Unknown values map to `Other`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "notset" => PrStatus::NotSet,
            "active" => PrStatus::Active,
            "abandoned" => PrStatus::Abandoned,
            "completed" => PrStatus::Completed,
            _ => PrStatus::Other,
        }
    }
}

/// Status criterion for pull request searches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    Active,
    Completed,
    Abandoned,
    #[default]
    All,
}

impl StatusFilter {
    /// Value for the `searchCriteria.status` query parameter
    pub fn as_query(&self) -> &'static str {
        match self {
            StatusFilter::Active => "active",
            StatusFilter::Completed => "completed",
            StatusFilter::Abandoned => "abandoned",
            StatusFilter::All => "all",
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

/// Creation-time bounds for pull request searches.
///
/// Both ends are always present; an unbounded search is `Option::None`
/// at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub min: DateTime<Utc>,
    pub max: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(min: DateTime<Utc>, max: DateTime<Utc>) -> Self {
        Self { min, max }
    }

    /// Window ending at `now` and reaching `days` back.
    ///
    /// `None` when the start falls outside the representable date range.
    pub fn last_days(days: u32, now: DateTime<Utc>) -> Option<Self> {
        let min = Duration::try_days(i64::from(days)).and_then(|d| now.checked_sub_signed(d))?;
        Some(Self { min, max: now })
    }
}

/// A pull request, reduced to the fields KPI computation needs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PullRequest {
    pub id: i64,
    pub creation_date: DateTime<Utc>,
    pub created_by_id: String,
    pub closed_date: Option<DateTime<Utc>>,
    pub status: PrStatus,
}

/// A discussion thread on a pull request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Thread {
    pub id: i64,
}

/// A comment inside a pull request thread
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub author_id: String,
    pub author_display_name: Option<String>,
    pub published_date: Option<DateTime<Utc>>,
}

/// Which duration a sample measures
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Dwell,
    Completion,
}

impl MetricKind {
    /// Section title used in reports
    pub fn title(&self) -> &'static str {
        match self {
            MetricKind::Dwell => "PR Review Dwell Time (First Response)",
            MetricKind::Completion => "PR Completion Time (Creation to Close)",
        }
    }
}

/// One per-PR measurement in seconds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct KpiSample {
    pub pr_id: i64,
    pub kind: MetricKind,
    pub seconds: f64,
}

/// Percentile summary of one metric
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub metric: String,
    pub count: usize,
    pub p50: Option<f64>,
    pub p75: Option<f64>,
    pub p90: Option<f64>,
}
