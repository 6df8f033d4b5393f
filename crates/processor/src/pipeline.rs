//! Multi-repository KPI run: target selection, per-repo collection, reporting

use ado::{match_repositories, ClientError};
use common::models::{Repository, StatusFilter, TimeWindow};
use tracing::{info, warn};

use crate::kpi::{collect_kpi_samples, KpiOptions, KpiSamples, ReviewSource};
use crate::report::generate_report;

/// A repository to report on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoTarget {
    pub id: String,
    /// Display name for the report header
    pub name: String,
}

/// Targets chosen for a run, plus inputs that could not be resolved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSelection {
    pub targets: Vec<RepoTarget>,
    pub unresolved: Vec<String>,
}

/// Pick repositories from the project listing.
///
/// Names resolve case-insensitively; raw IDs are kept even when not listed.
/// With neither given, every listed repository is selected. Duplicates are
/// dropped, first occurrence wins.
pub fn select_targets(
    repos: &[Repository],
    names: &[String],
    ids: &[String],
) -> TargetSelection {
    let mut selection = TargetSelection::default();

    if names.iter().all(|n| n.trim().is_empty()) && ids.iter().all(|i| i.trim().is_empty()) {
        selection.targets = repos
            .iter()
            .map(|r| RepoTarget {
                id: r.id.clone(),
                name: r.name.clone(),
            })
            .collect();
        return selection;
    }

    let resolved = match_repositories(repos, names);
    let mut candidates: Vec<RepoTarget> = resolved
        .resolved
        .into_iter()
        .map(|(_, repo)| RepoTarget {
            id: repo.id,
            name: repo.name,
        })
        .collect();

    for id in ids.iter().map(|i| i.trim()).filter(|i| !i.is_empty()) {
        let name = repos
            .iter()
            .find(|r| r.id.eq_ignore_ascii_case(id))
            .map_or_else(|| id.to_string(), |r| r.name.clone());
        candidates.push(RepoTarget {
            id: id.to_string(),
            name,
        });
    }

    for target in candidates {
        if !selection
            .targets
            .iter()
            .any(|t| t.id.eq_ignore_ascii_case(&target.id))
        {
            selection.targets.push(target);
        }
    }
    selection.unresolved = resolved.unresolved;
    selection
}

/// KPI results for one repository
#[derive(Debug, Clone, PartialEq)]
pub struct RepoKpis {
    pub target: RepoTarget,
    pub pr_count: usize,
    pub samples: KpiSamples,
}

impl RepoKpis {
    pub fn report(&self) -> common::Result<String> {
        generate_report(
            &self.target.name,
            &self.samples.dwell_seconds(),
            &self.samples.completion_seconds(),
        )
    }
}

/// Results across every repository in a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectKpis {
    pub repos: Vec<RepoKpis>,
}

impl ProjectKpis {
    /// All samples, in repository order
    pub fn combined(&self) -> KpiSamples {
        let mut combined = KpiSamples::default();
        for repo in &self.repos {
            combined.extend(&repo.samples);
        }
        combined
    }

    /// One report per repository; a project summary follows when there is more than one
    pub fn render(&self, project_label: &str) -> common::Result<String> {
        let mut reports = self
            .repos
            .iter()
            .map(RepoKpis::report)
            .collect::<common::Result<Vec<_>>>()?;

        if self.repos.len() > 1 {
            let combined = self.combined();
            reports.push(generate_report(
                &format!("{} ({} repositories)", project_label, self.repos.len()),
                &combined.dwell_seconds(),
                &combined.completion_seconds(),
            )?);
        }

        Ok(reports.join("\n\n"))
    }
}

/// Runs KPI collection over repositories in sequence
pub struct KpiPipeline<'a, S: ReviewSource + ?Sized> {
    source: &'a S,
    options: KpiOptions,
}

impl<'a, S: ReviewSource + ?Sized> KpiPipeline<'a, S> {
    pub fn new(source: &'a S, options: KpiOptions) -> Self {
        Self { source, options }
    }

    /// Every PR regardless of status feeds dwell time; completion filters itself
    pub async fn run_repo(
        &self,
        target: &RepoTarget,
        window: Option<TimeWindow>,
    ) -> Result<RepoKpis, ClientError> {
        info!("Fetching PRs for {} ({})", target.name, target.id);
        let prs = self
            .source
            .list_pull_requests(&target.id, StatusFilter::All, window)
            .await?;

        info!("Computing KPIs over {} PRs for {}", prs.len(), target.name);
        let samples = collect_kpi_samples(self.source, &target.id, &prs, &self.options).await?;

        Ok(RepoKpis {
            target: target.clone(),
            pr_count: prs.len(),
            samples,
        })
    }

    /// Process targets in order; the first client error aborts the run
    pub async fn run(
        &self,
        targets: &[RepoTarget],
        window: Option<TimeWindow>,
    ) -> Result<ProjectKpis, ClientError> {
        if targets.is_empty() {
            warn!("No repositories to process");
        }

        let mut project = ProjectKpis::default();
        for target in targets {
            project.repos.push(self.run_repo(target, window).await?);
        }
        Ok(project)
    }
}
