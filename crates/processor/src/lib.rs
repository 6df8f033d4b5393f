//! KPI extraction, aggregation and reporting

pub mod kpi;
pub mod pipeline;
pub mod report;

#[cfg(test)]
mod kpi_test;
#[cfg(test)]
mod pipeline_test;
#[cfg(test)]
mod tests;

pub use kpi::{collect_kpi_samples, KpiOptions, KpiSamples, ReviewSource};
pub use pipeline::{select_targets, KpiPipeline, ProjectKpis, RepoKpis, RepoTarget, TargetSelection};
pub use report::generate_report;
