//! Text report rendering

use common::models::{MetricKind, Summary};
use common::stats::summarize_metric;
use common::time::format_duration;
use common::Result;

const REPORT_TITLE: &str = "PR KPI Report";

/// Render the dwell/completion percentile report for one repository (or an aggregate)
pub fn generate_report(
    name: &str,
    dwell_times: &[f64],
    completion_times: &[f64],
) -> Result<String> {
    let dwell = summarize_metric(MetricKind::Dwell.title(), dwell_times)?;
    let completion = summarize_metric(MetricKind::Completion.title(), completion_times)?;

    let mut lines = vec![
        format!("Repository: {name}"),
        REPORT_TITLE.to_string(),
        String::new(),
    ];
    lines.extend(section(1, &dwell));
    lines.push(String::new());
    lines.extend(section(2, &completion));

    Ok(lines.join("\n"))
}

fn section(number: usize, summary: &Summary) -> [String; 5] {
    [
        format!("{number}) {}", summary.metric),
        format!("   Samples: {}", summary.count),
        format!("   P50: {}", format_duration(summary.p50)),
        format!("   P75: {}", format_duration(summary.p75)),
        format!("   P90: {}", format_duration(summary.p90)),
    ]
}
