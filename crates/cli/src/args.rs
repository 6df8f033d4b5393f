//! Command-line arguments

use clap::Parser;

/// Azure DevOps pull request KPI report (dwell time and completion time, P50/P75/P90)
#[derive(Debug, Parser)]
#[command(name = "ado-pr-kpi", version)]
pub struct Args {
    /// Azure DevOps organization name
    #[arg(long)]
    pub org: String,

    /// Azure DevOps project name
    #[arg(long)]
    pub project: String,

    /// Repository name to analyze (repeatable)
    #[arg(long = "repo-name", value_name = "NAME")]
    pub repo_names: Vec<String>,

    /// Repository GUID to analyze (repeatable)
    #[arg(long = "repo-id", value_name = "ID")]
    pub repo_ids: Vec<String>,

    /// Lookback window in days; omit for full history
    #[arg(long, allow_negative_numbers = true)]
    pub days: Option<i64>,

    /// Ignore comments from bot and service accounts (best-effort, by display name)
    #[arg(long)]
    pub ignore_bots: bool,

    /// Include hidden repositories when listing and resolving
    #[arg(long)]
    pub include_hidden: bool,

    /// Personal access token
    #[arg(long, env = "ADO_PAT", hide_env_values = true)]
    pub pat: Option<String>,

    /// Service root, e.g. https://dev.azure.com
    #[arg(long, env = "ADO_BASE_URL")]
    pub base_url: Option<String>,
}
