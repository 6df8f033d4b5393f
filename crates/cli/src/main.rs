//! Azure DevOps PR KPI reporter CLI

use ado::{AdoClient, ClientError};
use chrono::Utc;
use clap::Parser;
use common::models::TimeWindow;
use common::Config;
use processor::{select_targets, KpiOptions, KpiPipeline};
use std::process::ExitCode;
use tracing::{info, warn};

mod args;

use args::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ado_pr_kpi=info,ado=info,processor=info".into()),
        )
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

/// Exit code for a failed run; anything outside the known taxonomy is 1
fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<common::Error>()
        .map_or(1, common::Error::exit_code)
}

async fn run(args: Args) -> anyhow::Result<String> {
    let config = Config::load(
        &args.org,
        &args.project,
        args.pat.as_deref(),
        args.days,
        args.base_url.as_deref(),
    )?
    .with_include_hidden(args.include_hidden)
    .with_ignore_bots(args.ignore_bots);

    Ok(generate(&config, &args.repo_names, &args.repo_ids).await?)
}

async fn generate(config: &Config, names: &[String], ids: &[String]) -> common::Result<String> {
    info!("Initializing Azure DevOps client for {}/{}", config.organization, config.project);
    let client = AdoClient::new(config)?;

    info!("Resolving repositories...");
    let repos = client.list_repositories(config.include_hidden).await?;
    let selection = select_targets(&repos, names, ids);

    for name in &selection.unresolved {
        warn!("Could not resolve repository '{}' (check spelling/project)", name);
    }

    if selection.targets.is_empty() {
        return Err(match selection.unresolved.first() {
            Some(name) => ClientError::RepositoryNotFound {
                name: name.clone(),
                project: config.project.clone(),
            }
            .into(),
            None => common::Error::Config(format!(
                "No repositories found in project '{}'.",
                config.project
            )),
        });
    }

    let window = match config.days {
        None => None,
        Some(days) => Some(TimeWindow::last_days(days, Utc::now()).ok_or_else(|| {
            common::Error::Config(format!("Invalid value for 'days': {days} is out of range."))
        })?),
    };
    match window {
        Some(w) => info!("Analyzing PRs created between {} and {}", w.min, w.max),
        None => info!("Analyzing full PR history"),
    }

    let options = KpiOptions {
        ignore_bots: config.ignore_bots,
    };
    let project = KpiPipeline::new(&client, options)
        .run(&selection.targets, window)
        .await?;

    info!("Generating report for {} repositories", project.repos.len());
    project.render(&format!("{}/{}", config.organization, config.project))
}
