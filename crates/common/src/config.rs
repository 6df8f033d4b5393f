//! Application configuration

use std::env;
use std::time::Duration;

use chrono::Utc;

use crate::error::{Error, Result};
use crate::models::TimeWindow;

/// Default Azure DevOps Services host
pub const DEFAULT_BASE_URL: &str = "https://dev.azure.com";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Validated runtime configuration for one report run
#[derive(Debug, Clone)]
pub struct Config {
    pub organization: String,
    pub project: String,
    pub pat: String,
    /// Host root, without organization or project
    pub base_url: String,
    /// Per-request socket timeout
    pub request_timeout: Duration,
    /// Lookback window in days (`None` = full history)
    pub days: Option<u32>,
    pub include_hidden: bool,
    pub ignore_bots: bool,
}

impl Config {
    /// Build and validate configuration from run parameters.
    ///
    /// `ADO_BASE_URL` and `ADO_REQUEST_TIMEOUT_SECS` are read from the
    /// environment when `base_url` is not given explicitly.
    pub fn load(
        organization: &str,
        project: &str,
        pat: Option<&str>,
        days: Option<i64>,
        base_url: Option<&str>,
    ) -> Result<Self> {
        let organization = require("organization", organization)?;
        let project = require("project", project)?;

        let days = match days {
            None => None,
            Some(d) if d > 0 => Some(u32::try_from(d).map_err(|_| {
                Error::Config(format!("Invalid value for 'days': {d} is too large."))
            })?),
            Some(_) => {
                return Err(Error::Config(
                    "Invalid value for 'days': expected an integer greater than 0.".to_string(),
                ))
            }
        };
        if let Some(d) = days {
            if TimeWindow::last_days(d, Utc::now()).is_none() {
                return Err(Error::Config(format!(
                    "Invalid value for 'days': {d} reaches past the supported date range."
                )));
            }
        }

        let pat = pat.map(str::trim).unwrap_or_default();
        if pat.is_empty() {
            return Err(Error::Config(
                "PAT required via --pat or the ADO_PAT environment variable.".to_string(),
            ));
        }

        let base_url = base_url
            .map(str::to_string)
            .or_else(|| env::var("ADO_BASE_URL").ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let request_timeout = Duration::from_secs(
            env::var("ADO_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        );

        Ok(Self {
            organization,
            project,
            pat: pat.to_string(),
            base_url,
            request_timeout,
            days,
            include_hidden: false,
            ignore_bots: false,
        })
    }

    pub fn with_include_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    pub fn with_ignore_bots(mut self, ignore_bots: bool) -> Self {
        self.ignore_bots = ignore_bots;
        self
    }
}

fn require(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::Config(format!("Missing required value for '{field}'.")));
    }
    Ok(value.to_string())
}
