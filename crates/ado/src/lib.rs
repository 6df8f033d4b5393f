//! Azure DevOps Git REST client for pull request KPI data

pub mod client;
pub mod error;
pub mod resolve;
pub mod retry;


pub use client::{AdoClient, API_VERSION, PULL_REQUEST_PAGE_SIZE};
pub use error::ClientError;
pub use resolve::{match_repositories, match_repository, ResolvedRepos};
pub use retry::{RetryPolicy, Sleeper, TokioSleeper};
