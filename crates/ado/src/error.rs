//! Client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("Azure DevOps request failed after retries: GET {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Azure DevOps API request failed: GET {url} returned {status} - {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    #[error("Azure DevOps API returned invalid JSON: GET {url}")]
    InvalidJson {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Azure DevOps API returned unexpected payload shape: GET {url}")]
    UnexpectedShape { url: String },
    #[error("Azure DevOps API payload could not be decoded: GET {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Malformed Azure DevOps pull request payload: repo_id={repo_id}, {detail}")]
    MalformedPullRequest { repo_id: String, detail: String },
    #[error("Repository '{name}' was not found in project '{project}'.")]
    RepositoryNotFound { name: String, project: String },
}

impl ClientError {
    /// HTTP status carried by the error, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ClientError> for common::Error {
    fn from(err: ClientError) -> Self {
        match err.status() {
            Some(401) => common::Error::Authentication(err.to_string()),
            _ => common::Error::Api(err.to_string()),
        }
    }
}
