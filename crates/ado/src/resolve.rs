//! Repository name to ID resolution

use common::models::Repository;
use tracing::{debug, warn};

use crate::client::AdoClient;
use crate::error::ClientError;

/// Outcome of resolving several repository names at once
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedRepos {
    /// `(input, repository)` pairs, in input order
    pub resolved: Vec<(String, Repository)>,
    /// Inputs that matched nothing
    pub unresolved: Vec<String>,
}

impl ResolvedRepos {
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.resolved.iter().map(|(_, repo)| repo.id.as_str())
    }
}

/// Find the repository named `name`, ignoring case and surrounding whitespace.
///
/// Falls back to the last `/`-separated segment so inputs like
/// `project/_git/repo` still match.
pub fn match_repository<'a>(repos: &'a [Repository], name: &str) -> Option<&'a Repository> {
    let wanted = name.trim();
    if wanted.is_empty() {
        return None;
    }

    let by_name = |candidate: &str| {
        repos
            .iter()
            .find(|repo| repo.name.trim().eq_ignore_ascii_case(candidate))
    };

    by_name(wanted).or_else(|| {
        let last_segment = wanted.rsplit('/').next().unwrap_or(wanted).trim();
        if last_segment.is_empty() || last_segment == wanted {
            None
        } else {
            by_name(last_segment)
        }
    })
}

/// Resolve each input against `repos` without stopping at misses
pub fn match_repositories(repos: &[Repository], names: &[String]) -> ResolvedRepos {
    let mut out = ResolvedRepos::default();
    for raw in names {
        let key = raw.trim();
        if key.is_empty() {
            continue;
        }
        match match_repository(repos, key) {
            Some(repo) => out.resolved.push((key.to_string(), repo.clone())),
            None => out.unresolved.push(key.to_string()),
        }
    }
    out
}

impl AdoClient {
    /// Resolve a repository name to its ID
    pub async fn resolve_repo_name_to_id(
        &self,
        name: &str,
        include_hidden: bool,
    ) -> Result<String, ClientError> {
        let repos = self.list_repositories(include_hidden).await?;
        match match_repository(&repos, name) {
            Some(repo) => {
                debug!("Resolved repository '{}' to {}", name, repo.id);
                Ok(repo.id.clone())
            }
            None => Err(ClientError::RepositoryNotFound {
                name: name.to_string(),
                project: self.project().to_string(),
            }),
        }
    }

    /// Resolve several names with a single repository listing
    pub async fn resolve_repo_names(
        &self,
        names: &[String],
        include_hidden: bool,
    ) -> Result<ResolvedRepos, ClientError> {
        let repos = self.list_repositories(include_hidden).await?;
        let result = match_repositories(&repos, names);
        for name in &result.unresolved {
            warn!("Could not resolve repository '{}' in project '{}'", name, self.project());
        }
        Ok(result)
    }
}
