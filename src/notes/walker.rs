//! Paginated retrieval of the commits between two SHAs.
use log::*;

use crate::{
    config::GithubApiConfig,
    error::Result,
    forge::{
        config::DEFAULT_PAGE_SIZE,
        traits::Forge,
        types::{Commit, GetCommitRequest, ListCommitsRequest},
    },
};

async fn get_commit(
    forge: &dyn Forge,
    sha: &str,
    config: &GithubApiConfig,
) -> Result<Commit> {
    config.ensure_active()?;

    forge
        .get_commit(GetCommitRequest {
            org: config.org.clone(),
            repo: config.repo.clone(),
            sha: sha.to_string(),
        })
        .await
}

/// Lists every commit on the configured branch committed between the
/// `start` and `end` commits. Failing to resolve either boundary is fatal.
pub async fn list_commits(
    forge: &dyn Forge,
    start: &str,
    end: &str,
    config: &GithubApiConfig,
) -> Result<Vec<Commit>> {
    let start_commit = get_commit(forge, start, config).await?;
    let end_commit = get_commit(forge, end, config).await?;

    info!(
        "listing commits on {}/{}@{} between {} and {}",
        config.org,
        config.repo,
        config.branch,
        start_commit.committed_at,
        end_commit.committed_at
    );

    let mut req = ListCommitsRequest {
        org: config.org.clone(),
        repo: config.repo.clone(),
        branch: config.branch.clone(),
        since: start_commit.committed_at,
        until: end_commit.committed_at,
        page: 1,
        per_page: DEFAULT_PAGE_SIZE,
    };

    config.ensure_active()?;
    let first = forge.list_commits(req.clone()).await?;
    let last_page = first.last_page;
    let mut commits = first.commits;

    req.page += 1;

    while req.page <= last_page {
        debug!("fetching commit page {} of {last_page}", req.page);
        config.ensure_active()?;
        let page = forge.list_commits(req.clone()).await?;
        commits.extend(page.commits);
        req.page += 1;
    }

    info!("found {} commits", commits.len());

    Ok(commits)
}
