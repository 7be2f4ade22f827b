//! Traits related to the remote git forge
use async_trait::async_trait;

use crate::{
    error::Result,
    forge::types::{
        Commit, CommitPage, GetCommitRequest, GetIssueRequest, GetPrRequest,
        Issue, ListCommitsRequest, PullRequest,
    },
};

/// Everything the notes pipeline needs from the repository host. Missing
/// resources are reported as [`crate::error::ReleaseNotesError::NotFound`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Forge: Send + Sync {
    async fn get_commit(&self, req: GetCommitRequest) -> Result<Commit>;
    async fn list_commits(&self, req: ListCommitsRequest)
    -> Result<CommitPage>;
    async fn get_pull_request(&self, req: GetPrRequest) -> Result<PullRequest>;
    async fn get_issue(&self, req: GetIssueRequest) -> Result<Issue>;
}
