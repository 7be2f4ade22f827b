use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
/// Represents a normalized commit returned from the forge
pub struct Commit {
    pub sha: String,
    pub message: String,
    /// Login of the forge account the commit is attributed to, if any
    pub author_login: Option<String>,
    pub committed_at: DateTime<Utc>,
}

impl Commit {
    /// First line of the commit message.
    pub fn title(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }

    pub fn author_login(&self) -> &str {
        self.author_login.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Pull request information relevant to release notes.
pub struct PullRequest {
    pub number: u64,
    pub body: String,
    pub author_login: String,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Issue information relevant to release notes.
pub struct Issue {
    pub number: u64,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Default)]
/// One page of a commit listing.
pub struct CommitPage {
    pub commits: Vec<Commit>,
    /// Last page number reported by the server.
    pub last_page: u32,
}

#[derive(Debug, Clone)]
/// Request to get a single commit by SHA.
pub struct GetCommitRequest {
    pub org: String,
    pub repo: String,
    pub sha: String,
}

#[derive(Debug, Clone)]
/// Request for one page of commits on a branch within a time window.
pub struct ListCommitsRequest {
    pub org: String,
    pub repo: String,
    pub branch: String,
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,
    pub page: u32,
    pub per_page: u8,
}

#[derive(Debug, Clone)]
/// Request to get a pull request by number.
pub struct GetPrRequest {
    pub org: String,
    pub repo: String,
    pub number: u64,
}

#[derive(Debug, Clone)]
/// Request to get an issue by number.
pub struct GetIssueRequest {
    pub org: String,
    pub repo: String,
    pub number: u64,
}
