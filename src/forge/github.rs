//! Implements the Forge trait for Github
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::*;
use octocrab::{Octocrab, Page};
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    forge::{
        config::RemoteConfig,
        traits::Forge,
        types::{
            Commit, CommitPage, GetCommitRequest, GetIssueRequest,
            GetPrRequest, Issue, ListCommitsRequest, PullRequest,
        },
    },
};

#[derive(Debug, Deserialize)]
struct GitSignature {
    pub date: String,
}

/// Response of the git data commit endpoint
#[derive(Debug, Deserialize)]
struct GitCommit {
    pub sha: String,
    pub message: String,
    pub committer: GitSignature,
}

#[derive(Debug, Deserialize)]
struct Account {
    pub login: String,
}

#[derive(Debug, Deserialize)]
struct ListedCommitDetails {
    pub message: String,
    pub committer: GitSignature,
}

/// Entry of the repository commit listing
#[derive(Debug, Deserialize)]
struct ListedCommit {
    pub sha: String,
    pub commit: ListedCommitDetails,
    pub author: Option<Account>,
}

#[derive(Debug, Deserialize)]
struct Label {
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct GithubPullRequest {
    pub number: u64,
    pub body: Option<String>,
    pub user: Option<Account>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

#[derive(Debug, Deserialize)]
struct GithubIssue {
    pub number: u64,
    #[serde(default)]
    pub labels: Vec<Label>,
}

#[derive(Debug, Serialize)]
struct ListCommitsQuery {
    pub sha: String,
    pub since: String,
    pub until: String,
    pub page: u32,
    pub per_page: u8,
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}

fn label_names(labels: Vec<Label>) -> Vec<String> {
    labels.into_iter().map(|l| l.name).collect()
}

/// GitHub forge implementation using Octocrab for API interactions with
/// commits, pull requests and issues.
pub struct Github {
    base_uri: String,
    instance: Octocrab,
}

impl Github {
    /// Create GitHub client with personal access token authentication and API
    /// base URL configuration.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let base_uri = config.api_url.trim_end_matches('/').to_string();
        let instance = Octocrab::builder()
            .personal_token(config.token.clone())
            .base_uri(base_uri.clone())?
            .build()?;

        Ok(Self { base_uri, instance })
    }
}

#[async_trait]
impl Forge for Github {
    async fn get_commit(&self, req: GetCommitRequest) -> Result<Commit> {
        let endpoint = format!(
            "{}/repos/{}/{}/git/commits/{}",
            self.base_uri, req.org, req.repo, req.sha
        );

        debug!("fetching commit {}", req.sha);

        let commit: GitCommit =
            self.instance.get(endpoint, None::<&()>).await?;

        Ok(Commit {
            committed_at: parse_timestamp(&commit.committer.date)?,
            sha: commit.sha,
            message: commit.message,
            author_login: None,
        })
    }

    async fn list_commits(
        &self,
        req: ListCommitsRequest,
    ) -> Result<CommitPage> {
        let endpoint =
            format!("{}/repos/{}/{}/commits", self.base_uri, req.org, req.repo);

        let query = ListCommitsQuery {
            sha: req.branch,
            since: req.since.to_rfc3339(),
            until: req.until.to_rfc3339(),
            page: req.page,
            per_page: req.per_page,
        };

        debug!("listing commits: {:?}", query);

        let page: Page<ListedCommit> =
            self.instance.get(endpoint, Some(&query)).await?;

        let last_page = page.number_of_pages().unwrap_or(req.page);

        let mut commits = vec![];

        for item in page.into_iter() {
            commits.push(Commit {
                committed_at: parse_timestamp(&item.commit.committer.date)?,
                sha: item.sha,
                message: item.commit.message,
                author_login: item.author.map(|a| a.login),
            });
        }

        Ok(CommitPage { commits, last_page })
    }

    async fn get_pull_request(&self, req: GetPrRequest) -> Result<PullRequest> {
        let endpoint = format!(
            "{}/repos/{}/{}/pulls/{}",
            self.base_uri, req.org, req.repo, req.number
        );

        debug!("fetching pull request #{}", req.number);

        let pr: GithubPullRequest =
            self.instance.get(endpoint, None::<&()>).await?;

        Ok(PullRequest {
            number: pr.number,
            body: pr.body.unwrap_or_default(),
            author_login: pr.user.map(|u| u.login).unwrap_or_default(),
            labels: label_names(pr.labels),
        })
    }

    async fn get_issue(&self, req: GetIssueRequest) -> Result<Issue> {
        let endpoint = format!(
            "{}/repos/{}/{}/issues/{}",
            self.base_uri, req.org, req.repo, req.number
        );

        debug!("fetching issue #{}", req.number);

        let issue: GithubIssue =
            self.instance.get(endpoint, None::<&()>).await?;

        Ok(Issue {
            number: issue.number,
            labels: label_names(issue.labels),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReleaseNotesError;
    use secrecy::SecretString;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    fn create_forge(server: &MockServer) -> Github {
        Github::new(RemoteConfig {
            api_url: server.uri(),
            token: SecretString::from("test-token".to_string()),
        })
        .unwrap()
    }

    fn listed_commit(sha: &str, message: &str, login: Option<&str>) -> serde_json::Value {
        json!({
            "sha": sha,
            "commit": {
                "message": message,
                "committer": { "date": "2024-01-02T03:04:05Z" }
            },
            "author": login.map(|l| json!({ "login": l })),
        })
    }

    #[tokio::test]
    async fn get_commit_reads_committer_date() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/git/commits/abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sha": "abc123",
                "message": "Add dark mode toggle (#5678)",
                "committer": { "date": "2024-01-02T03:04:05Z" }
            })))
            .mount(&server)
            .await;

        let forge = create_forge(&server);
        let commit = forge
            .get_commit(GetCommitRequest {
                org: "acme".into(),
                repo: "widgets".into(),
                sha: "abc123".into(),
            })
            .await
            .unwrap();

        assert_eq!(commit.sha, "abc123");
        assert_eq!(commit.title(), "Add dark mode toggle (#5678)");
        assert_eq!(commit.committed_at.to_rfc3339(), "2024-01-02T03:04:05+00:00");
    }

    #[tokio::test]
    async fn get_commit_maps_missing_commit_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/git/commits/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "Not Found",
                "documentation_url": "https://docs.github.com/rest"
            })))
            .mount(&server)
            .await;

        let forge = create_forge(&server);
        let result = forge
            .get_commit(GetCommitRequest {
                org: "acme".into(),
                repo: "widgets".into(),
                sha: "missing".into(),
            })
            .await;

        assert!(matches!(result, Err(ReleaseNotesError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_commits_reports_last_page() {
        let server = MockServer::start().await;
        let link = format!(
            "<{0}/repos/acme/widgets/commits?page=2>; rel=\"next\", <{0}/repos/acme/widgets/commits?page=3>; rel=\"last\"",
            server.uri()
        );
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/commits"))
            .and(query_param("sha", "main"))
            .and(query_param("page", "1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Link", link.as_str())
                    .set_body_json(json!([
                        listed_commit("a1", "first (#1)", Some("alice")),
                        listed_commit("b2", "second", None),
                    ])),
            )
            .mount(&server)
            .await;

        let forge = create_forge(&server);
        let since = parse_timestamp("2024-01-01T00:00:00Z").unwrap();
        let until = parse_timestamp("2024-02-01T00:00:00Z").unwrap();

        let page = forge
            .list_commits(ListCommitsRequest {
                org: "acme".into(),
                repo: "widgets".into(),
                branch: "main".into(),
                since,
                until,
                page: 1,
                per_page: 100,
            })
            .await
            .unwrap();

        assert_eq!(page.last_page, 3);
        assert_eq!(page.commits.len(), 2);
        assert_eq!(page.commits[0].author_login(), "alice");
        assert_eq!(page.commits[1].author_login, None);
    }

    #[tokio::test]
    async fn list_commits_without_link_header_is_last_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/commits"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                listed_commit("a1", "only (#1)", Some("alice")),
            ])))
            .mount(&server)
            .await;

        let forge = create_forge(&server);
        let since = parse_timestamp("2024-01-01T00:00:00Z").unwrap();

        let page = forge
            .list_commits(ListCommitsRequest {
                org: "acme".into(),
                repo: "widgets".into(),
                branch: "main".into(),
                since,
                until: since,
                page: 1,
                per_page: 100,
            })
            .await
            .unwrap();

        assert_eq!(page.last_page, 1);
        assert_eq!(page.commits.len(), 1);
    }

    #[tokio::test]
    async fn get_pull_request_flattens_labels() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/5678"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "number": 5678,
                "body": null,
                "user": { "login": "alice" },
                "labels": [{ "name": "kind/feature" }, { "name": "sig/ui" }]
            })))
            .mount(&server)
            .await;

        let forge = create_forge(&server);
        let pr = forge
            .get_pull_request(GetPrRequest {
                org: "acme".into(),
                repo: "widgets".into(),
                number: 5678,
            })
            .await
            .unwrap();

        assert_eq!(pr.number, 5678);
        assert_eq!(pr.body, "");
        assert_eq!(pr.author_login, "alice");
        assert_eq!(pr.labels, vec!["kind/feature", "sig/ui"]);
    }

    #[tokio::test]
    async fn get_issue_flattens_labels() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/issues/12"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "number": 12,
                "labels": [{ "name": "bug" }]
            })))
            .mount(&server)
            .await;

        let forge = create_forge(&server);
        let issue = forge
            .get_issue(GetIssueRequest {
                org: "acme".into(),
                repo: "widgets".into(),
                number: 12,
            })
            .await
            .unwrap();

        assert_eq!(issue.number, 12);
        assert_eq!(issue.labels, vec!["bug"]);
    }
}
