//! Builds fully contextualized release notes from individual commits.
use log::*;

use crate::{
    config::{GithubApiConfig, NoteSource},
    error::{ReleaseNotesError, Result},
    forge::{
        traits::Forge,
        types::{Commit, GetIssueRequest, GetPrRequest, Issue, PullRequest},
    },
    notes::{
        ReleaseNote,
        filter::{
            PR_NUMBER_REGEX, issue_numbers_from_commit, pr_number_from_commit,
        },
        labels::{self, has_string, prettify_sig_list},
        text::note_text_from_string,
    },
};

const FEATURE_KIND: &str = "feature";
const BUG_LABEL: &str = "bug";

/// Fetch the pull request a commit was merged from.
pub async fn pr_from_commit(
    forge: &dyn Forge,
    commit: &Commit,
    config: &GithubApiConfig,
) -> Result<PullRequest> {
    let number = pr_number_from_commit(commit)?;

    config.ensure_active()?;

    forge
        .get_pull_request(GetPrRequest {
            org: config.org.clone(),
            repo: config.repo.clone(),
            number,
        })
        .await
}

/// Fetch an issue by number.
pub async fn get_issue(
    forge: &dyn Forge,
    number: u64,
    config: &GithubApiConfig,
) -> Result<Issue> {
    config.ensure_active()?;

    forge
        .get_issue(GetIssueRequest {
            org: config.org.clone(),
            repo: config.repo.clone(),
            number,
        })
        .await
}

/// Note text taken from the commit title, without the `(#123)` marker.
pub fn note_text_from_commit(commit: &Commit) -> String {
    PR_NUMBER_REGEX
        .replace_all(commit.title(), "")
        .trim()
        .to_string()
}

/// Produce a release note for a single commit. Any failure is wrapped with
/// the commit SHA.
pub async fn release_note_from_commit(
    forge: &dyn Forge,
    commit: &Commit,
    config: &GithubApiConfig,
) -> Result<ReleaseNote> {
    assemble(forge, commit, config)
        .await
        .map_err(|err| ReleaseNotesError::commit(&commit.sha, err))
}

async fn assemble(
    forge: &dyn Forge,
    commit: &Commit,
    config: &GithubApiConfig,
) -> Result<ReleaseNote> {
    let pr = pr_from_commit(forge, commit, config).await?;

    // a commit without issue references is fine, a failed lookup is not
    let issue = match issue_numbers_from_commit(commit) {
        Ok(numbers) => match numbers.first() {
            Some(number) => {
                debug!("commit {} references issue #{number}", commit.sha);
                Some(get_issue(forge, *number, config).await?)
            }
            None => None,
        },
        Err(err) if err.is_no_match() => None,
        Err(err) => return Err(err),
    };

    let text = match config.note_source {
        NoteSource::CommitTitle => note_text_from_commit(commit),
        NoteSource::PullRequestBody => note_text_from_string(&pr.body)?,
    };

    Ok(build_release_note(commit, &pr, issue.as_ref(), text, config))
}

/// Classify and render a note from already resolved inputs.
pub fn build_release_note(
    commit: &Commit,
    pr: &PullRequest,
    issue: Option<&Issue>,
    text: String,
    config: &GithubApiConfig,
) -> ReleaseNote {
    let kinds = labels::kinds(&pr.labels);
    let sigs = labels::sigs(&pr.labels);

    let feature = if has_string(&kinds, FEATURE_KIND) {
        true
    } else if let Some(issue) = issue {
        !has_string(&issue.labels, BUG_LABEL)
    } else {
        false
    };

    let mut areas = labels::areas(&pr.labels);
    if areas.is_empty()
        && let Some(issue) = issue
    {
        areas = labels::areas(&issue.labels);
    }

    let action_required = labels::is_action_required(pr);
    let duplicate = !(action_required || feature) && sigs.len() > 1;

    let author = pr.author_login.clone();
    let author_url = config.author_url(&author);
    let pr_url = config.pr_url(pr.number);

    let mut markdown = format!(
        "{text} ([#{}]({pr_url}), [@{author}]({author_url}))",
        pr.number
    );

    if (action_required || feature) && !sigs.is_empty() {
        markdown = format!("{markdown} Courtesy of {}", prettify_sig_list(&sigs));
    }

    ReleaseNote {
        commit: commit.sha.clone(),
        text,
        markdown,
        author,
        author_url,
        pr_url,
        pr_number: pr.number,
        areas,
        kinds,
        sigs,
        feature,
        duplicate,
        action_required,
    }
}
