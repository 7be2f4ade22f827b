//! Release note extraction.
//!
//! Walks a commit range, keeps the commits whose pull requests carry a
//! release note, and turns each of them into a [`ReleaseNote`] classified by
//! its area, kind and SIG labels.

use log::*;
use serde::Serialize;
use std::collections::HashSet;

use crate::{
    config::{ApiOptions, GithubApiConfig},
    error::Result,
    forge::{traits::Forge, types::Commit},
};

pub mod assembler;
pub mod filter;
pub mod labels;
pub mod text;
pub mod walker;

/// Note text marking a commit that deliberately has no release note.
const NO_NOTE_TEXT: &str = "NONE";

/// Everything gathered about a single release note.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReleaseNote {
    /// SHA of the commit this note was extracted from.
    pub commit: String,
    /// The content of the release note
    pub text: String,
    /// The note rendered as a markdown line
    pub markdown: String,
    /// GitHub login of the pull request author
    pub author: String,
    pub author_url: String,
    pub pr_url: String,
    pub pr_number: u64,
    /// Suffixes of the `area/` labels
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub areas: Vec<String>,
    /// Suffixes of the `kind/` labels
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub kinds: Vec<String>,
    /// Suffixes of the `sig/` labels
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sigs: Vec<String>,
    /// Whether the note appears as a new feature
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub feature: bool,
    /// Whether the note is duplicated across SIGs
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub duplicate: bool,
    /// Whether the pull request carries the action required label
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub action_required: bool,
}

/// Lists the commits between `start` and `end` whose pull requests carry a
/// release note. Commits without a resolvable pull request are skipped.
pub async fn list_commits_with_notes(
    forge: &dyn Forge,
    start: &str,
    end: &str,
    config: &GithubApiConfig,
) -> Result<Vec<Commit>> {
    let commits = walker::list_commits(forge, start, end, config).await?;

    let mut filtered = vec![];

    for commit in commits {
        let pr = match assembler::pr_from_commit(forge, &commit, config).await
        {
            Ok(pr) => pr,
            Err(err) if err.is_no_match() => {
                info!("no PR found for {}: {}", commit.sha, commit.title());
                continue;
            }
            Err(err) if err.is_recoverable() => {
                error!("failed to get PR for commit {}: {err}", commit.sha);
                continue;
            }
            Err(err) => return Err(err),
        };

        if !filter::has_release_note(&pr.body) {
            info!("excluding {}: {}", commit.sha, commit.title());
            continue;
        }

        filtered.push(commit);
    }

    info!("{} commits with release notes", filtered.len());

    Ok(filtered)
}

/// Produces fully contextualized release notes for the commits between
/// `start` and `end`, in commit order. Bot commits, `NONE` notes and notes
/// whose text was already seen are dropped. A commit that fails to resolve is
/// logged and skipped.
pub async fn list_release_notes(
    forge: &dyn Forge,
    start: &str,
    end: &str,
    options: &ApiOptions,
) -> Result<Vec<ReleaseNote>> {
    let config = GithubApiConfig::from_options(options);

    let commits = list_commits_with_notes(forge, start, end, &config).await?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut notes = vec![];

    for commit in commits {
        if config.is_bot(commit.author_login()) {
            debug!("skipping bot commit {}", commit.sha);
            continue;
        }

        let note = match assembler::release_note_from_commit(
            forge, &commit, &config,
        )
        .await
        {
            Ok(note) => note,
            Err(err) if err.is_recoverable() => {
                error!(
                    "error getting the release note from commit {}: {err}",
                    commit.sha
                );
                continue;
            }
            Err(err) => return Err(err),
        };

        if note.text.trim() == NO_NOTE_TEXT {
            continue;
        }

        if seen.insert(note.text.clone()) {
            notes.push(note);
        } else {
            debug!("dropping duplicate note from {}: {}", note.commit, note.text);
        }
    }

    Ok(notes)
}
