//! Regex-driven classification of commits: which pull request and issue a
//! commit belongs to, and whether that pull request carries a release note.
use regex::Regex;
use std::sync::LazyLock;

use crate::{
    error::{ReleaseNotesError, Result},
    forge::types::Commit,
};

/// Keywords GitHub recognizes for closing an issue from a commit message.
pub const CLOSE_ISSUE_KEYWORDS: &str =
    "Close|Closes|Closed|Fix|Fixes|Fixed|Resolve|Resolves|Resolved";

/// The `(#123)` marker appended to squash-merged commit titles.
pub static PR_NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(#(?<number>\d+)\)").unwrap());

static ISSUE_NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)({CLOSE_ISSUE_KEYWORDS}) #?(?<number>\d+)"))
        .unwrap()
});

/// Every observed spelling of "this PR has no release note". Order and
/// overlap are kept as found in the wild.
static EXCLUSION_FILTERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"```release-note\r\nNONE",
        r"```release-note\r\n\s+NONE",
        r"```release-note\r\nNONE",
        r#"```release-note\r\n"NONE""#,
        r"```release-note\r\nNone",
        r"```release-note\r\nnone",
        r"```release-note\r\nN/A",
        r"```release-note\r\n\r\n```",
        r"```release-note\r\n```",
        r"/release-note-none",
        r"\r\n\r\nNONE",
        r"```NONE\r\n```",
        r"```release-note \r\nNONE\r\n```",
        r"NONE\r\n```",
        r"\r\nNone",
        r"\r\nNONE\r\n",
    ]
    .iter()
    .map(|f| Regex::new(f).unwrap())
    .collect()
});

/// Patterns identifying a release note once exclusions are ruled out. The
/// leading match-all keeps every non-excluded pull request.
static INCLUSION_FILTERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r".*",
        r"release-note",
        r"Does this PR introduce a user-facing change?",
    ]
    .iter()
    .map(|f| Regex::new(f).unwrap())
    .collect()
});

/// Number of the pull request a commit was merged from, taken from the
/// `(#123)` marker on the first line of its message.
pub fn pr_number_from_commit(commit: &Commit) -> Result<u64> {
    let captures = PR_NUMBER_REGEX.captures(commit.title()).ok_or_else(|| {
        ReleaseNotesError::no_match("no PR found for this commit")
    })?;

    Ok(captures["number"].parse::<u64>()?)
}

/// Issues referenced with a closing keyword (`Fixes #12`) anywhere in the
/// commit message, in order of appearance. References whose number does not
/// fit an issue number are ignored.
pub fn issue_numbers_from_commit(commit: &Commit) -> Result<Vec<u64>> {
    let issues = ISSUE_NUMBER_REGEX
        .captures_iter(&commit.message)
        .filter_map(|captures| captures["number"].parse::<u64>().ok())
        .collect::<Vec<_>>();

    if issues.is_empty() {
        return Err(ReleaseNotesError::no_match(
            "no matches found when parsing issues from commit",
        ));
    }

    Ok(issues)
}

/// Whether a pull request body carries a release note: any exclusion
/// rejects it, otherwise the first matching inclusion accepts it.
pub fn has_release_note(body: &str) -> bool {
    if let Some(filter) = EXCLUSION_FILTERS.iter().find(|f| f.is_match(body)) {
        log::debug!("pull request body matched exclusion: {}", filter.as_str());
        return false;
    }

    INCLUSION_FILTERS.iter().any(|f| f.is_match(body))
}
