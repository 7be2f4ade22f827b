//! Extraction of release note text from pull request bodies and commit
//! messages.
use regex::Regex;
use std::sync::LazyLock;

use crate::error::{ReleaseNotesError, Result};

/// Fenced note stanzas, tried in order. The first match wins.
static NOTE_FENCE_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // release-note fence, windows line endings
        Regex::new(r"```release-note\r\n(?<note>.+)").unwrap(),
        // dev-release-note fence, windows line endings
        Regex::new(r"```dev-release-note\r\n(?<note>.+)").unwrap(),
        // bare fence, windows line endings
        Regex::new(r"```\r\n(?<note>.+)\r\n```").unwrap(),
        // release-note fence, unix line endings
        Regex::new(r"```release-note\n(?<note>.+)\n```").unwrap(),
    ]
});

static ACTION_REQUIRED_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)^\[action required\]\s").unwrap(),
        Regex::new(r"(?i)^action required:\s").unwrap(),
    ]
});

static STAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\*\s").unwrap());

/// Returns the first line of the release note stanza found in `s`, which
/// may be a commit message, a PR description, etc.
pub fn note_text_from_string(s: &str) -> Result<String> {
    for re in NOTE_FENCE_REGEXES.iter() {
        if let Some(captures) = re.captures(s) {
            let note = &captures["note"];
            let note = note.strip_suffix('\r').unwrap_or(note);
            let note = strip_action_required(note);
            return Ok(strip_star(&note));
        }
    }

    Err(ReleaseNotesError::no_match(
        "no matches found when parsing note text from commit string",
    ))
}

fn strip_action_required(note: &str) -> String {
    let mut note = note.to_string();
    for re in ACTION_REQUIRED_REGEXES.iter() {
        note = re.replace(&note, "").to_string();
    }
    note
}

fn strip_star(note: &str) -> String {
    STAR_REGEX.replace(note, "").to_string()
}
