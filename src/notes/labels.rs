//! Helpers for classifying pull requests and issues by their labels.
use crate::{config::ACTION_REQUIRED_LABEL, forge::types::PullRequest};

pub const AREA_PREFIX: &str = "area/";
pub const KIND_PREFIX: &str = "kind/";
pub const SIG_PREFIX: &str = "sig/";

/// Returns the suffix of every label starting with `prefix`, without
/// duplicates, in the order they were encountered.
pub fn strings_with_prefix(labels: &[String], prefix: &str) -> Vec<String> {
    let mut found: Vec<String> = vec![];

    for label in labels {
        if let Some(suffix) = label.strip_prefix(prefix)
            && !found.iter().any(|f| f == suffix)
        {
            found.push(suffix.to_string());
        }
    }

    found
}

pub fn has_string(labels: &[String], value: &str) -> bool {
    labels.iter().any(|l| l == value)
}

pub fn areas(labels: &[String]) -> Vec<String> {
    strings_with_prefix(labels, AREA_PREFIX)
}

pub fn kinds(labels: &[String]) -> Vec<String> {
    strings_with_prefix(labels, KIND_PREFIX)
}

pub fn sigs(labels: &[String]) -> Vec<String> {
    strings_with_prefix(labels, SIG_PREFIX)
}

/// Whether the pull request carries the action required label.
pub fn is_action_required(pr: &PullRequest) -> bool {
    has_string(&pr.labels, ACTION_REQUIRED_LABEL)
}

/// Formats SIG names for display, e.g. `sig/api, sig/ui`. Returns an empty
/// string when there are no SIGs.
pub fn prettify_sig_list(sigs: &[String]) -> String {
    sigs.iter()
        .map(|s| format!("{SIG_PREFIX}{s}"))
        .collect::<Vec<String>>()
        .join(", ")
}
