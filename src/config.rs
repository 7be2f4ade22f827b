//! Configuration for release note generation.
//!
//! Defaults are named constants. Callers override them per call through
//! [`ApiOptions`], which resolves into an immutable [`GithubApiConfig`], and
//! the binary can additionally read an optional `release-notes.toml`
//! [`Settings`] file.
use serde::Deserialize;
use std::path::Path;
use tokio_util::sync::CancellationToken;

use crate::error::{ReleaseNotesError, Result};

/// Default GitHub organization scraped for release notes.
pub const DEFAULT_ORG: &str = "netdata";
/// Default GitHub repository scraped for release notes.
pub const DEFAULT_REPO: &str = "netdata";
/// Default branch whose history is walked.
pub const DEFAULT_BRANCH: &str = "master";
/// Login of the bot account whose commits never produce notes.
pub const DEFAULT_BOT_LOGIN: &str = "netdatabot";
/// Base URL for author and pull request links.
pub const DEFAULT_WEB_URL: &str = "https://github.com";
/// Base URL of the GitHub REST API.
pub const DEFAULT_API_URL: &str = "https://api.github.com";
/// Label marking a pull request as needing consumer attention.
pub const ACTION_REQUIRED_LABEL: &str = "release-note-action-required";
/// Settings file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "release-notes.toml";

/// Where the text of a release note is taken from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoteSource {
    /// First line of the commit message with the `(#123)` marker removed.
    #[default]
    CommitTitle,
    /// The fenced `release-note` stanza of the pull request body. Not used
    /// unless explicitly selected.
    PullRequestBody,
}

/// Optional per-call overrides. Unset fields keep their defaults.
#[derive(Debug, Clone, Default)]
pub struct ApiOptions {
    /// Cancellation handle checked before every remote call.
    pub context: Option<CancellationToken>,
    pub organization: Option<String>,
    pub repository: Option<String>,
    pub branch: Option<String>,
    pub web_url: Option<String>,
    pub bot_logins: Option<Vec<String>>,
    pub note_source: Option<NoteSource>,
}

/// Request context resolved from [`ApiOptions`]. Built once per top-level
/// call and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct GithubApiConfig {
    context: CancellationToken,
    pub org: String,
    pub repo: String,
    pub branch: String,
    pub web_url: String,
    pub bot_logins: Vec<String>,
    pub note_source: NoteSource,
}

impl Default for GithubApiConfig {
    fn default() -> Self {
        Self {
            context: CancellationToken::new(),
            org: DEFAULT_ORG.to_string(),
            repo: DEFAULT_REPO.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            web_url: DEFAULT_WEB_URL.to_string(),
            bot_logins: vec![DEFAULT_BOT_LOGIN.to_string()],
            note_source: NoteSource::default(),
        }
    }
}

impl GithubApiConfig {
    /// Apply every set override onto the defaults.
    pub fn from_options(options: &ApiOptions) -> Self {
        let mut config = Self::default();

        if let Some(context) = &options.context {
            config.context = context.clone();
        }
        if let Some(org) = &options.organization {
            config.org = org.clone();
        }
        if let Some(repo) = &options.repository {
            config.repo = repo.clone();
        }
        if let Some(branch) = &options.branch {
            config.branch = branch.clone();
        }
        if let Some(web_url) = &options.web_url {
            config.web_url = web_url.trim_end_matches('/').to_string();
        }
        if let Some(bot_logins) = &options.bot_logins {
            config.bot_logins = bot_logins.clone();
        }
        if let Some(note_source) = options.note_source {
            config.note_source = note_source;
        }

        config
    }

    /// Fails with [`ReleaseNotesError::Cancelled`] once the caller has
    /// cancelled the context. Checked at every remote call boundary.
    pub fn ensure_active(&self) -> Result<()> {
        if self.context.is_cancelled() {
            return Err(ReleaseNotesError::Cancelled);
        }
        Ok(())
    }

    pub fn is_bot(&self, login: &str) -> bool {
        self.bot_logins.iter().any(|b| b == login)
    }

    pub fn author_url(&self, login: &str) -> String {
        format!("{}/{}", self.web_url, login)
    }

    pub fn pr_url(&self, number: u64) -> String {
        format!("{}/{}/{}/pull/{}", self.web_url, self.org, self.repo, number)
    }
}

/// Contents of the optional `release-notes.toml` settings file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)] // Use default for missing fields
pub struct Settings {
    /// GitHub organization (defaults to [`DEFAULT_ORG`]).
    pub organization: Option<String>,
    /// GitHub repository (defaults to [`DEFAULT_REPO`]).
    pub repository: Option<String>,
    /// Branch to walk (defaults to [`DEFAULT_BRANCH`]).
    pub branch: Option<String>,
    /// Base URL for author and pull request links.
    pub web_url: Option<String>,
    /// Base URL of the GitHub API, for GitHub Enterprise installs.
    pub api_url: Option<String>,
    /// Commit authors whose commits are always skipped.
    pub bot_logins: Option<Vec<String>>,
    /// Where note text is read from.
    pub note_source: Option<NoteSource>,
    /// Tera template overriding the built-in markdown document.
    pub template: Option<String>,
}

impl Settings {
    /// Parse settings from TOML content.
    pub fn parse(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from `path`, or from [`DEFAULT_CONFIG_FILE`] when no
    /// path is given. A missing default file yields default settings, a
    /// missing explicit file is an error.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };

        if !path.exists() {
            if explicit {
                return Err(ReleaseNotesError::invalid_args(format!(
                    "settings file not found: {}",
                    path.display()
                )));
            }

            log::debug!(
                "no settings file found at {}: using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        log::info!("loading settings from {}", path.display());
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse(&content)
    }

    fn validate(&self) -> Result<()> {
        for url in [&self.web_url, &self.api_url].into_iter().flatten() {
            url::Url::parse(url).map_err(|e| {
                ReleaseNotesError::invalid_config(format!(
                    "invalid url {url}: {e}"
                ))
            })?;
        }
        Ok(())
    }
}
