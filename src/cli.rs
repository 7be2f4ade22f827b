//! CLI argument parsing and run configuration.
use clap::{Parser, ValueEnum};
use secrecy::SecretString;
use std::{env, path::PathBuf};

use crate::{
    config::{ApiOptions, DEFAULT_API_URL, Settings},
    error::{ReleaseNotesError, Result},
    forge::config::RemoteConfig,
};

/// Output format of the generated release notes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Markdown document grouped by category.
    #[default]
    Markdown,
    /// JSON array of release notes.
    Json,
}

/// Generate release notes for a range of commits of a GitHub repository.
#[derive(Parser, Debug, Default)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value = "")]
    /// GitHub personal access token (required). Falls back to GITHUB_TOKEN
    /// env var.
    pub github_token: String,

    #[arg(long, default_value = "")]
    /// The commit hash to start at. Falls back to START_SHA env var.
    pub start_sha: String,

    #[arg(long, default_value = "")]
    /// The commit hash to end at. Falls back to END_SHA env var.
    pub end_sha: String,

    #[arg(long)]
    /// GitHub organization owning the repository.
    pub org: Option<String>,

    #[arg(long)]
    /// GitHub repository name.
    pub repo: Option<String>,

    #[arg(long)]
    /// Branch whose history is walked.
    pub branch: Option<String>,

    #[arg(long)]
    /// GitHub API base URL, for GitHub Enterprise installs.
    pub api_url: Option<String>,

    #[arg(long)]
    /// TOML settings file. Defaults to release-notes.toml when present.
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    /// Output format.
    pub format: OutputFormat,

    #[arg(long, default_value_t = false)]
    /// Enable debug logging.
    pub debug: bool,
}

/// Everything needed for one run, validated.
#[derive(Debug)]
pub struct RunConfig {
    pub remote: RemoteConfig,
    pub start_sha: String,
    pub end_sha: String,
    pub options: ApiOptions,
    pub template: Option<String>,
    pub format: OutputFormat,
}

/// Use `value` when set, otherwise the environment variable `var`.
fn with_env_fallback(value: &str, var: &str) -> String {
    if value.is_empty()
        && let Ok(env_value) = env::var(var)
    {
        return env_value;
    }
    value.to_string()
}

impl Args {
    /// Merge CLI arguments, environment variables and settings file into a
    /// [`RunConfig`]. Arguments take precedence over the settings file.
    pub fn resolve(&self, settings: Settings) -> Result<RunConfig> {
        let token = with_env_fallback(&self.github_token, "GITHUB_TOKEN");
        if token.is_empty() {
            return Err(ReleaseNotesError::invalid_args(
                "GitHub token must be set via --github-token or $GITHUB_TOKEN",
            ));
        }

        let start_sha = with_env_fallback(&self.start_sha, "START_SHA");
        if start_sha.is_empty() {
            return Err(ReleaseNotesError::invalid_args(
                "the starting commit hash must be set via --start-sha or $START_SHA",
            ));
        }

        let end_sha = with_env_fallback(&self.end_sha, "END_SHA");
        if end_sha.is_empty() {
            return Err(ReleaseNotesError::invalid_args(
                "the ending commit hash must be set via --end-sha or $END_SHA",
            ));
        }

        let api_url = self
            .api_url
            .clone()
            .or(settings.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        url::Url::parse(&api_url).map_err(|e| {
            ReleaseNotesError::invalid_args(format!(
                "invalid api url {api_url}: {e}"
            ))
        })?;

        let options = ApiOptions {
            context: None,
            organization: self.org.clone().or(settings.organization),
            repository: self.repo.clone().or(settings.repository),
            branch: self.branch.clone().or(settings.branch),
            web_url: settings.web_url,
            bot_logins: settings.bot_logins,
            note_source: settings.note_source,
        };

        Ok(RunConfig {
            remote: RemoteConfig {
                api_url,
                token: SecretString::from(token),
            },
            start_sha,
            end_sha,
            options,
            template: settings.template,
            format: self.format,
        })
    }
}
