//! Error types for release note generation.

use thiserror::Error;

/// Main error type for release note operations.
#[derive(Error, Debug)]
pub enum ReleaseNotesError {
    // Cli args errors
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Extraction errors
    #[error("No matches found: {0}")]
    NoMatch(String),

    #[error(
        "error parsing release note from commit {sha}: {source}"
    )]
    Commit {
        sha: String,
        #[source]
        source: Box<ReleaseNotesError>,
    },

    // Forge errors
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forge operation failed: {0}")]
    ForgeError(String),

    #[error("API authentication failed: {0}")]
    AuthenticationError(String),

    #[error("API rate limit exceeded")]
    RateLimitExceeded,

    #[error("Request cancelled before reaching the forge")]
    Cancelled,

    // Parsing errors - automatic conversions via #[from]
    #[error("Invalid number: {0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error("Datetime parse error: {0}")]
    ChronoParseError(#[from] chrono::ParseError),

    #[error("Template rendering failed: {0}")]
    TemplateError(#[from] tera::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] log::SetLoggerError),

    // Generic wrapper for other errors
    #[error(transparent)]
    Other(#[from] color_eyre::Report),
}

/// Result type alias using ReleaseNotesError
pub type Result<T> = std::result::Result<T, ReleaseNotesError>;

impl ReleaseNotesError {
    /// Create a no-match error for an extraction that found nothing
    pub fn no_match(msg: impl Into<String>) -> Self {
        Self::NoMatch(msg.into())
    }

    /// Create a forge error with context
    pub fn forge(msg: impl Into<String>) -> Self {
        Self::ForgeError(msg.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_args(msg: impl Into<String>) -> Self {
        Self::InvalidArgs(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Wrap an error with the SHA of the commit being processed
    pub fn commit(sha: impl Into<String>, source: ReleaseNotesError) -> Self {
        Self::Commit {
            sha: sha.into(),
            source: Box::new(source),
        }
    }

    /// True when an extraction regex found nothing
    pub fn is_no_match(&self) -> bool {
        match self {
            Self::NoMatch(_) => true,
            Self::Commit { source, .. } => source.is_no_match(),
            _ => false,
        }
    }

    /// Whether a failure while processing a single commit may be logged and
    /// skipped. Startup and cancellation failures are never recoverable.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidArgs(_)
            | Self::InvalidConfig(_)
            | Self::Cancelled
            | Self::LoggerError(_) => false,
            Self::Commit { source, .. } => source.is_recoverable(),
            _ => true,
        }
    }
}

// Implement From for std::io::Error - wraps in Other variant for generic I/O errors
impl From<std::io::Error> for ReleaseNotesError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(color_eyre::Report::from(err))
    }
}

// Implement From for octocrab errors (GitHub API)
impl From<octocrab::Error> for ReleaseNotesError {
    fn from(err: octocrab::Error) -> Self {
        match &err {
            octocrab::Error::GitHub { source, .. }
                if source.message.contains("rate limit") =>
            {
                Self::RateLimitExceeded
            }
            octocrab::Error::GitHub { source, .. }
                if source.status_code == reqwest::StatusCode::NOT_FOUND =>
            {
                Self::NotFound(source.message.clone())
            }
            octocrab::Error::GitHub { source, .. }
                if source.status_code == reqwest::StatusCode::UNAUTHORIZED
                    || source.status_code == reqwest::StatusCode::FORBIDDEN =>
            {
                Self::AuthenticationError(source.message.clone())
            }
            _ => Self::ForgeError(format!("GitHub API error: {}", err)),
        }
    }
}
