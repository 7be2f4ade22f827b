//! Configuration for GitHub API connections.
use secrecy::SecretString;

use crate::config::DEFAULT_API_URL;

/// Number of commits requested per page when walking a range.
pub const DEFAULT_PAGE_SIZE: u8 = 100;

/// Connection configuration used to authenticate against the forge.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of the REST API (e.g. "https://api.github.com").
    pub api_url: String,
    /// Access token for authentication.
    pub token: SecretString,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: SecretString::from("".to_string()),
        }
    }
}
