//! Access to the remote repository host.
//!
//! The notes pipeline only needs to fetch commits, pull requests and
//! issues, expressed by the [`traits::Forge`] trait. [`github::Github`]
//! implements it on top of the GitHub REST API.

/// Connection configuration for the GitHub API.
pub mod config;

/// GitHub API client implementation.
pub mod github;

/// The collaborator interface consumed by the notes pipeline.
pub mod traits;

/// Commits, pull requests, issues and the requests used to fetch them.
pub mod types;
