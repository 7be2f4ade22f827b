pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod forge;
pub mod notes;

pub use config::ApiOptions;
pub use document::{Document, create_document, render_json, render_markdown};
pub use error::{ReleaseNotesError, Result};
pub use notes::{ReleaseNote, list_commits_with_notes, list_release_notes};
