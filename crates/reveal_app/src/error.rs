//! Error types for reveal_app

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while mounting or driving a page
#[derive(Error, Debug)]
pub enum PageError {
    /// Configuration or lifecycle error from the motion layer
    #[error(transparent)]
    Core(#[from] reveal_core::Error),

    /// Event script could not be read
    #[error("Failed to read script {}: {source}", .path.display())]
    ScriptIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Event script is not valid TOML or holds an unknown event
    #[error("Failed to parse script: {0}")]
    ScriptParse(#[from] toml::de::Error),

    /// Layout event with unusable geometry
    #[error("Invalid layout for '{element}': {reason}")]
    InvalidLayout { element: String, reason: String },
}

/// Result type for reveal_app operations
pub type Result<T> = std::result::Result<T, PageError>;
