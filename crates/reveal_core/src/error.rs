//! Error types

use std::path::PathBuf;

use thiserror::Error;

/// Configuration and lifecycle errors
///
/// Runtime signals (intersection, scroll, timer ticks) never fail. Only
/// configuration misuse that cannot be clamped into a sane value ends up here.
#[derive(Error, Debug)]
pub enum Error {
    /// Config file could not be read
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML or does not match the schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config parsed but holds values that cannot be used
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Scroll input range ends before it starts
    #[error("Invalid scroll range: start {start} is after end {end}")]
    InvertedScrollRange { start: f32, end: f32 },

    /// Scroll input range has an infinite or NaN bound
    #[error("Invalid scroll range: bounds {start}..{end} must be finite")]
    NonFiniteScrollRange { start: f32, end: f32 },

    /// Scroll anchor string could not be parsed
    #[error("Invalid scroll anchor '{0}', expected \"<element-edge> <viewport-edge>\"")]
    InvalidAnchor(String),

    /// The process-wide navigation chrome is already mounted
    #[error("Navigation chrome is already mounted")]
    NavChromeMounted,
}

/// Result type for Reveal operations
pub type Result<T> = std::result::Result<T, Error>;
