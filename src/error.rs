//! Error types for the edges of the simulation.
//!
//! Nothing inside a tick returns an error: missing targets, bad frame times
//! and repeated removals are all handled locally. Errors only surface while
//! loading sprite sheets or reading configuration.

use thiserror::Error;

/// Failure to resolve a sprite sheet into an animation clip.
#[derive(Debug, Error, PartialEq)]
pub enum AssetError {
    /// The provider has no sheet registered under this name.
    #[error("unknown sprite sheet `{0}`")]
    UnknownSheet(String),
    /// A sheet was requested with zero rows or zero columns.
    #[error("sprite sheet `{name}` requested with an empty {rows}x{columns} grid")]
    EmptyGrid {
        name: String,
        rows: usize,
        columns: usize,
    },
}

/// Invalid or unreadable tank configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field holds a value the simulation cannot run with.
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
    #[error("failed to read configuration file")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration")]
    Parse(#[from] serde_json::Error),
}
