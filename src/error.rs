//! Error types for the bootstrap harness.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for bootstrap operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Harness configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The fixture payload file could not be read.
    #[error("failed to read fixture {path}: {source}")]
    FixtureRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The fixture payload file is not valid JSON.
    #[error("failed to parse fixture {path}: {source}")]
    FixtureParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A scenario descriptor could not be parsed.
    #[error("invalid scenario: {0}")]
    Scenario(String),

    /// The downstream action entrypoint failed. Opaque: the failure is
    /// owned by the collaborator and propagated untranslated.
    #[error("entrypoint failed: {0}")]
    Entrypoint(String),

    /// IO error during harness operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for bootstrap operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True for failures that must abort the bootstrap before the
    /// entrypoint is invoked.
    pub fn is_setup_failure(&self) -> bool {
        !matches!(self, Error::Entrypoint(_))
    }
}
