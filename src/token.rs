//! Token resolution chains.
//!
//! The original bootstrap resolved its token through optional-chaining
//! fallbacks on ambient environment reads. Here that is an explicit
//! ordered list of candidate sources, evaluated first-non-empty-wins.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A single candidate source for a secret value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenSource {
    /// Read from an environment variable.
    EnvVar(String),
    /// Read from a file (trimmed).
    File(PathBuf),
    /// Provided directly (for testing only).
    Direct(String),
}

impl TokenSource {
    /// Resolves this source, returning `None` when absent or empty.
    fn resolve(&self) -> Option<String> {
        let value = match self {
            TokenSource::EnvVar(name) => env::var(name).ok()?,
            TokenSource::File(path) => std::fs::read_to_string(path).ok()?.trim().to_string(),
            TokenSource::Direct(value) => value.clone(),
        };

        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

/// An ordered list of candidate sources. Earlier entries win.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenChain {
    sources: Vec<TokenSource>,
}

impl TokenChain {
    /// Creates a chain from the given sources.
    pub fn new(sources: Vec<TokenSource>) -> Self {
        Self { sources }
    }

    /// Chain of environment variable names, in precedence order.
    pub fn env_vars<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sources: names
                .into_iter()
                .map(|n| TokenSource::EnvVar(n.into()))
                .collect(),
        }
    }

    /// The default GitHub token chain: `GITHUB_TOKEN` wins over
    /// `INPUT_GITHUB_TOKEN`.
    pub fn github_token() -> Self {
        Self::env_vars(["GITHUB_TOKEN", "INPUT_GITHUB_TOKEN"])
    }

    /// The default AI API key chain.
    pub fn api_key() -> Self {
        Self::env_vars(["OPENAI_API_KEY"])
    }

    /// Resolves the chain: the first candidate with a non-empty value.
    pub fn resolve(&self) -> Option<String> {
        self.sources.iter().find_map(TokenSource::resolve)
    }

    /// Appends a candidate with lowest precedence.
    pub fn with_fallback(mut self, source: TokenSource) -> Self {
        self.sources.push(source);
        self
    }
}
