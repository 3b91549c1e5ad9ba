//! Fixture payload loading and scenario descriptors.
//!
//! A fixture is a static pull-request webhook payload standing in for
//! a live CI event. The payload is owned by the downstream action; the
//! harness treats it as opaque JSON and only peeks at a couple of
//! fields for naming and logging.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::inputs::InputOverrides;

/// Returns the conventional payload filename for a PR number.
pub fn payload_filename(number: u64) -> String {
    format!("test-pr-payload-{}.json", number)
}

/// A pull-request event payload loaded from disk.
///
/// The raw JSON is kept verbatim; `number` and `title` are extracted
/// leniently and may be absent. No schema is enforced.
#[derive(Debug, Clone)]
pub struct PrPayload {
    /// Path the payload was loaded from.
    pub path: PathBuf,
    /// The raw payload, never mutated.
    pub raw: Value,
    /// PR number, if the payload carries one.
    pub number: Option<u64>,
    /// PR title, if the payload carries one.
    pub title: Option<String>,
}

impl PrPayload {
    /// Loads and parses a payload file.
    ///
    /// Read failures and parse failures are fatal: the bootstrap must
    /// abort rather than proceed with partial state.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let content = std::fs::read_to_string(&path).map_err(|source| Error::FixtureRead {
            path: path.clone(),
            source,
        })?;

        let raw: Value = serde_json::from_str(&content).map_err(|source| Error::FixtureParse {
            path: path.clone(),
            source,
        })?;

        let number = raw.get("number").and_then(Value::as_u64);
        let title = raw
            .get("title")
            .and_then(Value::as_str)
            .map(str::to_string);

        if number.is_none() {
            tracing::warn!(path = ?path, "payload has no 'number' field; number-derived paths unavailable");
        }

        Ok(Self {
            path,
            raw,
            number,
            title,
        })
    }

    /// Builds the `GITHUB_CONTEXT` envelope.
    ///
    /// Both the `event` and `payload` keys carry the identical fixture
    /// content; downstream code may read either name.
    pub fn context_json(&self) -> Value {
        serde_json::json!({
            "event": self.raw,
            "payload": self.raw,
        })
    }

    /// Serializes the context envelope to the string form the
    /// environment variable carries.
    pub fn context_string(&self) -> String {
        self.context_json().to_string()
    }
}

/// Where a scenario finds its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayloadRef {
    /// PR number, resolved to `test-pr-payload-<n>.json` under the
    /// configured fixtures directory.
    Number(u64),
    /// Explicit path, relative to the scenario file's directory.
    Path(PathBuf),
}

/// A scenario descriptor: one bootstrap run, declared in YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,

    /// Description of what this scenario exercises.
    #[serde(default)]
    pub description: String,

    /// The payload to bootstrap with.
    pub payload: PayloadRef,

    /// Action input overrides (defaults apply for anything omitted).
    #[serde(default)]
    pub inputs: InputOverrides,

    /// Extra environment variables to publish alongside the contract set.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Scenario {
    /// Loads a scenario from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(Error::Io)?;

        serde_yaml::from_str(&content)
            .map_err(|e| Error::Scenario(format!("failed to parse scenario: {}", e)))
    }

    /// Resolves the payload reference to a concrete path.
    pub fn payload_path(&self, fixtures_dir: &Path) -> PathBuf {
        match &self.payload {
            PayloadRef::Number(n) => fixtures_dir.join(payload_filename(*n)),
            PayloadRef::Path(p) => {
                if p.is_absolute() {
                    p.clone()
                } else {
                    fixtures_dir.join(p)
                }
            }
        }
    }
}
