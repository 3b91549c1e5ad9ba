//! Secret redaction for harness output.
//!
//! The harness logs the environment it publishes and streams the
//! entrypoint's output; resolved token and API-key values must never
//! appear in either.

use std::collections::HashMap;

/// Redacts known secret values from text.
#[derive(Debug, Default)]
pub struct Redactor {
    /// Known secrets (name -> value).
    secrets: HashMap<String, String>,
}

impl Redactor {
    /// Creates an empty redactor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a secret value under a name. Empty values are ignored.
    pub fn learn(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.secrets.insert(name.into(), value);
        }
    }

    /// Registers an optional secret value.
    pub fn learn_opt(&mut self, name: impl Into<String>, value: Option<&str>) {
        if let Some(value) = value {
            self.learn(name, value);
        }
    }

    /// Replaces every known secret value with `[REDACTED:<name>]`.
    pub fn redact(&self, text: &str) -> String {
        let mut result = text.to_string();

        for (name, value) in &self.secrets {
            result = result.replace(value, &format!("[REDACTED:{}]", name));
        }

        result
    }

    /// Returns true if any secrets are registered.
    pub fn has_secrets(&self) -> bool {
        !self.secrets.is_empty()
    }
}
