//! Configuration validation.
//!
//! Validates harness configuration before any environment mutation to
//! catch errors early.

use crate::bootstrap::BootstrapConfig;
use crate::error::{Error, Result};
use crate::inputs::ActionInputs;

/// Known AI provider identifiers.
pub const KNOWN_PROVIDERS: &[&str] = &["openai", "anthropic", "azure", "google"];

/// Validation result containing all found issues.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// List of validation errors (fatal).
    pub errors: Vec<String>,
    /// List of validation warnings (non-fatal).
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Returns true if validation passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Adds an error to the result.
    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Adds a warning to the result.
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Merges another validation result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Converts to a Result, failing if there are errors.
    pub fn into_result(self) -> Result<Vec<String>> {
        if self.is_valid() {
            Ok(self.warnings)
        } else {
            Err(Error::Config(self.errors.join("; ")))
        }
    }
}

/// Trait for validatable configuration types.
pub trait Validate {
    /// Validates the configuration and returns any issues found.
    fn validate(&self) -> ValidationResult;
}

impl Validate for ActionInputs {
    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.model.trim().is_empty() {
            result.add_error("model cannot be empty");
        }

        if !KNOWN_PROVIDERS.contains(&self.provider.as_str()) {
            result.add_warning(format!("unknown provider '{}'", self.provider));
        }

        if self.max_review_comments == 0 {
            result.add_warning("max_review_comments = 0 means no comments will be posted");
        }

        for glob in &self.exclude {
            if glob.contains(',') {
                result.add_error(format!(
                    "exclude glob '{}' contains a comma and would split on encoding",
                    glob
                ));
            }
        }

        result
    }
}

impl Validate for BootstrapConfig {
    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.repository.trim().is_empty() {
            result.add_error("repository cannot be empty");
        } else {
            let parts: Vec<&str> = self.repository.split('/').collect();
            if parts.len() != 2 || parts.iter().any(|p| p.is_empty()) {
                result.add_error(format!(
                    "repository '{}' is not in owner/name form",
                    self.repository
                ));
            }
        }

        if !self.workspace.exists() {
            result.add_warning(format!(
                "workspace '{}' does not exist",
                self.workspace.display()
            ));
        }

        result.merge(self.inputs.validate());
        result
    }
}
