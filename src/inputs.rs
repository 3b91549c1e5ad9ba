//! Action input configuration.
//!
//! These model the action's declared inputs (normally sourced from
//! `action.yml` in a live run). Each maps to an `INPUT_*` environment
//! variable; numeric and boolean inputs are published in their string
//! encodings.

use serde::{Deserialize, Serialize};

/// Configured inputs for the review action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionInputs {
    /// AI provider identifier.
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum number of review comments to post.
    #[serde(default = "default_max_comments")]
    pub max_review_comments: u32,

    /// File-exclusion glob patterns.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Whether the action may approve reviews.
    #[serde(default)]
    pub approve_reviews: bool,

    /// Free-text project context handed to the reviewer.
    #[serde(default)]
    pub project_context: String,
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_comments() -> u32 {
    10
}

fn default_exclude() -> Vec<String> {
    vec!["**/*.md".to_string(), "**/*.json".to_string()]
}

impl Default for ActionInputs {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            max_review_comments: default_max_comments(),
            exclude: default_exclude(),
            approve_reviews: false,
            project_context: String::new(),
        }
    }
}

impl ActionInputs {
    /// Sets the provider.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    /// Sets the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the comment limit.
    pub fn with_max_review_comments(mut self, limit: u32) -> Self {
        self.max_review_comments = limit;
        self
    }

    /// Sets the exclusion globs.
    pub fn with_exclude<I, S>(mut self, globs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = globs.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the approve flag.
    pub fn with_approve_reviews(mut self, approve: bool) -> Self {
        self.approve_reviews = approve;
        self
    }

    /// Sets the project context.
    pub fn with_project_context(mut self, context: impl Into<String>) -> Self {
        self.project_context = context.into();
        self
    }

    /// String encoding of the comment limit.
    pub fn max_review_comments_str(&self) -> String {
        self.max_review_comments.to_string()
    }

    /// Comma-separated encoding of the exclusion globs.
    pub fn exclude_str(&self) -> String {
        self.exclude.join(",")
    }

    /// String encoding of the approve flag.
    pub fn approve_reviews_str(&self) -> &'static str {
        if self.approve_reviews {
            "true"
        } else {
            "false"
        }
    }

    /// Applies scenario overrides on top of these inputs.
    pub fn with_overrides(mut self, overrides: &InputOverrides) -> Self {
        if let Some(provider) = &overrides.provider {
            self.provider = provider.clone();
        }
        if let Some(model) = &overrides.model {
            self.model = model.clone();
        }
        if let Some(limit) = overrides.max_review_comments {
            self.max_review_comments = limit;
        }
        if let Some(exclude) = &overrides.exclude {
            self.exclude = exclude.clone();
        }
        if let Some(approve) = overrides.approve_reviews {
            self.approve_reviews = approve;
        }
        if let Some(context) = &overrides.project_context {
            self.project_context = context.clone();
        }
        self
    }
}

/// Partial inputs from a scenario descriptor. `None` means "keep the
/// default".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputOverrides {
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub max_review_comments: Option<u32>,
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
    #[serde(default)]
    pub approve_reviews: Option<bool>,
    #[serde(default)]
    pub project_context: Option<String>,
}
