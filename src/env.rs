//! The derived process environment.
//!
//! Instead of mutating ambient state one variable at a time, the
//! bootstrap builds an explicit `ActionEnv` value and publishes it in
//! one pass. The token alias is copied from the already-resolved token
//! field, so the read-after-write ordering hazard of env-by-env
//! assignment cannot occur.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::fixture::PrPayload;
use crate::inputs::ActionInputs;

/// Environment variable names in the entrypoint contract.
pub mod names {
    pub const GITHUB_EVENT_PATH: &str = "GITHUB_EVENT_PATH";
    pub const GITHUB_WORKSPACE: &str = "GITHUB_WORKSPACE";
    pub const GITHUB_REPOSITORY: &str = "GITHUB_REPOSITORY";
    pub const GITHUB_CONTEXT: &str = "GITHUB_CONTEXT";
    pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
    pub const INPUT_GITHUB_TOKEN: &str = "INPUT_GITHUB_TOKEN";
    pub const INPUT_AI_PROVIDER: &str = "INPUT_AI_PROVIDER";
    pub const INPUT_AI_API_KEY: &str = "INPUT_AI_API_KEY";
    pub const INPUT_AI_MODEL: &str = "INPUT_AI_MODEL";
    pub const INPUT_REVIEW_MAX_COMMENTS: &str = "INPUT_REVIEW_MAX_COMMENTS";
    pub const INPUT_EXCLUDE: &str = "INPUT_EXCLUDE";
    pub const INPUT_APPROVE_REVIEWS: &str = "INPUT_APPROVE_REVIEWS";
    pub const INPUT_REVIEW_PROJECT_CONTEXT: &str = "INPUT_REVIEW_PROJECT_CONTEXT";

    /// Every `INPUT_*` variable the bootstrap may publish.
    pub const INPUT_VARS: &[&str] = &[
        INPUT_GITHUB_TOKEN,
        INPUT_AI_PROVIDER,
        INPUT_AI_API_KEY,
        INPUT_AI_MODEL,
        INPUT_REVIEW_MAX_COMMENTS,
        INPUT_EXCLUDE,
        INPUT_APPROVE_REVIEWS,
        INPUT_REVIEW_PROJECT_CONTEXT,
    ];
}

/// The complete environment handed to the action entrypoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEnv {
    /// Path to the event payload file.
    pub event_path: PathBuf,

    /// Workspace root (the repository checkout).
    pub workspace: PathBuf,

    /// Repository identifier, `owner/name`.
    pub repository: String,

    /// Serialized `GITHUB_CONTEXT` envelope (`event` + `payload`).
    pub context: String,

    /// Resolved authentication token. `None` leaves both the token
    /// variable and its input alias unset.
    pub token: Option<String>,

    /// Resolved AI API key.
    pub api_key: Option<String>,

    /// Configured action inputs.
    pub inputs: ActionInputs,

    /// Extra variables from the scenario, published after the
    /// contract set in sorted order.
    #[serde(default)]
    pub extra: Vec<(String, String)>,
}

impl ActionEnv {
    /// Derives the environment for a loaded payload.
    pub fn derive(
        payload: &PrPayload,
        workspace: PathBuf,
        repository: impl Into<String>,
        token: Option<String>,
        api_key: Option<String>,
        inputs: ActionInputs,
    ) -> Self {
        Self {
            event_path: payload.path.clone(),
            workspace,
            repository: repository.into(),
            context: payload.context_string(),
            token,
            api_key,
            inputs,
            extra: Vec::new(),
        }
    }

    /// Adds scenario-provided extra variables, sorted by name for a
    /// deterministic publication order.
    pub fn with_extra<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.extra = vars.into_iter().collect();
        self.extra.sort();
        self
    }

    /// Returns every variable in publication order.
    ///
    /// The token precedes its input alias; both are omitted entirely
    /// when no source resolved, rather than published empty.
    pub fn vars(&self) -> Vec<(String, String)> {
        let mut vars = vec![
            (
                names::GITHUB_EVENT_PATH.to_string(),
                self.event_path.display().to_string(),
            ),
            (
                names::GITHUB_WORKSPACE.to_string(),
                self.workspace.display().to_string(),
            ),
            (names::GITHUB_REPOSITORY.to_string(), self.repository.clone()),
            (names::GITHUB_CONTEXT.to_string(), self.context.clone()),
        ];

        if let Some(token) = &self.token {
            vars.push((names::GITHUB_TOKEN.to_string(), token.clone()));
            vars.push((names::INPUT_GITHUB_TOKEN.to_string(), token.clone()));
        }

        vars.push((
            names::INPUT_AI_PROVIDER.to_string(),
            self.inputs.provider.clone(),
        ));

        if let Some(api_key) = &self.api_key {
            vars.push((names::INPUT_AI_API_KEY.to_string(), api_key.clone()));
        }

        vars.push((names::INPUT_AI_MODEL.to_string(), self.inputs.model.clone()));
        vars.push((
            names::INPUT_REVIEW_MAX_COMMENTS.to_string(),
            self.inputs.max_review_comments_str(),
        ));
        vars.push((names::INPUT_EXCLUDE.to_string(), self.inputs.exclude_str()));
        vars.push((
            names::INPUT_APPROVE_REVIEWS.to_string(),
            self.inputs.approve_reviews_str().to_string(),
        ));
        vars.push((
            names::INPUT_REVIEW_PROJECT_CONTEXT.to_string(),
            self.inputs.project_context.clone(),
        ));

        vars.extend(self.extra.iter().cloned());
        vars
    }

    /// Publishes every variable to the process environment.
    ///
    /// Applying the same environment twice leaves the process in the
    /// same state as applying it once.
    pub fn apply(&self) {
        for (name, value) in self.vars() {
            std::env::set_var(name, value);
        }
    }
}
