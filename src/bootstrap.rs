//! The bootstrap procedure.
//!
//! One sequential, branchless pass: load the optional `.env` file,
//! load the fixture payload, derive the environment, publish it, then
//! hand off to the entrypoint. Any setup failure halts before the
//! entrypoint is invoked; no partial `INPUT_*` state is ever
//! published.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::entrypoint::{Entrypoint, EntrypointResult};
use crate::env::ActionEnv;
use crate::error::{Error, Result};
use crate::fixture::{payload_filename, PrPayload, Scenario};
use crate::inputs::ActionInputs;
use crate::secrets::Redactor;
use crate::token::TokenChain;
use crate::validate::Validate;

/// Default repository identifier published as `GITHUB_REPOSITORY`.
pub const DEFAULT_REPOSITORY: &str = "demandio/simplycodes-extension";

/// Configuration for one bootstrap run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Workspace root, published as `GITHUB_WORKSPACE`.
    pub workspace: PathBuf,

    /// Directory holding payload fixtures.
    pub fixtures_dir: PathBuf,

    /// Repository identifier, `owner/name`.
    pub repository: String,

    /// Explicit `.env` file path. `None` uses the conventional lookup
    /// from the current directory.
    pub env_file: Option<PathBuf>,

    /// Token resolution chain for `GITHUB_TOKEN`.
    pub token_chain: TokenChain,

    /// Resolution chain for the AI API key.
    pub api_key_chain: TokenChain,

    /// Action inputs.
    pub inputs: ActionInputs,
}

impl BootstrapConfig {
    /// Creates a config rooted at the given workspace. Fixtures are
    /// expected under `tests/pull-requests` by convention.
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        let workspace = workspace.into();
        let fixtures_dir = workspace.join("tests").join("pull-requests");
        Self {
            workspace,
            fixtures_dir,
            repository: DEFAULT_REPOSITORY.to_string(),
            env_file: None,
            token_chain: TokenChain::github_token(),
            api_key_chain: TokenChain::api_key(),
            inputs: ActionInputs::default(),
        }
    }

    /// Creates a config from the directory holding the test scripts.
    /// The workspace resolves one directory above it, fixtures to its
    /// `pull-requests` subdirectory.
    pub fn from_script_dir(script_dir: impl Into<PathBuf>) -> Self {
        let script_dir = script_dir.into();
        let workspace = script_dir
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| script_dir.clone());

        let mut config = Self::new(workspace);
        config.fixtures_dir = script_dir.join("pull-requests");
        config
    }

    /// Sets the repository identifier.
    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = repository.into();
        self
    }

    /// Sets an explicit `.env` file path.
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self
    }

    /// Sets the fixtures directory.
    pub fn with_fixtures_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fixtures_dir = dir.into();
        self
    }

    /// Sets the token chain.
    pub fn with_token_chain(mut self, chain: TokenChain) -> Self {
        self.token_chain = chain;
        self
    }

    /// Sets the API key chain.
    pub fn with_api_key_chain(mut self, chain: TokenChain) -> Self {
        self.api_key_chain = chain;
        self
    }

    /// Sets the action inputs.
    pub fn with_inputs(mut self, inputs: ActionInputs) -> Self {
        self.inputs = inputs;
        self
    }

    /// Resolves the payload path for a PR number.
    pub fn payload_path(&self, number: u64) -> PathBuf {
        self.fixtures_dir.join(payload_filename(number))
    }
}

/// Result of a completed bootstrap run.
#[derive(Debug)]
pub struct BootstrapResult {
    /// Unique id for this run.
    pub run_id: String,
    /// The environment that was published.
    pub env: ActionEnv,
    /// PR number from the fixture, when present.
    pub pr_number: Option<u64>,
    /// Entrypoint result.
    pub entrypoint: EntrypointResult,
}

/// Runs the bootstrap procedure.
pub struct Bootstrapper {
    config: BootstrapConfig,
}

impl Bootstrapper {
    /// Creates a bootstrapper with the given configuration.
    pub fn new(config: BootstrapConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Prepares the environment for the payload at the given path
    /// without publishing anything.
    ///
    /// This is the fail-fast half of the bootstrap: config validation
    /// and fixture loading happen here, before any mutation.
    pub fn prepare(&self, payload_path: &Path) -> Result<ActionEnv> {
        self.load_env_file();

        let warnings = self.config.validate().into_result()?;
        for warning in warnings {
            tracing::warn!("{}", warning);
        }

        let payload = PrPayload::load(payload_path)?;

        // Chains are resolved after the .env load so file-provided
        // values participate.
        let token = self.config.token_chain.resolve();
        let api_key = self.config.api_key_chain.resolve();

        if token.is_none() {
            tracing::warn!("no token resolved; GITHUB_TOKEN and its alias stay unset");
        }

        Ok(ActionEnv::derive(
            &payload,
            self.config.workspace.clone(),
            self.config.repository.clone(),
            token,
            api_key,
            self.config.inputs.clone(),
        ))
    }

    /// Bootstraps for a PR number and invokes the entrypoint.
    pub async fn run(&self, number: u64, entrypoint: &dyn Entrypoint) -> Result<BootstrapResult> {
        let env = self.prepare(&self.config.payload_path(number))?;
        self.publish_and_invoke(env, entrypoint).await
    }

    /// Bootstraps from a scenario descriptor and invokes the entrypoint.
    pub async fn run_scenario(
        &self,
        scenario: &Scenario,
        entrypoint: &dyn Entrypoint,
    ) -> Result<BootstrapResult> {
        let mut config = self.config.clone();
        config.inputs = config.inputs.with_overrides(&scenario.inputs);

        let runner = Bootstrapper::new(config);
        let payload_path = scenario.payload_path(&runner.config.fixtures_dir);

        let env = runner
            .prepare(&payload_path)?
            .with_extra(scenario.env.clone());

        tracing::info!(scenario = %scenario.name, "bootstrapping scenario");
        runner.publish_and_invoke(env, entrypoint).await
    }

    /// Publishes the environment and hands off to the entrypoint.
    async fn publish_and_invoke(
        &self,
        env: ActionEnv,
        entrypoint: &dyn Entrypoint,
    ) -> Result<BootstrapResult> {
        let run_id = uuid::Uuid::new_v4().to_string();

        let mut redactor = Redactor::new();
        redactor.learn_opt("GITHUB_TOKEN", env.token.as_deref());
        redactor.learn_opt("INPUT_AI_API_KEY", env.api_key.as_deref());

        for (name, value) in env.vars() {
            tracing::debug!(run_id = %run_id, "{}={}", name, redactor.redact(&value));
        }

        env.apply();

        let ctx: serde_json::Value =
            serde_json::from_str(&env.context).map_err(|e| Error::Config(e.to_string()))?;
        let pr_number = ctx["event"].get("number").and_then(|n| n.as_u64());

        tracing::info!(
            run_id = %run_id,
            entrypoint = %entrypoint.name(),
            repository = %env.repository,
            "environment published, invoking entrypoint"
        );

        let result = entrypoint.run(&env).await?;

        Ok(BootstrapResult {
            run_id,
            env,
            pr_number,
            entrypoint: result,
        })
    }

    /// Loads the `.env` file. Absence is tolerated silently, matching
    /// the original bootstrap's optional config load.
    fn load_env_file(&self) {
        let outcome = match &self.config.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| path.clone()),
            None => dotenvy::dotenv(),
        };

        match outcome {
            Ok(path) => tracing::debug!(path = ?path, "loaded .env file"),
            Err(e) => tracing::debug!(error = %e, "no .env file loaded"),
        }
    }
}
