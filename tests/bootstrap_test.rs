//! Bootstrap integration tests.
//!
//! These exercise the full bootstrap contract over temporary
//! workspaces: fixture loading, environment derivation, publication
//! ordering, and entrypoint hand-off.
//!
//! Run with: `cargo test --test bootstrap_test`

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use review_harness::{
    names, ActionEnv, ActionInputs, BootstrapConfig, Bootstrapper, Entrypoint, EntrypointResult,
    Error, Scenario, TokenChain, TokenSource,
};

/// Serializes tests that read or mutate the process environment.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Builds a workspace with `tests/pull-requests/test-pr-payload-982.json`.
fn setup_workspace(dir: &Path) -> PathBuf {
    let workspace = dir.join("repo");
    let fixtures = workspace.join("tests").join("pull-requests");
    std::fs::create_dir_all(&fixtures).unwrap();
    std::fs::write(
        fixtures.join("test-pr-payload-982.json"),
        r#"{"number": 982, "title": "test", "base": {"ref": "main"}, "head": {"ref": "feature"}}"#,
    )
    .unwrap();
    workspace
}

fn direct_chain(value: &str) -> TokenChain {
    TokenChain::new(vec![TokenSource::Direct(value.to_string())])
}

/// Entrypoint double that records the environment it was handed.
#[derive(Default)]
struct RecordingEntrypoint {
    seen: Mutex<Option<ActionEnv>>,
}

impl RecordingEntrypoint {
    fn seen_env(&self) -> ActionEnv {
        self.seen.lock().unwrap().clone().expect("entrypoint was invoked")
    }
}

#[async_trait]
impl Entrypoint for RecordingEntrypoint {
    async fn run(&self, env: &ActionEnv) -> review_harness::Result<EntrypointResult> {
        *self.seen.lock().unwrap() = Some(env.clone());
        Ok(EntrypointResult {
            success: true,
            exit_code: Some(0),
            output_lines: 0,
        })
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Entrypoint double that always fails, opaquely.
struct FailingEntrypoint;

#[async_trait]
impl Entrypoint for FailingEntrypoint {
    async fn run(&self, _env: &ActionEnv) -> review_harness::Result<EntrypointResult> {
        Err(Error::Entrypoint("review blew up".to_string()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

fn bootstrapper_for(workspace: &Path) -> Bootstrapper {
    Bootstrapper::new(
        BootstrapConfig::new(workspace)
            .with_token_chain(direct_chain("ghp_primary"))
            .with_api_key_chain(direct_chain("sk-test")),
    )
}

#[tokio::test]
async fn context_envelope_matches_fixture() {
    let _guard = ENV_LOCK.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let workspace = setup_workspace(dir.path());

    let entrypoint = RecordingEntrypoint::default();
    let result = bootstrapper_for(&workspace)
        .run(982, &entrypoint)
        .await
        .unwrap();

    let fixture: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(workspace.join("tests/pull-requests/test-pr-payload-982.json"))
            .unwrap(),
    )
    .unwrap();

    let ctx: serde_json::Value = serde_json::from_str(&std::env::var(names::GITHUB_CONTEXT).unwrap()).unwrap();
    assert_eq!(ctx["event"], fixture);
    assert_eq!(ctx["payload"], fixture);
    assert_eq!(result.pr_number, Some(982));
}

#[tokio::test]
async fn event_path_and_workspace_follow_convention() {
    let _guard = ENV_LOCK.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let workspace = setup_workspace(dir.path());

    let entrypoint = RecordingEntrypoint::default();
    bootstrapper_for(&workspace)
        .run(982, &entrypoint)
        .await
        .unwrap();

    let env = entrypoint.seen_env();
    assert!(env
        .event_path
        .to_string_lossy()
        .ends_with("test-pr-payload-982.json"));
    // Workspace is one directory above the fixtures' tests/ dir.
    assert_eq!(env.workspace, workspace);
    assert_eq!(
        std::env::var(names::GITHUB_WORKSPACE).unwrap(),
        workspace.display().to_string()
    );
}

#[tokio::test]
async fn primary_token_wins_over_alias_source() {
    let _guard = ENV_LOCK.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let workspace = setup_workspace(dir.path());

    std::env::set_var("HARNESS_TEST_PRIMARY", "primary-token");
    std::env::set_var("HARNESS_TEST_SECONDARY", "secondary-token");

    let config = BootstrapConfig::new(&workspace)
        .with_token_chain(TokenChain::env_vars([
            "HARNESS_TEST_PRIMARY",
            "HARNESS_TEST_SECONDARY",
        ]))
        .with_api_key_chain(direct_chain("sk-test"));

    let entrypoint = RecordingEntrypoint::default();
    Bootstrapper::new(config)
        .run(982, &entrypoint)
        .await
        .unwrap();

    assert_eq!(std::env::var(names::GITHUB_TOKEN).unwrap(), "primary-token");
    assert_eq!(
        std::env::var(names::INPUT_GITHUB_TOKEN).unwrap(),
        "primary-token"
    );

    std::env::remove_var("HARNESS_TEST_PRIMARY");
    std::env::remove_var("HARNESS_TEST_SECONDARY");
}

#[tokio::test]
async fn secondary_token_fills_in_when_primary_absent() {
    let _guard = ENV_LOCK.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let workspace = setup_workspace(dir.path());

    std::env::set_var("HARNESS_TEST_ONLY_SECONDARY", "secondary-token");

    let config = BootstrapConfig::new(&workspace)
        .with_token_chain(TokenChain::env_vars([
            "HARNESS_TEST_UNSET_PRIMARY",
            "HARNESS_TEST_ONLY_SECONDARY",
        ]))
        .with_api_key_chain(direct_chain("sk-test"));

    let entrypoint = RecordingEntrypoint::default();
    Bootstrapper::new(config)
        .run(982, &entrypoint)
        .await
        .unwrap();

    // The alias is non-empty whenever either source is.
    assert_eq!(
        std::env::var(names::INPUT_GITHUB_TOKEN).unwrap(),
        "secondary-token"
    );

    std::env::remove_var("HARNESS_TEST_ONLY_SECONDARY");
}

#[tokio::test]
async fn missing_fixture_publishes_no_input_state() {
    let _guard = ENV_LOCK.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let workspace = setup_workspace(dir.path());

    for name in names::INPUT_VARS {
        std::env::remove_var(name);
    }

    let entrypoint = RecordingEntrypoint::default();
    let err = bootstrapper_for(&workspace)
        .run(404, &entrypoint)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::FixtureRead { .. }));
    assert!(entrypoint.seen.lock().unwrap().is_none());
    for name in names::INPUT_VARS {
        assert!(
            std::env::var(name).is_err(),
            "{} must stay unset after a failed bootstrap",
            name
        );
    }
}

#[tokio::test]
async fn rerunning_bootstrap_is_idempotent() {
    let _guard = ENV_LOCK.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let workspace = setup_workspace(dir.path());

    let bootstrapper = bootstrapper_for(&workspace);
    let entrypoint = RecordingEntrypoint::default();

    bootstrapper.run(982, &entrypoint).await.unwrap();
    let first: Vec<_> = entrypoint
        .seen_env()
        .vars()
        .iter()
        .map(|(n, _)| (n.clone(), std::env::var(n).unwrap()))
        .collect();

    bootstrapper.run(982, &entrypoint).await.unwrap();
    let second: Vec<_> = entrypoint
        .seen_env()
        .vars()
        .iter()
        .map(|(n, _)| (n.clone(), std::env::var(n).unwrap()))
        .collect();

    assert_eq!(first, second);
}

#[tokio::test]
async fn default_inputs_publish_expected_strings() {
    let _guard = ENV_LOCK.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let workspace = setup_workspace(dir.path());

    let entrypoint = RecordingEntrypoint::default();
    bootstrapper_for(&workspace)
        .run(982, &entrypoint)
        .await
        .unwrap();

    assert_eq!(std::env::var(names::INPUT_REVIEW_MAX_COMMENTS).unwrap(), "10");
    assert_eq!(std::env::var(names::INPUT_APPROVE_REVIEWS).unwrap(), "false");
    assert_eq!(
        std::env::var(names::INPUT_EXCLUDE).unwrap(),
        "**/*.md,**/*.json"
    );
    assert_eq!(std::env::var(names::INPUT_AI_PROVIDER).unwrap(), "openai");
    assert_eq!(std::env::var(names::INPUT_AI_MODEL).unwrap(), "gpt-4o-mini");
    assert_eq!(
        std::env::var(names::GITHUB_REPOSITORY).unwrap(),
        "demandio/simplycodes-extension"
    );
}

#[tokio::test]
async fn env_file_feeds_the_token_chain() {
    let _guard = ENV_LOCK.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let workspace = setup_workspace(dir.path());

    let env_file = workspace.join(".env");
    std::fs::write(&env_file, "HARNESS_TEST_DOTENV_TOKEN=from-dotenv\n").unwrap();

    let config = BootstrapConfig::new(&workspace)
        .with_env_file(&env_file)
        .with_token_chain(TokenChain::env_vars(["HARNESS_TEST_DOTENV_TOKEN"]))
        .with_api_key_chain(direct_chain("sk-test"));

    let entrypoint = RecordingEntrypoint::default();
    Bootstrapper::new(config)
        .run(982, &entrypoint)
        .await
        .unwrap();

    assert_eq!(std::env::var(names::GITHUB_TOKEN).unwrap(), "from-dotenv");

    std::env::remove_var("HARNESS_TEST_DOTENV_TOKEN");
}

#[tokio::test]
async fn absent_env_file_is_tolerated() {
    let _guard = ENV_LOCK.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let workspace = setup_workspace(dir.path());

    let config = BootstrapConfig::new(&workspace)
        .with_env_file(workspace.join("no-such.env"))
        .with_token_chain(direct_chain("tok"))
        .with_api_key_chain(direct_chain("sk-test"));

    let entrypoint = RecordingEntrypoint::default();
    let result = Bootstrapper::new(config).run(982, &entrypoint).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn entrypoint_failure_propagates_untranslated() {
    let _guard = ENV_LOCK.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let workspace = setup_workspace(dir.path());

    let err = bootstrapper_for(&workspace)
        .run(982, &FailingEntrypoint)
        .await
        .unwrap_err();

    match err {
        Error::Entrypoint(msg) => assert_eq!(msg, "review blew up"),
        other => panic!("expected entrypoint error, got {:?}", other),
    }
}

#[tokio::test]
async fn scenario_overrides_inputs_and_adds_env() {
    let _guard = ENV_LOCK.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let workspace = setup_workspace(dir.path());

    let scenario = Scenario::load(fixtures_dir().join("review-override.yaml"))
        .expect("failed to load scenario");

    let entrypoint = RecordingEntrypoint::default();
    bootstrapper_for(&workspace)
        .run_scenario(&scenario, &entrypoint)
        .await
        .unwrap();

    let env = entrypoint.seen_env();
    assert_eq!(env.inputs.provider, "anthropic");
    assert_eq!(env.inputs.max_review_comments, 5);
    assert_eq!(std::env::var(names::INPUT_AI_PROVIDER).unwrap(), "anthropic");
    assert_eq!(std::env::var(names::INPUT_REVIEW_MAX_COMMENTS).unwrap(), "5");
    assert_eq!(std::env::var("HARNESS_SCENARIO_FLAG").unwrap(), "on");

    std::env::remove_var("HARNESS_SCENARIO_FLAG");
}

#[tokio::test]
async fn scenario_defaults_fall_back_to_action_defaults() {
    let _guard = ENV_LOCK.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let workspace = setup_workspace(dir.path());

    let scenario =
        Scenario::load(fixtures_dir().join("smoke-review.yaml")).expect("failed to load scenario");

    let entrypoint = RecordingEntrypoint::default();
    bootstrapper_for(&workspace)
        .run_scenario(&scenario, &entrypoint)
        .await
        .unwrap();

    let env = entrypoint.seen_env();
    assert_eq!(env.inputs, ActionInputs::default());
}
