//! Action entrypoint invocation.
//!
//! The entrypoint is the external collaborator that performs the
//! actual review. It reads everything from the environment; the
//! harness additionally hands it the explicit `ActionEnv` so test
//! doubles can stay pure.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use crate::env::ActionEnv;
use crate::error::{Error, Result};
use crate::secrets::Redactor;

/// Result of an entrypoint invocation.
#[derive(Debug)]
pub struct EntrypointResult {
    /// Whether the entrypoint completed successfully.
    pub success: bool,
    /// Process exit code, when one was observed.
    pub exit_code: Option<i32>,
    /// Total output lines observed.
    pub output_lines: usize,
}

/// Trait for action entrypoints.
#[async_trait]
pub trait Entrypoint: Send + Sync {
    /// Runs the action against the bootstrapped environment.
    ///
    /// Failures here are owned by the collaborator; the harness
    /// propagates them without translation.
    async fn run(&self, env: &ActionEnv) -> Result<EntrypointResult>;

    /// Returns the name of this entrypoint.
    fn name(&self) -> &str;
}

/// Entrypoint that spawns an external command with the environment
/// injected, e.g. `node lib/src/main.js`.
pub struct CommandEntrypoint {
    /// Program to execute.
    program: String,
    /// Arguments to pass.
    args: Vec<String>,
    /// Working directory; defaults to the env's workspace.
    working_dir: Option<PathBuf>,
}

impl CommandEntrypoint {
    /// Creates an entrypoint for the given program.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    /// The conventional compiled-action entrypoint.
    pub fn node_main() -> Self {
        Self::new("node").with_args(["lib/src/main.js"])
    }

    /// Adds arguments.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Overrides the working directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    fn redactor_for(env: &ActionEnv) -> Redactor {
        let mut redactor = Redactor::new();
        redactor.learn_opt("GITHUB_TOKEN", env.token.as_deref());
        redactor.learn_opt("INPUT_AI_API_KEY", env.api_key.as_deref());
        redactor
    }
}

#[async_trait]
impl Entrypoint for CommandEntrypoint {
    async fn run(&self, env: &ActionEnv) -> Result<EntrypointResult> {
        let working_dir = self
            .working_dir
            .clone()
            .unwrap_or_else(|| env.workspace.clone());
        let redactor = Self::redactor_for(env);

        tracing::info!(
            program = %self.program,
            working_dir = ?working_dir,
            "invoking action entrypoint"
        );

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&working_dir)
            .envs(env.vars())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| Error::Entrypoint(format!("failed to spawn {}: {}", self.program, e)))?;

        let stdout = child.stdout.take().expect("stdout was piped");
        let stderr = child.stderr.take().expect("stderr was piped");

        let mut stdout_lines = BufReader::new(stdout).lines();
        let mut stderr_lines = BufReader::new(stderr).lines();
        let mut output_lines = 0usize;

        // Process stdout and stderr concurrently
        loop {
            tokio::select! {
                line = stdout_lines.next_line() => {
                    match line {
                        Ok(Some(line)) => {
                            output_lines += 1;
                            tracing::info!(target: "entrypoint", "{}", redactor.redact(&line));
                        }
                        Ok(None) => break,
                        Err(e) => {
                            tracing::error!(error = %e, "error reading entrypoint stdout");
                            break;
                        }
                    }
                }
                line = stderr_lines.next_line() => {
                    match line {
                        Ok(Some(line)) => {
                            output_lines += 1;
                            tracing::warn!(target: "entrypoint", "{}", redactor.redact(&line));
                        }
                        Ok(None) => {}
                        Err(e) => {
                            tracing::error!(error = %e, "error reading entrypoint stderr");
                        }
                    }
                }
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| Error::Entrypoint(format!("failed to wait for {}: {}", self.program, e)))?;

        if !status.success() {
            return Err(Error::Entrypoint(format!(
                "{} exited with {}",
                self.program, status
            )));
        }

        Ok(EntrypointResult {
            success: true,
            exit_code: status.code(),
            output_lines,
        })
    }

    fn name(&self) -> &str {
        &self.program
    }
}
