use crate::domain::model::{CommandOutcome, CommandSpec};
use crate::domain::ports::CommandRunner;
use crate::utils::error::{FabError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

/// Runs commands as child processes, capturing stdout and stderr.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutcome> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }

        tracing::debug!("Running: {}", spec);
        let output = cmd.output().await.map_err(|source| FabError::SpawnError {
            program: spec.program.clone(),
            source,
        })?;

        let outcome = CommandOutcome {
            command: spec.to_string(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            success: output.status.success(),
        };

        if outcome.success {
            tracing::debug!("'{}' exited successfully", spec.program);
        } else {
            tracing::debug!(
                "'{}' failed (exit code {:?}): {}",
                spec.program,
                outcome.exit_code,
                outcome.stderr.trim()
            );
        }

        Ok(outcome)
    }
}
