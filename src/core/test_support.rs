//! Scripted command runner for unit tests.

use crate::domain::model::{CommandOutcome, CommandSpec};
use crate::domain::ports::CommandRunner;
use crate::utils::error::{FabError, Result};
use async_trait::async_trait;
use std::sync::Mutex;

type Handler = Box<dyn Fn(&CommandSpec) -> Result<CommandOutcome> + Send + Sync>;

/// Answers commands by the first registered prefix of their rendered command
/// line. Unmatched commands succeed with empty output.
#[derive(Default)]
pub struct ScriptedRunner {
    handlers: Vec<(String, Handler)>,
    calls: Mutex<Vec<CommandSpec>>,
}

pub fn outcome(spec: &CommandSpec, code: i32, stdout: &str, stderr: &str) -> CommandOutcome {
    CommandOutcome {
        command: spec.to_string(),
        exit_code: Some(code),
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
        success: code == 0,
    }
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(mut self, prefix: &str, handler: F) -> Self
    where
        F: Fn(&CommandSpec) -> Result<CommandOutcome> + Send + Sync + 'static,
    {
        self.handlers.push((prefix.to_string(), Box::new(handler)));
        self
    }

    pub fn ok(self, prefix: &str, stdout: &str) -> Self {
        let stdout = stdout.to_string();
        self.on(prefix, move |spec| Ok(outcome(spec, 0, &stdout, "")))
    }

    pub fn fail(self, prefix: &str, code: i32, stderr: &str) -> Self {
        let stderr = stderr.to_string();
        self.on(prefix, move |spec| Ok(outcome(spec, code, "", &stderr)))
    }

    pub fn missing(self, prefix: &str) -> Self {
        self.on(prefix, |spec| {
            Err(FabError::SpawnError {
                program: spec.program.clone(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        })
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutcome> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(spec.clone());
        }

        let line = spec.to_string();
        match self.handlers.iter().find(|(prefix, _)| line.starts_with(prefix.as_str())) {
            Some((_, handler)) => handler(spec),
            None => Ok(outcome(spec, 0, "", "")),
        }
    }
}
