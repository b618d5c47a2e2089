use crate::domain::model::{CommandOutcome, CommandSpec};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Runs external programs to completion.
///
/// `Err` is reserved for programs that could not be started at all; a process
/// that ran and exited non-zero is an `Ok` outcome with `success == false`.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutcome>;
}

/// Asks the operator a yes/no question.
#[async_trait]
pub trait Prompt: Send + Sync {
    async fn confirm(&self, question: &str) -> Result<bool>;
}
