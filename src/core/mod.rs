pub mod artifacts;
pub mod engine;
pub mod package;
pub mod render;
pub mod revision;
pub mod version;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::domain::model::{
    CommandOutcome, CommandSpec, DocumentKind, OutputLayout, Revision, RunOutcome, RunSummary,
    StepReport,
};
pub use crate::domain::ports::{CommandRunner, Prompt};
pub use crate::utils::error::Result;
