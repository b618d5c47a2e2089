// Adapters layer: concrete implementations of the domain ports.

pub mod process;
pub mod prompt;

pub use process::ProcessRunner;
pub use prompt::LinePrompt;
