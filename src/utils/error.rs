use thiserror::Error;

#[derive(Error, Debug)]
pub enum FabError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Could not find {tool}: {reason}")]
    ToolMissing { tool: String, reason: String },

    #[error("Failed to get git revision: {reason}")]
    RevisionUnavailable { reason: String },

    #[error("Failed to launch '{program}': {source}")]
    SpawnError {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl FabError {
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            FabError::ToolMissing { .. } => {
                "Install KiCad or point --kicad-cli at the kicad-cli binary"
            }
            FabError::RevisionUnavailable { .. } => {
                "Run inside a git repository with at least one commit"
            }
            FabError::SpawnError { .. } => "Check that the program exists and is executable",
            FabError::ConfigError { .. } | FabError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line flags"
            }
            FabError::IoError(_) => "Check that the design files exist and the directory is writable",
            FabError::ZipError(_) => "Check free disk space in the output directory",
            FabError::SerializationError(_) => "Re-run with --no-report to skip the run report",
        }
    }
}

pub type Result<T> = std::result::Result<T, FabError>;
