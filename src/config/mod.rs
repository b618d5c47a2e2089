#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;
pub mod toolchain;

use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::path::PathBuf;
use toolchain::Toolchain;

pub const DEFAULT_PROJECT: &str = "emonHP";
pub const DEFAULT_PLACEHOLDER: &str = "gitrev";

pub const DEFAULT_PDF_LAYERS: &[&str] = &["F.Paste", "F.Silkscreen", "Edge.Cuts", "F.Mask"];
pub const DEFAULT_GERBER_LAYERS: &[&str] = &[
    "F.Cu",
    "F.Paste",
    "F.Silkscreen",
    "F.Mask",
    "B.Cu",
    "B.Paste",
    "B.Silkscreen",
    "B.Mask",
    "In1.Cu",
    "In2.Cu",
];

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct FabConfig {
    pub project: String,
    pub project_dir: PathBuf,
    pub placeholder: String,
    pub toolchain: Toolchain,
    pub pdf_layers: Vec<String>,
    pub gerber_layers: Vec<String>,
    pub write_report: bool,
    pub assume_yes: bool,
}

impl Default for FabConfig {
    fn default() -> Self {
        Self {
            project: DEFAULT_PROJECT.to_string(),
            project_dir: PathBuf::from("."),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            toolchain: Toolchain::default(),
            pdf_layers: to_owned(DEFAULT_PDF_LAYERS),
            gerber_layers: to_owned(DEFAULT_GERBER_LAYERS),
            write_report: true,
            assume_yes: false,
        }
    }
}

fn to_owned(layers: &[&str]) -> Vec<String> {
    layers.iter().map(|l| l.to_string()).collect()
}

impl Validate for FabConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("project.name", &self.project)?;
        validation::validate_path("project.dir", &self.project_dir.to_string_lossy())?;
        validation::validate_non_empty_string("project.placeholder", &self.placeholder)?;
        validation::validate_non_empty_string("toolchain.kicad_cli", &self.toolchain.kicad_cli)?;
        validation::validate_path(
            "toolchain.plugin_dir",
            &self.toolchain.plugin_dir.to_string_lossy(),
        )?;
        validation::validate_non_empty_string("toolchain.python", &self.toolchain.python)?;
        validation::validate_single_char(
            "toolchain.expected_major",
            &self.toolchain.expected_major,
        )?;
        validation::validate_layers("layers.pdf", &self.pdf_layers)?;
        validation::validate_layers("layers.gerber", &self.gerber_layers)?;
        Ok(())
    }
}
