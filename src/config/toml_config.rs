use crate::config::FabConfig;
use crate::utils::error::{FabError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// On-disk configuration. Every field is optional and only overrides the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub project: Option<ProjectSection>,
    pub toolchain: Option<ToolchainSection>,
    pub layers: Option<LayersSection>,
    pub output: Option<OutputSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectSection {
    pub name: Option<String>,
    pub dir: Option<PathBuf>,
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolchainSection {
    pub kicad_cli: Option<String>,
    pub plugin_dir: Option<PathBuf>,
    pub python: Option<String>,
    pub git: Option<String>,
    pub expected_major: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayersSection {
    pub pdf: Option<Vec<String>>,
    pub gerber: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    pub report: Option<bool>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FabError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FabError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| FabError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn apply_to(self, config: &mut FabConfig) {
        if let Some(project) = self.project {
            if let Some(name) = project.name {
                config.project = name;
            }
            if let Some(dir) = project.dir {
                config.project_dir = dir;
            }
            if let Some(placeholder) = project.placeholder {
                config.placeholder = placeholder;
            }
        }

        if let Some(tc) = self.toolchain {
            if let Some(kicad_cli) = tc.kicad_cli {
                config.toolchain.kicad_cli = kicad_cli;
            }
            if let Some(plugin_dir) = tc.plugin_dir {
                config.toolchain.plugin_dir = plugin_dir;
            }
            if let Some(python) = tc.python {
                config.toolchain.python = python;
            }
            if let Some(git) = tc.git {
                config.toolchain.git = git;
            }
            if let Some(expected_major) = tc.expected_major {
                config.toolchain.expected_major = expected_major;
            }
        }

        if let Some(layers) = self.layers {
            if let Some(pdf) = layers.pdf {
                config.pdf_layers = pdf;
            }
            if let Some(gerber) = layers.gerber {
                config.gerber_layers = gerber;
            }
        }

        if let Some(report) = self.output.and_then(|o| o.report) {
            config.write_report = report;
        }
    }
}
