use crate::config::FabConfig;
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_FILE: &str = "kicad-fab.toml";

#[derive(Debug, Clone, Parser)]
#[command(name = "kicad-fab")]
#[command(version)]
#[command(about = "Generate PCB manufacturing files (PDFs, STEP, BoM, Gerbers) with kicad-cli")]
pub struct CliConfig {
    /// TOML configuration file; kicad-fab.toml is used when present
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Project name, the stem of the .kicad_sch/.kicad_pcb files
    #[arg(long)]
    pub project: Option<String>,

    /// Directory holding the design files and receiving output-<rev>/
    #[arg(long)]
    pub project_dir: Option<PathBuf>,

    /// Path to the kicad-cli binary
    #[arg(long)]
    pub kicad_cli: Option<String>,

    /// KiCad plugin directory containing the BoM scripts
    #[arg(long)]
    pub plugin_dir: Option<PathBuf>,

    /// Python interpreter used for the BoM script
    #[arg(long)]
    pub python: Option<String>,

    /// Reuse an existing output directory without asking
    #[arg(short = 'y', long)]
    pub assume_yes: bool,

    /// Do not write fab-report.json
    #[arg(long)]
    pub no_report: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// The explicit `--config` path, or the default file if it exists.
    pub fn config_file(&self) -> Option<PathBuf> {
        match &self.config {
            Some(path) => Some(path.clone()),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            }
        }
    }

    /// Flags win over both defaults and the config file.
    pub fn apply_to(&self, config: &mut FabConfig) {
        if let Some(project) = &self.project {
            config.project = project.clone();
        }
        if let Some(dir) = &self.project_dir {
            config.project_dir = dir.clone();
        }
        if let Some(kicad_cli) = &self.kicad_cli {
            config.toolchain.kicad_cli = kicad_cli.clone();
        }
        if let Some(plugin_dir) = &self.plugin_dir {
            config.toolchain.plugin_dir = plugin_dir.clone();
        }
        if let Some(python) = &self.python {
            config.toolchain.python = python.clone();
        }
        if self.assume_yes {
            config.assume_yes = true;
        }
        if self.no_report {
            config.write_report = false;
        }
    }
}
