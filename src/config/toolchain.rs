use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const MACOS_KICAD_CLI: &str = "/Applications/KiCad/KiCad.app/Contents/MacOS/kicad-cli";
const MACOS_PLUGIN_DIR: &str = "/Applications/KiCad/KiCad.app/Contents/SharedSupport/plugins";
const DEFAULT_KICAD_CLI: &str = "kicad-cli";
const DEFAULT_PLUGIN_DIR: &str = "/usr/share/kicad/plugins";

pub const BOM_SCRIPT: &str = "bom_csv_grouped_by_value_with_fp.py";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Other
        }
    }
}

/// External programs a run depends on, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toolchain {
    pub kicad_cli: String,
    pub plugin_dir: PathBuf,
    pub python: String,
    pub git: String,
    /// Leading character of the `kicad-cli --version` output the workflow was tested with.
    pub expected_major: String,
}

impl Toolchain {
    pub fn for_platform(platform: Platform) -> Self {
        let (kicad_cli, plugin_dir) = match platform {
            Platform::MacOs => (MACOS_KICAD_CLI, MACOS_PLUGIN_DIR),
            Platform::Other => (DEFAULT_KICAD_CLI, DEFAULT_PLUGIN_DIR),
        };

        Self {
            kicad_cli: kicad_cli.to_string(),
            plugin_dir: PathBuf::from(plugin_dir),
            python: "python3".to_string(),
            git: "git".to_string(),
            expected_major: "7".to_string(),
        }
    }

    pub fn bom_script(&self) -> PathBuf {
        self.plugin_dir.join(BOM_SCRIPT)
    }
}

impl Default for Toolchain {
    fn default() -> Self {
        Self::for_platform(Platform::current())
    }
}
