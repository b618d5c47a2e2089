use crate::config::toolchain::Toolchain;
use crate::domain::model::CommandSpec;
use crate::domain::ports::CommandRunner;
use crate::utils::error::{FabError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolVersion {
    pub raw: String,
    /// Leading character of the version string, a coarse major version.
    pub major: Option<char>,
    pub matches_expected: bool,
}

/// Compares the leading character of `raw` with `expected`. Never fails.
pub fn classify_version(raw: &str, expected: &str) -> ToolVersion {
    let raw = raw.trim().to_string();
    let major = raw.chars().next();
    let matches_expected = match (major, expected.chars().next()) {
        (Some(found), Some(wanted)) => found == wanted,
        _ => false,
    };

    ToolVersion {
        raw,
        major,
        matches_expected,
    }
}

/// Queries `kicad-cli --version`. A missing tool or failing query aborts the run;
/// a version mismatch is only a warning.
pub async fn check_tool_version<R>(runner: &R, toolchain: &Toolchain) -> Result<ToolVersion>
where
    R: CommandRunner + ?Sized,
{
    let spec = CommandSpec::new(&toolchain.kicad_cli).arg("--version");

    let outcome = runner.run(&spec).await.map_err(|e| FabError::ToolMissing {
        tool: toolchain.kicad_cli.clone(),
        reason: e.to_string(),
    })?;

    if !outcome.success {
        return Err(FabError::ToolMissing {
            tool: toolchain.kicad_cli.clone(),
            reason: format!(
                "version query exited with {:?}: {}",
                outcome.exit_code,
                outcome.stderr.trim()
            ),
        });
    }

    let version = classify_version(&outcome.stdout, &toolchain.expected_major);
    match version.major {
        None => tracing::warn!(
            "{} reported an empty version string, continuing anyway",
            toolchain.kicad_cli
        ),
        Some(found) if !version.matches_expected => tracing::warn!(
            "Only tested with KiCad {}, found KiCad {} ({})",
            toolchain.expected_major,
            found,
            version.raw
        ),
        Some(_) => tracing::info!("Found KiCad {}", version.raw),
    }

    Ok(version)
}
