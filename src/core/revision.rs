use crate::domain::model::{CommandSpec, Revision};
use crate::domain::ports::CommandRunner;
use crate::utils::error::{FabError, Result};
use std::path::Path;

/// Short hash of `HEAD` in `repo_dir`.
pub async fn resolve_revision<R>(runner: &R, git: &str, repo_dir: &Path) -> Result<Revision>
where
    R: CommandRunner + ?Sized,
{
    let spec = CommandSpec::new(git)
        .arg("rev-parse")
        .arg("--short")
        .arg("HEAD")
        .current_dir(repo_dir);

    let outcome = runner
        .run(&spec)
        .await
        .map_err(|e| FabError::RevisionUnavailable {
            reason: e.to_string(),
        })?;

    if !outcome.success {
        return Err(FabError::RevisionUnavailable {
            reason: outcome.stderr.trim().to_string(),
        });
    }

    let revision = Revision::parse(&outcome.stdout).ok_or_else(|| FabError::RevisionUnavailable {
        reason: "git printed an empty revision".to_string(),
    })?;

    tracing::debug!("Resolved revision {}", revision);
    Ok(revision)
}
