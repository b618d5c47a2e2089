use crate::config::FabConfig;
use crate::core::{artifacts, package, render, revision, version};
use crate::domain::model::{DocumentKind, OutputLayout, RunOutcome, RunSummary};
use crate::domain::ports::{CommandRunner, Prompt};
use crate::utils::error::Result;
use chrono::Utc;
use std::fs;
use std::io::Write;

pub const REPORT_FILE: &str = "fab-report.json";

/// Runs the manufacturing pipeline: tool check, revision, staging, exports,
/// packaging. Each external command finishes before the next starts.
pub struct FabEngine<R: CommandRunner, P: Prompt> {
    runner: R,
    prompt: P,
    config: FabConfig,
}

fn progress(label: &str) -> Result<()> {
    print!("> {}... ", label);
    std::io::stdout().flush()?;
    Ok(())
}

impl<R: CommandRunner, P: Prompt> FabEngine<R, P> {
    pub fn new(runner: R, prompt: P, config: FabConfig) -> Self {
        Self {
            runner,
            prompt,
            config,
        }
    }

    #[cfg(test)]
    pub(crate) fn runner(&self) -> &R {
        &self.runner
    }

    pub async fn run(&self) -> Result<RunOutcome> {
        let started_at = Utc::now();
        let config = &self.config;

        let tool = version::check_tool_version(&self.runner, &config.toolchain).await?;

        println!("> Generating {} manufacturing files...", config.project);

        let revision =
            revision::resolve_revision(&self.runner, &config.toolchain.git, &config.project_dir)
                .await?;
        let layout = OutputLayout::new(&config.project_dir, &config.project, &revision);
        let output_dir = layout.output_dir();
        println!(">   - outputs are in {}", output_dir.display());

        if output_dir.exists() {
            if config.assume_yes {
                tracing::info!("Reusing existing {}", output_dir.display());
            } else if !self
                .prompt
                .confirm(">   - output folder already exists. Continue?")
                .await?
            {
                tracing::info!("Leaving {} untouched", output_dir.display());
                return Ok(RunOutcome::Declined);
            }
        }
        fs::create_dir_all(&output_dir)?;

        for kind in [DocumentKind::Schematic, DocumentKind::Board] {
            progress(&format!("Rendering {}", kind.label()))?;
            render::render_document(kind, &revision, &layout, &config.placeholder)?;
            println!("Done!");
        }

        let mut steps = Vec::new();
        for step in artifacts::plan(&layout, config) {
            progress(step.label)?;
            let report = artifacts::run_step(&self.runner, &step).await;
            println!("{}", if report.success { "Done!" } else { "FAILED" });
            steps.push(report);
        }

        progress("Packaging Gerbers")?;
        let archive = package::package_gerbers(&layout)?;
        println!("Done! ({} files)", archive.entries.len());

        let summary = RunSummary {
            revision,
            tool_version: tool.raw,
            output_dir,
            steps,
            archive: Some(archive),
            started_at,
            finished_at: Utc::now(),
        };

        if config.write_report {
            let path = layout.output_file(REPORT_FILE);
            fs::write(&path, serde_json::to_vec_pretty(&summary)?)?;
            tracing::debug!("Wrote run report to {}", path.display());
        }

        Ok(RunOutcome::Completed(summary))
    }
}
