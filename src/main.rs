use anyhow::Context;
use clap::Parser;
use kicad_fab::config::toml_config::TomlConfig;
use kicad_fab::utils::{logger, validation::Validate};
use kicad_fab::{CliConfig, FabConfig, FabEngine, LinePrompt, ProcessRunner, RunOutcome};

/// Exit code for bad configuration or a missing precondition (tool, git revision).
const EXIT_FATAL: i32 = 1;
/// Exit code when the run finished but some artifacts could not be generated.
const EXIT_INCOMPLETE: i32 = 2;

fn load_config(cli: &CliConfig) -> anyhow::Result<FabConfig> {
    let mut config = FabConfig::default();

    if let Some(path) = cli.config_file() {
        tracing::info!("Loading configuration from {}", path.display());
        TomlConfig::from_file(&path)
            .with_context(|| format!("failed to load config file '{}'", path.display()))?
            .apply_to(&mut config);
    }

    cli.apply_to(&mut config);
    config.validate().context("invalid configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration failed: {:#}", e);
            eprintln!("> {:#}", e);
            std::process::exit(EXIT_FATAL);
        }
    };
    tracing::debug!("Resolved config: {:?}", config);

    let engine = FabEngine::new(ProcessRunner::new(), LinePrompt::stdin(), config);

    match engine.run().await {
        Ok(RunOutcome::Declined) => {
            println!("> Output folder left untouched. Exiting.");
        }
        Ok(RunOutcome::Completed(summary)) => {
            let failed = summary.failed_steps();
            if failed.is_empty() {
                println!("> All manufacturing files are in {}", summary.output_dir.display());
                return Ok(());
            }

            println!("> Finished with {} failed step(s):", failed.len());
            for step in &failed {
                match step.failure() {
                    Some(outcome) => println!(
                        ">   - {}: `{}` exited with {:?}: {}",
                        step.name,
                        outcome.command,
                        outcome.exit_code,
                        outcome.stderr.trim()
                    ),
                    None => {
                        for missing in &step.missing_outputs {
                            if missing.is_dir() {
                                println!(">   - {}: no files written to {}", step.name, missing.display());
                            } else {
                                println!(">   - {}: {} was not created", step.name, missing.display());
                            }
                        }
                    }
                }
            }
            std::process::exit(EXIT_INCOMPLETE);
        }
        Err(e) => {
            tracing::error!("Run aborted: {}", e);
            eprintln!("> {}. Exiting.", e);
            eprintln!("> Suggestion: {}", e.recovery_suggestion());
            std::process::exit(EXIT_FATAL);
        }
    }

    Ok(())
}
