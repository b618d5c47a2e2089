use crate::config::FabConfig;
use crate::core::package;
use crate::domain::model::{CommandOutcome, CommandSpec, DocumentKind, OutputLayout, StepReport};
use crate::domain::ports::CommandRunner;
use std::io::ErrorKind;
use std::path::{PathBuf, MAIN_SEPARATOR};

pub const BOM_INTERMEDIATE: &str = "bom-tmp.xml";

/// One unit of artifact generation: commands run in order, temp files are
/// removed afterwards whatever the outcome.
#[derive(Debug, Clone)]
pub struct ArtifactStep {
    pub name: &'static str,
    /// Progress text shown while the step runs.
    pub label: &'static str,
    pub commands: Vec<CommandSpec>,
    pub expected_outputs: Vec<PathBuf>,
    /// Directory that must hold at least one gerber file afterwards, for
    /// exports whose file names are chosen by kicad-cli.
    pub expected_gerbers_in: Option<PathBuf>,
    pub temp_files: Vec<PathBuf>,
}

/// The fixed export plan for one run, in execution order.
pub fn plan(layout: &OutputLayout, config: &FabConfig) -> Vec<ArtifactStep> {
    let tc = &config.toolchain;
    let sch = layout.staged_document(DocumentKind::Schematic);
    let pcb = layout.staged_document(DocumentKind::Board);

    let schematic_pdf = layout.artifact("schematic.pdf");
    let floorplan_pdf = layout.artifact("floorplan.pdf");
    let step_model = layout.artifact("3d-render.step");
    let bom_xml = layout.output_file(BOM_INTERMEDIATE);
    let bom_csv = layout.artifact("bom.csv");
    let gerber_dir = format!(
        "{}{}",
        layout.output_dir().to_string_lossy(),
        MAIN_SEPARATOR
    );

    let kicad = |sub: &str, kind: &str, format: &str| {
        CommandSpec::new(&tc.kicad_cli).arg(sub).arg(kind).arg(format)
    };

    vec![
        ArtifactStep {
            name: "schematic-pdf",
            label: "Rendering schematic into PDF file",
            commands: vec![kicad("sch", "export", "pdf")
                .arg("-o")
                .path_arg(&schematic_pdf)
                .path_arg(&sch)],
            expected_outputs: vec![schematic_pdf],
            expected_gerbers_in: None,
            temp_files: vec![],
        },
        ArtifactStep {
            name: "floorplan-pdf",
            label: "Rendering PCB floorplan into PDF file",
            commands: vec![kicad("pcb", "export", "pdf")
                .arg("-o")
                .path_arg(&floorplan_pdf)
                .arg("-l")
                .arg(config.pdf_layers.join(","))
                .arg("--black-and-white")
                .arg("--ev")
                .path_arg(&pcb)],
            expected_outputs: vec![floorplan_pdf],
            expected_gerbers_in: None,
            temp_files: vec![],
        },
        ArtifactStep {
            name: "3d-model",
            label: "Exporting 3D model",
            commands: vec![kicad("pcb", "export", "step")
                .arg("-f")
                .arg("-o")
                .path_arg(&step_model)
                .path_arg(&pcb)],
            expected_outputs: vec![step_model],
            expected_gerbers_in: None,
            temp_files: vec![],
        },
        ArtifactStep {
            name: "bom",
            label: "Generating BoM",
            commands: vec![
                kicad("sch", "export", "python-bom")
                    .arg("-o")
                    .path_arg(&bom_xml)
                    .path_arg(&sch),
                CommandSpec::new(&tc.python)
                    .path_arg(&tc.bom_script())
                    .path_arg(&bom_xml)
                    .path_arg(&bom_csv),
            ],
            expected_outputs: vec![bom_csv],
            expected_gerbers_in: None,
            temp_files: vec![bom_xml],
        },
        ArtifactStep {
            name: "gerbers",
            label: "Exporting Gerbers",
            commands: vec![kicad("pcb", "export", "gerbers")
                .arg("-o")
                .arg(gerber_dir)
                .arg("-l")
                .arg(config.gerber_layers.join(","))
                .arg("--ev")
                .arg("--subtract-soldermask")
                .path_arg(&pcb)],
            expected_outputs: vec![],
            expected_gerbers_in: Some(layout.output_dir()),
            temp_files: vec![],
        },
    ]
}

/// Runs a step, stopping at its first failing command. Never aborts the
/// pipeline; failures are recorded in the returned report.
pub async fn run_step<R>(runner: &R, step: &ArtifactStep) -> StepReport
where
    R: CommandRunner + ?Sized,
{
    let mut outcomes = Vec::with_capacity(step.commands.len());

    for spec in &step.commands {
        let outcome = match runner.run(spec).await {
            Ok(outcome) => outcome,
            Err(e) => CommandOutcome::launch_failure(spec, e),
        };
        let ok = outcome.success;
        outcomes.push(outcome);
        if !ok {
            tracing::warn!("Step '{}' failed at: {}", step.name, spec);
            break;
        }
    }

    for temp in &step.temp_files {
        match std::fs::remove_file(temp) {
            Ok(()) => tracing::debug!("Removed {}", temp.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Could not remove {}: {}", temp.display(), e),
        }
    }

    let commands_ok =
        outcomes.len() == step.commands.len() && outcomes.iter().all(|o| o.success);
    let mut missing_outputs: Vec<PathBuf> = Vec::new();
    if commands_ok {
        for expected in step.expected_outputs.iter().filter(|p| !p.exists()) {
            tracing::warn!(
                "Step '{}' reported success but {} was not created",
                step.name,
                expected.display()
            );
            missing_outputs.push(expected.clone());
        }

        if let Some(dir) = &step.expected_gerbers_in {
            let found = package::discover_gerbers(dir).map(|g| g.len()).unwrap_or(0);
            if found == 0 {
                tracing::warn!(
                    "Step '{}' reported success but wrote no gerber files to {}",
                    step.name,
                    dir.display()
                );
                missing_outputs.push(dir.clone());
            }
        }
    }

    StepReport {
        name: step.name.to_string(),
        success: commands_ok && missing_outputs.is_empty(),
        outcomes,
        missing_outputs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toolchain::{Platform, Toolchain};
    use crate::core::test_support::ScriptedRunner;
    use crate::domain::model::Revision;
    use std::fs;
    use tempfile::TempDir;

    fn fixture(dir: &TempDir) -> (OutputLayout, FabConfig) {
        let rev = Revision::parse("abc1234").unwrap();
        let layout = OutputLayout::new(dir.path(), "emonHP", &rev);
        fs::create_dir_all(layout.output_dir()).unwrap();
        let config = FabConfig {
            toolchain: Toolchain::for_platform(Platform::Other),
            ..FabConfig::default()
        };
        (layout, config)
    }

    #[test]
    fn test_plan_order_and_flags() {
        let dir = TempDir::new().unwrap();
        let (layout, config) = fixture(&dir);
        let steps = plan(&layout, &config);

        let names: Vec<&str> = steps.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec!["schematic-pdf", "floorplan-pdf", "3d-model", "bom", "gerbers"]
        );

        let floorplan = &steps[1].commands[0];
        assert_eq!(&floorplan.args[..3], &["pcb", "export", "pdf"]);
        assert!(floorplan
            .args
            .contains(&"F.Paste,F.Silkscreen,Edge.Cuts,F.Mask".to_string()));
        assert!(floorplan.args.contains(&"--black-and-white".to_string()));

        let gerbers = &steps[4].commands[0];
        assert!(gerbers.args.contains(&"--subtract-soldermask".to_string()));
        let out_arg = &gerbers.args[gerbers.args.iter().position(|a| a == "-o").unwrap() + 1];
        assert!(out_arg.ends_with(MAIN_SEPARATOR));
    }

    #[test]
    fn test_bom_uses_plugin_script() {
        let dir = TempDir::new().unwrap();
        let (layout, config) = fixture(&dir);
        let bom = &plan(&layout, &config)[3];

        assert_eq!(bom.commands.len(), 2);
        assert_eq!(bom.commands[1].program, "python3");
        assert!(bom.commands[1].args[0].ends_with("bom_csv_grouped_by_value_with_fp.py"));
        assert_eq!(bom.temp_files, vec![layout.output_file(BOM_INTERMEDIATE)]);
    }

    #[tokio::test]
    async fn test_failed_export_stops_step_and_cleans_up() {
        let dir = TempDir::new().unwrap();
        let (layout, config) = fixture(&dir);
        let bom = plan(&layout, &config).remove(3);
        fs::write(layout.output_file(BOM_INTERMEDIATE), "<export/>").unwrap();

        let runner = ScriptedRunner::new().fail("kicad-cli sch export python-bom", 1, "bad schematic");
        let report = run_step(&runner, &bom).await;

        assert!(!report.success);
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.failure().unwrap().stderr, "bad schematic");
        assert_eq!(runner.calls().len(), 1);
        assert!(!layout.output_file(BOM_INTERMEDIATE).exists());
    }

    #[tokio::test]
    async fn test_missing_output_marks_step_failed() {
        let dir = TempDir::new().unwrap();
        let (layout, config) = fixture(&dir);
        let step = plan(&layout, &config).remove(0);

        let runner = ScriptedRunner::new();
        let report = run_step(&runner, &step).await;

        assert!(!report.success);
        assert_eq!(report.missing_outputs, vec![layout.artifact("schematic.pdf")]);
    }

    #[tokio::test]
    async fn test_launch_failure_is_recorded() {
        let dir = TempDir::new().unwrap();
        let (layout, config) = fixture(&dir);
        let step = plan(&layout, &config).remove(2);

        let runner = ScriptedRunner::new().missing("kicad-cli");
        let report = run_step(&runner, &step).await;

        assert!(!report.success);
        assert_eq!(report.outcomes[0].exit_code, None);
    }

    #[tokio::test]
    async fn test_gerber_export_without_files_fails() {
        let dir = TempDir::new().unwrap();
        let (layout, config) = fixture(&dir);
        let gerbers = plan(&layout, &config).remove(4);

        let report = run_step(&ScriptedRunner::new(), &gerbers).await;

        assert!(!report.success);
        assert!(report.failure().is_none());
        assert_eq!(report.missing_outputs, vec![layout.output_dir()]);
    }

    #[tokio::test]
    async fn test_gerber_export_with_layer_files_succeeds() {
        let dir = TempDir::new().unwrap();
        let (layout, config) = fixture(&dir);
        let gerbers = plan(&layout, &config).remove(4);
        // non-gerber leftovers don't count
        fs::write(layout.artifact("bom.csv"), "Ref,Value\n").unwrap();

        let out = layout.output_dir();
        let runner = ScriptedRunner::new().on("kicad-cli pcb export gerbers", move |spec| {
            fs::write(out.join("emonHP-F_Cu.gtl"), "G04*").unwrap();
            Ok(crate::core::test_support::outcome(spec, 0, "", ""))
        });
        let report = run_step(&runner, &gerbers).await;

        assert!(report.success);
        assert!(report.missing_outputs.is_empty());
    }
}
