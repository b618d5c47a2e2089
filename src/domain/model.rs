use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Short git hash identifying the sources a run was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision(String);

impl Revision {
    /// Returns `None` for empty or whitespace-only input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Schematic,
    Board,
}

impl DocumentKind {
    pub fn extension(self) -> &'static str {
        match self {
            DocumentKind::Schematic => "kicad_sch",
            DocumentKind::Board => "kicad_pcb",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DocumentKind::Schematic => "schematic",
            DocumentKind::Board => "PCB file",
        }
    }
}

/// Where a run reads its sources and writes its artifacts.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    project_dir: PathBuf,
    project: String,
    dir_name: String,
}

impl OutputLayout {
    pub fn new(project_dir: impl Into<PathBuf>, project: impl Into<String>, rev: &Revision) -> Self {
        Self {
            project_dir: project_dir.into(),
            project: project.into(),
            dir_name: format!("output-{}", rev),
        }
    }

    /// `output-<rev>`, also used as the prefix of archive entries.
    pub fn dir_name(&self) -> &str {
        &self.dir_name
    }

    pub fn output_dir(&self) -> PathBuf {
        self.project_dir.join(&self.dir_name)
    }

    pub fn source_document(&self, kind: DocumentKind) -> PathBuf {
        self.project_dir
            .join(format!("{}.{}", self.project, kind.extension()))
    }

    pub fn staged_document(&self, kind: DocumentKind) -> PathBuf {
        self.output_dir()
            .join(format!("{}.{}", self.project, kind.extension()))
    }

    /// `<out>/<project>-<suffix>`, e.g. `artifact("schematic.pdf")`.
    pub fn artifact(&self, suffix: &str) -> PathBuf {
        self.output_dir().join(format!("{}-{}", self.project, suffix))
    }

    pub fn output_file(&self, name: &str) -> PathBuf {
        self.output_dir().join(name)
    }
}

/// A fully resolved external invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn path_arg(self, path: &Path) -> Self {
        let arg = path.to_string_lossy().into_owned();
        self.arg(arg)
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOutcome {
    pub command: String,
    /// `None` when the process was killed by a signal or never started.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

impl CommandOutcome {
    pub fn launch_failure(spec: &CommandSpec, reason: impl fmt::Display) -> Self {
        Self {
            command: spec.to_string(),
            exit_code: None,
            stdout: String::new(),
            stderr: reason.to_string(),
            success: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    pub name: String,
    pub outcomes: Vec<CommandOutcome>,
    /// Files the step should have produced but did not.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_outputs: Vec<PathBuf>,
    pub success: bool,
}

impl StepReport {
    /// The first failing command, if any.
    pub fn failure(&self) -> Option<&CommandOutcome> {
        self.outcomes.iter().find(|o| !o.success)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveReport {
    pub path: PathBuf,
    pub entries: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub revision: Revision,
    pub tool_version: String,
    pub output_dir: PathBuf,
    pub steps: Vec<StepReport>,
    pub archive: Option<ArchiveReport>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn failed_steps(&self) -> Vec<&StepReport> {
        self.steps.iter().filter(|s| !s.success).collect()
    }

    pub fn is_success(&self) -> bool {
        self.steps.iter().all(|s| s.success)
    }
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    Completed(RunSummary),
    /// The output directory already existed and the user chose not to reuse it.
    Declined,
}
