//! Shell-script stand-ins for kicad-cli, git and the BoM script.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const REV: &str = "abc1234";

pub const SCHEMATIC: &str = "(kicad_sch (version 20230121)\n  (title_block\n    (rev \"gitrev\")\n    (comment 1 \"built from gitrev\")\n  )\n)\n";
pub const BOARD: &str = "(kicad_pcb (version 20221018)\n  (gr_text \"gitrev\" (at 10 10))\n)\n";

const FAKE_KICAD: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
  echo "7.0.10"
  exit 0
fi
out=""
prev=""
for a in "$@"; do
  if [ "$prev" = "-o" ]; then out="$a"; fi
  prev="$a"
done
if [ "$1 $2 $3" = "pcb export gerbers" ]; then
  for layer in F_Cu.gtl B_Cu.gbl F_Mask.gts Edge_Cuts.gm1 job.gbrjob; do
    echo "G04*" > "${out}emonHP-${layer}"
  done
else
  echo "artifact" > "$out"
fi
"#;

pub struct FakeToolchain {
    pub kicad_cli: PathBuf,
    pub git: PathBuf,
    pub python: PathBuf,
}

fn write_script(path: &Path, body: &str) {
    fs::write(path, body).unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(path, perms).unwrap();
    }
}

/// Writes fake tools into `bin_dir`. `python_exit` is the exit code of the BoM conversion.
pub fn fake_toolchain(bin_dir: &Path, python_exit: i32) -> FakeToolchain {
    fs::create_dir_all(bin_dir).unwrap();

    let kicad_cli = bin_dir.join("kicad-cli");
    write_script(&kicad_cli, FAKE_KICAD);

    let git = bin_dir.join("git");
    write_script(&git, &format!("#!/bin/sh\necho {}\n", REV));

    let python = bin_dir.join("python3");
    write_script(
        &python,
        &format!(
            "#!/bin/sh\nif [ {code} -ne 0 ]; then echo 'no module named kicad_netlist_reader' >&2; exit {code}; fi\necho 'Ref,Qnty,Value' > \"$3\"\n",
            code = python_exit
        ),
    );

    FakeToolchain {
        kicad_cli,
        git,
        python,
    }
}

pub fn write_design(project_dir: &Path) {
    fs::write(project_dir.join("emonHP.kicad_sch"), SCHEMATIC).unwrap();
    fs::write(project_dir.join("emonHP.kicad_pcb"), BOARD).unwrap();
}

/// A kicad-fab.toml pointing every tool at the fakes.
pub fn write_config(project_dir: &Path, tools: &FakeToolchain) -> PathBuf {
    let path = project_dir.join("kicad-fab.toml");
    fs::write(
        &path,
        format!(
            "[project]\nname = \"emonHP\"\n\n[toolchain]\nkicad_cli = \"{}\"\ngit = \"{}\"\npython = \"{}\"\nplugin_dir = \"{}\"\n",
            tools.kicad_cli.display(),
            tools.git.display(),
            tools.python.display(),
            project_dir.display()
        ),
    )
    .unwrap();
    path
}

pub fn output_dirs(project_dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(project_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("output-"))
        .map(|e| e.path())
        .collect()
}
