use crate::domain::model::{ArchiveReport, OutputLayout};
use crate::utils::error::{FabError, Result};
use regex::Regex;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use zip::write::{SimpleFileOptions, ZipWriter};

/// KiCad gerber layers use extensions starting with `g`: `.gtl`, `.gbs`, `.gbr`, `.gbrjob`, ...
pub const GERBER_PATTERN: &str = r"\.[gG][[:alnum:]]*$";

/// Gerber files directly inside `dir`, sorted by file name.
pub fn discover_gerbers(dir: &Path) -> Result<Vec<PathBuf>> {
    let re = Regex::new(GERBER_PATTERN).map_err(|e| FabError::ConfigError {
        message: format!("invalid gerber pattern: {}", e),
    })?;

    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        if re.is_match(&name.to_string_lossy()) {
            found.push(entry.path());
        }
    }

    found.sort();
    Ok(found)
}

/// Zips `files` into `archive`, naming each entry `<prefix>/<file name>`.
/// The archive is complete on disk before this returns.
pub fn write_archive(archive: &Path, prefix: &str, files: &[PathBuf]) -> Result<Vec<String>> {
    let mut zip = ZipWriter::new(BufWriter::new(File::create(archive)?));
    let options = SimpleFileOptions::default();
    let mut entries = Vec::with_capacity(files.len());

    for file in files {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| FabError::ConfigError {
                message: format!("not a file path: {}", file.display()),
            })?;
        let entry = format!("{}/{}", prefix, name);

        zip.start_file(entry.as_str(), options)?;
        let mut input = File::open(file)?;
        std::io::copy(&mut input, &mut zip)?;
        tracing::debug!("Archived {}", entry);
        entries.push(entry);
    }

    let writer = zip.finish()?;
    writer
        .into_inner()
        .map_err(|e| FabError::IoError(e.into_error()))?
        .sync_all()?;

    Ok(entries)
}

/// Moves the generated gerbers of a run into `<project>-gerbers.zip`.
/// Originals are deleted only once the whole archive has been written.
pub fn package_gerbers(layout: &OutputLayout) -> Result<ArchiveReport> {
    let gerbers = discover_gerbers(&layout.output_dir())?;
    if gerbers.is_empty() {
        tracing::warn!(
            "No gerber files found in {}, archive will be empty",
            layout.output_dir().display()
        );
    }

    let archive = layout.artifact("gerbers.zip");
    let entries = write_archive(&archive, layout.dir_name(), &gerbers)?;

    for gerber in &gerbers {
        fs::remove_file(gerber)?;
    }

    tracing::info!("Packed {} gerber files into {}", entries.len(), archive.display());
    Ok(ArchiveReport {
        path: archive,
        entries,
    })
}
