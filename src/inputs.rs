//! Input discovery: expand file and directory arguments into log paths

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Expand command-line paths into a sorted list of log files
///
/// - Directories contribute their immediate, non-hidden file entries
///   (no recursion into subdirectories).
/// - Existing files are passed through unchanged.
/// - Anything else is reported with a warning on stdout and skipped.
pub fn collect_input_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        let path = path.as_ref();
        if path.is_dir() {
            files.extend(list_directory(path)?);
        } else if path.is_file() {
            files.push(path.to_path_buf());
        } else {
            println!("Warning: {} not found.", path.display());
            tracing::warn!("Skipping missing input {}", path.display());
        }
    }

    files.sort();
    tracing::debug!("Collected {} input files", files.len());
    Ok(files)
}

/// List the immediate file entries of a directory, like a shell `*` glob
fn list_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read input directory: {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("Failed to list directory: {}", dir.display()))?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        } else {
            tracing::debug!("Ignoring non-file entry {}", path.display());
        }
    }
    Ok(files)
}

/// Series label for a log file: its base name with the last extension removed
pub fn series_label(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
