//! Input discovery in the working directory.

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

fn has_extension(path: &Path, ext: &str) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| {
            let n = n.to_lowercase();
            n.len() > ext.len() && n.ends_with(ext)
        })
        .unwrap_or(false)
}

/// List the ZIP archives directly inside `dir`, sorted by file name.
///
/// Subdirectories are not searched.
pub fn find_archives(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let mut archives = Vec::new();

    for entry in fs::read_dir(dir.as_ref())? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        let path = entry.path();
        if has_extension(&path, ".zip") {
            archives.push(path);
        }
    }

    archives.sort();
    Ok(archives)
}

/// List every Spreadsheet-XML file under `dir`, recursively, in lexical walk
/// order. Paths are absolute when `dir` can be canonicalized.
///
/// Entries that cannot be read are logged and skipped.
pub fn find_xml_files(dir: impl AsRef<Path>) -> Vec<PathBuf> {
    let dir = dir.as_ref();
    let root = fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
    let mut files = Vec::new();

    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable path");
                continue;
            }
        };
        if entry.file_type().is_dir() {
            continue;
        }
        if has_extension(entry.path(), ".xml") {
            info!(file = %entry.path().display(), "found XML file");
            files.push(entry.into_path());
        }
    }

    files
}

/// Names of the top-level entries of `dir`, sorted.
///
/// Logged when a run finds nothing to process.
pub fn list_directory(dir: impl AsRef<Path>) -> Result<Vec<String>> {
    let mut names = fs::read_dir(dir.as_ref())?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<std::io::Result<Vec<_>>>()?;
    names.sort();
    Ok(names)
}
