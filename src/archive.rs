//! Safe ZIP extraction with path containment checks.
//!
//! Every entry is resolved lexically against the destination root before any
//! byte is written. Entries that would land outside the root (parent
//! traversal, absolute names) abort the extraction with
//! [`Error::PathViolation`]. Files written before a failure are left on disk.

use crate::error::{Error, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Read, Seek};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Lexically normalize a path: drop `.` components and resolve `..` against
/// preceding normal components.
///
/// A `..` that cannot be resolved is kept, so the result still escapes
/// whatever it is later joined to. No filesystem access is performed.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    parts.iter().map(|c| c.as_os_str()).collect()
}

/// Check whether `candidate` lies strictly inside `root`.
///
/// Both paths are cleaned first. The root itself is not contained in itself.
pub fn is_contained(candidate: &Path, root: &Path) -> bool {
    let candidate = clean_path(candidate);
    let root = clean_path(root);

    if candidate == root {
        return false;
    }
    if candidate
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return false;
    }
    candidate.starts_with(&root)
}

/// Resolve an archive entry name against the destination root.
///
/// Backslashes are treated as separators so that archives produced on
/// Windows resolve the same way everywhere.
pub fn resolve_entry(dest: &Path, entry_name: &str) -> Result<PathBuf> {
    let relative = entry_name.replace('\\', "/");
    let relative = Path::new(&relative);
    let candidate = clean_path(&dest.join(clean_path(relative)));

    // absolute names are rejected even when they point inside `dest`
    if !relative.has_root() && is_contained(&candidate, dest) {
        Ok(candidate)
    } else {
        Err(Error::PathViolation {
            entry: entry_name.to_string(),
            dest: dest.to_path_buf(),
        })
    }
}

/// Extract every entry of the archive at `archive_path` into `dest`.
pub fn extract(archive_path: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<usize> {
    let file = File::open(archive_path.as_ref())?;
    extract_from_reader(BufReader::new(file), dest)
}

/// Extract every entry of an archive read from `reader` into `dest`.
///
/// Returns the number of file entries written.
pub fn extract_from_reader<R: Read + Seek>(reader: R, dest: impl AsRef<Path>) -> Result<usize> {
    let dest = clean_path(dest.as_ref());
    let mut archive = zip::ZipArchive::new(reader)?;
    let mut written = 0;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let target = resolve_entry(&dest, entry.name())?;

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut out = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&target)?;
        io::copy(&mut entry, &mut out)?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&target, fs::Permissions::from_mode(mode & 0o777 | 0o600))?;
        }

        debug!(entry = entry.name(), target = %target.display(), "extracted");
        written += 1;
    }

    Ok(written)
}

/// Outcome of extracting every top-level archive of a directory.
#[derive(Debug, Clone, Default)]
pub struct ArchiveBatch {
    /// Archives that were fully extracted, in processing order
    pub extracted: Vec<PathBuf>,
    /// Number of files written across all archives
    pub files_written: usize,
}

/// Extract each archive in `archives` into `dest`, in order.
///
/// The first failure aborts the batch and is reported as [`Error::Archive`]
/// naming the archive. Archives handled before it stay extracted.
pub fn extract_all(archives: &[PathBuf], dest: impl AsRef<Path>) -> Result<ArchiveBatch> {
    let dest = dest.as_ref();
    let mut batch = ArchiveBatch::default();

    for archive in archives {
        info!(archive = %archive.display(), "extracting archive");
        let count = extract(archive, dest).map_err(|e| Error::Archive {
            archive: archive.clone(),
            source: Box::new(e),
        })?;
        batch.files_written += count;
        batch.extracted.push(archive.clone());
    }

    Ok(batch)
}
