//! Per-run outcome records.

use serde::Serialize;
use std::path::PathBuf;

/// Rows taken from one successfully processed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// Source document
    pub path: PathBuf,
    /// Rows accepted into the aggregated table
    pub rows: usize,
    /// Rows dropped as blank or as a repeated header
    pub rejected: usize,
}

/// A document that could not be processed and was left out of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    /// Source document
    pub path: PathBuf,
    /// Human-readable failure
    pub reason: String,
}

/// An archive that could not be removed after a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupFailure {
    /// Archive that is still on disk
    pub archive: PathBuf,
    /// Human-readable failure
    pub reason: String,
}

/// Everything a run did, in the order it happened.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Directory the run worked in
    pub working_dir: PathBuf,

    /// Archives extracted into the working directory
    pub archives_extracted: Vec<PathBuf>,

    /// Spreadsheet-XML documents found after extraction
    pub xml_files: Vec<PathBuf>,

    /// Documents that contributed rows
    pub processed: Vec<FileReport>,

    /// Documents skipped because they could not be read or parsed
    pub skipped: Vec<SkippedFile>,

    /// Archives removed after the report was written
    pub archives_removed: Vec<PathBuf>,

    /// Archives that could not be removed
    pub cleanup_failures: Vec<CleanupFailure>,

    /// Data rows in the written report
    pub total_rows: usize,

    /// Report file, if one was produced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Wall-clock duration of the run in milliseconds
    pub elapsed_ms: u128,
}

impl RunReport {
    /// Create an empty report for `working_dir`.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            ..Default::default()
        }
    }

    /// Whether no spreadsheet-XML input was found.
    pub fn no_input(&self) -> bool {
        self.xml_files.is_empty()
    }

    /// Whether a report file was written.
    pub fn produced_output(&self) -> bool {
        self.output.is_some()
    }
}
