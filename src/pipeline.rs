//! End-to-end merge run: extract, discover, aggregate, write, clean up.

use crate::aggregate::Aggregator;
use crate::archive::extract_all;
use crate::discover::{find_archives, find_xml_files, list_directory};
use crate::error::Result;
use crate::filter::RowFilter;
use crate::model::{CleanupFailure, RunReport, REPORT_HEADER, TASK_HEADER_LABEL};
use crate::render::{sink_for, OutputFormat, XlsxOptions};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

/// Base name of the merged report; the extension follows the output format.
pub const DEFAULT_OUTPUT_STEM: &str = "combined_report";

/// Options for a merge run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Directory holding archives and exports; the report is written here
    pub working_dir: PathBuf,

    /// Report file, relative to `working_dir` (None = `combined_report.<ext>`)
    pub output: Option<PathBuf>,

    /// Report file format
    pub format: OutputFormat,

    /// Remove extracted archives after the report is written
    pub remove_archives: bool,

    /// Report column names
    pub header: Vec<String>,

    /// First-cell value that marks a repeated header row
    pub header_label: String,

    /// Excel layout
    pub xlsx: XlsxOptions,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            output: None,
            format: OutputFormat::Xlsx,
            remove_archives: true,
            header: REPORT_HEADER.iter().map(|h| h.to_string()).collect(),
            header_label: TASK_HEADER_LABEL.to_string(),
            xlsx: XlsxOptions::default(),
        }
    }
}

impl PipelineOptions {
    /// Create options for `working_dir` with defaults.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            ..Default::default()
        }
    }

    /// Set the report file.
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Set the report format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Keep or remove archives after a successful run.
    pub fn with_remove_archives(mut self, remove: bool) -> Self {
        self.remove_archives = remove;
        self
    }

    /// Replace the report header and the label that marks repeated headers.
    pub fn with_header<S: AsRef<str>>(mut self, header: &[S], label: impl Into<String>) -> Self {
        self.header = header.iter().map(|h| h.as_ref().to_string()).collect();
        self.header_label = label.into();
        self
    }

    /// Set the Excel layout.
    pub fn with_xlsx_options(mut self, xlsx: XlsxOptions) -> Self {
        self.xlsx = xlsx;
        self
    }

    /// Resolved report path.
    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => self.working_dir.join(path),
            None => self.working_dir.join(format!(
                "{}.{}",
                DEFAULT_OUTPUT_STEM,
                self.format.extension()
            )),
        }
    }
}

/// Run the whole merge in `options.working_dir`.
///
/// Fails on archive extraction errors, an unreadable working directory, or a
/// report that cannot be written. Unreadable exports are skipped and listed
/// in the returned report; so are archives that could not be removed.
/// Without any XML input no report file is written and the run succeeds.
pub fn run(options: &PipelineOptions) -> Result<RunReport> {
    let started = Instant::now();
    let dir = &options.working_dir;
    let mut report = RunReport::new(dir);
    info!(dir = %dir.display(), "working directory");

    let archives = find_archives(dir)?;
    let batch = extract_all(&archives, dir)?;
    info!(
        archives = batch.extracted.len(),
        files = batch.files_written,
        "archives extracted"
    );
    report.archives_extracted = batch.extracted;

    report.xml_files = find_xml_files(dir);
    if report.xml_files.is_empty() {
        warn!(dir = %dir.display(), "no XML files to process");
        match list_directory(dir) {
            Ok(entries) => info!(entries = ?entries, "directory contents"),
            Err(e) => warn!(error = %e, "cannot list directory"),
        }
        report.elapsed_ms = started.elapsed().as_millis();
        return Ok(report);
    }
    info!(count = report.xml_files.len(), "XML files found");

    let filter = RowFilter::new(&options.header_label);
    let mut aggregator = Aggregator::new(options.header.as_slice(), filter);
    aggregator.add_files(&report.xml_files);
    let aggregation = aggregator.finish();
    report.processed = aggregation.processed;
    report.skipped = aggregation.skipped;
    report.total_rows = aggregation.table.row_count();

    let output = options.output_path();
    sink_for(options.format, &options.xlsx)?.write(&aggregation.table, &output)?;
    info!(path = %output.display(), rows = report.total_rows, "report written");
    report.output = Some(output);

    if options.remove_archives {
        for archive in &report.archives_extracted {
            match fs::remove_file(archive) {
                Ok(()) => {
                    info!(archive = %archive.display(), "archive removed");
                    report.archives_removed.push(archive.clone());
                }
                Err(e) => {
                    warn!(archive = %archive.display(), error = %e, "cannot remove archive");
                    report.cleanup_failures.push(CleanupFailure {
                        archive: archive.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    report.elapsed_ms = started.elapsed().as_millis();
    info!(elapsed_ms = report.elapsed_ms as u64, "run finished");
    Ok(report)
}
