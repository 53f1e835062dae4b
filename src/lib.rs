//! # vulnmerge
//!
//! Merge spreadsheet-XML vulnerability scan exports into a single report.
//!
//! Scanner exports arrive as XML Spreadsheet 2003 files, often bundled in ZIP
//! archives. This library extracts the archives safely, reads every worksheet
//! row, strips the inline formatting markup from cells, drops blank and
//! repeated-header rows, and writes all remaining rows under one fixed header.
//!
//! ## Quick Start
//!
//! ```no_run
//! use vulnmerge::{run, PipelineOptions};
//!
//! let report = run(&PipelineOptions::new("/srv/scans"))?;
//! println!("Rows: {}", report.total_rows);
//! for skipped in &report.skipped {
//!     println!("Skipped {}: {}", skipped.path.display(), skipped.reason);
//! }
//! # Ok::<(), vulnmerge::Error>(())
//! ```
//!
//! ## Component APIs
//!
//! ```no_run
//! use vulnmerge::filter::RowFilter;
//! use vulnmerge::spreadsheet::WorkbookParser;
//!
//! // Archive extraction with path containment
//! vulnmerge::archive::extract("scans.zip", "/srv/scans")?;
//!
//! // Raw rows, markup preserved
//! let raw = WorkbookParser::open("/srv/scans/export.xml")?.parse()?;
//!
//! // Normalized and filtered rows
//! let doc = vulnmerge::aggregate::select_rows(&raw, &RowFilter::default());
//! println!("{} rows kept", doc.rows.len());
//! # Ok::<(), vulnmerge::Error>(())
//! ```
//!
//! ## Features
//!
//! - `xlsx` (default): Excel report output

pub mod aggregate;
pub mod archive;
pub mod discover;
pub mod error;
pub mod filter;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod render;
pub mod spreadsheet;

// Re-exports
pub use aggregate::{aggregate_files, process_document, Aggregation, Aggregator, DocumentRows};
pub use archive::{extract, extract_all, is_contained, ArchiveBatch};
pub use error::{Error, Result};
pub use filter::{Rejection, RowFilter};
pub use model::{
    AggregatedTable, CleanupFailure, FileReport, NormalizedRow, RawRow, RunReport, SkippedFile,
    REPORT_HEADER, TASK_HEADER_LABEL,
};
pub use normalize::{normalize, normalize_row};
pub use pipeline::{run, PipelineOptions};
pub use render::{OutputFormat, ReportSink};

use std::path::Path;

/// Parse one export file and return its accepted, normalized rows.
///
/// # Example
///
/// ```no_run
/// let rows = vulnmerge::read_rows("export.xml")?;
/// println!("Rows: {}", rows.len());
/// # Ok::<(), vulnmerge::Error>(())
/// ```
pub fn read_rows(path: impl AsRef<Path>) -> Result<Vec<NormalizedRow>> {
    Ok(process_document(path, &RowFilter::default())?.rows)
}

/// Merge the given export files, in order, under [`REPORT_HEADER`].
///
/// Files that fail to parse are skipped and listed in the result.
///
/// # Example
///
/// ```no_run
/// use std::path::PathBuf;
///
/// let files = vec![PathBuf::from("a.xml"), PathBuf::from("b.xml")];
/// let merged = vulnmerge::merge_files(&files);
/// println!("Rows: {}", merged.table.row_count());
/// ```
pub fn merge_files(paths: &[impl AsRef<Path>]) -> Aggregation {
    let mut aggregator = Aggregator::new(&REPORT_HEADER, RowFilter::default());
    aggregator.add_files(paths);
    aggregator.finish()
}
