//! Per-document processing and cross-document aggregation.

use crate::error::Result;
use crate::filter::RowFilter;
use crate::model::{AggregatedTable, FileReport, NormalizedRow, RawRow, SkippedFile};
use crate::normalize::normalize_row;
use crate::spreadsheet::WorkbookParser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Rows accepted from one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRows {
    /// Accepted rows, in parse order
    pub rows: Vec<NormalizedRow>,
    /// Rows dropped by the filter
    pub rejected: usize,
}

/// Normalize every raw row and keep the ones `filter` accepts.
///
/// Every cell is normalized before the filter sees the row.
pub fn select_rows(raw: &[RawRow], filter: &RowFilter<'_>) -> DocumentRows {
    let mut rows = Vec::with_capacity(raw.len());
    let mut rejected = 0;

    for raw_row in raw {
        let row = normalize_row(raw_row);
        if filter.accept(&row) {
            rows.push(row);
        } else {
            rejected += 1;
        }
    }

    DocumentRows { rows, rejected }
}

/// Read, parse, normalize and filter one Spreadsheet-XML document.
pub fn process_document(path: impl AsRef<Path>, filter: &RowFilter<'_>) -> Result<DocumentRows> {
    let raw = WorkbookParser::open(path.as_ref())?.parse()?;
    Ok(select_rows(&raw, filter))
}

/// Collects accepted rows from documents in the order they are processed.
///
/// Failed documents are recorded and skipped; they never stop the batch.
#[derive(Debug)]
pub struct Aggregator<'a> {
    table: AggregatedTable,
    filter: RowFilter<'a>,
    processed: Vec<FileReport>,
    skipped: Vec<SkippedFile>,
}

impl<'a> Aggregator<'a> {
    /// Start aggregating into an empty table with `header`.
    pub fn new<S: AsRef<str>>(header: &[S], filter: RowFilter<'a>) -> Self {
        Self {
            table: AggregatedTable::new(header),
            filter,
            processed: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Append rows after everything collected so far.
    pub fn append(&mut self, rows: Vec<NormalizedRow>) {
        self.table.append(rows);
    }

    /// Process one document and append its rows, or record why it was skipped.
    pub fn add_file(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        info!(file = %path.display(), "processing file");

        match process_document(path, &self.filter) {
            Ok(doc) => {
                info!(
                    file = %display_name(path),
                    rows = doc.rows.len(),
                    rejected = doc.rejected,
                    "processed rows"
                );
                self.processed.push(FileReport {
                    path: path.to_path_buf(),
                    rows: doc.rows.len(),
                    rejected: doc.rejected,
                });
                self.append(doc.rows);
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping file");
                self.skipped.push(SkippedFile {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        }
    }

    /// Process documents in the given order.
    pub fn add_files<P: AsRef<Path>>(&mut self, paths: impl IntoIterator<Item = P>) {
        for path in paths {
            self.add_file(path);
        }
    }

    /// Rows collected so far.
    pub fn table(&self) -> &AggregatedTable {
        &self.table
    }

    /// Finish and hand back the table plus per-file outcomes.
    pub fn finish(self) -> Aggregation {
        Aggregation {
            table: self.table,
            processed: self.processed,
            skipped: self.skipped,
        }
    }
}

/// Result of aggregating a batch of documents.
#[derive(Debug, Clone)]
pub struct Aggregation {
    /// Header plus accepted rows of every processed document
    pub table: AggregatedTable,
    /// Documents that contributed rows
    pub processed: Vec<FileReport>,
    /// Documents that failed to read or parse
    pub skipped: Vec<SkippedFile>,
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Aggregate `paths` in order with the default filter.
pub fn aggregate_files<S: AsRef<str>>(header: &[S], paths: &[PathBuf]) -> Aggregation {
    let mut aggregator = Aggregator::new(header, RowFilter::default());
    aggregator.add_files(paths);
    aggregator.finish()
}
