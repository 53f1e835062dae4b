//! Report sinks for the aggregated table.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use vulnmerge::model::AggregatedTable;
//! use vulnmerge::render::{JsonFormat, JsonSink, ReportSink};
//!
//! let table = AggregatedTable::with_report_header();
//! JsonSink::new(JsonFormat::Pretty).write(&table, Path::new("report.json"))?;
//! # Ok::<(), vulnmerge::Error>(())
//! ```

mod json;
mod options;
#[cfg(feature = "xlsx")]
mod xlsx;

pub use json::{to_json, JsonFormat, JsonSink};
pub use options::{OutputFormat, XlsxOptions};
#[cfg(feature = "xlsx")]
pub use xlsx::{column_widths, fit_cell, XlsxSink, MAX_CELL_CHARS};

use crate::error::{Error, Result};
use crate::model::AggregatedTable;
use std::path::Path;

/// Persists a header plus data rows as a tabular document.
pub trait ReportSink {
    /// Write `table` to `path`, replacing any existing file.
    fn write(&self, table: &AggregatedTable, path: &Path) -> Result<()>;
}

/// Pick the sink for `format`.
pub fn sink_for(format: OutputFormat, xlsx: &XlsxOptions) -> Result<Box<dyn ReportSink>> {
    match format {
        #[cfg(feature = "xlsx")]
        OutputFormat::Xlsx => Ok(Box::new(XlsxSink::new(xlsx.clone()))),
        #[cfg(not(feature = "xlsx"))]
        OutputFormat::Xlsx => {
            let _ = xlsx;
            Err(Error::Output("built without xlsx support".to_string()))
        }
        OutputFormat::Json => Ok(Box::new(JsonSink::default())),
    }
}

fn output_error(path: &Path, err: std::io::Error) -> Error {
    Error::Output(format!("{}: {}", path.display(), err))
}
