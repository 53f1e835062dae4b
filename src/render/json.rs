//! JSON report sink.

use super::ReportSink;
use crate::error::Result;
use crate::model::AggregatedTable;
use std::fs;
use std::path::Path;

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

/// Convert a table to JSON: `{"header": [...], "rows": [[...], ...]}`.
pub fn to_json(table: &AggregatedTable, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Compact => serde_json::to_string(table)?,
        JsonFormat::Pretty => serde_json::to_string_pretty(table)?,
    };
    Ok(json)
}

/// Writes the aggregated table as a JSON document.
#[derive(Debug, Clone, Default)]
pub struct JsonSink {
    format: JsonFormat,
}

impl JsonSink {
    /// Create a sink with the given formatting.
    pub fn new(format: JsonFormat) -> Self {
        Self { format }
    }
}

impl ReportSink for JsonSink {
    fn write(&self, table: &AggregatedTable, path: &Path) -> Result<()> {
        let json = to_json(table, self.format)?;
        fs::write(path, json).map_err(|e| super::output_error(path, e))
    }
}
