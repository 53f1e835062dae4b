//! Table model structures.

use serde::{Deserialize, Serialize};

/// Label of the first ("task") column.
///
/// Export files repeat their header row inside the data region; a row whose
/// first cell equals this label is such a repeat.
pub const TASK_HEADER_LABEL: &str = "Задача";

/// Column names of the merged report, in output order.
pub const REPORT_HEADER: [&str; 17] = [
    TASK_HEADER_LABEL,
    "IP-адрес",
    "Host_primary",
    "Операционная система",
    "Сервис/ПО",
    "ID",
    "CVE",
    "CVSS v2",
    "CVSS v3",
    "Уровень опасности",
    "Уязвимость",
    "Как исправить",
    "Ссылки",
    "Неустановленное обновление",
    "Ссылки на обновления",
    "Дата выпуска обновления",
    "Дата публикации",
];

/// One physical worksheet row, cells as found in the markup.
///
/// Cell strings may still carry inline formatting tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    /// Raw cell contents, in column order
    #[serde(default)]
    pub cells: Vec<String>,
}

impl RawRow {
    /// Create a new empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cell to this row.
    pub fn add_cell(&mut self, cell: impl Into<String>) {
        self.cells.push(cell.into());
    }

    /// Get the number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for RawRow {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// A row whose every cell has been stripped of markup and trimmed.
///
/// Only [`crate::normalize::normalize_row`] builds these, so a row is never
/// partially normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NormalizedRow {
    cells: Vec<String>,
}

impl NormalizedRow {
    pub(crate) fn from_normalized(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Plain cell values, in column order.
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// First cell, if any.
    pub fn first(&self) -> Option<&str> {
        self.cells.first().map(String::as_str)
    }

    /// Get the number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether every cell is the empty string (vacuously true for no cells).
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(String::is_empty)
    }
}

/// Fixed header plus every accepted row of every processed document.
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedTable {
    /// Column names, supplied by the caller
    pub header: Vec<String>,
    /// Accepted rows, in processing order
    pub rows: Vec<NormalizedRow>,
}

impl AggregatedTable {
    /// Create an empty table with the given header.
    pub fn new<S: AsRef<str>>(header: &[S]) -> Self {
        Self {
            header: header.iter().map(|h| h.as_ref().to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Create an empty table with [`REPORT_HEADER`].
    pub fn with_report_header() -> Self {
        Self::new(&REPORT_HEADER)
    }

    /// Append rows after the ones already collected, keeping their order.
    pub fn append(&mut self, rows: impl IntoIterator<Item = NormalizedRow>) {
        self.rows.extend(rows);
    }

    /// Get the number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of header columns.
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Check if the table holds no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Default for AggregatedTable {
    fn default() -> Self {
        Self::with_report_header()
    }
}
