//! Excel report sink.

use super::options::XlsxOptions;
use super::ReportSink;
use crate::error::Result;
use crate::model::AggregatedTable;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};
use std::path::Path;
use tracing::warn;
use unicode_width::UnicodeWidthStr;

/// Longest text an Excel cell can hold, in characters.
pub const MAX_CELL_CHARS: usize = 32_767;

/// Cut `value` to [`MAX_CELL_CHARS`] on a character boundary.
///
/// Returns the text to write and whether anything was cut.
pub fn fit_cell(value: &str) -> (&str, bool) {
    match value.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => (&value[..end], true),
        None => (value, false),
    }
}

/// Column widths for `table`: widest data cell per header column, capped at
/// `max_column_width`, plus padding. Header text does not count.
pub fn column_widths(table: &AggregatedTable, options: &XlsxOptions) -> Vec<f64> {
    (0..table.column_count())
        .map(|col| {
            let widest = table
                .rows
                .iter()
                .filter_map(|row| row.cells().get(col))
                .map(|cell| cell.width())
                .max()
                .unwrap_or(0);
            (widest.min(options.max_column_width) + options.column_padding) as f64
        })
        .collect()
}

/// Writes the aggregated table as a single-sheet Excel workbook.
#[derive(Debug, Clone, Default)]
pub struct XlsxSink {
    options: XlsxOptions,
}

impl XlsxSink {
    /// Create a sink with the given layout options.
    pub fn new(options: XlsxOptions) -> Self {
        Self { options }
    }

    fn header_format(&self) -> Format {
        let format = Format::new()
            .set_bold()
            .set_background_color(Color::RGB(self.options.header_fill))
            .set_align(FormatAlign::Center);
        self.bordered(format)
    }

    fn bordered(&self, format: Format) -> Format {
        if self.options.borders {
            format
                .set_border(FormatBorder::Thin)
                .set_border_color(Color::Black)
        } else {
            format
        }
    }

    /// Build the workbook in memory.
    pub fn build(&self, table: &AggregatedTable) -> Result<Workbook> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.options.sheet_name)?;

        let header_format = self.header_format();
        let cell_format = self.bordered(Format::new());

        for (col, name) in table.header.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, name, &header_format)?;
        }

        for (idx, row) in table.rows.iter().enumerate() {
            let row_num = idx as u32 + 1;
            let width = row.len().max(table.column_count());
            for col in 0..width {
                match row.cells().get(col) {
                    Some(value) if !value.is_empty() => {
                        let (text, truncated) = fit_cell(value);
                        if truncated {
                            warn!(
                                row = row_num + 1,
                                column = col + 1,
                                chars = value.chars().count(),
                                "cell truncated to Excel limit"
                            );
                        }
                        worksheet.write_string_with_format(row_num, col as u16, text, &cell_format)?;
                    }
                    _ => {
                        worksheet.write_blank(row_num, col as u16, &cell_format)?;
                    }
                }
            }
        }

        for (col, width) in column_widths(table, &self.options).into_iter().enumerate() {
            worksheet.set_column_width(col as u16, width)?;
        }

        Ok(workbook)
    }
}

impl ReportSink for XlsxSink {
    fn write(&self, table: &AggregatedTable, path: &Path) -> Result<()> {
        let mut workbook = self.build(table)?;
        workbook.save(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::select_rows;
    use crate::filter::RowFilter;
    use crate::model::{RawRow, REPORT_HEADER};
    use std::io::Read;

    fn table(rows: &[&[&str]]) -> AggregatedTable {
        let raw: Vec<RawRow> = rows.iter().map(|r| r.iter().copied().collect()).collect();
        let mut table = AggregatedTable::with_report_header();
        table.append(select_rows(&raw, &RowFilter::default()).rows);
        table
    }

    #[test]
    fn test_column_widths() {
        let long = "x".repeat(80);
        let t = table(&[&["Task1", "10.0.0.1"], &["T2", long.as_str()]]);
        let widths = column_widths(&t, &XlsxOptions::default());

        assert_eq!(widths.len(), 17);
        assert_eq!(widths[0], 7.0);
        // capped at 50
        assert_eq!(widths[1], 52.0);
        // no data in this column
        assert_eq!(widths[16], 2.0);
    }

    #[test]
    fn test_column_widths_use_display_width() {
        let t = table(&[&["Уязвимость"]]);
        let widths = column_widths(&t, &XlsxOptions::default());
        assert_eq!(widths[0], 12.0);
    }

    #[test]
    fn test_sink_writes_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("combined_report.xlsx");
        let t = table(&[&["Task1", "10.0.0.1"], &["Task2", "10.0.0.2"]]);

        XlsxSink::default().write(&t, &path).unwrap();

        let file = std::fs::File::open(&path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        let mut strings = String::new();
        archive
            .by_name("xl/sharedStrings.xml")
            .unwrap()
            .read_to_string(&mut strings)
            .unwrap();
        assert!(strings.contains(REPORT_HEADER[0]));
        assert!(strings.contains("Task2"));
        assert!(strings.contains("10.0.0.1"));
    }

    #[test]
    fn test_fit_cell() {
        assert_eq!(fit_cell("short"), ("short", false));

        let exact = "x".repeat(MAX_CELL_CHARS);
        assert_eq!(fit_cell(&exact), (exact.as_str(), false));

        // multi-byte text is cut on a character boundary
        let long = "Я".repeat(MAX_CELL_CHARS + 10);
        let (text, truncated) = fit_cell(&long);
        assert!(truncated);
        assert_eq!(text.chars().count(), MAX_CELL_CHARS);
        assert!(text.chars().all(|c| c == 'Я'));
    }

    #[test]
    fn test_oversized_cell_is_truncated_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("combined_report.xlsx");
        let long = "x".repeat(40_000);
        let t = table(&[&["Task1", long.as_str()], &["Task2", "10.0.0.2"]]);

        XlsxSink::default().write(&t, &path).unwrap();

        let file = std::fs::File::open(&path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        let mut strings = String::new();
        archive
            .by_name("xl/sharedStrings.xml")
            .unwrap()
            .read_to_string(&mut strings)
            .unwrap();
        assert!(strings.contains(&"x".repeat(MAX_CELL_CHARS)));
        assert!(!strings.contains(&"x".repeat(MAX_CELL_CHARS + 1)));
        assert!(strings.contains("Task2"));
    }

    #[test]
    fn test_sink_reports_output_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing/combined_report.xlsx");
        let err = XlsxSink::default().write(&table(&[]), &path).unwrap_err();
        assert!(matches!(err, crate::Error::Output(_)));
    }
}
