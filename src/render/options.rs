//! Report output options.

use serde::Serialize;

/// File format of the merged report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Excel workbook with styled header
    #[default]
    Xlsx,
    /// JSON document with `header` and `rows`
    Json,
}

impl OutputFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Json => "json",
        }
    }
}

/// Layout options for the Excel report.
#[derive(Debug, Clone, PartialEq)]
pub struct XlsxOptions {
    /// Worksheet name
    pub sheet_name: String,

    /// Upper bound for a column's content width, in characters
    pub max_column_width: usize,

    /// Extra characters added to every column width
    pub column_padding: usize,

    /// Header background color (0xRRGGBB)
    pub header_fill: u32,

    /// Draw thin borders around header and data cells
    pub borders: bool,
}

impl Default for XlsxOptions {
    fn default() -> Self {
        Self {
            sheet_name: "Sheet1".to_string(),
            max_column_width: 50,
            column_padding: 2,
            header_fill: 0xD9D9D9,
            borders: true,
        }
    }
}

impl XlsxOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the worksheet name.
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Set the content width cap.
    pub fn with_max_column_width(mut self, width: usize) -> Self {
        self.max_column_width = width.max(1);
        self
    }

    /// Set the header background color.
    pub fn with_header_fill(mut self, rgb: u32) -> Self {
        self.header_fill = rgb & 0xFF_FFFF;
        self
    }

    /// Enable or disable cell borders.
    pub fn with_borders(mut self, borders: bool) -> Self {
        self.borders = borders;
        self
    }
}
