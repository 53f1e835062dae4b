//! Row acceptance policy.

use crate::model::{NormalizedRow, TASK_HEADER_LABEL};

/// Why a row was left out of the result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Every cell is empty
    Blank,
    /// The row repeats the column header
    RepeatedHeader,
}

/// Decides which normalized rows make it into the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowFilter<'a> {
    header_label: &'a str,
}

impl Default for RowFilter<'static> {
    fn default() -> Self {
        Self::new(TASK_HEADER_LABEL)
    }
}

impl<'a> RowFilter<'a> {
    /// Filter that treats rows starting with `header_label` as header repeats.
    pub fn new(header_label: &'a str) -> Self {
        Self { header_label }
    }

    /// Classify a row. Blank rows are checked before header repeats.
    pub fn check(&self, row: &NormalizedRow) -> Result<(), Rejection> {
        if row.is_blank() {
            return Err(Rejection::Blank);
        }
        if row.first() == Some(self.header_label) {
            return Err(Rejection::RepeatedHeader);
        }
        Ok(())
    }

    /// Whether the row belongs in the result set.
    pub fn accept(&self, row: &NormalizedRow) -> bool {
        self.check(row).is_ok()
    }
}

/// Accept a row using the default task header label.
pub fn accept(row: &NormalizedRow) -> bool {
    RowFilter::default().accept(row)
}
