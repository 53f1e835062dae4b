//! Spreadsheet-XML (XML Spreadsheet 2003) table parser.
//!
//! Only the subset used by scan exports is understood:
//! `Workbook > Worksheet > Table > Row > Cell`. Cell contents are returned
//! verbatim, inline formatting tags included.
//!
//! # Example
//!
//! ```no_run
//! use vulnmerge::spreadsheet::WorkbookParser;
//!
//! let rows = WorkbookParser::open("export.xml")?.parse()?;
//! for row in &rows {
//!     println!("{}", row.cells.join(" | "));
//! }
//! # Ok::<(), vulnmerge::Error>(())
//! ```

mod decode;
mod parser;

pub use decode::decode_xml_bytes;
pub use parser::{parse, WorkbookParser};
