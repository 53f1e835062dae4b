//! Spreadsheet-XML parser implementation.

use super::decode::decode_xml_bytes;
use crate::error::{Error, Result};
use crate::model::RawRow;
use quick_xml::events::Event;
use std::fs;
use std::path::Path;

/// Element levels that are descended into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Workbook,
    Worksheet,
    Table,
    Row,
}

impl Level {
    fn name(self) -> &'static str {
        match self {
            Level::Workbook => "Workbook",
            Level::Worksheet => "Worksheet",
            Level::Table => "Table",
            Level::Row => "Row",
        }
    }
}

/// Parser for Spreadsheet-XML exports.
pub struct WorkbookParser {
    xml: String,
}

impl WorkbookParser {
    /// Read a Spreadsheet-XML file for parsing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read(path.as_ref())?;
        Self::from_bytes(&data)
    }

    /// Create a parser from raw file bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(Self {
            xml: decode_xml_bytes(data)?,
        })
    }

    /// Create a parser from already decoded markup.
    pub fn from_xml(xml: impl Into<String>) -> Self {
        Self { xml: xml.into() }
    }

    /// Parse every row of every worksheet table, in document order.
    ///
    /// Elements are matched by local name, so `ss:Row` and `Row` are the
    /// same. Anything that is not a direct child on the
    /// `Workbook > Worksheet > Table > Row > Cell` path is skipped whole.
    pub fn parse(&self) -> Result<Vec<RawRow>> {
        let mut reader = quick_xml::Reader::from_str(&self.xml);
        // cell contents are captured verbatim, whitespace included
        reader.config_mut().trim_text(false);

        let mut rows = Vec::new();
        let mut stack: Vec<Level> = Vec::new();
        let mut current_row = RawRow::new();
        let mut seen_root = false;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let local = e.local_name();
                    match (stack.last().copied(), local.as_ref()) {
                        (None, b"Workbook") => {
                            seen_root = true;
                            stack.push(Level::Workbook);
                        }
                        (None, other) => return Err(unexpected_root(other)),
                        (Some(Level::Workbook), b"Worksheet") => stack.push(Level::Worksheet),
                        (Some(Level::Worksheet), b"Table") => stack.push(Level::Table),
                        (Some(Level::Table), b"Row") => {
                            current_row = RawRow::new();
                            stack.push(Level::Row);
                        }
                        (Some(Level::Row), b"Cell") => {
                            let inner = reader.read_text(e.name())?;
                            current_row.add_cell(inner.into_owned());
                        }
                        _ => {
                            reader.read_to_end(e.name())?;
                        }
                    }
                }
                Event::Empty(e) => {
                    let local = e.local_name();
                    match (stack.last().copied(), local.as_ref()) {
                        // `<Workbook/>` has no worksheets
                        (None, b"Workbook") => return Ok(rows),
                        (None, other) => return Err(unexpected_root(other)),
                        (Some(Level::Table), b"Row") => rows.push(RawRow::new()),
                        (Some(Level::Row), b"Cell") => current_row.add_cell(String::new()),
                        _ => {}
                    }
                }
                Event::End(_) => {
                    if stack.pop() == Some(Level::Row) {
                        rows.push(std::mem::take(&mut current_row));
                    }
                    if stack.is_empty() {
                        // trailing content after the root is ignored
                        break;
                    }
                }
                Event::Eof => {
                    return Err(match stack.last() {
                        Some(level) => Error::Format(format!(
                            "unexpected end of document inside <{}>",
                            level.name()
                        )),
                        None if !seen_root => {
                            Error::Format("missing <Workbook> root element".to_string())
                        }
                        None => Error::Format("unexpected end of document".to_string()),
                    });
                }
                _ => {}
            }
        }

        Ok(rows)
    }
}

/// Parse Spreadsheet-XML bytes into a flat row list.
pub fn parse(bytes: &[u8]) -> Result<Vec<RawRow>> {
    WorkbookParser::from_bytes(bytes)?.parse()
}

fn unexpected_root(name: &[u8]) -> Error {
    Error::Format(format!(
        "expected <Workbook> root element, found <{}>",
        String::from_utf8_lossy(name)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<?mso-application progid="Excel.Sheet"?>
<Workbook xmlns="urn:schemas-microsoft-com:office:spreadsheet"
 xmlns:ss="urn:schemas-microsoft-com:office:spreadsheet"
 xmlns:html="http://www.w3.org/TR/REC-html40">
 <Styles><Style ss:ID="s1"/></Styles>
 <Worksheet ss:Name="Scan">
  <Table ss:ExpandedColumnCount="2">
   <Column ss:Width="80"/>
   <Row><Cell><Data ss:Type="String">Задача</Data></Cell><Cell><Data ss:Type="String">IP-адрес</Data></Cell></Row>
   <Row><Cell><Data ss:Type="String">Task1</Data></Cell><Cell><ss:Data ss:Type="String"><html:Font>10.0.0.1</html:Font></ss:Data></Cell></Row>
  </Table>
  <WorksheetOptions><Selected/></WorksheetOptions>
 </Worksheet>
 <Worksheet ss:Name="Second">
  <Table>
   <Row><Cell><Data ss:Type="String">Task2</Data></Cell></Row>
  </Table>
 </Worksheet>
</Workbook>"#;

    #[test]
    fn test_parse_export() {
        let rows = parse(EXPORT.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0].cells,
            vec![
                r#"<Data ss:Type="String">Задача</Data>"#,
                r#"<Data ss:Type="String">IP-адрес</Data>"#,
            ]
        );
        assert_eq!(
            rows[1].cells[1],
            r#"<ss:Data ss:Type="String"><html:Font>10.0.0.1</html:Font></ss:Data>"#
        );
        // worksheet order preserved
        assert_eq!(rows[2].cells, vec![r#"<Data ss:Type="String">Task2</Data>"#]);
    }

    #[test]
    fn test_cell_whitespace_preserved() {
        let xml = "<Workbook><Worksheet><Table><Row><Cell>  a </Cell><Cell/></Row></Table></Worksheet></Workbook>";
        let rows = WorkbookParser::from_xml(xml).parse().unwrap();
        assert_eq!(rows, vec![RawRow::from_iter(["  a ", ""])]);
    }

    #[test]
    fn test_prefixed_elements() {
        let xml = r#"<ss:Workbook xmlns:ss="urn:x"><ss:Worksheet><ss:Table><ss:Row><ss:Cell>v</ss:Cell></ss:Row></ss:Table></ss:Worksheet></ss:Workbook>"#;
        let rows = WorkbookParser::from_xml(xml).parse().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cells, vec!["v"]);
    }

    #[test]
    fn test_empty_workbooks() {
        assert!(parse(b"<Workbook/>").unwrap().is_empty());
        assert!(parse(b"<Workbook></Workbook>").unwrap().is_empty());
        assert!(parse(b"<Workbook><Worksheet><Table/></Worksheet></Workbook>")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_empty_row_elements_are_kept() {
        let rows = parse(b"<Workbook><Worksheet><Table><Row/><Row></Row></Table></Worksheet></Workbook>")
            .unwrap();
        assert_eq!(rows, vec![RawRow::new(), RawRow::new()]);
    }

    #[test]
    fn test_only_direct_children_followed() {
        // Row outside a Table and Cell nested in a foreign element are ignored
        let xml = "<Workbook><Worksheet><Row><Cell>x</Cell></Row><Table><Row><Extra><Cell>y</Cell></Extra><Cell>z</Cell></Row></Table></Worksheet></Workbook>";
        let rows = WorkbookParser::from_xml(xml).parse().unwrap();
        assert_eq!(rows, vec![RawRow::from_iter(["z"])]);
    }

    #[test]
    fn test_wrong_root_is_format_error() {
        let err = parse(b"<html><body/></html>").unwrap_err();
        assert!(matches!(err, Error::Format(ref m) if m.contains("<html>")));
    }

    #[test]
    fn test_malformed_markup_is_format_error() {
        assert!(matches!(parse(b""), Err(Error::Format(_))));
        assert!(matches!(parse(b"not xml at all"), Err(Error::Format(_))));
        assert!(matches!(
            parse(b"<Workbook><Worksheet><Table><Row><Cell>x</Row></Table></Worksheet></Workbook>"),
            Err(Error::Format(_))
        ));
        assert!(matches!(
            parse(b"<Workbook><Worksheet><Table>"),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_trailing_content_ignored() {
        let rows = parse(b"<Workbook><Worksheet><Table><Row><Cell>1</Cell></Row></Table></Worksheet></Workbook><junk>")
            .unwrap();
        assert_eq!(rows.len(), 1);
    }
}
