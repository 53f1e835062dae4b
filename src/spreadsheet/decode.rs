//! Byte-level decoding of export files.
//!
//! Exports are UTF-8, optionally with a byte order mark. UTF-16 exports, with
//! or without a BOM, are transcoded and their declaration is rewritten to
//! UTF-8. Anything else is a format error: legacy code pages such as
//! windows-1251 are never guessed at, so a mis-encoded export is skipped
//! instead of producing mangled rows.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// `encoding` pseudo-attribute of a leading XML declaration.
static DECLARED_ENCODING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^<\?xml\s[^?>]*?encoding\s*=\s*["']([^"']*)["']"#)
        .expect("valid declaration pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Utf8,
    Utf16Le,
    Utf16Be,
}

/// Detect the encoding from the first bytes. Returns the BOM length too.
fn sniff(bytes: &[u8]) -> (Encoding, usize) {
    match bytes {
        [0xEF, 0xBB, 0xBF, ..] => (Encoding::Utf8, 3),
        [0xFF, 0xFE, ..] => (Encoding::Utf16Le, 2),
        [0xFE, 0xFF, ..] => (Encoding::Utf16Be, 2),
        // markup starts with `<`; in UTF-16 its other byte is zero
        [b'<', 0, ..] => (Encoding::Utf16Le, 0),
        [0, b'<', ..] => (Encoding::Utf16Be, 0),
        _ => (Encoding::Utf8, 0),
    }
}

/// Encoding named by the XML declaration, if there is one.
fn declared_encoding(xml: &str) -> Option<&str> {
    DECLARED_ENCODING
        .captures(xml)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Decode export bytes into markup text.
///
/// Fails with [`Error::Format`] on invalid UTF-8 or UTF-16, and on UTF-8
/// input whose declaration names any other encoding.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    let (encoding, bom) = sniff(bytes);
    let body = &bytes[bom..];

    match encoding {
        Encoding::Utf8 => {
            let xml = std::str::from_utf8(body).map_err(|e| {
                Error::Format(format!("invalid UTF-8 at byte {}", bom + e.valid_up_to()))
            })?;
            match declared_encoding(xml) {
                Some(name) if !name.eq_ignore_ascii_case("utf-8") => {
                    Err(Error::Format(format!("unsupported encoding {:?}", name)))
                }
                _ => Ok(xml.to_string()),
            }
        }
        Encoding::Utf16Le => decode_utf16(body, u16::from_le_bytes).map(declare_utf8),
        Encoding::Utf16Be => decode_utf16(body, u16::from_be_bytes).map(declare_utf8),
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(Error::Format("truncated UTF-16 input".to_string()));
    }
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));

    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::Format(format!("invalid UTF-16: {}", e)))
}

/// Point the declaration at the text's new encoding.
fn declare_utf8(mut xml: String) -> String {
    let range = DECLARED_ENCODING
        .captures(&xml)
        .and_then(|caps| caps.get(1))
        .map(|m| m.range());
    if let Some(range) = range {
        xml.replace_range(range, "UTF-8");
    }
    xml
}
