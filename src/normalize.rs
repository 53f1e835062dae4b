//! Cell content normalization.
//!
//! Export cells carry inline formatting markup (`<html:Font>`, `<html:U>`,
//! the `<Data>` wrapper). Tags are removed lexically and the rest is trimmed.
//! This is a text strip, not an XML parse: anything shaped like `<...>` goes,
//! including tag-like text in malformed input.

use crate::model::{NormalizedRow, RawRow};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Opening or closing tag, optionally namespaced and with attributes.
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?[^>]+>").expect("valid tag pattern"));

/// Remove every markup tag from `raw`, keeping the text between tags.
pub fn strip_tags(raw: &str) -> Cow<'_, str> {
    TAG.replace_all(raw, "")
}

/// Normalize one raw cell: strip tags, then trim surrounding whitespace.
pub fn normalize(raw: &str) -> String {
    strip_tags(raw).trim().to_string()
}

/// Normalize every cell of a row, keeping order and cardinality.
pub fn normalize_row(row: &RawRow) -> NormalizedRow {
    NormalizedRow::from_normalized(row.cells.iter().map(|c| normalize(c)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_strip_font_span() {
        assert_eq!(normalize("<ns:Font>10.0.0.5</ns:Font>  "), "10.0.0.5");
    }

    #[test]
    fn test_strip_data_wrapper_and_links() {
        let raw = r##"<Data ss:Type="String"><html:U><html:Font html:Color="#0000FF">https://nvd.nist.gov/vuln/detail/CVE-2021-44228</html:Font></html:U></Data>"##;
        assert_eq!(
            normalize(raw),
            "https://nvd.nist.gov/vuln/detail/CVE-2021-44228"
        );
    }

    #[test]
    fn test_text_between_tags_is_joined() {
        assert_eq!(normalize("<B>CVE</B>-<I>2021</I>"), "CVE-2021");
        assert_eq!(normalize("\n  line one\nline two  \t"), "line one\nline two");
    }

    #[test]
    fn test_plain_and_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("<Data ss:Type=\"String\"/>"), "");
        assert_eq!(normalize("Задача"), "Задача");
    }

    #[test]
    fn test_lexical_best_effort() {
        // entities are not decoded
        assert_eq!(normalize("a &lt;b&gt; c"), "a &lt;b&gt; c");
        // a lone bracket without a closing one survives
        assert_eq!(normalize("x < y"), "x < y");
        // comparison text that looks like a tag is removed
        assert_eq!(normalize("1 <2 and 3> 0"), "1  0");
        assert_eq!(normalize("<>"), "<>");
    }

    #[test]
    fn test_strip_tags_borrows_when_clean() {
        assert!(matches!(strip_tags("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn test_normalize_row_keeps_cardinality() {
        let raw: RawRow = ["<Data>a</Data>", "", " <b></b> "].into_iter().collect();
        let row = normalize_row(&raw);
        assert_eq!(row.cells(), &["a", "", ""]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn prop_normalize_is_idempotent(raw in r"[ a-z<>/:=\x22\t\n]{0,40}") {
            let once = normalize(&raw);
            prop_assert_eq!(normalize(&once), once.clone());
        }

        #[test]
        fn prop_normalized_has_no_tags(raw in r"[ a-z<>/]{0,40}") {
            let once = normalize(&raw);
            prop_assert!(!TAG.is_match(&once));
            prop_assert_eq!(once.trim(), once.as_str());
        }
    }
}
