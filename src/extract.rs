//! Script-variable extractor
//!
//! The modem's web pages carry their data as JavaScript string literals
//! (`var tagValueList = '...';`) inside inline `<script>` blocks. This module
//! walks the parsed document for those blocks and scans their text for the
//! literals assigned to a given variable.

use scraper::{ElementRef, Html};

/// Marker identifying the identity script on the status page
pub const STATUS_SCRIPT_MARKER: &str = "tagValueList";

/// Marker identifying the channel-table script on the data page
pub const DATA_SCRIPT_MARKER: &str = "InitDsTableTagValue";

/// Variable holding the pipe-delimited records
pub const TAG_VALUE_LIST: &str = "tagValueList";

/// Extract every literal assigned to `variable_name` inside `<script>`
/// elements whose text contains `script_marker`.
///
/// Literals are returned in document order. No matching script yields an
/// empty vector.
pub fn extract_tag_value_lists(html: &str, script_marker: &str, variable_name: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    extract_from_document(&document, script_marker, variable_name)
}

/// Same as [`extract_tag_value_lists`] on an already parsed document
pub fn extract_from_document(
    document: &Html,
    script_marker: &str,
    variable_name: &str,
) -> Vec<String> {
    let mut lists = Vec::new();
    for script in elements_named(document, "script") {
        let text: String = script.text().collect();
        if text.contains(script_marker) {
            lists.extend(scan_assignments(&text, variable_name));
        }
    }
    lists
}

/// Content of `<meta name="description">`, if present
pub fn meta_description(document: &Html) -> Option<String> {
    elements_named(document, "meta")
        .find(|meta| meta.value().attr("name") == Some("description"))
        .and_then(|meta| meta.value().attr("content"))
        .map(str::to_string)
}

fn elements_named<'a>(document: &'a Html, tag: &'a str) -> impl Iterator<Item = ElementRef<'a>> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(move |el| el.value().name() == tag)
}

/// Scan `text` for `name = '<literal>'` assignments.
///
/// `name` must not be the tail of a longer identifier and `==` comparisons are
/// ignored. A backslash escapes the next character; the literal is returned
/// verbatim. Empty literals are skipped and an unterminated literal ends the
/// scan.
pub fn scan_assignments(text: &str, name: &str) -> Vec<String> {
    let bytes = text.as_bytes();
    let mut found = Vec::new();
    let mut pos = 0;

    if name.is_empty() {
        return found;
    }

    while let Some(offset) = text[pos..].find(name) {
        let start = pos + offset;
        pos = start + name.len();

        if start > 0 && is_ident_byte(bytes[start - 1]) {
            continue;
        }

        let mut cursor = skip_whitespace(bytes, pos);
        if bytes.get(cursor) != Some(&b'=') || bytes.get(cursor + 1) == Some(&b'=') {
            continue;
        }
        cursor = skip_whitespace(bytes, cursor + 1);
        if bytes.get(cursor) != Some(&b'\'') {
            continue;
        }

        let literal_start = cursor + 1;
        let Some(literal_end) = closing_quote(bytes, literal_start) else {
            break;
        };
        if literal_end > literal_start {
            found.push(text[literal_start..literal_end].to_string());
        }
        pos = literal_end + 1;
    }

    found
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos).is_some_and(|b| b.is_ascii_whitespace()) {
        pos += 1;
    }
    pos
}

fn closing_quote(bytes: &[u8], mut pos: usize) -> Option<usize> {
    while let Some(&b) = bytes.get(pos) {
        match b {
            b'\\' => pos += 2,
            b'\'' => return Some(pos),
            _ => pos += 1,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_single_assignment() {
        let text = "var tagValueList = '3|a|b|c|';";
        assert_eq!(scan_assignments(text, "tagValueList"), vec!["3|a|b|c|"]);
    }

    #[test]
    fn test_scan_multiple_in_order() {
        let text = r#"
            function InitUsTableTagValue() {
                var tagValueList = 'up';
            }
            function InitDsTableTagValue() {
                var tagValueList='down';
            }
        "#;
        assert_eq!(scan_assignments(text, "tagValueList"), vec!["up", "down"]);
    }

    #[test]
    fn test_scan_whitespace_around_equals() {
        let text = "tagValueList \t=\n  'x|y'";
        assert_eq!(scan_assignments(text, "tagValueList"), vec!["x|y"]);
    }

    #[test]
    fn test_scan_ignores_longer_identifier() {
        let text = "var mytagValueList = 'no'; var tagValueList2 = 'no';";
        assert!(scan_assignments(text, "tagValueList").is_empty());
    }

    #[test]
    fn test_scan_ignores_comparison_and_reads() {
        let text = "if (tagValueList == 'no') { x = tagValueList.split('|'); }";
        assert!(scan_assignments(text, "tagValueList").is_empty());
    }

    #[test]
    fn test_scan_escaped_quote() {
        let text = r"var tagValueList = 'it\'s|ok'; var tagValueList = 'next';";
        assert_eq!(
            scan_assignments(text, "tagValueList"),
            vec![r"it\'s|ok", "next"]
        );
    }

    #[test]
    fn test_scan_skips_empty_literal() {
        let text = "var tagValueList = ''; var tagValueList = '1|a';";
        assert_eq!(scan_assignments(text, "tagValueList"), vec!["1|a"]);
    }

    #[test]
    fn test_scan_unterminated_literal() {
        let text = "var tagValueList = 'ok'; var tagValueList = 'broken";
        assert_eq!(scan_assignments(text, "tagValueList"), vec!["ok"]);
    }

    #[test]
    fn test_extract_filters_by_marker() {
        let html = r#"<html><head>
            <script>var tagValueList = 'unrelated';</script>
            <script>
            function InitDsTableTagValue() { var tagValueList = 'ds'; }
            </script>
            </head><body></body></html>"#;
        let lists = extract_tag_value_lists(html, DATA_SCRIPT_MARKER, TAG_VALUE_LIST);
        assert_eq!(lists, vec!["ds"]);
    }

    #[test]
    fn test_extract_across_scripts_in_document_order() {
        let html = r#"<html><body>
            <script>// InitDsTableTagValue
            var tagValueList = 'first';</script>
            <p>text</p>
            <script>InitDsTableTagValue(); var tagValueList = 'second';</script>
            </body></html>"#;
        let lists = extract_tag_value_lists(html, DATA_SCRIPT_MARKER, TAG_VALUE_LIST);
        assert_eq!(lists, vec!["first", "second"]);
    }

    #[test]
    fn test_extract_no_matching_script() {
        let html = "<html><body><script>var other = 'x';</script></body></html>";
        assert!(extract_tag_value_lists(html, DATA_SCRIPT_MARKER, TAG_VALUE_LIST).is_empty());
    }

    #[test]
    fn test_script_with_markup_characters() {
        let html = "<html><head><script>if (a < b && tagValueList) {}\n\
                    var tagValueList = '1|<b>|';</script></head></html>";
        let lists = extract_tag_value_lists(html, STATUS_SCRIPT_MARKER, TAG_VALUE_LIST);
        assert_eq!(lists, vec!["1|<b>|"]);
    }

    #[test]
    fn test_meta_description_present() {
        let doc = Html::parse_document(
            r#"<html><head><meta name="description" content="CM1000"></head></html>"#,
        );
        assert_eq!(meta_description(&doc), Some("CM1000".to_string()));
    }

    #[test]
    fn test_meta_description_absent() {
        let doc = Html::parse_document(
            r#"<html><head><meta name="keywords" content="modem"></head></html>"#,
        );
        assert_eq!(meta_description(&doc), None);
    }

    #[test]
    fn test_meta_description_without_content() {
        let doc = Html::parse_document(r#"<html><head><meta name="description"></head></html>"#);
        assert_eq!(meta_description(&doc), None);
    }
}
