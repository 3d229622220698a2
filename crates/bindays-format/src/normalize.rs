use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n]+").expect("valid regex"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static SPACED_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*,\s*").expect("valid regex"));
static EDGE_COMMAS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^,+|,+$").expect("valid regex"));
static REPEATED_COMMAS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",{2,}").expect("valid regex"));

/// Normalize Unicode to NFC and treat line breaks as field separators.
///
/// Gazetteer exports occasionally arrive with decomposed accents or with
/// one address part per line instead of comma-delimited.
pub fn canonicalize_lines(input: &str) -> String {
    let nfc: String = input.nfc().collect();
    LINE_BREAKS.replace_all(&nfc, ",").into_owned()
}

/// Collapse whitespace runs and tidy commas into a bare `a,b,c` list.
///
/// No spaces around commas, no leading/trailing commas, no `,,`.
/// The `", "` separator is put back when segments are joined.
pub fn canonicalize_punctuation(input: &str) -> String {
    let s = WHITESPACE_RUN.replace_all(input, " ");
    let s = SPACED_COMMA.replace_all(s.trim(), ",");
    let s = REPEATED_COMMAS.replace_all(&s, ",");
    let s = EDGE_COMMAS.replace_all(&s, "");
    s.trim().to_string()
}

/// Trim trailing separators left behind after a tail has been cut off.
pub fn trim_trailing_separators(input: &str) -> &str {
    input.trim_end_matches(|c: char| c == ',' || c.is_whitespace())
}
