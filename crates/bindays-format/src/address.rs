// Address display normalization.
//
// Turns a raw gazetteer string such as
//   "FLAT 1, LOWER BUDOCK MILL, HILL HEAD, PENRYN, CORNWALL, TR10 8JT, 100040012454"
// into a short list label:
//   "Flat 1, Lower Budock Mill, Hill Head, Penryn"
//
// Pipeline:
//   1. canonicalize Unicode and line breaks
//   2. strip trailing noise (postcode, county, UPRN) until nothing changes
//   3. canonicalize whitespace and commas
//   4. split into segments and title-case each one
//   5. keep the first few segments and join with ", ", re-stripping any
//      noise the cut left at the end
//   6. fall back to the first raw segment if nothing survived

use regex::Regex;
use std::sync::LazyLock;

use crate::normalize::{canonicalize_lines, canonicalize_punctuation, trim_trailing_separators};
use crate::postcode::{normalize_postcode, split_postcode};
use crate::title_case::title_case;

/// Returned when there is nothing displayable in the input.
pub const INVALID_ADDRESS: &str = "Invalid Address";

pub const DEFAULT_COUNTIES: &[&str] = &["Cornwall", "Devon"];

/// Flat / building / street / locality.
pub const DEFAULT_MAX_SEGMENTS: usize = 4;

/// What may sit in front of a trailing fragment: a comma with optional
/// whitespace, plain whitespace, or the start of the string.
const TAIL_SEPARATOR: &str = r"(?:^|\s*,\s*|\s+)";

static TRAILING_UPRN: LazyLock<Regex> =
    LazyLock::new(|| tail_regex(r"\d{10,12}").expect("valid regex"));

static DEFAULT_FORMATTER: LazyLock<AddressFormatter> = LazyLock::new(AddressFormatter::default);

/// Build a case-insensitive matcher for `body` anchored at the end of the string.
fn tail_regex(body: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?i){TAIL_SEPARATOR}{body}\s*$"))
}

/// Matcher for the postcode at the end of an address, with or without
/// the space between outward and inward codes.
fn postcode_regex(postcode: &str) -> Option<Regex> {
    let (outward, inward) = split_postcode(postcode)?;
    tail_regex(&format!(
        r"{}\s?{}",
        regex::escape(&outward),
        regex::escape(&inward)
    ))
    .ok()
}

fn county_regex(county: &str) -> Option<Regex> {
    let county = county.trim();
    if county.is_empty() {
        return None;
    }
    tail_regex(&format!(r"\b{}\b", regex::escape(county))).ok()
}

/// Remove one match of `re` and tidy the new end of the string.
fn strip_tail(text: &str, re: &Regex) -> String {
    let stripped = re.replace(text, "");
    trim_trailing_separators(stripped.trim()).to_string()
}

/// Strip the postcode when it is the last thing in the address.
///
/// Postcode-like text anywhere else is left alone.
pub fn strip_trailing_postcode(text: &str, postcode: &str) -> String {
    match postcode_regex(postcode) {
        Some(re) => strip_tail(text, &re),
        None => text.to_string(),
    }
}

/// Strip a county name when it is the last whole word of the address.
pub fn strip_trailing_county(text: &str, county: &str) -> String {
    match county_regex(county) {
        Some(re) => strip_tail(text, &re),
        None => text.to_string(),
    }
}

/// Strip a trailing 10-12 digit run (a UPRN leaked into the text).
pub fn strip_trailing_uprn(text: &str) -> String {
    strip_tail(text, &TRAILING_UPRN)
}

/// Split a canonicalized string into trimmed, non-empty segments.
pub fn split_segments(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Keep at most `max_segments` segments and join them for display.
pub fn bound_and_join(segments: &[String], max_segments: usize) -> String {
    segments
        .iter()
        .take(max_segments)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Last resort when the pipeline removed everything: the first raw segment,
/// title-cased, unless that segment is only the postcode.
pub fn fallback_display(original: &str, postcode: Option<&str>) -> String {
    let Some(first) = original.split(',').map(str::trim).find(|s| !s.is_empty()) else {
        return INVALID_ADDRESS.to_string();
    };

    if let Some(postcode) = postcode.map(normalize_postcode).filter(|p| !p.is_empty()) {
        if normalize_postcode(first).contains(&postcode) {
            return INVALID_ADDRESS.to_string();
        }
    }

    let titled = title_case(first);
    if titled.is_empty() {
        INVALID_ADDRESS.to_string()
    } else {
        titled
    }
}

/// Address normalizer with a configurable county list and segment limit.
#[derive(Debug, Clone)]
pub struct AddressFormatter {
    counties: Vec<Regex>,
    max_segments: usize,
}

impl Default for AddressFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTIES, DEFAULT_MAX_SEGMENTS)
    }
}

impl AddressFormatter {
    pub fn new<S: AsRef<str>>(counties: &[S], max_segments: usize) -> Self {
        Self {
            counties: counties
                .iter()
                .filter_map(|c| county_regex(c.as_ref()))
                .collect(),
            max_segments: max_segments.max(1),
        }
    }

    pub fn max_segments(&self) -> usize {
        self.max_segments
    }

    /// Normalize `text` into a display address.
    ///
    /// `postcode` is the postcode the address was looked up under; when
    /// absent the postcode-stripping step is skipped. Never fails: empty
    /// input gives [`INVALID_ADDRESS`].
    pub fn format(&self, text: Option<&str>, postcode: Option<&str>) -> String {
        let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
            return INVALID_ADDRESS.to_string();
        };
        let postcode_re = postcode.and_then(postcode_regex);

        let cleaned = canonicalize_lines(text);
        let cleaned = self.strip_trailing_noise(&cleaned, postcode_re.as_ref());
        let cleaned = canonicalize_punctuation(&cleaned);

        let segments: Vec<String> = split_segments(&cleaned)
            .iter()
            .map(|s| title_case(s))
            .filter(|s| !s.is_empty())
            .collect();
        let mut display = bound_and_join(&segments, self.max_segments);

        // Cutting to the segment limit can expose a county, postcode or UPRN
        // as the new tail; keep stripping until the label is stable so that
        // formatting a label again leaves it unchanged.
        loop {
            let stripped = self.strip_trailing_noise(&display, postcode_re.as_ref());
            if stripped == display {
                break;
            }
            let segments = split_segments(&canonicalize_punctuation(&stripped));
            display = bound_and_join(&segments, self.max_segments);
        }

        if !display.is_empty() {
            return display;
        }

        tracing::debug!(raw = %text, "Nothing left after cleanup, using first segment");
        fallback_display(text, postcode)
    }

    /// Repeatedly strip postcode, counties and UPRN from the end until the
    /// string stops changing, so any order of trailing noise is removed.
    pub fn strip_trailing_noise(&self, text: &str, postcode: Option<&Regex>) -> String {
        let mut current = trim_trailing_separators(text.trim()).to_string();
        loop {
            let mut next = current.clone();
            if let Some(re) = postcode {
                next = strip_tail(&next, re);
            }
            for county in &self.counties {
                next = strip_tail(&next, county);
            }
            next = strip_tail(&next, &TRAILING_UPRN);

            if next == current {
                return next;
            }
            current = next;
        }
    }
}

/// Normalize with the default county list and segment limit.
pub fn format_display_address(text: Option<&str>, postcode: Option<&str>) -> String {
    DEFAULT_FORMATTER.format(text, postcode)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TR10: &str = "TR10 8JT";

    fn fmt(text: &str) -> String {
        format_display_address(Some(text), Some(TR10))
    }

    #[test]
    fn test_flat_with_county_postcode_and_uprn() {
        assert_eq!(
            fmt("FLAT 1, LOWER BUDOCK MILL, HILL HEAD, PENRYN, CORNWALL, TR10 8JT, 100040012454"),
            "Flat 1, Lower Budock Mill, Hill Head, Penryn"
        );
    }

    #[test]
    fn test_short_address_loses_all_trailing_noise() {
        assert_eq!(
            fmt("HILL HEAD, LOWER BUDOCK, PENRYN, CORNWALL, TR10 8JT, 100040012457"),
            "Hill Head, Lower Budock, Penryn"
        );
    }

    #[test]
    fn test_number_inside_building_name() {
        assert_eq!(
            fmt("FLAT 3, THE OLD BLACKSMITHS SHOP, 3 HILL HEAD, PENRYN, CORNWALL, TR10 8JT"),
            "Flat 3, The Old Blacksmiths Shop, 3 Hill Head, Penryn"
        );
    }

    #[test]
    fn test_missing_or_blank_input_is_invalid() {
        assert_eq!(format_display_address(None, Some(TR10)), INVALID_ADDRESS);
        assert_eq!(format_display_address(Some(""), Some(TR10)), INVALID_ADDRESS);
        assert_eq!(format_display_address(Some("   "), None), INVALID_ADDRESS);
    }

    #[test]
    fn test_postcode_variants_at_end() {
        assert_eq!(fmt("hill head, penryn tr108jt"), "Hill Head, Penryn");
        assert_eq!(fmt("HILL HEAD,PENRYN,TR10 8JT ,"), "Hill Head, Penryn");
        assert_eq!(
            format_display_address(Some("HILL HEAD, PENRYN, TR10 8JT"), Some("tr108jt")),
            "Hill Head, Penryn"
        );
    }

    #[test]
    fn test_postcode_elsewhere_is_kept() {
        assert_eq!(fmt("TR10 8JT HOUSE, PENRYN"), "Tr10 8JT House, Penryn");
    }

    #[test]
    fn test_without_postcode_skips_stripping() {
        assert_eq!(
            format_display_address(Some("HILL HEAD, PENRYN, TR10 8JT"), None),
            "Hill Head, Penryn, Tr10 8JT"
        );
    }

    #[test]
    fn test_county_must_be_whole_word() {
        assert_eq!(fmt("1 ROAD, DEVONSHIRE"), "1 Road, Devonshire");
        assert_eq!(fmt("1 ROAD, devon"), "1 Road");
        assert_eq!(strip_trailing_county("1 ROAD, CORNWALL ", "Cornwall"), "1 ROAD");
    }

    #[test]
    fn test_uprn_length_bounds() {
        assert_eq!(strip_trailing_uprn("PENRYN, 100040012454"), "PENRYN");
        assert_eq!(strip_trailing_uprn("PENRYN 1000400124"), "PENRYN");
        assert_eq!(strip_trailing_uprn("PENRYN, 100040012"), "PENRYN, 100040012");
        assert_eq!(strip_trailing_uprn("PENRYN, 1000400124541"), "PENRYN, 1000400124541");
    }

    #[test]
    fn test_strip_trailing_postcode_only_once_at_end() {
        assert_eq!(
            strip_trailing_postcode("TR10 8JT, PENRYN, TR10 8JT", TR10),
            "TR10 8JT, PENRYN"
        );
        assert_eq!(strip_trailing_postcode("PENRYN", "bad"), "PENRYN");
    }

    #[test]
    fn test_segment_limit() {
        assert_eq!(fmt("A, B, C, D, E, F"), "A, B, C, D");
        let two = AddressFormatter::new(&["Somerset"], 2);
        assert_eq!(two.format(Some("1 LANE, WELLS, SOMERSET"), None), "1 Lane, Wells");
        assert_eq!(two.format(Some("1 LANE, WELLS, CORNWALL"), None), "1 Lane, Wells");
        assert_eq!(two.format(Some("1 LANE, CORNWALL"), None), "1 Lane, Cornwall");
    }

    #[test]
    fn test_fallback_uses_first_raw_segment() {
        assert_eq!(fmt("CORNWALL"), "Cornwall");
        assert_eq!(fmt("TR10 8JT"), INVALID_ADDRESS);
        assert_eq!(fmt(",,,"), INVALID_ADDRESS);
        assert_eq!(fallback_display("  , FLAT 2 , X", None), "Flat 2");
    }

    #[test]
    fn test_newline_delimited_input() {
        assert_eq!(fmt("FLAT 1\nHILL HEAD\nPENRYN\nTR10 8JT"), "Flat 1, Hill Head, Penryn");
    }

    #[test]
    fn test_parenthesized_part() {
        assert_eq!(
            fmt("BARN (PART OF), TREVENA FARM, PENRYN, TR10 8JT"),
            "Barn (Part Of), Trevena Farm, Penryn"
        );
    }

    #[test]
    fn test_output_invariants() {
        let inputs = [
            "FLAT 1, LOWER BUDOCK MILL, HILL HEAD, PENRYN, CORNWALL, TR10 8JT, 100040012454",
            ",, ,FLAT 2 ,, HILL HEAD ,PENRYN,, TR108JT,",
            "  ONE   TWO , THREE,FOUR, FIVE, SIX, TR10 8JT ",
            "hill head penryn tr10 8jt",
            "1A, THE MEWS (REAR), PENRYN, DEVON, TR10 8JT, 100040099999",
            ", , ,",
            "TR10 8JT",
            "X",
        ];
        for input in inputs {
            let out = fmt(input);
            assert!(!out.starts_with(','), "leading comma: {out:?}");
            assert!(!out.ends_with(','), "trailing comma: {out:?}");
            assert!(!out.contains(",,"), "double comma: {out:?}");
            assert!(out.split(',').count() <= 4, "too many segments: {out:?}");
            assert!(out.split(',').all(|s| !s.trim().is_empty()), "empty segment: {out:?}");
            let squashed = normalize_postcode(&out);
            assert!(!squashed.contains("TR108JT"), "postcode survived: {out:?}");
        }
    }

    #[test]
    fn test_noise_exposed_by_segment_limit_is_stripped() {
        assert_eq!(
            fmt("FLAT 2, MILL HOUSE, HILL HEAD, NORTH DEVON, PENRYN, TR10 8JT"),
            "Flat 2, Mill House, Hill Head, North"
        );
        assert_eq!(fmt("UNIT 1, A, B, TR10 8JT, PENRYN"), "Unit 1, A, B");
        assert_eq!(fmt("UNIT 1, A, B, 100040012454, PENRYN"), "Unit 1, A, B");
        assert_eq!(fmt("CORNWALL, DEVON, TR10 8JT, 100040012454, PENRYN"), "Cornwall");
    }

    #[test]
    fn test_idempotent_on_own_output() {
        let inputs = [
            "FLAT 1, LOWER BUDOCK MILL, HILL HEAD, PENRYN, CORNWALL, TR10 8JT, 100040012454",
            "HILL HEAD, LOWER BUDOCK, PENRYN, CORNWALL, TR10 8JT, 100040012457",
            "FLAT1A, 22B HIGH STREET (PART OF), PENRYN, TR10 8JT",
            "FLAT 2, MILL HOUSE, HILL HEAD, NORTH DEVON, PENRYN, TR10 8JT",
            "UNIT 1, A, B, TR10 8JT, PENRYN",
            "UNIT 1, A, B, 100040012454, PENRYN",
        ];
        for input in inputs {
            let once = fmt(input);
            assert_eq!(fmt(&once), once);
        }
    }
}
