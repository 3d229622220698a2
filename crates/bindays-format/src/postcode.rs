// UK postcode helpers.
//
// A postcode is an "outward" code (area + district, 2-4 chars) and an
// "inward" code (sector + unit, always 3 chars). We never validate the
// letter/digit pattern; we only need to split and re-space it.

/// Shortest postcode once whitespace is removed ("M11AA").
const MIN_LEN: usize = 5;
const INWARD_LEN: usize = 3;

/// Uppercase and strip all whitespace: `"tr10 8jt"` -> `"TR108JT"`.
pub fn normalize_postcode(postcode: &str) -> String {
    postcode
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Split a postcode into its (outward, inward) parts, normalized.
///
/// Returns `None` when the normalized postcode is too short to be a UK
/// postcode. Longer input is split all the same.
pub fn split_postcode(postcode: &str) -> Option<(String, String)> {
    let normalized = normalize_postcode(postcode);
    let chars: Vec<char> = normalized.chars().collect();
    if chars.len() < MIN_LEN {
        return None;
    }
    let split = chars.len() - INWARD_LEN;
    let outward: String = chars[..split].iter().collect();
    let inward: String = chars[split..].iter().collect();
    Some((outward, inward))
}

/// Display form: `"tr108jt"` -> `"TR10 8JT"`.
///
/// Inputs shorter than a postcode are returned unchanged.
pub fn format_postcode(postcode: &str) -> String {
    match split_postcode(postcode) {
        Some((outward, inward)) => format!("{outward} {inward}"),
        None => postcode.to_string(),
    }
}
