// Title-casing for address segments.
//
// Source data is frequently ALL CAPS, so a segment is lowercased first and
// then each token is re-capitalized. House numbers and flat identifiers
// ("1a", "flat1a") need their letter suffix uppercased rather than the
// usual first-letter-only treatment.

use regex::Regex;
use std::sync::LazyLock;

static NUMBER_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)([[:alpha:]]+)$").expect("valid regex"));
static WORD_NUMBER_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([[:alpha:]]+)(\d+)([[:alpha:]]*)$").expect("valid regex")
});

/// Title-case one address segment: `"FLAT 1A (PART OF)"` -> `"Flat 1A (Part Of)"`.
pub fn title_case(segment: &str) -> String {
    let lowered = segment.to_lowercase();
    group_tokens(&lowered)
        .iter()
        .map(|token| title_case_token(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Capitalize a single (already lowercased) token.
pub fn title_case_token(token: &str) -> String {
    if token.chars().all(|c| c.is_ascii_digit()) {
        return token.to_string();
    }

    if let Some(inner) = token.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        if inner.trim().is_empty() {
            return "()".to_string();
        }
        return format!("({})", title_case(inner));
    }

    // "1a" -> "1A"
    if let Some(caps) = NUMBER_SUFFIX.captures(token) {
        return format!("{}{}", &caps[1], caps[2].to_uppercase());
    }

    // "flat1a" -> "Flat1A", "block2" -> "Block2"
    if let Some(caps) = WORD_NUMBER_SUFFIX.captures(token) {
        return format!(
            "{}{}{}",
            capitalize(&caps[1].to_lowercase()),
            &caps[2],
            caps[3].to_uppercase()
        );
    }

    capitalize(token)
}

/// Uppercase the first character and lowercase the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out: String = first.to_uppercase().collect();
            out.push_str(&chars.as_str().to_lowercase());
            out
        }
        None => String::new(),
    }
}

/// Split on whitespace, keeping a parenthesized run such as `(part of)`
/// together as one token. An unclosed `(` falls back to plain tokens.
fn group_tokens(segment: &str) -> Vec<String> {
    let words: Vec<&str> = segment.split_whitespace().collect();
    let mut tokens = Vec::with_capacity(words.len());
    let mut i = 0;

    while i < words.len() {
        let word = words[i];
        if word.starts_with('(') && !word.ends_with(')') {
            if let Some(offset) = words[i + 1..].iter().position(|w| w.ends_with(')')) {
                let end = i + 1 + offset;
                tokens.push(words[i..=end].join(" "));
                i = end + 1;
                continue;
            }
        }
        tokens.push(word.to_string());
        i += 1;
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_rules() {
        assert_eq!(title_case("1a"), "1A");
        assert_eq!(title_case("flat1a"), "Flat1A");
        assert_eq!(title_case("(part of)"), "(Part Of)");
        assert_eq!(title_case("3"), "3");
    }

    #[test]
    fn test_all_caps_segment() {
        assert_eq!(title_case("LOWER BUDOCK MILL"), "Lower Budock Mill");
        assert_eq!(title_case("FLAT 1"), "Flat 1");
        assert_eq!(title_case("22B HIGH STREET"), "22B High Street");
        assert_eq!(title_case("BLOCK2"), "Block2");
    }

    #[test]
    fn test_parentheses() {
        assert_eq!(title_case("()"), "()");
        assert_eq!(title_case("( )"), "()");
        assert_eq!(title_case("BARN (PART OF) TREVENA"), "Barn (Part Of) Trevena");
        assert_eq!(title_case("(annexe)"), "(Annexe)");
        assert_eq!(title_case("(flat1a)"), "(Flat1A)");
    }

    #[test]
    fn test_unclosed_parenthesis_is_plain_tokens() {
        assert_eq!(title_case("(part of"), "(part Of");
    }

    #[test]
    fn test_already_title_cased_is_stable() {
        for s in ["Flat 1", "Flat1A", "(Part Of)", "3 Hill Head", "The Old Blacksmiths Shop"] {
            assert_eq!(title_case(s), s);
        }
    }

    #[test]
    fn test_collapses_inner_whitespace() {
        assert_eq!(title_case("HILL   HEAD"), "Hill Head");
    }
}
