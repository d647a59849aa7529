//! Text cleanup helpers shared by the site adapters.
//!
//! Store-locator markup is hand-edited on the remote side, so the same
//! handful of fixes are needed everywhere:
//! - non-breaking spaces inside addresses
//! - phone numbers buried in free text
//! - quote characters around coordinate arguments
//! - service tags that must be joined into one column

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;

/// Placeholder written when an optional field is missing from an entry.
pub const PLACEHOLDER: &str = "-";

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{2,3}-\d{3,4}-\d{4}").expect("phone pattern is valid"));

/// Replace non-breaking spaces (U+00A0) with ordinary spaces.
///
/// Nothing else is touched, so applying it twice is the same as once.
pub fn normalize_whitespace(text: &str) -> String {
    text.replace('\u{a0}', " ")
}

/// Find every phone number in `text` and join them with `", "`.
///
/// Numbers are matched against `\d{2,3}-\d{3,4}-\d{4}`. Returns an empty
/// string when nothing matches.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(extract_phones("tel 02-123-4567 / 010-1234-5678"), "02-123-4567, 010-1234-5678");
/// assert_eq!(extract_phones("no phone here"), "");
/// ```
pub fn extract_phones(text: &str) -> String {
    PHONE_RE.find_iter(text).map(|m| m.as_str()).join(", ")
}

/// Remove every single-quote character. Only used on coordinate tokens.
pub fn strip_quotes(text: &str) -> String {
    text.replace('\'', "")
}

/// Join service tags into one column.
///
/// Every tag but the last gets a `", "` suffix, then the last tag is
/// appended bare. A single tag therefore comes back unchanged. Returns
/// `None` for an empty list, since there is no last tag to append.
pub fn join_service_tags<S: AsRef<str>>(tags: &[S]) -> Option<String> {
    let (last, rest) = tags.split_last()?;
    let mut joined = String::new();
    for tag in rest {
        joined.push_str(tag.as_ref());
        joined.push_str(", ");
    }
    joined.push_str(last.as_ref());
    Some(joined)
}

/// Text content of an element with each text node trimmed and the pieces
/// concatenated without a separator.
pub fn stripped_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Split a comma-separated argument list and return the trimmed,
/// quote-free fields at `index` and `index + 1`.
///
/// Used for coordinate pairs embedded in `href` pseudo-calls and
/// `onclick` handlers.
///
/// # Arguments
///
/// * `arguments` - Argument list without the call syntax, e.g. `'37.5', '127.0'`
/// * `index` - Position of the first field of the pair
///
/// # Returns
///
/// `Some((first, second))` with quotes and surrounding whitespace removed,
/// or `None` when the list has fewer than `index + 2` fields.
pub fn coordinate_pair(arguments: &str, index: usize) -> Option<(String, String)> {
    let fields: Vec<&str> = arguments.split(',').collect();
    let lat = fields.get(index)?.trim();
    let lon = fields.get(index + 1)?.trim();
    Some((strip_quotes(lat), strip_quotes(lon)))
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at the nearest char boundary at or below `max`
/// bytes, with a byte count indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}
