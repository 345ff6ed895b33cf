// src/report/text.rs
//! Preview text helpers: normalize scraped/classified text, then bound it.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_TAGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)</?[^>]+>").expect("valid tag regex"));
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Marker appended when a preview is cut.
pub const ELLIPSIS: &str = "...";

/// Decode HTML entities, strip tags, collapse whitespace.
pub fn normalize(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s);
    let untagged = RE_TAGS.replace_all(&decoded, "");
    RE_WS.replace_all(&untagged, " ").trim().to_string()
}

/// Keep at most `max_chars` chars (not bytes); append `...` when cut.
pub fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}{}", s[..idx].trim_end(), ELLIPSIS),
        None => s.to_string(),
    }
}

/// Normalized, bounded preview.
pub fn preview(s: &str, max_chars: usize) -> String {
    truncate(&normalize(s), max_chars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_decodes_strips_and_collapses() {
        let s = "  Ship it &amp; <b>relax</b>\n\n today  ";
        assert_eq!(normalize(s), "Ship it & relax today");
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        let s = "😍😍😍😍";
        assert_eq!(truncate(s, 2), "😍😍...");
        assert_eq!(truncate(s, 4), s);
        assert_eq!(truncate("short", 60), "short");
    }

    #[test]
    fn preview_is_bounded() {
        let long = "word ".repeat(100);
        let p = preview(&long, 100);
        assert!(p.chars().count() <= 100 + ELLIPSIS.len());
        assert!(p.ends_with(ELLIPSIS));
    }
}
