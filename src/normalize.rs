//! Text normalization shared by every renderer.
//!
//! All free text passes through these functions exactly once, in the layout
//! plan, so the preview, PDF, and DOCX backends see identical strings.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

/// Base filename used when a resume has no name.
pub const DEFAULT_FILENAME: &str = "Resume";

/// Label used for ongoing date ranges.
pub const PRESENT: &str = "Present";

/// Separator between the start and end of a date range.
pub const RANGE_SEPARATOR: &str = " \u{2013} ";

/// Collapse all whitespace (including newlines) to single spaces and trim.
///
/// Text is NFC-normalized first so that composed and decomposed input
/// render identically. Control characters other than whitespace are
/// dropped; they are invalid in DOCX XML. The function is idempotent.
pub fn normalize_text(s: &str) -> String {
    let composed: String = s
        .nfc()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect();
    composed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Format a single date for display.
///
/// `YYYY-MM` becomes `Jan 2020`, `YYYY-MM-DD` becomes `Jan 5, 2020`;
/// anything else (free text such as "Summer 2019", or `12-05` without a
/// four-digit year) is only normalized.
pub fn format_date(s: &str) -> String {
    let s = normalize_text(s);
    if s.eq_ignore_ascii_case(PRESENT) || s.eq_ignore_ascii_case("current") {
        return PRESENT.to_string();
    }
    let has_full_year = s.len() > 4
        && s.as_bytes()[..4].iter().all(u8::is_ascii_digit)
        && s.as_bytes()[4] == b'-';
    if !has_full_year {
        return s;
    }
    if let Ok(date) = NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
        return date.format("%b %-d, %Y").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d") {
        return date.format("%b %Y").to_string();
    }
    s
}

/// Render `"{start} – {end|Present}"`.
///
/// A blank side renders as an empty segment: the separator is dropped and
/// the other side is returned alone. Never fails.
pub fn format_date_range(start: &str, end: &str, is_current: bool) -> String {
    let start = format_date(start);
    let end = if is_current {
        PRESENT.to_string()
    } else {
        format_date(end)
    };

    match (start.is_empty(), end.is_empty()) {
        (false, false) => format!("{}{}{}", start, RANGE_SEPARATOR, end),
        (false, true) => start,
        (true, false) => end,
        (true, true) => String::new(),
    }
}

/// Normalize a location string and fix spacing around commas.
pub fn format_location(s: &str) -> String {
    static COMMA: OnceLock<Regex> = OnceLock::new();
    let comma = COMMA.get_or_init(|| Regex::new(r"\s*,\s*").expect("valid regex"));

    let text = normalize_text(s);
    let text = comma.replace_all(&text, ", ");
    text.trim_matches(|c: char| c == ',' || c.is_whitespace())
        .to_string()
}

/// Build an export filename.
///
/// A blank name becomes `"Resume"`; `-{version}` is appended only when a
/// non-blank version label is supplied.
pub fn generate_filename(name: Option<&str>, version: Option<&str>, ext: &str) -> String {
    filename_with_fallback(name, DEFAULT_FILENAME, version, ext)
}

/// Same as [`generate_filename`] with a caller-chosen fallback base name.
pub fn filename_with_fallback(
    name: Option<&str>,
    fallback: &str,
    version: Option<&str>,
    ext: &str,
) -> String {
    let base = name.map(sanitize_filename_part).unwrap_or_default();
    let mut filename = if base.is_empty() {
        fallback.to_string()
    } else {
        base
    };

    if let Some(version) = version.map(sanitize_filename_part) {
        if !version.is_empty() {
            filename.push('-');
            filename.push_str(&version);
        }
    }

    let ext = ext.trim().trim_start_matches('.');
    if !ext.is_empty() {
        filename.push('.');
        filename.push_str(ext);
    }
    filename
}

fn sanitize_filename_part(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*'))
        .filter(|c| !c.is_control())
        .collect();
    normalize_text(&cleaned)
        .trim_matches('.')
        .trim()
        .to_string()
}

/// Kind of profile link found in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    LinkedIn,
    GitHub,
    Website,
}

impl ProfileKind {
    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            ProfileKind::LinkedIn => "LinkedIn",
            ProfileKind::GitHub => "GitHub",
            ProfileKind::Website => "Website",
        }
    }
}

/// Turn a profile value into a canonical URL.
///
/// Bare LinkedIn/GitHub usernames expand to their profile URLs, values that
/// already carry a scheme are returned unchanged, and schemeless host paths
/// get `https://`.
pub fn expand_profile_url(kind: ProfileKind, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }
    if has_scheme(value) {
        return value.to_string();
    }

    let value = value.trim_start_matches('@').trim_end_matches('/');
    let lower = value.to_lowercase();
    match kind {
        ProfileKind::LinkedIn if !lower.contains("linkedin.com") => {
            format!("https://linkedin.com/in/{}", value)
        }
        ProfileKind::GitHub if !lower.contains("github.com") => {
            format!("https://github.com/{}", value)
        }
        _ => format!("https://{}", value),
    }
}

/// Check whether a string starts with a URI scheme (`https:`, `mailto:`, ...).
pub fn has_scheme(value: &str) -> bool {
    static SCHEME: OnceLock<Regex> = OnceLock::new();
    let scheme = SCHEME.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:(//|[^/\s\d])").expect("valid regex")
    });
    scheme.is_match(value)
}

/// Normalize each part and join the non-empty ones.
pub fn join_segments<'a, I>(parts: I, separator: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    parts
        .into_iter()
        .map(normalize_text)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text_collapses_whitespace() {
        assert_eq!(normalize_text("  Led\n\n the   team\t"), "Led the team");
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("\n\r\n"), "");
    }

    #[test]
    fn test_normalize_text_idempotent() {
        let inputs = ["a\n\nb", "  x  y ", "Cafe\u{301}\nlatte", "\u{a0}nbsp\u{a0}"];
        for input in inputs {
            let once = normalize_text(input);
            assert_eq!(normalize_text(&once), once);
            assert!(!once.contains('\n'));
        }
    }

    #[test]
    fn test_normalize_text_strips_control_chars() {
        assert_eq!(normalize_text("a\u{1}b  c"), "ab c");
        assert_eq!(normalize_text("x\u{7f}\u{0}y\tz"), "xy z");
    }

    #[test]
    fn test_normalize_text_composes_unicode() {
        assert_eq!(normalize_text("Cafe\u{301}"), "Caf\u{e9}");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2020-01"), "Jan 2020");
        assert_eq!(format_date("2021-03-05"), "Mar 5, 2021");
        assert_eq!(format_date("Summer  2019"), "Summer 2019");
        assert_eq!(format_date("present"), "Present");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn test_format_date_short_year_unchanged() {
        assert_eq!(format_date("12-05"), "12-05");
        assert_eq!(format_date("212-05-01"), "212-05-01");
        assert_eq!(format_date("2019"), "2019");
    }

    #[test]
    fn test_format_date_range() {
        assert_eq!(
            format_date_range("2020-01", "2022-06", false),
            "Jan 2020 \u{2013} Jun 2022"
        );
        assert_eq!(
            format_date_range("2020-01", "2022-06", true),
            "Jan 2020 \u{2013} Present"
        );
        assert_eq!(format_date_range("", "2022", false), "2022");
        assert_eq!(format_date_range("2019", "", false), "2019");
        assert_eq!(format_date_range("", "", true), "Present");
        assert_eq!(format_date_range("", "", false), "");
    }

    #[test]
    fn test_format_location() {
        assert_eq!(format_location("Austin ,TX"), "Austin, TX");
        assert_eq!(format_location(" Berlin,  Germany, "), "Berlin, Germany");
        assert_eq!(format_location(""), "");
    }

    #[test]
    fn test_generate_filename() {
        assert_eq!(generate_filename(None, None, "pdf"), "Resume.pdf");
        assert_eq!(
            generate_filename(Some("Jane Doe"), Some("v2"), "docx"),
            "Jane Doe-v2.docx"
        );
        assert_eq!(generate_filename(Some("   "), Some(""), ".json"), "Resume.json");
        assert_eq!(generate_filename(Some("A/B: C"), None, "pdf"), "AB C.pdf");
    }

    #[test]
    fn test_filename_with_fallback() {
        assert_eq!(
            filename_with_fallback(None, "cover-letter", None, "docx"),
            "cover-letter.docx"
        );
    }

    #[test]
    fn test_expand_profile_url() {
        assert_eq!(
            expand_profile_url(ProfileKind::LinkedIn, "johndoe"),
            "https://linkedin.com/in/johndoe"
        );
        assert_eq!(
            expand_profile_url(ProfileKind::LinkedIn, "https://linkedin.com/in/johndoe"),
            "https://linkedin.com/in/johndoe"
        );
        assert_eq!(
            expand_profile_url(ProfileKind::GitHub, "@octocat"),
            "https://github.com/octocat"
        );
        assert_eq!(
            expand_profile_url(ProfileKind::GitHub, "github.com/octocat"),
            "https://github.com/octocat"
        );
        assert_eq!(
            expand_profile_url(ProfileKind::Website, "jane.dev"),
            "https://jane.dev"
        );
        assert_eq!(expand_profile_url(ProfileKind::Website, "  "), "");
    }

    #[test]
    fn test_has_scheme() {
        assert!(has_scheme("https://x.dev"));
        assert!(has_scheme("mailto:jane@x.dev"));
        assert!(!has_scheme("x.dev/path"));
        assert!(!has_scheme("localhost:8080"));
    }

    #[test]
    fn test_join_segments() {
        assert_eq!(
            join_segments(["a", " ", "b\nc"], " | "),
            "a | b c"
        );
    }
}
