//! Heuristic section extraction from free text.

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::OnceLock;

use crate::layout::SectionKind;

/// Sections produced by extraction, in order.
pub const DRAFT_SECTIONS: [SectionKind; 5] = [
    SectionKind::Summary,
    SectionKind::Experience,
    SectionKind::Education,
    SectionKind::Skills,
    SectionKind::Projects,
];

/// Extracted content for one section, awaiting review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionDraft {
    pub kind: SectionKind,
    /// Raw text lines gathered under the section heading
    pub content: String,
    /// Whether the draft is applied without explicit review
    pub accepted: bool,
}

impl SectionDraft {
    fn new(kind: SectionKind) -> Self {
        Self {
            kind,
            content: String::new(),
            accepted: is_required(kind),
        }
    }

    /// Display title of the section.
    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Sections every resume is expected to have.
pub fn is_required(kind: SectionKind) -> bool {
    matches!(
        kind,
        SectionKind::Summary | SectionKind::Experience | SectionKind::Education
    )
}

fn heading_patterns() -> &'static [(SectionKind, Regex)] {
    static PATTERNS: OnceLock<Vec<(SectionKind, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let synonyms: [(SectionKind, &str); 5] = [
            (
                SectionKind::Summary,
                r"(?:professional\s+|career\s+|executive\s+)?(?:summary|profile|objective|overview)|about(?:\s+me)?",
            ),
            (
                SectionKind::Experience,
                r"(?:(?:work|professional|relevant|employment)\s+)?(?:experience|history)|employment|career\s+history",
            ),
            (
                SectionKind::Education,
                r"education(?:\s+(?:and|&)\s+training)?|academic\s+background|academics|qualifications",
            ),
            (
                SectionKind::Skills,
                r"(?:technical\s+|core\s+|key\s+)?(?:skills|competencies)|skills\s+(?:and|&)\s+\w+|expertise|technologies",
            ),
            (
                SectionKind::Projects,
                r"(?:personal\s+|key\s+|selected\s+|side\s+)?projects|portfolio",
            ),
        ];
        synonyms
            .into_iter()
            .map(|(kind, words)| {
                // Optional Markdown heading marker or bold, optional trailing colon
                // with inline content captured in `rest`.
                let pattern = format!(
                    r"(?i)^\s*(?:#{{1,6}}\s*)?(?:\*\*|__)?\s*(?:{})\s*(?:\*\*|__)?\s*(?::\s*(?P<rest>.*))?$",
                    words
                );
                (kind, Regex::new(&pattern).expect("valid regex"))
            })
            .collect()
    })
}

/// Classify a line as a section heading. Returns the section and any text
/// that follows the heading on the same line.
pub fn match_heading(line: &str) -> Option<(SectionKind, &str)> {
    heading_patterns().iter().find_map(|(kind, re)| {
        re.captures(line).map(|caps| {
            let rest = caps.name("rest").map(|m| m.as_str().trim()).unwrap_or("");
            (*kind, rest)
        })
    })
}

/// Split text into the fixed set of section drafts.
///
/// Lines before the first recognized heading belong to the summary.
pub fn extract_sections(text: &str) -> Vec<SectionDraft> {
    let mut drafts: Vec<SectionDraft> = DRAFT_SECTIONS
        .iter()
        .map(|k| SectionDraft::new(*k))
        .collect();
    let mut lines: Vec<Vec<&str>> = vec![Vec::new(); drafts.len()];
    let mut current = 0;

    for line in text.lines() {
        let line = line.trim_end();
        if let Some((kind, rest)) = match_heading(line) {
            current = DRAFT_SECTIONS
                .iter()
                .position(|k| *k == kind)
                .unwrap_or(current);
            if !rest.is_empty() {
                lines[current].push(rest);
            }
            continue;
        }
        lines[current].push(line);
    }

    for (draft, section_lines) in drafts.iter_mut().zip(lines) {
        draft.content = collapse_blank_lines(&section_lines);
    }

    log::debug!(
        "Extracted sections: {}",
        drafts
            .iter()
            .map(|d| format!("{}={}", d.kind.key(), d.content.len()))
            .collect::<Vec<_>>()
            .join(", ")
    );
    drafts
}

fn collapse_blank_lines(lines: &[&str]) -> String {
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    for &line in lines {
        let blank = line.trim().is_empty();
        if blank && out.last().map_or(true, |l| l.trim().is_empty()) {
            continue;
        }
        out.push(line);
    }
    out.join("\n").trim().to_string()
}

/// Flatten arbitrary JSON into `key: value` lines so headings can be
/// detected in it.
pub fn flatten_json(value: &Value) -> String {
    let mut lines = Vec::new();
    flatten_into(value, None, &mut lines);
    lines.join("\n")
}

fn flatten_into(value: &Value, key: Option<&str>, lines: &mut Vec<String>) {
    match value {
        Value::Null => {}
        Value::Object(map) => {
            if let Some(key) = key {
                lines.push(format!("{}:", humanize_key(key)));
            }
            for (k, v) in map {
                flatten_into(v, Some(k), lines);
            }
        }
        Value::Array(items) => {
            if items.iter().all(is_scalar) {
                let joined: Vec<String> = items.iter().filter_map(scalar_text).collect();
                if !joined.is_empty() {
                    push_scalar(lines, key, &joined.join(", "));
                }
            } else {
                if let Some(key) = key {
                    lines.push(format!("{}:", humanize_key(key)));
                }
                for item in items {
                    flatten_into(item, None, lines);
                }
            }
        }
        scalar => {
            if let Some(text) = scalar_text(scalar) {
                push_scalar(lines, key, &text);
            }
        }
    }
}

fn push_scalar(lines: &mut Vec<String>, key: Option<&str>, text: &str) {
    match key {
        Some(key) => lines.push(format!("{}: {}", humanize_key(key), text)),
        None => lines.push(text.to_string()),
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Object(_) | Value::Array(_))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// `workHistory` / `work_history` → `work history`.
fn humanize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut prev_lower = false;
    for c in key.chars() {
        if c == '_' || c == '-' {
            out.push(' ');
            prev_lower = false;
        } else if c.is_uppercase() && prev_lower {
            out.push(' ');
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.extend(c.to_lowercase());
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(drafts: &[SectionDraft], kind: SectionKind) -> &SectionDraft {
        drafts.iter().find(|d| d.kind == kind).unwrap()
    }

    #[test]
    fn test_match_heading_synonyms() {
        assert_eq!(match_heading("Work History").map(|m| m.0), Some(SectionKind::Experience));
        assert_eq!(match_heading("## Profile").map(|m| m.0), Some(SectionKind::Summary));
        assert_eq!(match_heading("TECHNICAL SKILLS:").map(|m| m.0), Some(SectionKind::Skills));
        assert_eq!(match_heading("**Education**").map(|m| m.0), Some(SectionKind::Education));
        assert_eq!(match_heading("Side Projects").map(|m| m.0), Some(SectionKind::Projects));
        assert_eq!(match_heading("Senior engineer with experience in Rust"), None);
    }

    #[test]
    fn test_match_heading_inline_content() {
        assert_eq!(
            match_heading("Skills: Rust, Go"),
            Some((SectionKind::Skills, "Rust, Go"))
        );
    }

    #[test]
    fn test_extract_sections() {
        let text = "Jane Doe\nBackend engineer.\n\n# Experience\nAcme - Engineer\n\n\n\
                    Built things\n\nEducation\nState University\nSkills: Rust, SQL\n";
        let drafts = extract_sections(text);

        let kinds: Vec<SectionKind> = drafts.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, DRAFT_SECTIONS.to_vec());
        assert_eq!(draft(&drafts, SectionKind::Summary).content, "Jane Doe\nBackend engineer.");
        assert_eq!(
            draft(&drafts, SectionKind::Experience).content,
            "Acme - Engineer\n\nBuilt things"
        );
        assert_eq!(draft(&drafts, SectionKind::Education).content, "State University");
        assert_eq!(draft(&drafts, SectionKind::Skills).content, "Rust, SQL");
        assert!(draft(&drafts, SectionKind::Projects).is_empty());
    }

    #[test]
    fn test_required_sections_accepted() {
        let drafts = extract_sections("anything");
        for d in &drafts {
            assert_eq!(d.accepted, is_required(d.kind), "{:?}", d.kind);
        }
        assert!(draft(&drafts, SectionKind::Summary).accepted);
        assert!(!draft(&drafts, SectionKind::Skills).accepted);
    }

    #[test]
    fn test_flatten_json() {
        let value = json!({
            "name": "Jane",
            "workHistory": [{"company": "Acme"}],
            "tags": ["rust", "go"],
            "empty": null
        });
        let flat = flatten_json(&value);
        assert_eq!(flat, "name: Jane\ntags: rust, go\nwork history:\ncompany: Acme");
    }

    #[test]
    fn test_humanize_key() {
        assert_eq!(humanize_key("workHistory"), "work history");
        assert_eq!(humanize_key("technical_skills"), "technical skills");
        assert_eq!(humanize_key("summary"), "summary");
    }
}
