//! Text extraction from PDF imports.
//!
//! Only the text-showing operators are interpreted. Positioning is tracked
//! just far enough to know when a new line starts; there is no attempt at
//! reconstructing columns or reading order beyond content-stream order.
//! Marked content with an inline `/ActualText` replaces the text it wraps.

use std::collections::BTreeMap;

use lopdf::content::Content;
use lopdf::{Dictionary, Document as LopdfDocument, Object};

use crate::error::{Error, Result};

/// Vertical movement (in text space units) below which two runs share a line.
const SAME_LINE_TOLERANCE: f32 = 1.0;

/// `TJ` adjustments more negative than this (thousandths of an em) are
/// word gaps.
const TJ_SPACE_THRESHOLD: f32 = -200.0;

/// Extract the text of every page, pages separated by a blank line.
pub fn extract_text(data: &[u8]) -> Result<String> {
    let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
        lopdf::Error::Decryption(_) => Error::PdfParse("document is encrypted".into()),
        _ => Error::PdfParse(e.to_string()),
    })?;

    let pages = doc.get_pages();
    let mut out = Vec::with_capacity(pages.len());
    for (number, page_id) in pages {
        let content = doc
            .get_page_content(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;
        let fonts = doc.get_page_fonts(page_id).unwrap_or_default();
        let text = page_text(&doc, &fonts, &content)?;
        log::debug!("PDF page {}: {} characters", number, text.len());
        out.push(text);
    }
    Ok(out.join("\n\n").trim().to_string())
}

fn page_text(
    doc: &LopdfDocument,
    fonts: &BTreeMap<Vec<u8>, &Dictionary>,
    content: &[u8],
) -> Result<String> {
    let content = Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;
    let mut state = TextState::default();

    for op in &content.operations {
        let operands = &op.operands;
        match op.operator.as_str() {
            "BT" => {
                state.line_y = 0.0;
                state.new_block = true;
            }
            "Tf" => {
                if let Some(Object::Name(name)) = operands.first() {
                    state.font = name.clone();
                }
            }
            "Td" | "TD" => {
                if let Some(ty) = operands.get(1).and_then(number) {
                    state.line_y += ty;
                }
            }
            "Tm" => {
                if let Some(f) = operands.get(5).and_then(number) {
                    state.line_y = f;
                }
            }
            "BDC" => state.marked.push(actual_text(operands.get(1))),
            "BMC" => state.marked.push(None),
            "EMC" => {
                if let Some(Some(text)) = state.marked.pop() {
                    state.show(&text);
                }
            }
            "T*" => state.force_break = true,
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    let text = decode(doc, fonts, &state.font, bytes);
                    state.show(&text);
                }
            }
            "'" | "\"" => {
                state.force_break = true;
                if let Some(Object::String(bytes, _)) = operands.last() {
                    let text = decode(doc, fonts, &state.font, bytes);
                    state.show(&text);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    let mut text = String::new();
                    for item in items {
                        match item {
                            Object::String(bytes, _) => {
                                text.push_str(&decode(doc, fonts, &state.font, bytes))
                            }
                            other => {
                                if number(other).is_some_and(|n| n < TJ_SPACE_THRESHOLD) {
                                    text.push(' ');
                                }
                            }
                        }
                    }
                    state.show(&text);
                }
            }
            _ => {}
        }
    }

    Ok(state.out)
}

#[derive(Default)]
struct TextState {
    out: String,
    font: Vec<u8>,
    line_y: f32,
    last_y: Option<f32>,
    new_block: bool,
    force_break: bool,
    /// Open marked-content sections and their replacement text
    marked: Vec<Option<String>>,
}

impl TextState {
    fn show(&mut self, text: &str) {
        if text.is_empty() || self.marked.iter().any(Option::is_some) {
            return;
        }
        let moved = self
            .last_y
            .is_some_and(|y| (y - self.line_y).abs() > SAME_LINE_TOLERANCE);

        if !self.out.is_empty() {
            if moved || self.force_break {
                self.out.push('\n');
            } else if self.new_block
                && !self.out.ends_with(char::is_whitespace)
                && !text.starts_with(char::is_whitespace)
            {
                self.out.push(' ');
            }
        }

        self.out.push_str(text);
        self.last_y = Some(self.line_y);
        self.new_block = false;
        self.force_break = false;
    }
}

fn actual_text(properties: Option<&Object>) -> Option<String> {
    match properties? {
        Object::Dictionary(dict) => match dict.get(b"ActualText").ok()? {
            Object::String(bytes, _) => Some(decode_text_simple(bytes)),
            _ => None,
        },
        _ => None,
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

fn decode(
    doc: &LopdfDocument,
    fonts: &BTreeMap<Vec<u8>, &Dictionary>,
    font_name: &[u8],
    bytes: &[u8],
) -> String {
    if let Some(font_dict) = fonts.get(font_name) {
        if let Ok(enc) = font_dict.get_font_encoding(doc) {
            if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                return text;
            }
        }
    }
    decode_text_simple(bytes)
}

/// Text decoding fallback when no font encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::plan_resume;
    use crate::model::{Experience, ResumeDocument};
    use crate::render::{to_pdf, RenderOptions};
    use crate::template::resolve_template;

    #[test]
    fn test_decode_text_simple_utf8() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
    }

    #[test]
    fn test_decode_text_simple_latin1() {
        let bytes = [0x43, 0x61, 0x66, 0xE9];
        assert_eq!(decode_text_simple(&bytes), "Caf\u{e9}");
    }

    #[test]
    fn test_decode_text_simple_utf16be() {
        let bytes = [0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_text_simple(&bytes), "Hi");
    }

    #[test]
    fn test_extract_rendered_pdf() {
        let mut resume = ResumeDocument::with_name("Jane Doe");
        resume.experience.push(Experience {
            position: "Engineer".into(),
            company: "Acme".into(),
            bullets: vec!["Shipped the billing service".into()],
            ..Default::default()
        });
        let plan = plan_resume(&resume, resolve_template("minimal"));
        let pdf = to_pdf(&plan, &RenderOptions::default()).unwrap();

        let text = extract_text(&pdf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.first(), Some(&"Jane Doe"));
        assert!(lines.contains(&"Experience"));
        assert!(text.contains("Shipped the billing service"));
    }

    #[test]
    fn test_actual_text_replaces_glyphs() {
        let resume = ResumeDocument::with_name("\u{418}\u{432}\u{430}\u{43d} Petrov");
        let plan = plan_resume(&resume, resolve_template("classic"));
        let pdf = to_pdf(&plan, &RenderOptions::new().with_compression(false)).unwrap();

        let text = extract_text(&pdf).unwrap();
        assert_eq!(text.lines().next(), Some("\u{418}\u{432}\u{430}\u{43d} Petrov"));
        assert!(!text.contains('?'));
    }

    #[test]
    fn test_extract_garbage_fails() {
        let err = extract_text(b"%PDF-1.4\nnot really a pdf").unwrap_err();
        assert!(matches!(err, Error::PdfParse(_)));
    }
}
