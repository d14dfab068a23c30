//! Resume import.
//!
//! Two paths, chosen per file:
//!
//! - **Legacy**: JSON that already has the resume shape (any of
//!   `personalInfo`, `experience`, `education`, `skills` at the top level)
//!   is loaded as a [`ResumeDocument`] directly.
//! - **Sections**: anything else (other JSON, plain text, Markdown, text
//!   extracted from a PDF) is split into [`SectionDraft`]s by heading
//!   detection, for the user to review.
//!
//! # Example
//!
//! ```no_run
//! use vitae::import::{import_file, ImportOptions, ImportOutcome};
//!
//! fn main() -> vitae::Result<()> {
//!     match import_file("resume.pdf", &ImportOptions::default())? {
//!         ImportOutcome::Resume(resume) => println!("Loaded {:?}", resume.full_name()),
//!         ImportOutcome::Sections(drafts) => {
//!             for draft in drafts {
//!                 println!("{}: {} chars", draft.title(), draft.content.len());
//!             }
//!         }
//!     }
//!     Ok(())
//! }
//! ```

mod pdf;
mod sections;

pub use pdf::{decode_text_simple, extract_text as extract_pdf_text};
pub use sections::{
    extract_sections, flatten_json, is_required, match_heading, SectionDraft, DRAFT_SECTIONS,
};

use crate::detect::{detect_import_format, ImportFormat};
use crate::error::{Error, Result};
use crate::model::ResumeDocument;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// Top-level keys that mark JSON as an exported resume.
pub const LEGACY_KEYS: [&str; 4] = ["personalInfo", "experience", "education", "skills"];

/// Default minimum of extracted characters for a PDF to count as text-based.
pub const DEFAULT_MIN_TEXT_CHARS: usize = 30;

/// Options for import.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// PDFs yielding fewer non-whitespace characters than this are treated
    /// as scanned images
    pub min_text_chars: usize,
}

impl ImportOptions {
    /// Create new import options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the image-only PDF threshold.
    pub fn with_min_text_chars(mut self, chars: usize) -> Self {
        self.min_text_chars = chars;
        self
    }
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            min_text_chars: DEFAULT_MIN_TEXT_CHARS,
        }
    }
}

/// What an import produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum ImportOutcome {
    /// A complete resume loaded from legacy JSON.
    Resume(ResumeDocument),
    /// Section drafts extracted heuristically, in fixed order.
    Sections(Vec<SectionDraft>),
}

impl ImportOutcome {
    pub fn as_resume(&self) -> Option<&ResumeDocument> {
        match self {
            ImportOutcome::Resume(resume) => Some(resume),
            ImportOutcome::Sections(_) => None,
        }
    }

    pub fn sections(&self) -> Option<&[SectionDraft]> {
        match self {
            ImportOutcome::Resume(_) => None,
            ImportOutcome::Sections(drafts) => Some(drafts),
        }
    }

    /// Whether the legacy path was taken.
    pub fn is_resume(&self) -> bool {
        matches!(self, ImportOutcome::Resume(_))
    }
}

/// Import a file from disk.
pub fn import_file<P: AsRef<Path>>(path: P, options: &ImportOptions) -> Result<ImportOutcome> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    import_bytes(&data, &path.to_string_lossy(), options)
}

/// Import a file asynchronously.
#[cfg(feature = "async")]
pub async fn import_file_async<P: AsRef<Path>>(
    path: P,
    options: &ImportOptions,
) -> Result<ImportOutcome> {
    let path = path.as_ref();
    let data = tokio::fs::read(path).await?;
    import_bytes(&data, &path.to_string_lossy(), options)
}

/// Import file contents. `file_name` supplies the extension used for format
/// detection.
pub fn import_bytes(
    data: &[u8],
    file_name: &str,
    options: &ImportOptions,
) -> Result<ImportOutcome> {
    let format = detect_import_format(file_name, data)?;
    log::debug!("Importing '{}' as {} ({} bytes)", file_name, format, data.len());

    match format {
        ImportFormat::Json => import_json(&decode_text_bytes(data)?),
        ImportFormat::Text | ImportFormat::Markdown => {
            let text = decode_text_bytes(data)?;
            if text.trim().is_empty() {
                return Err(Error::EmptyImport);
            }
            Ok(ImportOutcome::Sections(extract_sections(&text)))
        }
        ImportFormat::Pdf => {
            if data.is_empty() {
                return Err(Error::EmptyImport);
            }
            let text = pdf::extract_text(data)?;
            let extracted_chars = text.chars().filter(|c| !c.is_whitespace()).count();
            if extracted_chars < options.min_text_chars {
                log::warn!(
                    "PDF '{}' yielded {} characters; treating as image-only",
                    file_name,
                    extracted_chars
                );
                return Err(Error::ImageOnlyPdf { extracted_chars });
            }
            Ok(ImportOutcome::Sections(extract_sections(&text)))
        }
    }
}

/// Import JSON text, choosing the legacy or section path.
pub fn import_json(json: &str) -> Result<ImportOutcome> {
    if json.trim().is_empty() {
        return Err(Error::EmptyImport);
    }
    let value: Value = serde_json::from_str(json)?;

    if is_legacy_resume(&value) {
        log::debug!("JSON import has resume shape; loading directly");
        let resume: ResumeDocument = serde_json::from_value(value)?;
        return Ok(ImportOutcome::Resume(resume));
    }

    let text = flatten_json(&value);
    if text.trim().is_empty() {
        return Err(Error::EmptyImport);
    }
    Ok(ImportOutcome::Sections(extract_sections(&text)))
}

/// Check for any of the [`LEGACY_KEYS`] at the top level.
pub fn is_legacy_resume(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|map| LEGACY_KEYS.iter().any(|key| map.contains_key(*key)))
}

/// Decode text bytes, honoring UTF-8 and UTF-16 byte order marks.
fn decode_text_bytes(data: &[u8]) -> Result<String> {
    match data {
        [0xEF, 0xBB, 0xBF, rest @ ..] => decode_text_bytes(rest),
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
        _ => String::from_utf8(data.to_vec()).map_err(|e| {
            Error::Encoding(format!(
                "invalid UTF-8 at byte {}",
                e.utf8_error().valid_up_to()
            ))
        }),
    }
}

fn decode_utf16(data: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    if data.len() % 2 != 0 {
        return Err(Error::Encoding("truncated UTF-16 text".into()));
    }
    let units: Vec<u16> = data.chunks_exact(2).map(|c| unit([c[0], c[1]])).collect();
    String::from_utf16(&units).map_err(|e| Error::Encoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::SectionKind;

    #[test]
    fn test_import_options_builder() {
        let options = ImportOptions::new().with_min_text_chars(5);
        assert_eq!(options.min_text_chars, 5);
        assert_eq!(ImportOptions::default().min_text_chars, DEFAULT_MIN_TEXT_CHARS);
    }

    #[test]
    fn test_legacy_json() {
        let json = r#"{"personalInfo": {"fullName": "Jane Doe"}, "skills": ["Rust"]}"#;
        let outcome = import_json(json).unwrap();
        let resume = outcome.as_resume().unwrap();
        assert_eq!(resume.full_name(), Some("Jane Doe"));
        assert_eq!(resume.skills[0].name, "Rust");
    }

    #[test]
    fn test_generic_json_yields_drafts() {
        let outcome = import_json(r#"{"title": "Senior Engineer"}"#).unwrap();
        let drafts = outcome.sections().unwrap();
        assert_eq!(drafts.len(), 5);
        assert_eq!(drafts[0].kind, SectionKind::Summary);
        assert_eq!(drafts[0].content, "title: Senior Engineer");
        let accepted: Vec<bool> = drafts.iter().map(|d| d.accepted).collect();
        assert_eq!(accepted, vec![true, true, true, false, false]);
    }

    #[test]
    fn test_json_errors() {
        assert!(matches!(import_json("  "), Err(Error::EmptyImport)));
        assert!(matches!(import_json("{not json"), Err(Error::InvalidJson(_))));
        assert!(matches!(import_json("{}"), Err(Error::EmptyImport)));
    }

    #[test]
    fn test_text_import() {
        let outcome = import_bytes(
            b"Summary\nBuilder of things\nSkills\nRust",
            "cv.txt",
            &ImportOptions::default(),
        )
        .unwrap();
        let drafts = outcome.sections().unwrap();
        assert_eq!(drafts[0].content, "Builder of things");
        assert_eq!(drafts[3].content, "Rust");
    }

    #[test]
    fn test_encoding_errors() {
        let err = import_bytes(&[0x66, 0xFF, 0xFE, 0x41], "cv.md", &ImportOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));

        let err = import_bytes(b" \n\t", "cv.txt", &ImportOptions::default()).unwrap_err();
        assert!(matches!(err, Error::EmptyImport));
    }

    #[test]
    fn test_bom_is_stripped() {
        let mut data = vec![0xEF, 0xBB, 0xBF];
        data.extend_from_slice(b"Profile: hello");
        let outcome = import_bytes(&data, "cv.txt", &ImportOptions::default()).unwrap();
        assert_eq!(outcome.sections().unwrap()[0].content, "hello");

        let utf16: Vec<u8> = [0xFF, 0xFE]
            .into_iter()
            .chain("Hi".encode_utf16().flat_map(|u| u.to_le_bytes()))
            .collect();
        assert_eq!(decode_text_bytes(&utf16).unwrap(), "Hi");
    }

    #[test]
    fn test_empty_pdf() {
        let err = import_bytes(b"", "cv.pdf", &ImportOptions::default()).unwrap_err();
        assert!(matches!(err, Error::EmptyImport));
    }
}
