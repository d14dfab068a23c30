//! Import format detection.
//!
//! The extension decides the format; PDFs must additionally carry the
//! `%PDF-` header so a renamed file fails early with a clear error.

use crate::error::{Error, Result};
use std::fmt;
use std::path::Path;

/// File formats accepted for import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportFormat {
    Json,
    Text,
    Markdown,
    Pdf,
}

impl ImportFormat {
    /// Map a file extension (with or without the dot) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim().trim_start_matches('.').to_lowercase().as_str() {
            "json" => Some(ImportFormat::Json),
            "txt" | "text" => Some(ImportFormat::Text),
            "md" | "markdown" => Some(ImportFormat::Markdown),
            "pdf" => Some(ImportFormat::Pdf),
            _ => None,
        }
    }

    /// Whether the format is read as UTF-8 text.
    pub fn is_textual(&self) -> bool {
        !matches!(self, ImportFormat::Pdf)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImportFormat::Json => "json",
            ImportFormat::Text => "txt",
            ImportFormat::Markdown => "md",
            ImportFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Detect the import format of a file from its name and leading bytes.
///
/// # Returns
/// * `Err(Error::UnsupportedImport)` if the extension is missing or unknown
/// * `Err(Error::PdfParse)` if a `.pdf` file lacks the PDF header
pub fn detect_import_format(file_name: &str, data: &[u8]) -> Result<ImportFormat> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    let format = ImportFormat::from_extension(ext).ok_or_else(|| {
        Error::UnsupportedImport(if ext.is_empty() {
            "(none)".to_string()
        } else {
            ext.to_lowercase()
        })
    })?;

    if format == ImportFormat::Pdf {
        // Empty files are reported as empty, not as broken PDFs.
        if !data.is_empty() && !is_pdf_bytes(data) {
            return Err(Error::PdfParse("missing %PDF- header".into()));
        }
        if let Some(version) = pdf_version(data) {
            log::debug!("Detected PDF {} import", version);
        }
    }
    Ok(format)
}

/// Extract the version from a PDF header (`"1.7"` from `%PDF-1.7`).
pub fn pdf_version(data: &[u8]) -> Option<String> {
    if data.len() < PDF_MAGIC_LEN + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return None;
    }
    let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();
    if is_valid_version(&version) {
        Some(version)
    } else {
        None
    }
}

fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}

/// Check if bytes start with a PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    data.starts_with(PDF_MAGIC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(
            detect_import_format("resume.JSON", b"{}").unwrap(),
            ImportFormat::Json
        );
        assert_eq!(
            detect_import_format("notes.markdown", b"# Hi").unwrap(),
            ImportFormat::Markdown
        );
        assert_eq!(
            detect_import_format("/tmp/cv.txt", b"Jane").unwrap(),
            ImportFormat::Text
        );
    }

    #[test]
    fn test_detect_pdf_requires_magic() {
        assert_eq!(
            detect_import_format("cv.pdf", b"%PDF-1.7\n").unwrap(),
            ImportFormat::Pdf
        );
        let err = detect_import_format("cv.pdf", b"<html>").unwrap_err();
        assert!(matches!(err, Error::PdfParse(_)));
    }

    #[test]
    fn test_detect_unsupported() {
        let err = detect_import_format("cv.docx", b"PK").unwrap_err();
        assert!(matches!(err, Error::UnsupportedImport(ref ext) if ext == "docx"));

        let err = detect_import_format("README", b"text").unwrap_err();
        assert!(matches!(err, Error::UnsupportedImport(ref ext) if ext == "(none)"));
    }

    #[test]
    fn test_pdf_version() {
        assert_eq!(pdf_version(b"%PDF-2.0\n"), Some("2.0".to_string()));
        assert_eq!(pdf_version(b"%PDF"), None);
        assert_eq!(pdf_version(b"%PDF-x.y"), None);
    }
}
