//! Error types for vitae library.

use std::io;
use thiserror::Error;

/// Result type alias for vitae operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while rendering, exporting or importing documents.
///
/// Template fallbacks and missing entry fields are deliberately absent: both
/// degrade the output and are reported through `log::warn!` only.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The import file extension is not one we can read.
    #[error("Unsupported import format: {0}")]
    UnsupportedImport(String),

    /// The import file contained no text at all.
    #[error("Import file is empty")]
    EmptyImport,

    /// The import file could not be decoded as text.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The import file is not valid JSON.
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// A PDF yielded too little text to be anything but a scanned image.
    #[error("PDF appears to be image-only ({extracted_chars} characters of text found)")]
    ImageOnlyPdf {
        /// Number of non-whitespace characters that could be extracted
        extracted_chars: usize,
    },

    /// Error reading a PDF during import.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// Error producing PDF output.
    #[error("PDF export error: {0}")]
    Pdf(String),

    /// Error producing DOCX output.
    #[error("DOCX export error: {0}")]
    Docx(String),

    /// Error during rendering (HTML, text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// No exporter is registered for the requested format.
    #[error("No exporter for format: {0}")]
    UnknownFormat(String),
}

impl Error {
    /// Message suitable for showing to the person who triggered the action.
    pub fn user_message(&self) -> String {
        match self {
            Error::UnsupportedImport(ext) => format!(
                "Files of type \"{}\" can't be imported. Use a .json, .txt, .md or .pdf file.",
                ext
            ),
            Error::EmptyImport => {
                "The file is empty. Choose a file that contains your resume text.".to_string()
            }
            Error::Encoding(_) => {
                "The file couldn't be read as text. Save it as UTF-8 and try again.".to_string()
            }
            Error::InvalidJson(_) => {
                "The file isn't valid JSON. Check that it was exported from a resume builder."
                    .to_string()
            }
            Error::ImageOnlyPdf { .. } => "This PDF looks like a scanned image, so there is no \
                 text to import. Export a text-based PDF from your word processor, or paste the \
                 text into a .txt file instead."
                .to_string(),
            Error::PdfParse(_) => {
                "The PDF couldn't be opened. It may be damaged or password protected.".to_string()
            }
            Error::Pdf(_) | Error::Docx(_) | Error::Render(_) => {
                format!("Export failed: {}. Please try again.", self)
            }
            Error::UnknownFormat(format) => format!("Export to \"{}\" isn't supported.", format),
            Error::Io(e) => format!("A file operation failed: {}", e),
        }
    }

    /// Whether the error was caused by the file supplied for import.
    pub fn is_import_error(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedImport(_)
                | Error::EmptyImport
                | Error::Encoding(_)
                | Error::InvalidJson(_)
                | Error::ImageOnlyPdf { .. }
                | Error::PdfParse(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidJson(err.to_string())
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            _ => Error::Docx(err.to_string()),
        }
    }
}
