//! Exporter registry providing one entry point for every output format.
//!
//! Each format is an [`Exporter`]; the [`ExporterRegistry`] maps extensions
//! and names to exporters and can fan one document out to several formats.
//!
//! # Example
//!
//! ```no_run
//! use vitae::export::{ExportFormat, ExportOptions, ExporterRegistry};
//! use vitae::ResumeDocument;
//!
//! fn main() -> vitae::Result<()> {
//!     let registry = ExporterRegistry::with_defaults();
//!     let resume = ResumeDocument::with_name("Jane Doe");
//!
//!     let artifacts = registry.export_all(
//!         &resume,
//!         &[ExportFormat::Pdf, ExportFormat::Docx],
//!         &ExportOptions::default(),
//!     )?;
//!     for artifact in artifacts {
//!         println!("{} ({} bytes)", artifact.filename, artifact.len());
//!     }
//!     Ok(())
//! }
//! ```

mod exporters;

pub use exporters::{DocxExporter, HtmlExporter, JsonExporter, PdfExporter, TextExporter};

use crate::error::{Error, Result};
use crate::model::{CoverLetterDocument, PersonalInfo, ResumeDocument};
use crate::normalize::{filename_with_fallback, generate_filename};
use crate::render::{JsonFormat, RenderOptions};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Fallback base name for cover letters without a company.
pub const COVER_LETTER_FILENAME: &str = "cover-letter";

/// Output formats known to the default registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Pdf,
    Docx,
    Html,
    Json,
    Text,
}

impl ExportFormat {
    /// Every format, in the order `all` exports them.
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Pdf,
        ExportFormat::Docx,
        ExportFormat::Html,
        ExportFormat::Json,
        ExportFormat::Text,
    ];

    /// Canonical file extension (no dot).
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Html => "html",
            ExportFormat::Json => "json",
            ExportFormat::Text => "txt",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Html => "text/html",
            ExportFormat::Json => "application/json",
            ExportFormat::Text => "text/plain",
        }
    }

    /// Parse a format name or extension, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().trim_start_matches('.').to_lowercase().as_str() {
            "pdf" => Some(ExportFormat::Pdf),
            "docx" | "word" => Some(ExportFormat::Docx),
            "html" | "htm" | "preview" => Some(ExportFormat::Html),
            "json" => Some(ExportFormat::Json),
            "txt" | "text" => Some(ExportFormat::Text),
            _ => None,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Options for an export run.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Rendering options shared by every format
    pub render: RenderOptions,

    /// Version label appended to filenames (`Jane Doe-v2.pdf`)
    pub version: Option<String>,

    /// Layout of JSON output
    pub json_format: JsonFormat,

    /// Sender identity for cover letters
    pub sender: Option<PersonalInfo>,
}

impl ExportOptions {
    /// Create new export options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }

    /// Set the filename version label.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the JSON layout.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }

    /// Set the sender used in cover letter headers.
    pub fn with_sender(mut self, sender: PersonalInfo) -> Self {
        self.sender = Some(sender);
        self
    }

    fn version_label(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            version: None,
            json_format: JsonFormat::Pretty,
            sender: None,
        }
    }
}

/// One exported file, ready to be written or downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Suggested file name including extension
    pub filename: String,

    /// MIME type of `bytes`
    pub mime_type: &'static str,

    /// File contents
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Size of the artifact in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the artifact into `dir` under its own filename, returning the
    /// full path.
    pub fn write_to_dir(&self, dir: &Path) -> Result<std::path::PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Trait for output formats.
///
/// Implementors only turn a document into bytes; filenames and MIME types
/// come from the provided methods.
pub trait Exporter: Send + Sync {
    /// The format this exporter produces.
    fn format(&self) -> ExportFormat;

    /// Get the name of this exporter.
    fn name(&self) -> &str;

    /// Extensions this exporter answers to, lowercase without the dot.
    fn extensions(&self) -> &[&str];

    /// Render a resume.
    fn render_resume(&self, resume: &ResumeDocument, options: &ExportOptions) -> Result<Vec<u8>>;

    /// Render a cover letter.
    fn render_cover_letter(
        &self,
        letter: &CoverLetterDocument,
        options: &ExportOptions,
    ) -> Result<Vec<u8>>;

    fn mime_type(&self) -> &'static str {
        self.format().mime_type()
    }

    /// Render a resume and name the result `{fullName-or-Resume}[-version].{ext}`.
    fn export_resume(
        &self,
        resume: &ResumeDocument,
        options: &ExportOptions,
    ) -> Result<ExportArtifact> {
        let bytes = self.render_resume(resume, options)?;
        Ok(ExportArtifact {
            filename: generate_filename(
                resume.full_name(),
                options.version_label(),
                self.format().extension(),
            ),
            mime_type: self.mime_type(),
            bytes,
        })
    }

    /// Render a cover letter and name the result
    /// `{company-or-cover-letter}[-version].{ext}`.
    fn export_cover_letter(
        &self,
        letter: &CoverLetterDocument,
        options: &ExportOptions,
    ) -> Result<ExportArtifact> {
        let bytes = self.render_cover_letter(letter, options)?;
        Ok(ExportArtifact {
            filename: filename_with_fallback(
                letter.company_name(),
                COVER_LETTER_FILENAME,
                options.version_label(),
                self.format().extension(),
            ),
            mime_type: self.mime_type(),
            bytes,
        })
    }

    /// Check if this exporter answers to the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.trim_start_matches('.').to_lowercase();
        self.extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Registry of exporters keyed by extension and by name.
pub struct ExporterRegistry {
    exporters: HashMap<String, Arc<dyn Exporter>>,
    by_name: HashMap<String, Arc<dyn Exporter>>,
}

impl ExporterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            exporters: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the built-in exporters.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PdfExporter::new()));
        registry.register(Arc::new(DocxExporter::new()));
        registry.register(Arc::new(HtmlExporter::new()));
        registry.register(Arc::new(JsonExporter::new()));
        registry.register(Arc::new(TextExporter::new()));
        registry
    }

    /// Register an exporter for all its extensions. A later registration
    /// for the same extension replaces the earlier one.
    pub fn register(&mut self, exporter: Arc<dyn Exporter>) {
        for ext in exporter.extensions() {
            self.exporters.insert(ext.to_lowercase(), exporter.clone());
        }
        self.by_name.insert(exporter.name().to_lowercase(), exporter);
    }

    /// Get an exporter by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn Exporter>> {
        self.exporters
            .get(&ext.trim_start_matches('.').to_lowercase())
            .cloned()
    }

    /// Get an exporter by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn Exporter>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Get the exporter for a format.
    pub fn get(&self, format: ExportFormat) -> Result<Arc<dyn Exporter>> {
        self.get_by_extension(format.extension())
            .ok_or_else(|| Error::UnknownFormat(format.to_string()))
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.get_by_extension(ext).is_some()
    }

    /// Get all supported extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.exporters.keys().map(|s| s.as_str()).collect();
        exts.sort_unstable();
        exts
    }

    /// Export a resume to one format.
    pub fn export(
        &self,
        resume: &ResumeDocument,
        format: ExportFormat,
        options: &ExportOptions,
    ) -> Result<ExportArtifact> {
        self.get(format)?.export_resume(resume, options)
    }

    /// Export one resume snapshot to several formats in parallel.
    ///
    /// Artifacts come back in the order of `formats`. The first failure
    /// aborts the whole run.
    pub fn export_all(
        &self,
        resume: &ResumeDocument,
        formats: &[ExportFormat],
        options: &ExportOptions,
    ) -> Result<Vec<ExportArtifact>> {
        let exporters = formats
            .iter()
            .map(|format| self.get(*format))
            .collect::<Result<Vec<_>>>()?;

        log::debug!("Exporting '{}' to {} format(s)", resume_label(resume), formats.len());
        exporters
            .par_iter()
            .map(|exporter| exporter.export_resume(resume, options))
            .collect()
    }

    /// Export one cover letter snapshot to several formats in parallel.
    pub fn export_cover_letter_all(
        &self,
        letter: &CoverLetterDocument,
        formats: &[ExportFormat],
        options: &ExportOptions,
    ) -> Result<Vec<ExportArtifact>> {
        let exporters = formats
            .iter()
            .map(|format| self.get(*format))
            .collect::<Result<Vec<_>>>()?;

        exporters
            .par_iter()
            .map(|exporter| exporter.export_cover_letter(letter, options))
            .collect()
    }
}

impl Default for ExporterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn resume_label(resume: &ResumeDocument) -> &str {
    resume.full_name().unwrap_or("untitled")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_options_builder() {
        let options = ExportOptions::new()
            .with_version("v2")
            .with_json_format(JsonFormat::Compact);

        assert_eq!(options.version.as_deref(), Some("v2"));
        assert_eq!(options.json_format, JsonFormat::Compact);
        assert!(options.sender.is_none());
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(ExportFormat::parse("PDF"), Some(ExportFormat::Pdf));
        assert_eq!(ExportFormat::parse(".docx"), Some(ExportFormat::Docx));
        assert_eq!(ExportFormat::parse("text"), Some(ExportFormat::Text));
        assert_eq!(ExportFormat::parse("rtf"), None);
    }

    #[test]
    fn test_registry_with_defaults() {
        let registry = ExporterRegistry::with_defaults();
        assert!(registry.supports("pdf"));
        assert!(registry.supports("DOCX"));
        assert!(registry.supports("htm"));
        assert!(!registry.supports("rtf"));
        assert_eq!(
            registry.supported_extensions(),
            vec!["docx", "htm", "html", "json", "pdf", "txt"]
        );
    }

    #[test]
    fn test_registry_get_by_name() {
        let registry = ExporterRegistry::with_defaults();
        let exporter = registry.get_by_name("Preview");
        assert!(exporter.is_some());
        assert_eq!(exporter.map(|e| e.format()), Some(ExportFormat::Html));
    }

    #[test]
    fn test_resume_filenames() {
        let registry = ExporterRegistry::with_defaults();
        let options = ExportOptions::new().with_version("v2");

        let named = ResumeDocument::with_name("Jane Doe");
        let artifact = registry
            .export(&named, ExportFormat::Json, &options)
            .unwrap();
        assert_eq!(artifact.filename, "Jane Doe-v2.json");
        assert_eq!(artifact.mime_type, "application/json");

        let anonymous = ResumeDocument::new();
        let artifact = registry
            .export(&anonymous, ExportFormat::Text, &ExportOptions::default())
            .unwrap();
        assert_eq!(artifact.filename, "Resume.txt");
    }

    #[test]
    fn test_cover_letter_filenames() {
        let exporter = JsonExporter::new();
        let letter = CoverLetterDocument::to_company("Acme Corp");
        let artifact = exporter
            .export_cover_letter(&letter, &ExportOptions::default())
            .unwrap();
        assert_eq!(artifact.filename, "Acme Corp.json");

        let artifact = exporter
            .export_cover_letter(&CoverLetterDocument::new(), &ExportOptions::default())
            .unwrap();
        assert_eq!(artifact.filename, "cover-letter.json");
    }

    #[test]
    fn test_export_all_keeps_order() {
        let registry = ExporterRegistry::with_defaults();
        let resume = ResumeDocument::with_name("Jane Doe");
        let artifacts = registry
            .export_all(&resume, &ExportFormat::ALL, &ExportOptions::default())
            .unwrap();

        let names: Vec<&str> = artifacts.iter().map(|a| a.filename.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Jane Doe.pdf",
                "Jane Doe.docx",
                "Jane Doe.html",
                "Jane Doe.json",
                "Jane Doe.txt"
            ]
        );
        assert!(artifacts[0].bytes.starts_with(b"%PDF-"));
        assert!(artifacts[1].bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_unknown_format_errors() {
        let registry = ExporterRegistry::new();
        let err = registry
            .export(&ResumeDocument::new(), ExportFormat::Pdf, &ExportOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::UnknownFormat(ref f) if f == "pdf"));
    }
}
