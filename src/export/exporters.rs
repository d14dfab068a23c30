//! Built-in exporters.

use crate::error::Result;
use crate::layout::LayoutPlan;
use crate::model::{CoverLetterDocument, ResumeDocument};
use crate::render::{to_docx, to_html, to_json, to_pdf, to_text};
use crate::{plan_for_cover_letter, plan_for_resume};

use super::{ExportFormat, ExportOptions, Exporter};

fn resume_plan(resume: &ResumeDocument, options: &ExportOptions) -> LayoutPlan {
    plan_for_resume(resume, &options.render)
}

fn letter_plan(letter: &CoverLetterDocument, options: &ExportOptions) -> LayoutPlan {
    plan_for_cover_letter(letter, options.sender.as_ref(), &options.render)
}

/// Vector PDF exporter.
#[derive(Debug, Clone, Default)]
pub struct PdfExporter {
    _private: (),
}

impl PdfExporter {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Exporter for PdfExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn name(&self) -> &str {
        "pdf"
    }

    fn extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn render_resume(&self, resume: &ResumeDocument, options: &ExportOptions) -> Result<Vec<u8>> {
        to_pdf(&resume_plan(resume, options), &options.render)
    }

    fn render_cover_letter(
        &self,
        letter: &CoverLetterDocument,
        options: &ExportOptions,
    ) -> Result<Vec<u8>> {
        to_pdf(&letter_plan(letter, options), &options.render)
    }
}

/// Word document exporter.
#[derive(Debug, Clone, Default)]
pub struct DocxExporter {
    _private: (),
}

impl DocxExporter {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Exporter for DocxExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Docx
    }

    fn name(&self) -> &str {
        "docx"
    }

    fn extensions(&self) -> &[&str] {
        &["docx"]
    }

    fn render_resume(&self, resume: &ResumeDocument, options: &ExportOptions) -> Result<Vec<u8>> {
        to_docx(&resume_plan(resume, options), &options.render)
    }

    fn render_cover_letter(
        &self,
        letter: &CoverLetterDocument,
        options: &ExportOptions,
    ) -> Result<Vec<u8>> {
        to_docx(&letter_plan(letter, options), &options.render)
    }
}

/// Preview markup exporter. The fragment is written as-is; it carries its
/// own scoped stylesheet.
#[derive(Debug, Clone, Default)]
pub struct HtmlExporter {
    _private: (),
}

impl HtmlExporter {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Exporter for HtmlExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Html
    }

    fn name(&self) -> &str {
        "preview"
    }

    fn extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn render_resume(&self, resume: &ResumeDocument, options: &ExportOptions) -> Result<Vec<u8>> {
        Ok(to_html(&resume_plan(resume, options), &options.render).into_bytes())
    }

    fn render_cover_letter(
        &self,
        letter: &CoverLetterDocument,
        options: &ExportOptions,
    ) -> Result<Vec<u8>> {
        Ok(to_html(&letter_plan(letter, options), &options.render).into_bytes())
    }
}

/// Full-fidelity JSON exporter. Serializes the document itself, not the
/// layout plan, so the output can be imported again.
#[derive(Debug, Clone, Default)]
pub struct JsonExporter {
    _private: (),
}

impl JsonExporter {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Exporter for JsonExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }

    fn name(&self) -> &str {
        "json"
    }

    fn extensions(&self) -> &[&str] {
        &["json"]
    }

    fn render_resume(&self, resume: &ResumeDocument, options: &ExportOptions) -> Result<Vec<u8>> {
        Ok(to_json(resume, options.json_format)?.into_bytes())
    }

    fn render_cover_letter(
        &self,
        letter: &CoverLetterDocument,
        options: &ExportOptions,
    ) -> Result<Vec<u8>> {
        Ok(to_json(letter, options.json_format)?.into_bytes())
    }
}

/// Plain ATS text exporter.
#[derive(Debug, Clone, Default)]
pub struct TextExporter {
    _private: (),
}

impl TextExporter {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Exporter for TextExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Text
    }

    fn name(&self) -> &str {
        "text"
    }

    fn extensions(&self) -> &[&str] {
        &["txt"]
    }

    fn render_resume(&self, resume: &ResumeDocument, options: &ExportOptions) -> Result<Vec<u8>> {
        Ok(to_text(&resume_plan(resume, options)).into_bytes())
    }

    fn render_cover_letter(
        &self,
        letter: &CoverLetterDocument,
        options: &ExportOptions,
    ) -> Result<Vec<u8>> {
        Ok(to_text(&letter_plan(letter, options)).into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exporter_extensions() {
        let exporter = HtmlExporter::new();
        assert_eq!(exporter.extensions(), &["html", "htm"]);
        assert!(exporter.supports_extension("HTML"));
        assert!(exporter.supports_extension(".htm"));
        assert!(!exporter.supports_extension("pdf"));
    }

    #[test]
    fn test_json_exporter_serializes_document() {
        let resume = ResumeDocument::with_name("Jane Doe");
        let bytes = JsonExporter::new()
            .render_resume(&resume, &ExportOptions::default())
            .unwrap();
        let json = String::from_utf8(bytes).unwrap();
        assert!(json.contains("\"fullName\": \"Jane Doe\""));
    }

    #[test]
    fn test_html_exporter_uses_container_id() {
        let options = ExportOptions::default()
            .with_render_options(crate::render::RenderOptions::new().with_container_id("cv"));
        let bytes = HtmlExporter::new()
            .render_resume(&ResumeDocument::with_name("Jane"), &options)
            .unwrap();
        let html = String::from_utf8(bytes).unwrap();
        assert!(html.starts_with("<div id=\"cv\""));
    }
}
