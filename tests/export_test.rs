//! Integration tests for the export module.

use std::sync::Arc;

use tempfile::TempDir;
use vitae::error::Result;
use vitae::import::extract_pdf_text;
use vitae::{
    import_file, CoverLetterDocument, Error, ExportFormat, ExportOptions, Exporter,
    ExporterRegistry, ImportOptions, PersonalInfo, RenderOptions, ResumeDocument, Skill,
};

/// Mock exporter for testing.
struct MockExporter {
    extensions: Vec<&'static str>,
    name: &'static str,
}

impl MockExporter {
    fn new(extensions: Vec<&'static str>, name: &'static str) -> Self {
        Self { extensions, name }
    }
}

impl Exporter for MockExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Text
    }

    fn name(&self) -> &str {
        self.name
    }

    fn extensions(&self) -> &[&str] {
        &self.extensions
    }

    fn render_resume(&self, resume: &ResumeDocument, _options: &ExportOptions) -> Result<Vec<u8>> {
        Ok(format!("{} by {}", resume.full_name().unwrap_or_default(), self.name).into_bytes())
    }

    fn render_cover_letter(
        &self,
        letter: &CoverLetterDocument,
        _options: &ExportOptions,
    ) -> Result<Vec<u8>> {
        Ok(format!("{} by {}", letter.company, self.name).into_bytes())
    }
}

fn sample_resume() -> ResumeDocument {
    let mut resume = ResumeDocument::with_name("Jane Doe");
    resume.personal_info.email = "jane@example.com".into();
    resume.skills.push(Skill::named("Rust"));
    resume
}

#[test]
fn test_registry_new_is_empty() {
    let registry = ExporterRegistry::new();
    assert!(!registry.supports("pdf"));
    assert!(registry.supported_extensions().is_empty());
}

#[test]
fn test_registry_register_replaces() {
    let mut registry = ExporterRegistry::with_defaults();
    registry.register(Arc::new(MockExporter::new(vec!["txt", "text"], "mock")));

    assert!(registry.supports("TEXT"));
    let exporter = registry.get_by_extension("txt").unwrap();
    assert_eq!(exporter.name(), "mock");
    assert!(registry.get_by_name("mock").is_some());

    let artifact = registry
        .export(&sample_resume(), ExportFormat::Text, &ExportOptions::default())
        .unwrap();
    assert_eq!(artifact.bytes, b"Jane Doe by mock");
    assert_eq!(artifact.filename, "Jane Doe.txt");
    assert_eq!(artifact.mime_type, "text/plain");
}

#[test]
fn test_export_all_to_directory() {
    let dir = TempDir::new().unwrap();
    let registry = ExporterRegistry::with_defaults();
    let options = ExportOptions::new().with_version("v2");

    let artifacts = registry
        .export_all(&sample_resume(), &ExportFormat::ALL, &options)
        .unwrap();
    assert_eq!(artifacts.len(), ExportFormat::ALL.len());

    for artifact in &artifacts {
        assert!(!artifact.is_empty());
        let path = artifact.write_to_dir(dir.path()).unwrap();
        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("Jane Doe-v2."), "{}", name);
    }
    assert!(dir.path().join("Jane Doe-v2.pdf").exists());
    assert!(dir.path().join("Jane Doe-v2.docx").exists());
}

#[test]
fn test_unnamed_resume_filename() {
    let registry = ExporterRegistry::with_defaults();
    let artifact = registry
        .export(&ResumeDocument::new(), ExportFormat::Html, &ExportOptions::default())
        .unwrap();
    assert_eq!(artifact.filename, "Resume.html");
}

#[test]
fn test_json_artifact_imports_back() {
    let dir = TempDir::new().unwrap();
    let resume = sample_resume();
    let artifact = ExporterRegistry::with_defaults()
        .export(&resume, ExportFormat::Json, &ExportOptions::default())
        .unwrap();
    let path = artifact.write_to_dir(dir.path()).unwrap();

    let outcome = import_file(&path, &ImportOptions::default()).unwrap();
    assert!(outcome.as_resume().unwrap().same_content(&resume));
}

#[test]
fn test_template_override_reaches_output() {
    let registry = ExporterRegistry::with_defaults();
    let options = ExportOptions::new()
        .with_render_options(RenderOptions::new().with_template("modern"));
    let artifact = registry
        .export(&sample_resume(), ExportFormat::Html, &options)
        .unwrap();
    let html = String::from_utf8(artifact.bytes).unwrap();
    assert!(html.contains("vitae--modern"));
}

#[test]
fn test_cover_letter_with_sender() {
    let mut letter = CoverLetterDocument::to_company("Acme");
    letter.recipient_name = "Pat Lee".into();
    letter.add_paragraph("I would love to help Acme ship faster.");

    let mut sender = PersonalInfo::default();
    sender.full_name = "Jane Doe".into();
    sender.email = "jane@example.com".into();

    let registry = ExporterRegistry::with_defaults();
    let options = ExportOptions::new().with_sender(sender);
    let artifacts = registry
        .export_cover_letter_all(&letter, &[ExportFormat::Pdf, ExportFormat::Docx], &options)
        .unwrap();

    assert_eq!(artifacts[0].filename, "Acme.pdf");
    assert_eq!(artifacts[1].filename, "Acme.docx");

    let text = extract_pdf_text(&artifacts[0].bytes).unwrap();
    assert!(text.contains("Jane Doe"));
    assert!(text.contains("ship faster"));
}

#[test]
fn test_cover_letter_without_company() {
    let letter = CoverLetterDocument::new();
    let artifact = ExporterRegistry::with_defaults()
        .get(ExportFormat::Pdf)
        .unwrap()
        .export_cover_letter(&letter, &ExportOptions::default())
        .unwrap();
    assert_eq!(artifact.filename, "cover-letter.pdf");
}

#[test]
fn test_missing_exporter() {
    let registry = ExporterRegistry::new();
    let err = registry
        .export(&sample_resume(), ExportFormat::Pdf, &ExportOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::UnknownFormat(_)));
}
