//! # vitae
//!
//! Resume and cover letter rendering to an HTML preview, PDF and DOCX from
//! one shared layout plan.
//!
//! ## Quick Start
//!
//! ```no_run
//! use vitae::{render_pdf, render_preview, ResumeDocument};
//!
//! fn main() -> vitae::Result<()> {
//!     let resume: ResumeDocument =
//!         serde_json::from_str(&std::fs::read_to_string("resume.json")?)?;
//!
//!     let html = render_preview(&resume, "resume-preview");
//!     let pdf = render_pdf(&resume)?;
//!     std::fs::write("resume.pdf", pdf)?;
//!     println!("{}", html.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **One layout plan**: section order, omission and column placement are
//!   decided once; every backend draws the same blocks
//! - **Six templates**: single-column, two-column and sidebar layouts
//! - **ATS-friendly output**: real text in PDF and DOCX, linear reading order
//! - **Import**: legacy resume JSON, or section drafts from text, Markdown,
//!   JSON and PDF
//! - **Parallel export**: several formats of one snapshot with Rayon

pub mod detect;
pub mod error;
pub mod export;
pub mod import;
pub mod layout;
pub mod model;
pub mod normalize;
pub mod render;
pub mod template;

// Re-export commonly used types
pub use detect::{detect_import_format, ImportFormat};
pub use error::{Error, Result};
pub use export::{
    ExportArtifact, ExportFormat, ExportOptions, Exporter, ExporterRegistry,
};
pub use import::{
    import_bytes, import_file, import_json, ImportOptions, ImportOutcome, SectionDraft,
};
#[cfg(feature = "async")]
pub use import::import_file_async;
pub use layout::{Block, LayoutPlan, RegionKind, SectionKind};
pub use model::{
    BodyParagraph, Certification, CoverLetterDocument, CustomItem, CustomSection, Education,
    Experience, Language, Link, PersonalInfo, Project, ResumeDocument, Skill,
};
pub use normalize::{
    expand_profile_url, format_date, format_date_range, format_location, generate_filename,
    normalize_text, ProfileKind,
};
pub use render::{JsonFormat, PageSize, RenderOptions};
pub use template::{resolve_template, templates, TemplateConfig};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build the layout plan for a resume.
///
/// The template comes from `options` when it carries an override, otherwise
/// from the resume itself.
pub fn plan_for_resume(resume: &ResumeDocument, options: &RenderOptions) -> LayoutPlan {
    let template = options.template_for(&resume.template);
    layout::plan_resume(resume, template)
}

/// Build the layout plan for a cover letter.
pub fn plan_for_cover_letter(
    letter: &CoverLetterDocument,
    sender: Option<&PersonalInfo>,
    options: &RenderOptions,
) -> LayoutPlan {
    let template = options.template_for(&letter.template_id);
    layout::plan_cover_letter(letter, sender, template)
}

/// Render a resume to PDF bytes with default options.
///
/// # Example
///
/// ```no_run
/// use vitae::{render_pdf, ResumeDocument};
///
/// let resume = ResumeDocument::with_name("Jane Doe");
/// let bytes = render_pdf(&resume).unwrap();
/// assert!(bytes.starts_with(b"%PDF-"));
/// ```
pub fn render_pdf(resume: &ResumeDocument) -> Result<Vec<u8>> {
    render_pdf_with_options(resume, &RenderOptions::default())
}

/// Render a resume to PDF bytes with custom options.
///
/// # Example
///
/// ```no_run
/// use vitae::{render_pdf_with_options, PageSize, RenderOptions, ResumeDocument};
///
/// let options = RenderOptions::new()
///     .with_template("modern")
///     .with_page_size(PageSize::A4);
/// let bytes = render_pdf_with_options(&ResumeDocument::new(), &options).unwrap();
/// ```
pub fn render_pdf_with_options(resume: &ResumeDocument, options: &RenderOptions) -> Result<Vec<u8>> {
    render::to_pdf(&plan_for_resume(resume, options), options)
}

/// Render a resume to DOCX bytes with default options.
pub fn render_docx(resume: &ResumeDocument) -> Result<Vec<u8>> {
    render_docx_with_options(resume, &RenderOptions::default())
}

/// Render a resume to DOCX bytes with custom options.
pub fn render_docx_with_options(
    resume: &ResumeDocument,
    options: &RenderOptions,
) -> Result<Vec<u8>> {
    render::to_docx(&plan_for_resume(resume, options), options)
}

/// Render the preview markup for a resume into a container with the given
/// element id.
///
/// # Example
///
/// ```
/// use vitae::{render_preview, ResumeDocument};
///
/// let html = render_preview(&ResumeDocument::with_name("Jane Doe"), "preview");
/// assert!(html.starts_with("<div id=\"preview\""));
/// assert!(html.contains("Jane Doe"));
/// ```
pub fn render_preview(resume: &ResumeDocument, container_id: &str) -> String {
    let options = RenderOptions::new().with_container_id(container_id);
    render::to_html(&plan_for_resume(resume, &options), &options)
}

/// Render the linear plain-text view of a resume.
pub fn render_text(resume: &ResumeDocument) -> String {
    render::to_text(&plan_for_resume(resume, &RenderOptions::default()))
}

/// Render a cover letter to PDF bytes. `sender` fills the letterhead.
pub fn render_cover_letter_pdf(
    letter: &CoverLetterDocument,
    sender: Option<&PersonalInfo>,
) -> Result<Vec<u8>> {
    let options = RenderOptions::default();
    render::to_pdf(&plan_for_cover_letter(letter, sender, &options), &options)
}

/// Render a cover letter to DOCX bytes. `sender` fills the letterhead.
pub fn render_cover_letter_docx(
    letter: &CoverLetterDocument,
    sender: Option<&PersonalInfo>,
) -> Result<Vec<u8>> {
    let options = RenderOptions::default();
    render::to_docx(&plan_for_cover_letter(letter, sender, &options), &options)
}

/// Render the preview markup for a cover letter.
pub fn render_cover_letter_preview(
    letter: &CoverLetterDocument,
    sender: Option<&PersonalInfo>,
    container_id: &str,
) -> String {
    let options = RenderOptions::new().with_container_id(container_id);
    render::to_html(&plan_for_cover_letter(letter, sender, &options), &options)
}

/// Serialize the full resume as pretty-printed JSON.
///
/// The output loads back unchanged through [`import_json`].
pub fn export_json(resume: &ResumeDocument) -> Result<String> {
    render::to_json(resume, JsonFormat::Pretty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_options_template_override() {
        let resume = ResumeDocument::with_name("Jane").with_template("classic");
        let plan = plan_for_resume(&resume, &RenderOptions::new().with_template("creative"));
        assert_eq!(plan.template.id, "creative");

        let plan = plan_for_resume(&resume, &RenderOptions::default());
        assert_eq!(plan.template.id, "classic");
    }

    #[test]
    fn test_cover_letter_uses_own_template() {
        let mut letter = CoverLetterDocument::to_company("Acme");
        letter.template_id = "modern".into();
        let plan = plan_for_cover_letter(&letter, None, &RenderOptions::default());
        assert_eq!(plan.template.id, "modern");
    }

    #[test]
    fn test_export_json_round_trip() {
        let mut resume = ResumeDocument::with_name("Jane Doe");
        resume.skills.push(Skill::named("Rust"));
        let json = export_json(&resume).unwrap();
        assert_eq!(import_json(&json).unwrap(), ImportOutcome::Resume(resume));
    }
}
