//! Rendering options and configuration.

use chrono::{DateTime, Utc};

use crate::template::{resolve_template, TemplateConfig};

/// Default `id` of the preview container element.
pub const DEFAULT_CONTAINER_ID: &str = "resume-preview";

/// Options shared by every render backend.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Template id that replaces the one stored in the document
    pub template_override: Option<String>,

    /// Page size for PDF output
    pub page_size: PageSize,

    /// Page margin in points (PDF and DOCX)
    pub margin: f32,

    /// Flate-compress PDF content streams
    pub compress: bool,

    /// `id` attribute of the preview container
    pub container_id: String,

    /// Emit the scoped `<style>` element in the preview
    pub include_styles: bool,

    /// Timestamp written into document metadata (defaults to now)
    pub created_at: Option<DateTime<Utc>>,

    /// Fail PDF rendering on text the standard fonts cannot draw, instead
    /// of drawing `?` and warning
    pub strict_pdf_text: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Render with a specific template regardless of the document's own.
    pub fn with_template(mut self, id: impl Into<String>) -> Self {
        self.template_override = Some(id.into());
        self
    }

    /// Set the page size.
    pub fn with_page_size(mut self, size: PageSize) -> Self {
        self.page_size = size;
        self
    }

    /// Set the page margin in points.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin.clamp(18.0, 144.0);
        self
    }

    /// Enable or disable content stream compression.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Set the preview container id.
    pub fn with_container_id(mut self, id: impl Into<String>) -> Self {
        self.container_id = id.into();
        self
    }

    /// Enable or disable the preview's scoped stylesheet.
    pub fn with_styles(mut self, include: bool) -> Self {
        self.include_styles = include;
        self
    }

    /// Pin the metadata timestamp (useful for reproducible output).
    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Reject text outside the WinAnsi character set in PDF output.
    pub fn with_strict_pdf_text(mut self, strict: bool) -> Self {
        self.strict_pdf_text = strict;
        self
    }

    /// Resolve the template for a document whose own template id is
    /// `document_template`. The override wins when present and non-blank.
    pub fn template_for(&self, document_template: &str) -> &'static TemplateConfig {
        match self.template_override.as_deref() {
            Some(id) if !id.trim().is_empty() => resolve_template(id),
            _ => resolve_template(document_template),
        }
    }

    /// Metadata timestamp.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.created_at.unwrap_or_else(Utc::now)
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            template_override: None,
            page_size: PageSize::Letter,
            margin: 54.0,
            compress: true,
            container_id: DEFAULT_CONTAINER_ID.to_string(),
            include_styles: true,
            created_at: None,
            strict_pdf_text: false,
        }
    }
}

/// Physical page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    /// US Letter, 8.5 x 11 in
    #[default]
    Letter,
    /// ISO A4, 210 x 297 mm
    A4,
}

impl PageSize {
    /// Width and height in points.
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            PageSize::Letter => (612.0, 792.0),
            PageSize::A4 => (595.0, 842.0),
        }
    }

    /// Width and height in twentieths of a point (DOCX page units).
    pub fn twips(&self) -> (u32, u32) {
        let (w, h) = self.dimensions();
        ((w * 20.0).round() as u32, (h * 20.0).round() as u32)
    }

    /// Parse a page size name (`letter`, `a4`).
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_ascii_lowercase().as_str() {
            "letter" | "us-letter" => Ok(PageSize::Letter),
            "a4" => Ok(PageSize::A4),
            other => Err(format!("Unknown page size: {}", other)),
        }
    }
}
