//! Template registry.
//!
//! Templates are immutable, compile-time data. Every option is a closed enum
//! so each backend matches exhaustively instead of interpreting free-form
//! style strings.

use serde::Serialize;

/// Id of the template used when none (or an unknown one) is requested.
pub const DEFAULT_TEMPLATE_ID: &str = "classic";

/// How sections are placed on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutVariant {
    /// Header then every section, full width
    SingleColumn,
    /// Full-width header, wide main column, narrow aside on the right
    TwoColumn,
    /// Narrow aside on the left carrying identity, main column on the right
    Sidebar,
}

impl LayoutVariant {
    /// Stable identifier used in markup and CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutVariant::SingleColumn => "single-column",
            LayoutVariant::TwoColumn => "two-column",
            LayoutVariant::Sidebar => "sidebar",
        }
    }
}

/// Horizontal alignment of the header block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderAlign {
    Left,
    Center,
}

/// Marker drawn before bullet lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BulletStyle {
    Dot,
    Arrow,
    Dash,
}

impl BulletStyle {
    /// Glyph for this style. All glyphs exist in WinAnsiEncoding so the PDF
    /// backend draws the same character as the preview and DOCX.
    pub fn glyph(&self) -> char {
        match self {
            BulletStyle::Dot => '\u{2022}',
            BulletStyle::Arrow => '\u{203A}',
            BulletStyle::Dash => '\u{2013}',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BulletStyle::Dot => "dot",
            BulletStyle::Arrow => "arrow",
            BulletStyle::Dash => "dash",
        }
    }
}

/// Visual treatment of section headings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionTitleStyle {
    /// Rule under the heading
    Underline,
    /// Accent bar to the left of the heading
    ColorBar,
    /// Heading framed by a border
    Box,
    /// Bold text only
    None,
}

impl SectionTitleStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionTitleStyle::Underline => "underline",
            SectionTitleStyle::ColorBar => "colorbar",
            SectionTitleStyle::Box => "box",
            SectionTitleStyle::None => "none",
        }
    }
}

/// Letter case applied to section headings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeadingCase {
    Upper,
    AsWritten,
}

impl HeadingCase {
    pub fn apply(&self, text: &str) -> String {
        match self {
            HeadingCase::Upper => text.to_uppercase(),
            HeadingCase::AsWritten => text.to_string(),
        }
    }
}

/// Typeface family. Both map to fonts available without embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    Sans,
    Serif,
}

impl FontFamily {
    /// CSS font stack for the preview.
    pub fn css_stack(&self) -> &'static str {
        match self {
            FontFamily::Sans => "Helvetica, Arial, sans-serif",
            FontFamily::Serif => "\"Times New Roman\", Times, serif",
        }
    }

    /// Font name written into DOCX run properties.
    pub fn docx_name(&self) -> &'static str {
        match self {
            FontFamily::Sans => "Arial",
            FontFamily::Serif => "Times New Roman",
        }
    }

    /// Standard Type1 base font names: (regular, bold, italic).
    pub fn pdf_base_fonts(&self) -> (&'static str, &'static str, &'static str) {
        match self {
            FontFamily::Sans => ("Helvetica", "Helvetica-Bold", "Helvetica-Oblique"),
            FontFamily::Serif => ("Times-Roman", "Times-Bold", "Times-Italic"),
        }
    }
}

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Hex form without the leading `#` (as DOCX expects).
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }

    /// CSS form, e.g. `#1F2937`.
    pub fn css(&self) -> String {
        format!("#{}", self.hex())
    }

    /// Components scaled to 0.0..=1.0 for PDF color operators.
    pub fn unit(&self) -> (f32, f32, f32) {
        (
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        )
    }
}

/// Template color palette.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Palette {
    pub accent: Rgb,
    pub text: Rgb,
    pub muted: Rgb,
    pub border: Rgb,
    pub aside_background: Rgb,
}

/// Font sizes in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Typography {
    pub name: f32,
    pub title: f32,
    pub heading: f32,
    pub body: f32,
    pub meta: f32,
}

/// A complete template definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateConfig {
    pub id: &'static str,
    pub name: &'static str,
    pub layout: LayoutVariant,
    pub header_align: HeaderAlign,
    pub colors: Palette,
    pub bullet: BulletStyle,
    pub section_title: SectionTitleStyle,
    pub heading_case: HeadingCase,
    pub font: FontFamily,
    pub sizes: Typography,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        TEMPLATES[0].clone()
    }
}

const WHITE: Rgb = Rgb(255, 255, 255);

const STANDARD_SIZES: Typography = Typography {
    name: 22.0,
    title: 12.0,
    heading: 11.5,
    body: 10.0,
    meta: 9.0,
};

static TEMPLATES: &[TemplateConfig] = &[
    TemplateConfig {
        id: "classic",
        name: "Classic",
        layout: LayoutVariant::SingleColumn,
        header_align: HeaderAlign::Center,
        colors: Palette {
            accent: Rgb(31, 41, 55),
            text: Rgb(17, 24, 39),
            muted: Rgb(107, 114, 128),
            border: Rgb(156, 163, 175),
            aside_background: WHITE,
        },
        bullet: BulletStyle::Dot,
        section_title: SectionTitleStyle::Underline,
        heading_case: HeadingCase::Upper,
        font: FontFamily::Serif,
        sizes: STANDARD_SIZES,
    },
    TemplateConfig {
        id: "professional",
        name: "Professional",
        layout: LayoutVariant::SingleColumn,
        header_align: HeaderAlign::Left,
        colors: Palette {
            accent: Rgb(30, 64, 175),
            text: Rgb(17, 24, 39),
            muted: Rgb(75, 85, 99),
            border: Rgb(191, 219, 254),
            aside_background: WHITE,
        },
        bullet: BulletStyle::Dot,
        section_title: SectionTitleStyle::ColorBar,
        heading_case: HeadingCase::Upper,
        font: FontFamily::Sans,
        sizes: STANDARD_SIZES,
    },
    TemplateConfig {
        id: "executive",
        name: "Executive",
        layout: LayoutVariant::SingleColumn,
        header_align: HeaderAlign::Center,
        colors: Palette {
            accent: Rgb(120, 53, 15),
            text: Rgb(28, 25, 23),
            muted: Rgb(120, 113, 108),
            border: Rgb(168, 162, 158),
            aside_background: WHITE,
        },
        bullet: BulletStyle::Arrow,
        section_title: SectionTitleStyle::Box,
        heading_case: HeadingCase::Upper,
        font: FontFamily::Serif,
        sizes: Typography {
            name: 24.0,
            ..STANDARD_SIZES
        },
    },
    TemplateConfig {
        id: "minimal",
        name: "Minimal",
        layout: LayoutVariant::SingleColumn,
        header_align: HeaderAlign::Left,
        colors: Palette {
            accent: Rgb(55, 65, 81),
            text: Rgb(31, 41, 55),
            muted: Rgb(107, 114, 128),
            border: Rgb(229, 231, 235),
            aside_background: WHITE,
        },
        bullet: BulletStyle::Dash,
        section_title: SectionTitleStyle::None,
        heading_case: HeadingCase::AsWritten,
        font: FontFamily::Sans,
        sizes: Typography {
            name: 20.0,
            heading: 11.0,
            ..STANDARD_SIZES
        },
    },
    TemplateConfig {
        id: "modern",
        name: "Modern",
        layout: LayoutVariant::TwoColumn,
        header_align: HeaderAlign::Left,
        colors: Palette {
            accent: Rgb(13, 148, 136),
            text: Rgb(15, 23, 42),
            muted: Rgb(100, 116, 139),
            border: Rgb(153, 246, 228),
            aside_background: Rgb(240, 253, 250),
        },
        bullet: BulletStyle::Arrow,
        section_title: SectionTitleStyle::ColorBar,
        heading_case: HeadingCase::Upper,
        font: FontFamily::Sans,
        sizes: STANDARD_SIZES,
    },
    TemplateConfig {
        id: "creative",
        name: "Creative",
        layout: LayoutVariant::Sidebar,
        header_align: HeaderAlign::Left,
        colors: Palette {
            accent: Rgb(124, 58, 237),
            text: Rgb(30, 27, 75),
            muted: Rgb(107, 114, 128),
            border: Rgb(196, 181, 253),
            aside_background: Rgb(245, 243, 255),
        },
        bullet: BulletStyle::Dash,
        section_title: SectionTitleStyle::Box,
        heading_case: HeadingCase::AsWritten,
        font: FontFamily::Sans,
        sizes: Typography {
            name: 20.0,
            ..STANDARD_SIZES
        },
    },
];

/// All registered templates, default first.
pub fn templates() -> &'static [TemplateConfig] {
    TEMPLATES
}

/// Look up a template by id.
pub fn find_template(id: &str) -> Option<&'static TemplateConfig> {
    let id = id.trim();
    TEMPLATES.iter().find(|t| t.id.eq_ignore_ascii_case(id))
}

/// Resolve a template id, falling back to the default.
///
/// An unknown id is not an error: the document still renders, with the
/// default template, and a warning is logged.
pub fn resolve_template(id: &str) -> &'static TemplateConfig {
    if id.trim().is_empty() {
        return default_template();
    }
    match find_template(id) {
        Some(template) => template,
        None => {
            log::warn!(
                "Unknown template '{}', falling back to '{}'",
                id,
                DEFAULT_TEMPLATE_ID
            );
            default_template()
        }
    }
}

/// The default template.
pub fn default_template() -> &'static TemplateConfig {
    &TEMPLATES[0]
}
