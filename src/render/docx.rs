//! DOCX rendering.
//!
//! Writes a minimal OPC package by hand: the WordprocessingML parts are
//! plain XML strings and the container is a deflated zip. Content is linear
//! in plan reading order; the name uses the `Title` style, section headings
//! `Heading1`, bullets `ListBullet`.

use std::fmt::Write as _;
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;
use crate::layout::{Block, EntryBlock, HeaderBlock, InlineList, LayoutPlan, LineStyle, LinkRef};
use crate::template::{HeaderAlign, SectionTitleStyle, TemplateConfig};

use super::is_safe_link;
use super::options::RenderOptions;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Relationship ids 1 and 2 are taken by styles and numbering.
const FIRST_LINK_RID: usize = 3;

/// Render a layout plan to DOCX bytes.
pub fn to_docx(plan: &LayoutPlan, options: &RenderOptions) -> Result<Vec<u8>> {
    let mut body = BodyWriter::new(plan.template);
    for block in plan.blocks() {
        body.block(block);
    }

    let document = document_xml(&body.xml, options);
    let relationships = document_rels_xml(&body.links);

    let parts: [(&str, String); 7] = [
        ("[Content_Types].xml", content_types_xml()),
        ("_rels/.rels", package_rels_xml()),
        ("docProps/core.xml", core_xml(plan, options)),
        ("word/document.xml", document),
        ("word/styles.xml", styles_xml(plan.template)),
        ("word/numbering.xml", numbering_xml(plan.template)),
        ("word/_rels/document.xml.rels", relationships),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let file_options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, content) in parts {
        zip.start_file(name, file_options)?;
        zip.write_all(content.as_bytes())?;
    }
    let cursor = zip.finish()?;

    log::debug!(
        "Rendered DOCX with template '{}': {} hyperlink(s)",
        plan.template.id,
        body.links.len()
    );
    Ok(cursor.into_inner())
}

/// Accumulates `w:body` content and the hyperlink targets it references.
struct BodyWriter {
    template: &'static TemplateConfig,
    xml: String,
    links: Vec<String>,
}

impl BodyWriter {
    fn new(template: &'static TemplateConfig) -> Self {
        Self {
            template,
            xml: String::with_capacity(16 * 1024),
            links: Vec::new(),
        }
    }

    fn block(&mut self, block: &Block) {
        match block {
            Block::Header(header) => self.header(header),
            Block::Heading(heading) => {
                self.paragraph("Heading1", None, &run(&heading.title, RunStyle::default()));
            }
            Block::Entry(entry) => self.entry(entry),
            Block::Bullet(text) => {
                self.paragraph("ListBullet", None, &run(text, RunStyle::default()));
            }
            Block::Paragraph(text) => {
                self.paragraph("Normal", None, &run(text, RunStyle::default()));
            }
            Block::Line(line) => {
                let style = match line.style {
                    LineStyle::Plain => RunStyle::default(),
                    LineStyle::Muted => RunStyle {
                        italic: true,
                        muted: true,
                        ..RunStyle::default()
                    },
                    LineStyle::Strong => RunStyle {
                        bold: true,
                        ..RunStyle::default()
                    },
                };
                self.paragraph("Normal", None, &run(&line.text, style));
            }
            Block::Inline(list) => self.inline(list),
            Block::Link(link) => {
                let runs = self.hyperlink(link);
                self.paragraph("Normal", None, &runs);
            }
            Block::Divider => {
                self.xml.push_str(
                    "<w:p><w:pPr><w:spacing w:before=\"0\" w:after=\"0\" w:line=\"120\" \
                     w:lineRule=\"exact\"/></w:pPr></w:p>",
                );
            }
        }
    }

    fn header(&mut self, header: &HeaderBlock) {
        let align = match self.template.header_align {
            HeaderAlign::Left => None,
            HeaderAlign::Center => Some("center"),
        };
        if !header.name.is_empty() {
            self.paragraph("Title", align, &run(&header.name, RunStyle::default()));
        }
        if !header.title.is_empty() {
            self.paragraph("Subtitle", align, &run(&header.title, RunStyle::default()));
        }
        if !header.contact.is_empty() {
            self.paragraph("Meta", align, &run(&header.contact_line(), RunStyle::default()));
        }
        if !header.links.is_empty() {
            let mut runs = String::new();
            for (i, link) in header.links.iter().enumerate() {
                if i > 0 {
                    runs.push_str(&run(crate::layout::CONTACT_SEPARATOR, RunStyle::default()));
                }
                runs.push_str(&self.hyperlink(link));
            }
            self.paragraph("Meta", align, &runs);
        }
    }

    fn entry(&mut self, entry: &EntryBlock) {
        let mut runs = String::new();
        if !entry.title.is_empty() {
            runs.push_str(&run(
                &entry.title,
                RunStyle {
                    bold: true,
                    ..RunStyle::default()
                },
            ));
        }
        if !entry.subtitle.is_empty() {
            let text = if entry.title.is_empty() {
                entry.subtitle.clone()
            } else {
                format!(" \u{2014} {}", entry.subtitle)
            };
            runs.push_str(&run(&text, RunStyle::default()));
        }
        if !runs.is_empty() {
            self.paragraph("EntryTitle", None, &runs);
        }

        let meta = entry.meta_line();
        if !meta.is_empty() {
            self.paragraph("Meta", None, &run(&meta, RunStyle::default()));
        }
        if let Some(url) = &entry.url {
            let runs = self.hyperlink(&LinkRef {
                label: url.clone(),
                url: url.clone(),
            });
            self.paragraph("Meta", None, &runs);
        }
    }

    fn inline(&mut self, list: &InlineList) {
        let mut runs = String::new();
        if let Some(label) = &list.label {
            runs.push_str(&run(
                &format!("{}: ", label),
                RunStyle {
                    bold: true,
                    ..RunStyle::default()
                },
            ));
        }
        runs.push_str(&run(&list.items.join(", "), RunStyle::default()));
        self.paragraph("Normal", None, &runs);
    }

    /// Runs for a link; relationship-backed when the URL is safe to follow.
    fn hyperlink(&mut self, link: &LinkRef) -> String {
        let style = RunStyle {
            link: true,
            ..RunStyle::default()
        };
        if !is_safe_link(&link.url) {
            return run(&link.label, RunStyle::default());
        }
        let rid = FIRST_LINK_RID + self.links.len();
        self.links.push(link.url.clone());
        format!(
            "<w:hyperlink r:id=\"rId{}\" w:history=\"1\">{}</w:hyperlink>",
            rid,
            run(&link.label, style)
        )
    }

    fn paragraph(&mut self, style: &str, align: Option<&str>, runs: &str) {
        let _ = write!(self.xml, "<w:p><w:pPr><w:pStyle w:val=\"{}\"/>", style);
        if let Some(align) = align {
            let _ = write!(self.xml, "<w:jc w:val=\"{}\"/>", align);
        }
        self.xml.push_str("</w:pPr>");
        self.xml.push_str(runs);
        self.xml.push_str("</w:p>");
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct RunStyle {
    bold: bool,
    italic: bool,
    muted: bool,
    link: bool,
}

fn run(text: &str, style: RunStyle) -> String {
    let mut props = String::new();
    if style.link {
        props.push_str("<w:rStyle w:val=\"Hyperlink\"/>");
    } else if style.muted {
        props.push_str("<w:rStyle w:val=\"MutedText\"/>");
    }
    if style.bold {
        props.push_str("<w:b/>");
    }
    if style.italic {
        props.push_str("<w:i/>");
    }

    let mut out = String::from("<w:r>");
    if !props.is_empty() {
        let _ = write!(out, "<w:rPr>{}</w:rPr>", props);
    }
    let _ = write!(out, "<w:t xml:space=\"preserve\">{}</w:t></w:r>", escape_xml(text));
    out
}

/// Escape text for XML content and attributes, dropping characters XML 1.0
/// cannot represent.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if (c as u32) < 0x20 || c == '\u{FFFE}' || c == '\u{FFFF}' => {}
            _ => out.push(c),
        }
    }
    out
}

fn content_types_xml() -> String {
    format!(
        "{}<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
         <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
         <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
         <Override PartName=\"/word/document.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>\
         <Override PartName=\"/word/styles.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml\"/>\
         <Override PartName=\"/word/numbering.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml\"/>\
         <Override PartName=\"/docProps/core.xml\" ContentType=\"application/vnd.openxmlformats-package.core-properties+xml\"/>\
         </Types>",
        XML_DECL
    )
}

fn package_rels_xml() -> String {
    format!(
        "{}<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"word/document.xml\"/>\
         <Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties\" Target=\"docProps/core.xml\"/>\
         </Relationships>",
        XML_DECL
    )
}

fn document_rels_xml(links: &[String]) -> String {
    let mut xml = format!(
        "{}<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"{}/styles\" Target=\"styles.xml\"/>\
         <Relationship Id=\"rId2\" Type=\"{}/numbering\" Target=\"numbering.xml\"/>",
        XML_DECL, R_NS, R_NS
    );
    for (i, url) in links.iter().enumerate() {
        let _ = write!(
            xml,
            "<Relationship Id=\"rId{}\" Type=\"{}/hyperlink\" Target=\"{}\" TargetMode=\"External\"/>",
            FIRST_LINK_RID + i,
            R_NS,
            escape_xml(url)
        );
    }
    xml.push_str("</Relationships>");
    xml
}

fn core_xml(plan: &LayoutPlan, options: &RenderOptions) -> String {
    let metadata = &plan.metadata;
    let created = options
        .timestamp()
        .format("%Y-%m-%dT%H:%M:%SZ")
        .to_string();
    format!(
        "{}<cp:coreProperties \
         xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" \
         xmlns:dc=\"http://purl.org/dc/elements/1.1/\" \
         xmlns:dcterms=\"http://purl.org/dc/terms/\" \
         xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">\
         <dc:title>{}</dc:title><dc:subject>{}</dc:subject><dc:creator>{}</dc:creator>\
         <dcterms:created xsi:type=\"dcterms:W3CDTF\">{}</dcterms:created>\
         <dcterms:modified xsi:type=\"dcterms:W3CDTF\">{}</dcterms:modified>\
         </cp:coreProperties>",
        XML_DECL,
        escape_xml(&metadata.title),
        escape_xml(&metadata.subject),
        escape_xml(&metadata.author),
        created,
        created
    )
}

fn document_xml(body: &str, options: &RenderOptions) -> String {
    let (width, height) = options.page_size.twips();
    let margin = (options.margin * 20.0).round() as u32;
    format!(
        "{}<w:document xmlns:w=\"{}\" xmlns:r=\"{}\"><w:body>{}\
         <w:sectPr><w:pgSz w:w=\"{}\" w:h=\"{}\"/>\
         <w:pgMar w:top=\"{m}\" w:right=\"{m}\" w:bottom=\"{m}\" w:left=\"{m}\" \
         w:header=\"360\" w:footer=\"360\" w:gutter=\"0\"/></w:sectPr>\
         </w:body></w:document>",
        XML_DECL,
        W_NS,
        R_NS,
        body,
        width,
        height,
        m = margin
    )
}

/// Font size in half-points, as WordprocessingML expects.
fn half_points(points: f32) -> u32 {
    (points * 2.0).round() as u32
}

fn heading_borders(template: &TemplateConfig) -> String {
    let border = template.colors.border.hex();
    let accent = template.colors.accent.hex();
    match template.section_title {
        SectionTitleStyle::Underline => format!(
            "<w:pBdr><w:bottom w:val=\"single\" w:sz=\"6\" w:space=\"1\" w:color=\"{}\"/></w:pBdr>",
            border
        ),
        SectionTitleStyle::ColorBar => format!(
            "<w:pBdr><w:left w:val=\"single\" w:sz=\"24\" w:space=\"6\" w:color=\"{}\"/></w:pBdr>",
            accent
        ),
        SectionTitleStyle::Box => {
            let side = |name: &str| {
                format!(
                    "<w:{} w:val=\"single\" w:sz=\"6\" w:space=\"2\" w:color=\"{}\"/>",
                    name, accent
                )
            };
            format!(
                "<w:pBdr>{}{}{}{}</w:pBdr>",
                side("top"),
                side("left"),
                side("bottom"),
                side("right")
            )
        }
        SectionTitleStyle::None => String::new(),
    }
}

fn styles_xml(template: &TemplateConfig) -> String {
    let font = template.font.docx_name();
    let sizes = &template.sizes;
    let colors = &template.colors;
    let muted = colors.muted.hex();

    format!(
        "{decl}<w:styles xmlns:w=\"{ns}\">\
         <w:docDefaults><w:rPrDefault><w:rPr>\
         <w:rFonts w:ascii=\"{font}\" w:hAnsi=\"{font}\" w:cs=\"{font}\" w:eastAsia=\"{font}\"/>\
         <w:color w:val=\"{text}\"/><w:sz w:val=\"{body}\"/><w:szCs w:val=\"{body}\"/>\
         </w:rPr></w:rPrDefault>\
         <w:pPrDefault><w:pPr><w:spacing w:after=\"60\" w:line=\"264\" w:lineRule=\"auto\"/></w:pPr></w:pPrDefault>\
         </w:docDefaults>\
         <w:style w:type=\"paragraph\" w:default=\"1\" w:styleId=\"Normal\"><w:name w:val=\"Normal\"/><w:qFormat/></w:style>\
         <w:style w:type=\"paragraph\" w:styleId=\"Title\"><w:name w:val=\"Title\"/><w:basedOn w:val=\"Normal\"/>\
         <w:next w:val=\"Normal\"/><w:qFormat/><w:pPr><w:spacing w:after=\"40\"/></w:pPr>\
         <w:rPr><w:b/><w:color w:val=\"{accent}\"/><w:sz w:val=\"{name}\"/><w:szCs w:val=\"{name}\"/></w:rPr></w:style>\
         <w:style w:type=\"paragraph\" w:styleId=\"Subtitle\"><w:name w:val=\"Subtitle\"/><w:basedOn w:val=\"Normal\"/>\
         <w:qFormat/><w:rPr><w:color w:val=\"{muted}\"/><w:sz w:val=\"{title}\"/><w:szCs w:val=\"{title}\"/></w:rPr></w:style>\
         <w:style w:type=\"paragraph\" w:styleId=\"Heading1\"><w:name w:val=\"heading 1\"/><w:basedOn w:val=\"Normal\"/>\
         <w:next w:val=\"Normal\"/><w:qFormat/><w:pPr><w:keepNext/><w:keepLines/>{borders}\
         <w:spacing w:before=\"200\" w:after=\"80\"/><w:outlineLvl w:val=\"0\"/></w:pPr>\
         <w:rPr><w:b/><w:color w:val=\"{accent}\"/><w:sz w:val=\"{heading}\"/><w:szCs w:val=\"{heading}\"/></w:rPr></w:style>\
         <w:style w:type=\"paragraph\" w:customStyle=\"1\" w:styleId=\"EntryTitle\"><w:name w:val=\"Entry Title\"/>\
         <w:basedOn w:val=\"Normal\"/><w:pPr><w:keepNext/><w:spacing w:before=\"80\" w:after=\"0\"/></w:pPr></w:style>\
         <w:style w:type=\"paragraph\" w:customStyle=\"1\" w:styleId=\"Meta\"><w:name w:val=\"Meta\"/>\
         <w:basedOn w:val=\"Normal\"/><w:pPr><w:keepNext/><w:spacing w:after=\"40\"/></w:pPr>\
         <w:rPr><w:color w:val=\"{muted}\"/><w:sz w:val=\"{meta}\"/><w:szCs w:val=\"{meta}\"/></w:rPr></w:style>\
         <w:style w:type=\"paragraph\" w:styleId=\"ListBullet\"><w:name w:val=\"List Bullet\"/><w:basedOn w:val=\"Normal\"/>\
         <w:pPr><w:numPr><w:ilvl w:val=\"0\"/><w:numId w:val=\"1\"/></w:numPr><w:spacing w:after=\"20\"/></w:pPr></w:style>\
         <w:style w:type=\"character\" w:styleId=\"Hyperlink\"><w:name w:val=\"Hyperlink\"/>\
         <w:rPr><w:color w:val=\"{accent}\"/></w:rPr></w:style>\
         <w:style w:type=\"character\" w:customStyle=\"1\" w:styleId=\"MutedText\"><w:name w:val=\"Muted Text\"/>\
         <w:rPr><w:color w:val=\"{muted}\"/></w:rPr></w:style>\
         </w:styles>",
        decl = XML_DECL,
        ns = W_NS,
        font = escape_xml(font),
        text = colors.text.hex(),
        accent = colors.accent.hex(),
        muted = muted,
        body = half_points(sizes.body),
        name = half_points(sizes.name),
        title = half_points(sizes.title),
        heading = half_points(sizes.heading),
        meta = half_points(sizes.meta),
        borders = heading_borders(template),
    )
}

fn numbering_xml(template: &TemplateConfig) -> String {
    format!(
        "{}<w:numbering xmlns:w=\"{}\">\
         <w:abstractNum w:abstractNumId=\"0\"><w:multiLevelType w:val=\"singleLevel\"/>\
         <w:lvl w:ilvl=\"0\"><w:start w:val=\"1\"/><w:numFmt w:val=\"bullet\"/>\
         <w:lvlText w:val=\"{}\"/><w:lvlJc w:val=\"left\"/>\
         <w:pPr><w:ind w:left=\"360\" w:hanging=\"240\"/></w:pPr>\
         <w:rPr><w:color w:val=\"{}\"/></w:rPr></w:lvl></w:abstractNum>\
         <w:num w:numId=\"1\"><w:abstractNumId w:val=\"0\"/></w:num>\
         </w:numbering>",
        XML_DECL,
        W_NS,
        template.bullet.glyph(),
        template.colors.accent.hex()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{plan_cover_letter, plan_resume};
    use crate::model::{CoverLetterDocument, Experience, ResumeDocument};
    use crate::template::resolve_template;
    use std::io::Read;
    use zip::ZipArchive;

    fn part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut xml = String::new();
        file.read_to_string(&mut xml).unwrap();
        xml
    }

    fn resume() -> ResumeDocument {
        let mut resume = ResumeDocument::with_name("Jane & Co");
        resume.personal_info.github = Some("octocat".into());
        resume.experience.push(Experience {
            position: "Engineer".into(),
            company: "Acme".into(),
            bullets: vec!["Built <things>".into()],
            ..Default::default()
        });
        resume
    }

    #[test]
    fn test_package_parts() {
        let plan = plan_resume(&resume(), resolve_template("classic"));
        let bytes = to_docx(&plan, &RenderOptions::default()).unwrap();
        let archive = ZipArchive::new(Cursor::new(&bytes[..])).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        for expected in [
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/core.xml",
            "word/document.xml",
            "word/styles.xml",
            "word/numbering.xml",
            "word/_rels/document.xml.rels",
        ] {
            assert!(names.contains(&expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_document_content() {
        let plan = plan_resume(&resume(), resolve_template("classic"));
        let bytes = to_docx(&plan, &RenderOptions::default()).unwrap();
        let xml = part(&bytes, "word/document.xml");
        assert!(xml.contains("<w:pStyle w:val=\"Title\"/><w:jc w:val=\"center\"/>"));
        assert!(xml.contains("Jane &amp; Co"));
        assert!(xml.contains("<w:pStyle w:val=\"Heading1\"/></w:pPr><w:r><w:t xml:space=\"preserve\">EXPERIENCE</w:t>"));
        assert!(xml.contains("<w:pStyle w:val=\"ListBullet\"/>"));
        assert!(xml.contains("Built &lt;things&gt;"));
        assert!(xml.contains("<w:sectPr><w:pgSz w:w=\"12240\" w:h=\"15840\"/>"));
    }

    #[test]
    fn test_hyperlink_relationships() {
        let plan = plan_resume(&resume(), resolve_template("classic"));
        let bytes = to_docx(&plan, &RenderOptions::default()).unwrap();
        let xml = part(&bytes, "word/document.xml");
        assert!(xml.contains("<w:hyperlink r:id=\"rId3\""));
        let rels = part(&bytes, "word/_rels/document.xml.rels");
        assert!(rels.contains("Target=\"https://github.com/octocat\" TargetMode=\"External\""));
    }

    #[test]
    fn test_styles_follow_template() {
        let plan = plan_resume(&resume(), resolve_template("executive"));
        let bytes = to_docx(&plan, &RenderOptions::default()).unwrap();
        let styles = part(&bytes, "word/styles.xml");
        assert!(styles.contains("Times New Roman"));
        assert!(styles.contains("<w:top w:val=\"single\""));
        assert!(styles.contains("w:styleId=\"MutedText\""));
        let numbering = part(&bytes, "word/numbering.xml");
        assert!(numbering.contains("<w:lvlText w:val=\"\u{203A}\"/>"));
    }

    #[test]
    fn test_cover_letter_docx() {
        let mut letter = CoverLetterDocument::to_company("Acme");
        letter.add_paragraph("Hello there.");
        let plan = plan_cover_letter(&letter, None, resolve_template("minimal"));
        let bytes = to_docx(&plan, &RenderOptions::default()).unwrap();
        let xml = part(&bytes, "word/document.xml");
        assert!(xml.contains("Hello there."));
        assert!(!xml.contains("Heading1"));
        let core = part(&bytes, "docProps/core.xml");
        assert!(core.contains("<dc:title>Cover Letter \u{2013} Acme</dc:title>"));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b>&\"'"), "a&lt;b&gt;&amp;&quot;&apos;");
        assert_eq!(escape_xml("x\u{1}y"), "xy");
    }
}
