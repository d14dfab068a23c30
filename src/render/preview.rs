//! HTML preview rendering.
//!
//! Produces one self-contained `<div>` with a stylesheet scoped to the
//! container id, so several previews can live on the same page. Markup is
//! semantic (`header`, `section`, `h2`, `ul`) and carries the template's
//! style choices as modifier classes.

use std::fmt::Write as _;

use crate::layout::{Block, EntryBlock, HeaderBlock, LayoutPlan, LineStyle, LinkRef, RegionKind};
use crate::template::{HeaderAlign, LayoutVariant, SectionTitleStyle, TemplateConfig};

use super::is_safe_link;
use super::options::{RenderOptions, DEFAULT_CONTAINER_ID};

/// Render a layout plan as preview markup.
pub fn to_html(plan: &LayoutPlan, options: &RenderOptions) -> String {
    let id = css_ident(&options.container_id);
    let template = plan.template;
    let mut html = String::with_capacity(8 * 1024);

    let _ = write!(
        html,
        "<div id=\"{}\" class=\"vitae vitae--{} layout--{}\">",
        id,
        template.id,
        plan.variant.as_str()
    );
    if options.include_styles {
        html.push_str("<style>");
        html.push_str(&stylesheet(&id, template, plan.variant));
        html.push_str("</style>");
    }

    let mut in_columns = false;
    for region in plan.regions() {
        let columnar = region.kind != RegionKind::Full;
        if columnar && !in_columns {
            let _ = write!(html, "<div class=\"columns columns--{}\">", plan.variant.as_str());
            in_columns = true;
        } else if !columnar && in_columns {
            html.push_str("</div>");
            in_columns = false;
        }

        let tag = match region.kind {
            RegionKind::Full => "div",
            RegionKind::Main => "main",
            RegionKind::Aside => "aside",
        };
        let _ = write!(html, "<{} class=\"region region--{}\">", tag, region.kind.as_str());
        let mut writer = BlockWriter::new(&mut html, template);
        for block in &region.blocks {
            writer.block(block);
        }
        writer.finish();
        let _ = write!(html, "</{}>", tag);
    }
    if in_columns {
        html.push_str("</div>");
    }

    html.push_str("</div>");
    html
}

/// Tracks which elements are open while walking a block stream.
struct BlockWriter<'a> {
    out: &'a mut String,
    template: &'static TemplateConfig,
    section_open: bool,
    entry_open: bool,
    list_open: bool,
}

impl<'a> BlockWriter<'a> {
    fn new(out: &'a mut String, template: &'static TemplateConfig) -> Self {
        Self {
            out,
            template,
            section_open: false,
            entry_open: false,
            list_open: false,
        }
    }

    fn block(&mut self, block: &Block) {
        if !matches!(block, Block::Bullet(_)) {
            self.close_list();
        }

        match block {
            Block::Header(header) => {
                self.close_section();
                self.header(header);
            }
            Block::Heading(heading) => {
                self.close_section();
                let _ = write!(
                    self.out,
                    "<section data-section=\"{}\"><h2 class=\"section-title section-title--{}\">{}</h2>",
                    escape_html(&heading.key),
                    self.template.section_title.as_str(),
                    escape_html(&heading.title)
                );
                self.section_open = true;
            }
            Block::Entry(entry) => {
                self.close_entry();
                self.entry(entry);
            }
            Block::Bullet(text) => {
                if !self.list_open {
                    let _ = write!(
                        self.out,
                        "<ul class=\"bullets bullets--{}\">",
                        self.template.bullet.as_str()
                    );
                    self.list_open = true;
                }
                let _ = write!(self.out, "<li>{}</li>", escape_html(text));
            }
            Block::Paragraph(text) => {
                let _ = write!(self.out, "<p class=\"paragraph\">{}</p>", escape_html(text));
            }
            Block::Line(line) => {
                let class = match line.style {
                    LineStyle::Plain => "line",
                    LineStyle::Muted => "line line--muted",
                    LineStyle::Strong => "line line--strong",
                };
                let _ = write!(self.out, "<p class=\"{}\">{}</p>", class, escape_html(&line.text));
            }
            Block::Inline(list) => {
                self.out.push_str("<p class=\"inline\">");
                if let Some(label) = &list.label {
                    let _ = write!(
                        self.out,
                        "<span class=\"inline-label\">{}:</span> ",
                        escape_html(label)
                    );
                }
                self.out.push_str(&escape_html(&list.items.join(", ")));
                self.out.push_str("</p>");
            }
            Block::Link(link) => {
                self.out.push_str("<p class=\"link\">");
                self.link(link);
                self.out.push_str("</p>");
            }
            Block::Divider => {
                self.close_entry();
                self.out
                    .push_str("<div class=\"entry-divider\" role=\"separator\"></div>");
            }
        }
    }

    fn header(&mut self, header: &HeaderBlock) {
        let align = match self.template.header_align {
            HeaderAlign::Left => "left",
            HeaderAlign::Center => "center",
        };
        let _ = write!(self.out, "<header class=\"header header--{}\">", align);
        if !header.name.is_empty() {
            let _ = write!(self.out, "<h1 class=\"name\">{}</h1>", escape_html(&header.name));
        }
        if !header.title.is_empty() {
            let _ = write!(
                self.out,
                "<p class=\"headline\">{}</p>",
                escape_html(&header.title)
            );
        }
        if !header.contact.is_empty() {
            let _ = write!(
                self.out,
                "<p class=\"contact\">{}</p>",
                escape_html(&header.contact_line())
            );
        }
        if !header.links.is_empty() {
            self.out.push_str("<p class=\"profiles\">");
            for (i, link) in header.links.iter().enumerate() {
                if i > 0 {
                    self.out.push_str(" <span class=\"sep\">|</span> ");
                }
                self.link(link);
            }
            self.out.push_str("</p>");
        }
        self.out.push_str("</header>");
    }

    fn entry(&mut self, entry: &EntryBlock) {
        self.out.push_str("<div class=\"entry\"><div class=\"entry-head\">");
        if !entry.title.is_empty() {
            let _ = write!(
                self.out,
                "<span class=\"entry-title\">{}</span>",
                escape_html(&entry.title)
            );
        }
        if !entry.subtitle.is_empty() {
            if !entry.title.is_empty() {
                self.out.push_str("<span class=\"entry-sep\"> \u{2014} </span>");
            }
            let _ = write!(
                self.out,
                "<span class=\"entry-subtitle\">{}</span>",
                escape_html(&entry.subtitle)
            );
        }
        self.out.push_str("</div>");

        let meta = entry.meta_line();
        if !meta.is_empty() {
            let _ = write!(self.out, "<div class=\"entry-meta\">{}</div>", escape_html(&meta));
        }
        if let Some(url) = &entry.url {
            self.out.push_str("<div class=\"entry-url\">");
            self.link(&LinkRef {
                label: url.clone(),
                url: url.clone(),
            });
            self.out.push_str("</div>");
        }
        self.entry_open = true;
    }

    fn link(&mut self, link: &LinkRef) {
        if is_safe_link(&link.url) {
            let _ = write!(
                self.out,
                "<a href=\"{}\" rel=\"noopener noreferrer\">{}</a>",
                escape_html(&link.url),
                escape_html(&link.label)
            );
        } else {
            let _ = write!(self.out, "<span>{}</span>", escape_html(&link.label));
        }
    }

    fn close_list(&mut self) {
        if self.list_open {
            self.out.push_str("</ul>");
            self.list_open = false;
        }
    }

    fn close_entry(&mut self) {
        self.close_list();
        if self.entry_open {
            self.out.push_str("</div>");
            self.entry_open = false;
        }
    }

    fn close_section(&mut self) {
        self.close_entry();
        if self.section_open {
            self.out.push_str("</section>");
            self.section_open = false;
        }
    }

    fn finish(mut self) {
        self.close_section();
    }
}

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Reduce a container id to characters valid in both an attribute and a
/// CSS id selector.
fn css_ident(id: &str) -> String {
    let cleaned: String = id
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    match cleaned.chars().next() {
        None => DEFAULT_CONTAINER_ID.to_string(),
        Some(c) if c.is_ascii_digit() => format!("v-{}", cleaned),
        Some(_) => cleaned,
    }
}

fn stylesheet(id: &str, template: &TemplateConfig, variant: LayoutVariant) -> String {
    let colors = &template.colors;
    let sizes = &template.sizes;
    let scope = format!("#{}", id);
    let mut css = String::with_capacity(2048);

    let _ = write!(
        css,
        "{s}{{font-family:{font};color:{text};font-size:{body}pt;line-height:1.35;\
         max-width:8.5in;margin:0 auto;padding:0.75in;background:#fff;box-sizing:border-box}}\
         {s} *{{box-sizing:border-box}}\
         {s} .header{{margin-bottom:12pt}}\
         {s} .header--center{{text-align:center}}\
         {s} .name{{font-size:{name}pt;margin:0;color:{accent}}}\
         {s} .headline{{font-size:{title}pt;margin:2pt 0;color:{muted}}}\
         {s} .contact,{s} .profiles{{font-size:{meta}pt;margin:2pt 0;color:{muted}}}\
         {s} a{{color:{accent};text-decoration:none}}\
         {s} section{{margin-top:10pt}}\
         {s} .section-title{{font-size:{heading}pt;color:{accent};margin:0 0 6pt;padding:2pt 0}}\
         {s} .entry-head{{font-weight:bold}}\
         {s} .entry-subtitle{{font-weight:normal}}\
         {s} .entry-meta,{s} .entry-url,{s} .line--muted{{font-size:{meta}pt;color:{muted}}}\
         {s} .line--strong{{font-weight:bold}}\
         {s} .entry-divider{{height:8pt}}\
         {s} p{{margin:2pt 0}}\
         {s} .paragraph{{margin:3pt 0 6pt}}\
         {s} .inline-label{{font-weight:bold}}\
         {s} .bullets{{list-style:none;margin:3pt 0;padding-left:12pt}}\
         {s} .bullets li{{position:relative;margin:1pt 0}}\
         {s} .bullets li::before{{content:\"\\{glyph:X}\";position:absolute;left:-10pt;color:{accent}}}",
        s = scope,
        font = template.font.css_stack(),
        text = colors.text.css(),
        accent = colors.accent.css(),
        muted = colors.muted.css(),
        body = sizes.body,
        name = sizes.name,
        title = sizes.title,
        meta = sizes.meta,
        heading = sizes.heading,
        glyph = template.bullet.glyph() as u32,
    );

    let title_rule = match template.section_title {
        SectionTitleStyle::Underline => format!("border-bottom:1px solid {}", colors.border.css()),
        SectionTitleStyle::ColorBar => {
            format!("border-left:4px solid {};padding-left:6pt", colors.accent.css())
        }
        SectionTitleStyle::Box => {
            format!("border:1px solid {};padding:2pt 6pt", colors.accent.css())
        }
        SectionTitleStyle::None => "border:none".to_string(),
    };
    let _ = write!(
        css,
        "{s} .section-title--{style}{{{rule}}}",
        s = scope,
        style = template.section_title.as_str(),
        rule = title_rule
    );

    match variant {
        LayoutVariant::SingleColumn => {}
        LayoutVariant::TwoColumn => {
            let _ = write!(
                css,
                "{s} .columns{{display:grid;grid-template-columns:2fr 1fr;gap:18pt}}\
                 {s} aside{{background:{bg};padding:8pt}}",
                s = scope,
                bg = colors.aside_background.css()
            );
        }
        LayoutVariant::Sidebar => {
            let _ = write!(
                css,
                "{s} .columns{{display:grid;grid-template-columns:1fr 2fr;gap:18pt}}\
                 {s} aside{{background:{bg};padding:10pt}}",
                s = scope,
                bg = colors.aside_background.css()
            );
        }
    }

    css
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::plan_resume;
    use crate::model::{Experience, ResumeDocument};
    use crate::template::resolve_template;

    fn resume() -> ResumeDocument {
        let mut resume = ResumeDocument::with_name("Jane <Doe>");
        resume.experience = vec![
            Experience {
                position: "Engineer".into(),
                company: "A & B".into(),
                bullets: vec!["One".into(), "Two".into()],
                ..Default::default()
            },
            Experience {
                position: "Intern".into(),
                company: "C".into(),
                ..Default::default()
            },
        ];
        resume
    }

    #[test]
    fn test_escapes_text() {
        let plan = plan_resume(&resume(), resolve_template("classic"));
        let html = to_html(&plan, &RenderOptions::default());
        assert!(html.contains("Jane &lt;Doe&gt;"));
        assert!(html.contains("A &amp; B"));
        assert!(!html.contains("<Doe>"));
    }

    #[test]
    fn test_container_and_scope() {
        let plan = plan_resume(&resume(), resolve_template("classic"));
        let options = RenderOptions::default().with_container_id("pane 1");
        let html = to_html(&plan, &options);
        assert!(html.starts_with("<div id=\"pane-1\""));
        assert!(html.contains("#pane-1 .section-title"));
        assert!(html.ends_with("</div>"));
    }

    #[test]
    fn test_styles_can_be_omitted() {
        let plan = plan_resume(&resume(), resolve_template("classic"));
        let html = to_html(&plan, &RenderOptions::default().with_styles(false));
        assert!(!html.contains("<style>"));
    }

    #[test]
    fn test_section_markup() {
        let plan = plan_resume(&resume(), resolve_template("professional"));
        let html = to_html(&plan, &RenderOptions::default());
        assert!(html.contains(
            "<section data-section=\"experience\"><h2 class=\"section-title section-title--colorbar\">EXPERIENCE</h2>"
        ));
        assert!(html.contains("<ul class=\"bullets bullets--dot\"><li>One</li><li>Two</li></ul>"));
        assert_eq!(html.matches("class=\"entry-divider\"").count(), 1);
        assert_eq!(html.matches("<section").count(), html.matches("</section>").count());
    }

    #[test]
    fn test_two_column_regions() {
        let mut resume = resume();
        resume.skills.push(crate::model::Skill::named("Rust"));
        let plan = plan_resume(&resume, resolve_template("modern"));
        let html = to_html(&plan, &RenderOptions::default());
        let main = html.find("<main").unwrap();
        let aside = html.find("<aside").unwrap();
        assert!(main < aside);
        assert!(html.contains("columns--two-column"));
    }

    #[test]
    fn test_unsafe_links_are_not_anchors() {
        let mut resume = resume();
        resume.links.push(crate::model::Link {
            id: "l1".into(),
            label: "Click".into(),
            url: "javascript:alert(1)".into(),
        });
        let plan = plan_resume(&resume, resolve_template("classic"));
        let html = to_html(&plan, &RenderOptions::default());
        assert!(html.contains("<span>Click</span>"));
        assert!(!html.contains("javascript:"));
    }

    #[test]
    fn test_css_ident() {
        assert_eq!(css_ident(""), DEFAULT_CONTAINER_ID);
        assert_eq!(css_ident("1abc"), "v-1abc");
        assert_eq!(css_ident("ok_id-2"), "ok_id-2");
    }
}
