//! PDF rendering.
//!
//! Draws a layout plan with the standard Type1 fonts so every glyph is real,
//! selectable text. Each region flows down its own column; columns of a
//! multi-column layout share pages but paginate independently.
//!
//! The standard fonts only cover the WinAnsi character set. Characters
//! outside it (Cyrillic, CJK, ...) are drawn as `?`, and the span carries its
//! real text as `/ActualText` so text extraction still returns it. With
//! [`RenderOptions::with_strict_pdf_text`] such text is an error instead.

use std::collections::BTreeSet;
use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::error::{Error, Result};
use crate::layout::{
    metrics, Block, EntryBlock, FontStyle, HeaderBlock, InlineList, LayoutPlan, LineStyle,
    LinkRef, Region, RegionKind, CONTACT_SEPARATOR,
};
use crate::template::{HeaderAlign, LayoutVariant, Rgb, SectionTitleStyle, TemplateConfig};

use super::is_safe_link;
use super::options::RenderOptions;

const PRODUCER: &str = concat!("vitae ", env!("CARGO_PKG_VERSION"));

/// Horizontal gap between columns.
const COLUMN_GAP: f32 = 18.0;
/// Line height as a multiple of font size.
const LEADING: f32 = 1.3;
/// Indent of bullet text from the marker.
const BULLET_INDENT: f32 = 12.0;
/// Share of the content width taken by the narrow column.
const ASIDE_SHARE: f32 = 0.32;

/// Render a layout plan to PDF bytes.
pub fn to_pdf(plan: &LayoutPlan, options: &RenderOptions) -> Result<Vec<u8>> {
    let (page_width, page_height) = options.page_size.dimensions();
    let margin = options.margin;
    let frame = Frame {
        page_height,
        top: page_height - margin,
        bottom: margin,
    };

    let mut composer = Composer::new(plan.template, frame);
    let columns = columns(plan.variant, margin, page_width - 2.0 * margin);

    // Full-width regions push the start point down; the columns that follow
    // all begin where the last full-width region ended.
    let mut start = Cursor {
        page: 0,
        y: frame.top,
    };
    let mut aside_span = None;
    for region in plan.regions() {
        let column = match region.kind {
            RegionKind::Full => columns.full,
            RegionKind::Main => columns.main,
            RegionKind::Aside => columns.aside,
        };
        let end = composer.flow(region, column, start);
        match region.kind {
            RegionKind::Full => start = end,
            RegionKind::Aside => aside_span = Some((start, end.page)),
            RegionKind::Main => {}
        }
    }

    if let Some((aside_start, last_page)) = aside_span {
        composer.paint_aside(plan.variant, columns.aside, aside_start, last_page);
    }

    log::debug!(
        "Rendered PDF with template '{}': {} page(s)",
        plan.template.id,
        composer.pages.len()
    );
    if !composer.unencodable.is_empty() {
        let chars: String = composer.unencodable.iter().collect();
        if options.strict_pdf_text {
            return Err(Error::Pdf(format!(
                "text outside the WinAnsi character set: {}",
                chars
            )));
        }
        log::warn!(
            "PDF fonts cannot draw {} character(s) ({}); they are shown as '?' \
             and kept as ActualText",
            composer.unencodable.len(),
            chars
        );
    }

    write_document(composer.pages, plan, options, page_width, page_height)
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    page_height: f32,
    top: f32,
    bottom: f32,
}

#[derive(Debug, Clone, Copy)]
struct Column {
    x: f32,
    width: f32,
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    full: Column,
    main: Column,
    aside: Column,
}

#[derive(Debug, Clone, Copy)]
struct Cursor {
    page: usize,
    y: f32,
}

fn columns(variant: LayoutVariant, left: f32, width: f32) -> Columns {
    let full = Column { x: left, width };
    let aside_width = (width - COLUMN_GAP) * ASIDE_SHARE;
    let main_width = width - COLUMN_GAP - aside_width;
    match variant {
        LayoutVariant::SingleColumn => Columns {
            full,
            main: full,
            aside: full,
        },
        LayoutVariant::TwoColumn => Columns {
            full,
            main: Column {
                x: left,
                width: main_width,
            },
            aside: Column {
                x: left + main_width + COLUMN_GAP,
                width: aside_width,
            },
        },
        LayoutVariant::Sidebar => Columns {
            full,
            aside: Column {
                x: left,
                width: aside_width,
            },
            main: Column {
                x: left + aside_width + COLUMN_GAP,
                width: main_width,
            },
        },
    }
}

/// A run of text in one font.
#[derive(Debug, Clone)]
struct Span {
    /// Offset from the column's left edge
    dx: f32,
    text: String,
    style: FontStyle,
    size: f32,
    color: Rgb,
    link: Option<String>,
}

/// One atomic output line.
#[derive(Debug, Clone)]
struct Line {
    height: f32,
    spans: Vec<Span>,
    rule: Option<SectionTitleStyle>,
}

/// The lines of one block plus its pagination constraints.
#[derive(Debug, Clone, Default)]
struct Chunk {
    lines: Vec<Line>,
    space_before: f32,
    space_after: f32,
    /// Move the whole chunk to a fresh page rather than split it
    keep_together: bool,
    /// Require room for the first line of the next chunk too
    keep_with_next: bool,
}

impl Chunk {
    fn height(&self) -> f32 {
        self.lines.iter().map(|l| l.height).sum()
    }

    fn first_height(&self) -> f32 {
        self.lines.first().map(|l| l.height).unwrap_or(0.0)
    }
}

#[derive(Debug, Default)]
struct PageCanvas {
    background: Vec<Operation>,
    ops: Vec<Operation>,
    links: Vec<LinkArea>,
}

#[derive(Debug)]
struct LinkArea {
    rect: [f32; 4],
    url: String,
}

struct Composer {
    template: &'static TemplateConfig,
    frame: Frame,
    pages: Vec<PageCanvas>,
    /// Characters the standard fonts could not draw
    unencodable: BTreeSet<char>,
}

impl Composer {
    fn new(template: &'static TemplateConfig, frame: Frame) -> Self {
        Self {
            template,
            frame,
            pages: vec![PageCanvas::default()],
            unencodable: BTreeSet::new(),
        }
    }

    fn page(&mut self, index: usize) -> &mut PageCanvas {
        while self.pages.len() <= index {
            self.pages.push(PageCanvas::default());
        }
        &mut self.pages[index]
    }

    /// Flow a region down `column` starting at `start`; returns where it ended.
    fn flow(&mut self, region: &Region, column: Column, start: Cursor) -> Cursor {
        let chunks: Vec<Chunk> = region
            .blocks
            .iter()
            .map(|b| self.chunk(b, column.width))
            .collect();

        let mut cursor = start;
        let mut column_top = start.y;
        let fresh_height = self.frame.top - self.frame.bottom;

        for (i, chunk) in chunks.iter().enumerate() {
            let at_top = (cursor.y - column_top).abs() < 0.01;

            if chunk.lines.is_empty() {
                if !at_top {
                    cursor.y -= chunk.space_before;
                }
                continue;
            }

            let space = if at_top { 0.0 } else { chunk.space_before };
            let body = |c: &Chunk| {
                if c.keep_together && c.height() <= fresh_height {
                    c.height()
                } else {
                    c.first_height()
                }
            };

            // Follow the keep-with-next chain (heading -> entry -> first bullet).
            let mut needed = space + body(chunk);
            let mut link = (i, chunk);
            while link.1.keep_with_next {
                let next = chunks[link.0 + 1..]
                    .iter()
                    .enumerate()
                    .find(|(_, c)| !c.lines.is_empty())
                    .map(|(offset, c)| (link.0 + 1 + offset, c));
                let Some(next) = next else {
                    break;
                };
                needed += next.1.space_before + body(next.1);
                link = next;
            }
            if needed > fresh_height {
                needed = space + body(chunk);
            }

            if !at_top && cursor.y - needed < self.frame.bottom {
                cursor = self.next_page(cursor);
                column_top = cursor.y;
            } else {
                cursor.y -= space;
            }

            for line in &chunk.lines {
                let at_top = (cursor.y - column_top).abs() < 0.01;
                if !at_top && cursor.y - line.height < self.frame.bottom {
                    cursor = self.next_page(cursor);
                    column_top = cursor.y;
                }
                self.draw_line(line, column, cursor);
                cursor.y -= line.height;
            }
            cursor.y -= chunk.space_after;
        }

        cursor
    }

    fn next_page(&mut self, cursor: Cursor) -> Cursor {
        let page = cursor.page + 1;
        self.page(page);
        Cursor {
            page,
            y: self.frame.top,
        }
    }

    /// Convert one block into lines wrapped to `width`.
    fn chunk(&self, block: &Block, width: f32) -> Chunk {
        let t = self.template;
        let sizes = t.sizes;
        let colors = t.colors;

        match block {
            Block::Header(header) => self.header_chunk(header, width),
            Block::Heading(heading) => {
                let size = sizes.heading;
                let inset = match t.section_title {
                    SectionTitleStyle::ColorBar => 8.0,
                    SectionTitleStyle::Box => 4.0,
                    _ => 0.0,
                };
                let mut lines = self.wrap_lines(
                    &heading.title,
                    FontStyle::Bold,
                    size,
                    colors.accent,
                    inset,
                    width - 2.0 * inset,
                );
                for line in &mut lines {
                    line.height = size * 1.6;
                    line.rule = Some(t.section_title);
                }
                Chunk {
                    lines,
                    space_before: 10.0,
                    space_after: 4.0,
                    keep_together: true,
                    keep_with_next: true,
                }
            }
            Block::Entry(entry) => self.entry_chunk(entry, width),
            Block::Bullet(text) => {
                let size = sizes.body;
                let m = metrics(t.font, FontStyle::Regular);
                let mut lines: Vec<Line> = m
                    .wrap(text, size, width - BULLET_INDENT)
                    .into_iter()
                    .map(|s| self.line(BULLET_INDENT, s, FontStyle::Regular, size, colors.text))
                    .collect();
                if let Some(first) = lines.first_mut() {
                    first.spans.insert(
                        0,
                        Span {
                            dx: 2.0,
                            text: t.bullet.glyph().to_string(),
                            style: FontStyle::Regular,
                            size,
                            color: colors.accent,
                            link: None,
                        },
                    );
                }
                Chunk {
                    lines,
                    space_after: 1.5,
                    keep_together: true,
                    ..Chunk::default()
                }
            }
            Block::Paragraph(text) => Chunk {
                lines: self.wrap_lines(text, FontStyle::Regular, sizes.body, colors.text, 0.0, width),
                space_before: 1.0,
                space_after: 4.0,
                ..Chunk::default()
            },
            Block::Line(line) => {
                let (style, size, color) = match line.style {
                    LineStyle::Plain => (FontStyle::Regular, sizes.body, colors.text),
                    LineStyle::Muted => (FontStyle::Italic, sizes.meta, colors.muted),
                    LineStyle::Strong => (FontStyle::Bold, sizes.body, colors.text),
                };
                Chunk {
                    lines: self.wrap_lines(&line.text, style, size, color, 0.0, width),
                    space_after: 1.0,
                    keep_together: true,
                    ..Chunk::default()
                }
            }
            Block::Inline(list) => Chunk {
                lines: self.inline_lines(list, width),
                space_after: 2.0,
                ..Chunk::default()
            },
            Block::Link(link) => {
                let mut lines =
                    self.wrap_lines(&link.label, FontStyle::Regular, sizes.body, colors.accent, 0.0, width);
                if is_safe_link(&link.url) {
                    for span in lines.iter_mut().flat_map(|l| l.spans.iter_mut()) {
                        span.link = Some(link.url.clone());
                    }
                }
                Chunk {
                    lines,
                    space_after: 1.0,
                    keep_together: true,
                    ..Chunk::default()
                }
            }
            Block::Divider => Chunk {
                space_before: 6.0,
                ..Chunk::default()
            },
        }
    }

    fn header_chunk(&self, header: &HeaderBlock, width: f32) -> Chunk {
        let t = self.template;
        let sizes = t.sizes;
        let colors = t.colors;
        let mut lines = Vec::new();

        lines.extend(self.wrap_lines(&header.name, FontStyle::Bold, sizes.name, colors.accent, 0.0, width));
        lines.extend(self.wrap_lines(&header.title, FontStyle::Regular, sizes.title, colors.muted, 0.0, width));
        lines.extend(self.wrap_lines(
            &header.contact_line(),
            FontStyle::Regular,
            sizes.meta,
            colors.muted,
            0.0,
            width,
        ));
        lines.extend(self.link_row(&header.links, width));

        if t.header_align == HeaderAlign::Center {
            for line in &mut lines {
                center(line, t, width);
            }
        }

        Chunk {
            lines,
            space_after: 8.0,
            keep_together: true,
            ..Chunk::default()
        }
    }

    /// Lay out profile links side by side, wrapping between links.
    fn link_row(&self, links: &[LinkRef], width: f32) -> Vec<Line> {
        let t = self.template;
        let size = t.sizes.meta;
        let m = metrics(t.font, FontStyle::Regular);
        let separator = CONTACT_SEPARATOR;
        let separator_width = m.text_width(separator, size);

        let mut lines = Vec::new();
        let mut spans: Vec<Span> = Vec::new();
        let mut x = 0.0_f32;
        for link in links {
            let label_width = m.text_width(&link.label, size);
            if !spans.is_empty() && x + separator_width + label_width > width {
                lines.push(self.line_of(std::mem::take(&mut spans), size));
                x = 0.0;
            }
            if !spans.is_empty() {
                spans.push(Span {
                    dx: x,
                    text: separator.to_string(),
                    style: FontStyle::Regular,
                    size,
                    color: t.colors.muted,
                    link: None,
                });
                x += separator_width;
            }
            spans.push(Span {
                dx: x,
                text: link.label.clone(),
                style: FontStyle::Regular,
                size,
                color: t.colors.accent,
                link: is_safe_link(&link.url).then(|| link.url.clone()),
            });
            x += label_width;
        }
        if !spans.is_empty() {
            lines.push(self.line_of(spans, size));
        }
        lines
    }

    fn entry_chunk(&self, entry: &EntryBlock, width: f32) -> Chunk {
        let t = self.template;
        let sizes = t.sizes;
        let colors = t.colors;

        let mut lines =
            self.wrap_lines(&entry.title_line(), FontStyle::Bold, sizes.body, colors.text, 0.0, width);
        lines.extend(self.wrap_lines(
            &entry.meta_line(),
            FontStyle::Italic,
            sizes.meta,
            colors.muted,
            0.0,
            width,
        ));
        if let Some(url) = &entry.url {
            let mut url_lines =
                self.wrap_lines(url, FontStyle::Regular, sizes.meta, colors.accent, 0.0, width);
            if is_safe_link(url) {
                for span in url_lines.iter_mut().flat_map(|l| l.spans.iter_mut()) {
                    span.link = Some(url.clone());
                }
            }
            lines.extend(url_lines);
        }

        Chunk {
            lines,
            space_before: 2.0,
            space_after: 1.0,
            keep_together: true,
            keep_with_next: true,
        }
    }

    fn inline_lines(&self, list: &InlineList, width: f32) -> Vec<Line> {
        let t = self.template;
        let size = t.sizes.body;
        let color = t.colors.text;
        let items = list.items.join(", ");

        let Some(label) = &list.label else {
            return self.wrap_lines(&items, FontStyle::Regular, size, color, 0.0, width);
        };

        let label = format!("{}:", label);
        let label_width = metrics(t.font, FontStyle::Bold).text_width(&label, size)
            + metrics(t.font, FontStyle::Regular).text_width(" ", size);
        let wrapped = metrics(t.font, FontStyle::Regular).wrap_first(
            &items,
            size,
            (width - label_width).max(0.0),
            width,
        );

        let mut lines = Vec::with_capacity(wrapped.len().max(1));
        let mut first = vec![Span {
            dx: 0.0,
            text: label,
            style: FontStyle::Bold,
            size,
            color,
            link: None,
        }];
        let mut rest = wrapped.into_iter();
        if let Some(text) = rest.next().filter(|t| !t.is_empty()) {
            first.push(Span {
                dx: label_width,
                text,
                style: FontStyle::Regular,
                size,
                color,
                link: None,
            });
        }
        lines.push(self.line_of(first, size));
        lines.extend(rest.map(|text| self.line(0.0, text, FontStyle::Regular, size, color)));
        lines
    }

    fn wrap_lines(
        &self,
        text: &str,
        style: FontStyle,
        size: f32,
        color: Rgb,
        dx: f32,
        width: f32,
    ) -> Vec<Line> {
        metrics(self.template.font, style)
            .wrap(text, size, width)
            .into_iter()
            .map(|s| self.line(dx, s, style, size, color))
            .collect()
    }

    fn line(&self, dx: f32, text: String, style: FontStyle, size: f32, color: Rgb) -> Line {
        self.line_of(
            vec![Span {
                dx,
                text,
                style,
                size,
                color,
                link: None,
            }],
            size,
        )
    }

    fn line_of(&self, spans: Vec<Span>, size: f32) -> Line {
        Line {
            height: size * LEADING,
            spans,
            rule: None,
        }
    }

    fn draw_line(&mut self, line: &Line, column: Column, cursor: Cursor) {
        let template = self.template;
        let top = cursor.y;
        let max_size = line.spans.iter().map(|s| s.size).fold(0.0_f32, f32::max);
        let baseline = top - (line.height + max_size * 0.7) / 2.0;

        let mut ops = Vec::new();
        if let Some(rule) = line.rule {
            ops.extend(rule_ops(rule, template, column, top, line.height));
        }

        let mut links = Vec::new();
        for span in &line.spans {
            let x = column.x + span.dx;
            self.unencodable
                .extend(span.text.chars().filter(|c| win_ansi_byte(*c).is_none()));
            ops.extend(text_ops(span, x, baseline));
            if let Some(url) = &span.link {
                let w = metrics(template.font, span.style).text_width(&span.text, span.size);
                links.push(LinkArea {
                    rect: [
                        x,
                        baseline - span.size * 0.25,
                        x + w,
                        baseline + span.size * 0.85,
                    ],
                    url: url.clone(),
                });
            }
        }

        let page = self.page(cursor.page);
        page.ops.extend(ops);
        page.links.extend(links);
    }

    /// Fill the narrow column's background on every page it occupies.
    fn paint_aside(&mut self, variant: LayoutVariant, aside: Column, start: Cursor, last_page: usize) {
        let color = self.template.colors.aside_background;
        if color == Rgb(255, 255, 255) {
            return;
        }
        let frame = self.frame;
        let pad = 8.0;
        let last_page = match variant {
            LayoutVariant::Sidebar => self.pages.len() - 1,
            _ => last_page,
        };

        for index in start.page..=last_page {
            let (x, y, w, h) = match variant {
                // Full-bleed band from the page edge
                LayoutVariant::Sidebar => (
                    0.0,
                    0.0,
                    aside.x + aside.width + COLUMN_GAP / 2.0,
                    frame.page_height,
                ),
                _ => {
                    let top = if index == start.page { start.y } else { frame.top };
                    (
                        aside.x - pad,
                        frame.bottom - pad,
                        aside.width + 2.0 * pad,
                        top - frame.bottom + 2.0 * pad,
                    )
                }
            };
            let page = self.page(index);
            page.background.extend(fill_rect_ops(color, x, y, w, h));
        }
    }
}

fn center(line: &mut Line, template: &TemplateConfig, width: f32) {
    let Some(last) = line.spans.last() else {
        return;
    };
    let used = last.dx + metrics(template.font, last.style).text_width(&last.text, last.size);
    let offset = ((width - used) / 2.0).max(0.0);
    for span in &mut line.spans {
        span.dx += offset;
    }
}

fn font_resource(style: FontStyle) -> &'static [u8] {
    match style {
        FontStyle::Regular => b"F1",
        FontStyle::Bold => b"F2",
        FontStyle::Italic => b"F3",
    }
}

fn color_operands(color: Rgb) -> Vec<Object> {
    let (r, g, b) = color.unit();
    vec![Object::Real(r), Object::Real(g), Object::Real(b)]
}

fn text_ops(span: &Span, x: f32, baseline: f32) -> Vec<Operation> {
    let show = vec![
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![
                Object::Name(font_resource(span.style).to_vec()),
                Object::Real(span.size),
            ],
        ),
        Operation::new("rg", color_operands(span.color)),
        Operation::new("Td", vec![Object::Real(x), Object::Real(baseline)]),
        Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(&span.text), StringFormat::Literal)],
        ),
        Operation::new("ET", vec![]),
    ];
    if span.text.chars().all(|c| win_ansi_byte(c).is_some()) {
        return show;
    }

    let mut ops = Vec::with_capacity(show.len() + 2);
    ops.push(Operation::new(
        "BDC",
        vec![
            Object::Name(b"Span".to_vec()),
            Object::Dictionary(dictionary! { "ActualText" => text_string(&span.text) }),
        ],
    ));
    ops.extend(show);
    ops.push(Operation::new("EMC", vec![]));
    ops
}

fn fill_rect_ops(color: Rgb, x: f32, y: f32, w: f32, h: f32) -> Vec<Operation> {
    vec![
        Operation::new("q", vec![]),
        Operation::new("rg", color_operands(color)),
        Operation::new(
            "re",
            vec![Object::Real(x), Object::Real(y), Object::Real(w), Object::Real(h)],
        ),
        Operation::new("f", vec![]),
        Operation::new("Q", vec![]),
    ]
}

fn rule_ops(
    rule: SectionTitleStyle,
    template: &TemplateConfig,
    column: Column,
    top: f32,
    height: f32,
) -> Vec<Operation> {
    let colors = template.colors;
    match rule {
        SectionTitleStyle::Underline => {
            let y = top - height + 1.0;
            vec![
                Operation::new("q", vec![]),
                Operation::new("RG", color_operands(colors.border)),
                Operation::new("w", vec![Object::Real(0.75)]),
                Operation::new("m", vec![Object::Real(column.x), Object::Real(y)]),
                Operation::new("l", vec![Object::Real(column.x + column.width), Object::Real(y)]),
                Operation::new("S", vec![]),
                Operation::new("Q", vec![]),
            ]
        }
        SectionTitleStyle::ColorBar => {
            fill_rect_ops(colors.accent, column.x, top - height + 2.0, 3.0, height - 4.0)
        }
        SectionTitleStyle::Box => vec![
            Operation::new("q", vec![]),
            Operation::new("RG", color_operands(colors.accent)),
            Operation::new("w", vec![Object::Real(0.75)]),
            Operation::new(
                "re",
                vec![
                    Object::Real(column.x),
                    Object::Real(top - height + 1.0),
                    Object::Real(column.width),
                    Object::Real(height - 2.0),
                ],
            ),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ],
        SectionTitleStyle::None => Vec::new(),
    }
}

/// Encode text as WinAnsiEncoding bytes; unmappable characters become `?`.
pub(crate) fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(|c| win_ansi_byte(c).unwrap_or(b'?')).collect()
}

/// WinAnsiEncoding code of `c`, if it has one.
fn win_ansi_byte(c: char) -> Option<u8> {
    let byte = match c as u32 {
        0x20..=0x7E | 0xA0..=0xFF => c as u32 as u8,
        _ => match c {
            '\u{20AC}' => 0x80,
            '\u{201A}' => 0x82,
            '\u{0192}' => 0x83,
            '\u{201E}' => 0x84,
            '\u{2026}' => 0x85,
            '\u{2020}' => 0x86,
            '\u{2021}' => 0x87,
            '\u{02C6}' => 0x88,
            '\u{2030}' => 0x89,
            '\u{0160}' => 0x8A,
            '\u{2039}' => 0x8B,
            '\u{0152}' => 0x8C,
            '\u{017D}' => 0x8E,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{02DC}' => 0x98,
            '\u{2122}' => 0x99,
            '\u{0161}' => 0x9A,
            '\u{203A}' => 0x9B,
            '\u{0153}' => 0x9C,
            '\u{017E}' => 0x9E,
            '\u{0178}' => 0x9F,
            '\t' | '\n' | '\r' => b' ',
            _ => return None,
        },
    };
    Some(byte)
}

/// A PDF text string: literal when ASCII, UTF-16BE with BOM otherwise.
fn text_string(s: &str) -> Object {
    if s.is_ascii() {
        Object::String(s.as_bytes().to_vec(), StringFormat::Literal)
    } else {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in s.encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        Object::String(bytes, StringFormat::Hexadecimal)
    }
}

fn font_dict(base_font: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn link_annotation(area: &LinkArea) -> Dictionary {
    dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => area.rect.iter().map(|v| Object::Real(*v)).collect::<Vec<_>>(),
        "Border" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(0)],
        "A" => dictionary! {
            "Type" => "Action",
            "S" => "URI",
            "URI" => Object::String(area.url.as_bytes().to_vec(), StringFormat::Literal),
        },
    }
}

fn content_stream(operations: Vec<Operation>, compress: bool) -> Result<Stream> {
    let data = Content { operations }
        .encode()
        .map_err(|e| Error::Pdf(e.to_string()))?;
    if !compress {
        return Ok(Stream::new(Dictionary::new(), data));
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&data)?;
    let compressed = encoder.finish()?;
    Ok(Stream::new(
        dictionary! { "Filter" => "FlateDecode" },
        compressed,
    ))
}

fn write_document(
    pages: Vec<PageCanvas>,
    plan: &LayoutPlan,
    options: &RenderOptions,
    page_width: f32,
    page_height: f32,
) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let (regular, bold, italic) = plan.template.font.pdf_base_fonts();
    let regular_id = doc.add_object(font_dict(regular));
    let bold_id = doc.add_object(font_dict(bold));
    let italic_id = doc.add_object(font_dict(italic));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
            "F3" => italic_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for canvas in pages {
        let mut operations = canvas.background;
        operations.extend(canvas.ops);
        let content_id = doc.add_object(content_stream(operations, options.compress)?);

        let annots: Vec<Object> = canvas
            .links
            .iter()
            .map(|area| Object::Reference(doc.add_object(link_annotation(area))))
            .collect();

        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(page_width),
                Object::Real(page_height),
            ],
            "Contents" => content_id,
            "Resources" => resources_id,
        };
        if !annots.is_empty() {
            page.set("Annots", annots);
        }
        let page_id: ObjectId = doc.add_object(page);
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });

    let metadata = &plan.metadata;
    let created = options
        .timestamp()
        .format("D:%Y%m%d%H%M%S+00'00'")
        .to_string();
    let mut info = dictionary! {
        "Title" => text_string(&metadata.title),
        "Creator" => Object::string_literal("vitae"),
        "Producer" => Object::string_literal(PRODUCER),
        "CreationDate" => Object::string_literal(created),
    };
    if !metadata.author.is_empty() {
        info.set("Author", text_string(&metadata.author));
    }
    if !metadata.subject.is_empty() {
        info.set("Subject", text_string(&metadata.subject));
    }
    let info_id = doc.add_object(info);

    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).map_err(|e| Error::Pdf(e.to_string()))?;
    Ok(out)
}
