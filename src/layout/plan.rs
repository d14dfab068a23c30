//! Layout planning: the one place where section order, omission, region
//! placement, and entry spacing are decided.

use serde::Serialize;

use crate::model::{
    Certification, CoverLetterDocument, CustomItem, CustomSection, Education, Experience,
    PersonalInfo, Project, ResumeDocument, Skill,
};
use crate::normalize::{
    expand_profile_url, format_date, format_date_range, format_location, join_segments,
    normalize_text, ProfileKind, PRESENT,
};
use crate::template::{LayoutVariant, TemplateConfig};

/// Resume sections in their fixed priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionKind {
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Languages,
    Links,
    Custom,
}

impl SectionKind {
    /// Every section, in rendering priority order.
    pub const ORDER: [SectionKind; 9] = [
        SectionKind::Summary,
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::Projects,
        SectionKind::Certifications,
        SectionKind::Languages,
        SectionKind::Links,
        SectionKind::Custom,
    ];

    /// Heading text before the template's letter case is applied.
    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::Summary => "Summary",
            SectionKind::Experience => "Experience",
            SectionKind::Education => "Education",
            SectionKind::Skills => "Skills",
            SectionKind::Projects => "Projects",
            SectionKind::Certifications => "Certifications",
            SectionKind::Languages => "Languages",
            SectionKind::Links => "Links",
            SectionKind::Custom => "Additional",
        }
    }

    /// Stable key used in markup.
    pub fn key(&self) -> &'static str {
        match self {
            SectionKind::Summary => "summary",
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
            SectionKind::Projects => "projects",
            SectionKind::Certifications => "certifications",
            SectionKind::Languages => "languages",
            SectionKind::Links => "links",
            SectionKind::Custom => "custom",
        }
    }

    /// Region a section lands in for a layout variant.
    pub fn region(&self, variant: LayoutVariant) -> RegionKind {
        match variant {
            LayoutVariant::SingleColumn => RegionKind::Full,
            LayoutVariant::TwoColumn => match self {
                SectionKind::Skills
                | SectionKind::Certifications
                | SectionKind::Languages
                | SectionKind::Links => RegionKind::Aside,
                _ => RegionKind::Main,
            },
            LayoutVariant::Sidebar => match self {
                SectionKind::Summary
                | SectionKind::Skills
                | SectionKind::Languages
                | SectionKind::Links => RegionKind::Aside,
                _ => RegionKind::Main,
            },
        }
    }
}

/// Placement of a group of blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionKind {
    /// Spans the whole content width
    Full,
    /// The wide column of a multi-column layout
    Main,
    /// The narrow column of a multi-column layout
    Aside,
}

impl RegionKind {
    /// Regions of a variant in reading order.
    pub fn reading_order(variant: LayoutVariant) -> &'static [RegionKind] {
        match variant {
            LayoutVariant::SingleColumn => &[RegionKind::Full],
            LayoutVariant::TwoColumn => &[RegionKind::Full, RegionKind::Main, RegionKind::Aside],
            LayoutVariant::Sidebar => &[RegionKind::Aside, RegionKind::Main],
        }
    }

    /// Region holding the header for a variant.
    pub fn for_header(variant: LayoutVariant) -> RegionKind {
        match variant {
            LayoutVariant::Sidebar => RegionKind::Aside,
            _ => RegionKind::Full,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RegionKind::Full => "full",
            RegionKind::Main => "main",
            RegionKind::Aside => "aside",
        }
    }
}

/// A hyperlink with display text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkRef {
    pub label: String,
    /// Canonical URL; empty when the source had none
    pub url: String,
}

/// Name, headline, contact details and profile links.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderBlock {
    pub name: String,
    pub title: String,
    pub contact: Vec<String>,
    pub links: Vec<LinkRef>,
}

impl HeaderBlock {
    /// Contact details joined for a single line.
    pub fn contact_line(&self) -> String {
        self.contact.join(CONTACT_SEPARATOR)
    }
}

/// Separator used between header contact items.
pub const CONTACT_SEPARATOR: &str = " | ";

/// A section heading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionHeading {
    pub section: SectionKind,
    /// Markup key, unique per plan (`experience`, `custom-<id>`, ...)
    pub key: String,
    /// Heading text with the template's letter case applied
    pub title: String,
}

/// Title and meta lines of one list entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryBlock {
    pub title: String,
    pub subtitle: String,
    pub dates: String,
    pub location: String,
    pub url: Option<String>,
}

impl EntryBlock {
    /// Title and subtitle on one line.
    pub fn title_line(&self) -> String {
        join_segments([self.title.as_str(), self.subtitle.as_str()], " \u{2014} ")
    }

    /// Dates and location on one line.
    pub fn meta_line(&self) -> String {
        join_segments([self.dates.as_str(), self.location.as_str()], CONTACT_SEPARATOR)
    }
}

/// A labelled run of short items (skills, languages, technologies).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineList {
    pub label: Option<String>,
    pub items: Vec<String>,
}

impl InlineList {
    /// Items joined for a single line, prefixed by the label.
    pub fn text(&self) -> String {
        let items = self.items.join(", ");
        match &self.label {
            Some(label) => format!("{}: {}", label, items),
            None => items,
        }
    }
}

/// Emphasis of a standalone line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Plain,
    Muted,
    Strong,
}

/// A single short line of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLine {
    pub text: String,
    pub style: LineStyle,
}

/// An abstract renderable unit, independent of the output backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header(HeaderBlock),
    Heading(SectionHeading),
    Entry(EntryBlock),
    Bullet(String),
    Paragraph(String),
    Line(TextLine),
    Inline(InlineList),
    Link(LinkRef),
    /// Vertical gap between two entries; never follows the last one
    Divider,
}

/// An ordered run of blocks placed in one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    pub kind: RegionKind,
    pub blocks: Vec<Block>,
}

impl Region {
    fn new(kind: RegionKind) -> Self {
        Self {
            kind,
            blocks: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Document-level properties written into output metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlanMetadata {
    pub title: String,
    pub author: String,
    pub subject: String,
}

/// The complete, backend-independent layout of one document.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutPlan {
    pub template: &'static TemplateConfig,
    pub variant: LayoutVariant,
    /// Regions in reading order
    pub regions: Vec<Region>,
    pub metadata: PlanMetadata,
}

impl LayoutPlan {
    fn empty(template: &'static TemplateConfig, variant: LayoutVariant) -> Self {
        Self {
            template,
            variant,
            regions: RegionKind::reading_order(variant)
                .iter()
                .map(|kind| Region::new(*kind))
                .collect(),
            metadata: PlanMetadata::default(),
        }
    }

    fn push(&mut self, kind: RegionKind, block: Block) {
        if let Some(region) = self.regions.iter_mut().find(|r| r.kind == kind) {
            region.blocks.push(block);
        }
    }

    /// Regions in reading order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Get a region by kind.
    pub fn region(&self, kind: RegionKind) -> Option<&Region> {
        self.regions.iter().find(|r| r.kind == kind)
    }

    /// All blocks in reading order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.regions.iter().flat_map(|r| r.blocks.iter())
    }

    /// Section heading texts in reading order.
    pub fn section_titles(&self) -> Vec<&str> {
        self.blocks()
            .filter_map(|b| match b {
                Block::Heading(h) => Some(h.title.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Check whether the plan holds nothing but the header.
    pub fn is_header_only(&self) -> bool {
        self.blocks().all(|b| matches!(b, Block::Header(_)))
    }
}

/// Plan a resume.
///
/// The layout variant is taken from `template` once and holds for the whole
/// plan. Sections whose backing data is empty produce no blocks at all.
pub fn plan_resume(resume: &ResumeDocument, template: &'static TemplateConfig) -> LayoutPlan {
    let variant = template.layout;
    let mut plan = LayoutPlan::empty(template, variant);

    let header = header_block(&resume.personal_info, None);
    plan.metadata = PlanMetadata {
        title: if header.name.is_empty() {
            "Resume".to_string()
        } else {
            format!("{} \u{2013} Resume", header.name)
        },
        author: header.name.clone(),
        subject: header.title.clone(),
    };
    plan.push(RegionKind::for_header(variant), Block::Header(header));

    for section in SectionKind::ORDER {
        let region = section.region(variant);
        if section == SectionKind::Custom {
            for custom in &resume.custom_sections {
                let blocks = custom_section_blocks(custom, template);
                for block in blocks {
                    plan.push(region, block);
                }
            }
            continue;
        }

        let body = section_body(section, resume);
        if body.is_empty() {
            continue;
        }
        plan.push(
            region,
            Block::Heading(SectionHeading {
                section,
                key: section.key().to_string(),
                title: template.heading_case.apply(section.title()),
            }),
        );
        for block in body {
            plan.push(region, block);
        }
    }

    log::debug!(
        "Planned resume with template '{}' ({}): {} blocks",
        template.id,
        variant.as_str(),
        plan.blocks().count()
    );
    plan
}

/// Plan a cover letter.
///
/// Letters are always single-column. `sender` supplies contact details when
/// the caller has looked up the associated resume.
pub fn plan_cover_letter(
    letter: &CoverLetterDocument,
    sender: Option<&PersonalInfo>,
    template: &'static TemplateConfig,
) -> LayoutPlan {
    let mut plan = LayoutPlan::empty(template, LayoutVariant::SingleColumn);
    let region = RegionKind::Full;

    let header = match sender {
        Some(info) => header_block(info, Some(&letter.signature)),
        None => HeaderBlock {
            name: normalize_text(&letter.signature),
            title: String::new(),
            contact: Vec::new(),
            links: Vec::new(),
        },
    };
    let company = normalize_text(&letter.company);
    plan.metadata = PlanMetadata {
        title: if company.is_empty() {
            "Cover Letter".to_string()
        } else {
            format!("Cover Letter \u{2013} {}", company)
        },
        author: header.name.clone(),
        subject: normalize_text(letter.recipient_title.as_deref().unwrap_or_default()),
    };
    plan.push(region, Block::Header(header));

    // Groups are separated by a divider; empty groups vanish entirely.
    let mut groups: Vec<Vec<Block>> = Vec::new();

    let date = format_date(&letter.date);
    if !date.is_empty() {
        groups.push(vec![line(date, LineStyle::Muted)]);
    }

    let mut recipient = Vec::new();
    push_line(&mut recipient, &letter.recipient_name, LineStyle::Strong);
    push_line(
        &mut recipient,
        letter.recipient_title.as_deref().unwrap_or_default(),
        LineStyle::Plain,
    );
    push_line(&mut recipient, &letter.company, LineStyle::Plain);
    push_line(
        &mut recipient,
        letter.company_address.as_deref().unwrap_or_default(),
        LineStyle::Plain,
    );
    groups.push(recipient);

    let mut body = Vec::new();
    let salutation = normalize_text(&letter.salutation);
    if !salutation.is_empty() {
        body.push(Block::Paragraph(salutation));
    }
    for paragraph in &letter.body_paragraphs {
        let text = normalize_text(&paragraph.text);
        if !text.is_empty() {
            body.push(Block::Paragraph(text));
        }
    }
    groups.push(body);

    let mut closing = Vec::new();
    push_line(&mut closing, &letter.closing, LineStyle::Plain);
    push_line(&mut closing, &letter.signature, LineStyle::Strong);
    groups.push(closing);

    let groups: Vec<Vec<Block>> = groups.into_iter().filter(|g| !g.is_empty()).collect();
    let count = groups.len();
    for (i, group) in groups.into_iter().enumerate() {
        for block in group {
            plan.push(region, block);
        }
        if i + 1 < count {
            plan.push(region, Block::Divider);
        }
    }

    plan
}

fn line(text: String, style: LineStyle) -> Block {
    Block::Line(TextLine { text, style })
}

fn push_line(blocks: &mut Vec<Block>, raw: &str, style: LineStyle) {
    let text = normalize_text(raw);
    if !text.is_empty() {
        blocks.push(line(text, style));
    }
}

fn header_block(info: &PersonalInfo, fallback_name: Option<&str>) -> HeaderBlock {
    let mut name = normalize_text(&info.full_name);
    if name.is_empty() {
        name = normalize_text(fallback_name.unwrap_or_default());
    }

    let location = format_location(&info.location);
    let contact = [info.email.as_str(), info.phone.as_str(), location.as_str()]
        .into_iter()
        .map(normalize_text)
        .filter(|s| !s.is_empty())
        .collect();

    let profiles = [
        (ProfileKind::LinkedIn, info.linkedin.as_deref()),
        (ProfileKind::GitHub, info.github.as_deref()),
        (ProfileKind::Website, info.website.as_deref()),
    ];
    let links = profiles
        .into_iter()
        .filter_map(|(kind, value)| {
            let url = expand_profile_url(kind, value?);
            if url.is_empty() {
                None
            } else {
                Some(LinkRef {
                    label: url.clone(),
                    url,
                })
            }
        })
        .collect();

    HeaderBlock {
        name,
        title: normalize_text(info.title.as_deref().unwrap_or_default()),
        contact,
        links,
    }
}

/// Body blocks of a built-in section; empty when the section is omitted.
fn section_body(section: SectionKind, resume: &ResumeDocument) -> Vec<Block> {
    match section {
        SectionKind::Summary => {
            let summary = normalize_text(&resume.personal_info.summary);
            if summary.is_empty() {
                Vec::new()
            } else {
                vec![Block::Paragraph(summary)]
            }
        }
        SectionKind::Experience => entries(&resume.experience, experience_blocks),
        SectionKind::Education => entries(&resume.education, education_blocks),
        SectionKind::Skills => skill_blocks(&resume.skills),
        SectionKind::Projects => entries(&resume.projects, project_blocks),
        SectionKind::Certifications => entries(&resume.certifications, certification_blocks),
        SectionKind::Languages => {
            let items: Vec<String> = resume
                .languages
                .iter()
                .map(|l| {
                    let name = normalize_text(&l.name);
                    let proficiency = normalize_text(&l.proficiency);
                    if proficiency.is_empty() {
                        name
                    } else {
                        format!("{} ({})", name, proficiency)
                    }
                })
                .filter(|s| !s.is_empty())
                .collect();
            if items.is_empty() {
                Vec::new()
            } else {
                vec![Block::Inline(InlineList { label: None, items })]
            }
        }
        SectionKind::Links => resume
            .links
            .iter()
            .filter_map(|l| {
                let url = expand_profile_url(ProfileKind::Website, &l.url);
                let mut label = normalize_text(&l.label);
                if label.is_empty() {
                    label = url.clone();
                }
                if label.is_empty() {
                    None
                } else {
                    Some(Block::Link(LinkRef { label, url }))
                }
            })
            .collect(),
        SectionKind::Custom => Vec::new(),
    }
}

/// Emit each item's blocks in the given order with a divider between items.
///
/// Items with nothing to show are skipped, so a section of blank items plans
/// as empty and loses its heading.
fn entries<T>(items: &[T], to_blocks: fn(&T) -> Vec<Block>) -> Vec<Block> {
    let kept: Vec<Vec<Block>> = items
        .iter()
        .map(to_blocks)
        .filter(|item| !is_blank_item(item))
        .collect();
    let count = kept.len();

    let mut blocks = Vec::new();
    for (i, item) in kept.into_iter().enumerate() {
        blocks.extend(item);
        if i + 1 < count {
            blocks.push(Block::Divider);
        }
    }
    blocks
}

/// An item is blank when it is a bare entry line with no text of its own.
/// A lone "Present" comes from the current-role flag and does not count.
fn is_blank_item(blocks: &[Block]) -> bool {
    match blocks {
        [Block::Entry(entry)] => {
            entry.title.is_empty()
                && entry.subtitle.is_empty()
                && entry.location.is_empty()
                && entry.url.is_none()
                && (entry.dates.is_empty() || entry.dates == PRESENT)
        }
        _ => blocks.is_empty(),
    }
}

fn bullets(items: &[String]) -> impl Iterator<Item = Block> + '_ {
    items
        .iter()
        .map(|b| normalize_text(b))
        .filter(|b| !b.is_empty())
        .map(Block::Bullet)
}

fn experience_blocks(exp: &Experience) -> Vec<Block> {
    let mut blocks = vec![Block::Entry(EntryBlock {
        title: normalize_text(&exp.position),
        subtitle: normalize_text(&exp.company),
        dates: format_date_range(&exp.start_date, &exp.end_date, exp.current),
        location: format_location(&exp.location),
        url: None,
    })];
    blocks.extend(bullets(&exp.bullets));
    blocks
}

fn education_blocks(edu: &Education) -> Vec<Block> {
    let degree = normalize_text(&edu.degree);
    let field = normalize_text(edu.field.as_deref().unwrap_or_default());
    let title = match (degree.is_empty(), field.is_empty()) {
        (false, false) => format!("{} in {}", degree, field),
        (true, false) => field,
        _ => degree,
    };

    let mut blocks = vec![Block::Entry(EntryBlock {
        title,
        subtitle: normalize_text(&edu.institution),
        dates: format_date_range(&edu.start_date, &edu.end_date, edu.current),
        location: format_location(&edu.location),
        url: None,
    })];
    let gpa = normalize_text(edu.gpa.as_deref().unwrap_or_default());
    if !gpa.is_empty() {
        blocks.push(line(format!("GPA: {}", gpa), LineStyle::Muted));
    }
    let description = normalize_text(edu.description.as_deref().unwrap_or_default());
    if !description.is_empty() {
        blocks.push(Block::Paragraph(description));
    }
    blocks
}

fn project_blocks(project: &Project) -> Vec<Block> {
    let url = project
        .url
        .as_deref()
        .map(|u| expand_profile_url(ProfileKind::Website, u))
        .filter(|u| !u.is_empty());

    let mut blocks = vec![Block::Entry(EntryBlock {
        title: normalize_text(&project.name),
        subtitle: normalize_text(project.role.as_deref().unwrap_or_default()),
        dates: format_date_range(&project.start_date, &project.end_date, false),
        location: String::new(),
        url,
    })];
    let description = normalize_text(&project.description);
    if !description.is_empty() {
        blocks.push(Block::Paragraph(description));
    }
    blocks.extend(bullets(&project.bullets));
    let technologies: Vec<String> = project
        .technologies
        .iter()
        .map(|t| normalize_text(t))
        .filter(|t| !t.is_empty())
        .collect();
    if !technologies.is_empty() {
        blocks.push(Block::Inline(InlineList {
            label: Some("Technologies".to_string()),
            items: technologies,
        }));
    }
    blocks
}

fn certification_blocks(cert: &Certification) -> Vec<Block> {
    let url = cert
        .url
        .as_deref()
        .map(|u| expand_profile_url(ProfileKind::Website, u))
        .filter(|u| !u.is_empty());

    let mut blocks = vec![Block::Entry(EntryBlock {
        title: normalize_text(&cert.name),
        subtitle: normalize_text(&cert.issuer),
        dates: format_date(&cert.date),
        location: String::new(),
        url,
    })];
    let credential = normalize_text(cert.credential_id.as_deref().unwrap_or_default());
    if !credential.is_empty() {
        blocks.push(line(format!("Credential ID: {}", credential), LineStyle::Muted));
    }
    blocks
}

/// Group skills by category, keeping first-appearance order of categories.
fn skill_blocks(skills: &[Skill]) -> Vec<Block> {
    let mut groups: Vec<InlineList> = Vec::new();
    for skill in skills {
        let name = normalize_text(&skill.name);
        if name.is_empty() {
            continue;
        }
        let level = normalize_text(skill.level.as_deref().unwrap_or_default());
        let item = if level.is_empty() {
            name
        } else {
            format!("{} ({})", name, level)
        };
        let label = skill
            .category
            .as_deref()
            .map(normalize_text)
            .filter(|c| !c.is_empty());

        match groups.iter_mut().find(|g| g.label == label) {
            Some(group) => group.items.push(item),
            None => groups.push(InlineList {
                label,
                items: vec![item],
            }),
        }
    }
    groups.into_iter().map(Block::Inline).collect()
}

fn custom_section_blocks(section: &CustomSection, template: &TemplateConfig) -> Vec<Block> {
    let items = entries(&section.items, custom_item_blocks);
    if items.is_empty() {
        return Vec::new();
    }
    let mut title = normalize_text(&section.title);
    if title.is_empty() {
        title = SectionKind::Custom.title().to_string();
    }

    let mut blocks = vec![Block::Heading(SectionHeading {
        section: SectionKind::Custom,
        key: format!("custom-{}", section.id),
        title: template.heading_case.apply(&title),
    })];
    blocks.extend(items);
    blocks
}

fn custom_item_blocks(item: &CustomItem) -> Vec<Block> {
    let mut blocks = vec![Block::Entry(EntryBlock {
        title: normalize_text(&item.title),
        subtitle: normalize_text(&item.subtitle),
        dates: format_date(&item.date),
        location: String::new(),
        url: None,
    })];
    let description = normalize_text(&item.description);
    if !description.is_empty() {
        blocks.push(Block::Paragraph(description));
    }
    blocks.extend(bullets(&item.bullets));
    blocks
}
