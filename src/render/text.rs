//! Plain text rendering of a layout plan.
//!
//! The output is the linear reading order an ATS extractor should see:
//! regions in order, one block per line, blank lines between sections.

use crate::layout::{Block, LayoutPlan};

/// Convert a layout plan to plain text.
pub fn to_text(plan: &LayoutPlan) -> String {
    let glyph = plan.template.bullet.glyph();
    let mut lines: Vec<String> = Vec::new();

    for block in plan.blocks() {
        match block {
            Block::Header(header) => {
                push_nonempty(&mut lines, &header.name);
                push_nonempty(&mut lines, &header.title);
                push_nonempty(&mut lines, &header.contact_line());
                for link in &header.links {
                    lines.push(link.url.clone());
                }
            }
            Block::Heading(heading) => {
                lines.push(String::new());
                lines.push(heading.title.clone());
            }
            Block::Entry(entry) => {
                push_nonempty(&mut lines, &entry.title_line());
                push_nonempty(&mut lines, &entry.meta_line());
                if let Some(url) = &entry.url {
                    lines.push(url.clone());
                }
            }
            Block::Bullet(text) => lines.push(format!("{} {}", glyph, text)),
            Block::Paragraph(text) => lines.push(text.clone()),
            Block::Line(line) => lines.push(line.text.clone()),
            Block::Inline(list) => lines.push(list.text()),
            Block::Link(link) => {
                if link.url.is_empty() || link.label == link.url {
                    lines.push(link.label.clone());
                } else {
                    lines.push(format!("{}: {}", link.label, link.url));
                }
            }
            Block::Divider => lines.push(String::new()),
        }
    }

    lines.join("\n").trim().to_string()
}

fn push_nonempty(lines: &mut Vec<String>, text: &str) {
    if !text.is_empty() {
        lines.push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::plan_resume;
    use crate::model::{Experience, ResumeDocument};
    use crate::template::resolve_template;

    #[test]
    fn test_to_text() {
        let mut resume = ResumeDocument::with_name("Jane Doe");
        resume.personal_info.summary = "Line one\nline two".into();
        resume.experience.push(Experience {
            position: "Engineer".into(),
            company: "Acme".into(),
            start_date: "2020-01".into(),
            bullets: vec!["Did things".into()],
            ..Default::default()
        });

        let plan = plan_resume(&resume, resolve_template("minimal"));
        let text = to_text(&plan);

        assert!(text.starts_with("Jane Doe"));
        assert!(text.contains("Summary\nLine one line two"));
        assert!(text.contains("Engineer \u{2014} Acme\nJan 2020"));
        assert!(text.contains("\u{2013} Did things"));
    }

    #[test]
    fn test_empty_plan_text() {
        let plan = plan_resume(&ResumeDocument::new(), resolve_template("classic"));
        assert_eq!(to_text(&plan), "");
    }
}
