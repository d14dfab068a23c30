//! Integration tests for rendering parity across backends.

use std::io::{Cursor, Read};

use vitae::import::extract_pdf_text;
use vitae::layout::{plan_resume, Block};
use vitae::render::{to_docx, to_html, to_pdf};
use vitae::{
    render_docx, render_pdf, render_pdf_with_options, render_preview, templates, Certification,
    Education, Error, Experience, Language, Link, Project, RenderOptions, ResumeDocument, Skill,
};
use zip::ZipArchive;

/// A resume short enough to fit on one page in every layout.
fn sample_resume() -> ResumeDocument {
    let mut resume = ResumeDocument::with_name("Jane Doe");
    resume.personal_info.title = Some("Backend Engineer".into());
    resume.personal_info.email = "jane@example.com".into();
    resume.personal_info.linkedin = Some("janedoe".into());
    resume.personal_info.summary = "Builds dependable billing platforms.".into();
    resume.experience.push(Experience {
        position: "Engineer".into(),
        company: "Acme".into(),
        start_date: "2020-01".into(),
        current: true,
        bullets: vec!["Cut invoice latency in half".into()],
        ..Default::default()
    });
    resume.experience.push(Experience {
        position: "Intern".into(),
        company: "Globex".into(),
        start_date: "2019-06".into(),
        end_date: "2019-09".into(),
        ..Default::default()
    });
    resume.education.push(Education {
        institution: "State University".into(),
        degree: "B.S.".into(),
        field: Some("Mathematics".into()),
        ..Default::default()
    });
    resume.skills.push(Skill::named("Rust"));
    resume.projects.push(Project {
        name: "Ledger".into(),
        description: "Double-entry bookkeeping library.".into(),
        ..Default::default()
    });
    resume.certifications.push(Certification {
        name: "Cloud Architect".into(),
        issuer: "Example Institute".into(),
        ..Default::default()
    });
    resume.languages.push(Language {
        name: "German".into(),
        proficiency: "Fluent".into(),
        ..Default::default()
    });
    resume.links.push(Link {
        label: "Blog".into(),
        url: "https://jane.example.com".into(),
        ..Default::default()
    });
    resume
}

fn preview_headings(html: &str) -> Vec<String> {
    html.split("<h2 class=\"section-title")
        .skip(1)
        .filter_map(|chunk| {
            let start = chunk.find('>')? + 1;
            let end = chunk.find("</h2>")?;
            Some(chunk[start..end].to_string())
        })
        .collect()
}

fn docx_headings(bytes: &[u8]) -> Vec<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();

    xml.split("<w:pStyle w:val=\"Heading1\"/>")
        .skip(1)
        .filter_map(|chunk| {
            let start = chunk.find("<w:t xml:space=\"preserve\">")? + 26;
            let end = chunk.find("</w:t>")?;
            Some(chunk[start..end].to_string())
        })
        .collect()
}

/// Assert that `needles` occur in `haystack` in order.
fn assert_in_order(haystack: &str, needles: &[String], context: &str) {
    let mut from = 0;
    for needle in needles {
        match haystack[from..].find(needle.as_str()) {
            Some(pos) => from += pos + needle.len(),
            None => panic!("{}: '{}' missing or out of order in:\n{}", context, needle, haystack),
        }
    }
}

#[test]
fn test_heading_parity_across_templates() {
    let resume = sample_resume();
    let options = RenderOptions::default();

    for template in templates() {
        let plan = plan_resume(&resume, template);
        let expected: Vec<String> = plan.section_titles().iter().map(|s| s.to_string()).collect();
        assert_eq!(expected.len(), 8, "template {}", template.id);

        let html = to_html(&plan, &options);
        assert_eq!(preview_headings(&html), expected, "preview, template {}", template.id);

        let docx = to_docx(&plan, &options).unwrap();
        assert_eq!(docx_headings(&docx), expected, "docx, template {}", template.id);

        let pdf = to_pdf(&plan, &options).unwrap();
        let text = extract_pdf_text(&pdf).unwrap();
        assert_in_order(&text, &expected, template.id);
    }
}

#[test]
fn test_empty_skills_have_no_heading() {
    let mut resume = sample_resume();
    resume.skills.clear();

    for template in templates() {
        let resume = resume.clone().with_template(template.id);
        let skills = template.heading_case.apply("Skills");

        let headings = preview_headings(&render_preview(&resume, "preview"));
        assert!(!headings.contains(&skills), "preview, template {}", template.id);

        let headings = docx_headings(&render_docx(&resume).unwrap());
        assert!(!headings.contains(&skills), "docx, template {}", template.id);

        let text = extract_pdf_text(&render_pdf(&resume).unwrap()).unwrap();
        assert!(!text.lines().any(|l| l == skills), "pdf, template {}", template.id);
    }
}

#[test]
fn test_unknown_template_uses_classic() {
    let resume = sample_resume().with_template("does-not-exist");
    let html = render_preview(&resume, "preview");
    assert!(html.contains("vitae--classic"));

    let classic = render_preview(&sample_resume().with_template("classic"), "preview");
    assert_eq!(html, classic);
}

#[test]
fn test_header_only_resume() {
    let resume = ResumeDocument::with_name("Solo Person");

    let html = render_preview(&resume, "preview");
    assert!(html.contains("Solo Person"));
    assert!(!html.contains("<section"));

    let pdf = render_pdf(&resume).unwrap();
    assert!(pdf.starts_with(b"%PDF-"));
    let doc = lopdf::Document::load_mem(&pdf).unwrap();
    assert_eq!(doc.get_pages().len(), 1);

    let docx = render_docx(&resume).unwrap();
    assert!(docx_headings(&docx).is_empty());
}

#[test]
fn test_last_entry_has_no_divider() {
    let resume = sample_resume();
    for template in templates() {
        let plan = plan_resume(&resume, template);
        let blocks: Vec<&Block> = plan.blocks().collect();
        for (i, block) in blocks.iter().enumerate() {
            if matches!(block, Block::Divider) {
                assert!(
                    matches!(blocks.get(i + 1), Some(Block::Entry(_))),
                    "divider not followed by an entry in template {}",
                    template.id
                );
            }
        }

        let html = to_html(&plan, &RenderOptions::default());
        assert!(!html.contains("role=\"separator\"></div></section>"));
        assert!(!html.contains("role=\"separator\"></div></div></section>"));
    }
}

#[test]
fn test_reading_order_matches_across_backends() {
    let plan = plan_resume(&sample_resume(), vitae::resolve_template("creative"));
    let text = extract_pdf_text(&to_pdf(&plan, &RenderOptions::default()).unwrap()).unwrap();

    // Sidebar layouts read the aside (identity, skills) before the main column.
    let name = text.find("Jane Doe").unwrap();
    let skills = text.find("Skills").unwrap();
    let experience = text.find("Experience").unwrap();
    assert!(name < skills);
    assert!(skills < experience);
}

#[test]
fn test_non_latin_name_survives_every_backend() {
    let name = "\u{418}\u{432}\u{430}\u{43d} \u{41f}\u{435}\u{442}\u{440}\u{43e}\u{432} \u{674e}\u{96f7}";
    let resume = ResumeDocument::with_name(name);

    assert!(render_preview(&resume, "preview").contains(name));

    let mut xml = String::new();
    ZipArchive::new(Cursor::new(render_docx(&resume).unwrap()))
        .unwrap()
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    assert!(xml.contains(name));

    // The standard fonts draw placeholders, but the real text is attached.
    let text = extract_pdf_text(&render_pdf(&resume).unwrap()).unwrap();
    assert!(text.contains(name), "{}", text);
    assert!(!text.contains("????"));

    let strict = RenderOptions::new().with_strict_pdf_text(true);
    let err = render_pdf_with_options(&resume, &strict).unwrap_err();
    assert!(matches!(err, Error::Pdf(_)));
    assert!(err.to_string().contains('\u{674e}'));

    let latin = render_pdf_with_options(&sample_resume(), &strict);
    assert!(latin.is_ok());
}
