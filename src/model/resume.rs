//! Resume document types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lenient::{null_as_default, timestamp};

/// A complete resume, as handed over by the editor store.
///
/// Every field defaults when absent so partially-filled documents still
/// deserialize. List order is significant and preserved by every renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDocument {
    /// Store-assigned identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Document label shown in the dashboard (not rendered)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Contact details and summary
    #[serde(deserialize_with = "null_as_default")]
    pub personal_info: PersonalInfo,

    /// Work history
    #[serde(deserialize_with = "null_as_default")]
    pub experience: Vec<Experience>,

    /// Schools and degrees
    #[serde(deserialize_with = "null_as_default")]
    pub education: Vec<Education>,

    /// Skills, optionally grouped by category
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<Skill>,

    /// Side and open-source projects
    #[serde(deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,

    /// Certifications and licenses
    #[serde(deserialize_with = "null_as_default")]
    pub certifications: Vec<Certification>,

    /// Spoken languages
    #[serde(deserialize_with = "null_as_default")]
    pub languages: Vec<Language>,

    /// Additional links (portfolio, blog, ...)
    #[serde(deserialize_with = "null_as_default")]
    pub links: Vec<Link>,

    /// User-defined sections
    #[serde(deserialize_with = "null_as_default")]
    pub custom_sections: Vec<CustomSection>,

    /// Template registry key
    #[serde(deserialize_with = "null_as_default")]
    pub template: String,

    /// Last edit time, maintained by the store. Epoch milliseconds are
    /// accepted on input.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "timestamp"
    )]
    pub last_modified: Option<DateTime<Utc>>,
}

impl ResumeDocument {
    /// Create an empty resume using the default template.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resume for the given person.
    pub fn with_name(full_name: impl Into<String>) -> Self {
        let mut resume = Self::new();
        resume.personal_info.full_name = full_name.into();
        resume
    }

    /// Set the template key.
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// The person's name, if one was entered.
    pub fn full_name(&self) -> Option<&str> {
        let name = self.personal_info.full_name.trim();
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    /// Check whether no section carries any content.
    pub fn is_empty(&self) -> bool {
        self.personal_info.summary.trim().is_empty()
            && self.experience.is_empty()
            && self.education.is_empty()
            && self.skills.is_empty()
            && self.projects.is_empty()
            && self.certifications.is_empty()
            && self.languages.is_empty()
            && self.links.is_empty()
            && self.custom_sections.is_empty()
    }

    /// Equality that ignores the store-maintained timestamp.
    pub fn same_content(&self, other: &ResumeDocument) -> bool {
        let mut left = self.clone();
        let mut right = other.clone();
        left.last_modified = None;
        right.last_modified = None;
        left == right
    }
}

/// Identity and contact information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    /// LinkedIn username or profile URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    /// GitHub username or profile URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// A position held at a company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub position: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub end_date: String,
    /// Still employed here; the end date is ignored
    #[serde(deserialize_with = "null_as_default")]
    pub current: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub bullets: Vec<String>,
}

/// A degree or course of study.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub institution: String,
    #[serde(deserialize_with = "null_as_default")]
    pub degree: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub end_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A single skill.
///
/// Older exports store skills as bare strings; those are accepted and given
/// an id derived from the name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "SkillRepr")]
pub struct Skill {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Skill {
    /// Create a skill with an id derived from its name.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: skill_id(&name),
            name,
            level: None,
            category: None,
        }
    }

    /// Put the skill in a category.
    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SkillRepr {
    Name(String),
    #[serde(rename_all = "camelCase")]
    Full {
        #[serde(default, deserialize_with = "null_as_default")]
        id: String,
        #[serde(default, deserialize_with = "null_as_default")]
        name: String,
        #[serde(default)]
        level: Option<String>,
        #[serde(default)]
        category: Option<String>,
    },
}

impl From<SkillRepr> for Skill {
    fn from(repr: SkillRepr) -> Self {
        match repr {
            SkillRepr::Name(name) => Skill::named(name),
            SkillRepr::Full {
                id,
                name,
                level,
                category,
            } => Skill {
                id,
                name,
                level,
                category,
            },
        }
    }
}

fn skill_id(name: &str) -> String {
    let slug: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();
    format!("skill-{}", slug.trim_matches('-'))
}

/// A project entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub end_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub technologies: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub bullets: Vec<String>,
}

/// A certification or license.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Certification {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub issuer: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_id: Option<String>,
}

/// A spoken language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Language {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub proficiency: String,
}

/// A labelled link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Link {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub label: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

/// A user-defined section (volunteering, awards, publications, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomSection {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<CustomItem>,
}

/// An entry inside a custom section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomItem {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub subtitle: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub bullets: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_new_is_empty() {
        let resume = ResumeDocument::new();
        assert!(resume.is_empty());
        assert!(resume.full_name().is_none());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "personalInfo": {"fullName": "Jane Doe", "email": "jane@example.com"},
            "experience": [{"id": "e1", "position": "Engineer", "startDate": "2020-01", "current": true}],
            "template": "modern"
        }"#;
        let resume: ResumeDocument = serde_json::from_str(json).unwrap();
        assert_eq!(resume.full_name(), Some("Jane Doe"));
        assert_eq!(resume.experience[0].start_date, "2020-01");
        assert!(resume.experience[0].current);
        assert!(resume.experience[0].bullets.is_empty());
        assert_eq!(resume.template, "modern");
    }

    #[test]
    fn test_deserialize_nulls_and_epoch_timestamp() {
        let json = r#"{
            "personalInfo": {"fullName": "Jane Doe", "summary": null, "title": null},
            "experience": [{"position": "Engineer", "bullets": null, "current": null}],
            "skills": null,
            "lastModified": 1700000000000
        }"#;
        let resume: ResumeDocument = serde_json::from_str(json).unwrap();
        assert_eq!(resume.personal_info.summary, "");
        assert!(resume.personal_info.title.is_none());
        assert!(resume.experience[0].bullets.is_empty());
        assert!(!resume.experience[0].current);
        assert!(resume.skills.is_empty());
        assert_eq!(
            resume.last_modified.map(|t| t.timestamp_millis()),
            Some(1_700_000_000_000)
        );
    }

    #[test]
    fn test_skill_from_bare_string() {
        let json = r#"{"skills": ["Rust", {"id": "s2", "name": "Go", "category": "Languages"}]}"#;
        let resume: ResumeDocument = serde_json::from_str(json).unwrap();
        assert_eq!(resume.skills[0].name, "Rust");
        assert_eq!(resume.skills[0].id, "skill-rust");
        assert_eq!(resume.skills[1].id, "s2");
        assert_eq!(resume.skills[1].category.as_deref(), Some("Languages"));
    }

    #[test]
    fn test_skill_id_slug() {
        assert_eq!(skill_id("  C++ / Qt "), "skill-c-----qt");
        assert_eq!(Skill::named("Node.js").id, "skill-node-js");
    }

    #[test]
    fn test_same_content_ignores_timestamp() {
        let a = ResumeDocument::with_name("A");
        let mut b = a.clone();
        b.last_modified = Some(Utc::now());
        assert!(a.same_content(&b));
        assert_ne!(a, b);
    }
}
