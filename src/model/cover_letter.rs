//! Cover letter document types.

use serde::{Deserialize, Serialize};

use super::lenient::null_as_default;

/// A cover letter.
///
/// Lives independently of any resume; `associated_resume_id` is a plain
/// foreign key that callers may use to look up sender details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoverLetterDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub recipient_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_title: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_address: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub salutation: String,
    #[serde(deserialize_with = "null_as_default")]
    pub body_paragraphs: Vec<BodyParagraph>,
    #[serde(deserialize_with = "null_as_default")]
    pub closing: String,
    #[serde(deserialize_with = "null_as_default")]
    pub signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub associated_resume_id: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub template_id: String,
}

impl CoverLetterDocument {
    /// Create an empty cover letter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a letter addressed to a company.
    pub fn to_company(company: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            ..Self::default()
        }
    }

    /// Append a body paragraph.
    pub fn add_paragraph(&mut self, text: impl Into<String>) {
        self.body_paragraphs.push(BodyParagraph { text: text.into() });
    }

    /// The company name, if one was entered.
    pub fn company_name(&self) -> Option<&str> {
        let company = self.company.trim();
        if company.is_empty() {
            None
        } else {
            Some(company)
        }
    }
}

/// One paragraph of letter body text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyParagraph {
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_letter() {
        let json = r#"{
            "recipientName": "Ada Lovelace",
            "company": "Analytical Engines",
            "bodyParagraphs": [{"text": "First."}, {"text": "Second."}],
            "associatedResumeId": "r-1",
            "templateId": "classic"
        }"#;
        let letter: CoverLetterDocument = serde_json::from_str(json).unwrap();
        assert_eq!(letter.body_paragraphs.len(), 2);
        assert_eq!(letter.associated_resume_id.as_deref(), Some("r-1"));
        assert_eq!(letter.company_name(), Some("Analytical Engines"));
    }

    #[test]
    fn test_deserialize_null_fields() {
        let json = r#"{"company": null, "bodyParagraphs": [{"text": null}], "closing": null}"#;
        let letter: CoverLetterDocument = serde_json::from_str(json).unwrap();
        assert!(letter.company_name().is_none());
        assert_eq!(letter.body_paragraphs[0].text, "");
        assert_eq!(letter.closing, "");
    }

    #[test]
    fn test_company_name_blank() {
        let letter = CoverLetterDocument::to_company("   ");
        assert!(letter.company_name().is_none());
    }
}
