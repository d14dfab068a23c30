//! Document model types for resumes and cover letters.
//!
//! These are the plain-data shapes the editor store hands to the engine.
//! Renderers only ever borrow them; nothing in this crate mutates a document
//! it was asked to render.

mod cover_letter;
mod lenient;
mod resume;

pub use cover_letter::{BodyParagraph, CoverLetterDocument};
pub use resume::{
    Certification, CustomItem, CustomSection, Education, Experience, Language, Link,
    PersonalInfo, Project, ResumeDocument, Skill,
};
