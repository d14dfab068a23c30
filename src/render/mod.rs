//! Rendering backends.
//!
//! Every backend consumes the same [`LayoutPlan`](crate::layout::LayoutPlan);
//! none of them decides what to show or in which order.

pub mod docx;
mod json;
mod options;
pub mod pdf;
pub mod preview;
mod text;

pub use docx::to_docx;
pub use json::{to_json, JsonFormat};
pub use options::{PageSize, RenderOptions, DEFAULT_CONTAINER_ID};
pub use pdf::to_pdf;
pub use preview::to_html;
pub use text::to_text;

/// Check whether a URL may become a clickable link in output.
///
/// Only web, mail and phone links qualify; anything else is shown as text.
pub(crate) fn is_safe_link(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    ["https://", "http://", "mailto:", "tel:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_safe_link() {
        assert!(is_safe_link("https://x.dev"));
        assert!(is_safe_link("MAILTO:jane@x.dev"));
        assert!(!is_safe_link("javascript:alert(1)"));
        assert!(!is_safe_link(""));
    }
}
