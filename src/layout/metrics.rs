//! Static glyph-width tables for the standard PDF fonts, and a greedy word
//! wrapper.
//!
//! Widths are in 1/1000 em and come from the Adobe Core 14 AFM files. Tables
//! cover printable ASCII (0x20..=0x7E); index = `(c as usize) - 32`. The few
//! non-ASCII glyphs the layout emits (bullets, dashes) have explicit widths;
//! anything else falls back to an average width.

use crate::template::FontFamily;

/// Weight / slant of a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

/// Width table for one font face.
#[derive(Debug)]
pub struct FontMetrics {
    widths: [u16; 95],
    bullet: u16,
    en_dash: u16,
    em_dash: u16,
    fallback: u16,
}

impl FontMetrics {
    /// Width of one character in 1/1000 em.
    pub fn char_width(&self, c: char) -> u16 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            return self.widths[code - 32];
        }
        match c {
            '\u{2022}' => self.bullet,
            '\u{2013}' => self.en_dash,
            '\u{2014}' => self.em_dash,
            '\u{203A}' | '\u{2039}' => 333,
            '\u{a0}' => self.widths[0],
            _ => self.fallback,
        }
    }

    /// Width of `text` in points at `size`.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| self.char_width(c) as u32).sum();
        units as f32 * size / 1000.0
    }

    /// Break `text` into lines no wider than `max_width` points.
    ///
    /// Greedy: each line takes as many words as fit. A single word wider than
    /// the line is split between characters. Empty input yields no lines.
    pub fn wrap(&self, text: &str, size: f32, max_width: f32) -> Vec<String> {
        self.wrap_first(text, size, max_width, max_width)
    }

    /// Like [`wrap`](Self::wrap), with a narrower first line (for text that
    /// follows a label or marker on the same line).
    pub fn wrap_first(
        &self,
        text: &str,
        size: f32,
        first_width: f32,
        max_width: f32,
    ) -> Vec<String> {
        let space = self.text_width(" ", size);
        let limit = |lines: &Vec<String>| {
            if lines.is_empty() {
                first_width
            } else {
                max_width
            }
        };
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in text.split_whitespace() {
            let word_width = self.text_width(word, size);

            if word_width > max_width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let mut pieces = self.split_word(word, size, limit(&lines));
                // The trailing piece may still share a line with the next word.
                let last = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
                current_width = self.text_width(&last, size);
                current = last;
                continue;
            }

            if current.is_empty() {
                if lines.is_empty() && word_width > first_width {
                    lines.push(String::new());
                }
                current.push_str(word);
                current_width = word_width;
            } else if current_width + space + word_width <= limit(&lines) {
                current.push(' ');
                current.push_str(word);
                current_width += space + word_width;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
                current_width = word_width;
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    fn split_word(&self, word: &str, size: f32, max_width: f32) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut piece = String::new();
        let mut width = 0.0_f32;
        for c in word.chars() {
            let w = self.char_width(c) as f32 * size / 1000.0;
            if !piece.is_empty() && width + w > max_width {
                pieces.push(std::mem::take(&mut piece));
                width = 0.0;
            }
            piece.push(c);
            width += w;
        }
        if !piece.is_empty() {
            pieces.push(piece);
        }
        pieces
    }
}

/// Look up the metrics for a family and style.
///
/// Oblique and italic faces reuse the upright table; the difference is well
/// under the wrap tolerance for the short lines they are used for.
pub fn metrics(family: FontFamily, style: FontStyle) -> &'static FontMetrics {
    match (family, style) {
        (FontFamily::Sans, FontStyle::Bold) => &HELVETICA_BOLD,
        (FontFamily::Sans, _) => &HELVETICA,
        (FontFamily::Serif, FontStyle::Bold) => &TIMES_BOLD,
        (FontFamily::Serif, _) => &TIMES_ROMAN,
    }
}

static HELVETICA: FontMetrics = FontMetrics {
    #[rustfmt::skip]
    widths: [
        // sp  !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0-9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :   ;    <    =    >    ?    @
        278, 278, 584, 584, 584, 556, 1015,
        // A-M
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        // N-Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [   \    ]    ^    _    `
        278, 278, 278, 469, 556, 333,
        // a-m
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        // n-z
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        // {   |    }    ~
        334, 260, 334, 584,
    ],
    bullet: 350,
    en_dash: 556,
    em_dash: 1000,
    fallback: 556,
};

static HELVETICA_BOLD: FontMetrics = FontMetrics {
    #[rustfmt::skip]
    widths: [
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        333, 333, 584, 584, 584, 611, 975,
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        333, 278, 333, 584, 556, 333,
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        389, 280, 389, 584,
    ],
    bullet: 350,
    en_dash: 556,
    em_dash: 1000,
    fallback: 611,
};

static TIMES_ROMAN: FontMetrics = FontMetrics {
    #[rustfmt::skip]
    widths: [
        250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
        278, 278, 564, 564, 564, 444, 921,
        722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889,
        722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611,
        333, 278, 333, 469, 500, 333,
        444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778,
        500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444,
        480, 200, 480, 541,
    ],
    bullet: 350,
    en_dash: 500,
    em_dash: 1000,
    fallback: 500,
};

static TIMES_BOLD: FontMetrics = FontMetrics {
    #[rustfmt::skip]
    widths: [
        250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
        333, 333, 570, 570, 570, 500, 930,
        722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944,
        722, 778, 611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667,
        333, 278, 333, 581, 500, 333,
        500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833,
        556, 500, 556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444,
        394, 220, 394, 520,
    ],
    bullet: 350,
    en_dash: 500,
    em_dash: 1000,
    fallback: 556,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width() {
        let helv = metrics(FontFamily::Sans, FontStyle::Regular);
        // "Hi" = 722 + 222
        assert!((helv.text_width("Hi", 10.0) - 9.44).abs() < 0.001);
        assert_eq!(helv.text_width("", 10.0), 0.0);
    }

    #[test]
    fn test_bold_is_wider() {
        let regular = metrics(FontFamily::Serif, FontStyle::Regular);
        let bold = metrics(FontFamily::Serif, FontStyle::Bold);
        let text = "Senior Software Engineer";
        assert!(bold.text_width(text, 10.0) > regular.text_width(text, 10.0));
    }

    #[test]
    fn test_wrap_respects_width() {
        let helv = metrics(FontFamily::Sans, FontStyle::Regular);
        let text = "Designed and shipped a distributed ingestion pipeline that \
                    processes several billion events per day across three regions";
        let lines = helv.wrap(text, 10.0, 200.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(helv.text_width(line, 10.0) <= 200.0);
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_splits_long_word() {
        let helv = metrics(FontFamily::Sans, FontStyle::Regular);
        let word = "x".repeat(100);
        let lines = helv.wrap(&word, 10.0, 50.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_wrap_first_moves_wide_word_below_label() {
        let helv = metrics(FontFamily::Sans, FontStyle::Regular);
        let lines = helv.wrap_first("Kubernetes Terraform", 10.0, 20.0, 200.0);
        assert_eq!(lines, vec!["".to_string(), "Kubernetes Terraform".to_string()]);

        let lines = helv.wrap_first("Go Rust", 10.0, 20.0, 200.0);
        assert_eq!(lines[0], "Go");
        for line in &lines {
            assert!(helv.text_width(line, 10.0) <= 200.0);
        }
    }

    #[test]
    fn test_wrap_empty() {
        let times = metrics(FontFamily::Serif, FontStyle::Regular);
        assert!(times.wrap("   ", 10.0, 100.0).is_empty());
    }

    #[test]
    fn test_non_ascii_widths() {
        let helv = metrics(FontFamily::Sans, FontStyle::Regular);
        assert_eq!(helv.char_width('\u{2022}'), 350);
        assert_eq!(helv.char_width('\u{e9}'), 556);
    }
}
