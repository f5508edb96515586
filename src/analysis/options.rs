//! Tunable thresholds for the outline heuristics.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Thresholds and switches used by every stage of the outline pipeline.
///
/// All fields have defaults, so a JSON override file only needs the keys it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineOptions {
    /// Runs within `ratio × font size` of a line's vertical centre join it
    pub line_tolerance_ratio: f32,

    /// Lines whose top lies in this upper fraction of page 0 may be the title
    pub title_upper_fraction: f32,
    /// Minimum visible characters for a title line
    pub title_min_chars: usize,

    /// Lines shorter than this are never headings
    pub heading_min_chars: usize,
    /// Lines longer than this are never headings
    pub heading_max_chars: usize,
    /// Lines longer than this containing a sentence break are paragraphs
    pub paragraph_min_chars: usize,

    /// Maximum words for a keyword-prefixed heading
    pub keyword_max_words: usize,
    /// Maximum words for a colon-terminated heading
    pub colon_max_words: usize,
    /// Detect all-caps lines as top-level headings
    pub detect_all_caps: bool,

    /// Minimum `font_size / body_size` for a bold font-only heading
    pub font_min_ratio: f32,
    /// Ratio at which a font-only heading becomes H2 instead of H3
    pub font_h2_ratio: f32,
    /// Maximum words for a font-only heading
    pub font_max_words: usize,

    /// Documents shorter than this are never classified as forms
    pub form_min_lines: usize,
    /// Minimum share of form-signature lines (labels, numbers, blanks, short lines)
    pub form_signature_ratio: f32,
    /// Minimum share of field-like lines (labels, numbers, blanks)
    pub form_field_ratio: f32,
    /// Vocabulary that marks a document as a form when found near the top
    pub form_keywords: Vec<String>,
    /// Number of distinct form keywords needed in the first lines
    pub form_keyword_min_hits: usize,

    /// Added to zero-based page indices in the emitted outline
    pub first_page_number: u32,
}

impl OutlineOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load overrides from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Parse overrides from a JSON string.
    pub fn from_json(data: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(data)?;
        options.validate()?;
        Ok(options)
    }

    /// Reject threshold combinations the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.title_upper_fraction) {
            return Err(Error::Config(format!(
                "title_upper_fraction must be within 0..=1, got {}",
                self.title_upper_fraction
            )));
        }
        if self.line_tolerance_ratio <= 0.0 {
            return Err(Error::Config(
                "line_tolerance_ratio must be positive".to_string(),
            ));
        }
        if self.heading_min_chars > self.heading_max_chars {
            return Err(Error::Config(format!(
                "heading_min_chars ({}) exceeds heading_max_chars ({})",
                self.heading_min_chars, self.heading_max_chars
            )));
        }
        if self.font_min_ratio > self.font_h2_ratio {
            return Err(Error::Config(format!(
                "font_min_ratio ({}) exceeds font_h2_ratio ({})",
                self.font_min_ratio, self.font_h2_ratio
            )));
        }
        for (name, ratio) in [
            ("form_signature_ratio", self.form_signature_ratio),
            ("form_field_ratio", self.form_field_ratio),
        ] {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(Error::Config(format!(
                    "{} must be within 0..=1, got {}",
                    name, ratio
                )));
            }
        }
        Ok(())
    }

    /// Emit one-based page numbers.
    pub fn one_based_pages(mut self) -> Self {
        self.first_page_number = 1;
        self
    }

    /// Enable or disable the all-caps heading rule.
    pub fn with_all_caps(mut self, enabled: bool) -> Self {
        self.detect_all_caps = enabled;
        self
    }

    /// Set the font-only ratios.
    pub fn with_font_ratios(mut self, min_ratio: f32, h2_ratio: f32) -> Self {
        self.font_min_ratio = min_ratio;
        self.font_h2_ratio = h2_ratio;
        self
    }

    /// Set the form classifier ratios.
    pub fn with_form_ratios(mut self, signature: f32, field: f32) -> Self {
        self.form_signature_ratio = signature;
        self.form_field_ratio = field;
        self
    }
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            line_tolerance_ratio: 0.5,
            title_upper_fraction: 0.4,
            title_min_chars: 5,
            heading_min_chars: 3,
            heading_max_chars: 200,
            paragraph_min_chars: 50,
            keyword_max_words: 8,
            colon_max_words: 6,
            detect_all_caps: false,
            font_min_ratio: 1.15,
            font_h2_ratio: 1.4,
            font_max_words: 12,
            form_min_lines: 5,
            form_signature_ratio: 0.6,
            form_field_ratio: 0.3,
            form_keywords: [
                "application form",
                "grant",
                "ltc advance",
                "signature",
                "date of birth",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            form_keyword_min_hits: 2,
            first_page_number: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(OutlineOptions::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_override() {
        let options =
            OutlineOptions::from_json(r#"{"colon_max_words": 4, "first_page_number": 1}"#).unwrap();
        assert_eq!(options.colon_max_words, 4);
        assert_eq!(options.first_page_number, 1);
        assert_eq!(options.font_max_words, 12);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let err = OutlineOptions::from_json(r#"{"font_min_ratio": 2.0}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err =
            OutlineOptions::from_json(r#"{"heading_min_chars": 10, "heading_max_chars": 5}"#)
                .unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = OutlineOptions::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_builder() {
        let options = OutlineOptions::new()
            .one_based_pages()
            .with_all_caps(true)
            .with_font_ratios(1.1, 1.3);
        assert_eq!(options.first_page_number, 1);
        assert!(options.detect_all_caps);
        assert_eq!(options.font_h2_ratio, 1.3);
    }
}
