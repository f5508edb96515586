//! Form document classification.
//!
//! A fill-in form is full of short labels, isolated numbers and blanks, and
//! has no numbered sections. Its large bold text is field labels rather
//! than section titles, so its outline is suppressed.

use regex::Regex;

use super::heading::numbering_depth;
use super::options::OutlineOptions;
use crate::model::{normalize_key, TextLine};

/// Lines scanned for form vocabulary.
const KEYWORD_WINDOW: usize = 20;

/// Why a single line looks like part of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSignal {
    /// Short label ending with a colon
    Label,
    /// Isolated number such as a field index
    Numeric,
    /// Blank to be filled in (`____`, `.....`)
    FillIn,
    /// One to four words with no terminator
    Short,
}

impl FieldSignal {
    /// Labels, numbers and blanks are fields in their own right; short
    /// lines only count towards the document-level signature.
    pub fn is_field(self) -> bool {
        !matches!(self, FieldSignal::Short)
    }
}

/// Outcome of form classification, kept for logging and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormVerdict {
    pub is_form: bool,
    /// Share of lines carrying any signal
    pub signature_ratio: f32,
    /// Share of lines carrying a field signal
    pub field_ratio: f32,
    /// Whether any line carries section numbering
    pub has_numbering: bool,
    /// Whether any line is a label, number or blank
    pub has_fields: bool,
    /// Distinct form keywords near the top of the document
    pub keyword_hits: usize,
}

/// Classify a single line.
pub fn field_signal(line: &TextLine, options: &OutlineOptions) -> Option<FieldSignal> {
    let text = line.text.trim();
    if text.is_empty() {
        return None;
    }

    if is_fill_in(text) {
        return Some(FieldSignal::FillIn);
    }
    if is_isolated_number(text) {
        return Some(FieldSignal::Numeric);
    }
    let words = line.word_count();
    if text.ends_with(':') && words <= options.colon_max_words {
        return Some(FieldSignal::Label);
    }
    if (1..=4).contains(&words) {
        return Some(FieldSignal::Short);
    }
    None
}

/// Whether a line looks like a form field (label, number or blank).
pub fn is_field_line(line: &TextLine, options: &OutlineOptions) -> bool {
    field_signal(line, options).is_some_and(FieldSignal::is_field)
}

/// Scan the whole document for the form signature.
pub fn classify_form(lines: &[TextLine], options: &OutlineOptions) -> FormVerdict {
    let keyword_hits = count_form_keywords(lines, options);
    let has_numbering = lines.iter().any(|l| numbering_depth(&l.text).is_some());

    let total = lines.len();
    let (mut signature, mut fields) = (0usize, 0usize);
    for signal in lines.iter().filter_map(|l| field_signal(l, options)) {
        signature += 1;
        if signal.is_field() {
            fields += 1;
        }
    }

    let ratio = |count: usize| {
        if total == 0 {
            0.0
        } else {
            count as f32 / total as f32
        }
    };
    let signature_ratio = ratio(signature);
    let field_ratio = ratio(fields);

    let by_layout = total >= options.form_min_lines
        && !has_numbering
        && signature_ratio >= options.form_signature_ratio
        && field_ratio >= options.form_field_ratio;
    // Numbered sections outweigh vocabulary unless the document also has
    // at least one actual field.
    let has_fields = fields > 0;
    let by_vocabulary = options.form_keyword_min_hits > 0
        && keyword_hits >= options.form_keyword_min_hits
        && (!has_numbering || has_fields);

    let verdict = FormVerdict {
        is_form: by_layout || by_vocabulary,
        signature_ratio,
        field_ratio,
        has_numbering,
        has_fields,
        keyword_hits,
    };
    log::debug!("form check: {:?}", verdict);
    verdict
}

/// Distinct configured form keywords present in the first lines, matched
/// as whole words.
fn count_form_keywords(lines: &[TextLine], options: &OutlineOptions) -> usize {
    let head = lines
        .iter()
        .take(KEYWORD_WINDOW)
        .map(|l| l.normalized_text())
        .collect::<Vec<_>>()
        .join(" ");

    options
        .form_keywords
        .iter()
        .filter(|k| contains_phrase(&head, k))
        .count()
}

/// Whether `phrase` occurs in `haystack` on word boundaries.
fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    let key = normalize_key(phrase);
    if key.is_empty() {
        return false;
    }
    let pattern = format!(r"\b{}\b", regex::escape(&key));
    match Regex::new(&pattern) {
        Ok(re) => re.is_match(haystack),
        Err(e) => {
            log::warn!("ignoring form keyword {:?}: {}", phrase, e);
            false
        }
    }
}

fn is_fill_in(text: &str) -> bool {
    text.contains("___") || text.contains("....") || text.contains("…")
}

fn is_isolated_number(text: &str) -> bool {
    let trimmed = text.trim_end_matches(['.', ')', ':']);
    !trimmed.is_empty()
        && trimmed.len() <= 6
        && trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '(' | '-' | '/'))
        && trimmed.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(texts: &[&str]) -> Vec<TextLine> {
        texts
            .iter()
            .map(|t| TextLine::new(*t, 0, 12.0, false))
            .collect()
    }

    #[test]
    fn test_field_signals() {
        let options = OutlineOptions::default();
        let signal = |t: &str| field_signal(&TextLine::new(t, 0, 12.0, false), &options);

        assert_eq!(signal("Name:"), Some(FieldSignal::Label));
        assert_eq!(signal("12."), Some(FieldSignal::Numeric));
        assert_eq!(signal("Signature ________"), Some(FieldSignal::FillIn));
        assert_eq!(signal("Project Overview"), Some(FieldSignal::Short));
        assert_eq!(
            signal("This sentence is long enough to be body text."),
            None
        );
    }

    #[test]
    fn test_label_heavy_document_is_form() {
        let doc = lines(&[
            "Name of the applicant:",
            "Designation:",
            "Date of joining:",
            "Home town:",
            "Whether permanent or temporary:",
            "Amount of advance required:",
            "Place of visit:",
            "Mode of travel:",
            "I declare that the particulars furnished above are true and correct.",
            "Department of administration and personnel services",
        ]);
        let verdict = classify_form(&doc, &OutlineOptions::default());
        assert!(verdict.is_form);
        assert!(!verdict.has_numbering);
        assert!((verdict.field_ratio - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_numbering_anywhere_vetoes_layout_signal() {
        let doc = lines(&[
            "Name:",
            "Designation:",
            "Date:",
            "Address:",
            "1. Background of the request",
        ]);
        let verdict = classify_form(&doc, &OutlineOptions::default());
        assert!(verdict.has_numbering);
        assert!(!verdict.is_form);
    }

    #[test]
    fn test_prose_document_is_not_form() {
        let doc = lines(&[
            "Introduction",
            "The proposal describes a digital library for the province and its partners.",
            "It covers funding, governance, and the technology platform in some detail.",
            "Each section below expands one of these themes with supporting evidence.",
            "Summary",
            "The library will be delivered in three phases over a five year period.",
        ]);
        assert!(!classify_form(&doc, &OutlineOptions::default()).is_form);
    }

    #[test]
    fn test_short_documents_are_not_forms() {
        let doc = lines(&["Name:", "Date:"]);
        assert!(!classify_form(&doc, &OutlineOptions::default()).is_form);
    }

    #[test]
    fn test_form_vocabulary() {
        let doc = lines(&[
            "Application form for grant of LTC advance",
            "Please complete every section of this form in block capitals, thank you.",
        ]);
        let verdict = classify_form(&doc, &OutlineOptions::default());
        assert_eq!(verdict.keyword_hits, 3);
        assert!(verdict.is_form);
    }

    #[test]
    fn test_form_keywords_match_whole_words() {
        assert!(contains_phrase("application form for grant of", "grant"));
        assert!(contains_phrase("ltc advance required", "LTC  Advance"));
        assert!(!contains_phrase("immigrant services annual report", "grant"));
        assert!(!contains_phrase("all signatures were collected", "signature"));
        assert!(!contains_phrase("anything", "  "));
    }

    #[test]
    fn test_report_with_form_like_words_keeps_outline() {
        let doc = lines(&[
            "Immigrant Services Annual Report",
            "1. Introduction",
            "The office supported newly arrived families throughout the year.",
            "2. Results",
            "More than four hundred signatures were collected for the petition.",
            "3. Next steps",
        ]);
        let verdict = classify_form(&doc, &OutlineOptions::default());
        assert_eq!(verdict.keyword_hits, 0);
        assert!(!verdict.is_form);
    }

    #[test]
    fn test_numbering_vetoes_vocabulary_without_fields() {
        let doc = lines(&[
            "Grant programme guidance for the application form process",
            "1. Eligibility of the organisations applying this year",
            "2. Assessment of the proposals received by the panel",
        ]);
        let verdict = classify_form(&doc, &OutlineOptions::default());
        assert_eq!(verdict.keyword_hits, 2);
        assert!(verdict.has_numbering);
        assert!(!verdict.has_fields);
        assert!(!verdict.is_form);

        let mut with_field = doc.clone();
        with_field.push(TextLine::new("Signature ________", 0, 12.0, false));
        assert!(classify_form(&with_field, &OutlineOptions::default()).is_form);
    }
}
