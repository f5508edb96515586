//! Heuristic outline analysis.
//!
//! The pipeline runs in one forward pass:
//!
//! 1. [`normalize_pages`] groups runs into lines
//! 2. [`FontProfile`] finds the body font size
//! 3. [`classify_form`] may short-circuit with an empty outline
//! 4. [`extract_title`] picks the title from the top of page 0
//! 5. [`detect_candidates`] applies the heading rule chain
//! 6. [`classify_levels`] maps candidates to H1..H4
//! 7. [`assemble`] drops empties and duplicates
//!
//! Every stage is a plain function over immutable inputs, so each can be
//! tested on its own.

mod assemble;
mod fonts;
mod form;
mod heading;
mod level;
mod normalize;
mod options;
mod title;

pub use assemble::{assemble, finalize};
pub use fonts::{FontProfile, DEFAULT_BODY_SIZE};
pub use form::{classify_form, field_signal, is_field_line, FieldSignal, FormVerdict};
pub use heading::{
    classify_line, detect_candidates, numbering_depth, HeadingCandidate, HeadingRule,
    MAX_NUMBERING_DEPTH, SECTION_KEYWORDS,
};
pub use level::{apply_overrides, base_level, classify_levels, ClassifiedCandidate};
pub use normalize::{normalize_page, normalize_pages, normalize_text};
pub use options::OutlineOptions;
pub use title::{extract_title, TitleSelection};

use crate::model::{Document, HeadingLevel, PageRuns, TextLine};

/// Build the outline of a document from its page runs.
pub fn outline_from_runs(pages: &[PageRuns], options: &OutlineOptions) -> Document {
    let lines = normalize_pages(pages, options);
    outline_from_lines(&lines, options)
}

/// Build the outline of a document from already grouped lines.
///
/// `lines` must be in page and reading order.
pub fn outline_from_lines(lines: &[TextLine], options: &OutlineOptions) -> Document {
    let profile = FontProfile::from_lines(lines);
    let verdict = classify_form(lines, options);
    let title = extract_title(lines, &profile, options);

    if verdict.is_form {
        log::debug!("form document, outline suppressed");
        return Document::with_title(title.text);
    }

    let candidates = detect_candidates(lines, &title.lines, &profile, options);
    let classified = classify_levels(candidates, options);
    let outline = assemble(&classified, options);

    log::debug!(
        "{} lines, {} candidates, {} outline entries",
        lines.len(),
        classified.len(),
        outline.len()
    );

    Document {
        title: title.text,
        outline,
    }
}

/// How one line fared in the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct LineReport {
    pub line: TextLine,
    /// Part of the selected title
    pub is_title: bool,
    /// Matching heading rule, if any
    pub rule: Option<HeadingRule>,
    /// Assigned level, if the line became a candidate
    pub level: Option<HeadingLevel>,
}

/// Stage-by-stage view of one document, for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnosis {
    pub profile: FontProfile,
    pub form: FormVerdict,
    pub title: TitleSelection,
    pub lines: Vec<LineReport>,
}

/// Run the pipeline on page runs and report the decision for every line.
///
/// Rules are evaluated even for form documents so the report shows what
/// the classifier suppressed.
pub fn diagnose(pages: &[PageRuns], options: &OutlineOptions) -> Diagnosis {
    let lines = normalize_pages(pages, options);
    let profile = FontProfile::from_lines(&lines);
    let form = classify_form(&lines, options);
    let title = extract_title(&lines, &profile, options);

    let reports = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let is_title = title.lines.contains(&i);
            let rule = if is_title {
                None
            } else {
                classify_line(line, &profile, options)
            };
            let level = rule.map(|r| apply_overrides(&line.text, base_level(r, options)));
            LineReport {
                line: line.clone(),
                is_title,
                rule,
                level,
            }
        })
        .collect();

    Diagnosis {
        profile,
        form,
        title,
        lines: reports,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, TextRun};

    fn run(text: &str, y: f32, size: f32, bold: bool) -> TextRun {
        let width = text.chars().count() as f32 * size * 0.5;
        TextRun::new(text, size, bold, BoundingBox::new(72.0, y, 72.0 + width, y + size))
    }

    #[test]
    fn test_title_lines_never_become_headings() {
        let pages = vec![PageRuns::new(0, 612.0, 792.0)
            .with_run(run("Introduction", 60.0, 24.0, true))
            .with_run(run(
                "Body text that runs long enough to set the body size for the page",
                200.0,
                10.0,
                false,
            ))];

        let doc = outline_from_runs(&pages, &OutlineOptions::default());
        assert_eq!(doc.title, "Introduction");
        assert!(doc.outline.is_empty());
    }

    #[test]
    fn test_diagnosis_marks_title_and_rules() {
        let pages = vec![PageRuns::new(0, 612.0, 792.0)
            .with_run(run("Quarterly Review", 60.0, 22.0, true))
            .with_run(run("1. Summary of results", 200.0, 12.0, false))
            .with_run(run(
                "A paragraph of ordinary text with enough words to be body copy",
                230.0,
                12.0,
                false,
            ))];

        let diagnosis = diagnose(&pages, &OutlineOptions::default());
        assert!(diagnosis.lines[0].is_title);
        assert_eq!(diagnosis.lines[0].rule, None);
        assert_eq!(
            diagnosis.lines[1].rule,
            Some(HeadingRule::Numbering { depth: 1 })
        );
        assert_eq!(diagnosis.lines[1].level, Some(HeadingLevel::H1));
        assert_eq!(diagnosis.lines[2].level, None);
    }

    #[test]
    fn test_empty_input_gives_empty_document() {
        let doc = outline_from_runs(&[], &OutlineOptions::default());
        assert_eq!(doc, Document::default());
    }
}
