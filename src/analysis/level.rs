//! Heading level assignment.

use super::heading::{HeadingCandidate, HeadingRule};
use super::options::OutlineOptions;
use crate::model::HeadingLevel;

/// Prefix that pushes a heading one level below anything else.
const SUB_ITEM_PREFIX: &str = "for each";

/// A candidate with its assigned level.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedCandidate<'a> {
    pub candidate: HeadingCandidate<'a>,
    pub level: HeadingLevel,
}

impl ClassifiedCandidate<'_> {
    /// Text of the originating line.
    pub fn text(&self) -> &str {
        &self.candidate.line.text
    }

    /// Zero-based page of the originating line.
    pub fn page_index(&self) -> u32 {
        self.candidate.line.page_index
    }
}

/// Base level for a rule, before overrides.
pub fn base_level(rule: HeadingRule, options: &OutlineOptions) -> HeadingLevel {
    match rule {
        HeadingRule::Numbering { depth } => HeadingLevel::from_depth(depth),
        HeadingRule::Keyword | HeadingRule::AllCaps => HeadingLevel::H1,
        HeadingRule::Appendix | HeadingRule::Phase => HeadingLevel::H2,
        HeadingRule::Colon => HeadingLevel::H3,
        HeadingRule::FontOnly { ratio } if ratio >= options.font_h2_ratio => HeadingLevel::H2,
        HeadingRule::FontOnly { .. } => HeadingLevel::H3,
    }
}

/// Level refinements that depend on the heading text rather than its rule.
pub fn apply_overrides(text: &str, level: HeadingLevel) -> HeadingLevel {
    if starts_with_ignore_case(text.trim_start(), SUB_ITEM_PREFIX) {
        HeadingLevel::H4
    } else {
        level
    }
}

/// Assign levels to every candidate.
pub fn classify_levels<'a>(
    candidates: Vec<HeadingCandidate<'a>>,
    options: &OutlineOptions,
) -> Vec<ClassifiedCandidate<'a>> {
    candidates
        .into_iter()
        .map(|candidate| {
            let level = apply_overrides(&candidate.line.text, base_level(candidate.rule, options));
            ClassifiedCandidate { candidate, level }
        })
        .collect()
}

/// Case-insensitive prefix match ending at a word boundary.
fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    let (Some(head), Some(rest)) = (text.get(..prefix.len()), text.get(prefix.len()..)) else {
        return false;
    };
    head.eq_ignore_ascii_case(prefix) && (rest.is_empty() || rest.starts_with(char::is_whitespace))
}
