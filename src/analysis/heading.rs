//! Heading candidate detection.
//!
//! Every line is run through a fixed chain of rules. The first rule that
//! matches decides the candidate's [`HeadingRule`]; lower rules are never
//! consulted for that line.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use super::fonts::FontProfile;
use super::form::is_field_line;
use super::options::OutlineOptions;
use crate::model::TextLine;

/// Deepest numbering level that maps to its own heading level.
pub const MAX_NUMBERING_DEPTH: u8 = 3;

/// Trailing words that leave a line grammatically open.
const OPEN_ENDINGS: &[&str] = &[
    "a", "an", "and", "as", "at", "by", "for", "from", "in", "of", "on", "or", "the", "to",
    "with",
];

/// Structural phrases recognized regardless of typography.
pub const SECTION_KEYWORDS: &[&str] = &[
    "abstract",
    "acknowledgements",
    "acknowledgments",
    "appendices",
    "background",
    "bibliography",
    "conclusion",
    "conclusions",
    "executive summary",
    "glossary",
    "introduction",
    "overview",
    "pathway options",
    "preface",
    "references",
    "revision history",
    "summary",
    "table of contents",
];

/// The rule that identified a line as a heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeadingRule {
    /// Dotted numeric prefix such as `2.1`
    Numbering { depth: u8 },
    /// Known section phrase
    Keyword,
    /// `Appendix <Letter>`
    Appendix,
    /// `Phase <Roman|digits>`
    Phase,
    /// Short line ending with a colon
    Colon,
    /// Short all-caps line
    AllCaps,
    /// Bold text noticeably larger than body text
    FontOnly { ratio: f32 },
}

impl HeadingRule {
    /// Short tag naming the rule.
    pub fn tag(&self) -> &'static str {
        match self {
            HeadingRule::Numbering { .. } => "numbering",
            HeadingRule::Keyword => "keyword",
            HeadingRule::Appendix => "appendix",
            HeadingRule::Phase => "phase",
            HeadingRule::Colon => "colon",
            HeadingRule::AllCaps => "all-caps",
            HeadingRule::FontOnly { .. } => "font-only",
        }
    }
}

impl fmt::Display for HeadingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeadingRule::Numbering { depth } => write!(f, "numbering(depth {})", depth),
            HeadingRule::FontOnly { ratio } => write!(f, "font-only(x{:.2})", ratio),
            other => f.write_str(other.tag()),
        }
    }
}

/// A line provisionally identified as structural.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingCandidate<'a> {
    /// The originating line
    pub line: &'a TextLine,
    /// Which rule matched
    pub rule: HeadingRule,
}

impl<'a> HeadingCandidate<'a> {
    pub fn new(line: &'a TextLine, rule: HeadingRule) -> Self {
        Self { line, rule }
    }

    /// Numbering depth, if the numbering rule matched.
    pub fn numbering_depth(&self) -> Option<u8> {
        match self.rule {
            HeadingRule::Numbering { depth } => Some(depth),
            _ => None,
        }
    }
}

/// Detect candidates among the lines that were not consumed by the title.
///
/// `consumed` holds indices into `lines`; output order follows `lines`.
pub fn detect_candidates<'a>(
    lines: &'a [TextLine],
    consumed: &[usize],
    profile: &FontProfile,
    options: &OutlineOptions,
) -> Vec<HeadingCandidate<'a>> {
    lines
        .iter()
        .enumerate()
        .filter(|(i, _)| !consumed.contains(i))
        .filter_map(|(_, line)| {
            classify_line(line, profile, options).map(|rule| HeadingCandidate::new(line, rule))
        })
        .collect()
}

/// Apply the rule chain to one line.
pub fn classify_line(
    line: &TextLine,
    profile: &FontProfile,
    options: &OutlineOptions,
) -> Option<HeadingRule> {
    let text = line.text.trim();
    if !is_heading_sized(text, options) {
        return None;
    }

    if let Some(depth) = numbering_depth(text) {
        return Some(HeadingRule::Numbering { depth });
    }
    if is_section_keyword(line, options) {
        return Some(HeadingRule::Keyword);
    }
    if is_appendix(text) {
        return Some(HeadingRule::Appendix);
    }
    if is_phase(text) {
        return Some(HeadingRule::Phase);
    }
    if is_colon_heading(line, options) {
        return Some(HeadingRule::Colon);
    }
    if options.detect_all_caps && is_all_caps_heading(line) {
        return Some(HeadingRule::AllCaps);
    }

    let ratio = profile.size_ratio(line);
    if line.is_bold
        && ratio >= options.font_min_ratio
        && line.word_count() <= options.font_max_words
        && !is_field_line(line, options)
    {
        return Some(HeadingRule::FontOnly { ratio });
    }

    None
}

fn numbering_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{1,3}(?:\.\d{1,3})*)\.?(?:\s+|\s*[-–—]\s*)(.*\p{L}.*)$")
            .expect("numbering pattern compiles")
    })
}

fn appendix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?i:appendix)\s+[A-Z]\b\s*(?::.*|\s.*)?$").expect("appendix pattern compiles")
    })
}

fn phase_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?i:phase)\s+(\d+|[IVXLCDM]+)\b\s*:?(?:\s.*)?$")
            .expect("phase pattern compiles")
    })
}

fn roman_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^M{0,3}(?:CM|CD|D?C{0,3})(?:XC|XL|L?X{0,3})(?:IX|IV|V?I{0,3})$")
            .expect("roman numeral pattern compiles")
    })
}

/// Depth of a dotted numeric prefix (`2.1.3 Scope` → 3), clamped to
/// [`MAX_NUMBERING_DEPTH`].
pub fn numbering_depth(text: &str) -> Option<u8> {
    let caps = numbering_regex().captures(text.trim())?;
    let groups = caps.get(1)?.as_str().split('.').count();
    Some((groups as u8).clamp(1, MAX_NUMBERING_DEPTH))
}

/// Length gate applied before any rule: too short, too long, or a
/// paragraph with a sentence break after its numbering.
fn is_heading_sized(text: &str, options: &OutlineOptions) -> bool {
    let chars = text.chars().count();
    if chars < options.heading_min_chars || chars > options.heading_max_chars {
        return false;
    }
    if chars <= options.paragraph_min_chars {
        return true;
    }
    let body = numbering_regex()
        .captures(text)
        .and_then(|caps| caps.get(2))
        .map_or(text, |m| m.as_str());
    !body.contains(". ")
}

/// Known section phrase, either exactly or as the start of a short line.
fn is_section_keyword(line: &TextLine, options: &OutlineOptions) -> bool {
    let key = line.normalized_text();
    let key = key.trim_end_matches([':', '.']).trim_end();

    SECTION_KEYWORDS.iter().any(|phrase| {
        if key == *phrase {
            return true;
        }
        key.strip_prefix(phrase).is_some_and(|rest| {
            rest.starts_with(|c: char| !c.is_alphanumeric())
                && line.word_count() <= options.keyword_max_words
                && is_closed_heading_phrase(line.text.trim())
        })
    })
}

/// A keyword-led line reads as a heading only when it is capitalized and
/// does not break off mid-clause.
fn is_closed_heading_phrase(text: &str) -> bool {
    if !text.starts_with(char::is_uppercase) {
        return false;
    }
    if text.ends_with([',', ';', '-', '.']) {
        return false;
    }
    let last = text
        .split_whitespace()
        .last()
        .map(|w| w.trim_end_matches(':').to_lowercase())
        .unwrap_or_default();
    !OPEN_ENDINGS.contains(&last.as_str())
}

fn is_appendix(text: &str) -> bool {
    appendix_regex().is_match(text)
}

fn is_phase(text: &str) -> bool {
    let Some(caps) = phase_regex().captures(text) else {
        return false;
    };
    let token = &caps[1];
    token.chars().all(|c| c.is_ascii_digit()) || roman_regex().is_match(token)
}

fn is_colon_heading(line: &TextLine, options: &OutlineOptions) -> bool {
    let text = line.text.trim();
    text.ends_with(':')
        && text.chars().any(char::is_alphabetic)
        && line.word_count() <= options.colon_max_words
}

fn is_all_caps_heading(line: &TextLine) -> bool {
    let chars = line.text.trim().chars().count();
    (5..=30).contains(&chars) && line.is_uppercase()
}
