//! Document-wide font statistics.

use std::collections::HashMap;

use crate::model::TextLine;

/// Body size assumed when a document carries no usable font sizes.
pub const DEFAULT_BODY_SIZE: f32 = 12.0;

/// Font statistics for heading detection.
///
/// Built once per document and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct FontProfile {
    /// Body text font size (most common, weighted by characters)
    pub body_size: f32,
    /// Characters observed per font size, keyed in tenths of a point
    pub size_histogram: HashMap<i32, usize>,
}

impl FontProfile {
    /// Compute the profile of a line sequence.
    ///
    /// Lines with unknown size (0.0) are left out. When two sizes carry the
    /// same weight the smaller one is taken as body text.
    pub fn from_lines(lines: &[TextLine]) -> Self {
        let mut size_histogram: HashMap<i32, usize> = HashMap::new();
        for line in lines.iter().filter(|l| l.font_size > 0.0) {
            *size_histogram.entry(size_key(line.font_size)).or_insert(0) += line.char_count();
        }

        let body_size = size_histogram
            .iter()
            .filter(|(_, count)| **count > 0)
            .max_by(|(size_a, count_a), (size_b, count_b)| {
                count_a.cmp(count_b).then(size_b.cmp(size_a))
            })
            .map(|(key, _)| *key as f32 / 10.0)
            .unwrap_or(DEFAULT_BODY_SIZE);

        log::debug!(
            "body size {:.1}pt from {} distinct sizes",
            body_size,
            size_histogram.len()
        );

        Self {
            body_size,
            size_histogram,
        }
    }

    /// Font size of a line, with unknown sizes read as body text.
    pub fn effective_size(&self, line: &TextLine) -> f32 {
        if line.font_size > 0.0 {
            line.font_size
        } else {
            self.body_size
        }
    }

    /// Ratio of a line's font size to the body size.
    pub fn size_ratio(&self, line: &TextLine) -> f32 {
        if self.body_size > 0.0 {
            self.effective_size(line) / self.body_size
        } else {
            1.0
        }
    }
}

impl Default for FontProfile {
    fn default() -> Self {
        Self {
            body_size: DEFAULT_BODY_SIZE,
            size_histogram: HashMap::new(),
        }
    }
}

/// Round to 0.1pt precision.
fn size_key(size: f32) -> i32 {
    (size * 10.0).round() as i32
}
