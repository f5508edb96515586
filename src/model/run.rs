//! Raw text runs as delivered by the extraction boundary.

/// Axis-aligned box in top-down page coordinates (origin at the top-left).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BoundingBox {
    /// Create a bounding box from its corners.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f32 {
        (self.x1 - self.x0).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y1 - self.y0).max(0.0)
    }

    /// Vertical centre, used to decide which runs share a line.
    pub fn center_y(&self) -> f32 {
        (self.y0 + self.y1) / 2.0
    }
}

/// A maximal span of text sharing one font and style.
///
/// Font metadata is optional because extractors do not always know it;
/// downstream stages treat a missing size as body text and a missing
/// weight as regular.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// The text content
    pub text: String,
    /// Font size in points, if known
    pub font_size: Option<f32>,
    /// Whether the run is bold-weighted, if known
    pub is_bold: Option<bool>,
    /// Position on the page
    pub bbox: BoundingBox,
}

impl TextRun {
    /// Create a run with known font metadata.
    pub fn new(text: impl Into<String>, font_size: f32, is_bold: bool, bbox: BoundingBox) -> Self {
        Self {
            text: text.into(),
            font_size: Some(font_size),
            is_bold: Some(is_bold),
            bbox,
        }
    }

    /// Create a run whose font metadata is unknown.
    pub fn unstyled(text: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            text: text.into(),
            font_size: None,
            is_bold: None,
            bbox,
        }
    }

    /// Font size with invalid or missing values mapped to `0.0` (unknown).
    pub fn size_or_unknown(&self) -> f32 {
        match self.font_size {
            Some(size) if size.is_finite() && size > 0.0 => size,
            _ => 0.0,
        }
    }

    pub fn bold(&self) -> bool {
        self.is_bold.unwrap_or(false)
    }

    /// Number of visible characters, used for majority weighting.
    pub fn char_count(&self) -> usize {
        self.text.chars().filter(|c| !c.is_whitespace()).count()
    }
}

/// All runs of one page, in extraction order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageRuns {
    /// Zero-based page index
    pub index: u32,
    /// Page width in points (0 if unknown)
    pub width: f32,
    /// Page height in points (0 if unknown)
    pub height: f32,
    /// Text runs on the page
    pub runs: Vec<TextRun>,
}

impl PageRuns {
    /// Create an empty page.
    pub fn new(index: u32, width: f32, height: f32) -> Self {
        Self {
            index,
            width,
            height,
            runs: Vec::new(),
        }
    }

    /// Add a run to the page.
    pub fn push(&mut self, run: TextRun) {
        self.runs.push(run);
    }

    /// Builder form of [`PageRuns::push`].
    pub fn with_run(mut self, run: TextRun) -> Self {
        self.runs.push(run);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_geometry() {
        let bbox = BoundingBox::new(10.0, 20.0, 110.0, 32.0);
        assert_eq!(bbox.width(), 100.0);
        assert_eq!(bbox.height(), 12.0);
        assert_eq!(bbox.center_y(), 26.0);
    }

    #[test]
    fn test_missing_font_metadata() {
        let run = TextRun::unstyled("Hello", BoundingBox::default());
        assert_eq!(run.size_or_unknown(), 0.0);
        assert!(!run.bold());

        let nan = TextRun {
            font_size: Some(f32::NAN),
            ..run.clone()
        };
        assert_eq!(nan.size_or_unknown(), 0.0);
    }

    #[test]
    fn test_char_count_ignores_whitespace() {
        let run = TextRun::new("a b  c", 12.0, false, BoundingBox::default());
        assert_eq!(run.char_count(), 3);
    }
}
