//! Logical text lines.

/// One physical line of text on one page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// Whitespace-normalized visible text
    pub text: String,
    /// Zero-based page number
    pub page_index: u32,
    /// Dominant font size (0.0 when unknown)
    pub font_size: f32,
    /// Whether the dominant run is bold
    pub is_bold: bool,
    /// Offset of the line's top edge from the top of the page
    pub y_position: f32,
    /// Offset of the line's left edge
    pub x_position: f32,
    /// Horizontal extent of the line
    pub width: f32,
    /// Width of the page the line sits on (0 if unknown)
    pub page_width: f32,
    /// Height of the page the line sits on (0 if unknown)
    pub page_height: f32,
}

impl TextLine {
    /// Create a line with default geometry, mostly useful for tests and
    /// callers that already have line-level data.
    pub fn new(text: impl Into<String>, page_index: u32, font_size: f32, is_bold: bool) -> Self {
        Self {
            text: text.into(),
            page_index,
            font_size,
            is_bold,
            y_position: 0.0,
            x_position: 0.0,
            width: 0.0,
            page_width: 0.0,
            page_height: 0.0,
        }
    }

    /// Set the position of the line on the page.
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x_position = x;
        self.y_position = y;
        self
    }

    /// Set the line width.
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Set the page dimensions.
    pub fn on_page_of_size(mut self, width: f32, height: f32) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().filter(|c| !c.is_whitespace()).count()
    }

    /// Horizontal centre of the line.
    pub fn center_x(&self) -> f32 {
        self.x_position + self.width / 2.0
    }

    /// Lowercased text with collapsed whitespace, used for vocabulary and
    /// duplicate comparisons.
    pub fn normalized_text(&self) -> String {
        normalize_key(&self.text)
    }

    /// Check if every letter of the line is uppercase.
    pub fn is_uppercase(&self) -> bool {
        let mut letters = self.text.chars().filter(|c| c.is_alphabetic()).peekable();
        letters.peek().is_some() && letters.all(|c| c.is_uppercase())
    }
}

/// Lowercase and collapse whitespace.
pub(crate) fn normalize_key(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let line = TextLine::new("Name of  applicant:", 0, 10.0, false);
        assert_eq!(line.word_count(), 3);
        assert_eq!(line.char_count(), 16);
    }

    #[test]
    fn test_normalized_text() {
        let line = TextLine::new("  Table   Of Contents ", 0, 10.0, false);
        assert_eq!(line.normalized_text(), "table of contents");
    }

    #[test]
    fn test_uppercase_detection() {
        assert!(TextLine::new("SECTION ONE", 0, 10.0, false).is_uppercase());
        assert!(!TextLine::new("Section One", 0, 10.0, false).is_uppercase());
        assert!(!TextLine::new("1234", 0, 10.0, false).is_uppercase());
    }

    #[test]
    fn test_center_x() {
        let line = TextLine::new("Title", 0, 20.0, true)
            .at(200.0, 50.0)
            .with_width(100.0);
        assert_eq!(line.center_x(), 250.0);
    }
}
