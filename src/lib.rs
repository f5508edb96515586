//! # pdfoutline
//!
//! Heuristic title and heading outline extraction for PDF documents.
//!
//! The outline is rebuilt purely from the typography and layout of the
//! page text: numbering patterns, section vocabulary, and font size
//! relative to the document's body text. No bookmarks, metadata or
//! trained models are consulted.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfoutline::{render, try_extract_file, OutlineOptions};
//!
//! fn main() -> pdfoutline::Result<()> {
//!     let doc = try_extract_file("report.pdf", &OutlineOptions::default())?;
//!     println!("{}", render::to_json(&doc, render::JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Layers
//!
//! - [`parser`]: the [`RunSource`] boundary and its lopdf implementation
//! - [`analysis`]: the outline pipeline over page runs
//! - [`render`]: JSON output
//! - [`batch`]: directory processing on a rayon pool

pub mod analysis;
pub mod batch;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

pub use analysis::{diagnose, outline_from_lines, outline_from_runs, OutlineOptions};
pub use batch::{run_batch, BatchOptions, BatchReport, FileOutcome};
pub use error::{Error, Result};
pub use model::{BoundingBox, Document, HeadingLevel, OutlineEntry, PageRuns, TextLine, TextRun};
pub use parser::{ErrorMode, LopdfRunSource, ParseOptions, RunSource};
pub use render::JsonFormat;

use std::path::Path;

/// Build the outline of any run source.
///
/// # Example
///
/// ```
/// use pdfoutline::{extract_from_source, BoundingBox, OutlineOptions, PageRuns, ParseOptions, TextRun};
///
/// let pages = vec![PageRuns::new(0, 612.0, 792.0).with_run(TextRun::new(
///     "2.1 Background",
///     12.0,
///     false,
///     BoundingBox::new(72.0, 400.0, 160.0, 412.0),
/// ))];
/// let doc = extract_from_source(&pages, &ParseOptions::default(), &OutlineOptions::default()).unwrap();
/// assert_eq!(doc.outline[0].text, "2.1 Background");
/// ```
pub fn extract_from_source<S: RunSource + ?Sized>(
    source: &S,
    parse_options: &ParseOptions,
    options: &OutlineOptions,
) -> Result<Document> {
    let pages = source.page_runs(parse_options)?;
    Ok(outline_from_runs(&pages, options))
}

/// Extract the outline of a PDF file, returning any failure.
pub fn try_extract_file<P: AsRef<Path>>(path: P, options: &OutlineOptions) -> Result<Document> {
    try_extract_file_with(path, &ParseOptions::default(), options)
}

/// Extract the outline of a PDF file with custom extraction settings.
pub fn try_extract_file_with<P: AsRef<Path>>(
    path: P,
    parse_options: &ParseOptions,
    options: &OutlineOptions,
) -> Result<Document> {
    let source = LopdfRunSource::load_file(path)?;
    extract_from_source(&source, parse_options, options)
}

/// Extract the outline of an in-memory PDF, returning any failure.
pub fn try_extract_bytes(data: &[u8], options: &OutlineOptions) -> Result<Document> {
    let source = LopdfRunSource::load_bytes(data)?;
    extract_from_source(&source, &ParseOptions::default(), options)
}

/// Extract the outline of a PDF file.
///
/// Any failure is logged and yields an empty document, so callers
/// processing many files never stop on one bad input.
pub fn extract_file<P: AsRef<Path>>(path: P, options: &OutlineOptions) -> Document {
    let path = path.as_ref();
    try_extract_file(path, options).unwrap_or_else(|e| {
        log::warn!("{}: {}", path.display(), e);
        Document::new()
    })
}

/// Extract the outline of an in-memory PDF, yielding an empty document on
/// failure.
pub fn extract_bytes(data: &[u8], options: &OutlineOptions) -> Document {
    try_extract_bytes(data, options).unwrap_or_else(|e| {
        log::warn!("in-memory PDF: {}", e);
        Document::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_file_missing_is_empty() {
        let doc = extract_file("/nonexistent/report.pdf", &OutlineOptions::default());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_try_extract_bytes_rejects_non_pdf() {
        let err = try_extract_bytes(b"hello world", &OutlineOptions::default()).unwrap_err();
        assert!(matches!(err, Error::UnknownFormat));
        assert!(extract_bytes(b"hello world", &OutlineOptions::default()).is_empty());
    }

    #[test]
    fn test_empty_run_list_gives_empty_document() {
        let pages: Vec<PageRuns> = Vec::new();
        let doc =
            extract_from_source(&pages, &ParseOptions::default(), &OutlineOptions::default())
                .unwrap();
        assert!(doc.is_empty());
    }
}
