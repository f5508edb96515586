//! Data model shared by the extraction boundary and the outline pipeline.
//!
//! Runs flow in from a [`crate::parser::RunSource`], are grouped into
//! [`TextLine`]s, and leave as a [`Document`] of [`OutlineEntry`] values.

mod line;
mod outline;
mod run;

pub use line::TextLine;
pub(crate) use line::normalize_key;
pub use outline::{Document, HeadingLevel, OutlineEntry};
pub use run::{BoundingBox, PageRuns, TextRun};
