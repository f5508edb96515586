//! PDF text run extraction.

mod backend;
mod options;

pub use backend::{LopdfRunSource, RunSource};
pub use options::{ErrorMode, ParseOptions};
