//! Directory batch processing.
//!
//! Every `*.pdf` in the input directory gets one `<stem>.json` in the output
//! directory. Documents are independent, so they are processed in parallel
//! on a rayon pool. A document that fails still gets an output record (an
//! empty outline) and the failure is reported in the [`BatchReport`].

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::analysis::OutlineOptions;
use crate::detect::has_pdf_extension;
use crate::error::{Error, Result};
use crate::model::Document;
use crate::parser::ParseOptions;
use crate::render::{write_json_file, JsonFormat};

/// Settings for a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Worker threads (0 = one per core)
    pub jobs: usize,
    /// Descend into subdirectories, mirroring them in the output
    pub recursive: bool,
    /// JSON layout of the output files
    pub format: JsonFormat,
    /// Use the file stem as title when none was found
    pub stem_title: bool,
    /// Extraction settings
    pub parse: ParseOptions,
    /// Outline heuristics
    pub outline: OutlineOptions,
}

impl BatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_stem_title(mut self, enabled: bool) -> Self {
        self.stem_title = enabled;
        self
    }

    pub fn with_parse_options(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }

    pub fn with_outline_options(mut self, outline: OutlineOptions) -> Self {
        self.outline = outline;
        self
    }
}

/// Result of processing one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Headings written for this file
    pub headings: usize,
    /// Extraction or write failure, if any
    pub error: Option<String>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Summary of a batch run, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}

/// List the PDF files under `dir`, sorted by path.
pub fn collect_inputs<P: AsRef<Path>>(dir: P, recursive: bool) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !fs::metadata(dir)?.is_dir() {
        return Err(Error::Other(format!("{} is not a directory", dir.display())));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut inputs = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(max_depth) {
        match entry {
            Ok(entry) if entry.file_type().is_file() && has_pdf_extension(entry.path()) => {
                inputs.push(entry.into_path());
            }
            Ok(_) => {}
            Err(e) => log::warn!("skipping unreadable entry: {}", e),
        }
    }

    inputs.sort();
    Ok(inputs)
}

/// Output path for an input: `<stem>.json`, under the same relative
/// directory it had below `input_dir`.
pub fn output_path_for(input: &Path, input_dir: &Path, output_dir: &Path) -> PathBuf {
    let relative = input.strip_prefix(input_dir).unwrap_or(input);
    let parent = relative.parent().unwrap_or_else(|| Path::new(""));
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    output_dir.join(parent).join(format!("{}.json", stem))
}

/// Extract one file and write its JSON record.
pub fn process_file(input: &Path, output: &Path, options: &BatchOptions) -> FileOutcome {
    let (mut doc, mut error) =
        match crate::try_extract_file_with(input, &options.parse, &options.outline) {
            Ok(doc) => (doc, None),
            Err(e) => {
                log::warn!("{}: {}", input.display(), e);
                (Document::new(), Some(e.to_string()))
            }
        };

    if options.stem_title && doc.title.is_empty() {
        if let Some(stem) = input.file_stem() {
            doc.title = stem.to_string_lossy().to_string();
        }
    }

    if let Err(e) = write_json_file(&doc, options.format, output) {
        log::warn!("{}: {}", output.display(), e);
        error.get_or_insert_with(|| e.to_string());
    }

    FileOutcome {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        headings: doc.outline.len(),
        error,
    }
}

/// Process every PDF under `input_dir`.
///
/// `on_done` is called from worker threads as each file finishes. Only a
/// missing input directory or a pool that cannot be started fails the run.
pub fn run_batch<F>(
    input_dir: &Path,
    output_dir: &Path,
    options: &BatchOptions,
    on_done: F,
) -> Result<BatchReport>
where
    F: Fn(&FileOutcome) + Sync,
{
    let inputs = collect_inputs(input_dir, options.recursive)?;
    fs::create_dir_all(output_dir)?;
    log::info!(
        "processing {} PDF file(s) from {}",
        inputs.len(),
        input_dir.display()
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.jobs)
        .build()
        .map_err(|e| Error::Other(format!("failed to start worker pool: {}", e)))?;

    let outcomes = pool.install(|| {
        inputs
            .par_iter()
            .map(|input| {
                let output = output_path_for(input, input_dir, output_dir);
                let outcome = process_file(input, &output, options);
                on_done(&outcome);
                outcome
            })
            .collect()
    });

    Ok(BatchReport { outcomes })
}
