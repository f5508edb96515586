//! pdfoutline CLI - PDF title and heading outline extraction

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfoutline::analysis::diagnose;
use pdfoutline::render::{to_json, write_json_file};
use pdfoutline::{
    run_batch, try_extract_file, BatchOptions, Document, JsonFormat, LopdfRunSource,
    OutlineOptions, ParseOptions, RunSource,
};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "pdfoutline")]
#[command(version)]
#[command(about = "Extract the title and heading outline of PDF documents", long_about = None)]
struct Cli {
    /// Input PDF file (same as `pdfoutline outline FILE`)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(flatten)]
    output: OutputArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options shared by every command that writes outlines.
#[derive(Args, Clone)]
struct OutputArgs {
    /// Write single-line JSON
    #[arg(long, global = true)]
    compact: bool,

    /// Number pages from 1 instead of 0
    #[arg(long, global = true)]
    one_based: bool,

    /// JSON file overriding heuristic thresholds
    #[arg(long, value_name = "FILE", env = "PDFOUTLINE_CONFIG", global = true)]
    config: Option<PathBuf>,
}

impl OutputArgs {
    fn format(&self) -> JsonFormat {
        if self.compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        }
    }

    fn outline_options(&self) -> Result<OutlineOptions, pdfoutline::Error> {
        let options = match &self.config {
            Some(path) => OutlineOptions::from_json_file(path)?,
            None => OutlineOptions::default(),
        };
        let options = if self.one_based {
            options.one_based_pages()
        } else {
            options
        };
        log::debug!("outline options: {:?}", options);
        Ok(options)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the outline of one PDF as JSON
    Outline {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Extract outlines for every PDF in a directory
    Batch {
        /// Directory containing PDF files
        #[arg(value_name = "INPUT_DIR")]
        input_dir: PathBuf,

        /// Directory receiving one JSON file per PDF
        #[arg(value_name = "OUTPUT_DIR")]
        output_dir: PathBuf,

        /// Worker threads (0 = one per core)
        #[arg(short, long, default_value = "0", env = "PDFOUTLINE_JOBS")]
        jobs: usize,

        /// Include PDFs in subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Use the file name as title when none is found
        #[arg(long)]
        stem_title: bool,
    },

    /// Show every text line with its font data and heading decision
    Lines {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let output = cli.output;

    let result = match cli.command {
        Some(Commands::Outline { input, output: out }) => {
            cmd_outline(&input, out.as_deref(), &output)
        }
        Some(Commands::Batch {
            input_dir,
            output_dir,
            jobs,
            recursive,
            stem_title,
        }) => cmd_batch(&input_dir, &output_dir, jobs, recursive, stem_title, &output),
        Some(Commands::Lines { input }) => cmd_lines(&input, &output),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            if let Some(input) = cli.input {
                cmd_outline(&input, None, &output)
            } else {
                println!("{}", "Usage: pdfoutline <FILE>".yellow());
                println!("       pdfoutline --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_outline(input: &Path, output: Option<&Path>, args: &OutputArgs) -> CliResult {
    let options = args.outline_options()?;
    let doc = try_extract_file(input, &options)?;

    if let Some(path) = output {
        write_json_file(&doc, args.format(), path)?;
        println!(
            "{} {} ({} headings: {})",
            "Saved to".green(),
            path.display(),
            doc.outline.len(),
            level_summary(&doc)
        );
    } else {
        println!("{}", to_json(&doc, args.format())?);
    }

    Ok(())
}

/// Per-level heading counts, e.g. `H1 2, H2 3, H3 0, H4 1`.
fn level_summary(doc: &Document) -> String {
    doc.level_counts()
        .iter()
        .enumerate()
        .map(|(i, count)| format!("H{} {}", i + 1, count))
        .collect::<Vec<_>>()
        .join(", ")
}

fn cmd_batch(
    input_dir: &Path,
    output_dir: &Path,
    jobs: usize,
    recursive: bool,
    stem_title: bool,
    args: &OutputArgs,
) -> CliResult {
    let options = BatchOptions::new()
        .with_jobs(jobs)
        .recursive(recursive)
        .with_format(args.format())
        .with_stem_title(stem_title)
        .with_parse_options(ParseOptions::new().lenient())
        .with_outline_options(args.outline_options()?);

    let total = pdfoutline::batch::collect_inputs(input_dir, recursive)?.len();
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let headings = AtomicUsize::new(0);
    let report = run_batch(input_dir, output_dir, &options, |outcome| {
        headings.fetch_add(outcome.headings, Ordering::Relaxed);
        if let Some(name) = outcome.input.file_name() {
            pb.set_message(name.to_string_lossy().to_string());
        }
        pb.inc(1);
    })?;
    pb.finish_and_clear();

    println!("{}", "Batch Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Files".bold(), report.total());
    println!(
        "{}: {}",
        "Succeeded".bold(),
        report.succeeded().to_string().green()
    );
    if report.failed() > 0 {
        println!("{}: {}", "Failed".bold(), report.failed().to_string().red());
        for failure in report.failures() {
            println!(
                "  {} {}: {}",
                "✗".red(),
                failure.input.display(),
                failure.error.as_deref().unwrap_or_default().dimmed()
            );
        }
    }
    println!(
        "{}: {}",
        "Headings".bold(),
        headings.load(Ordering::Relaxed)
    );
    println!("{}: {}", "Output".bold(), output_dir.display());

    Ok(())
}

fn cmd_lines(input: &Path, args: &OutputArgs) -> CliResult {
    let options = args.outline_options()?;
    let source = LopdfRunSource::load_file(input)?;
    let pages = source.page_runs(&ParseOptions::new().lenient())?;
    let diagnosis = diagnose(&pages, &options);

    println!("{}", "Document Profile".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), pages.len());
    println!("{}: {:.1}pt", "Body size".bold(), diagnosis.profile.body_size);
    println!(
        "{}: {} (signature {:.2}, fields {:.2}, keywords {})",
        "Form".bold(),
        if diagnosis.form.is_form { "Yes" } else { "No" },
        diagnosis.form.signature_ratio,
        diagnosis.form.field_ratio,
        diagnosis.form.keyword_hits
    );
    println!("{}: {}", "Title".bold(), diagnosis.title.text);
    println!();

    for report in &diagnosis.lines {
        let line = &report.line;
        let decision = if report.is_title {
            "title".magenta().to_string()
        } else {
            match (report.rule, report.level) {
                (Some(rule), Some(level)) => format!("{} {}", level.as_str().green(), rule),
                _ => "-".dimmed().to_string(),
            }
        };
        println!(
            "{:>4} {:>7.1} {} {:>7.1}  {:<28} {}",
            line.page_index + options.first_page_number,
            line.font_size,
            if line.is_bold { "B".bold() } else { " ".normal() },
            line.y_position,
            decision,
            line.text
        );
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfoutline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF title and heading outline extractor");
    println!();
    println!("License: MIT");
}
