//! Directory batch runs on temporary trees.

mod common;

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::simple_report;
use pdfoutline::{run_batch, BatchOptions, Document, HeadingLevel, JsonFormat};

fn read_doc(path: &std::path::Path) -> Document {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_batch_writes_one_record_per_pdf() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    fs::write(input.path().join("budget.pdf"), simple_report("Budget Plan 2025")).unwrap();
    fs::write(input.path().join("broken.pdf"), b"%PDF-1.4\nnot really a pdf").unwrap();
    fs::write(input.path().join("readme.txt"), b"ignored").unwrap();

    let seen = AtomicUsize::new(0);
    let report = run_batch(
        input.path(),
        output.path(),
        &BatchOptions::new().with_jobs(2),
        |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        },
    )
    .unwrap();

    assert_eq!(seen.load(Ordering::SeqCst), 2);
    assert_eq!(report.total(), 2);
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 1);

    let budget = read_doc(&output.path().join("budget.json"));
    assert_eq!(budget.title, "Budget Plan 2025");
    let levels: Vec<_> = budget
        .outline
        .iter()
        .map(|e| (e.level, e.text.as_str()))
        .collect();
    assert_eq!(
        levels,
        [
            (HeadingLevel::H1, "1. Introduction"),
            (HeadingLevel::H1, "References")
        ]
    );

    // A failed document still gets an (empty) record.
    let broken = read_doc(&output.path().join("broken.json"));
    assert!(broken.is_empty());
    assert!(!output.path().join("readme.json").exists());
}

#[test]
fn test_stem_title_fallback() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    fs::write(input.path().join("file03.pdf"), b"garbage").unwrap();

    let options = BatchOptions::new()
        .with_stem_title(true)
        .with_format(JsonFormat::Compact);
    let report = run_batch(input.path(), output.path(), &options, |_| {}).unwrap();
    assert_eq!(report.failed(), 1);

    let written = fs::read_to_string(output.path().join("file03.json")).unwrap();
    assert_eq!(written, "{\"title\":\"file03\",\"outline\":[]}\n");
}

#[test]
fn test_recursive_batch_mirrors_tree() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let nested = input.path().join("2024").join("q1");
    fs::create_dir_all(&nested).unwrap();
    fs::write(nested.join("minutes.pdf"), simple_report("Board Minutes")).unwrap();
    fs::write(input.path().join("top.pdf"), simple_report("Top Level Plan")).unwrap();

    let flat = run_batch(input.path(), output.path(), &BatchOptions::new(), |_| {}).unwrap();
    assert_eq!(flat.total(), 1);

    let deep = run_batch(
        input.path(),
        output.path(),
        &BatchOptions::new().recursive(true),
        |_| {},
    )
    .unwrap();
    assert_eq!(deep.total(), 2);
    assert_eq!(deep.failed(), 0);

    let minutes = read_doc(&output.path().join("2024").join("q1").join("minutes.json"));
    assert_eq!(minutes.title, "Board Minutes");
}

#[test]
fn test_missing_input_dir_fails() {
    let output = tempfile::tempdir().unwrap();
    let result = run_batch(
        std::path::Path::new("/nonexistent/pdf/input"),
        output.path(),
        &BatchOptions::new(),
        |_| {},
    );
    assert!(result.is_err());
}
