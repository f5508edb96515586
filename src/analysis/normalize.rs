//! Grouping of raw runs into logical lines.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;

use super::options::OutlineOptions;
use crate::model::{PageRuns, TextLine, TextRun};

/// Line height assumed for runs that carry neither a size nor a height.
const FALLBACK_LINE_HEIGHT: f32 = 12.0;

/// Group every page's runs into lines, in page then top-to-bottom order.
pub fn normalize_pages(pages: &[PageRuns], options: &OutlineOptions) -> Vec<TextLine> {
    let mut pages: Vec<&PageRuns> = pages.iter().collect();
    pages.sort_by_key(|page| page.index);

    pages
        .into_iter()
        .flat_map(|page| normalize_page(page, options))
        .collect()
}

/// Group one page's runs into lines.
///
/// Runs whose vertical centres lie within one line-height tolerance of the
/// line's first run are merged. A page without runs yields no lines.
pub fn normalize_page(page: &PageRuns, options: &OutlineOptions) -> Vec<TextLine> {
    let mut runs: Vec<&TextRun> = page
        .runs
        .iter()
        .filter(|run| !run.text.trim().is_empty())
        .collect();
    if runs.is_empty() {
        return Vec::new();
    }

    runs.sort_by(|a, b| {
        a.bbox
            .center_y()
            .total_cmp(&b.bbox.center_y())
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
    });

    let mut groups: Vec<Vec<&TextRun>> = Vec::new();
    let mut anchor: Option<(f32, f32)> = None;

    for run in runs {
        let height = run_height(run);
        match anchor {
            Some((center, anchor_height))
                if (run.bbox.center_y() - center).abs()
                    <= options.line_tolerance_ratio * anchor_height.max(height) =>
            {
                if let Some(group) = groups.last_mut() {
                    group.push(run);
                }
            }
            _ => {
                anchor = Some((run.bbox.center_y(), height));
                groups.push(vec![run]);
            }
        }
    }

    let mut lines: Vec<TextLine> = groups
        .into_iter()
        .filter_map(|group| build_line(page, group))
        .collect();

    // Mixed sizes can put a later line's top above an earlier one's.
    lines.sort_by(|a, b| a.y_position.total_cmp(&b.y_position));

    log::trace!("page {}: {} lines", page.index, lines.len());
    lines
}

fn run_height(run: &TextRun) -> f32 {
    let size = run.size_or_unknown();
    if size > 0.0 {
        size
    } else if run.bbox.height() > 0.0 {
        run.bbox.height()
    } else {
        FALLBACK_LINE_HEIGHT
    }
}

fn build_line(page: &PageRuns, mut runs: Vec<&TextRun>) -> Option<TextLine> {
    runs.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));

    let text = normalize_text(&join_runs(&runs));
    if text.is_empty() {
        return None;
    }

    // Majority of characters wins; the larger font breaks ties.
    let dominant = runs.iter().copied().max_by(|a, b| {
        a.char_count().cmp(&b.char_count()).then_with(|| {
            a.size_or_unknown()
                .partial_cmp(&b.size_or_unknown())
                .unwrap_or(Ordering::Equal)
        })
    })?;

    let left = runs.iter().map(|r| r.bbox.x0).fold(f32::INFINITY, f32::min);
    let right = runs
        .iter()
        .map(|r| r.bbox.x1.max(r.bbox.x0))
        .fold(f32::NEG_INFINITY, f32::max);
    let top = runs.iter().map(|r| r.bbox.y0).fold(f32::INFINITY, f32::min);

    Some(
        TextLine::new(
            text,
            page.index,
            dominant.size_or_unknown(),
            dominant.bold(),
        )
        .at(left, top)
        .with_width(right - left)
        .on_page_of_size(page.width, page.height),
    )
}

/// Concatenate runs left to right, inserting a space where a horizontal gap
/// separates two runs that do not already carry whitespace.
fn join_runs(runs: &[&TextRun]) -> String {
    let mut result = String::new();

    for (i, run) in runs.iter().enumerate() {
        if i > 0 {
            let prev = runs[i - 1];
            let prev_end = prev.bbox.x1.max(prev.bbox.x0);
            let size = run_height(run);
            let gap = run.bbox.x0 - prev_end;

            let has_space = prev.text.ends_with(char::is_whitespace)
                || run.text.starts_with(char::is_whitespace);
            if !has_space && gap > size * 0.1 {
                result.push(' ');
            }
        }
        result.push_str(&run.text);
    }

    result
}

/// NFKC-normalize and collapse whitespace.
pub fn normalize_text(text: &str) -> String {
    let folded: String = text.nfkc().collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}
