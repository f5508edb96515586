//! Title extraction from the top of the first page.

use std::cmp::Ordering;

use super::fonts::FontProfile;
use super::options::OutlineOptions;
use crate::model::TextLine;

/// Sizes within this many points count as the same title size.
const SIZE_TOLERANCE: f32 = 0.5;

/// Page height assumed when neither the page nor its lines give one.
const FALLBACK_PAGE_HEIGHT: f32 = 792.0;

/// The extracted title and the lines it consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleSelection {
    /// Title text (empty when nothing qualified)
    pub text: String,
    /// Indices of the title lines in the document line sequence
    pub lines: Vec<usize>,
}

impl TitleSelection {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Pick the title among the upper lines of page 0.
///
/// The largest font wins, then bold, then the line closest to the
/// horizontal centre of the page. Adjacent lines that share the winning
/// size are joined into a multi-line title.
pub fn extract_title(
    lines: &[TextLine],
    profile: &FontProfile,
    options: &OutlineOptions,
) -> TitleSelection {
    let first_page: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.page_index == 0)
        .map(|(i, _)| i)
        .collect();
    if first_page.is_empty() {
        return TitleSelection::default();
    }

    let page_height = first_page
        .iter()
        .map(|&i| lines[i].page_height)
        .find(|h| *h > 0.0)
        .unwrap_or_else(|| {
            first_page
                .iter()
                .map(|&i| lines[i].y_position + profile.effective_size(&lines[i]))
                .fold(FALLBACK_PAGE_HEIGHT, f32::max)
        });
    let cutoff = page_height * options.title_upper_fraction;

    let eligible = |i: usize| {
        let line = &lines[i];
        line.y_position <= cutoff && line.char_count() >= options.title_min_chars
    };

    let Some(&winner) = first_page
        .iter()
        .filter(|&&i| eligible(i))
        .max_by(|&&a, &&b| compare_title_lines(&lines[a], &lines[b], profile))
    else {
        log::debug!("no title candidate on page 0");
        return TitleSelection::default();
    };

    let size = profile.effective_size(&lines[winner]);
    let same_size = |i: usize| (profile.effective_size(&lines[i]) - size).abs() <= SIZE_TOLERANCE;
    let adjacent = |upper: usize, lower: usize| {
        let gap = lines[lower].y_position - lines[upper].y_position;
        (0.0..=size * 2.0).contains(&gap)
    };

    let position = first_page
        .iter()
        .position(|&i| i == winner)
        .unwrap_or_default();

    let mut start = position;
    while start > 0 {
        let (prev, cur) = (first_page[start - 1], first_page[start]);
        if eligible(prev) && same_size(prev) && adjacent(prev, cur) {
            start -= 1;
        } else {
            break;
        }
    }
    let mut end = position;
    while end + 1 < first_page.len() {
        let (cur, next) = (first_page[end], first_page[end + 1]);
        if eligible(next) && same_size(next) && adjacent(cur, next) {
            end += 1;
        } else {
            break;
        }
    }

    let chosen: Vec<usize> = first_page[start..=end].to_vec();
    let text = chosen
        .iter()
        .map(|&i| lines[i].text.trim())
        .collect::<Vec<_>>()
        .join(" ");

    log::debug!("title from {} line(s): {:?}", chosen.len(), text);
    TitleSelection {
        text,
        lines: chosen,
    }
}

/// Order two lines by title strength: size, then bold, then centring.
fn compare_title_lines(a: &TextLine, b: &TextLine, profile: &FontProfile) -> Ordering {
    let size_a = profile.effective_size(a);
    let size_b = profile.effective_size(b);
    if (size_a - size_b).abs() > SIZE_TOLERANCE {
        return size_a.total_cmp(&size_b);
    }

    a.is_bold
        .cmp(&b.is_bold)
        // Closer to the centre is better, so compare distances reversed.
        .then_with(|| center_distance(b).total_cmp(&center_distance(a)))
        // Earlier lines win the remaining ties.
        .then_with(|| b.y_position.total_cmp(&a.y_position))
}

fn center_distance(line: &TextLine) -> f32 {
    if line.page_width > 0.0 {
        (line.center_x() - line.page_width / 2.0).abs()
    } else {
        0.0
    }
}
