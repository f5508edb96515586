//! Final outline assembly.

use super::level::ClassifiedCandidate;
use super::options::OutlineOptions;
use crate::model::{normalize_key, OutlineEntry};

/// Turn classified candidates into outline entries.
///
/// Empty and repeated candidates are dropped first; entries are built only
/// for the survivors. Order is preserved and `first_page_number` is added to
/// every page index.
pub fn assemble(candidates: &[ClassifiedCandidate<'_>], options: &OutlineOptions) -> Vec<OutlineEntry> {
    retain_distinct(candidates.iter(), |c| (c.text(), c.page_index()))
        .map(|c| {
            OutlineEntry::new(
                c.level,
                c.text().trim(),
                c.page_index().saturating_add(options.first_page_number),
            )
        })
        .collect()
}

/// Drop empty entries and consecutive duplicates on the same page.
///
/// Applying this to its own output changes nothing.
pub fn finalize(entries: Vec<OutlineEntry>) -> Vec<OutlineEntry> {
    retain_distinct(entries.into_iter(), |e| (e.text.as_str(), e.page)).collect()
}

/// Skip items whose text is blank or whose normalized text and page repeat
/// the previous kept item.
fn retain_distinct<T, I, F>(items: I, key_of: F) -> impl Iterator<Item = T>
where
    I: Iterator<Item = T>,
    F: Fn(&T) -> (&str, u32),
{
    let mut last_key: Option<(String, u32)> = None;
    items.filter(move |item| {
        let (text, page) = key_of(item);
        let key = normalize_key(text);
        if key.is_empty() {
            return false;
        }
        let key = (key, page);
        if last_key.as_ref() == Some(&key) {
            log::debug!("dropping duplicate heading {:?} on page {}", text, page);
            return false;
        }
        last_key = Some(key);
        true
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::heading::{HeadingCandidate, HeadingRule};
    use crate::analysis::level::classify_levels;
    use crate::model::{HeadingLevel, TextLine};

    fn entry(level: HeadingLevel, text: &str, page: u32) -> OutlineEntry {
        OutlineEntry::new(level, text, page)
    }

    #[test]
    fn test_drops_empty_and_consecutive_duplicates() {
        let entries = vec![
            entry(HeadingLevel::H1, "Introduction", 0),
            entry(HeadingLevel::H1, "  introduction ", 0),
            entry(HeadingLevel::H2, "   ", 0),
            entry(HeadingLevel::H1, "Introduction", 1),
            entry(HeadingLevel::H2, "Scope", 1),
            entry(HeadingLevel::H1, "Introduction", 1),
        ];

        let out = finalize(entries);
        let texts: Vec<_> = out.iter().map(|e| (e.text.as_str(), e.page)).collect();
        assert_eq!(
            texts,
            [
                ("Introduction", 0),
                ("Introduction", 1),
                ("Scope", 1),
                ("Introduction", 1)
            ]
        );
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let entries = vec![
            entry(HeadingLevel::H1, "A", 0),
            entry(HeadingLevel::H1, "A", 0),
            entry(HeadingLevel::H2, "B", 0),
            entry(HeadingLevel::H3, "", 2),
            entry(HeadingLevel::H2, "B", 3),
        ];
        let once = finalize(entries);
        let twice = finalize(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_duplicate_candidates_never_become_entries() {
        let first = TextLine::new("Overview", 2, 12.0, false);
        let repeat = TextLine::new("OVERVIEW ", 2, 12.0, false);
        let blank = TextLine::new("  ", 2, 12.0, false);
        let next = TextLine::new("Overview", 3, 12.0, false);
        let classified = classify_levels(
            vec![
                HeadingCandidate::new(&first, HeadingRule::Keyword),
                HeadingCandidate::new(&repeat, HeadingRule::Keyword),
                HeadingCandidate::new(&blank, HeadingRule::Colon),
                HeadingCandidate::new(&next, HeadingRule::Keyword),
            ],
            &OutlineOptions::default(),
        );

        let out = assemble(&classified, &OutlineOptions::default().one_based_pages());
        assert_eq!(
            out,
            vec![
                entry(HeadingLevel::H1, "Overview", 3),
                entry(HeadingLevel::H1, "Overview", 4),
            ]
        );
        assert_eq!(finalize(out.clone()), out);
    }

    #[test]
    fn test_page_offset_applied() {
        let line = TextLine::new("References ", 4, 12.0, false);
        let classified = classify_levels(
            vec![HeadingCandidate::new(&line, HeadingRule::Keyword)],
            &OutlineOptions::default(),
        );

        let zero = assemble(&classified, &OutlineOptions::default());
        assert_eq!(zero, vec![entry(HeadingLevel::H1, "References", 4)]);

        let one = assemble(&classified, &OutlineOptions::default().one_based_pages());
        assert_eq!(one[0].page, 5);
    }
}
