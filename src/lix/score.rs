//! The LIX formula and the search for a score printed in the book itself.

use std::ops::AddAssign;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Word, long-word and sentence counts of a text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ContentStats {
    pub word_count: usize,
    pub long_word_count: usize,
    pub sentence_count: usize,
}

impl ContentStats {
    pub fn new(word_count: usize, long_word_count: usize, sentence_count: usize) -> Self {
        Self {
            word_count,
            long_word_count,
            sentence_count,
        }
    }
}

impl AddAssign for ContentStats {
    fn add_assign(&mut self, other: Self) {
        self.word_count += other.word_count;
        self.long_word_count += other.long_word_count;
        self.sentence_count += other.sentence_count;
    }
}

/// `words / sentences + long_words * 100 / words`, rounded to nearest.
///
/// Undefined, and an [`Error::Division`], when either count is zero.
pub fn lix(stats: ContentStats) -> Result<u32> {
    let ContentStats {
        word_count,
        long_word_count,
        sentence_count,
    } = stats;
    if word_count == 0 || sentence_count == 0 {
        return Err(Error::Division {
            words: word_count,
            sentences: sentence_count,
        });
    }
    let words = word_count as f64;
    let score = words / sentence_count as f64 + long_word_count as f64 * 100.0 / words;
    Ok(score.round() as u32)
}

static LIX_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)lix(?:-tal)?:?\s*([0-9]{1,2})").expect("valid LIX literal pattern")
});

/// Find a printed score such as `LIX: 32` or `Lix-tal 28` in `text`.
///
/// The word must not continue a longer word ("Felix 30"), and the number
/// must not continue into more digits ("LIX 142") or a range ("LIX 30-35").
pub fn find_lix_in_text(text: &str) -> Option<u32> {
    let mut pos = 0;
    while let Some(caps) = LIX_LITERAL.captures_at(text, pos) {
        let whole = caps.get(0)?;
        let digits = caps.get(1)?;

        let preceded_by_letter = text[..whole.start()]
            .chars()
            .next_back()
            .is_some_and(char::is_alphabetic);
        if !preceded_by_letter && !continues_number(&text[digits.end()..]) {
            return digits.as_str().parse().ok();
        }
        // "l" is ASCII, so the next char boundary is one byte on.
        pos = whole.start() + 1;
    }
    None
}

fn continues_number(rest: &str) -> bool {
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('-' | '\u{2013}') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

/// Whether `path` names a colophon document (`colophon`, `kolofon`).
pub fn is_colophon(path: &str) -> bool {
    let name = path.rsplit('/').next().unwrap_or(path).to_lowercase();
    name.contains("colophon") || name.contains("kolofon")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lix_formula() {
        assert_eq!(lix(ContentStats::new(40, 8, 4)).unwrap(), 30);
        assert_eq!(lix(ContentStats::new(100, 5, 5)).unwrap(), 25);
        // 10/3 + 0 = 3.33
        assert_eq!(lix(ContentStats::new(10, 0, 3)).unwrap(), 3);
        // 7/2 + 0 = 3.5 rounds away from zero
        assert_eq!(lix(ContentStats::new(7, 0, 2)).unwrap(), 4);
    }

    #[test]
    fn test_lix_undefined() {
        assert!(matches!(
            lix(ContentStats::new(0, 0, 3)),
            Err(Error::Division {
                words: 0,
                sentences: 3
            })
        ));
        assert!(matches!(
            lix(ContentStats::new(12, 1, 0)),
            Err(Error::Division { sentences: 0, .. })
        ));
    }

    #[test]
    fn test_stats_add() {
        let mut total = ContentStats::default();
        total += ContentStats::new(10, 2, 1);
        total += ContentStats::new(5, 1, 2);
        assert_eq!(total, ContentStats::new(15, 3, 3));
    }

    #[test]
    fn test_find_lix_variants() {
        assert_eq!(find_lix_in_text("Forfatterens LIX-tal: 42."), Some(42));
        assert_eq!(find_lix_in_text("lix 7"), Some(7));
        assert_eq!(find_lix_in_text("Bogens Lix:33, svær"), Some(33));
        assert_eq!(find_lix_in_text("LIX-TAL\u{a0}19"), Some(19));
    }

    #[test]
    fn test_find_lix_rejections() {
        assert_eq!(find_lix_in_text("LIX142"), None);
        assert_eq!(find_lix_in_text("Felix 30 år"), None);
        assert_eq!(find_lix_in_text("LIX 30-35"), None);
        assert_eq!(find_lix_in_text("LIX 30\u{2013}35"), None);
        assert_eq!(find_lix_in_text("ingen score"), None);
    }

    #[test]
    fn test_find_lix_takes_first_valid_hit() {
        assert_eq!(find_lix_in_text("Felix 12, LIX 20-25 og LIX: 24"), Some(24));
        assert_eq!(find_lix_in_text("LIX 30- og mere"), Some(30));
    }

    #[test]
    fn test_is_colophon() {
        assert!(is_colophon("OEBPS/Text/colophon.xhtml"));
        assert!(is_colophon("OEBPS/Kolofon.xhtml"));
        assert!(!is_colophon("OEBPS/colophon/chapter1.xhtml"));
        assert!(!is_colophon("OEBPS/chapter1.xhtml"));
    }
}
