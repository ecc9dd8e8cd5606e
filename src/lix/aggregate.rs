//! Whole-book totals and the final analysis report.

use std::cmp::Ordering;

use super::outlier::{mean, median};
use super::score::{ContentStats, lix};
use crate::error::Result;
use crate::text::TokenizedContent;

/// A content document with a defined LIX score.
#[derive(Debug, Clone)]
pub struct ScoredItem {
    /// File name of the document without its extension.
    pub title: String,
    pub path: String,
    pub generated_lix: u32,
    pub stats: ContentStats,
    pub tokens: TokenizedContent,
}

/// Per-document line of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ItemStats {
    pub title: String,
    pub path: String,
    pub lix: u32,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub stats: ContentStats,
}

impl From<&ScoredItem> for ItemStats {
    fn from(item: &ScoredItem) -> Self {
        Self {
            title: item.title.clone(),
            path: item.path.clone(),
            lix: item.generated_lix,
            stats: item.stats,
        }
    }
}

/// Why a content document did not contribute to the statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SkipReason {
    /// Missing or empty entry.
    NotFound,
    /// Neither XML nor HTML.
    Unparsable,
    /// Parsed, but no text.
    NoText,
    /// No words or no sentences, or a score that rounds to zero.
    Undefined,
    /// Score too far from the median.
    Outlier,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SkippedItem {
    pub path: String,
    pub reason: SkipReason,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AnalysisStats {
    /// Score printed in the book, if any.
    pub found_lix: Option<u32>,
    /// Score of the whole-book totals.
    pub generated_lix: u32,
    pub median_lix: Option<f64>,
    pub mean_lix: Option<f64>,
    pub word_count: usize,
    pub long_word_count: usize,
    pub sentence_count: usize,
}

/// Readability report for one book.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Analysis {
    /// Title from the package metadata.
    pub title: Option<String>,
    /// `dc:language` from the package metadata.
    pub language: Option<String>,
    pub file_byte_size: u64,
    /// The authoritative score: found, else median, else generated.
    pub lix: u32,
    pub stats: AnalysisStats,
    /// Scored documents in natural title order.
    pub items: Vec<ItemStats>,
    pub skipped: Vec<SkippedItem>,
}

/// Combine the surviving items into an [`Analysis`].
///
/// Fails with [`crate::Error::Division`] when the totals have no words or
/// sentences, which only happens for an empty `items`.
pub fn aggregate(
    title: Option<String>,
    file_byte_size: u64,
    items: &[ScoredItem],
    found_lix: Option<u32>,
    skipped: Vec<SkippedItem>,
) -> Result<Analysis> {
    let mut totals = ContentStats::default();
    for item in items {
        totals += item.stats;
    }
    let generated_lix = lix(totals)?;

    let scores: Vec<f64> = items.iter().map(|i| f64::from(i.generated_lix)).collect();
    let median_lix = median(&scores);
    let mean_lix = mean(&scores);

    let resolved = found_lix
        .or(median_lix.map(|m| m.round() as u32))
        .unwrap_or(generated_lix);

    let mut report: Vec<ItemStats> = items.iter().map(ItemStats::from).collect();
    report.sort_by(|a, b| natural_cmp(&a.title, &b.title));

    Ok(Analysis {
        title,
        language: None,
        file_byte_size,
        lix: resolved,
        stats: AnalysisStats {
            found_lix,
            generated_lix,
            median_lix,
            mean_lix,
            word_count: totals.word_count,
            long_word_count: totals.long_word_count,
            sentence_count: totals.sentence_count,
        },
        items: report,
        skipped,
    })
}

/// Case-insensitive ordering that compares digit runs by value, so
/// `chapter2` sorts before `chapter10`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let x = take_digits(&mut left);
                let y = take_digits(&mut right);
                let ord = compare_numbers(&x, &y);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                let ord = x.to_lowercase().cmp(y.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        digits.push(c);
    }
    digits
}

fn compare_numbers(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
