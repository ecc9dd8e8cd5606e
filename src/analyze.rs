//! The analysis pipeline: container to [`Analysis`].

use std::path::Path;

use percent_encoding::percent_decode_str;
use rayon::prelude::*;

use crate::epub::{Container, ContentOrder, PackageDocument};
use crate::error::{Error, Result};
use crate::extract::{ContentItem, extract_item};
use crate::lix::{
    Analysis, DEFAULT_DEVIATION_CAP, ScoredItem, SkipReason, SkippedItem, aggregate,
    filter_outliers, find_lix_in_text, is_colophon, lix,
};
use crate::text::tokenize;
use crate::util::file_stem;

/// Settings for [`analyze`].
///
/// ```
/// use lixbook::{AnalysisOptions, ContentOrder};
///
/// let options = AnalysisOptions::new()
///     .with_deviation_cap(8.0)
///     .with_content_order(ContentOrder::Manifest);
/// assert_eq!(options.deviation_cap, 8.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisOptions {
    /// Outliers are only removed when the standard deviation of the item
    /// scores exceeds this.
    pub deviation_cap: f64,
    pub content_order: ContentOrder,
}

impl AnalysisOptions {
    pub fn new() -> Self {
        Self {
            deviation_cap: DEFAULT_DEVIATION_CAP,
            content_order: ContentOrder::default(),
        }
    }

    pub fn with_deviation_cap(mut self, cap: f64) -> Self {
        self.deviation_cap = cap;
        self
    }

    pub fn with_content_order(mut self, order: ContentOrder) -> Self {
        self.content_order = order;
        self
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Analyze the EPUB at `path` with default options.
pub fn analyze_epub<P: AsRef<Path>>(path: P) -> Result<Analysis> {
    let container = Container::open(path)?;
    analyze(&container, &AnalysisOptions::default())
}

/// Analyze an EPUB held in memory with default options.
pub fn analyze_epub_bytes(data: Vec<u8>) -> Result<Analysis> {
    let container = Container::from_bytes(data)?;
    analyze(&container, &AnalysisOptions::default())
}

/// What became of one content document.
enum ItemOutcome {
    Scored(ContentItem, ScoredItem),
    /// Has text, so it can still hold a printed score, but no LIX.
    Unscored(ContentItem, SkippedItem),
    Skipped(SkippedItem),
}

/// Score every content document of `container` and aggregate the results.
///
/// Documents that are missing, unparsable, textless or unscorable are
/// logged and listed in [`Analysis::skipped`]. Only container-level
/// problems, or having no scorable document at all, fail the run.
pub fn analyze(container: &Container, options: &AnalysisOptions) -> Result<Analysis> {
    let package = PackageDocument::load(container)?;
    let paths = package.content_paths(options.content_order)?;
    log::debug!("analyzing {} content documents", paths.len());

    let outcomes: Vec<ItemOutcome> = paths
        .par_iter()
        .map(|path| process_item(container, path))
        .collect::<Result<_>>()?;

    let mut contents = Vec::new();
    let mut scored = Vec::new();
    let mut skipped = Vec::new();
    for outcome in outcomes {
        match outcome {
            ItemOutcome::Scored(content, item) => {
                contents.push(content);
                scored.push(item);
            }
            ItemOutcome::Unscored(content, skip) => {
                contents.push(content);
                skipped.push(skip);
            }
            ItemOutcome::Skipped(skip) => skipped.push(skip),
        }
    }

    if scored.is_empty() {
        return Err(Error::Format(format!(
            "none of {} content documents could be scored",
            paths.len()
        )));
    }

    let found_lix = search_printed_lix(&contents);
    if let Some(found) = found_lix {
        log::debug!("book states its own LIX: {found}");
    }

    let split = filter_outliers(scored, |item| item.generated_lix, options.deviation_cap);
    for item in &split.removed {
        log::info!("{}: LIX {} is an outlier", item.path, item.generated_lix);
        skipped.push(SkippedItem {
            path: item.path.clone(),
            reason: SkipReason::Outlier,
            detail: format!("LIX {}", item.generated_lix),
        });
    }

    let mut analysis = aggregate(
        package.title,
        container.byte_size() as u64,
        &split.kept,
        found_lix,
        skipped,
    )?;
    analysis.language = package.language;
    Ok(analysis)
}

/// Extract and score one document. Only fatal errors escape; item-level
/// failures become skipped outcomes.
fn process_item(container: &Container, path: &str) -> Result<ItemOutcome> {
    let content = match extract_item(container, path) {
        Ok(Some(content)) => content,
        Ok(None) => return Ok(skip(path, SkipReason::NoText, "no text".to_string())),
        Err(e) if e.is_fatal() => return Err(e),
        Err(e) => {
            let reason = match e {
                Error::Parse { .. } => SkipReason::Unparsable,
                _ => SkipReason::NotFound,
            };
            return Ok(skip(path, reason, e.to_string()));
        }
    };

    let tokens = tokenize(&content.text);
    let stats = tokens.stats();
    match lix(stats) {
        // A score that rounds to zero carries no more information than an
        // undefined one and is excluded the same way.
        Ok(0) => {
            log::warn!("{path}: LIX rounds to 0");
            let skip = SkippedItem {
                path: path.to_string(),
                reason: SkipReason::Undefined,
                detail: format!(
                    "LIX rounds to 0: {} words in {} sentences",
                    stats.word_count, stats.sentence_count
                ),
            };
            Ok(ItemOutcome::Unscored(content, skip))
        }
        Ok(generated_lix) => {
            let item = ScoredItem {
                title: percent_decode_str(file_stem(path))
                    .decode_utf8_lossy()
                    .into_owned(),
                path: path.to_string(),
                generated_lix,
                stats,
                tokens,
            };
            Ok(ItemOutcome::Scored(content, item))
        }
        Err(e) => {
            log::warn!("{path}: {e}");
            let skip = SkippedItem {
                path: path.to_string(),
                reason: SkipReason::Undefined,
                detail: e.to_string(),
            };
            Ok(ItemOutcome::Unscored(content, skip))
        }
    }
}

fn skip(path: &str, reason: SkipReason, detail: String) -> ItemOutcome {
    log::warn!("{path}: skipped, {detail}");
    ItemOutcome::Skipped(SkippedItem {
        path: path.to_string(),
        reason,
        detail,
    })
}

/// Colophon documents first, then every document in container order.
fn search_printed_lix(contents: &[ContentItem]) -> Option<u32> {
    let colophons = contents.iter().filter(|c| is_colophon(&c.path));
    colophons
        .chain(contents.iter())
        .find_map(|c| find_lix_in_text(&c.text))
}
