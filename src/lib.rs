//! # lixbook
//!
//! Readability statistics for EPUB ebooks.
//!
//! lixbook reads the content documents of an EPUB, extracts their prose and
//! computes the LIX readability index for each document and for the whole
//! book. Documents whose score lies far from the rest are discarded, and a
//! score printed in the book's colophon takes precedence over the computed
//! one.
//!
//! ## Quick Start
//!
//! ```no_run
//! let analysis = lixbook::analyze_epub("book.epub").unwrap();
//! println!("LIX {}", analysis.lix);
//! for item in &analysis.items {
//!     println!("{}: {}", item.title, item.lix);
//! }
//! ```
//!
//! ## Options
//!
//! ```no_run
//! use lixbook::{AnalysisOptions, Container, ContentOrder, analyze};
//!
//! let container = Container::open("book.epub").unwrap();
//! let options = AnalysisOptions::new()
//!     .with_deviation_cap(15.0)
//!     .with_content_order(ContentOrder::Manifest);
//! let analysis = analyze(&container, &options).unwrap();
//! ```
//!
//! ## LIX
//!
//! ```
//! use lixbook::{ContentStats, lix};
//!
//! // 40 words, 8 of them long, in 4 sentences: 40/4 + 8*100/40
//! assert_eq!(lix(ContentStats::new(40, 8, 4)).unwrap(), 30);
//! ```

pub mod analyze;
pub mod dom;
pub mod epub;
pub mod error;
pub mod extract;
pub mod lix;
pub mod text;
pub(crate) mod util;

#[cfg(test)]
mod test_helpers;

pub use analyze::{AnalysisOptions, analyze, analyze_epub, analyze_epub_bytes};
pub use epub::{Container, ContentOrder, PackageDocument};
pub use error::{Error, Result};
pub use extract::ContentItem;
pub use lix::{
    Analysis, AnalysisStats, ContentStats, ItemStats, SkipReason, SkippedItem, find_lix_in_text,
    lix,
};
pub use text::{TokenizedContent, tokenize};
