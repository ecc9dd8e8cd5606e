//! Error types for lixbook operations.

use thiserror::Error;

/// Errors that can occur while analyzing a book.
///
/// [`Error::Format`] is fatal to a whole run. [`Error::NotFound`],
/// [`Error::Parse`] and [`Error::Division`] describe a single content
/// document; the pipeline records them and moves on.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The container or its package document is structurally invalid.
    #[error("Invalid EPUB: {0}")]
    Format(String),

    /// A declared content entry is missing, empty or unreadable.
    #[error("Entry not found: {0}")]
    NotFound(String),

    /// A content document could not be parsed as XML or as HTML.
    #[error("Cannot parse {path}: {reason}")]
    Parse { path: String, reason: String },

    /// The LIX score is undefined because a count is zero.
    #[error("LIX undefined: {words} words in {sentences} sentences")]
    Division { words: usize, sentences: usize },
}

impl Error {
    /// Whether this error aborts a whole analysis run.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Error::NotFound(_) | Error::Parse { .. } | Error::Division { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
