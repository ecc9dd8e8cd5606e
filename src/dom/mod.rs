//! Markup parsing into an immutable arena tree.
//!
//! Content documents are parsed strictly with [`parse_xml`] first; documents
//! that are not well-formed go through html5ever via [`parse_html`].

mod arena;
mod tree_sink;
mod xml;

pub use arena::{Attribute, Descendants, Dom, Node, NodeData, NodeId};
pub use tree_sink::{DomSink, parse_html};
pub use xml::parse_xml;

use thiserror::Error;

/// Why a document could not be parsed.
#[derive(Error, Debug)]
pub enum MarkupError {
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    #[error("unclosed element <{0}>")]
    Unclosed(String),

    #[error("undeclared entity &{0};")]
    UnknownEntity(String),

    #[error("text outside the root element")]
    TextOutsideRoot,

    #[error("more than one root element")]
    MultipleRoots,

    #[error("no root element")]
    NoRoot,

    #[error("no markup found")]
    NoMarkup,
}
