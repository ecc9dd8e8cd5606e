//! Prose extraction from content documents.
//!
//! Each document is parsed into a [`Dom`], footnote markers and navigation
//! are dropped, and the text of its paragraphs (or of `body` when it has no
//! paragraphs) is normalized into a single string.

use crate::dom::{Dom, MarkupError, NodeData, NodeId, parse_html, parse_xml};
use crate::epub::Container;
use crate::error::{Error, Result};
use crate::text::{clean_block, join_blocks};
use crate::util::decode_text;

/// Cleaned prose of one content document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    pub path: String,
    pub text: String,
}

/// Read, parse and clean the document at `path`.
///
/// Returns `Ok(None)` when the document holds no text.
pub fn extract_item(container: &Container, path: &str) -> Result<Option<ContentItem>> {
    let bytes = container.read_entry(path)?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(Error::NotFound(format!("{path} (empty entry)")));
    }

    let source = decode_text(&bytes);
    let dom = parse_markup(&source).map_err(|e| Error::Parse {
        path: path.to_string(),
        reason: e.to_string(),
    })?;

    let text = document_text(&dom);
    if text.is_empty() {
        log::debug!("{path}: no text");
        return Ok(None);
    }
    Ok(Some(ContentItem {
        path: path.to_string(),
        text,
    }))
}

/// Strict XML first, then html5ever.
pub fn parse_markup(source: &str) -> std::result::Result<Dom, MarkupError> {
    match parse_xml(source) {
        Ok(dom) => Ok(dom),
        Err(strict) => {
            log::debug!("not well-formed XML ({strict}), parsing as HTML");
            parse_html(source)
        }
    }
}

/// Cleaned text of a parsed document: paragraph blocks, or the body when
/// there are no non-empty paragraphs.
pub fn document_text(dom: &Dom) -> String {
    let mut paragraphs = Vec::new();
    collect_paragraphs(dom, dom.document(), &mut paragraphs);

    let blocks = if paragraphs.is_empty() {
        let root = find_element(dom, dom.document(), "body").unwrap_or(dom.document());
        let mut text = String::new();
        gather_text(dom, root, &mut text);
        vec![text]
    } else {
        paragraphs
    };

    join_blocks(blocks.iter().map(|block| clean_block(block)))
}

fn collect_paragraphs(dom: &Dom, id: NodeId, out: &mut Vec<String>) {
    for &child in dom.children(id) {
        if is_noise(dom, child) {
            continue;
        }
        if dom.tag(child) == Some("p") {
            let mut text = String::new();
            gather_text(dom, child, &mut text);
            if !text.trim().is_empty() {
                out.push(text);
            }
        } else {
            collect_paragraphs(dom, child, out);
        }
    }
}

fn find_element(dom: &Dom, id: NodeId, tag: &str) -> Option<NodeId> {
    dom.descendants(id).find(|&node| dom.tag(node) == Some(tag))
}

/// Append the text under `id` to `out`, skipping noise and turning `br`
/// into a space.
fn gather_text(dom: &Dom, id: NodeId, out: &mut String) {
    for &child in dom.children(id) {
        let Some(node) = dom.get(child) else { continue };
        match &node.data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Element { .. } if dom.tag(child) == Some("br") => out.push(' '),
            NodeData::Element { .. } if is_noise(dom, child) => {}
            NodeData::Element { .. } => gather_text(dom, child, out),
            NodeData::Document | NodeData::Comment => {}
        }
    }
}

/// Footnote markers, navigation and non-prose elements.
fn is_noise(dom: &Dom, id: NodeId) -> bool {
    match dom.tag(id) {
        Some("sup" | "nav" | "script" | "style" | "head") => true,
        Some(_) => dom
            .attr(id, "epub:type")
            .is_some_and(|types| types.split_whitespace().any(|t| t.contains("noteref"))),
        None => false,
    }
}
