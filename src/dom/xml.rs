//! Strict XML parsing of XHTML content documents.

use html5ever::{LocalName, QualName, ns};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::MarkupError;
use super::arena::{Attribute, Dom, NodeId};
use crate::util::{local_name, resolve_entity};

/// Parse `source` as well-formed XML.
///
/// Mismatched or unclosed tags, text outside the root element, several
/// root elements and entities XML does not predefine are all errors, so the
/// caller can fall back to [`super::parse_html`].
pub fn parse_xml(source: &str) -> Result<Dom, MarkupError> {
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(false);

    let mut dom = Dom::new();
    let document = dom.document();
    let mut open: Vec<NodeId> = Vec::new();
    let mut has_root = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let parent = attach_point(&open, document, &mut has_root)?;
                let element = element(&mut dom, &e)?;
                dom.append(parent, element);
                open.push(element);
            }
            Event::Empty(e) => {
                let parent = attach_point(&open, document, &mut has_root)?;
                let element = element(&mut dom, &e)?;
                dom.append(parent, element);
            }
            Event::End(_) => {
                open.pop();
            }
            Event::Text(e) => {
                let text = String::from_utf8_lossy(e.as_ref());
                append_text(&mut dom, &open, &text)?;
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(e.as_ref());
                append_text(&mut dom, &open, &text)?;
            }
            Event::GeneralRef(e) => {
                let entity = String::from_utf8_lossy(e.as_ref());
                let c = resolve_entity(&entity)
                    .ok_or_else(|| MarkupError::UnknownEntity(entity.to_string()))?;
                append_text(&mut dom, &open, c.encode_utf8(&mut [0; 4]))?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(&unclosed) = open.last() {
        let name = dom.tag(unclosed).unwrap_or_default().to_string();
        return Err(MarkupError::Unclosed(name));
    }
    if !has_root {
        return Err(MarkupError::NoRoot);
    }
    Ok(dom)
}

fn attach_point(
    open: &[NodeId],
    document: NodeId,
    has_root: &mut bool,
) -> Result<NodeId, MarkupError> {
    match open.last() {
        Some(&parent) => Ok(parent),
        None if *has_root => Err(MarkupError::MultipleRoots),
        None => {
            *has_root = true;
            Ok(document)
        }
    }
}

fn append_text(dom: &mut Dom, open: &[NodeId], text: &str) -> Result<(), MarkupError> {
    match open.last() {
        Some(&parent) => {
            dom.append_text(parent, text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(MarkupError::TextOutsideRoot),
    }
}

fn element(dom: &mut Dom, e: &BytesStart<'_>) -> Result<NodeId, MarkupError> {
    let name = e.name();
    let local = String::from_utf8_lossy(local_name(name.as_ref()));
    let qual = QualName::new(None, ns!(html), LocalName::from(local.as_ref()));

    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        attrs.push(Attribute {
            name: String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            value: String::from_utf8_lossy(attr.value.as_ref()).into_owned(),
        });
    }
    Ok(dom.create_element(qual, attrs))
}
