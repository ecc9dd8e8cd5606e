//! html5ever TreeSink building a [`Dom`], used for lenient HTML parsing.

use std::borrow::Cow;
use std::cell::RefCell;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute as HtmlAttribute, QualName};

use super::MarkupError;
use super::arena::{Attribute, Dom, NodeData, NodeId};

/// Parse `source` the way a browser would, recovering from any error.
///
/// Fails only when the input contains no tag at all.
pub fn parse_html(source: &str) -> Result<Dom, MarkupError> {
    if !contains_tag(source) {
        return Err(MarkupError::NoMarkup);
    }
    let sink = parse_document(DomSink::default(), ParseOpts::default())
        .from_utf8()
        .one(source.as_bytes());
    Ok(sink.into_dom())
}

fn contains_tag(source: &str) -> bool {
    source
        .as_bytes()
        .windows(2)
        .any(|w| w[0] == b'<' && (w[1].is_ascii_alphabetic() || w[1] == b'!'))
}

/// Interior mutability is required: TreeSink methods take `&self`.
#[derive(Default)]
pub struct DomSink {
    dom: RefCell<Dom>,
}

impl DomSink {
    pub fn into_dom(self) -> Dom {
        self.dom.into_inner()
    }
}

fn convert_attrs(attrs: Vec<HtmlAttribute>) -> Vec<Attribute> {
    attrs
        .into_iter()
        .map(|a| Attribute {
            name: match &a.name.prefix {
                Some(prefix) => format!("{}:{}", prefix, a.name.local),
                None => a.name.local.to_string(),
            },
            value: a.value.to_string(),
        })
        .collect()
}

impl TreeSink for DomSink {
    type Handle = NodeId;
    type Output = Self;
    type ElemName<'a>
        = &'a QualName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        log::trace!("html recovery: {msg}");
    }

    fn get_document(&self) -> NodeId {
        self.dom.borrow().document()
    }

    fn elem_name<'a>(&'a self, target: &'a NodeId) -> Self::ElemName<'a> {
        static NONE: QualName = QualName {
            prefix: None,
            ns: html5ever::ns!(),
            local: html5ever::local_name!(""),
        };

        let dom = self.dom.borrow();
        match dom.get(*target).map(|n| &n.data) {
            Some(NodeData::Element { name, .. }) => {
                let name: &QualName = name;
                // SAFETY: element names are boxed and never replaced or freed
                // while the sink lives, so the pointee outlives the RefCell
                // guard dropped here.
                unsafe { &*(name as *const QualName) }
            }
            _ => &NONE,
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<HtmlAttribute>,
        _flags: ElementFlags,
    ) -> NodeId {
        self.dom
            .borrow_mut()
            .create_element(name, convert_attrs(attrs))
    }

    fn create_comment(&self, _text: StrTendril) -> NodeId {
        self.dom.borrow_mut().create_comment()
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> NodeId {
        self.dom.borrow_mut().create_comment()
    }

    fn append(&self, parent: &NodeId, child: NodeOrText<NodeId>) {
        let mut dom = self.dom.borrow_mut();
        match child {
            NodeOrText::AppendNode(node) => dom.append(*parent, node),
            NodeOrText::AppendText(text) => dom.append_text(*parent, &text),
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &NodeId,
        prev_element: &NodeId,
        child: NodeOrText<NodeId>,
    ) {
        let has_parent = self
            .dom
            .borrow()
            .get(*element)
            .is_some_and(|n| n.parent.is_some());
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
    }

    fn get_template_contents(&self, target: &NodeId) -> NodeId {
        *target
    }

    fn same_node(&self, x: &NodeId, y: &NodeId) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &NodeId, new_node: NodeOrText<NodeId>) {
        let mut dom = self.dom.borrow_mut();
        match new_node {
            NodeOrText::AppendNode(node) => dom.insert_before(*sibling, node),
            NodeOrText::AppendText(text) => dom.insert_text_before(*sibling, &text),
        }
    }

    fn add_attrs_if_missing(&self, target: &NodeId, attrs: Vec<HtmlAttribute>) {
        self.dom
            .borrow_mut()
            .add_attrs_if_missing(*target, convert_attrs(attrs));
    }

    fn remove_from_parent(&self, target: &NodeId) {
        self.dom.borrow_mut().detach(*target);
    }

    fn reparent_children(&self, node: &NodeId, new_parent: &NodeId) {
        self.dom.borrow_mut().reparent_children(*node, *new_parent);
    }
}
