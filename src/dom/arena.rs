//! Arena-allocated document tree.
//!
//! Both the strict XML builder and the html5ever sink produce a [`Dom`].
//! Once built it is only read: extraction walks it with pure queries.

use html5ever::QualName;

/// Index of a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone)]
pub enum NodeData {
    Document,
    Element {
        /// Boxed so the name keeps its address while the arena grows.
        name: Box<QualName>,
        attrs: Vec<Attribute>,
    },
    Text(String),
    Comment,
}

/// Attribute with its qualified name flattened to a string (`epub:type`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// A parsed markup document.
#[derive(Debug)]
pub struct Dom {
    nodes: Vec<Node>,
}

impl Dom {
    const ROOT: NodeId = NodeId(0);

    /// An empty tree holding only the document node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                data: NodeData::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn document(&self) -> NodeId {
        Self::ROOT
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> NodeId {
        self.alloc(NodeData::Element {
            name: Box::new(name),
            attrs,
        })
    }

    pub fn create_text(&mut self, text: String) -> NodeId {
        self.alloc(NodeData::Text(text))
    }

    pub fn create_comment(&mut self) -> NodeId {
        self.alloc(NodeData::Comment)
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.get_mut(parent) {
            node.children.push(child);
        }
    }

    /// Append text, merging into a trailing text child.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        let last = self.get(parent).and_then(|n| n.children.last().copied());
        if let Some(last) = last
            && let Some(Node {
                data: NodeData::Text(existing),
                ..
            }) = self.get_mut(last)
        {
            existing.push_str(text);
            return;
        }
        let node = self.create_text(text.to_string());
        self.append(parent, node);
    }

    /// Insert `new_node` immediately before `sibling`.
    pub fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) {
        let Some(parent) = self.get(sibling).and_then(|n| n.parent) else {
            return;
        };
        self.detach(new_node);
        if let Some(node) = self.get_mut(new_node) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.get_mut(parent) {
            let pos = node
                .children
                .iter()
                .position(|&c| c == sibling)
                .unwrap_or(node.children.len());
            node.children.insert(pos, new_node);
        }
    }

    /// Insert text before `sibling`, merging into a preceding text node.
    pub fn insert_text_before(&mut self, sibling: NodeId, text: &str) {
        let Some(parent) = self.get(sibling).and_then(|n| n.parent) else {
            return;
        };
        let prev = self.get(parent).and_then(|n| {
            let pos = n.children.iter().position(|&c| c == sibling)?;
            pos.checked_sub(1).map(|p| n.children[p])
        });
        if let Some(prev) = prev
            && let Some(Node {
                data: NodeData::Text(existing),
                ..
            }) = self.get_mut(prev)
        {
            existing.push_str(text);
            return;
        }
        let node = self.create_text(text.to_string());
        self.insert_before(sibling, node);
    }

    /// Remove a node from its parent. The node stays in the arena.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.get(id).and_then(|n| n.parent) else {
            return;
        };
        if let Some(node) = self.get_mut(parent) {
            node.children.retain(|&c| c != id);
        }
        if let Some(node) = self.get_mut(id) {
            node.parent = None;
        }
    }

    /// Move every child of `from` to the end of `to`.
    pub fn reparent_children(&mut self, from: NodeId, to: NodeId) {
        let children = self
            .get_mut(from)
            .map(|n| std::mem::take(&mut n.children))
            .unwrap_or_default();
        for child in children {
            if let Some(node) = self.get_mut(child) {
                node.parent = None;
            }
            self.append(to, child);
        }
    }

    /// Add attributes whose names are not already present.
    pub fn add_attrs_if_missing(&mut self, id: NodeId, attrs: Vec<Attribute>) {
        if let Some(Node {
            data: NodeData::Element {
                attrs: existing, ..
            },
            ..
        }) = self.get_mut(id)
        {
            for attr in attrs {
                if !existing.iter().any(|a| a.name == attr.name) {
                    existing.push(attr);
                }
            }
        }
    }
}

/// Read-only queries.
impl Dom {
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Local tag name of an element.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.data {
            NodeData::Element { name, .. } => Some(&*name.local),
            _ => None,
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.get(id)?.data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|a| a.name == name)
                .map(|a| a.value.as_str()),
            _ => None,
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.data {
            NodeData::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// All nodes under `id` (excluding `id`) in document order.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        stack.reverse();
        Descendants { dom: self, stack }
    }

    /// Elements with local name `tag`, in document order.
    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.descendants(self.document())
            .filter(|&id| self.tag(id) == Some(tag))
            .collect()
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-order traversal.
pub struct Descendants<'a> {
    dom: &'a Dom,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.dom.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use html5ever::{LocalName, ns};

    use super::*;

    fn element(dom: &mut Dom, tag: &str) -> NodeId {
        dom.create_element(
            QualName::new(None, ns!(html), LocalName::from(tag)),
            Vec::new(),
        )
    }

    #[test]
    fn test_append_and_traverse() {
        let mut dom = Dom::new();
        let body = element(&mut dom, "body");
        let p1 = element(&mut dom, "p");
        let p2 = element(&mut dom, "p");
        let root = dom.document();
        dom.append(root, body);
        dom.append(body, p1);
        dom.append(body, p2);
        dom.append_text(p1, "Hello ");
        dom.append_text(p1, "world");

        assert_eq!(dom.elements_by_tag("p"), vec![p1, p2]);
        let text = dom.children(p1)[0];
        assert_eq!(dom.text(text), Some("Hello world"));
        let order: Vec<_> = dom.descendants(root).collect();
        assert_eq!(order, vec![body, p1, text, p2]);
    }

    #[test]
    fn test_insert_before_and_detach() {
        let mut dom = Dom::new();
        let body = element(&mut dom, "body");
        let a = element(&mut dom, "a");
        let b = element(&mut dom, "b");
        let root = dom.document();
        dom.append(root, body);
        dom.append(body, b);
        dom.insert_before(b, a);
        assert_eq!(dom.children(body), &[a, b]);

        dom.detach(a);
        assert_eq!(dom.children(body), &[b]);
        assert_eq!(dom.get(a).unwrap().parent, None);
    }

    #[test]
    fn test_reparent_children() {
        let mut dom = Dom::new();
        let from = element(&mut dom, "div");
        let to = element(&mut dom, "section");
        let child = element(&mut dom, "p");
        dom.append(from, child);
        dom.reparent_children(from, to);
        assert!(dom.children(from).is_empty());
        assert_eq!(dom.children(to), &[child]);
        assert_eq!(dom.get(child).unwrap().parent, Some(to));
    }

    #[test]
    fn test_attrs() {
        let mut dom = Dom::new();
        let a = element(&mut dom, "a");
        dom.add_attrs_if_missing(
            a,
            vec![Attribute {
                name: "epub:type".into(),
                value: "noteref".into(),
            }],
        );
        dom.add_attrs_if_missing(
            a,
            vec![Attribute {
                name: "epub:type".into(),
                value: "other".into(),
            }],
        );
        assert_eq!(dom.tag(a), Some("a"));
        assert_eq!(dom.attr(a, "epub:type"), Some("noteref"));
        assert_eq!(dom.attr(a, "href"), None);
    }
}
