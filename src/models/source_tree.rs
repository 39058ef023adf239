//! Read-only arena representation of a parsed UBZ XML file (a page or the
//! RDF description).
//!
//! Nodes are stored in a flat vector and addressed by [`NodeId`]. Each node
//! keeps a non-owning back reference to its parent, so searches return ids
//! instead of references into a mutable tree.

use indexmap::IndexMap;

/// Index of a node inside a [`SourceTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// An element of the source document.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceElement {
    /// Local tag name (namespace prefix stripped), e.g. `foreignObject`.
    pub name: String,
    /// Namespace URI of the tag, if any.
    pub namespace: Option<String>,
    /// Attributes keyed by local name, in document order.
    pub attributes: IndexMap<String, String>,
}

impl SourceElement {
    /// Returns the value of the attribute with the given local name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }
}

/// Payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceNodeKind {
    Element(SourceElement),
    Text(String),
}

/// A node of the arena together with its structural links.
#[derive(Debug, Clone)]
pub struct SourceNode {
    pub kind: SourceNodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// The parsed, immutable tree of one source file.
#[derive(Debug, Clone)]
pub struct SourceTree {
    nodes: Vec<SourceNode>,
    root: NodeId,
}

impl SourceTree {
    /// Parses an XML document into a tree rooted at the document element.
    ///
    /// Comments and processing instructions are skipped. Text nodes that only
    /// contain indentation (whitespace with a line break) are dropped, other
    /// text is kept verbatim.
    pub fn parse(xml: &str) -> Result<Self, roxmltree::Error> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let document = roxmltree::Document::parse_with_options(xml, options)?;

        let mut tree = SourceTree {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        tree.root = tree.push_node(document.root_element(), None);
        Ok(tree)
    }

    fn push_node(&mut self, node: roxmltree::Node<'_, '_>, parent: Option<NodeId>) -> NodeId {
        let attributes = node
            .attributes()
            .map(|attr| (attr.name().to_string(), attr.value().to_string()))
            .collect();
        let element = SourceElement {
            name: node.tag_name().name().to_string(),
            namespace: node.tag_name().namespace().map(str::to_string),
            attributes,
        };

        let id = NodeId(self.nodes.len());
        self.nodes.push(SourceNode {
            kind: SourceNodeKind::Element(element),
            parent,
            children: Vec::new(),
        });

        for child in node.children() {
            let child_id = if child.is_element() {
                self.push_node(child, Some(id))
            } else if child.is_text() {
                let text = child.text().unwrap_or_default();
                if is_indentation(text) {
                    continue;
                }
                let child_id = NodeId(self.nodes.len());
                self.nodes.push(SourceNode {
                    kind: SourceNodeKind::Text(text.to_string()),
                    parent: Some(id),
                    children: Vec::new(),
                });
                child_id
            } else {
                continue;
            };
            self.nodes[id.0].children.push(child_id);
        }

        id
    }

    /// The document element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &SourceNode {
        &self.nodes[id.0]
    }

    /// Returns the element stored at `id`, or `None` for text nodes.
    pub fn element(&self, id: NodeId) -> Option<&SourceElement> {
        match &self.node(id).kind {
            SourceNodeKind::Element(element) => Some(element),
            SourceNodeKind::Text(_) => None,
        }
    }

    /// Returns the text stored at `id`, or `None` for elements.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            SourceNodeKind::Text(text) => Some(text),
            SourceNodeKind::Element(_) => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id).children.iter().copied()
    }

    /// Element children of `id`, in document order.
    pub fn child_elements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .filter(move |child| self.element(*child).is_some())
    }

    /// First element child of `id` whose local name is `tag`.
    pub fn find_child_by_tag(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        self.child_elements(id)
            .find(|child| self.element(*child).is_some_and(|e| e.name == tag))
    }

    /// Depth-first (pre-order) search below `id` for an element named `tag`.
    /// `id` itself is not considered.
    pub fn find_descendant_by_tag(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.node(id).children.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if self.element(current).is_some_and(|e| e.name == tag) {
                return Some(current);
            }
            stack.extend(self.node(current).children.iter().rev().copied());
        }
        None
    }

    /// Concatenation of all text below `id`, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.node(id).kind {
            SourceNodeKind::Text(text) => out.push_str(text),
            SourceNodeKind::Element(_) => {
                for child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
        }
    }
}

fn is_indentation(text: &str) -> bool {
    text.trim().is_empty() && text.contains('\n')
}
