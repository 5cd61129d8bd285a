//! HTML ingest through `scraper` and serialization through html5ever.

use std::io;

use html5ever::serialize::{serialize, Serialize, SerializeOpts, Serializer, TraversalScope};
use html5ever::{LocalName, Namespace, QualName};
use scraper::{ElementRef, Html, Node};
use tracing::debug;

use crate::document::{Document, NodeData};
use crate::ids::NodeId;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

impl Document {
    /// Parse a full HTML document. Comments, doctypes and processing instructions are dropped.
    pub fn parse_html(source: &str) -> Self {
        let html = Html::parse_document(source);
        let root_ref = html.root_element();
        let mut doc = Document::with_root(root_ref.value().name());
        let root = doc.root();
        copy_attributes(&mut doc, root, root_ref);

        let mut stack: Vec<(ElementRef<'_>, NodeId)> = vec![(root_ref, root)];
        while let Some((source_el, target)) = stack.pop() {
            for child in source_el.children() {
                match child.value() {
                    Node::Element(el) => {
                        let node = doc.create_element(el.name());
                        if let Some(child_ref) = ElementRef::wrap(child) {
                            copy_attributes(&mut doc, node, child_ref);
                            stack.push((child_ref, node));
                        }
                        // Freshly created nodes never form a cycle.
                        let _ = doc.append_child(target, node);
                    }
                    Node::Text(text) => {
                        let content: &str = text;
                        let _ = doc.append_text(target, content);
                    }
                    _ => {}
                }
            }
        }
        debug!(elements = doc.element_count(), "dom.parsed");
        doc
    }

    /// Serialize the connected tree back to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::from("<!DOCTYPE html>");
        out.push_str(&self.outer_html(self.root()));
        out
    }

    /// Serialize the subtree rooted at `node` with html5ever's serializer.
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut buf = Vec::new();
        let opts = SerializeOpts {
            traversal_scope: TraversalScope::IncludeNode,
            ..SerializeOpts::default()
        };
        if let Err(err) = serialize(&mut buf, &Subtree { doc: self, node }, opts) {
            debug!(%node, error = %err, "dom.serialize_failed");
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// A node and its descendants, as html5ever sees them.
struct Subtree<'a> {
    doc: &'a Document,
    node: NodeId,
}

impl Serialize for Subtree<'_> {
    fn serialize<S: Serializer>(
        &self,
        serializer: &mut S,
        traversal_scope: TraversalScope,
    ) -> io::Result<()> {
        match traversal_scope {
            TraversalScope::IncludeNode => write_node(self.doc, self.node, serializer),
            TraversalScope::ChildrenOnly(_) => self
                .doc
                .children(self.node)
                .iter()
                .try_for_each(|child| write_node(self.doc, *child, serializer)),
        }
    }
}

fn write_node<S: Serializer>(doc: &Document, node: NodeId, serializer: &mut S) -> io::Result<()> {
    match doc.data(node) {
        Some(NodeData::Text(text)) => serializer.write_text(text),
        Some(NodeData::Element(el)) => {
            let name = QualName::new(
                None,
                Namespace::from(HTML_NAMESPACE),
                LocalName::from(el.tag.as_str()),
            );
            let attributes = doc.attributes(node);
            let names: Vec<QualName> = attributes
                .iter()
                .map(|(key, _)| {
                    QualName::new(None, Namespace::from(""), LocalName::from(key.as_str()))
                })
                .collect();
            let attrs = names
                .iter()
                .zip(attributes)
                .map(|(name, (_, value))| (name, value.as_str()));
            serializer.start_elem(name.clone(), attrs)?;
            for child in doc.children(node) {
                write_node(doc, *child, serializer)?;
            }
            serializer.end_elem(name)
        }
        None => Ok(()),
    }
}

fn copy_attributes(doc: &mut Document, node: NodeId, source: ElementRef<'_>) {
    for (name, value) in source.value().attrs() {
        let _ = doc.set_attribute(node, name, value);
    }
}
