//! Arena-backed element tree.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::trace;

use crate::error::{DomError, DomResult};
use crate::events::MutationRecord;
use crate::css::Selector;
use crate::ids::NodeId;
use crate::{mutation_bus, MutationBus, Rect, Viewport};

const MUTATION_CAPACITY: usize = 256;

/// Document shared between the host and the suppression core.
pub type SharedDocument = Arc<RwLock<Document>>;

#[derive(Clone, Debug)]
pub struct ElementData {
    pub tag: String,
    attributes: Vec<(String, String)>,
    geometry: Option<Rect>,
}

impl ElementData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
            geometry: None,
        }
    }

    /// Names are stored lowercase; lookups ignore ASCII case.
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Clone, Debug)]
pub enum NodeData {
    Element(ElementData),
    Text(String),
}

#[derive(Clone, Debug)]
struct Slot {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena cell. `generation` is bumped every time the cell is freed.
#[derive(Clone, Debug, Default)]
struct Entry {
    generation: u32,
    slot: Option<Slot>,
}

/// Element tree stored in a slot arena.
///
/// Freed slots go on a free list and are handed out again, so the arena never holds more cells
/// than the peak number of live nodes.
pub struct Document {
    entries: Vec<Entry>,
    free: Vec<u32>,
    root: NodeId,
    viewport: Option<Viewport>,
    mutations: MutationBus,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty `<html><head></head><body></body></html>` document.
    pub fn new() -> Self {
        let mut doc = Self::with_root("html");
        let root = doc.root;
        let head = doc.create_element("head");
        let body = doc.create_element("body");
        doc.link(root, head, None);
        doc.link(root, body, None);
        doc
    }

    pub(crate) fn with_root(tag: &str) -> Self {
        let (mutations, _) = mutation_bus(MUTATION_CAPACITY);
        Self {
            entries: vec![Entry {
                generation: 0,
                slot: Some(Slot {
                    data: NodeData::Element(ElementData::new(tag)),
                    parent: None,
                    children: Vec::new(),
                }),
            }],
            free: Vec::new(),
            root: NodeId::new(0, 0),
            viewport: None,
            mutations,
        }
    }

    pub fn into_shared(self) -> SharedDocument {
        Arc::new(RwLock::new(self))
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn body(&self) -> Option<NodeId> {
        self.child_with_tag(self.root, "body")
    }

    pub fn head(&self) -> Option<NodeId> {
        self.child_with_tag(self.root, "head")
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    /// Subscribe to child-list mutations published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<MutationRecord> {
        self.mutations.subscribe()
    }

    pub fn exists(&self, node: NodeId) -> bool {
        self.slot(node).is_ok()
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.element(node).is_ok()
    }

    pub fn is_connected(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if current == self.root {
                return true;
            }
            match self.slot(current).ok().and_then(|slot| slot.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).ok().map(|el| el.tag.as_str())
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).ok().and_then(|el| el.attribute(name))
    }

    pub fn attributes(&self, node: NodeId) -> &[(String, String)] {
        match self.element(node) {
            Ok(el) => &el.attributes,
            Err(_) => &[],
        }
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> DomResult<()> {
        let el = self.element_mut(node)?;
        let name = name.to_ascii_lowercase();
        match el.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => el.attributes.push((name, value.to_string())),
        }
        Ok(())
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> DomResult<bool> {
        let el = self.element_mut(node)?;
        let before = el.attributes.len();
        el.attributes.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
        Ok(el.attributes.len() != before)
    }

    /// Raw `class` attribute, empty when absent.
    pub fn class_name(&self, node: NodeId) -> &str {
        self.attribute(node, "class").unwrap_or("")
    }

    /// Raw `id` attribute, empty when absent.
    pub fn element_id(&self, node: NodeId) -> &str {
        self.attribute(node, "id").unwrap_or("")
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.class_name(node)
            .split_whitespace()
            .any(|token| token == class)
    }

    /// Add a class token. Returns `false` when the token was already present.
    pub fn add_class(&mut self, node: NodeId, class: &str) -> DomResult<bool> {
        if self.has_class(node, class) {
            return Ok(false);
        }
        let current = self.element(node)?.attribute("class").unwrap_or("");
        let updated = if current.trim().is_empty() {
            class.to_string()
        } else {
            format!("{} {}", current.trim_end(), class)
        };
        self.set_attribute(node, "class", &updated)?;
        Ok(true)
    }

    /// Remove a class token. Drops the attribute once no token remains.
    pub fn remove_class(&mut self, node: NodeId, class: &str) -> DomResult<bool> {
        if !self.has_class(node, class) {
            self.element(node)?;
            return Ok(false);
        }
        let remaining: Vec<&str> = self
            .class_name(node)
            .split_whitespace()
            .filter(|token| *token != class)
            .collect();
        if remaining.is_empty() {
            self.remove_attribute(node, "class")?;
        } else {
            let joined = remaining.join(" ");
            self.set_attribute(node, "class", &joined)?;
        }
        Ok(true)
    }

    /// Bounding box of a connected element, when the host supplied layout.
    pub fn geometry(&self, node: NodeId) -> DomResult<Rect> {
        if !self.is_connected(node) {
            return Err(DomError::GeometryUnavailable(node));
        }
        self.element(node)?
            .geometry
            .ok_or(DomError::GeometryUnavailable(node))
    }

    pub fn set_geometry(&mut self, node: NodeId, rect: Rect) -> DomResult<()> {
        self.element_mut(node)?.geometry = Some(rect);
        Ok(())
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.allocate(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.allocate(NodeData::Text(text.to_string()))
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.attach(parent, child, None)
    }

    pub fn insert_first_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.attach(parent, child, Some(0))
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> DomResult<NodeId> {
        let node = self.create_text(text);
        self.attach(parent, node, None)?;
        Ok(node)
    }

    /// Create an element with attributes and append it under `parent`.
    pub fn append_element(
        &mut self,
        parent: NodeId,
        tag: &str,
        attributes: &[(&str, &str)],
    ) -> DomResult<NodeId> {
        let node = self.create_element(tag);
        for (name, value) in attributes {
            self.set_attribute(node, name, value)?;
        }
        self.attach(parent, node, None)?;
        Ok(node)
    }

    /// Detach `node` and free its whole subtree. Handles into the subtree go stale.
    pub fn remove(&mut self, node: NodeId) -> DomResult<()> {
        if node == self.root {
            return Err(DomError::RootRemoval);
        }
        let connected = self.is_connected(node);
        let parent = self.slot(node)?.parent;
        if let Some(parent) = parent {
            self.unlink(parent, node);
        }

        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if let Some(slot) = self.release(current) {
                stack.extend(slot.children);
            }
        }

        if let (Some(parent), true) = (parent, connected) {
            self.publish(MutationRecord::ChildRemoved {
                parent,
                child: node,
            });
        }
        Ok(())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.slot(node).ok().and_then(|slot| slot.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        match self.slot(node) {
            Ok(slot) => &slot.children,
            Err(_) => &[],
        }
    }

    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node)
            .iter()
            .copied()
            .filter(|child| self.is_element(*child))
            .collect()
    }

    /// Inclusive containment, like `Node.contains`.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Connected elements in document order.
    pub fn elements(&self) -> Vec<NodeId> {
        self.elements_under(self.root)
    }

    /// Elements of the subtree rooted at `node` (inclusive) in document order.
    pub fn elements_under(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let Ok(slot) = self.slot(current) else {
                continue;
            };
            if matches!(slot.data, NodeData::Element(_)) {
                out.push(current);
            }
            stack.extend(slot.children.iter().rev().copied());
        }
        out
    }

    pub fn element_count(&self) -> usize {
        self.elements().len()
    }

    /// Live nodes, connected or not.
    pub fn live_nodes(&self) -> usize {
        self.entries.len() - self.free.len()
    }

    /// Arena cells ever allocated; bounded by the peak of [`Document::live_nodes`].
    pub fn arena_capacity(&self) -> usize {
        self.entries.len()
    }

    /// Content of a text node.
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match self.data(node) {
            Some(NodeData::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Text of the subtree, one space between text nodes. Script and style bodies are skipped.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut parts = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let Ok(slot) = self.slot(current) else {
                continue;
            };
            match &slot.data {
                NodeData::Text(text) => {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        parts.push(trimmed);
                    }
                }
                NodeData::Element(el) => {
                    if matches!(el.tag.as_str(), "script" | "style" | "noscript" | "template") {
                        continue;
                    }
                    stack.extend(slot.children.iter().rev().copied());
                }
            }
        }
        parts.join(" ")
    }

    /// Parse `selectors` and return every connected match in document order.
    pub fn select(&self, selectors: &str) -> DomResult<Vec<NodeId>> {
        let selector = Selector::parse(selectors)?;
        Ok(self.query_all(&selector))
    }

    pub fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        selector.filter(self, self.elements())
    }

    pub fn query_first(&self, selector: &Selector) -> Option<NodeId> {
        self.elements()
            .into_iter()
            .find(|node| selector.matches(self, *node))
    }

    pub fn elements_with_class(&self, class: &str) -> Vec<NodeId> {
        self.elements()
            .into_iter()
            .filter(|node| self.has_class(*node, class))
            .collect()
    }

    pub(crate) fn data(&self, node: NodeId) -> Option<&NodeData> {
        self.slot(node).ok().map(|slot| &slot.data)
    }

    pub(crate) fn element_data(&self, node: NodeId) -> Option<&ElementData> {
        self.element(node).ok()
    }

    fn child_with_tag(&self, parent: NodeId, tag: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|child| self.tag(*child) == Some(tag))
    }

    fn allocate(&mut self, data: NodeData) -> NodeId {
        let slot = Slot {
            data,
            parent: None,
            children: Vec::new(),
        };
        if let Some(index) = self.free.pop() {
            let entry = &mut self.entries[index as usize];
            entry.slot = Some(slot);
            return NodeId::new(index, entry.generation);
        }
        let index = self.entries.len() as u32;
        self.entries.push(Entry {
            generation: 0,
            slot: Some(slot),
        });
        NodeId::new(index, 0)
    }

    /// Free the cell behind `node`, returning what it held.
    fn release(&mut self, node: NodeId) -> Option<Slot> {
        let entry = self.entries.get_mut(node.index())?;
        if entry.generation != node.generation() {
            return None;
        }
        let slot = entry.slot.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(node.index() as u32);
        Some(slot)
    }

    fn attach(&mut self, parent: NodeId, child: NodeId, index: Option<usize>) -> DomResult<()> {
        self.element(parent)?;
        self.slot(child)?;
        if child == self.root || self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        if let Some(previous) = self.slot(child)?.parent {
            let was_connected = self.is_connected(previous);
            self.unlink(previous, child);
            if was_connected {
                self.publish(MutationRecord::ChildRemoved {
                    parent: previous,
                    child,
                });
            }
        }

        self.link(parent, child, index);
        if self.is_connected(parent) {
            trace!(%parent, %child, "dom.child_added");
            self.publish(MutationRecord::ChildAdded { parent, child });
        }
        Ok(())
    }

    fn link(&mut self, parent: NodeId, child: NodeId, index: Option<usize>) {
        if let Ok(slot) = self.slot_mut(parent) {
            match index {
                Some(idx) => slot.children.insert(idx.min(slot.children.len()), child),
                None => slot.children.push(child),
            }
        }
        if let Ok(slot) = self.slot_mut(child) {
            slot.parent = Some(parent);
        }
    }

    fn unlink(&mut self, parent: NodeId, child: NodeId) {
        if let Ok(slot) = self.slot_mut(parent) {
            slot.children.retain(|id| *id != child);
        }
        if let Ok(slot) = self.slot_mut(child) {
            slot.parent = None;
        }
    }

    fn publish(&self, record: MutationRecord) {
        // No subscriber is a normal state.
        let _ = self.mutations.send(record);
    }

    fn slot(&self, node: NodeId) -> DomResult<&Slot> {
        self.entries
            .get(node.index())
            .filter(|entry| entry.generation == node.generation())
            .and_then(|entry| entry.slot.as_ref())
            .ok_or(DomError::StaleNode(node))
    }

    fn slot_mut(&mut self, node: NodeId) -> DomResult<&mut Slot> {
        self.entries
            .get_mut(node.index())
            .filter(|entry| entry.generation == node.generation())
            .and_then(|entry| entry.slot.as_mut())
            .ok_or(DomError::StaleNode(node))
    }

    fn element(&self, node: NodeId) -> DomResult<&ElementData> {
        match &self.slot(node)?.data {
            NodeData::Element(el) => Ok(el),
            NodeData::Text(_) => Err(DomError::NotAnElement(node)),
        }
    }

    fn element_mut(&mut self, node: NodeId) -> DomResult<&mut ElementData> {
        match &mut self.slot_mut(node)?.data {
            NodeData::Element(el) => Ok(el),
            NodeData::Text(_) => Err(DomError::NotAnElement(node)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_has_head_and_body() {
        let doc = Document::new();
        assert_eq!(doc.tag(doc.root()), Some("html"));
        assert!(doc.head().is_some());
        assert!(doc.body().is_some());
    }

    #[test]
    fn class_tokens_are_idempotent_and_reversible() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let div = doc
            .append_element(body, "div", &[("class", "card")])
            .unwrap();

        assert!(doc.add_class(div, "hidden").unwrap());
        assert!(!doc.add_class(div, "hidden").unwrap());
        assert_eq!(doc.class_name(div), "card hidden");

        assert!(doc.remove_class(div, "hidden").unwrap());
        assert_eq!(doc.class_name(div), "card");

        let bare = doc.append_element(body, "span", &[]).unwrap();
        doc.add_class(bare, "hidden").unwrap();
        doc.remove_class(bare, "hidden").unwrap();
        assert_eq!(doc.attribute(bare, "class"), None);
    }

    #[test]
    fn removed_nodes_go_stale() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let outer = doc.append_element(body, "div", &[]).unwrap();
        let inner = doc.append_element(outer, "p", &[]).unwrap();

        doc.remove(outer).unwrap();
        assert!(!doc.exists(outer));
        assert!(!doc.exists(inner));
        assert_eq!(doc.class_name(inner), "");
        assert_eq!(doc.add_class(inner, "x"), Err(DomError::StaleNode(inner)));
        assert_eq!(doc.remove(doc.root()), Err(DomError::RootRemoval));
    }

    #[test]
    fn attribute_names_ignore_case() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        doc.set_attribute(body, "Data-Focus-Shield", "simple").unwrap();
        assert_eq!(doc.attribute(body, "data-focus-shield"), Some("simple"));
        assert_eq!(doc.attribute(body, "DATA-FOCUS-SHIELD"), Some("simple"));

        assert!(doc.remove_attribute(body, "Data-Focus-Shield").unwrap());
        assert_eq!(doc.attribute(body, "data-focus-shield"), None);
        assert!(doc.attributes(body).is_empty());
    }

    #[test]
    fn freed_slots_are_reused_with_a_new_generation() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let first = doc.append_element(body, "div", &[("data-ad-slot", "1")]).unwrap();
        doc.remove(first).unwrap();

        let second = doc.append_element(body, "div", &[("data-ad-slot", "2")]).unwrap();
        assert_eq!(second.index(), first.index());
        assert_ne!(second, first);
        assert!(!doc.exists(first));
        assert_eq!(doc.attribute(first, "data-ad-slot"), None);
        assert_eq!(doc.attribute(second, "data-ad-slot"), Some("2"));
        assert_eq!(doc.add_class(first, "x"), Err(DomError::StaleNode(first)));
    }

    #[test]
    fn rotating_content_keeps_the_arena_bounded() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let baseline = doc.arena_capacity();
        for round in 0..500 {
            let slot = doc
                .append_element(body, "div", &[("class", "ad-rotator")])
                .unwrap();
            doc.append_text(slot, &format!("creative {round}")).unwrap();
            doc.remove(slot).unwrap();
        }
        assert_eq!(doc.arena_capacity(), baseline + 2);
        assert_eq!(doc.live_nodes(), baseline);
    }

    #[test]
    fn geometry_requires_connection_and_layout() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let div = doc.append_element(body, "div", &[]).unwrap();
        assert_eq!(doc.geometry(div), Err(DomError::GeometryUnavailable(div)));

        doc.set_geometry(div, Rect::new(0.0, 0.0, 10.0, 20.0)).unwrap();
        assert_eq!(doc.geometry(div).unwrap().area(), 200.0);

        let loose = doc.create_element("div");
        doc.set_geometry(loose, Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        assert!(doc.geometry(loose).is_err());
    }

    #[test]
    fn elements_are_in_document_order() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let a = doc.append_element(body, "div", &[]).unwrap();
        let a1 = doc.append_element(a, "span", &[]).unwrap();
        let b = doc.append_element(body, "div", &[]).unwrap();
        doc.append_text(a1, "hello").unwrap();

        let order = doc.elements();
        let pos = |id| order.iter().position(|n| *n == id).unwrap();
        assert!(pos(a) < pos(a1));
        assert!(pos(a1) < pos(b));
    }

    #[test]
    fn cycles_are_rejected() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let outer = doc.append_element(body, "div", &[]).unwrap();
        let inner = doc.append_element(outer, "div", &[]).unwrap();
        assert_eq!(
            doc.append_child(inner, outer),
            Err(DomError::HierarchyRequest {
                parent: inner,
                child: outer
            })
        );
    }

    #[test]
    fn text_content_skips_scripts() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let p = doc.append_element(body, "p", &[]).unwrap();
        doc.append_text(p, " First. ").unwrap();
        let script = doc.append_element(body, "script", &[]).unwrap();
        doc.append_text(script, "var x = 1;").unwrap();
        doc.append_text(body, "Second.").unwrap();
        assert_eq!(doc.text_content(body), "First. Second.");
    }
}
