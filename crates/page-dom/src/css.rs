//! CSS selectors over the arena tree.
//!
//! Selector text is parsed with `scraper`'s grammar (the same one `scraper::Selector` uses) and
//! matched by the `selectors` engine through [`ElementHandle`], so combinators, structural
//! pseudo-classes and attribute case flags behave the way they do in a browser.

use std::fmt;

use html5ever::Namespace;
use scraper::error::SelectorErrorKind;
use scraper::selector::{CssLocalName, CssString, NonTSPseudoClass, Parser, PseudoElement, Simple};
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::matching::{self, ElementSelectorFlags, MatchingContext};
use selectors::parser::{ParseRelative, SelectorList};
use selectors::{Element, NthIndexCache, OpaqueElement};

use crate::document::Document;
use crate::error::{DomError, DomResult};
use crate::ids::NodeId;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// A parsed selector group (`a, b, c`).
#[derive(Clone, Debug)]
pub struct Selector {
    source: String,
    list: SelectorList<Simple>,
}

impl Selector {
    pub fn parse(source: &str) -> DomResult<Self> {
        let mut input = cssparser::ParserInput::new(source);
        let mut parser = cssparser::Parser::new(&mut input);
        SelectorList::parse(&Parser, &mut parser, ParseRelative::No)
            .map(|list| Self {
                source: source.to_string(),
                list,
            })
            .map_err(|err| DomError::InvalidSelector {
                selector: source.to_string(),
                reason: SelectorErrorKind::from(err).to_string(),
            })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `node` is an element matching any selector of the group.
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let mut cache = NthIndexCache::default();
        self.matches_with_cache(doc, node, &mut cache)
    }

    /// Matching elements among `nodes`, in the given order.
    pub fn filter(&self, doc: &Document, nodes: impl IntoIterator<Item = NodeId>) -> Vec<NodeId> {
        let mut cache = NthIndexCache::default();
        nodes
            .into_iter()
            .filter(|node| self.matches_with_cache(doc, *node, &mut cache))
            .collect()
    }

    fn matches_with_cache(&self, doc: &Document, node: NodeId, cache: &mut NthIndexCache) -> bool {
        let Some(element) = ElementHandle::new(doc, node) else {
            return false;
        };
        let mut context = MatchingContext::new(
            matching::MatchingMode::Normal,
            None,
            cache,
            matching::QuirksMode::NoQuirks,
            matching::NeedsSelectorFlags::No,
            matching::IgnoreNthChildForInvalidation::No,
        );
        matching::matches_selector_list(&self.list, &element, &mut context)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Borrowed view of one element, the unit the `selectors` engine walks.
#[derive(Clone, Copy)]
pub struct ElementHandle<'a> {
    doc: &'a Document,
    node: NodeId,
}

impl<'a> ElementHandle<'a> {
    pub fn new(doc: &'a Document, node: NodeId) -> Option<Self> {
        doc.is_element(node).then_some(Self { doc, node })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    fn wrap(&self, node: NodeId) -> Option<Self> {
        Self::new(self.doc, node)
    }

    /// Siblings (self included) and the position of self among them.
    fn siblings(&self) -> (&'a [NodeId], usize) {
        let siblings = self
            .doc
            .parent(self.node)
            .map(|parent| self.doc.children(parent))
            .unwrap_or(&[]);
        let position = siblings
            .iter()
            .position(|id| *id == self.node)
            .unwrap_or(siblings.len());
        (siblings, position)
    }
}

impl fmt::Debug for ElementHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementHandle")
            .field("node", &self.node)
            .field("tag", &self.doc.tag(self.node))
            .finish()
    }
}

impl<'a> Element for ElementHandle<'a> {
    type Impl = Simple;

    fn opaque(&self) -> OpaqueElement {
        match self.doc.element_data(self.node) {
            Some(data) => OpaqueElement::new(data),
            None => OpaqueElement::new(self.doc),
        }
    }

    fn parent_element(&self) -> Option<Self> {
        self.doc.parent(self.node).and_then(|parent| self.wrap(parent))
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        let (siblings, position) = self.siblings();
        siblings[..position]
            .iter()
            .rev()
            .find_map(|id| self.wrap(*id))
    }

    fn next_sibling_element(&self) -> Option<Self> {
        let (siblings, position) = self.siblings();
        siblings
            .iter()
            .skip(position + 1)
            .find_map(|id| self.wrap(*id))
    }

    fn first_element_child(&self) -> Option<Self> {
        self.doc
            .children(self.node)
            .iter()
            .find_map(|id| self.wrap(*id))
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, name: &CssLocalName) -> bool {
        self.doc.tag(self.node) == Some(&*name.0)
    }

    fn has_namespace(&self, namespace: &Namespace) -> bool {
        &**namespace == HTML_NAMESPACE
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.doc.tag(self.node) == other.doc.tag(other.node)
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&Namespace>,
        local_name: &CssLocalName,
        operation: &AttrSelectorOperation<&CssString>,
    ) -> bool {
        // Attributes never carry a namespace here.
        if let NamespaceConstraint::Specific(url) = ns {
            if !url.is_empty() {
                return false;
            }
        }
        self.doc
            .attributes(self.node)
            .iter()
            .any(|(name, value)| name.as_str() == &*local_name.0 && operation.eval_str(value))
    }

    fn match_non_ts_pseudo_class(
        &self,
        _pc: &NonTSPseudoClass,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        false
    }

    fn match_pseudo_element(
        &self,
        _pe: &PseudoElement,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        false
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        matches!(self.doc.tag(self.node), Some("a" | "area"))
            && self.doc.attribute(self.node, "href").is_some()
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn has_id(&self, id: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        let own = self.doc.element_id(self.node);
        !own.is_empty() && case_sensitivity.eq(id.0.as_bytes(), own.as_bytes())
    }

    fn has_class(&self, name: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.doc
            .class_name(self.node)
            .split_whitespace()
            .any(|token| case_sensitivity.eq(name.0.as_bytes(), token.as_bytes()))
    }

    fn imported_part(&self, _name: &CssLocalName) -> Option<CssLocalName> {
        None
    }

    fn is_part(&self, _name: &CssLocalName) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        !self.doc.children(self.node).iter().any(|child| {
            self.doc.is_element(*child) || self.doc.text(*child).map_or(false, |t| !t.is_empty())
        })
    }

    fn is_root(&self) -> bool {
        self.node == self.doc.root()
    }
}
