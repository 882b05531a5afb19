//! Document - Main entry point for DOM operations
//!
//! This handles:
//! - HTML parsing (delegated to `scraper`/html5ever)
//! - Mirroring the parsed tree into a `DomArena` in pre-order
//! - CSS selector queries, optionally scoped to a selection
//!
//! The `scraper` tree is kept alongside the arena because selector
//! matching runs against it; `tree_ids` and `arena_ids` translate
//! between the two id spaces.

use crate::arena::DomArena;
use crate::error::{DomError, Result};
use crate::selection::Selection;
use crate::types::{DomNode, NodeId, NodeType};
use crate::utils;
use ahash::AHashMap;
use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node, Selector};

type TreeId = ego_tree::NodeId;

/// A parsed HTML document
#[derive(Debug)]
pub struct Document {
    html: Html,
    arena: DomArena,
    /// Arena id -> scraper tree id (indexed by arena id)
    tree_ids: Vec<TreeId>,
    /// Scraper tree id -> arena id
    arena_ids: AHashMap<TreeId, NodeId>,
}

impl Document {
    /// Parse a full HTML document (html/head/body are synthesized if absent)
    pub fn parse(content: &str) -> Self {
        Self::from_html(Html::parse_document(content))
    }

    /// Parse an HTML fragment
    pub fn parse_fragment(content: &str) -> Self {
        Self::from_html(Html::parse_fragment(content))
    }

    /// Build the arena for an already parsed `scraper::Html`
    pub fn from_html(html: Html) -> Self {
        let mut builder = ArenaBuilder {
            arena: DomArena::with_capacity(html.tree.values().count()),
            tree_ids: Vec::new(),
            arena_ids: AHashMap::new(),
        };
        builder.mirror(html.tree.root(), None);

        tracing::debug!("Parsed document with {} nodes", builder.arena.len());

        Self {
            html,
            arena: builder.arena,
            tree_ids: builder.tree_ids,
            arena_ids: builder.arena_ids,
        }
    }

    /// Get reference to internal arena
    pub fn arena(&self) -> &DomArena {
        &self.arena
    }

    /// Get a node by id
    pub fn node(&self, node_id: NodeId) -> Result<&DomNode> {
        self.arena.get(node_id)
    }

    /// The document (or fragment) node as a one-element selection
    pub fn root(&self) -> Result<Selection> {
        Ok(Selection::single(self.arena.root()?.node_id))
    }

    /// Wrap a single node into a selection
    pub fn wrap(&self, node_id: NodeId) -> Result<Selection> {
        self.arena.get(node_id)?;
        Ok(Selection::single(node_id))
    }

    /// Query the document with a CSS selector
    ///
    /// Without a scope every matching element is returned. With a scope the
    /// result is every matching descendant of the scope's nodes; a document
    /// or fragment node scopes to everything below it. Either way the
    /// result is de-duplicated and in document order.
    pub fn select(&self, selector: &str, scope: Option<&Selection>) -> Result<Selection> {
        let compiled = compile_selector(selector)?;
        let found = self.select_compiled(&compiled, scope);
        tracing::trace!("Selector {:?} matched {} nodes", selector, found.len());
        Ok(found)
    }

    pub(crate) fn select_compiled(&self, selector: &Selector, scope: Option<&Selection>) -> Selection {
        let mut ids: Vec<NodeId> = match scope {
            None => self
                .html
                .select(selector)
                .filter_map(|element| self.arena_id(element.id()))
                .collect(),
            Some(scope) => {
                let mut ids = Vec::new();
                for node_id in scope.iter() {
                    let Some(tree_node) = self.tree_node(node_id) else {
                        continue;
                    };
                    match ElementRef::wrap(tree_node) {
                        Some(element) => ids.extend(
                            element
                                .select(selector)
                                .filter_map(|found| self.arena_id(found.id())),
                        ),
                        None => ids.extend(
                            tree_node
                                .descendants()
                                .skip(1)
                                .filter_map(ElementRef::wrap)
                                .filter(|element| selector.matches(element))
                                .filter_map(|found| self.arena_id(found.id())),
                        ),
                    }
                }
                ids
            }
        };
        utils::unique_sort(&mut ids);
        Selection::from_ids(ids)
    }

    /// Whether the node is an element matched by `selector`
    pub(crate) fn matches(&self, node_id: NodeId, selector: &Selector) -> bool {
        self.element_ref(node_id)
            .map_or(false, |element| selector.matches(&element))
    }

    fn tree_node(&self, node_id: NodeId) -> Option<NodeRef<'_, Node>> {
        let tree_id = *self.tree_ids.get(node_id as usize)?;
        self.html.tree.get(tree_id)
    }

    fn element_ref(&self, node_id: NodeId) -> Option<ElementRef<'_>> {
        self.tree_node(node_id).and_then(ElementRef::wrap)
    }

    fn arena_id(&self, tree_id: TreeId) -> Option<NodeId> {
        self.arena_ids.get(&tree_id).copied()
    }
}

/// Compile a CSS selector, mapping parse failures to `DomError`
pub fn compile_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| DomError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

struct ArenaBuilder {
    arena: DomArena,
    tree_ids: Vec<TreeId>,
    arena_ids: AHashMap<TreeId, NodeId>,
}

impl ArenaBuilder {
    /// Recursively mirror a scraper node and its subtree
    fn mirror(&mut self, tree_node: NodeRef<'_, Node>, parent_id: Option<NodeId>) -> NodeId {
        let mut node = convert_node(tree_node.value());
        node.parent_id = parent_id;

        let node_id = match parent_id {
            Some(_) => self.arena.add_node(node),
            None => self.arena.add_root(node),
        };
        self.tree_ids.push(tree_node.id());
        self.arena_ids.insert(tree_node.id(), node_id);

        let mut child_ids = smallvec::SmallVec::new();
        for child in tree_node.children() {
            child_ids.push(self.mirror(child, Some(node_id)));
        }

        // Update parent's children list
        if let Ok(node) = self.arena.get_mut(node_id) {
            node.children_ids = child_ids;
        }

        node_id
    }
}

fn convert_node(value: &Node) -> DomNode {
    match value {
        Node::Document => DomNode::new(0, NodeType::Document, "#document".to_string()),
        Node::Fragment => {
            DomNode::new(0, NodeType::DocumentFragment, "#document-fragment".to_string())
        }
        Node::Doctype(doctype) => {
            DomNode::new(0, NodeType::DocumentType, doctype.name().to_string())
        }
        Node::Comment(comment) => {
            let mut node = DomNode::new(0, NodeType::Comment, "#comment".to_string());
            node.node_value = comment.comment.to_string();
            node
        }
        Node::Text(text) => {
            let mut node = DomNode::new(0, NodeType::Text, "#text".to_string());
            node.node_value = text.text.to_string();
            node
        }
        Node::Element(element) => {
            let mut node = DomNode::new(0, NodeType::Element, element.name().to_string());
            node.attributes = element
                .attrs()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect();
            node
        }
        Node::ProcessingInstruction(instruction) => {
            let mut node = DomNode::new(
                0,
                NodeType::ProcessingInstruction,
                instruction.target.to_string(),
            );
            node.node_value = instruction.data.to_string();
            node
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r#"<!DOCTYPE html>
<html><body>
  <div id="outer" class="box">
    <p>one</p>
    <div class="box"><p>two</p></div>
  </div>
  <p>three</p>
</body></html>"#;

    #[test]
    fn test_parse_builds_arena_in_document_order() {
        let doc = Document::parse(HTML);
        let arena = doc.arena();

        assert_eq!(arena.root().unwrap().node_type, NodeType::Document);
        assert_eq!(arena.root_id(), Some(0));
        assert_eq!(doc.root().unwrap(), Selection::single(0));

        // Pre-order: ids increase along document order
        let ps = arena.find_by_tag("p");
        assert_eq!(ps.len(), 3);
        assert!(ps.windows(2).all(|w| w[0] < w[1]));

        let outer = arena.find(|n| n.attr("id") == Some("outer"));
        assert_eq!(outer.len(), 1);
        assert_eq!(doc.node(outer[0]).unwrap().attr("class"), Some("box"));
    }

    #[test]
    fn test_select_whole_document() {
        let doc = Document::parse(HTML);
        let ps = doc.select("p", None).unwrap();
        assert_eq!(ps.len(), 3);
        assert_eq!(ps.text(&doc).unwrap(), "onetwothree");
    }

    #[test]
    fn test_select_scoped_dedups_nested_scopes() {
        let doc = Document::parse(HTML);
        let boxes = doc.select(".box", None).unwrap();
        assert_eq!(boxes.len(), 2);

        // The inner box is inside the outer one, its <p> must appear once
        let ps = doc.select("p", Some(&boxes)).unwrap();
        assert_eq!(ps.len(), 2);
        assert_eq!(ps.text(&doc).unwrap(), "onetwo");
    }

    #[test]
    fn test_scope_excludes_itself() {
        let doc = Document::parse(HTML);
        let outer = doc.select("#outer", None).unwrap();
        let found = doc.select("div", Some(&outer)).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_document_root_scope_matches_everything() {
        let doc = Document::parse(HTML);
        let root = doc.root().unwrap();
        assert_eq!(doc.select("p", Some(&root)).unwrap(), doc.select("p", None).unwrap());
        assert_eq!(doc.select("html", Some(&root)).unwrap().len(), 1);
    }

    #[test]
    fn test_fragment_root_scope() {
        let doc = Document::parse_fragment("<li>a</li><li>b</li><li>c</li>");
        let root = doc.root().unwrap();
        let items = doc.select("li", Some(&root)).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items.text(&doc).unwrap(), "abc");
    }

    #[test]
    fn test_text_node_scope_is_empty() {
        let doc = Document::parse(HTML);
        let text_nodes = doc.arena().find(|n| n.is_text() && n.node_value == "one");
        let scope = Selection::from_ids(text_nodes);
        assert!(doc.select("p", Some(&scope)).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_selector() {
        let doc = Document::parse(HTML);
        let err = doc.select("p[", None).unwrap_err();
        assert!(matches!(err, DomError::InvalidSelector { ref selector, .. } if selector == "p["));
    }

    #[test]
    fn test_fragment_root() {
        let doc = Document::parse_fragment("<td>a</td><td>b</td>");
        assert_eq!(
            doc.arena().root().unwrap().node_type,
            NodeType::DocumentFragment
        );
    }

    #[test]
    fn test_wrap_checks_node_exists() {
        let doc = Document::parse(HTML);
        assert_eq!(doc.wrap(1).unwrap().len(), 1);
        assert!(doc.wrap(10_000).is_err());
    }
}
