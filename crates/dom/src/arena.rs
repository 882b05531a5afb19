//! Arena-based DOM tree storage
//!
//! Nodes live in a single `Vec<DomNode>` and refer to each other through
//! `NodeId` indices. The tree is filled in pre-order, which makes the
//! numeric id order identical to document order: sorting a node-set by id
//! is all it takes to put it in document order.
//!
//! ## Memory Layout
//!
//! ```text
//! Arena: Vec<DomNode>
//!        [Node0][Node1][Node2]...
//!         ↑ 4-byte index, not 8-byte pointer
//! ```

use crate::error::{DomError, Result};
use crate::types::{DomNode, NodeId, NodeType};

/// Arena allocator for DOM nodes
#[derive(Debug)]
pub struct DomArena {
    /// All nodes stored sequentially (cache-friendly)
    nodes: Vec<DomNode>,

    /// Root node ID (if set)
    root_id: Option<NodeId>,
}

impl DomArena {
    /// Create a new empty arena
    pub fn new() -> Self {
        Self::with_capacity(1024) // Pre-allocate for typical page
    }

    /// Create arena with specific capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root_id: None,
        }
    }

    /// Add a node to the arena, returns its ID
    ///
    /// The node's own `node_id` is overwritten with its arena slot.
    pub fn add_node(&mut self, mut node: DomNode) -> NodeId {
        let node_id = self.nodes.len() as NodeId;
        node.node_id = node_id;
        self.nodes.push(node);
        node_id
    }

    /// Add a node and make it the root
    pub fn add_root(&mut self, node: DomNode) -> NodeId {
        let node_id = self.add_node(node);
        self.root_id = Some(node_id);
        node_id
    }

    /// Get node by ID (immutable)
    pub fn get(&self, node_id: NodeId) -> Result<&DomNode> {
        self.nodes
            .get(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Get node by ID (mutable)
    pub fn get_mut(&mut self, node_id: NodeId) -> Result<&mut DomNode> {
        self.nodes
            .get_mut(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Get root node ID
    pub fn root_id(&self) -> Option<NodeId> {
        self.root_id
    }

    /// Get root node
    pub fn root(&self) -> Result<&DomNode> {
        let root_id = self.root_id.ok_or(DomError::NoRoot)?;
        self.get(root_id)
    }

    /// Total number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if arena is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Child ids of a node, text and comments included
    pub fn children(&self, node_id: NodeId) -> Result<&[NodeId]> {
        Ok(&self.get(node_id)?.children_ids)
    }

    /// Element children only
    pub fn element_children(&self, node_id: NodeId) -> Result<Vec<NodeId>> {
        let node = self.get(node_id)?;
        let mut out = Vec::with_capacity(node.children_ids.len());
        for &child_id in &node.children_ids {
            if self.get(child_id)?.is_element() {
                out.push(child_id);
            }
        }
        Ok(out)
    }

    /// Get parent of a node
    pub fn parent(&self, node_id: NodeId) -> Result<Option<&DomNode>> {
        let node = self.get(node_id)?;
        match node.parent_id {
            Some(parent_id) => Ok(Some(self.get(parent_id)?)),
            None => Ok(None),
        }
    }

    /// Parent, but only when it is an element (the document node is not)
    pub fn parent_element(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        Ok(self
            .parent(node_id)?
            .filter(|parent| parent.is_element())
            .map(|parent| parent.node_id))
    }

    /// Element ancestors, closest first
    pub fn ancestors(&self, node_id: NodeId) -> Result<Vec<NodeId>> {
        let mut out = Vec::new();
        let mut current = self.parent_element(node_id)?;
        while let Some(id) = current {
            out.push(id);
            current = self.parent_element(id)?;
        }
        Ok(out)
    }

    /// Element siblings of a node as `(before, after)`, both in document order
    pub fn element_siblings(&self, node_id: NodeId) -> Result<(Vec<NodeId>, Vec<NodeId>)> {
        let parent_id = match self.get(node_id)?.parent_id {
            Some(id) => id,
            None => return Ok((Vec::new(), Vec::new())),
        };
        let siblings = self.element_children(parent_id)?;
        let (before, after) = siblings.split_at(siblings.partition_point(|&id| id < node_id));
        let after = after
            .iter()
            .copied()
            .filter(|&id| id != node_id)
            .collect();
        Ok((before.to_vec(), after))
    }

    /// Traverse tree depth-first (iterative, no recursion)
    pub fn traverse_df<F>(&self, start_id: NodeId, mut visit: F) -> Result<()>
    where
        F: FnMut(&DomNode) -> Result<()>,
    {
        let mut stack = vec![start_id];

        while let Some(node_id) = stack.pop() {
            let node = self.get(node_id)?;
            visit(node)?;

            // Push children in reverse order (so they're visited left-to-right)
            for &child_id in node.children_ids.iter().rev() {
                stack.push(child_id);
            }
        }

        Ok(())
    }

    /// Find nodes matching predicate
    pub fn find<F>(&self, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&DomNode) -> bool,
    {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(idx, node)| {
                if predicate(node) {
                    Some(idx as NodeId)
                } else {
                    None
                }
            })
            .collect()
    }

    /// Find all elements by tag name
    pub fn find_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.find(|node| node.node_type == NodeType::Element && node.node_name.eq_ignore_ascii_case(tag))
    }
}

impl Default for DomArena {
    fn default() -> Self {
        Self::new()
    }
}
