//! Utility functions for DOM processing

use crate::arena::DomArena;
use crate::error::Result;
use crate::types::{NodeId, NodeType};

/// Get all text content from node and its children
///
/// Not trimmed: callers decide how to treat surrounding whitespace.
pub fn get_text_content(arena: &DomArena, node_id: NodeId) -> Result<String> {
    let mut text = String::new();

    arena.traverse_df(node_id, |node| {
        if node.node_type == NodeType::Text {
            text.push_str(&node.node_value);
        }
        Ok(())
    })?;

    Ok(text)
}

/// Sort ids into document order and drop duplicates
pub fn unique_sort(ids: &mut Vec<NodeId>) {
    ids.sort_unstable();
    ids.dedup();
}
