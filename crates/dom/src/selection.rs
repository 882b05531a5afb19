//! Selection - an ordered node-set with jQuery-style traversal
//!
//! A `Selection` only holds node ids; every operation takes the `Document`
//! it was produced from. Traversals return new selections and never touch
//! the receiver. Unless noted, results are de-duplicated and in document
//! order, and the optional `filter` selector narrows the result.

use crate::document::{compile_selector, Document};
use crate::error::Result;
use crate::types::NodeId;
use crate::utils;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    nodes: Vec<NodeId>,
}

impl Selection {
    /// Empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection over the given ids, order kept as is
    pub fn from_ids(nodes: Vec<NodeId>) -> Self {
        Self { nodes }
    }

    pub fn single(node_id: NodeId) -> Self {
        Self {
            nodes: vec![node_id],
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node at `index`, if any
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    /// Matching descendants
    pub fn find(&self, doc: &Document, selector: &str) -> Result<Selection> {
        doc.select(selector, Some(self))
    }

    /// Element parent of each node
    pub fn parent(&self, doc: &Document, filter: Option<&str>) -> Result<Selection> {
        let mut ids = Vec::with_capacity(self.nodes.len());
        for &id in &self.nodes {
            if let Some(parent_id) = doc.arena().parent_element(id)? {
                ids.push(parent_id);
            }
        }
        utils::unique_sort(&mut ids);
        filtered(doc, ids, filter)
    }

    /// All element ancestors, in reverse document order (closest first)
    pub fn parents(&self, doc: &Document, filter: Option<&str>) -> Result<Selection> {
        let mut ids = Vec::new();
        for &id in &self.nodes {
            ids.extend(doc.arena().ancestors(id)?);
        }
        utils::unique_sort(&mut ids);
        ids.reverse();
        filtered(doc, ids, filter)
    }

    /// For each node, itself or its nearest ancestor matching `selector`
    pub fn closest(&self, doc: &Document, selector: &str) -> Result<Selection> {
        let compiled = compile_selector(selector)?;
        let mut ids = Vec::new();
        for &id in &self.nodes {
            if doc.matches(id, &compiled) {
                ids.push(id);
                continue;
            }
            if let Some(found) = doc
                .arena()
                .ancestors(id)?
                .into_iter()
                .find(|&ancestor| doc.matches(ancestor, &compiled))
            {
                ids.push(found);
            }
        }
        utils::unique_sort(&mut ids);
        Ok(Selection::from_ids(ids))
    }

    /// Immediately following element sibling
    pub fn next(&self, doc: &Document, filter: Option<&str>) -> Result<Selection> {
        let mut ids = Vec::new();
        for &id in &self.nodes {
            let (_, after) = doc.arena().element_siblings(id)?;
            ids.extend(after.first().copied());
        }
        utils::unique_sort(&mut ids);
        filtered(doc, ids, filter)
    }

    /// All following element siblings
    pub fn next_all(&self, doc: &Document, filter: Option<&str>) -> Result<Selection> {
        let mut ids = Vec::new();
        for &id in &self.nodes {
            ids.extend(doc.arena().element_siblings(id)?.1);
        }
        utils::unique_sort(&mut ids);
        filtered(doc, ids, filter)
    }

    /// Immediately preceding element sibling
    pub fn prev(&self, doc: &Document, filter: Option<&str>) -> Result<Selection> {
        let mut ids = Vec::new();
        for &id in &self.nodes {
            let (before, _) = doc.arena().element_siblings(id)?;
            ids.extend(before.last().copied());
        }
        utils::unique_sort(&mut ids);
        filtered(doc, ids, filter)
    }

    /// All preceding element siblings, closest first
    pub fn prev_all(&self, doc: &Document, filter: Option<&str>) -> Result<Selection> {
        let mut ids = Vec::new();
        for &id in &self.nodes {
            ids.extend(doc.arena().element_siblings(id)?.0);
        }
        utils::unique_sort(&mut ids);
        ids.reverse();
        filtered(doc, ids, filter)
    }

    /// Element siblings, excluding the nodes themselves
    pub fn siblings(&self, doc: &Document, filter: Option<&str>) -> Result<Selection> {
        let mut ids = Vec::new();
        for &id in &self.nodes {
            let (before, after) = doc.arena().element_siblings(id)?;
            ids.extend(before);
            ids.extend(after);
        }
        utils::unique_sort(&mut ids);
        filtered(doc, ids, filter)
    }

    /// Element children
    pub fn children(&self, doc: &Document, filter: Option<&str>) -> Result<Selection> {
        let mut ids = Vec::new();
        for &id in &self.nodes {
            ids.extend(doc.arena().element_children(id)?);
        }
        utils::unique_sort(&mut ids);
        filtered(doc, ids, filter)
    }

    /// All children, text and comment nodes included
    pub fn contents(&self, doc: &Document) -> Result<Selection> {
        let mut ids = Vec::new();
        for &id in &self.nodes {
            ids.extend_from_slice(doc.arena().children(id)?);
        }
        utils::unique_sort(&mut ids);
        Ok(Selection::from_ids(ids))
    }

    /// Keep nodes matching `selector` (order kept)
    pub fn filter(&self, doc: &Document, selector: &str) -> Result<Selection> {
        filtered(doc, self.nodes.clone(), Some(selector))
    }

    /// Drop nodes matching `selector` (order kept)
    pub fn not(&self, doc: &Document, selector: &str) -> Result<Selection> {
        let compiled = compile_selector(selector)?;
        Ok(self
            .iter()
            .filter(|&id| !doc.matches(id, &compiled))
            .collect())
    }

    /// Keep nodes with at least one descendant matching `selector`
    pub fn has(&self, doc: &Document, selector: &str) -> Result<Selection> {
        let compiled = compile_selector(selector)?;
        Ok(self
            .iter()
            .filter(|&id| !doc.select_compiled(&compiled, Some(&Selection::single(id))).is_empty())
            .collect())
    }

    pub fn first(&self) -> Selection {
        self.nodes.first().copied().into_iter().collect()
    }

    pub fn last(&self) -> Selection {
        self.nodes.last().copied().into_iter().collect()
    }

    /// Node at `index`; negative indices count from the end
    pub fn eq(&self, index: i64) -> Selection {
        let len = self.nodes.len() as i64;
        let index = if index < 0 { len + index } else { index };
        if (0..len).contains(&index) {
            Selection::single(self.nodes[index as usize])
        } else {
            Selection::new()
        }
    }

    /// Sub-range `[start, end)`; negative bounds count from the end and a
    /// missing `end` runs to the end of the selection
    pub fn slice(&self, start: i64, end: Option<i64>) -> Selection {
        let len = self.nodes.len() as i64;
        let clamp = |bound: i64| {
            if bound < 0 {
                (len + bound).max(0)
            } else {
                bound.min(len)
            }
        };
        let start = clamp(start);
        let end = end.map_or(len, clamp);
        if start >= end {
            return Selection::new();
        }
        Selection::from_ids(self.nodes[start as usize..end as usize].to_vec())
    }

    /// Union with every node matching `selector` in the whole document
    pub fn add(&self, doc: &Document, selector: &str) -> Result<Selection> {
        let mut ids = self.nodes.clone();
        ids.extend(doc.select(selector, None)?.iter());
        utils::unique_sort(&mut ids);
        Ok(Selection::from_ids(ids))
    }

    /// Concatenated text content of every node, untrimmed
    pub fn text(&self, doc: &Document) -> Result<String> {
        let mut text = String::new();
        for &id in &self.nodes {
            text.push_str(&utils::get_text_content(doc.arena(), id)?);
        }
        Ok(text)
    }
}

impl FromIterator<NodeId> for Selection {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self::from_ids(iter.into_iter().collect())
    }
}

fn filtered(doc: &Document, mut ids: Vec<NodeId>, filter: Option<&str>) -> Result<Selection> {
    if let Some(selector) = filter {
        let compiled = compile_selector(selector)?;
        ids.retain(|&id| doc.matches(id, &compiled));
    }
    Ok(Selection::from_ids(ids))
}
