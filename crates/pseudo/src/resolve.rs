//! Selector interpreter
//!
//! Threads a query context through the segments of a hybrid selector:
//! CSS fragments re-query the document scoped to the current selection,
//! pseudo calls hand the current selection to their registered handler.

use crate::error::{PseudoError, Result};
use crate::registry::{PseudoRegistry, PSEUDOS};
use crate::segment::{split_segments, Segment};
use dom::{Document, NodeId, Selection};

/// Context supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Context {
    Node(NodeId),
    Selection(Selection),
}

impl From<NodeId> for Context {
    fn from(node_id: NodeId) -> Self {
        Context::Node(node_id)
    }
}

impl From<Selection> for Context {
    fn from(selection: Selection) -> Self {
        Context::Selection(selection)
    }
}

/// Running state of one resolution
enum QueryState {
    /// Nothing selected yet; a pseudo here is an error
    Unset,
    /// Handed in by the caller, not yet normalized through the document
    Raw(Context),
    /// Produced by a query or a pseudo handler
    Resolved(Selection),
}

impl QueryState {
    fn into_selection(self, doc: &Document) -> Result<Option<Selection>> {
        match self {
            QueryState::Unset => Ok(None),
            QueryState::Raw(Context::Node(node_id)) => Ok(Some(doc.wrap(node_id)?)),
            QueryState::Raw(Context::Selection(selection)) => Ok(Some(selection)),
            QueryState::Resolved(selection) => Ok(Some(selection)),
        }
    }
}

/// A tokenized selector, reusable across contexts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    source: String,
    segments: Vec<Segment>,
}

impl Query {
    pub fn parse(selector: &str) -> Result<Self> {
        Ok(Self {
            source: selector.to_string(),
            segments: split_segments(selector)?,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Run the query against `doc` using an already merged registry
    pub fn resolve(
        &self,
        doc: &Document,
        context: Option<Context>,
        pseudos: &PseudoRegistry,
    ) -> Result<Selection> {
        let mut state = match context {
            None => QueryState::Unset,
            Some(context) => QueryState::Raw(context),
        };

        for segment in &self.segments {
            state = match segment {
                Segment::Css(css) => {
                    let scope = state.into_selection(doc)?;
                    QueryState::Resolved(doc.select(css, scope.as_ref())?)
                }
                Segment::Pseudo(call) => {
                    if matches!(state, QueryState::Unset) {
                        return Err(PseudoError::MissingContext {
                            pseudo: call.raw.clone(),
                            query: self.source.clone(),
                        });
                    }
                    let handler = pseudos.get(&call.name).ok_or_else(|| PseudoError::UnknownPseudo {
                        pseudo: call.raw.clone(),
                        query: self.source.clone(),
                    })?;
                    let current = state.into_selection(doc)?.unwrap_or_default();
                    QueryState::Resolved(handler(doc, current, &call.args)?)
                }
            };

            if let QueryState::Resolved(selection) = &state {
                tracing::trace!("{:?} -> {} nodes", segment, selection.len());
            }
        }

        Ok(state.into_selection(doc)?.unwrap_or_default())
    }
}

/// Resolve a hybrid selector
///
/// `context` scopes the first CSS fragment and is required when the
/// selector starts with a pseudo. `extra_pseudos` is overlaid on
/// `PSEUDOS` for this call only.
pub fn resolve(
    doc: &Document,
    selector: &str,
    context: Option<Context>,
    extra_pseudos: Option<&PseudoRegistry>,
) -> Result<Selection> {
    let query = Query::parse(selector)?;
    let pseudos = PSEUDOS.merged(extra_pseudos);
    query.resolve(doc, context, &pseudos)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r#"<html><body>
<ul><li>1</li><li>2</li><li>3</li></ul>
<ul><li>4</li></ul>
</body></html>"#;

    fn text(doc: &Document, selection: &Selection) -> String {
        selection.text(doc).unwrap().trim().to_string()
    }

    #[test]
    fn test_chained_pseudos() {
        let doc = Document::parse(HTML);
        let found = resolve(&doc, "ul:first li:slice(1):last", None, None).unwrap();
        assert_eq!(text(&doc, &found), "3");
    }

    #[test]
    fn test_css_after_pseudo_is_scoped() {
        let doc = Document::parse(HTML);
        let found = resolve(&doc, "ul:last li", None, None).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(text(&doc, &found), "4");
    }

    #[test]
    fn test_node_context_is_normalized() {
        let doc = Document::parse(HTML);
        let first_ul = doc.select("ul", None).unwrap().get(0).unwrap();

        let found = resolve(&doc, ":children:eq(2)", Some(first_ul.into()), None).unwrap();
        assert_eq!(text(&doc, &found), "3");
    }

    #[test]
    fn test_context_with_blank_selector() {
        let doc = Document::parse(HTML);
        let first_ul = doc.select("ul", None).unwrap().get(0).unwrap();

        let found = resolve(&doc, "  ", Some(Context::Node(first_ul)), None).unwrap();
        assert_eq!(found, Selection::single(first_ul));
        assert!(resolve(&doc, "", None, None).unwrap().is_empty());
    }

    #[test]
    fn test_missing_context() {
        let doc = Document::parse(HTML);
        let err = resolve(&doc, ":first li", None, None).unwrap_err();
        assert!(matches!(err, PseudoError::MissingContext { ref pseudo, .. } if pseudo == ":first"));
    }

    #[test]
    fn test_unknown_pseudo() {
        let doc = Document::parse(HTML);
        let err = resolve(&doc, "li:bogus(2)", None, None).unwrap_err();
        assert!(matches!(err, PseudoError::UnknownPseudo { ref pseudo, .. } if pseudo == ":bogus(2)"));
    }

    #[test]
    fn test_query_reuse() {
        let doc = Document::parse(HTML);
        let query = Query::parse("li:first").unwrap();
        assert_eq!(query.source(), "li:first");
        assert_eq!(query.segments().len(), 2);

        let uls = doc.select("ul", None).unwrap();
        let firsts: Vec<String> = uls
            .iter()
            .map(|ul| {
                let found = query.resolve(&doc, Some(Context::Node(ul)), &PSEUDOS).unwrap();
                text(&doc, &found)
            })
            .collect();
        assert_eq!(firsts, vec!["1", "4"]);
    }
}
