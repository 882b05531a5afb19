//! Pseudo registry - name → handler dispatch table
//!
//! The built-in table (`PSEUDOS`) is built once and never mutated. Callers
//! extend it per call with their own registry; `merged` produces a
//! copy-on-write overlay where the caller's handlers win on name clashes.

use crate::args::PseudoArg;
use crate::error::{PseudoError, Result};
use ahash::AHashMap;
use dom::{Document, Selection};
use lazy_static::lazy_static;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Handler signature: `(document, current selection, args) -> new selection`
///
/// An empty `args` slice means the pseudo was written without arguments.
pub type PseudoFn = Arc<dyn Fn(&Document, Selection, &[PseudoArg]) -> Result<Selection> + Send + Sync>;

lazy_static! {
    /// The built-in pseudo-classes
    pub static ref PSEUDOS: PseudoRegistry = PseudoRegistry::builtin();
}

#[derive(Clone, Default)]
pub struct PseudoRegistry {
    handlers: AHashMap<String, PseudoFn>,
}

impl PseudoRegistry {
    /// Empty registry (use it for caller extensions)
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, returning the one it replaced
    pub fn insert<F>(&mut self, name: impl Into<String>, handler: F) -> Option<PseudoFn>
    where
        F: Fn(&Document, Selection, &[PseudoArg]) -> Result<Selection> + Send + Sync + 'static,
    {
        self.handlers.insert(name.into(), Arc::new(handler))
    }

    /// Builder form of `insert`
    pub fn with<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Document, Selection, &[PseudoArg]) -> Result<Selection> + Send + Sync + 'static,
    {
        self.insert(name, handler);
        self
    }

    pub fn get(&self, name: &str) -> Option<&PseudoFn> {
        self.handlers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Overlay `extra` on top of `self` without touching either
    pub fn merged<'a>(&'a self, extra: Option<&PseudoRegistry>) -> Cow<'a, PseudoRegistry> {
        match extra {
            None => Cow::Borrowed(self),
            Some(extra) if extra.is_empty() => Cow::Borrowed(self),
            Some(extra) => {
                tracing::debug!("Merging extra pseudos: {:?}", extra.names());
                let mut merged = self.clone();
                for (name, handler) in &extra.handlers {
                    merged.handlers.insert(name.clone(), Arc::clone(handler));
                }
                Cow::Owned(merged)
            }
        }
    }

    /// A fresh copy of the built-in table
    pub fn builtin() -> Self {
        Self::new()
            .with("parent", |doc, q, args| {
                Ok(q.parent(doc, optional_selector("parent", args)?)?)
            })
            .with("parents", |doc, q, args| {
                Ok(q.parents(doc, optional_selector("parents", args)?)?)
            })
            .with("closest", |doc, q, args| {
                match optional_selector("closest", args)? {
                    Some(selector) => Ok(q.closest(doc, selector)?),
                    None => Ok(Selection::new()),
                }
            })
            .with("next", |doc, q, args| {
                Ok(q.next(doc, optional_selector("next", args)?)?)
            })
            .with("nextAll", |doc, q, args| {
                Ok(q.next_all(doc, optional_selector("nextAll", args)?)?)
            })
            .with("prev", |doc, q, args| {
                Ok(q.prev(doc, optional_selector("prev", args)?)?)
            })
            .with("prevAll", |doc, q, args| {
                Ok(q.prev_all(doc, optional_selector("prevAll", args)?)?)
            })
            .with("slice", |_, q, args| {
                let start = optional_int("slice", args, 0)?.unwrap_or(0);
                let end = optional_int("slice", args, 1)?;
                Ok(q.slice(start, end))
            })
            .with("siblings", |doc, q, args| {
                Ok(q.siblings(doc, optional_selector("siblings", args)?)?)
            })
            .with("children", |doc, q, args| {
                Ok(q.children(doc, optional_selector("children", args)?)?)
            })
            .with("contents", |doc, q, _| Ok(q.contents(doc)?))
            .with("filter", |doc, q, args| {
                Ok(q.filter(doc, required_selector("filter", args)?)?)
            })
            .with("not", |doc, q, args| {
                Ok(q.not(doc, required_selector("not", args)?)?)
            })
            .with("has", |doc, q, args| {
                Ok(q.has(doc, required_selector("has", args)?)?)
            })
            .with("first", |_, q, _| Ok(q.first()))
            .with("last", |_, q, _| Ok(q.last()))
            .with("eq", |_, q, args| {
                Ok(q.eq(optional_int("eq", args, 0)?.unwrap_or(0)))
            })
            .with("add", |doc, q, args| {
                Ok(q.add(doc, required_selector("add", args)?)?)
            })
    }
}

impl fmt::Debug for PseudoRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PseudoRegistry")
            .field("names", &self.names())
            .finish()
    }
}

fn invalid(pseudo: &str, reason: String) -> PseudoError {
    PseudoError::InvalidArgument {
        pseudo: pseudo.to_string(),
        reason,
    }
}

fn optional_selector<'a>(pseudo: &str, args: &'a [PseudoArg]) -> Result<Option<&'a str>> {
    match args.first() {
        None => Ok(None),
        Some(PseudoArg::Str(selector)) => Ok(Some(selector.as_str())),
        Some(PseudoArg::Integer(value)) => Err(invalid(
            pseudo,
            format!("expected a selector, got integer {}", value),
        )),
    }
}

fn required_selector<'a>(pseudo: &str, args: &'a [PseudoArg]) -> Result<&'a str> {
    optional_selector(pseudo, args)?.ok_or_else(|| invalid(pseudo, "a selector is required".to_string()))
}

fn optional_int(pseudo: &str, args: &[PseudoArg], index: usize) -> Result<Option<i64>> {
    match args.get(index) {
        None => Ok(None),
        Some(PseudoArg::Integer(value)) => Ok(Some(*value)),
        Some(PseudoArg::Str(text)) => Err(invalid(
            pseudo,
            format!("expected an integer at position {}, got {:?}", index, text),
        )),
    }
}
