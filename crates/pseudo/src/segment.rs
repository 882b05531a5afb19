//! Selector tokenizer
//!
//! Splits a hybrid selector such as `table:first tr:eq(1)` into plain CSS
//! fragments and pseudo calls:
//!
//! ```text
//! "table:first tr:eq(1)" → [Css("table"), Pseudo(first), Css("tr"), Pseudo(eq [1])]
//! ```
//!
//! A pseudo is `:` followed by a name (everything up to whitespace, `(`,
//! `:` or the end) and an optional single-level `(arg, ...)` list. A `:`
//! with no name after it is left in the CSS text. Whitespace is allowed
//! around commas but not inside an argument, so compound selectors such
//! as `:closest(#main section)` are rejected.

use crate::args::{parse_args, PseudoArg};
use crate::error::{SyntaxError, SyntaxErrorKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Plain CSS, trimmed and never blank
    Css(String),
    Pseudo(PseudoCall),
}

/// A parsed `:name(args)` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PseudoCall {
    pub name: String,
    pub args: Vec<PseudoArg>,
    /// Source text, e.g. `:eq(1)`
    pub raw: String,
}

pub fn split_segments(selector: &str) -> Result<Vec<Segment>, SyntaxError> {
    let error = |kind, position| SyntaxError {
        kind,
        position,
        selector: selector.to_string(),
    };

    let mut segments = Vec::new();
    let mut css_start = 0;
    let mut pos = 0;

    while let Some(offset) = selector[pos..].find(':') {
        let colon = pos + offset;
        let name_start = colon + 1;
        let name_len = selector[name_start..]
            .find(|c: char| c.is_whitespace() || c == '(' || c == ':')
            .unwrap_or(selector.len() - name_start);

        if name_len == 0 {
            // Literal ':' (e.g. the first half of '::'), keep scanning
            pos = name_start;
            continue;
        }

        let name_end = name_start + name_len;
        push_css(&mut segments, &selector[css_start..colon]);

        let (args, end) = if selector[name_end..].starts_with('(') {
            let args_start = name_end + 1;
            let close = selector[args_start..]
                .find(')')
                .map(|i| args_start + i)
                .ok_or_else(|| error(SyntaxErrorKind::UnclosedParenthesis, name_end))?;
            let inner = &selector[args_start..close];

            if let Some(i) = inner.find('(') {
                return Err(error(SyntaxErrorKind::NestedParenthesis, args_start + i));
            }
            if let Some(i) = inner_whitespace(inner) {
                return Err(error(SyntaxErrorKind::WhitespaceInArgument, args_start + i));
            }

            (parse_args(inner), close + 1)
        } else {
            (Vec::new(), name_end)
        };

        segments.push(Segment::Pseudo(PseudoCall {
            name: selector[name_start..name_end].to_string(),
            args,
            raw: selector[colon..end].to_string(),
        }));

        pos = end;
        css_start = end;
    }

    push_css(&mut segments, &selector[css_start..]);
    Ok(segments)
}

fn push_css(segments: &mut Vec<Segment>, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        segments.push(Segment::Css(text.to_string()));
    }
}

/// Byte offset of the first whitespace found inside a (trimmed) argument
fn inner_whitespace(inner: &str) -> Option<usize> {
    let mut offset = 0;
    for token in inner.split(',') {
        let lead = token.len() - token.trim_start().len();
        if let Some(i) = token.trim().find(char::is_whitespace) {
            return Some(offset + lead + i);
        }
        offset += token.len() + 1;
    }
    None
}
