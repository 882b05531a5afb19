//! Record extraction
//!
//! Turns a table-like region of a document into plain records:
//! `config.rows` selects the rows, then every `config.fields` selector is
//! resolved with the row as its context.
//!
//! ```json
//! {
//!   "rows": "#s-date table:first tbody tr",
//!   "fields": { "date": "td:eq(0)", "title": "td:eq(1)" },
//!   "repeat_if_blank": ["date"],
//!   "skip_if_blank": ["title"]
//! }
//! ```

use crate::error::Result;
use crate::registry::{PseudoRegistry, PSEUDOS};
use crate::resolve::{Context, Query};
use ahash::{AHashMap, AHashSet};
use dom::Document;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One extracted row: field name → trimmed text, in field order
pub type Record = IndexMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Selector for the rows, resolved against the whole document
    pub rows: String,
    /// Field name → selector resolved against each row
    pub fields: IndexMap<String, String>,
    /// Drop a row when any of these fields is blank
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_if_blank: Option<Vec<String>>,
    /// Fill a blank field with its last non-blank value from earlier rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_if_blank: Option<Vec<String>>,
}

impl ExtractConfig {
    pub fn new(rows: impl Into<String>) -> Self {
        Self {
            rows: rows.into(),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn field(mut self, name: impl Into<String>, selector: impl Into<String>) -> Self {
        self.fields.insert(name.into(), selector.into());
        self
    }

    pub fn skip_if_blank(mut self, name: impl Into<String>) -> Self {
        self.skip_if_blank
            .get_or_insert_with(Vec::new)
            .push(name.into());
        self
    }

    pub fn repeat_if_blank(mut self, name: impl Into<String>) -> Self {
        self.repeat_if_blank
            .get_or_insert_with(Vec::new)
            .push(name.into());
        self
    }
}

/// Parse `content` and extract records from it
pub fn extract(
    content: &str,
    config: &ExtractConfig,
    extra_pseudos: Option<&PseudoRegistry>,
) -> Result<Vec<Record>> {
    let doc = Document::parse(content);
    extract_document(&doc, config, extra_pseudos)
}

/// Extract records from an already parsed document
pub fn extract_document(
    doc: &Document,
    config: &ExtractConfig,
    extra_pseudos: Option<&PseudoRegistry>,
) -> Result<Vec<Record>> {
    let pseudos = PSEUDOS.merged(extra_pseudos);

    let rows = Query::parse(&config.rows)?.resolve(doc, None, &pseudos)?;
    let fields = config
        .fields
        .iter()
        .map(|(name, selector)| Query::parse(selector).map(|query| (name.as_str(), query)))
        .collect::<Result<Vec<_>>>()?;

    let repeaters: AHashSet<&str> = config
        .repeat_if_blank
        .iter()
        .flatten()
        .map(String::as_str)
        .collect();
    let mut previous_nonblank: AHashMap<&str, String> = AHashMap::new();

    let mut records = Vec::with_capacity(rows.len());
    for row in rows.iter() {
        let mut record = Record::with_capacity(fields.len());

        for (name, query) in &fields {
            let found = query.resolve(doc, Some(Context::Node(row)), &pseudos)?;
            let mut value = found.text(doc)?.trim().to_string();

            if repeaters.contains(name) {
                if value.is_empty() {
                    value = previous_nonblank.get(name).cloned().unwrap_or_default();
                } else {
                    previous_nonblank.insert(*name, value.clone());
                }
            }

            record.insert(name.to_string(), value);
        }

        if let Some(skip) = &config.skip_if_blank {
            if let Some(blank) = skip
                .iter()
                .find(|name| record.get(name.as_str()).map_or(true, String::is_empty))
            {
                tracing::trace!("Skipping row {}: field {:?} is blank", row, blank);
                continue;
            }
        }

        records.push(record);
    }

    tracing::debug!(
        "Extracted {} of {} rows for {:?}",
        records.len(),
        rows.len(),
        config.rows
    );

    Ok(records)
}
