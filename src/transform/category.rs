//! Category identifier to title lookup

use crate::decode::lookup_path;
use crate::error::{Error, Result};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::debug;

const TITLE_PATH: &str = "snippet.title";

/// Ordered map from category identifier to title
///
/// Built from raw category entries: exact duplicate entries are removed
/// first, then the first entry seen for each identifier wins. Later
/// entries with the same identifier are skipped without a warning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryLookup {
    entries: Vec<(i64, String)>,
    index: HashMap<i64, usize>,
}

impl CategoryLookup {
    /// Build a lookup from `{"id": .., "snippet": {"title": ..}}` entries
    pub fn from_entries(entries: &[Value]) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut lookup = Self::default();
        let mut skipped = 0usize;

        for (position, entry) in entries.iter().enumerate() {
            if !seen.insert(entry.to_string()) {
                continue;
            }

            let id = entry_id(entry, position)?;
            let title = lookup_path(entry, TITLE_PATH)
                .and_then(Value::as_str)
                .ok_or_else(|| Error::RecordExtraction {
                    path: TITLE_PATH.to_string(),
                    message: format!("category entry {position} has no title"),
                })?;

            if !lookup.insert(id, title) {
                skipped += 1;
            }
        }

        debug!(
            categories = lookup.len(),
            skipped, "Built category lookup"
        );
        Ok(lookup)
    }

    /// Insert a pair unless the identifier is already present
    ///
    /// Returns `false` when the identifier was already mapped.
    pub fn insert(&mut self, id: i64, title: impl Into<String>) -> bool {
        if self.index.contains_key(&id) {
            return false;
        }
        self.index.insert(id, self.entries.len());
        self.entries.push((id, title.into()));
        true
    }

    /// Title for an identifier
    pub fn get(&self, id: i64) -> Option<&str> {
        self.index.get(&id).map(|&i| self.entries[i].1.as_str())
    }

    /// Number of identifiers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the lookup is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> {
        self.entries.iter().map(|(id, title)| (*id, title.as_str()))
    }
}

/// Read `id` as an integer from a JSON string or number
fn entry_id(entry: &Value, position: usize) -> Result<i64> {
    let raw = entry.get("id").ok_or_else(|| Error::RecordExtraction {
        path: "id".to_string(),
        message: format!("category entry {position} has no id"),
    })?;

    let parsed = match raw {
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    };
    parsed.ok_or_else(|| Error::coercion("id", position, raw.to_string(), "Int64"))
}
