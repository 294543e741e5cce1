//! Document metadata as reported by the engine.

use std::collections::btree_map::{self, BTreeMap};
use std::ops::Index;

use mime_guess::mime::Mime;
use serde::Serialize;
use tracing::trace;

/// Delimiter between key and value on each metadata line.
const DELIMITER: &str = ": ";

/// Key/value metadata for a single document.
///
/// Keys may contain colons (`dc:title`, `meta:author`). Only the first `": "`
/// on a line separates key from value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, String>);

impl Metadata {
    /// Parse `key: value` lines.
    ///
    /// Lines without the delimiter, or with an empty key, are skipped. When a
    /// key repeats, the last value wins.
    pub fn parse(output: &str) -> Self {
        let mut entries = BTreeMap::new();
        for line in output.lines() {
            if line.is_empty() {
                continue;
            }
            match line.split_once(DELIMITER) {
                Some((key, value)) if !key.is_empty() => {
                    entries.insert(key.to_string(), value.to_string());
                }
                _ => trace!("Skipping metadata line: {:?}", line),
            }
        }
        Metadata(entries)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    /// The raw `Content-Type` entry.
    pub fn content_type(&self) -> Option<&str> {
        self.get("Content-Type")
    }

    /// The `Content-Type` entry parsed as a MIME type.
    pub fn mime_type(&self) -> Option<Mime> {
        self.content_type()?.trim().parse().ok()
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl Index<&str> for Metadata {
    type Output = str;

    fn index(&self, key: &str) -> &str {
        match self.get(key) {
            Some(value) => value,
            None => panic!("no metadata entry for {:?}", key),
        }
    }
}

impl<'m> IntoIterator for &'m Metadata {
    type Item = (&'m String, &'m String);
    type IntoIter = btree_map::Iter<'m, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Metadata {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, String)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Metadata(iter.into_iter().collect())
    }
}
