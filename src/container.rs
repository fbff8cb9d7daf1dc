//! Keyed containers that make up a parsed document
//!
//! Both containers keep insertion order so that writing a document back out
//! is deterministic, but lookups are always by key.

use crate::error::AccessError;
use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Entries of one scope: the document root or a single section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryContainer {
    entries: IndexMap<String, Value>,
}

/// A named section is just an entry container
pub type Section = EntryContainer;

impl EntryContainer {
    /// Creates an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Strict lookup; a missing key is an error
    pub fn get(&self, key: &str) -> Result<&Value, AccessError> {
        self.entries.get(key).ok_or_else(|| AccessError::MissingKey {
            key: key.to_string(),
        })
    }

    /// Strict mutable lookup
    pub fn get_mut(&mut self, key: &str) -> Result<&mut Value, AccessError> {
        self.entries
            .get_mut(key)
            .ok_or_else(|| AccessError::MissingKey {
                key: key.to_string(),
            })
    }

    /// Optional lookup
    pub fn find(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns the value at `key`, inserting an empty scalar first if the key
    /// is missing
    pub fn get_or_insert(&mut self, key: &str) -> &mut Value {
        self.entries.entry(key.to_string()).or_default()
    }

    /// Inserts or replaces a value, returning the previous one
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Inserts a vector built from `items`
    pub fn insert_vector<I, T>(&mut self, key: impl Into<String>, items: I) -> &mut Value
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.entries
            .entry(key.into())
            .insert_entry(Value::vector(items))
            .into_mut()
    }

    /// Returns true if `key` is present
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes `key`, keeping the order of the remaining entries
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Key/value pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Read-only indexing
///
/// # Panics
///
/// Panics if `key` is not present. Use [`EntryContainer::get`] for a checked
/// lookup.
impl Index<&str> for EntryContainer {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        match self.entries.get(key) {
            Some(value) => value,
            None => panic!("key '{key}' not found"),
        }
    }
}

/// Mutable indexing auto-vivifies, so `container["x"] = value.into()` works
/// without a prior existence check
impl IndexMut<&str> for EntryContainer {
    fn index_mut(&mut self, key: &str) -> &mut Value {
        self.get_or_insert(key)
    }
}

impl<'a> IntoIterator for &'a EntryContainer {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for EntryContainer {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A parsed document: top-level entries plus named sections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    entries: EntryContainer,
    sections: IndexMap<String, EntryContainer>,
}

impl Document {
    /// Creates an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries declared before any section header
    pub fn entries(&self) -> &EntryContainer {
        &self.entries
    }

    /// Mutable access to the top-level entries
    pub fn entries_mut(&mut self) -> &mut EntryContainer {
        &mut self.entries
    }

    /// Strict section lookup
    pub fn section(&self, name: &str) -> Result<&EntryContainer, AccessError> {
        self.sections
            .get(name)
            .ok_or_else(|| AccessError::MissingSection {
                name: name.to_string(),
            })
    }

    /// Strict mutable section lookup
    pub fn section_mut(&mut self, name: &str) -> Result<&mut EntryContainer, AccessError> {
        self.sections
            .get_mut(name)
            .ok_or_else(|| AccessError::MissingSection {
                name: name.to_string(),
            })
    }

    /// Optional section lookup
    pub fn find_section(&self, name: &str) -> Option<&EntryContainer> {
        self.sections.get(name)
    }

    /// Returns the named section, creating it empty if missing
    pub fn section_or_insert(&mut self, name: &str) -> &mut EntryContainer {
        self.sections.entry(name.to_string()).or_default()
    }

    /// Starts the named section afresh, replacing any existing one
    pub fn append_section(&mut self, name: impl Into<String>) -> &mut EntryContainer {
        self.sections
            .entry(name.into())
            .insert_entry(EntryContainer::new())
            .into_mut()
    }

    /// Returns true if the named section exists
    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    /// Removes a section, keeping the order of the others
    pub fn remove_section(&mut self, name: &str) -> Option<EntryContainer> {
        self.sections.shift_remove(name)
    }

    /// Section names in declaration order
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Sections in declaration order
    pub fn sections(&self) -> impl Iterator<Item = (&str, &EntryContainer)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns true if there are no entries and no sections
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.sections.is_empty()
    }
}
