/*
 * value.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The document value model and the merge rules applied on every write.

use crate::error::Result;
use crate::path::parse_path;
use indexmap::IndexMap;
use std::fmt;

/// An atomic value.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl ScalarValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ScalarValue::String(_) => "string",
            ScalarValue::Int(_) => "integer",
            ScalarValue::Float(_) => "float",
            ScalarValue::Bool(_) => "boolean",
            ScalarValue::Null => "null",
        }
    }

    /// Text form used when the value is joined into a string.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::String(s) => f.write_str(s),
            ScalarValue::Int(i) => write!(f, "{}", i),
            // Debug keeps the fractional part of whole floats ("2.0")
            ScalarValue::Float(x) => write!(f, "{:?}", x),
            ScalarValue::Bool(b) => write!(f, "{}", b),
            ScalarValue::Null => f.write_str("null"),
        }
    }
}

/// An ordered list of values.
pub type ConfigList = Vec<ConfigValue>;

/// Handle to a concatenation that still waits for substitutions.
///
/// Only meaningful inside the [`crate::Document`] that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PendingId(pub(crate) usize);

/// Any value in a document.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Scalar(ScalarValue),
    List(ConfigList),
    Tree(ConfigTree),
    /// Placeholder for a concatenation that still contains `${...}`
    /// references. Never present in a resolved document.
    Pending(PendingId),
}

impl ConfigValue {
    pub fn string(s: impl Into<String>) -> Self {
        ConfigValue::Scalar(ScalarValue::String(s.into()))
    }

    pub fn null() -> Self {
        ConfigValue::Scalar(ScalarValue::Null)
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ConfigValue::Scalar(s) => s.kind_name(),
            ConfigValue::List(_) => "list",
            ConfigValue::Tree(_) => "object",
            ConfigValue::Pending(_) => "unresolved value",
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, ConfigValue::Tree(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, ConfigValue::List(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Scalar(ScalarValue::Null))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ConfigValue::Pending(_))
    }

    pub fn as_tree(&self) -> Option<&ConfigTree> {
        match self {
            ConfigValue::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ConfigList> {
        match self {
            ConfigValue::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarValue> {
        match self {
            ConfigValue::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// The string, if this is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Scalar(ScalarValue::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn into_tree(self) -> Option<ConfigTree> {
        match self {
            ConfigValue::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    /// True if this value or anything nested in it is still pending.
    pub fn contains_pending(&self) -> bool {
        match self {
            ConfigValue::Pending(_) => true,
            ConfigValue::Scalar(_) => false,
            ConfigValue::List(items) => items.iter().any(ConfigValue::contains_pending),
            ConfigValue::Tree(tree) => tree.values().any(ConfigValue::contains_pending),
        }
    }

    /// Visit every pending placeholder in this value, depth first.
    pub(crate) fn collect_pending(&self, out: &mut Vec<PendingId>) {
        match self {
            ConfigValue::Pending(id) => out.push(*id),
            ConfigValue::Scalar(_) => {}
            ConfigValue::List(items) => items.iter().for_each(|v| v.collect_pending(out)),
            ConfigValue::Tree(tree) => tree.values().for_each(|v| v.collect_pending(out)),
        }
    }

    /// Replace every `Pending(id)` placeholder with a copy of `value`.
    ///
    /// Returns the number of placeholders replaced.
    pub(crate) fn replace_pending(&mut self, id: PendingId, value: &ConfigValue) -> usize {
        match self {
            ConfigValue::Pending(current) if *current == id => {
                *self = value.clone();
                1
            }
            ConfigValue::List(items) => items
                .iter_mut()
                .map(|v| v.replace_pending(id, value))
                .sum(),
            ConfigValue::Tree(tree) => tree
                .values_mut()
                .map(|v| v.replace_pending(id, value))
                .sum(),
            _ => 0,
        }
    }
}

impl From<ScalarValue> for ConfigValue {
    fn from(value: ScalarValue) -> Self {
        ConfigValue::Scalar(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::string(value)
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::string(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Scalar(ScalarValue::Int(value))
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        ConfigValue::Scalar(ScalarValue::Int(i64::from(value)))
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Scalar(ScalarValue::Float(value))
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Scalar(ScalarValue::Bool(value))
    }
}

impl From<ConfigList> for ConfigValue {
    fn from(value: ConfigList) -> Self {
        ConfigValue::List(value)
    }
}

impl From<ConfigTree> for ConfigValue {
    fn from(value: ConfigTree) -> Self {
        ConfigValue::Tree(value)
    }
}

/// An ordered mapping from key to value.
///
/// Iteration follows first-insertion order; overwriting a key keeps its
/// position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigTree {
    entries: IndexMap<String, ConfigValue>,
}

impl ConfigTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Direct child by key. The key is not split on dots.
    pub fn get_key(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &ConfigValue> {
        self.entries.values()
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut ConfigValue> {
        self.entries.values_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Set `path` (split on unquoted dots) to `value`.
    ///
    /// Intermediate keys are created as objects, replacing whatever
    /// non-object value they held. At the last key an object is deep-merged
    /// into an existing object; anything else replaces the old value.
    ///
    /// ```
    /// use hocon::{ConfigTree, ConfigValue};
    ///
    /// let mut tree = ConfigTree::new();
    /// tree.put("server.port", ConfigValue::from(8080)).unwrap();
    /// tree.put("server.host", ConfigValue::from("localhost")).unwrap();
    /// assert_eq!(tree.get_int("server.port").unwrap(), 8080);
    /// assert_eq!(tree.get_tree("server").unwrap().len(), 2);
    /// ```
    pub fn put(&mut self, path: &str, value: ConfigValue) -> Result<()> {
        let segments = parse_path(path)?;
        self.put_segments(&segments, value, false);
        Ok(())
    }

    /// Like [`ConfigTree::put`], but a list written over a list is appended
    /// to it instead of replacing it.
    pub fn put_appending(&mut self, path: &str, value: ConfigValue) -> Result<()> {
        let segments = parse_path(path)?;
        self.put_segments(&segments, value, true);
        Ok(())
    }

    pub(crate) fn put_segments(&mut self, segments: &[String], value: ConfigValue, append: bool) {
        match segments {
            [] => {}
            [key] => self.merge_key(key.clone(), value, append),
            [first, rest @ ..] => {
                let child = self
                    .entries
                    .entry(first.clone())
                    .or_insert_with(|| ConfigValue::Tree(ConfigTree::new()));
                if !child.is_tree() {
                    *child = ConfigValue::Tree(ConfigTree::new());
                }
                if let ConfigValue::Tree(child) = child {
                    child.put_segments(rest, value, append);
                }
            }
        }
    }

    /// Write one key, applying the merge rules against its current value.
    pub(crate) fn merge_key(&mut self, key: String, value: ConfigValue, append: bool) {
        let mergeable = match (self.entries.get(&key), &value) {
            (Some(ConfigValue::Tree(_)), ConfigValue::Tree(_)) => true,
            (Some(ConfigValue::List(_)), ConfigValue::List(_)) => append,
            _ => false,
        };

        if !mergeable {
            if let Some(ConfigValue::Pending(id)) = self.entries.get(&key) {
                tracing::trace!(key = %key, pending = id.0, "overwriting unresolved value");
            }
            self.entries.insert(key, value);
            return;
        }

        match (self.entries.get_mut(&key), value) {
            (Some(ConfigValue::Tree(existing)), ConfigValue::Tree(incoming)) => {
                existing.merge(incoming)
            }
            (Some(ConfigValue::List(existing)), ConfigValue::List(incoming)) => {
                existing.extend(incoming)
            }
            _ => {}
        }
    }

    /// Deep-merge `other` into this tree; `other` wins on conflicts.
    pub fn merge(&mut self, other: ConfigTree) {
        for (key, value) in other.entries {
            self.merge_key(key, value, false);
        }
    }

    /// A merged copy where this tree's values win and keys it lacks come
    /// from `fallback`.
    ///
    /// ```
    /// use hocon::parse_string;
    ///
    /// let app = parse_string("db { host = prod.example.com }").unwrap();
    /// let defaults = parse_string("db { host = localhost, port = 5432 }").unwrap();
    ///
    /// let config = app.with_fallback(&defaults);
    /// assert_eq!(config.get_string("db.host").unwrap(), "prod.example.com");
    /// assert_eq!(config.get_int("db.port").unwrap(), 5432);
    /// ```
    pub fn with_fallback(&self, fallback: &ConfigTree) -> ConfigTree {
        let mut result = fallback.clone();
        result.merge(self.clone());
        result
    }
}

impl IntoIterator for ConfigTree {
    type Item = (String, ConfigValue);
    type IntoIter = indexmap::map::IntoIter<String, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, ConfigValue)> for ConfigTree {
    /// Collect key/value pairs, merging duplicate keys.
    fn from_iter<I: IntoIterator<Item = (String, ConfigValue)>>(iter: I) -> Self {
        let mut tree = ConfigTree::new();
        for (key, value) in iter {
            tree.merge_key(key, value, false);
        }
        tree
    }
}
