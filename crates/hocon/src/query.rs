/*
 * query.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Path lookups and typed accessors on a resolved tree.
//!
//! Every accessor fails with [`Error::Lookup`] when the path is absent and
//! with [`Error::Type`] when the stored value cannot be read as the
//! requested kind. The `_or` variants turn only the first failure into the
//! default.

use crate::error::{Error, Result};
use crate::path::parse_path;
use crate::value::{ConfigList, ConfigTree, ConfigValue, ScalarValue};

impl ConfigTree {
    /// The value at a dotted path.
    pub fn get(&self, path: &str) -> Result<&ConfigValue> {
        let segments = parse_path(path)?;
        let missing = || Error::Lookup {
            path: path.to_string(),
        };

        let mut current = self;
        let Some((last, parents)) = segments.split_last() else {
            return Err(missing());
        };
        for segment in parents {
            match current.get_key(segment) {
                Some(ConfigValue::Tree(tree)) => current = tree,
                _ => return Err(missing()),
            }
        }
        current.get_key(last).ok_or_else(missing)
    }

    pub fn get_or<'a>(&'a self, path: &str, default: &'a ConfigValue) -> Result<&'a ConfigValue> {
        or_default(self.get(path), || default)
    }

    /// True if a value (possibly null) is stored at `path`.
    pub fn has_path(&self, path: &str) -> bool {
        self.get(path).is_ok()
    }

    /// Any scalar, rendered as text. Booleans render as `true`/`false`.
    pub fn get_string(&self, path: &str) -> Result<String> {
        match self.get(path)? {
            ConfigValue::Scalar(ScalarValue::Null) => Err(type_error(path, "string", "null")),
            ConfigValue::Scalar(scalar) => Ok(scalar.render()),
            other => Err(type_error(path, "string", other.kind_name())),
        }
    }

    pub fn get_string_or(&self, path: &str, default: &str) -> Result<String> {
        or_default(self.get_string(path), || default.to_string())
    }

    /// An integer. Whole floats and numeric strings are accepted.
    pub fn get_int(&self, path: &str) -> Result<i64> {
        let value = self.get(path)?;
        let parsed = match value {
            ConfigValue::Scalar(ScalarValue::Int(i)) => Some(*i),
            ConfigValue::Scalar(ScalarValue::Float(x)) => float_to_int(*x),
            ConfigValue::Scalar(ScalarValue::String(s)) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(float_to_int))
            }
            _ => None,
        };
        parsed.ok_or_else(|| type_error(path, "integer", value.kind_name()))
    }

    pub fn get_int_or(&self, path: &str, default: i64) -> Result<i64> {
        or_default(self.get_int(path), || default)
    }

    /// A float. Integers and numeric strings are accepted.
    pub fn get_float(&self, path: &str) -> Result<f64> {
        let value = self.get(path)?;
        let parsed = match value {
            ConfigValue::Scalar(ScalarValue::Int(i)) => Some(*i as f64),
            ConfigValue::Scalar(ScalarValue::Float(x)) => Some(*x),
            ConfigValue::Scalar(ScalarValue::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| type_error(path, "float", value.kind_name()))
    }

    pub fn get_float_or(&self, path: &str, default: f64) -> Result<f64> {
        or_default(self.get_float(path), || default)
    }

    /// A boolean. The strings `true/yes/on` and `false/no/off` are accepted
    /// in any case.
    pub fn get_bool(&self, path: &str) -> Result<bool> {
        let value = self.get(path)?;
        let parsed = match value {
            ConfigValue::Scalar(ScalarValue::Bool(b)) => Some(*b),
            ConfigValue::Scalar(ScalarValue::String(s)) => {
                match s.trim().to_ascii_lowercase().as_str() {
                    "true" | "yes" | "on" => Some(true),
                    "false" | "no" | "off" => Some(false),
                    _ => None,
                }
            }
            _ => None,
        };
        parsed.ok_or_else(|| type_error(path, "boolean", value.kind_name()))
    }

    pub fn get_bool_or(&self, path: &str, default: bool) -> Result<bool> {
        or_default(self.get_bool(path), || default)
    }

    pub fn get_list(&self, path: &str) -> Result<&ConfigList> {
        match self.get(path)? {
            ConfigValue::List(list) => Ok(list),
            other => Err(type_error(path, "list", other.kind_name())),
        }
    }

    pub fn get_list_or<'a>(&'a self, path: &str, default: &'a ConfigList) -> Result<&'a ConfigList> {
        or_default(self.get_list(path), || default)
    }

    pub fn get_tree(&self, path: &str) -> Result<&ConfigTree> {
        match self.get(path)? {
            ConfigValue::Tree(tree) => Ok(tree),
            other => Err(type_error(path, "object", other.kind_name())),
        }
    }

    pub fn get_tree_or<'a>(&'a self, path: &str, default: &'a ConfigTree) -> Result<&'a ConfigTree> {
        or_default(self.get_tree(path), || default)
    }
}

fn or_default<T>(result: Result<T>, default: impl FnOnce() -> T) -> Result<T> {
    match result {
        Err(Error::Lookup { .. }) => Ok(default()),
        other => other,
    }
}

fn type_error(path: &str, expected: &'static str, found: &str) -> Error {
    Error::Type {
        path: path.to_string(),
        expected,
        found: found.to_string(),
    }
}

fn float_to_int(x: f64) -> Option<i64> {
    if x.is_finite() && x.fract() == 0.0 && x.abs() < 9.2e18 {
        Some(x as i64)
    } else {
        None
    }
}
