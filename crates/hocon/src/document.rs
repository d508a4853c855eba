/*
 * document.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! A parsed document before substitution resolution.

use crate::concat::PendingConcat;
use crate::error::{Position, RefLocation};
use crate::value::{ConfigValue, PendingId};
use hocon_source_map::SourceInfo;

/// One `${...}` reference written in a document.
///
/// Two references to the same path are two separate entries; each is
/// resolved on its own.
#[derive(Debug, Clone)]
pub struct SubstitutionRef {
    pub(crate) path: String,
    pub(crate) segments: Vec<String>,
    /// Spaces and tabs written right after the closing `}`.
    pub(crate) whitespace: String,
    /// The concatenation this reference belongs to.
    pub(crate) pending: PendingId,
    /// Token index inside that concatenation.
    pub(crate) index: usize,
    pub(crate) source_info: SourceInfo,
    pub(crate) position: Position,
}

impl SubstitutionRef {
    /// The path as written between `${` and `}`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn whitespace(&self) -> &str {
        &self.whitespace
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn source_info(&self) -> SourceInfo {
        self.source_info
    }

    pub(crate) fn location(&self) -> RefLocation {
        RefLocation {
            path: self.path.clone(),
            position: self.position.clone(),
            source_info: self.source_info,
        }
    }
}

/// The raw result of parsing: a root value that may still contain
/// [`ConfigValue::Pending`] placeholders, the concatenations they stand for,
/// and every substitution reference in document order.
///
/// Call [`Document::resolve`] to obtain the final value.
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) root: ConfigValue,
    pub(crate) pendings: Vec<PendingConcat>,
    pub(crate) refs: Vec<SubstitutionRef>,
}

impl Document {
    /// Wrap an already concrete value. Resolving it returns it unchanged.
    pub fn from_value(root: ConfigValue) -> Self {
        Document {
            root,
            pendings: Vec::new(),
            refs: Vec::new(),
        }
    }

    /// The root value, placeholders included.
    pub fn root(&self) -> &ConfigValue {
        &self.root
    }

    /// Every substitution reference, in the order they were parsed.
    pub fn substitutions(&self) -> &[SubstitutionRef] {
        &self.refs
    }

    /// True when no placeholder is reachable from the root.
    pub fn is_resolved(&self) -> bool {
        !self.root.contains_pending()
    }
}
