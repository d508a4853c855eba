/*
 * options.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Parser limits.

/// Options for parsing.
///
/// ```
/// use hocon::{ConfigParser, ParseOptions};
///
/// let options = ParseOptions::default().with_max_nesting_depth(8);
/// let mut parser = ConfigParser::new().with_options(options);
/// assert!(parser.parse_str("a.b.c = 1").is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum depth of nested includes (default: 32).
    ///
    /// A document that includes itself, directly or through others, hits
    /// this limit and fails with `Error::Include`.
    pub max_include_depth: usize,

    /// Maximum nesting of objects and lists inside one document
    /// (default: 128).
    ///
    /// Parsing fails with `Error::NestingTooDeep` past this depth. Raising
    /// it needs a larger thread stack than the default 2 MiB in debug builds.
    pub max_nesting_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_include_depth: 32,
            max_nesting_depth: 128,
        }
    }
}

impl ParseOptions {
    pub fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }

    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }
}
