/*
 * resolver.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Substitution resolution.
//!
//! Resolution runs in passes. Each pass tries every outstanding reference
//! against the current tree: a reference whose target is concrete is
//! written into its concatenation, and a concatenation with no references
//! left is joined and written over its placeholder. A reference whose
//! target is still pending waits for a later pass. A pass that makes no
//! progress means the remaining references depend on each other.

use crate::concat::{self, Token};
use crate::document::Document;
use crate::env::Environment;
use crate::error::{Error, Result, SubstitutionError};
use crate::value::{ConfigValue, PendingId, ScalarValue};
use std::collections::HashSet;

/// Outcome of looking a path up in a partially resolved tree.
#[derive(Debug)]
enum Lookup<'t> {
    Found(&'t ConfigValue),
    /// The path runs into a pending value; try again later.
    Deferred,
    Absent,
}

fn lookup<'t>(root: &'t ConfigValue, segments: &[String]) -> Lookup<'t> {
    let mut current = root;
    for segment in segments {
        match current {
            ConfigValue::Tree(tree) => match tree.get_key(segment) {
                Some(value) => current = value,
                None => return Lookup::Absent,
            },
            ConfigValue::Pending(_) => return Lookup::Deferred,
            _ => return Lookup::Absent,
        }
    }
    if current.contains_pending() {
        Lookup::Deferred
    } else {
        Lookup::Found(current)
    }
}

impl Document {
    /// Resolve every substitution and return the final value.
    ///
    /// Paths missing from the document are looked up in `env`. Fails with
    /// [`SubstitutionError::Missing`] for a path found in neither,
    /// [`SubstitutionError::Cycle`] when the remaining references can never
    /// be resolved, and [`SubstitutionError::CompositeInConcat`] when an
    /// object or list is substituted next to other values.
    ///
    /// ```
    /// use hocon::{ConfigParser, MapEnvironment};
    ///
    /// let mut parser = ConfigParser::new();
    /// let document = parser.parse_document("url = \"http://\"${HOST}\"/api\"").unwrap();
    /// assert!(!document.is_resolved());
    ///
    /// let env = MapEnvironment::new().with("HOST", "example.com");
    /// let root = document.resolve(&env).unwrap();
    /// let tree = root.as_tree().unwrap();
    /// assert_eq!(tree.get_string("url").unwrap(), "http://example.com/api");
    /// ```
    pub fn resolve(mut self, env: &dyn Environment) -> Result<ConfigValue> {
        let mut remaining: Vec<usize> = (0..self.refs.len()).collect();
        let mut pass = 0;

        loop {
            self.drop_unreachable(&mut remaining);
            if remaining.is_empty() {
                break;
            }
            pass += 1;

            let mut deferred = Vec::new();
            let mut resolved = 0;
            for index in remaining {
                if self.resolve_one(index, env)? {
                    resolved += 1;
                } else {
                    deferred.push(index);
                }
            }

            tracing::debug!(
                pass,
                resolved,
                remaining = deferred.len(),
                "substitution pass"
            );

            if resolved == 0 {
                let references = deferred
                    .iter()
                    .map(|&index| self.refs[index].location())
                    .collect();
                return Err(SubstitutionError::Cycle { references }.into());
            }
            remaining = deferred;
        }

        if self.root.contains_pending() {
            return Err(Error::Internal {
                message: "unresolved value left after substitution".to_string(),
            });
        }
        Ok(self.root)
    }

    /// Try one reference. Returns `false` if its target is not ready.
    fn resolve_one(&mut self, index: usize, env: &dyn Environment) -> Result<bool> {
        let reference = self.refs[index].clone();

        let value = match lookup(&self.root, &reference.segments) {
            Lookup::Deferred => return Ok(false),
            Lookup::Found(value) => value.clone(),
            Lookup::Absent => match env.var(&reference.path) {
                Some(value) => {
                    tracing::debug!(path = %reference.path, "resolved from environment");
                    ConfigValue::string(value)
                }
                None => {
                    return Err(SubstitutionError::Missing {
                        reference: reference.location(),
                    }
                    .into());
                }
            },
        };

        let pending = &mut self.pendings[reference.pending.0];
        let token_count = pending.tokens.len();
        let token = if token_count == 1 {
            value
        } else {
            match value {
                ConfigValue::Tree(_) | ConfigValue::List(_) | ConfigValue::Pending(_) => {
                    let kind = if value.is_list() { "a list" } else { "an object" };
                    return Err(SubstitutionError::CompositeInConcat {
                        reference: reference.location(),
                        kind,
                    }
                    .into());
                }
                ConfigValue::Scalar(ScalarValue::Null) => value,
                ConfigValue::Scalar(scalar) => {
                    let mut text = scalar.render();
                    if reference.index + 1 < token_count {
                        text.push_str(&reference.whitespace);
                    }
                    ConfigValue::string(text)
                }
            }
        };
        tracing::trace!(path = %reference.path, "substituted");
        pending.tokens[reference.index] = Token::Value(token);

        if !pending.has_substitution() {
            let tokens = std::mem::take(&mut pending.tokens);
            let joined = concat::transform(tokens).map_err(|message| Error::Concatenation {
                message,
                position: pending.position.clone(),
                source_info: pending.source_info,
            })?;
            self.replace_pending(reference.pending, &joined);
        }
        Ok(true)
    }

    /// Write a finished value over every placeholder for `id`.
    fn replace_pending(&mut self, id: PendingId, value: &ConfigValue) {
        let mut replaced = self.root.replace_pending(id, value);
        for pending in &mut self.pendings {
            for token in &mut pending.tokens {
                if let Token::Value(inner) = token {
                    replaced += inner.replace_pending(id, value);
                }
            }
        }
        if replaced == 0 {
            tracing::trace!(pending = id.0, "resolved value is no longer referenced");
        }
    }

    /// Pending values reachable from the root, directly or through the
    /// tokens of other pending values.
    fn reachable_pendings(&self) -> HashSet<PendingId> {
        let mut stack = Vec::new();
        self.root.collect_pending(&mut stack);
        let mut seen = HashSet::new();
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            for token in &self.pendings[id.0].tokens {
                if let Token::Value(value) = token {
                    value.collect_pending(&mut stack);
                }
            }
        }
        seen
    }

    /// Forget references whose value was overwritten by a later write to
    /// the same key.
    fn drop_unreachable(&self, remaining: &mut Vec<usize>) {
        let reachable = self.reachable_pendings();
        remaining.retain(|&index| {
            let reference = &self.refs[index];
            let keep = reachable.contains(&reference.pending);
            if !keep {
                tracing::debug!(
                    path = %reference.path,
                    position = %reference.position,
                    "dropping substitution from an overwritten value"
                );
            }
            keep
        });
    }
}
