/*
 * concat.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Value concatenation.
//!
//! Several values written after one key (`a = foo ${b} bar`,
//! `k = [1] [2]`, `o = {x: 1} {y: 2}`) are collected as tokens and joined
//! into one value once no `${...}` reference is left among them.

use crate::error::Position;
use crate::value::{ConfigTree, ConfigValue, ScalarValue};
use hocon_source_map::SourceInfo;

/// One piece of a concatenation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Value(ConfigValue),
    /// Unquoted text. Trailing whitespace is dropped if it ends the value.
    Unquoted(String),
    /// Index into the document's substitution registry.
    Substitution(usize),
}

/// A concatenation that still holds at least one `${...}` reference.
#[derive(Debug, Clone)]
pub(crate) struct PendingConcat {
    pub(crate) tokens: Vec<Token>,
    pub(crate) source_info: SourceInfo,
    pub(crate) position: Position,
}

impl PendingConcat {
    pub(crate) fn has_substitution(&self) -> bool {
        has_substitution(&self.tokens)
    }
}

pub(crate) fn has_substitution(tokens: &[Token]) -> bool {
    tokens.iter().any(|t| matches!(t, Token::Substitution(_)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Tree,
    List,
    Text,
    Unresolved,
}

impl Shape {
    fn of(token: &Token) -> Shape {
        match token {
            Token::Value(ConfigValue::Tree(_)) => Shape::Tree,
            Token::Value(ConfigValue::List(_)) => Shape::List,
            Token::Value(ConfigValue::Scalar(_)) | Token::Unquoted(_) => Shape::Text,
            Token::Value(ConfigValue::Pending(_)) | Token::Substitution(_) => Shape::Unresolved,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Shape::Tree => "an object",
            Shape::List => "a list",
            Shape::Text => "a string",
            Shape::Unresolved => "an unresolved substitution",
        }
    }
}

/// Join fully resolved tokens into a single value.
///
/// Null tokens are dropped first. A single remaining token is returned as
/// is; otherwise all tokens must be objects (deep-merged in order), lists
/// (appended in order) or scalars (joined as text). Mixing kinds is an
/// error, returned as a message for the caller to locate.
pub(crate) fn transform(tokens: Vec<Token>) -> Result<ConfigValue, String> {
    let mut tokens: Vec<Token> = tokens
        .into_iter()
        .filter(|t| !matches!(t, Token::Value(v) if v.is_null()))
        .collect();

    let Some(first) = tokens.first() else {
        return Ok(ConfigValue::null());
    };
    let shape = Shape::of(first);
    if shape == Shape::Unresolved {
        return Err("cannot join an unresolved substitution".to_string());
    }
    if let Some(other) = tokens.iter().map(Shape::of).find(|s| *s != shape) {
        return Err(format!(
            "cannot concatenate {} with {}",
            shape.describe(),
            other.describe()
        ));
    }

    if tokens.len() == 1 {
        return Ok(match tokens.remove(0) {
            Token::Value(value) => value,
            Token::Unquoted(text) => ConfigValue::string(text.trim_end()),
            Token::Substitution(_) => {
                return Err("cannot join an unresolved substitution".to_string());
            }
        });
    }

    Ok(match shape {
        Shape::Tree => {
            let mut merged = ConfigTree::new();
            for token in tokens {
                if let Token::Value(ConfigValue::Tree(tree)) = token {
                    merged.merge(tree);
                }
            }
            ConfigValue::Tree(merged)
        }
        Shape::List => {
            let mut joined = Vec::new();
            for token in tokens {
                if let Token::Value(ConfigValue::List(list)) = token {
                    joined.extend(list);
                }
            }
            ConfigValue::List(joined)
        }
        Shape::Text | Shape::Unresolved => ConfigValue::string(join_text(&tokens)),
    })
}

fn join_text(tokens: &[Token]) -> String {
    let last = tokens.len().saturating_sub(1);
    let mut out = String::new();
    for (index, token) in tokens.iter().enumerate() {
        match token {
            Token::Unquoted(text) if index == last => out.push_str(text.trim_end()),
            Token::Unquoted(text) => out.push_str(text),
            Token::Value(ConfigValue::Scalar(ScalarValue::String(s))) => out.push_str(s),
            Token::Value(ConfigValue::Scalar(scalar)) => {
                out.push_str(&scalar.render());
                if index != last {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
    out
}
