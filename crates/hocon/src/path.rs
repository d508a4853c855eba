/*
 * path.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Dotted key paths.
//!
//! `a.b.c` names three nested keys. Quoted segments are taken literally, so
//! `a."b.c"` names two keys, the second one being `b.c`.

use crate::error::{Error, Result};

/// Split a dotted path into its key segments.
///
/// Leading and trailing whitespace of the whole path is ignored; whitespace
/// inside an unquoted segment is kept.
pub fn parse_path(path: &str) -> Result<Vec<String>> {
    let invalid = |message: &str| Error::InvalidPath {
        path: path.to_string(),
        message: message.to_string(),
    };

    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(invalid("empty path"));
    }

    let mut segments = Vec::new();
    let mut current = String::new();
    // Whether `current` holds anything, even an empty quoted string
    let mut started = false;
    let mut chars = trimmed.chars();

    while let Some(c) = chars.next() {
        match c {
            '.' => {
                if !started {
                    return Err(invalid("empty path segment"));
                }
                segments.push(std::mem::take(&mut current));
                started = false;
            }
            '"' => {
                started = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some('u') => {
                                let hex = chars.as_str().get(..4).unwrap_or_default();
                                let decoded = decode_unicode_escape(hex)
                                    .ok_or_else(|| invalid("invalid unicode escape"))?;
                                current.push(decoded);
                                chars.nth(3);
                            }
                            Some(escaped) => current.push(unescape_char(escaped)),
                            None => return Err(invalid("unterminated quoted segment")),
                        },
                        Some(other) => current.push(other),
                        None => return Err(invalid("unterminated quoted segment")),
                    }
                }
            }
            other => {
                started = true;
                current.push(other);
            }
        }
    }

    if !started {
        return Err(invalid("empty path segment"));
    }
    segments.push(current);
    Ok(segments)
}

/// Join segments back into a path, quoting the ones that need it.
pub fn join_path(segments: &[String]) -> String {
    segments
        .iter()
        .map(|segment| {
            if segment.is_empty() || segment.contains(['.', '"']) {
                format!("\"{}\"", segment.replace('\\', "\\\\").replace('"', "\\\""))
            } else {
                segment.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// The character named by the four hex digits of a `\uXXXX` escape.
pub(crate) fn decode_unicode_escape(hex: &str) -> Option<char> {
    if hex.len() != 4 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

pub(crate) fn unescape_char(c: char) -> char {
    match c {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'b' => '\u{8}',
        'f' => '\u{c}',
        other => other,
    }
}
