/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for parsing, resolving and querying documents.

use hocon_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder};
use hocon_source_map::SourceInfo;
use std::fmt;
use thiserror::Error;

/// A user-facing location: file label plus 1-based line and column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Position {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Where a `${...}` reference was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefLocation {
    pub path: String,
    pub position: Position,
    pub source_info: SourceInfo,
}

impl fmt::Display for RefLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${{{}}}: (line: {}, col: {})",
            self.path, self.position.line, self.position.column
        )
    }
}

/// Failures of the substitution resolver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubstitutionError {
    /// The path exists neither in the document nor in the environment.
    #[error("Cannot resolve variable {}", describe_ref(.reference))]
    Missing { reference: RefLocation },

    /// No substitution could make progress; the remaining ones depend on
    /// each other.
    #[error("Cannot resolve {}. Check for cycles.", join_refs(.references))]
    Cycle { references: Vec<RefLocation> },

    /// An object or list was substituted into a concatenation with other
    /// values.
    #[error(
        "Cannot substitute variable {} because it points to {kind} and is concatenated with other values",
        describe_ref(.reference)
    )]
    CompositeInConcat {
        reference: RefLocation,
        kind: &'static str,
    },
}

fn describe_ref(reference: &RefLocation) -> String {
    format!(
        "${{{}}} (line: {}, col: {}) in {}",
        reference.path, reference.position.line, reference.position.column, reference.position.file
    )
}

fn join_refs(references: &[RefLocation]) -> String {
    references
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors produced by this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The text does not follow the grammar.
    #[error("{position}: {message}")]
    Syntax {
        message: String,
        position: Position,
        source_info: SourceInfo,
    },

    #[error(transparent)]
    Substitution(#[from] SubstitutionError),

    /// An include target (or the document passed to `parse_file`/`parse_url`)
    /// could not be loaded.
    #[error("Cannot include {locator}{}: {reason}", at_position(.position))]
    Include {
        locator: String,
        reason: String,
        position: Option<Position>,
        source_info: Option<SourceInfo>,
    },

    /// Values of different kinds were written next to each other.
    #[error("{position}: {message}")]
    Concatenation {
        message: String,
        position: Position,
        source_info: SourceInfo,
    },

    /// No setting at the requested path.
    #[error("No configuration setting found for key {path}")]
    Lookup { path: String },

    /// The setting exists but has an incompatible kind.
    #[error("{path} has type {found} rather than {expected}")]
    Type {
        path: String,
        expected: &'static str,
        found: String,
    },

    /// A key path passed to a query or `put` could not be parsed.
    #[error("Invalid path '{path}': {message}")]
    InvalidPath { path: String, message: String },

    #[error("{position}: objects and lists nested deeper than {max_depth} levels")]
    NestingTooDeep {
        max_depth: usize,
        position: Position,
        source_info: SourceInfo,
    },

    /// A broken internal invariant. Always a bug.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

fn at_position(position: &Option<Position>) -> String {
    position
        .as_ref()
        .map(|p| format!(" (at {})", p))
        .unwrap_or_default()
}

/// Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Convert into a structured diagnostic with a catalog code.
    ///
    /// Render it with
    /// `diagnostic.to_text(Some(parser.source_context()))` to get a source
    /// snippet.
    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        match self {
            Error::Syntax {
                message,
                source_info,
                ..
            } => DiagnosticMessageBuilder::error("Syntax error")
                .with_code("H-1-1")
                .problem(message.clone())
                .with_location(*source_info)
                .build(),

            Error::Substitution(SubstitutionError::Missing { reference }) => {
                DiagnosticMessageBuilder::error("Unresolved substitution")
                    .with_code("H-2-1")
                    .problem(format!(
                        "`${{{}}}` is not defined in the document or the environment",
                        reference.path
                    ))
                    .with_location(reference.source_info)
                    .add_hint(format!(
                        "Define `{}`, or export it as an environment variable?",
                        reference.path
                    ))
                    .build()
            }

            Error::Substitution(SubstitutionError::Cycle { references }) => {
                let mut builder = DiagnosticMessageBuilder::error("Substitution cycle")
                    .with_code("H-2-2")
                    .problem(format!(
                        "{} substitution(s) depend on each other and can never be resolved",
                        references.len()
                    ));
                for reference in references {
                    builder = builder.add_detail_at(
                        format!("`${{{}}}` is still unresolved", reference.path),
                        reference.source_info,
                    );
                }
                builder
                    .add_hint("Give one of the paths in the cycle a literal value?")
                    .build()
            }

            Error::Substitution(SubstitutionError::CompositeInConcat { reference, kind }) => {
                DiagnosticMessageBuilder::error("Composite value in concatenation")
                    .with_code("H-2-3")
                    .problem(format!(
                        "`${{{}}}` resolves to {}, which cannot be joined with other values",
                        reference.path, kind
                    ))
                    .with_location(reference.source_info)
                    .add_hint("Put the substitution on its own, without other values next to it?")
                    .build()
            }

            Error::Include {
                locator,
                reason,
                source_info,
                ..
            } => {
                let mut builder = DiagnosticMessageBuilder::error("Include failed")
                    .with_code("H-3-1")
                    .problem(format!("Could not load `{}`", locator))
                    .add_info(reason.clone());
                if let Some(info) = source_info {
                    builder = builder.with_location(*info);
                }
                builder.build()
            }

            Error::Concatenation {
                message,
                source_info,
                ..
            } => DiagnosticMessageBuilder::error("Incompatible concatenation")
                .with_code("H-1-2")
                .problem(message.clone())
                .with_location(*source_info)
                .build(),

            Error::Lookup { path } => DiagnosticMessageBuilder::error("Missing setting")
                .with_code("H-4-1")
                .problem(format!("No setting at `{}`", path))
                .build(),

            Error::Type {
                path,
                expected,
                found,
            } => DiagnosticMessageBuilder::error("Wrong type")
                .with_code("H-4-2")
                .problem(format!("`{}` is {}, expected {}", path, found, expected))
                .build(),

            Error::InvalidPath { path, message } => DiagnosticMessageBuilder::error("Invalid path")
                .with_code("H-4-1")
                .problem(format!("`{}`: {}", path, message))
                .build(),

            Error::NestingTooDeep {
                max_depth,
                source_info,
                ..
            } => DiagnosticMessageBuilder::error("Nesting too deep")
                .with_code("H-0-2")
                .problem(format!(
                    "Objects and lists are nested more than {} levels deep",
                    max_depth
                ))
                .with_location(*source_info)
                .build(),

            Error::Internal { message } => DiagnosticMessageBuilder::error("Internal error")
                .with_code("H-0-1")
                .problem(message.clone())
                .build(),
        }
    }

    /// True for errors raised while resolving `${...}` references.
    pub fn is_substitution(&self) -> bool {
        matches!(self, Error::Substitution(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(path: &str, line: usize, column: usize) -> RefLocation {
        RefLocation {
            path: path.to_string(),
            position: Position {
                file: "<string>".to_string(),
                line,
                column,
            },
            source_info: SourceInfo::default(),
        }
    }

    #[test]
    fn test_cycle_message_lists_every_reference() {
        let err = Error::from(SubstitutionError::Cycle {
            references: vec![reference("a", 1, 5), reference("b", 2, 5)],
        });
        assert_eq!(
            err.to_string(),
            "Cannot resolve ${a}: (line: 1, col: 5), ${b}: (line: 2, col: 5). Check for cycles."
        );
        assert!(err.is_substitution());
    }

    #[test]
    fn test_missing_message() {
        let err = Error::from(SubstitutionError::Missing {
            reference: reference("db.host", 3, 9),
        });
        assert_eq!(
            err.to_string(),
            "Cannot resolve variable ${db.host} (line: 3, col: 9) in <string>"
        );
    }

    #[test]
    fn test_include_message_with_and_without_position() {
        let err = Error::Include {
            locator: "other.conf".to_string(),
            reason: "not found".to_string(),
            position: None,
            source_info: None,
        };
        assert_eq!(err.to_string(), "Cannot include other.conf: not found");

        let err = Error::Include {
            locator: "other.conf".to_string(),
            reason: "not found".to_string(),
            position: Some(Position {
                file: "app.conf".to_string(),
                line: 4,
                column: 1,
            }),
            source_info: None,
        };
        assert_eq!(
            err.to_string(),
            "Cannot include other.conf (at app.conf:4:1): not found"
        );
    }

    #[test]
    fn test_diagnostic_codes() {
        let cases = [
            (
                Error::Lookup {
                    path: "a".to_string(),
                },
                "H-4-1",
            ),
            (
                Error::Type {
                    path: "a".to_string(),
                    expected: "a list",
                    found: "a string".to_string(),
                },
                "H-4-2",
            ),
            (
                Error::Internal {
                    message: "oops".to_string(),
                },
                "H-0-1",
            ),
            (
                Error::from(SubstitutionError::Cycle {
                    references: vec![reference("a", 1, 5)],
                }),
                "H-2-2",
            ),
        ];
        for (err, code) in cases {
            assert_eq!(err.to_diagnostic().code.as_deref(), Some(code));
        }
    }

    #[test]
    fn test_cycle_diagnostic_points_at_each_reference() {
        let err = Error::from(SubstitutionError::Cycle {
            references: vec![reference("a", 1, 5), reference("b", 2, 5)],
        });
        let diagnostic = err.to_diagnostic();
        assert_eq!(diagnostic.details.len(), 2);
        assert!(diagnostic.details.iter().all(|d| d.location.is_some()));
    }
}
