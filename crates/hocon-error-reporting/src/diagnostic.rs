//! Core diagnostic message types.
//!
//! A diagnostic follows a tidyverse-like structure: a title, an optional
//! problem statement, bulleted details and hints.

use hocon_source_map::{SourceContext, SourceInfo};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// How detail items should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetailKind {
    /// ✖ bullet
    Error,
    /// ℹ bullet
    Info,
}

impl DetailKind {
    fn bullet(self) -> &'static str {
        match self {
            DetailKind::Error => "✖",
            DetailKind::Info => "ℹ",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            DetailKind::Error => "error",
            DetailKind::Info => "info",
        }
    }
}

/// The content of a message or detail item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageContent {
    /// Plain text content
    Plain(String),
    /// Markdown content (backticks mark paths and code)
    Markdown(String),
}

impl MessageContent {
    pub fn as_str(&self) -> &str {
        match self {
            MessageContent::Plain(s) => s,
            MessageContent::Markdown(s) => s,
        }
    }

    /// Convert to JSON value with type information
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;
        match self {
            MessageContent::Plain(s) => json!({
                "type": "plain",
                "content": s
            }),
            MessageContent::Markdown(s) => json!({
                "type": "markdown",
                "content": s
            }),
        }
    }
}

impl From<String> for MessageContent {
    fn from(s: String) -> Self {
        MessageContent::Markdown(s)
    }
}

impl From<&str> for MessageContent {
    fn from(s: &str) -> Self {
        MessageContent::Markdown(s.to_string())
    }
}

/// A detail item in a diagnostic message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailItem {
    pub kind: DetailKind,
    pub content: MessageContent,
    /// Where in the source this detail applies, if anywhere.
    ///
    /// A cycle diagnostic uses this to point at every substitution involved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceInfo>,
}

/// An error diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticMessage {
    /// Optional error code (e.g., "H-1-1")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Brief title for the error
    pub title: String,

    /// The problem statement
    pub problem: Option<MessageContent>,

    pub details: Vec<DetailItem>,

    /// Hints for fixing (end with ?)
    pub hints: Vec<MessageContent>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceInfo>,
}

impl DiagnosticMessage {
    /// Create a new diagnostic message with just a title.
    ///
    /// Prefer [`crate::DiagnosticMessageBuilder`] for anything with details.
    pub fn error(title: impl Into<String>) -> Self {
        Self {
            code: None,
            title: title.into(),
            problem: None,
            details: Vec::new(),
            hints: Vec::new(),
            location: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Documentation URL for this diagnostic's code, if any.
    ///
    /// ```
    /// use hocon_error_reporting::DiagnosticMessage;
    ///
    /// let msg = DiagnosticMessage::error("Cycle").with_code("H-2-2");
    /// assert!(msg.docs_url().unwrap().contains("substitutions"));
    /// ```
    pub fn docs_url(&self) -> Option<&str> {
        self.code
            .as_ref()
            .and_then(|code| crate::catalog::get_docs_url(code))
    }

    /// Render as text.
    ///
    /// With a `SourceContext` and a location, the output starts with an
    /// `ariadne` report showing the offending source lines; details without
    /// a location and all hints follow as bullets. Without a context the
    /// whole message is rendered as bullets, with the location given as
    /// `line:column`.
    ///
    /// ```
    /// use hocon_error_reporting::DiagnosticMessageBuilder;
    ///
    /// let msg = DiagnosticMessageBuilder::error("Invalid input")
    ///     .problem("Expected a value")
    ///     .add_hint("Did you forget a closing quote?")
    ///     .build();
    /// let text = msg.to_text(None);
    /// assert!(text.starts_with("Error: Invalid input"));
    /// assert!(text.contains("? Did you forget a closing quote?"));
    /// ```
    pub fn to_text(&self, ctx: Option<&SourceContext>) -> String {
        let mut result = String::new();

        let location = self
            .location
            .as_ref()
            .or_else(|| self.details.iter().find_map(|d| d.location.as_ref()));

        let ariadne = match (location, ctx) {
            (Some(loc), Some(ctx)) => self.render_ariadne_source_context(loc, ctx),
            _ => None,
        };

        match ariadne {
            Some(rendered) => {
                result.push_str(&rendered);
                for detail in self.details.iter().filter(|d| d.location.is_none()) {
                    let _ = writeln!(result, "{} {}", detail.kind.bullet(), detail.content.as_str());
                }
            }
            None => {
                result.push_str("Error");
                if let Some(code) = &self.code {
                    let _ = write!(result, " [{}]", code);
                }
                let _ = write!(result, ": {}", self.title);
                if let Some(loc) = &self.location {
                    let _ = write!(
                        result,
                        " (at {}:{})",
                        loc.range.start.line_number(),
                        loc.range.start.column_number()
                    );
                }
                result.push('\n');

                if let Some(problem) = &self.problem {
                    let _ = writeln!(result, "{}", problem.as_str());
                }
                for detail in &self.details {
                    let _ = write!(result, "{} {}", detail.kind.bullet(), detail.content.as_str());
                    if let Some(loc) = &detail.location {
                        let _ = write!(
                            result,
                            " (at {}:{})",
                            loc.range.start.line_number(),
                            loc.range.start.column_number()
                        );
                    }
                    result.push('\n');
                }
            }
        }

        for hint in &self.hints {
            let _ = writeln!(result, "? {}", hint.as_str());
        }

        result
    }

    /// Render as a JSON value.
    ///
    /// ```
    /// use hocon_error_reporting::DiagnosticMessage;
    ///
    /// let json = DiagnosticMessage::error("Something went wrong").to_json();
    /// assert_eq!(json["kind"], "error");
    /// assert_eq!(json["title"], "Something went wrong");
    /// ```
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;

        let mut obj = json!({
            "kind": "error",
            "title": self.title,
        });

        if let Some(code) = &self.code {
            obj["code"] = json!(code);
        }

        if let Some(problem) = &self.problem {
            obj["problem"] = problem.to_json();
        }

        if !self.details.is_empty() {
            let details: Vec<_> = self
                .details
                .iter()
                .map(|d| {
                    let mut detail_obj = json!({
                        "kind": d.kind.as_str(),
                        "content": d.content.to_json()
                    });
                    if let Some(location) = &d.location {
                        detail_obj["location"] = json!(location);
                    }
                    detail_obj
                })
                .collect();
            obj["details"] = json!(details);
        }

        if !self.hints.is_empty() {
            let hints: Vec<_> = self.hints.iter().map(|h| h.to_json()).collect();
            obj["hints"] = json!(hints);
        }

        if let Some(location) = &self.location {
            obj["location"] = json!(location);
        }

        obj
    }

    /// Render the source snippet with `ariadne`.
    ///
    /// Only labels in the same file as the main location are drawn.
    fn render_ariadne_source_context(
        &self,
        main_location: &SourceInfo,
        ctx: &SourceContext,
    ) -> Option<String> {
        use ariadne::{Color, Config, Label, Report, ReportKind, Source};

        let file = ctx.get_file(main_location.file_id)?;
        let content = file.content.as_str();
        // ariadne counts characters, our ranges count bytes
        let to_char = |offset: usize| content.get(..offset).map(|s| s.chars().count());
        let span_of = |info: &SourceInfo| -> Option<std::ops::Range<usize>> {
            let start = to_char(info.range.start.offset)?;
            let end = to_char(info.range.end.offset)?.max(start + 1);
            Some(start..end)
        };

        let main_span = span_of(main_location)?;
        let mut report = Report::build(ReportKind::Error, file.path.clone(), main_span.start)
            .with_config(Config::default().with_color(false));

        if let Some(code) = &self.code {
            report = report.with_message(format!("[{}] {}", code, self.title));
        } else {
            report = report.with_message(&self.title);
        }

        let main_message = self
            .problem
            .as_ref()
            .map(|p| p.as_str())
            .unwrap_or(&self.title);
        if self.location.is_some() {
            report = report.with_label(
                Label::new((file.path.clone(), main_span))
                    .with_message(main_message)
                    .with_color(Color::Red),
            );
        } else if let Some(problem) = &self.problem {
            report = report.with_note(problem.as_str());
        }

        for detail in &self.details {
            let Some(detail_loc) = &detail.location else {
                continue;
            };
            if detail_loc.file_id != main_location.file_id {
                continue;
            }
            if let Some(detail_span) = span_of(detail_loc) {
                let detail_color = match detail.kind {
                    DetailKind::Error => Color::Red,
                    DetailKind::Info => Color::Cyan,
                };
                report = report.with_label(
                    Label::new((file.path.clone(), detail_span))
                        .with_message(detail.content.as_str())
                        .with_color(detail_color),
                );
            }
        }

        let mut output = Vec::new();
        report
            .finish()
            .write((file.path.clone(), Source::from(content)), &mut output)
            .ok()?;

        String::from_utf8(output).ok()
    }
}
