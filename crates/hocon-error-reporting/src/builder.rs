//! Builder API for diagnostic messages.

use crate::diagnostic::{DetailItem, DetailKind, DiagnosticMessage, MessageContent};
use hocon_source_map::SourceInfo;

/// Builds a [`DiagnosticMessage`] one piece at a time.
///
/// ```
/// use hocon_error_reporting::DiagnosticMessageBuilder;
///
/// let msg = DiagnosticMessageBuilder::error("Substitution cycle")
///     .with_code("H-2-2")
///     .problem("These substitutions depend on each other")
///     .add_detail("`${a}` needs `b`")
///     .add_detail("`${b}` needs `a`")
///     .add_hint("Break the cycle by giving one of them a literal value?")
///     .build();
///
/// assert_eq!(msg.code.as_deref(), Some("H-2-2"));
/// assert_eq!(msg.details.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct DiagnosticMessageBuilder {
    message: DiagnosticMessage,
}

impl DiagnosticMessageBuilder {
    pub fn error(title: impl Into<String>) -> Self {
        Self {
            message: DiagnosticMessage::error(title),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.message.code = Some(code.into());
        self
    }

    /// The "what went wrong" statement.
    pub fn problem(mut self, problem: impl Into<MessageContent>) -> Self {
        self.message.problem = Some(problem.into());
        self
    }

    /// Main source location of the diagnostic.
    pub fn with_location(mut self, location: SourceInfo) -> Self {
        self.message.location = Some(location);
        self
    }

    pub fn add_detail(self, content: impl Into<MessageContent>) -> Self {
        self.push_detail(DetailKind::Error, content.into(), None)
    }

    /// An error detail that points at its own source location.
    pub fn add_detail_at(self, content: impl Into<MessageContent>, location: SourceInfo) -> Self {
        self.push_detail(DetailKind::Error, content.into(), Some(location))
    }

    pub fn add_info(self, content: impl Into<MessageContent>) -> Self {
        self.push_detail(DetailKind::Info, content.into(), None)
    }

    pub fn add_hint(mut self, hint: impl Into<MessageContent>) -> Self {
        self.message.hints.push(hint.into());
        self
    }

    pub fn build(self) -> DiagnosticMessage {
        self.message
    }

    fn push_detail(
        mut self,
        kind: DetailKind,
        content: MessageContent,
        location: Option<SourceInfo>,
    ) -> Self {
        self.message.details.push(DetailItem {
            kind,
            content,
            location,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hocon_source_map::{FileId, Location, Range};

    #[test]
    fn test_builder_collects_everything() {
        let start = Location {
            offset: 3,
            row: 0,
            column: 3,
        };
        let loc = SourceInfo::new(FileId(0), Range { start, end: start });
        let msg = DiagnosticMessageBuilder::error("Odd value")
            .with_code("H-1-1")
            .problem("Something is off")
            .add_detail_at("here", loc)
            .add_info("fyi")
            .add_hint("Try again?")
            .with_location(loc)
            .build();

        assert_eq!(msg.code.as_deref(), Some("H-1-1"));
        assert_eq!(msg.details.len(), 2);
        assert_eq!(msg.details[0].location, Some(loc));
        assert_eq!(msg.details[1].kind, DetailKind::Info);
        assert_eq!(msg.hints.len(), 1);
        assert_eq!(msg.location, Some(loc));
    }
}
