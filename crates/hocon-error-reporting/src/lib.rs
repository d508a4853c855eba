//! Error reporting and diagnostic messages for HOCON documents.
//!
//! Engine errors are converted into [`DiagnosticMessage`]s: a short title, an
//! optional problem statement, bulleted details that may point at their own
//! source locations, and hints. A message renders either as plain text,
//! as an `ariadne` report with a source snippet (when a
//! [`hocon_source_map::SourceContext`] is available), or as JSON.
//!
//! ```
//! use hocon_error_reporting::DiagnosticMessageBuilder;
//!
//! let msg = DiagnosticMessageBuilder::error("Unresolved substitution")
//!     .with_code("H-2-1")
//!     .problem("`${db.host}` is not defined")
//!     .add_hint("Define `db.host` or export it as an environment variable?")
//!     .build();
//!
//! assert!(msg.to_text(None).contains("[H-2-1]"));
//! ```

pub mod builder;
pub mod catalog;
pub mod diagnostic;

pub use builder::DiagnosticMessageBuilder;
pub use catalog::{ERROR_CATALOG, ErrorCodeInfo, get_docs_url, get_error_info};
pub use diagnostic::{DetailItem, DetailKind, DiagnosticMessage, MessageContent};
