//! Source locations for HOCON documents
//!
//! Every node the parser produces, and every `${...}` reference it records,
//! carries a [`SourceInfo`] pointing back into a file registered in a
//! [`SourceContext`]. Included documents get their own [`FileId`], so a
//! diagnostic can always name the exact file, line and column.
//!
//! # Example
//!
//! ```rust
//! use hocon_source_map::*;
//!
//! let mut ctx = SourceContext::new();
//! let file_id = ctx.add_file("app.conf".into(), "a = 1\nb = ${c}".into());
//!
//! let info = ctx.source_info(file_id, 10, 14).unwrap();
//! assert_eq!(info.range.start.row, 1);
//! assert_eq!(info.range.start.column, 4);
//! assert_eq!(info.range.start.line_number(), 2);
//! ```

pub mod context;
pub mod file_info;
pub mod source_info;
pub mod types;

pub use context::{SourceContext, SourceFile};
pub use file_info::FileInformation;
pub use source_info::SourceInfo;
pub use types::{FileId, Location, Range};
