//! Registry of parsed source texts

use crate::file_info::FileInformation;
use crate::source_info::SourceInfo;
use crate::types::{FileId, Location, Range};
use serde::{Deserialize, Serialize};

/// Every text handed to the parser (the root document and each include)
/// is registered here under its own `FileId`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceContext {
    files: Vec<SourceFile>,
}

/// A source text with its label and line index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// File path, URL, or a placeholder such as `<string>`
    pub path: String,
    /// The full text, kept for diagnostics rendering
    pub content: String,
    /// Line index over `content`
    pub file_info: FileInformation,
}

impl SourceContext {
    /// Create a new empty source context
    pub fn new() -> Self {
        SourceContext { files: Vec::new() }
    }

    /// Register a text and return its ID.
    pub fn add_file(&mut self, path: String, content: String) -> FileId {
        let id = FileId(self.files.len());
        let file_info = FileInformation::new(&content);
        self.files.push(SourceFile {
            path,
            content,
            file_info,
        });
        id
    }

    /// Get a file by ID
    pub fn get_file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.0)
    }

    /// Number of registered files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Resolve a byte offset in a registered file to a `Location`.
    pub fn location(&self, id: FileId, offset: usize) -> Option<Location> {
        let file = self.get_file(id)?;
        file.file_info.offset_to_location(offset, &file.content)
    }

    /// Build a `SourceInfo` from a pair of byte offsets.
    pub fn source_info(&self, id: FileId, start: usize, end: usize) -> Option<SourceInfo> {
        let start = self.location(id, start)?;
        let end = self.location(id, end)?;
        Some(SourceInfo::new(id, Range { start, end }))
    }
}
